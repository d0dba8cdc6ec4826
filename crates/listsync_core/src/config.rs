use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::debounce::{SCROLL_DEBOUNCE, SEARCH_DEBOUNCE};
use crate::trigger::{TriggerStrategy, DEFAULT_BUFFER_PX, DEFAULT_ROOT_MARGIN_PX};
use crate::{ListQuery, ListState, Ordering, ProcessContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PageStrategy {
    #[default]
    Visibility,
    Threshold,
}

/// Everything a list view needs to configure the shared loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    pub base_endpoint: String,
    pub ordering_key: Option<String>,
    pub search_term: Option<String>,
    pub process_id: Option<String>,
    pub page_strategy: PageStrategy,
    /// Search input debounce.
    pub debounce_ms: u64,
    pub scroll_debounce_ms: u64,
    pub buffer_px: u32,
    pub root_margin_px: i64,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            base_endpoint: String::new(),
            ordering_key: None,
            search_term: None,
            process_id: None,
            page_strategy: PageStrategy::default(),
            debounce_ms: SEARCH_DEBOUNCE.as_millis() as u64,
            scroll_debounce_ms: SCROLL_DEBOUNCE.as_millis() as u64,
            buffer_px: DEFAULT_BUFFER_PX,
            root_margin_px: DEFAULT_ROOT_MARGIN_PX,
        }
    }
}

impl ListConfig {
    pub fn query(&self) -> ListQuery {
        ListQuery::new(self.base_endpoint.clone())
            .with_ordering(self.ordering_key.as_deref().and_then(Ordering::parse))
            .with_search(self.search_term.clone())
            .with_process(
                self.process_id
                    .as_deref()
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(ProcessContext::new),
            )
    }

    pub fn trigger_strategy(&self) -> TriggerStrategy {
        match self.page_strategy {
            PageStrategy::Visibility => TriggerStrategy::Visibility {
                root_margin_px: self.root_margin_px,
            },
            PageStrategy::Threshold => TriggerStrategy::ScrollThreshold {
                buffer_px: self.buffer_px,
                debounce: Duration::from_millis(self.scroll_debounce_ms),
            },
        }
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Unmounted state for this configuration.
    pub fn initial_state(&self) -> ListState {
        ListState::with_search_debounce(self.query(), self.search_debounce())
    }
}
