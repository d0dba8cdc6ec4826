use crate::{Entity, PageEnvelope};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// First page of an epoch: replaces whatever was loaded.
    Replace,
    /// Subsequent page: appended in arrival order.
    Append,
}

/// Entities loaded so far in the current epoch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Accumulated {
    entities: Vec<Entity>,
    total_count: u64,
}

impl Accumulated {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges a page. Items are not deduplicated: an item the server serves on
    /// two pages appears twice. The page's count always wins.
    pub fn merge(&mut self, mode: MergeMode, page: PageEnvelope) {
        match mode {
            MergeMode::Replace => self.entities = page.results,
            MergeMode::Append => self.entities.extend(page.results),
        }
        self.total_count = page.count;
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.total_count = 0;
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
