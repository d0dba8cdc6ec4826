use std::fmt;
use std::time::Duration;

use listsync_logging::{sync_debug, sync_info, sync_warn};

use crate::accumulate::{Accumulated, MergeMode};
use crate::continuation::Continuation;
use crate::debounce::{Debouncer, SEARCH_DEBOUNCE};
use crate::view_model::ListViewModel;
use crate::{Effect, Entity, ListQuery, PageEnvelope};

pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Idle,
    LoadingInitial,
    LoadingMore,
    Exhausted,
}

/// Why a page could not be loaded. Every kind is non-fatal to the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadFailureKind {
    /// The request never completed.
    Transport,
    /// The server answered with a non-success status.
    Status(u16),
    /// The body did not match the page envelope.
    Decode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub kind: LoadFailureKind,
    pub message: String,
}

impl LoadFailure {
    pub fn new(kind: LoadFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LoadFailureKind::Transport => write!(f, "transport error: {}", self.message),
            LoadFailureKind::Status(code) => write!(f, "http status {code}: {}", self.message),
            LoadFailureKind::Decode => write!(f, "invalid page: {}", self.message),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InFlight {
    request_id: RequestId,
    mode: MergeMode,
}

/// Accumulated list state for one host view.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState {
    query: ListQuery,
    accumulated: Accumulated,
    continuation: Continuation,
    phase: LoadPhase,
    in_flight: Option<InFlight>,
    epoch: u64,
    next_request_id: RequestId,
    search_debounce: Debouncer<String>,
    last_error: Option<LoadFailure>,
    mounted: bool,
    dirty: bool,
}

impl Default for ListState {
    fn default() -> Self {
        Self::new(ListQuery::default())
    }
}

impl ListState {
    pub fn new(query: ListQuery) -> Self {
        Self::with_search_debounce(query, SEARCH_DEBOUNCE)
    }

    pub fn with_search_debounce(query: ListQuery, debounce: Duration) -> Self {
        Self {
            query,
            accumulated: Accumulated::new(),
            continuation: Continuation::FirstPage,
            phase: LoadPhase::Idle,
            in_flight: None,
            epoch: 0,
            next_request_id: 1,
            search_debounce: Debouncer::new(debounce),
            last_error: None,
            mounted: false,
            dirty: false,
        }
    }

    pub fn view(&self) -> ListViewModel {
        ListViewModel {
            query: self.query.clone(),
            entities: self.accumulated.entities().to_vec(),
            total_count: self.accumulated.total_count(),
            is_loading: self.is_loading(),
            phase: self.phase,
            has_more: self.continuation.has_more(),
            epoch: self.epoch,
            last_error: self.last_error.clone(),
            dirty: self.dirty,
        }
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn entities(&self) -> &[Entity] {
        self.accumulated.entities()
    }

    pub fn total_count(&self) -> u64 {
        self.accumulated.total_count()
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn continuation(&self) -> &Continuation {
        &self.continuation
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn last_error(&self) -> Option<&LoadFailure> {
        self.last_error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, LoadPhase::LoadingInitial | LoadPhase::LoadingMore)
    }

    /// The re-entrancy guard: true while a request is outstanding.
    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight_request(&self) -> Option<RequestId> {
        self.in_flight.map(|f| f.request_id)
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// True when a trigger signal would load the next page right away.
    ///
    /// A failed request keeps this false, so a trigger source that is
    /// re-armed on the transition does not retry on its own.
    pub fn is_awaiting_trigger(&self) -> bool {
        self.mounted
            && self.in_flight.is_none()
            && self.last_error.is_none()
            && matches!(self.continuation, Continuation::Next(_))
    }

    pub fn has_pending_search(&self) -> bool {
        self.search_debounce.is_pending()
    }

    /// Returns and clears the render flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn search_debounce_mut(&mut self) -> &mut Debouncer<String> {
        &mut self.search_debounce
    }

    pub(crate) fn mount(&mut self) -> Option<Effect> {
        if self.mounted {
            return None;
        }
        self.mounted = true;
        Some(self.restart())
    }

    pub(crate) fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        // Whatever is still in flight will be discarded on arrival.
        self.in_flight = None;
        self.search_debounce.cancel();
        if self.is_loading() {
            self.phase = LoadPhase::Idle;
        }
        self.dirty = true;
    }

    /// Replaces the query. Returns the page 1 effect when the query changed
    /// and the view is mounted.
    pub(crate) fn change_query(&mut self, query: ListQuery) -> Option<Effect> {
        if query == self.query {
            return None;
        }
        self.query = query;
        self.dirty = true;
        if self.mounted {
            Some(self.restart())
        } else {
            None
        }
    }

    pub(crate) fn request_restart(&mut self) -> Option<Effect> {
        if self.mounted {
            Some(self.restart())
        } else {
            None
        }
    }

    /// Starts a new epoch: empties the list and issues page 1.
    fn restart(&mut self) -> Effect {
        self.epoch += 1;
        self.accumulated.clear();
        self.continuation = Continuation::FirstPage;
        self.last_error = None;
        self.dirty = true;
        let locator = self.query.first_page_locator();
        sync_info!("Restarting list epoch={} locator={}", self.epoch, locator);
        self.issue(locator, MergeMode::Replace)
    }

    /// Handles a trigger signal. At most one request is ever outstanding.
    pub(crate) fn request_more(&mut self) -> Option<Effect> {
        if !self.mounted {
            return None;
        }
        if let Some(in_flight) = self.in_flight {
            sync_debug!(
                "Ignoring load-more while request {} is outstanding",
                in_flight.request_id
            );
            return None;
        }
        match &self.continuation {
            Continuation::FirstPage => {
                let locator = self.query.first_page_locator();
                Some(self.issue(locator, MergeMode::Replace))
            }
            Continuation::Next(locator) => {
                let locator = locator.clone();
                Some(self.issue(locator, MergeMode::Append))
            }
            Continuation::Exhausted => {
                sync_debug!("Ignoring load-more: list exhausted at epoch {}", self.epoch);
                None
            }
        }
    }

    fn issue(&mut self, locator: String, mode: MergeMode) -> Effect {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.in_flight = Some(InFlight { request_id, mode });
        self.phase = match mode {
            MergeMode::Replace => LoadPhase::LoadingInitial,
            MergeMode::Append => LoadPhase::LoadingMore,
        };
        self.dirty = true;
        Effect::FetchPage {
            request_id,
            locator,
            mode,
        }
    }

    /// Takes the in-flight slot if `request_id` is the outstanding request.
    fn claim(&mut self, request_id: RequestId) -> Option<InFlight> {
        let current = self.in_flight;
        match current {
            Some(in_flight) if in_flight.request_id == request_id => {
                self.in_flight = None;
                Some(in_flight)
            }
            _ => {
                sync_debug!(
                    "Discarding stale response for request {} (epoch {})",
                    request_id,
                    self.epoch
                );
                None
            }
        }
    }

    pub(crate) fn apply_page(&mut self, request_id: RequestId, page: PageEnvelope) {
        let Some(in_flight) = self.claim(request_id) else {
            return;
        };
        let continuation = Continuation::from_next(page.next.clone());
        let received = page.results.len();
        self.accumulated.merge(in_flight.mode, page);
        self.phase = if continuation.has_more() {
            LoadPhase::Idle
        } else {
            LoadPhase::Exhausted
        };
        self.continuation = continuation;
        self.last_error = None;
        self.dirty = true;
        sync_info!(
            "Applied page: {} items, {} loaded of {}, has_more={}",
            received,
            self.accumulated.len(),
            self.accumulated.total_count(),
            self.continuation.has_more()
        );
    }

    pub(crate) fn apply_failure(&mut self, request_id: RequestId, failure: LoadFailure) {
        if self.claim(request_id).is_none() {
            return;
        }
        sync_warn!("Page request failed: {}", failure);
        self.phase = LoadPhase::Idle;
        self.last_error = Some(failure);
        self.dirty = true;
    }
}
