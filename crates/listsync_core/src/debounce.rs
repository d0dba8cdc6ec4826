use std::time::{Duration, Instant};

/// Default quiet period before a typed search term restarts the list.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(250);

/// Default quiet period between scroll events before the threshold is checked.
pub const SCROLL_DEBOUNCE: Duration = Duration::from_millis(100);

/// Holds the latest value until `interval` has passed without a newer one.
///
/// Time is passed in by the caller so the state machine stays pure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debouncer<T> {
    interval: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Records a value, replacing any pending one and restarting the quiet period.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// Releases the pending value once the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let ready = match &self.pending {
            Some((_, at)) => now.saturating_duration_since(*at) >= self.interval,
            None => false,
        };
        if ready {
            self.pending.take().map(|(value, _)| value)
        } else {
            None
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}
