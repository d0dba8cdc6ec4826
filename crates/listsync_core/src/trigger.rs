//! Signals that request the next page.
//!
//! Both strategies only decide *whether* more data should load. The single
//! in-flight guard lives in [`crate::ListState`], so a signal that arrives
//! while a fetch is outstanding is dropped there. Once the list is ready for
//! another page the host calls [`TriggerSource::rearm`], which re-checks the
//! last observed geometry instead of waiting for a fresh UI event.
use std::time::{Duration, Instant};

use crate::debounce::{Debouncer, SCROLL_DEBOUNCE};

/// Pre-arrival margin for the sentinel, so the fetch starts before the user
/// reaches the bottom.
pub const DEFAULT_ROOT_MARGIN_PX: i64 = 200;

/// Remaining scroll distance below which the threshold strategy fires.
pub const DEFAULT_BUFFER_PX: u32 = 1100;

/// Geometry of a scrollable container, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollMetrics {
    pub scroll_top: u32,
    pub client_height: u32,
    pub scroll_height: u32,
}

impl ScrollMetrics {
    /// Distance left to scroll before the bottom of the content.
    pub fn remaining(&self) -> u32 {
        self.scroll_height
            .saturating_sub(self.scroll_top.saturating_add(self.client_height))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEvent {
    /// Sentinel position relative to the bottom edge of the viewport.
    /// Zero or negative means the sentinel is on screen.
    Sentinel { offset_px: i64 },
    /// The host's scroll container moved.
    Scroll(ScrollMetrics),
}

pub trait TriggerSource: Send {
    /// Feeds a UI event into the source.
    fn observe(&mut self, event: TriggerEvent, now: Instant);
    /// Returns `true` once per firing.
    fn poll(&mut self, now: Instant) -> bool;
    /// Fires again if the last observed state still asks for more data.
    fn rearm(&mut self, now: Instant);
    /// Unregisters the source. Every later event is ignored.
    fn detach(&mut self);
    fn is_detached(&self) -> bool;
}

/// Fires when the sentinel enters the (margin-expanded) viewport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityTrigger {
    root_margin_px: i64,
    visible: bool,
    fired: bool,
    detached: bool,
}

impl VisibilityTrigger {
    pub fn new(root_margin_px: i64) -> Self {
        Self {
            root_margin_px,
            visible: false,
            fired: false,
            detached: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

impl Default for VisibilityTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT_MARGIN_PX)
    }
}

impl TriggerSource for VisibilityTrigger {
    fn observe(&mut self, event: TriggerEvent, _now: Instant) {
        if self.detached {
            return;
        }
        let TriggerEvent::Sentinel { offset_px } = event else {
            return;
        };
        let visible = offset_px <= self.root_margin_px;
        // Edge triggered: staying on screen is not a new intersection.
        if visible && !self.visible {
            self.fired = true;
        }
        self.visible = visible;
    }

    fn poll(&mut self, _now: Instant) -> bool {
        if self.detached {
            return false;
        }
        std::mem::take(&mut self.fired)
    }

    fn rearm(&mut self, _now: Instant) {
        if !self.detached && self.visible {
            self.fired = true;
        }
    }

    fn detach(&mut self) {
        self.detached = true;
        self.fired = false;
    }

    fn is_detached(&self) -> bool {
        self.detached
    }
}

/// Fires when a debounced scroll leaves less than `buffer_px` to the bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollThresholdTrigger {
    buffer_px: u32,
    pending: Debouncer<ScrollMetrics>,
    last: Option<ScrollMetrics>,
    armed: bool,
    detached: bool,
}

impl ScrollThresholdTrigger {
    pub fn new(buffer_px: u32, debounce: Duration) -> Self {
        Self {
            buffer_px,
            pending: Debouncer::new(debounce),
            last: None,
            armed: false,
            detached: false,
        }
    }

    pub fn buffer_px(&self) -> u32 {
        self.buffer_px
    }

    fn near_bottom(&self, metrics: &ScrollMetrics) -> bool {
        metrics.remaining() < self.buffer_px
    }
}

impl Default for ScrollThresholdTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_PX, SCROLL_DEBOUNCE)
    }
}

impl TriggerSource for ScrollThresholdTrigger {
    fn observe(&mut self, event: TriggerEvent, now: Instant) {
        if self.detached {
            return;
        }
        if let TriggerEvent::Scroll(metrics) = event {
            self.pending.push(metrics, now);
        }
    }

    fn poll(&mut self, now: Instant) -> bool {
        if self.detached {
            return false;
        }
        if let Some(metrics) = self.pending.poll(now) {
            self.last = Some(metrics);
            if self.near_bottom(&metrics) {
                self.armed = true;
            }
        }
        std::mem::take(&mut self.armed)
    }

    fn rearm(&mut self, _now: Instant) {
        if self.detached || self.pending.is_pending() {
            return;
        }
        if self.last.is_some_and(|metrics| self.near_bottom(&metrics)) {
            self.armed = true;
        }
    }

    fn detach(&mut self) {
        self.detached = true;
        self.armed = false;
        self.pending.cancel();
    }

    fn is_detached(&self) -> bool {
        self.detached
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerStrategy {
    Visibility { root_margin_px: i64 },
    ScrollThreshold { buffer_px: u32, debounce: Duration },
}

impl TriggerStrategy {
    pub fn build(self) -> Box<dyn TriggerSource> {
        match self {
            TriggerStrategy::Visibility { root_margin_px } => {
                Box::new(VisibilityTrigger::new(root_margin_px))
            }
            TriggerStrategy::ScrollThreshold { buffer_px, debounce } => {
                Box::new(ScrollThresholdTrigger::new(buffer_px, debounce))
            }
        }
    }
}

impl Default for TriggerStrategy {
    fn default() -> Self {
        TriggerStrategy::Visibility {
            root_margin_px: DEFAULT_ROOT_MARGIN_PX,
        }
    }
}
