//! Detects whether a scrolled viewport touches its start and end edges.
//!
//! Typical use is drawing "more content" fades or arrows on a table wrapper or carousel: show the
//! left arrow only when `!at.start`, the right one only when `!at.end`.

use crate::timer::Timeout;
use crate::viewport::ViewportState;
use std::time::Duration;
use std::time::Instant;

pub use crate::viewport::ScrollAxis;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollEdges {
    pub start: bool,
    pub end: bool,
}

impl Default for ScrollEdges {
    fn default() -> Self {
        Self {
            start: true,
            end: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollEdgeOptions {
    pub axis: ScrollAxis,
    /// Distance in cells below which an edge counts as reached.
    pub tolerance: u32,
    /// Minimum time between two evaluations.
    pub throttle: Duration,
    pub start_at: ScrollEdges,
}

impl Default for ScrollEdgeOptions {
    fn default() -> Self {
        Self {
            axis: ScrollAxis::default(),
            tolerance: 1,
            throttle: Duration::from_millis(100),
            start_at: ScrollEdges::default(),
        }
    }
}

impl ScrollEdgeOptions {
    pub fn axis(axis: ScrollAxis) -> Self {
        Self {
            axis,
            ..Self::default()
        }
    }
}

/// Computes the edges for one viewport snapshot.
pub fn edges_for(state: &ViewportState, axis: ScrollAxis, tolerance: u32) -> ScrollEdges {
    ScrollEdges {
        start: state.offset(axis) < tolerance,
        end: state.remaining(axis) < tolerance,
    }
}

/// Throttled edge tracking.
///
/// [`ScrollEdgeDetector::observe`] evaluates immediately at most once per throttle window.
/// Observations inside the window are remembered and evaluated by [`ScrollEdgeDetector::tick`]
/// when the window closes, so the final scroll position is never missed.
#[derive(Clone, Debug)]
pub struct ScrollEdgeDetector {
    options: ScrollEdgeOptions,
    at: ScrollEdges,
    last_check: Option<Instant>,
    pending: Option<ViewportState>,
    trailing: Timeout,
}

impl ScrollEdgeDetector {
    pub fn new(options: ScrollEdgeOptions) -> Self {
        Self {
            at: options.start_at,
            options,
            last_check: None,
            pending: None,
            trailing: Timeout::new(),
        }
    }

    pub fn at(&self) -> ScrollEdges {
        self.at
    }

    pub fn options(&self) -> &ScrollEdgeOptions {
        &self.options
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.trailing.deadline()
    }

    /// Feeds a scroll or resize observation. Returns `true` if the edges changed.
    pub fn observe(&mut self, state: &ViewportState, now: Instant) -> bool {
        match self.last_check {
            Some(last) if now < last + self.options.throttle => {
                self.pending = Some(*state);
                if !self.trailing.is_pending() {
                    self.trailing.schedule(last, self.options.throttle);
                }
                false
            }
            _ => {
                self.trailing.cancel();
                self.pending = None;
                self.evaluate(state, now)
            }
        }
    }

    /// Evaluates a throttled observation once its window has closed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.trailing.fire(now) {
            return false;
        }
        match self.pending.take() {
            Some(state) => self.evaluate(&state, now),
            None => false,
        }
    }

    fn evaluate(&mut self, state: &ViewportState, now: Instant) -> bool {
        self.last_check = Some(now);
        let at = edges_for(state, self.options.axis, self.options.tolerance);
        let changed = at != self.at;
        self.at = at;
        changed
    }
}
