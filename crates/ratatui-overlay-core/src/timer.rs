use std::time::Duration;
use std::time::Instant;

/// A cancelable single-shot deadline.
///
/// Components own their `Timeout`s and are advanced by the caller's event loop through a
/// `tick(now)` method; nothing here sleeps or spawns. Scheduling replaces any pending deadline,
/// so a superseded timer can never fire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timeout {
    deadline: Option<Instant>,
}

impl Timeout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays past what `Instant` can represent are clamped to the latest reachable deadline.
    pub fn schedule(&mut self, now: Instant, delay: Duration) {
        let mut delay = delay;
        self.deadline = loop {
            if let Some(at) = now.checked_add(delay) {
                break Some(at);
            }
            delay /= 2;
        };
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` exactly once, on the first call at or after the deadline.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(at) if now >= at => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// The earliest of several optional deadlines, for computing an event-loop poll timeout.
pub fn earliest(deadlines: impl IntoIterator<Item = Option<Instant>>) -> Option<Instant> {
    deadlines.into_iter().flatten().min()
}
