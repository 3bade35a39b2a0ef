use crate::timer::Timeout;
use std::time::Duration;
use std::time::Instant;

/// A value that reverts to `None` once its duration has passed.
///
/// Handy for transient UI feedback ("Copied!", validation flashes).
#[derive(Clone, Debug)]
pub struct ShortState<S> {
    value: Option<S>,
    expiry: Timeout,
}

impl<S> Default for ShortState<S> {
    fn default() -> Self {
        Self {
            value: None,
            expiry: Timeout::new(),
        }
    }
}

impl<S> ShortState<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts out showing `initial` for `duration`. A zero duration shows it until the next tick.
    pub fn with_initial(initial: S, duration: Duration, now: Instant) -> Self {
        let mut state = Self::new();
        state.set(initial, duration, now);
        state
    }

    pub fn get(&self) -> Option<&S> {
        self.value.as_ref()
    }

    /// Shows `value` for `duration`, replacing any value that is still showing.
    pub fn set(&mut self, value: S, duration: Duration, now: Instant) {
        self.value = Some(value);
        self.expiry.schedule(now, duration);
    }

    pub fn clear(&mut self) {
        self.value = None;
        self.expiry.cancel();
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.expiry.deadline()
    }

    /// Clears an expired value. Returns `true` if the value changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.expiry.fire(now) {
            return self.value.take().is_some();
        }
        false
    }
}
