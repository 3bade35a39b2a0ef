//! A value whose settlement lags behind its intent.
//!
//! [`LaggyState`] keeps two slots: `next`, which updates as soon as a new value is set, and
//! `current`, which only catches up once the delay has elapsed. Use it to smooth rapid toggling,
//! e.g. keep a dropdown rendered while its closing transition plays, or ignore a hover that
//! lasts only a few milliseconds.
//!
//! ```
//! use ratatui_overlay_core::laggy::{Delay, LaggyState};
//! use std::time::{Duration, Instant};
//!
//! let t0 = Instant::now();
//! let mut open = LaggyState::new(false, Duration::from_millis(200));
//! open.set(true, t0);
//! assert_eq!((*open.current(), *open.next()), (false, true));
//! open.tick(t0 + Duration::from_millis(200));
//! assert!(*open.current());
//!
//! open.set_with(false, Delay::Immediate, t0);
//! assert!(!*open.current());
//! ```

use crate::timer::Timeout;
use std::time::Duration;
use std::time::Instant;

/// How long a [`LaggyState::set_with`] waits before committing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Delay {
    /// The container's configured delay.
    #[default]
    Default,
    /// Commit synchronously.
    Immediate,
    After(Duration),
}

#[derive(Clone, Debug)]
pub struct LaggyState<S> {
    current: S,
    next: S,
    delay: Duration,
    timer: Timeout,
}

impl<S: Clone> LaggyState<S> {
    pub fn new(initial: S, delay: Duration) -> Self {
        Self {
            current: initial.clone(),
            next: initial,
            delay,
            timer: Timeout::new(),
        }
    }

    /// Starts at `initial` and immediately begins settling towards `then` with the default delay.
    pub fn with_then(initial: S, then: S, delay: Duration, now: Instant) -> Self {
        let mut state = Self::new(initial, delay);
        state.set(then, now);
        state
    }

    /// The settled value.
    pub fn current(&self) -> &S {
        &self.current
    }

    /// The most recently requested value.
    pub fn next(&self) -> &S {
        &self.next
    }

    pub fn default_delay(&self) -> Duration {
        self.delay
    }

    /// `true` while a commit is scheduled.
    pub fn is_transitioning(&self) -> bool {
        self.timer.is_pending()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    pub fn set(&mut self, value: S, now: Instant) {
        self.set_with(value, Delay::Default, now);
    }

    /// Sets `next` right away and commits it to `current` after `delay`.
    ///
    /// Any previously scheduled commit is cancelled first. A zero delay commits synchronously.
    pub fn set_with(&mut self, value: S, delay: Delay, now: Instant) {
        self.timer.cancel();
        self.next = value;
        let delay = match delay {
            Delay::Default => self.delay,
            Delay::Immediate => Duration::ZERO,
            Delay::After(d) => d,
        };
        if delay.is_zero() {
            self.current = self.next.clone();
            return;
        }
        tracing::trace!(delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX), "laggy state scheduled");
        self.timer.schedule(now, delay);
    }

    /// Like [`LaggyState::set`], computing the value from the pending one.
    pub fn update(&mut self, f: impl FnOnce(&S) -> S, now: Instant) {
        self.update_with(f, Delay::Default, now);
    }

    pub fn update_with(&mut self, f: impl FnOnce(&S) -> S, delay: Delay, now: Instant) {
        let value = f(&self.next);
        self.set_with(value, delay, now);
    }

    /// Abandons the scheduled commit. `next` keeps its value and `current` stays where it was.
    pub fn cancel(&mut self) {
        self.timer.cancel();
    }

    /// Commits a due value. Returns `true` if `current` was updated.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.timer.fire(now) {
            return false;
        }
        self.current = self.next.clone();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn immediate_set_commits_synchronously() {
        let t0 = Instant::now();
        let mut s = LaggyState::new(0, ms(100));
        s.set_with(7, Delay::Immediate, t0);
        assert_eq!((*s.current(), *s.next()), (7, 7));
        assert!(!s.is_transitioning());
        assert_eq!(s.next_deadline(), None);
    }

    #[test]
    fn delayed_set_commits_when_due() {
        let t0 = Instant::now();
        let mut s = LaggyState::new("a", ms(100));
        s.set_with("b", Delay::After(ms(50)), t0);
        assert_eq!((*s.current(), *s.next()), ("a", "b"));
        assert!(s.is_transitioning());
        assert!(!s.tick(t0 + ms(49)));
        assert_eq!(*s.current(), "a");
        assert!(s.tick(t0 + ms(50)));
        assert_eq!(*s.current(), "b");
        assert!(!s.is_transitioning());
    }

    #[test]
    fn later_set_cancels_earlier_commit() {
        let t0 = Instant::now();
        let mut s = LaggyState::new(0, ms(50));
        s.set(1, t0);
        s.set(2, t0 + ms(30));
        // The first commit would have been due here.
        assert!(!s.tick(t0 + ms(50)));
        assert_eq!(*s.current(), 0);
        assert!(s.tick(t0 + ms(80)));
        assert_eq!(*s.current(), 2);
    }

    #[test]
    fn zero_default_delay_is_immediate() {
        let t0 = Instant::now();
        let mut s = LaggyState::new(false, Duration::ZERO);
        s.set(true, t0);
        assert!(*s.current());
    }

    #[test]
    fn cancel_freezes_without_settling() {
        let t0 = Instant::now();
        let mut s = LaggyState::new(0, ms(50));
        s.set(5, t0);
        s.cancel();
        assert!(!s.tick(t0 + ms(500)));
        assert_eq!((*s.current(), *s.next()), (0, 5));
        assert!(!s.is_transitioning());
    }

    #[test]
    fn update_reads_the_pending_value() {
        let t0 = Instant::now();
        let mut s = LaggyState::new(1, ms(50));
        s.update(|n| n + 1, t0);
        s.update(|n| n * 10, t0);
        assert_eq!(*s.next(), 20);
        s.tick(t0 + ms(50));
        assert_eq!(*s.current(), 20);
    }

    #[test]
    fn with_then_settles_after_default_delay() {
        let t0 = Instant::now();
        let mut s = LaggyState::with_then("mounting", "ready", ms(10), t0);
        assert_eq!((*s.current(), *s.next()), ("mounting", "ready"));
        s.tick(t0 + ms(10));
        assert_eq!(*s.current(), "ready");
    }
}
