//! `ratatui-overlay-core` provides the behavioural building blocks behind `ratatui-overlay`.
//!
//! The crate is for **widget authors** who want the state machines without the modal widget
//! itself: delayed ("laggy") state, self-clearing state, throttled scroll-edge detection, hover
//! and outside-click hit testing, and BEM class composition for styling.
//!
//! ## Design goals
//!
//! - Event-loop agnostic: you drive input, time and rendering from your app.
//! - No async runtime and no threads: timers are deadlines you advance with `tick(now)`, and every
//!   timed component exposes `next_deadline()` so the loop knows how long it may block.
//! - Deterministic: all time-dependent calls take the current [`std::time::Instant`] explicitly,
//!   which keeps tests free of sleeps.
//!
//! ## Entry points
//!
//! - [`laggy::LaggyState`]: a value that settles after a delay.
//! - [`short_state::ShortState`]: a value that clears itself.
//! - [`scroll_edge::ScrollEdgeDetector`]: start/end detection over a [`viewport::ViewportState`].
//! - [`bem::bem_class`] and [`theme::ClassStyles`]: class names and their styles.
//! - [`config::OverlayConfig`]: defaults loaded from TOML.
pub mod theme;

pub mod bem;
pub mod dom_id;
pub mod timer;

#[cfg(feature = "crossterm")]
pub mod crossterm_input;

pub mod render;
pub mod viewport;

pub mod click_outside;
pub mod hover;
pub mod input;
pub mod keymap;
pub mod laggy;
pub mod scroll_edge;
pub mod short_state;

pub mod config;
pub mod error;
