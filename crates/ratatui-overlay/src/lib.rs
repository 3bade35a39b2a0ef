//! `ratatui-overlay` provides modal dialogs for ratatui apps.
//!
//! A [`modal::Modal`] stacks over the rest of the UI, dismisses on ESC or a backdrop click, and
//! reports its lifecycle through `on_open`, `on_close` and a delayed `on_closed`. Modals sharing a
//! screen coordinate through one [`modal::ModalCoordinator`].
//!
//! The state machines the modal is built on live in `ratatui-overlay-core` and are re-exported
//! here for convenience.
pub use ratatui_overlay_core::bem;
pub use ratatui_overlay_core::click_outside;
pub use ratatui_overlay_core::config;
pub use ratatui_overlay_core::dom_id;
pub use ratatui_overlay_core::error;
pub use ratatui_overlay_core::hover;
pub use ratatui_overlay_core::input;
pub use ratatui_overlay_core::keymap;
pub use ratatui_overlay_core::laggy;
pub use ratatui_overlay_core::render;
pub use ratatui_overlay_core::scroll_edge;
pub use ratatui_overlay_core::short_state;
pub use ratatui_overlay_core::theme;
pub use ratatui_overlay_core::timer;
pub use ratatui_overlay_core::viewport;

#[cfg(feature = "crossterm")]
pub use ratatui_overlay_core::crossterm_input;

pub mod modal;
