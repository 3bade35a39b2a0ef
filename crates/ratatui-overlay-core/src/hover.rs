use crate::input::MouseEvent;
use crate::input::MouseEventKind;
use ratatui::layout::Rect;

/// Tracks whether the pointer is over a region.
///
/// Only pointer movement (with or without a button held) changes the state; presses and scroll
/// events are ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HoverTracker {
    hovering: bool,
}

impl HoverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    /// Returns `true` if the hover state changed.
    pub fn handle_mouse(&mut self, area: Rect, event: &MouseEvent) -> bool {
        if !matches!(event.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
            return false;
        }
        let inside = area.contains(event.position());
        let changed = inside != self.hovering;
        self.hovering = inside;
        changed
    }

    /// Forgets the hover state, e.g. when the region is no longer rendered.
    pub fn reset(&mut self) {
        self.hovering = false;
    }
}
