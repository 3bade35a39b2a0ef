use crate::input::MouseEvent;
use ratatui::layout::Rect;

/// `true` for a button press that lands in none of `regions`.
///
/// Regions that were never rendered (empty rects) contain nothing, so a click anywhere counts as
/// outside of them.
pub fn is_click_outside(regions: &[Rect], event: &MouseEvent) -> bool {
    event.is_press() && !regions.iter().any(|r| r.contains(event.position()))
}

/// Runs a handler for presses outside a set of regions.
///
/// Dropdowns and popovers use this to dismiss themselves; the caller keeps `regions` in sync with
/// what it last rendered.
pub struct ClickOutside<F: FnMut(&MouseEvent)> {
    pub regions: Vec<Rect>,
    handler: F,
}

impl<F: FnMut(&MouseEvent)> ClickOutside<F> {
    pub fn new(regions: Vec<Rect>, handler: F) -> Self {
        Self { regions, handler }
    }

    /// Returns `true` if the handler ran.
    pub fn handle_mouse(&mut self, event: &MouseEvent) -> bool {
        if !is_click_outside(&self.regions, event) {
            return false;
        }
        (self.handler)(event);
        true
    }
}

impl<F: FnMut(&MouseEvent)> std::fmt::Debug for ClickOutside<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClickOutside")
            .field("regions", &self.regions)
            .finish_non_exhaustive()
    }
}
