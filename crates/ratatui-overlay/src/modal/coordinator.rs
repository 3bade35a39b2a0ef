//! Shared registry of mounted modals.
//!
//! # Invariants
//!
//! - The stack holds exactly the modals that are opening or open, most recently opened first.
//! - An id appears at most once; opening an already stacked modal moves it to the front.
//! - `is_modal_open()` is `true` iff the stack is non-empty.
//! - Input is dispatched only to the modal at the front of the stack *at dispatch time*.
//!
//! The coordinator is an `Rc` handle, so it is `!Send` and stays on the UI thread.

use super::ModalAction;
use super::ModalShared;
use ratatui_overlay_core::input::InputEvent;
use ratatui_overlay_core::timer;
use std::cell::RefCell;
use std::rc::Rc;
use std::rc::Weak;
use std::time::Instant;

/// Identifies one mounted modal within its coordinator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModalId(u64);

impl ModalId {
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    mounted: Vec<(ModalId, Weak<ModalShared>)>,
    stack: Vec<ModalId>,
    modal_open: bool,
    focused: Option<ModalId>,
}

impl Registry {
    fn lookup(&self, id: ModalId) -> Option<Rc<ModalShared>> {
        self.mounted
            .iter()
            .find(|(m, _)| *m == id)
            .and_then(|(_, w)| w.upgrade())
    }

    fn live(&self) -> Vec<Rc<ModalShared>> {
        self.mounted.iter().filter_map(|(_, w)| w.upgrade()).collect()
    }

    fn remove_from_stack(&mut self, id: ModalId) -> bool {
        let before = self.stack.len();
        self.stack.retain(|m| *m != id);
        if self.stack.is_empty() && self.modal_open {
            self.modal_open = false;
            tracing::debug!("last modal closed, clearing modal-open marker");
        }
        self.stack.len() != before
    }
}

/// Injected service coordinating every modal that shares a screen.
///
/// Create one per terminal (or per test) and pass it to each [`Modal`](super::Modal).
#[derive(Clone, Default)]
pub struct ModalCoordinator {
    inner: Rc<RefCell<Registry>>,
}

impl std::fmt::Debug for ModalCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reg = self.inner.borrow();
        f.debug_struct("ModalCoordinator")
            .field("mounted", &reg.mounted.len())
            .field("stack", &reg.stack)
            .field("modal_open", &reg.modal_open)
            .field("focused", &reg.focused)
            .finish()
    }
}

impl ModalCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stacked modal ids, front (topmost) first.
    pub fn stack(&self) -> Vec<ModalId> {
        self.inner.borrow().stack.clone()
    }

    pub fn top(&self) -> Option<ModalId> {
        self.inner.borrow().stack.first().copied()
    }

    pub fn position(&self, id: ModalId) -> Option<usize> {
        self.inner.borrow().stack.iter().position(|m| *m == id)
    }

    pub fn depth(&self) -> usize {
        self.inner.borrow().stack.len()
    }

    pub fn mounted_count(&self) -> usize {
        self.inner.borrow().mounted.len()
    }

    /// The page-level "a modal is open" marker. Apps use it to suppress scrolling or dim chrome
    /// behind the overlay.
    pub fn is_modal_open(&self) -> bool {
        self.inner.borrow().modal_open
    }

    /// The modal holding keyboard focus, if any.
    pub fn focused(&self) -> Option<ModalId> {
        self.inner.borrow().focused
    }

    /// Moves focus into a mounted modal. Unknown ids are ignored.
    pub fn focus(&self, id: ModalId) -> bool {
        let mut reg = self.inner.borrow_mut();
        if !reg.mounted.iter().any(|(m, _)| *m == id) {
            return false;
        }
        reg.focused = Some(id);
        true
    }

    /// Releases focus if `id` holds it.
    pub fn blur(&self, id: ModalId) {
        let mut reg = self.inner.borrow_mut();
        if reg.focused == Some(id) {
            reg.focused = None;
        }
    }

    /// Routes an input event to the topmost modal.
    ///
    /// Every mounted modal is registered here, but only the one at the front of the stack when
    /// the event arrives may react. Returns [`ModalAction::Ignored`] when the stack is empty or
    /// the top modal did not handle the event.
    pub fn handle_event(&self, event: &InputEvent, now: Instant) -> ModalAction {
        let target = {
            let reg = self.inner.borrow();
            reg.stack.first().and_then(|id| reg.lookup(*id))
        };
        match target {
            Some(shared) => shared.handle_event(event, now),
            None => ModalAction::Ignored,
        }
    }

    /// Advances the timers of every mounted modal. Returns `true` if any of them changed phase.
    pub fn tick(&self, now: Instant) -> bool {
        let live = self.inner.borrow().live();
        let mut changed = false;
        for shared in live {
            changed |= shared.tick(now);
        }
        changed
    }

    /// The earliest pending timer among mounted modals.
    pub fn next_deadline(&self) -> Option<Instant> {
        let live = self.inner.borrow().live();
        timer::earliest(live.iter().map(|s| s.next_deadline()))
    }

    pub(crate) fn register(&self, shared: Weak<ModalShared>) -> ModalId {
        let mut reg = self.inner.borrow_mut();
        reg.next_id += 1;
        let id = ModalId(reg.next_id);
        reg.mounted.push((id, shared));
        tracing::trace!(id = id.0, "modal mounted");
        id
    }

    pub(crate) fn unregister(&self, id: ModalId) {
        let mut reg = self.inner.borrow_mut();
        reg.mounted.retain(|(m, _)| *m != id);
        reg.remove_from_stack(id);
        if reg.focused == Some(id) {
            reg.focused = None;
        }
        tracing::trace!(id = id.0, "modal unmounted");
    }

    /// Moves `id` to the front of the stack and asserts the marker.
    pub(crate) fn push_front(&self, id: ModalId) {
        let mut reg = self.inner.borrow_mut();
        reg.stack.retain(|m| *m != id);
        reg.stack.insert(0, id);
        reg.modal_open = true;
        tracing::trace!(id = id.0, depth = reg.stack.len(), "modal stacked");
    }

    pub(crate) fn remove(&self, id: ModalId) -> bool {
        let mut reg = self.inner.borrow_mut();
        let removed = reg.remove_from_stack(id);
        if removed {
            tracing::trace!(id = id.0, depth = reg.stack.len(), "modal unstacked");
        }
        removed
    }
}
