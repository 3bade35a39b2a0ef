//! Modal dialogs with stacking, dismissal and delayed close notifications.
//!
//! A [`Modal`] is mounted when constructed and unmounted when dropped. Every modal on a screen
//! shares one [`ModalCoordinator`], which keeps the stack of open modals, the page-level
//! "modal open" marker and keyboard focus, and routes input to the topmost modal.
//!
//! # Lifecycle
//!
//! ```text
//! Closed --open--> Opening --100ms--> Open --close--> Closing --close_delay--> Closed
//!                     ^                                   |
//!                     +--------------open-----------------+
//! ```
//!
//! - Opening pushes the modal to the front of the stack and sets the marker right away; the
//!   modal becomes visible, calls `on_open` and takes focus once [`OPEN_DELAY`] has passed.
//! - Closing hides the modal, unstacks it and calls `on_close` synchronously. `on_closed` follows
//!   `close_delay` later, unless the modal is reopened first.
//! - Timers advance through [`Modal::tick`] or [`ModalCoordinator::tick`].
//!
//! # Example
//!
//! ```
//! use ratatui_overlay::modal::{Modal, ModalContent, ModalCoordinator, ModalHandlers, ModalOptions};
//! use std::time::{Duration, Instant};
//!
//! let coordinator = ModalCoordinator::new();
//! let t0 = Instant::now();
//! let modal = Modal::new(
//!     &coordinator,
//!     ModalOptions::default(),
//!     ModalContent::text("Saved."),
//!     ModalHandlers::new(|| {}),
//!     t0,
//! );
//! assert!(coordinator.is_modal_open());
//! coordinator.tick(t0 + Duration::from_millis(100));
//! assert!(modal.is_open());
//! ```

mod coordinator;

pub use coordinator::ModalCoordinator;
pub use coordinator::ModalId;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Text;
use ratatui::widgets::Block;
use ratatui::widgets::Widget;
use ratatui_overlay_core::bem;
use ratatui_overlay_core::click_outside;
use ratatui_overlay_core::config::ModalConfig;
use ratatui_overlay_core::config::ModalTexts;
use ratatui_overlay_core::dom_id;
use ratatui_overlay_core::input::InputEvent;
use ratatui_overlay_core::input::KeyEvent;
use ratatui_overlay_core::input::MouseButton;
use ratatui_overlay_core::input::MouseEvent;
use ratatui_overlay_core::input::MouseEventKind;
use ratatui_overlay_core::keymap;
use ratatui_overlay_core::render;
use ratatui_overlay_core::theme::Theme;
use ratatui_overlay_core::timer;
use ratatui_overlay_core::timer::Timeout;
use std::cell::RefCell;
use std::rc::Rc;
use std::rc::Weak;
use std::time::Duration;
use std::time::Instant;
use unicode_width::UnicodeWidthStr;

/// Time between an open request and the modal becoming visible.
pub const OPEN_DELAY: Duration = Duration::from_millis(100);

pub const DEFAULT_CLOSE_DELAY: Duration = Duration::from_millis(1000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModalPhase {
    Closed,
    /// Stacked, waiting for [`OPEN_DELAY`]. Still hidden.
    Opening,
    Open,
    /// Hidden, waiting to notify `on_closed`.
    Closing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DismissReason {
    Escape,
    Backdrop,
    CloseButton,
}

/// Outcome of [`ModalCoordinator::handle_event`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModalAction {
    /// No modal reacted; the app may route the event elsewhere.
    Ignored,
    Dismissed { id: ModalId, reason: DismissReason },
}

/// What a modal shows: fixed text, or text built from a [`CloseModal`] capability on every
/// render.
pub enum ModalContent {
    Static(Text<'static>),
    Render(Box<dyn Fn(&CloseModal) -> Text<'static>>),
}

impl ModalContent {
    pub fn text(text: impl Into<Text<'static>>) -> Self {
        Self::Static(text.into())
    }

    pub fn render(f: impl Fn(&CloseModal) -> Text<'static> + 'static) -> Self {
        Self::Render(Box::new(f))
    }

    fn resolve(&self, close: &CloseModal) -> Text<'static> {
        match self {
            Self::Static(text) => text.clone(),
            Self::Render(f) => f(close),
        }
    }
}

impl std::fmt::Debug for ModalContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static(text) => f.debug_tuple("Static").field(text).finish(),
            Self::Render(_) => f.write_str("Render(..)"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ModalOptions {
    /// Requests the modal open on mount.
    pub open: bool,
    /// Mounts already open: no entry delay and no `on_open`.
    pub start_open: bool,
    pub close_delay: Duration,
    /// Dismissable with the dismiss keys or a backdrop click.
    pub fickle: bool,
    /// Paint over the whole frame instead of the area passed to `render_ref`.
    pub portal: bool,
    /// Wrap the content in a `{bem}__body` region.
    pub body_wrap: bool,
    pub bem: String,
    pub modifier: bem::Modifier,
    pub texts: ModalTexts,
    pub dismiss_keys: Vec<KeyEvent>,
    /// Fixed id instead of a generated one.
    pub id: Option<String>,
}

impl Default for ModalOptions {
    fn default() -> Self {
        Self {
            open: true,
            start_open: false,
            close_delay: DEFAULT_CLOSE_DELAY,
            fickle: true,
            portal: true,
            body_wrap: false,
            bem: "Modal".to_string(),
            modifier: bem::Modifier::Absent,
            texts: ModalTexts::default(),
            dismiss_keys: keymap::default_dismiss_keys(),
            id: None,
        }
    }
}

impl From<&ModalConfig> for ModalOptions {
    fn from(c: &ModalConfig) -> Self {
        Self {
            start_open: c.start_open,
            close_delay: c.close_delay(),
            fickle: c.fickle,
            portal: c.portal,
            body_wrap: c.body_wrap,
            bem: c.bem.clone(),
            texts: c.texts.clone(),
            ..Self::default()
        }
    }
}

type Callback = Box<dyn FnMut()>;

/// Lifecycle callbacks. `on_closed` is mandatory so callers can always sequence cleanup after the
/// close transition.
pub struct ModalHandlers {
    on_open: Option<Callback>,
    on_close: Option<Callback>,
    on_closed: Callback,
}

impl ModalHandlers {
    pub fn new(on_closed: impl FnMut() + 'static) -> Self {
        Self {
            on_open: None,
            on_close: None,
            on_closed: Box::new(on_closed),
        }
    }

    pub fn on_open(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_open = Some(Box::new(f));
        self
    }

    pub fn on_close(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_close = Some(Box::new(f));
        self
    }
}

/// Regions painted by the last [`Modal::render_ref`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModalLayout {
    /// The backdrop covering the host area.
    pub curtain: Rect,
    /// The bordered dialog box.
    pub content: Rect,
    pub body: Rect,
    pub close_button: Rect,
}

/// Accessibility description of the close button.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CloseButton {
    pub text: String,
    pub label: String,
    pub title: String,
    /// Id of the dialog wrapper this button closes.
    pub aria_controls: String,
    pub class: String,
}

/// A capability to close one modal, handed to [`ModalContent::Render`].
///
/// It does not keep the modal alive; closing an unmounted modal does nothing.
#[derive(Clone)]
pub struct CloseModal {
    shared: Weak<ModalShared>,
}

impl CloseModal {
    pub fn close(&self) -> bool {
        self.close_at(Instant::now())
    }

    pub fn close_at(&self, now: Instant) -> bool {
        match self.shared.upgrade() {
            Some(shared) => shared.request_close(now),
            None => false,
        }
    }
}

impl std::fmt::Debug for CloseModal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloseModal")
            .field("mounted", &(self.shared.strong_count() > 0))
            .finish()
    }
}

#[derive(Clone, Copy, Debug)]
enum Notify {
    Open,
    Close,
    Closed,
}

struct ModalCore {
    id: ModalId,
    dom_id: String,
    coordinator: ModalCoordinator,
    options: ModalOptions,
    phase: ModalPhase,
    open_timer: Timeout,
    closed_timer: Timeout,
    layout: Option<ModalLayout>,
}

impl ModalCore {
    fn request_open(&mut self, now: Instant) {
        // Reopening an open modal still refreshes its stack position and the marker.
        self.coordinator.push_front(self.id);
        match self.phase {
            ModalPhase::Open | ModalPhase::Opening => {}
            ModalPhase::Closed | ModalPhase::Closing => {
                self.closed_timer.cancel();
                self.open_timer.schedule(now, OPEN_DELAY);
                self.phase = ModalPhase::Opening;
                tracing::debug!(id = %self.dom_id, "modal opening");
            }
        }
    }

    fn request_close(&mut self, now: Instant) -> Option<Notify> {
        match self.phase {
            ModalPhase::Open | ModalPhase::Opening => {
                self.open_timer.cancel();
                self.phase = ModalPhase::Closing;
                self.layout = None;
                self.coordinator.remove(self.id);
                self.coordinator.blur(self.id);
                self.closed_timer.schedule(now, self.options.close_delay);
                tracing::debug!(
                    id = %self.dom_id,
                    close_delay_ms = u64::try_from(self.options.close_delay.as_millis()).unwrap_or(u64::MAX),
                    "modal closing"
                );
                Some(Notify::Close)
            }
            ModalPhase::Closed | ModalPhase::Closing => None,
        }
    }

    fn tick(&mut self, now: Instant) -> Option<Notify> {
        if self.open_timer.fire(now) {
            self.phase = ModalPhase::Open;
            self.coordinator.focus(self.id);
            tracing::debug!(id = %self.dom_id, "modal open");
            return Some(Notify::Open);
        }
        if self.closed_timer.fire(now) {
            self.phase = ModalPhase::Closed;
            tracing::debug!(id = %self.dom_id, "modal closed");
            return Some(Notify::Closed);
        }
        None
    }

    fn next_deadline(&self) -> Option<Instant> {
        timer::earliest([self.open_timer.deadline(), self.closed_timer.deadline()])
    }

    fn handle_event(
        &mut self,
        event: &InputEvent,
        now: Instant,
    ) -> (Option<DismissReason>, Option<Notify>) {
        let reason = match event {
            InputEvent::Key(key) => {
                if !self.options.fickle || !keymap::matches_any(&self.options.dismiss_keys, key) {
                    return (None, None);
                }
                DismissReason::Escape
            }
            InputEvent::Mouse(m) => match self.hit_test(m) {
                Some(reason) => reason,
                None => return (None, None),
            },
            InputEvent::Paste(_) => return (None, None),
        };
        match self.request_close(now) {
            Some(notify) => (Some(reason), Some(notify)),
            None => (None, None),
        }
    }

    fn hit_test(&self, m: &MouseEvent) -> Option<DismissReason> {
        if m.kind != MouseEventKind::Down(MouseButton::Left) {
            return None;
        }
        let layout = self.layout?;
        if layout.close_button.contains(m.position()) {
            return Some(DismissReason::CloseButton);
        }
        // Only a press on the curtain itself dismisses; presses inside the dialog never do.
        if self.options.fickle
            && layout.curtain.contains(m.position())
            && click_outside::is_click_outside(&[layout.content], m)
        {
            return Some(DismissReason::Backdrop);
        }
        None
    }

    fn unmount(&mut self) {
        self.open_timer.cancel();
        self.closed_timer.cancel();
        self.layout = None;
        self.coordinator.unregister(self.id);
        tracing::debug!(id = %self.dom_id, "modal unmounted");
    }
}

pub(crate) struct ModalShared {
    core: RefCell<ModalCore>,
    content: RefCell<ModalContent>,
    on_open: RefCell<Option<Callback>>,
    on_close: RefCell<Option<Callback>>,
    on_closed: RefCell<Option<Callback>>,
}

impl ModalShared {
    pub(crate) fn handle_event(&self, event: &InputEvent, now: Instant) -> ModalAction {
        let (reason, notify) = self.core.borrow_mut().handle_event(event, now);
        let id = self.core.borrow().id;
        self.notify(notify);
        match reason {
            Some(reason) => ModalAction::Dismissed { id, reason },
            None => ModalAction::Ignored,
        }
    }

    pub(crate) fn tick(&self, now: Instant) -> bool {
        let notify = self.core.borrow_mut().tick(now);
        let changed = notify.is_some();
        self.notify(notify);
        changed
    }

    pub(crate) fn next_deadline(&self) -> Option<Instant> {
        self.core.borrow().next_deadline()
    }

    fn request_close(&self, now: Instant) -> bool {
        let notify = self.core.borrow_mut().request_close(now);
        let closed = notify.is_some();
        self.notify(notify);
        closed
    }

    /// Runs a callback with no borrows held, so it may call back into the modal.
    fn notify(&self, notify: Option<Notify>) {
        let slot = match notify {
            Some(Notify::Open) => &self.on_open,
            Some(Notify::Close) => &self.on_close,
            Some(Notify::Closed) => &self.on_closed,
            None => return,
        };
        let taken = slot.borrow_mut().take();
        if let Some(mut f) = taken {
            f();
            let mut slot = slot.borrow_mut();
            if slot.is_none() {
                *slot = Some(f);
            }
        }
    }
}

/// A modal dialog. Mounted on construction, unmounted on drop.
pub struct Modal {
    shared: Rc<ModalShared>,
}

impl std::fmt::Debug for Modal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let core = self.shared.core.borrow();
        f.debug_struct("Modal")
            .field("id", &core.id)
            .field("dom_id", &core.dom_id)
            .field("phase", &core.phase)
            .finish_non_exhaustive()
    }
}

impl Modal {
    pub fn new(
        coordinator: &ModalCoordinator,
        options: ModalOptions,
        content: ModalContent,
        handlers: ModalHandlers,
        now: Instant,
    ) -> Self {
        let shared = Rc::new_cyclic(|weak| {
            let id = coordinator.register(weak.clone());
            let dom_id = dom_id::resolve(options.id.as_deref(), "Modal");
            ModalShared {
                core: RefCell::new(ModalCore {
                    id,
                    dom_id,
                    coordinator: coordinator.clone(),
                    options,
                    phase: ModalPhase::Closed,
                    open_timer: Timeout::new(),
                    closed_timer: Timeout::new(),
                    layout: None,
                }),
                content: RefCell::new(content),
                on_open: RefCell::new(handlers.on_open),
                on_close: RefCell::new(handlers.on_close),
                on_closed: RefCell::new(Some(handlers.on_closed)),
            }
        });

        {
            let mut core = shared.core.borrow_mut();
            if core.options.start_open {
                core.phase = ModalPhase::Open;
                coordinator.push_front(core.id);
                tracing::debug!(id = %core.dom_id, "modal mounted open");
            } else if core.options.open {
                core.request_open(now);
            }
        }

        Self { shared }
    }

    /// Builds a modal from configured defaults.
    pub fn from_config(
        coordinator: &ModalCoordinator,
        config: &ModalConfig,
        content: ModalContent,
        handlers: ModalHandlers,
        now: Instant,
    ) -> Self {
        Self::new(coordinator, config.into(), content, handlers, now)
    }

    pub fn id(&self) -> ModalId {
        self.shared.core.borrow().id
    }

    pub fn dom_id(&self) -> String {
        self.shared.core.borrow().dom_id.clone()
    }

    /// Always `"dialog"`.
    pub fn role(&self) -> &'static str {
        "dialog"
    }

    pub fn phase(&self) -> ModalPhase {
        self.shared.core.borrow().phase
    }

    pub fn is_open(&self) -> bool {
        self.phase() == ModalPhase::Open
    }

    pub fn is_hidden(&self) -> bool {
        !self.is_open()
    }

    pub fn set_open(&self, open: bool, now: Instant) {
        if open {
            self.open(now);
        } else {
            self.close(now);
        }
    }

    pub fn open(&self, now: Instant) {
        self.shared.core.borrow_mut().request_open(now);
    }

    /// Returns `true` if the modal was opening or open.
    pub fn close(&self, now: Instant) -> bool {
        self.shared.request_close(now)
    }

    pub fn close_modal(&self) -> CloseModal {
        CloseModal {
            shared: Rc::downgrade(&self.shared),
        }
    }

    /// Advances this modal's timers. Returns `true` if its phase changed.
    pub fn tick(&self, now: Instant) -> bool {
        self.shared.tick(now)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.shared.next_deadline()
    }

    pub fn layout(&self) -> Option<ModalLayout> {
        self.shared.core.borrow().layout
    }

    pub fn wrapper_class(&self) -> String {
        let core = self.shared.core.borrow();
        bem::bem_class(
            &format!("{}wrapper", core.options.bem),
            &core.options.modifier,
            None,
        )
    }

    pub fn class(&self) -> String {
        let core = self.shared.core.borrow();
        bem::bem_class(&core.options.bem, &core.options.modifier, None)
    }

    pub fn close_button(&self) -> CloseButton {
        let core = self.shared.core.borrow();
        let label = core.options.texts.label().to_string();
        CloseButton {
            text: core.options.texts.close_button.clone(),
            title: label.clone(),
            label,
            aria_controls: core.dom_id.clone(),
            class: format!("{}__closebutton", core.options.bem),
        }
    }

    /// Paints the modal when it is open; a hidden modal paints nothing.
    ///
    /// With `portal` the curtain covers the whole frame (`buf.area`) regardless of `area`.
    pub fn render_ref(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if !self.is_open() {
            self.shared.core.borrow_mut().layout = None;
            return;
        }

        // The content callback may close the modal, so no core borrow is held across it.
        let close = self.close_modal();
        let text = self.shared.content.borrow().resolve(&close);

        let core = self.shared.core.borrow();
        let host = if core.options.portal {
            buf.area
        } else {
            area.intersection(buf.area)
        };
        if core.phase != ModalPhase::Open || host.is_empty() {
            drop(core);
            self.shared.core.borrow_mut().layout = None;
            return;
        }

        let texts = &core.options.texts;
        let layout = compute_layout(host, &text, &texts.close_button);
        let bem_name = core.options.bem.as_str();

        let wrapper_class = bem::bem_class(
            &format!("{bem_name}wrapper"),
            &core.options.modifier,
            None,
        );
        render::clear_area(layout.curtain, buf, theme.class_style(&wrapper_class));

        let class = bem::bem_class(bem_name, &core.options.modifier, None);
        let style = theme.class_style(&class);
        render::clear_area(layout.content, buf, style);
        Block::bordered()
            .border_style(style)
            .render(layout.content, buf);

        let body_style = if core.options.body_wrap {
            let s = theme.classes.resolve(&format!("{bem_name}__body"), style);
            render::clear_area(layout.body, buf, s);
            s
        } else {
            style
        };
        for (i, line) in text.lines.iter().enumerate() {
            if i >= layout.body.height as usize {
                break;
            }
            render::render_line_clipped(
                layout.body.x,
                layout.body.y + i as u16,
                layout.body.width,
                buf,
                line,
                body_style,
            );
        }

        let button_style = theme
            .classes
            .resolve(&format!("{bem_name}__closebutton"), style);
        render::render_str_clipped(
            layout.close_button.x,
            layout.close_button.y,
            0,
            layout.close_button.width,
            buf,
            &texts.close_button,
            button_style,
        );

        drop(core);
        self.shared.core.borrow_mut().layout = Some(layout);
    }
}

impl Drop for Modal {
    fn drop(&mut self) {
        self.shared.core.borrow_mut().unmount();
    }
}

/// Centers a bordered box sized to the content plus a close-button row inside `host`.
fn compute_layout(host: Rect, text: &Text<'_>, close_text: &str) -> ModalLayout {
    let (text_w, text_h) = render::text_size(text);
    let button_w = UnicodeWidthStr::width(close_text).min(u16::MAX as usize) as u16;

    // One cell of horizontal padding, plus a spacer row and the button row below the body.
    let inner_w = text_w.max(button_w).saturating_add(2);
    let inner_h = text_h.saturating_add(2);
    let content = render::centered_rect(
        host,
        inner_w.saturating_add(2),
        inner_h.saturating_add(2),
    );
    let inner = Block::bordered().inner(content);

    let body = Rect::new(
        inner.x.saturating_add(1).min(inner.right()),
        inner.y,
        inner.width.saturating_sub(2),
        inner.height.saturating_sub(2),
    );
    let close_button = if inner.height == 0 {
        Rect::new(inner.x, inner.y, 0, 0)
    } else {
        let w = button_w.min(inner.width);
        Rect::new(
            inner.right().saturating_sub(w.saturating_add(1)).max(inner.x),
            inner.bottom() - 1,
            w,
            1,
        )
    };

    ModalLayout {
        curtain: host,
        content,
        body,
        close_button,
    }
}
