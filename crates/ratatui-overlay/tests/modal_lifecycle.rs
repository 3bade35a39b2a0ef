use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui_overlay::config::OverlayConfig;
use ratatui_overlay::input::InputEvent;
use ratatui_overlay::input::KeyCode;
use ratatui_overlay::input::KeyEvent;
use ratatui_overlay::input::MouseEvent;
use ratatui_overlay::input::MouseEventKind;
use ratatui_overlay::keymap;
use ratatui_overlay::modal::DismissReason;
use ratatui_overlay::modal::Modal;
use ratatui_overlay::modal::ModalAction;
use ratatui_overlay::modal::ModalContent;
use ratatui_overlay::modal::ModalCoordinator;
use ratatui_overlay::modal::ModalHandlers;
use ratatui_overlay::modal::ModalOptions;
use ratatui_overlay::modal::ModalPhase;
use ratatui_overlay::modal::OPEN_DELAY;
use ratatui_overlay::theme::Theme;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use std::time::Instant;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[derive(Clone, Default)]
struct Probe {
    opened: Rc<Cell<u32>>,
    closing: Rc<Cell<u32>>,
    closed: Rc<Cell<u32>>,
}

impl Probe {
    fn handlers(&self) -> ModalHandlers {
        let opened = self.opened.clone();
        let closing = self.closing.clone();
        let closed = self.closed.clone();
        ModalHandlers::new(move || closed.set(closed.get() + 1))
            .on_open(move || opened.set(opened.get() + 1))
            .on_close(move || closing.set(closing.get() + 1))
    }

    fn counts(&self) -> (u32, u32, u32) {
        (self.opened.get(), self.closing.get(), self.closed.get())
    }
}

fn mount(
    coordinator: &ModalCoordinator,
    options: ModalOptions,
    probe: &Probe,
    now: Instant,
) -> Modal {
    Modal::new(
        coordinator,
        options,
        ModalContent::text("Are you sure?"),
        probe.handlers(),
        now,
    )
}

fn esc() -> InputEvent {
    InputEvent::Key(keymap::key_esc())
}

fn render(modal: &Modal) -> Buffer {
    let mut buf = Buffer::empty(Rect::new(0, 0, 40, 12));
    modal.render_ref(buf.area, &mut buf, &Theme::default());
    buf
}

#[test]
fn full_cycle_with_short_close_delay() {
    let coordinator = ModalCoordinator::new();
    let probe = Probe::default();
    let t0 = Instant::now();
    let modal = mount(
        &coordinator,
        ModalOptions {
            close_delay: ms(300),
            ..ModalOptions::default()
        },
        &probe,
        t0,
    );

    assert_eq!(modal.phase(), ModalPhase::Opening);
    assert!(coordinator.is_modal_open());
    assert_eq!(coordinator.stack(), vec![modal.id()]);
    assert!(modal.is_hidden());
    assert_eq!(modal.next_deadline(), Some(t0 + OPEN_DELAY));

    coordinator.tick(t0 + ms(99));
    assert_eq!(probe.counts(), (0, 0, 0));
    coordinator.tick(t0 + ms(100));
    assert!(modal.is_open());
    assert_eq!(probe.counts(), (1, 0, 0));
    assert_eq!(coordinator.focused(), Some(modal.id()));

    assert!(modal.close(t0 + ms(200)));
    assert_eq!(modal.phase(), ModalPhase::Closing);
    assert_eq!(probe.counts(), (1, 1, 0));
    assert!(!coordinator.is_modal_open());
    assert!(coordinator.stack().is_empty());
    assert_eq!(coordinator.focused(), None);
    assert_eq!(coordinator.next_deadline(), Some(t0 + ms(500)));

    coordinator.tick(t0 + ms(499));
    assert_eq!(probe.counts(), (1, 1, 0));
    coordinator.tick(t0 + ms(500));
    assert_eq!(modal.phase(), ModalPhase::Closed);
    assert_eq!(probe.counts(), (1, 1, 1));

    coordinator.tick(t0 + ms(5000));
    assert_eq!(probe.counts(), (1, 1, 1));
    assert_eq!(coordinator.next_deadline(), None);
}

#[test]
fn escape_closes_only_the_topmost_modal() {
    let coordinator = ModalCoordinator::new();
    let (pa, pb) = (Probe::default(), Probe::default());
    let t0 = Instant::now();
    let a = mount(&coordinator, ModalOptions::default(), &pa, t0);
    let b = mount(&coordinator, ModalOptions::default(), &pb, t0 + ms(10));
    coordinator.tick(t0 + ms(200));
    assert!(a.is_open() && b.is_open());
    assert_eq!(coordinator.stack(), vec![b.id(), a.id()]);

    let action = coordinator.handle_event(&esc(), t0 + ms(300));
    assert_eq!(
        action,
        ModalAction::Dismissed {
            id: b.id(),
            reason: DismissReason::Escape
        }
    );
    assert_eq!(b.phase(), ModalPhase::Closing);
    assert!(a.is_open());
    assert_eq!(pa.counts(), (1, 0, 0));
    assert_eq!(coordinator.stack(), vec![a.id()]);
    assert!(coordinator.is_modal_open());

    let action = coordinator.handle_event(&esc(), t0 + ms(310));
    assert!(matches!(action, ModalAction::Dismissed { id, .. } if id == a.id()));
    assert!(!coordinator.is_modal_open());
    assert_eq!(coordinator.handle_event(&esc(), t0 + ms(320)), ModalAction::Ignored);
}

#[test]
fn escape_works_while_opening() {
    let coordinator = ModalCoordinator::new();
    let probe = Probe::default();
    let t0 = Instant::now();
    let modal = mount(&coordinator, ModalOptions::default(), &probe, t0);

    coordinator.handle_event(&esc(), t0 + ms(50));
    assert_eq!(modal.phase(), ModalPhase::Closing);
    coordinator.tick(t0 + ms(100));
    assert_eq!(probe.counts(), (0, 1, 0));
    coordinator.tick(t0 + ms(1050));
    assert_eq!(probe.counts(), (0, 1, 1));
}

#[test]
fn other_keys_are_ignored() {
    let coordinator = ModalCoordinator::new();
    let t0 = Instant::now();
    let modal = mount(&coordinator, ModalOptions::default(), &Probe::default(), t0);
    coordinator.tick(t0 + OPEN_DELAY);

    let enter = InputEvent::Key(KeyEvent::new(KeyCode::Enter));
    assert_eq!(coordinator.handle_event(&enter, t0 + ms(150)), ModalAction::Ignored);
    let ctrl_esc = InputEvent::Key(keymap::key_esc().with_modifiers(
        ratatui_overlay::input::KeyModifiers {
            ctrl: true,
            ..Default::default()
        },
    ));
    assert_eq!(coordinator.handle_event(&ctrl_esc, t0 + ms(150)), ModalAction::Ignored);
    assert!(modal.is_open());
}

#[test]
fn backdrop_click_closes_but_content_click_does_not() {
    let coordinator = ModalCoordinator::new();
    let probe = Probe::default();
    let t0 = Instant::now();
    let modal = mount(&coordinator, ModalOptions::default(), &probe, t0);
    coordinator.tick(t0 + OPEN_DELAY);
    render(&modal);
    let layout = modal.layout().unwrap();

    let inside = MouseEvent::click(layout.body.x, layout.body.y);
    assert_eq!(
        coordinator.handle_event(&InputEvent::Mouse(inside), t0 + ms(200)),
        ModalAction::Ignored
    );
    let border = MouseEvent::click(layout.content.x, layout.content.y);
    assert_eq!(
        coordinator.handle_event(&InputEvent::Mouse(border), t0 + ms(200)),
        ModalAction::Ignored
    );
    let moved = MouseEvent::new(0, 0, MouseEventKind::Moved);
    assert_eq!(
        coordinator.handle_event(&InputEvent::Mouse(moved), t0 + ms(200)),
        ModalAction::Ignored
    );
    assert!(modal.is_open());

    let backdrop = MouseEvent::click(0, 0);
    assert_eq!(
        coordinator.handle_event(&InputEvent::Mouse(backdrop), t0 + ms(210)),
        ModalAction::Dismissed {
            id: modal.id(),
            reason: DismissReason::Backdrop
        }
    );
    assert_eq!(probe.counts(), (1, 1, 0));
    assert_eq!(modal.layout(), None);
}

#[test]
fn non_fickle_modal_only_closes_through_its_button() {
    let coordinator = ModalCoordinator::new();
    let probe = Probe::default();
    let t0 = Instant::now();
    let modal = mount(
        &coordinator,
        ModalOptions {
            fickle: false,
            ..ModalOptions::default()
        },
        &probe,
        t0,
    );
    coordinator.tick(t0 + OPEN_DELAY);
    render(&modal);
    let layout = modal.layout().unwrap();

    assert_eq!(coordinator.handle_event(&esc(), t0 + ms(200)), ModalAction::Ignored);
    let backdrop = InputEvent::Mouse(MouseEvent::click(0, 0));
    assert_eq!(coordinator.handle_event(&backdrop, t0 + ms(200)), ModalAction::Ignored);
    assert!(modal.is_open());

    let button = InputEvent::Mouse(MouseEvent::click(
        layout.close_button.x,
        layout.close_button.y,
    ));
    assert_eq!(
        coordinator.handle_event(&button, t0 + ms(250)),
        ModalAction::Dismissed {
            id: modal.id(),
            reason: DismissReason::CloseButton
        }
    );
    assert_eq!(modal.phase(), ModalPhase::Closing);
}

#[test]
fn reopening_while_closing_suppresses_on_closed() {
    let coordinator = ModalCoordinator::new();
    let probe = Probe::default();
    let t0 = Instant::now();
    let modal = mount(&coordinator, ModalOptions::default(), &probe, t0);
    coordinator.tick(t0 + OPEN_DELAY);

    modal.close(t0 + ms(200));
    modal.set_open(true, t0 + ms(500));
    assert_eq!(modal.phase(), ModalPhase::Opening);
    assert!(coordinator.is_modal_open());

    coordinator.tick(t0 + ms(600));
    assert!(modal.is_open());
    coordinator.tick(t0 + ms(1200));
    assert_eq!(probe.counts(), (2, 1, 0));
}

#[test]
fn repeated_open_requests_are_idempotent() {
    let coordinator = ModalCoordinator::new();
    let probe = Probe::default();
    let t0 = Instant::now();
    let a = mount(&coordinator, ModalOptions::default(), &probe, t0);
    let b = mount(&coordinator, ModalOptions::default(), &Probe::default(), t0);
    coordinator.tick(t0 + OPEN_DELAY);
    assert_eq!(coordinator.stack(), vec![b.id(), a.id()]);

    a.open(t0 + ms(200));
    a.open(t0 + ms(210));
    assert_eq!(coordinator.stack(), vec![a.id(), b.id()]);
    assert_eq!(a.phase(), ModalPhase::Open);
    assert_eq!(probe.counts(), (1, 0, 0));

    assert!(a.close(t0 + ms(300)));
    assert!(!a.close(t0 + ms(310)));
    assert_eq!(probe.counts(), (1, 1, 0));
}

#[test]
fn unmount_cancels_pending_notifications() {
    let coordinator = ModalCoordinator::new();
    let probe = Probe::default();
    let t0 = Instant::now();
    let modal = mount(&coordinator, ModalOptions::default(), &probe, t0);
    coordinator.tick(t0 + OPEN_DELAY);
    modal.close(t0 + ms(200));
    drop(modal);

    assert_eq!(coordinator.mounted_count(), 0);
    assert_eq!(coordinator.next_deadline(), None);
    coordinator.tick(t0 + ms(5000));
    assert_eq!(probe.counts(), (1, 1, 0));
}

#[test]
fn unmounting_an_open_modal_clears_the_marker() {
    let coordinator = ModalCoordinator::new();
    let probe = Probe::default();
    let t0 = Instant::now();
    let modal = mount(&coordinator, ModalOptions::default(), &probe, t0);
    coordinator.tick(t0 + OPEN_DELAY);
    drop(modal);

    assert!(!coordinator.is_modal_open());
    assert!(coordinator.stack().is_empty());
    assert_eq!(coordinator.focused(), None);
    assert_eq!(probe.counts(), (1, 0, 0));
}

#[test]
fn start_open_skips_entry_delay_and_on_open() {
    let coordinator = ModalCoordinator::new();
    let probe = Probe::default();
    let t0 = Instant::now();
    let modal = mount(
        &coordinator,
        ModalOptions {
            open: false,
            start_open: true,
            ..ModalOptions::default()
        },
        &probe,
        t0,
    );
    assert!(modal.is_open());
    assert!(coordinator.is_modal_open());
    assert_eq!(modal.next_deadline(), None);
    coordinator.tick(t0 + ms(500));
    assert_eq!(probe.counts(), (0, 0, 0));
}

#[test]
fn closed_on_mount_stays_off_the_stack() {
    let coordinator = ModalCoordinator::new();
    let t0 = Instant::now();
    let modal = mount(
        &coordinator,
        ModalOptions {
            open: false,
            ..ModalOptions::default()
        },
        &Probe::default(),
        t0,
    );
    assert_eq!(modal.phase(), ModalPhase::Closed);
    assert!(!coordinator.is_modal_open());
    assert_eq!(coordinator.mounted_count(), 1);
    assert!(!modal.close(t0));
}

#[test]
fn options_follow_loaded_config() {
    let config = OverlayConfig::from_toml_str(
        r#"
        [modal]
        close_delay_ms = 250
        fickle = false
        bem = "Dialog"
        "#,
    )
    .unwrap();
    let coordinator = ModalCoordinator::new();
    let probe = Probe::default();
    let t0 = Instant::now();
    let modal = Modal::from_config(
        &coordinator,
        &config.modal,
        ModalContent::text("x"),
        probe.handlers(),
        t0,
    );
    coordinator.tick(t0 + OPEN_DELAY);
    assert_eq!(modal.class(), "Dialog");
    assert_eq!(modal.close_button().class, "Dialog__closebutton");
    assert_eq!(coordinator.handle_event(&esc(), t0 + ms(150)), ModalAction::Ignored);

    modal.close(t0 + ms(200));
    coordinator.tick(t0 + ms(450));
    assert_eq!(probe.counts(), (1, 1, 1));
}
