use anyhow::Context;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Constraint;
use ratatui::layout::Direction;
use ratatui::layout::Layout;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::text::Text;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Paragraph;
use ratatui_overlay::config::OverlayConfig;
use ratatui_overlay::crossterm_input::input_event_from_crossterm;
use ratatui_overlay::hover::HoverTracker;
use ratatui_overlay::input::InputEvent;
use ratatui_overlay::input::KeyCode;
use ratatui_overlay::laggy::LaggyState;
use ratatui_overlay::modal::Modal;
use ratatui_overlay::modal::ModalAction;
use ratatui_overlay::modal::ModalContent;
use ratatui_overlay::modal::ModalCoordinator;
use ratatui_overlay::modal::ModalHandlers;
use ratatui_overlay::modal::ModalOptions;
use ratatui_overlay::scroll_edge::ScrollEdgeDetector;
use ratatui_overlay::scroll_edge::ScrollEdgeOptions;
use ratatui_overlay::short_state::ShortState;
use ratatui_overlay::theme::Theme;
use ratatui_overlay::timer;
use ratatui_overlay::viewport::ViewportState;
use std::cell::RefCell;
use std::fs::File;
use std::io;
use std::rc::Rc;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;

const CONFIG_PATH: &str = "ratatui-overlay.toml";
const LOG_PATH: &str = "ratatui-overlay-demo.log";
const FRAME: Duration = Duration::from_millis(50);

struct App {
    coordinator: ModalCoordinator,
    confirm: Modal,
    details: Option<Modal>,
    events: Rc<RefCell<ShortState<String>>>,
    dimmed: LaggyState<bool>,
    body: Rect,
    viewport: ViewportState,
    edges: ScrollEdgeDetector,
    hover: HoverTracker,
    lines: Vec<Line<'static>>,
}

impl App {
    fn new(config: &OverlayConfig, now: Instant) -> Self {
        let coordinator = ModalCoordinator::new();
        let events: Rc<RefCell<ShortState<String>>> = Rc::new(RefCell::new(ShortState::new()));

        let confirm = Modal::new(
            &coordinator,
            ModalOptions {
                open: false,
                ..ModalOptions::from(&config.modal)
            },
            ModalContent::render(|_| {
                Text::from(vec![
                    Line::from("Discard the draft?"),
                    Line::from(""),
                    Line::from("Esc or a click outside dismisses this dialog."),
                    Line::from("Press n to stack another one on top."),
                ])
            }),
            flash_handlers(&events, "confirm"),
            now,
        );

        let lines = (1..=200)
            .map(|n| Line::from(format!("{n:>4}  background row")))
            .collect();

        Self {
            coordinator,
            confirm,
            details: None,
            events,
            dimmed: LaggyState::new(false, Duration::from_millis(300)),
            body: Rect::default(),
            viewport: ViewportState::default(),
            edges: ScrollEdgeDetector::new(ScrollEdgeOptions::from(&config.scroll_edge)),
            hover: HoverTracker::new(),
            lines,
        }
    }

    fn open_details(&mut self, config: &OverlayConfig, now: Instant) {
        if let Some(details) = &self.details {
            details.open(now);
            return;
        }
        self.details = Some(Modal::new(
            &self.coordinator,
            ModalOptions {
                fickle: false,
                body_wrap: true,
                modifier: "details".into(),
                ..ModalOptions::from(&config.modal)
            },
            ModalContent::text("Only the close button dismisses this one."),
            flash_handlers(&self.events, "details"),
            now,
        ));
    }

    fn next_deadline(&self) -> Option<Instant> {
        timer::earliest([
            self.coordinator.next_deadline(),
            self.events.borrow().next_deadline(),
            self.dimmed.next_deadline(),
            self.edges.next_deadline(),
        ])
    }

    fn tick(&mut self, now: Instant) {
        self.coordinator.tick(now);
        // Lags behind the modal-open marker.
        let open = self.coordinator.is_modal_open();
        if *self.dimmed.next() != open {
            self.dimmed.set(open, now);
        }
        self.events.borrow_mut().tick(now);
        self.dimmed.tick(now);
        self.edges.tick(now);
    }
}

fn flash_handlers(events: &Rc<RefCell<ShortState<String>>>, name: &'static str) -> ModalHandlers {
    ModalHandlers::new(flash(events, name, "closed"))
        .on_open(flash(events, name, "open"))
        .on_close(flash(events, name, "close"))
}

fn flash(
    events: &Rc<RefCell<ShortState<String>>>,
    name: &'static str,
    what: &'static str,
) -> impl FnMut() + 'static {
    let events = events.clone();
    move || {
        tracing::info!(modal = name, what, "modal event");
        events
            .borrow_mut()
            .set(format!("{name}: {what}"), Duration::from_secs(2), Instant::now());
    }
}

fn init_tracing() -> anyhow::Result<()> {
    let file = File::create(LOG_PATH).with_context(|| format!("creating {LOG_PATH}"))?;
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_tracing()?;
    let config = OverlayConfig::load(CONFIG_PATH).context("loading overlay config")?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run(&mut terminal, &config);

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &OverlayConfig,
) -> anyhow::Result<()> {
    let theme = Theme::default();
    let mut app = App::new(config, Instant::now());

    loop {
        let now = Instant::now();
        app.tick(now);

        terminal.draw(|f| {
            let area = f.area();
            let [body, status] = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .areas(area);

            app.viewport.set_viewport(body.width.saturating_sub(2), body.height.saturating_sub(2));
            app.viewport.set_content(40, app.lines.len() as u32);
            app.edges.observe(&app.viewport, now);

            let border = if app.hover.is_hovering() && !*app.dimmed.current() {
                theme.accent
            } else {
                theme.text_muted
            };
            let list = Paragraph::new(app.lines.clone())
                .block(
                    Block::default()
                        .title("o: open  n: stack  j/k: scroll  q: quit")
                        .borders(Borders::ALL)
                        .border_style(border),
                )
                .scroll((app.viewport.y.min(u16::MAX as u32) as u16, 0));
            f.render_widget(list, body);
            app.body = body;

            let edges = app.edges.at();
            let mut parts = vec![format!(
                "top: {}  bottom: {}  stack: {}",
                edges.start,
                edges.end,
                app.coordinator.depth()
            )];
            if *app.dimmed.current() {
                parts.push("modal open".to_string());
            }
            if let Some(event) = app.events.borrow().get() {
                parts.push(event.clone());
            }
            f.render_widget(
                Paragraph::new(parts.join("  |  ")).style(theme.text_muted),
                status,
            );

            app.confirm.render_ref(area, f.buffer_mut(), &theme);
            if let Some(details) = &app.details {
                details.render_ref(area, f.buffer_mut(), &theme);
            }
        })?;

        let timeout = app
            .next_deadline()
            .map(|at| at.saturating_duration_since(Instant::now()))
            .unwrap_or(FRAME)
            .min(FRAME);
        if !crossterm::event::poll(timeout)? {
            continue;
        }

        let Some(event) = input_event_from_crossterm(crossterm::event::read()?) else {
            continue;
        };
        let now = Instant::now();

        if let ModalAction::Dismissed { id, reason } = app.coordinator.handle_event(&event, now) {
            tracing::debug!(id = id.get(), ?reason, "dismissed");
        } else {
            match event {
                InputEvent::Key(key) if key.code == KeyCode::Char('n') => {
                    app.open_details(config, now);
                }
                _ if app.coordinator.is_modal_open() => {}
                InputEvent::Key(key) => match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Char('o') => app.confirm.open(now),
                    KeyCode::Char('j') | KeyCode::Down => app.viewport.scroll_y_by(1),
                    KeyCode::Char('k') | KeyCode::Up => app.viewport.scroll_y_by(-1),
                    KeyCode::PageDown => app.viewport.scroll_y_by(10),
                    KeyCode::PageUp => app.viewport.scroll_y_by(-10),
                    KeyCode::Home => app.viewport.to_top(),
                    KeyCode::End => app.viewport.to_bottom(),
                    _ => {}
                },
                InputEvent::Mouse(m) => {
                    app.hover.handle_mouse(app.body, &m);
                }
                InputEvent::Paste(_) => {}
            }
        }
    }
}
