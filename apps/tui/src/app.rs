//! Core TUI application state and event loop.

use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use limitrofe_core::{LoadStatus, LoadTicket, ResultDisplay, Session, session_from_config};
use limitrofe_shared::{LoadConfig, Result as LimitrofeResult, load_config};
use limitrofe_source::{FetchOptions, Source};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use tokio::runtime::Runtime;
use tracing::info;

use crate::widgets::{NeighborPanel, SearchSelect, centered_rect, status_bar};

/// A finished fetch, tagged with the load it belongs to.
type Completion = (LoadTicket, LimitrofeResult<String>);

/// Application state.
pub(crate) struct App {
    session: Session,
    source: Source,
    opts: FetchOptions,
    selector: SearchSelect,
    panel: NeighborPanel,
    /// Whether the app should quit.
    should_quit: bool,
    /// Status message shown in bottom bar.
    status: String,
    /// Whether help overlay is visible.
    show_help: bool,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl App {
    pub(crate) fn new(session: Session, source: Source, opts: FetchOptions) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            session,
            source,
            opts,
            selector: SearchSelect::new(),
            panel: NeighborPanel::new(),
            should_quit: false,
            status: "Carregando — F1 para ajuda".to_string(),
            show_help: false,
            tx,
            rx,
        }
    }

    /// Start a (re)load on the runtime. Completions of older loads are
    /// dropped by the session when they arrive.
    fn start_load(&mut self, runtime: &Runtime) {
        let ticket = self.session.begin_load(&mut self.selector);
        self.panel.clear();
        self.status = format!("Carregando {}…", self.source);

        let source = self.source.clone();
        let opts = self.opts.clone();
        let tx = self.tx.clone();
        runtime.spawn(async move {
            let fetched = limitrofe_source::fetch(&source, &opts).await;
            // The receiver only goes away when the app is shutting down.
            let _ = tx.send((ticket, fetched));
        });
    }

    /// Apply any finished fetches.
    fn poll_loads(&mut self) {
        while let Ok((ticket, fetched)) = self.rx.try_recv() {
            match self.session.complete_load(ticket, fetched, &mut self.selector) {
                LoadStatus::Ready { entities, .. } => {
                    self.status = format!("{entities} municípios — Enter seleciona, F1 ajuda");
                    let view = self.session.select("");
                    self.panel.show(&view);
                }
                LoadStatus::Failed(failure) => {
                    self.status = format!("{}: {}", failure.kind, failure.message);
                }
                LoadStatus::Stale => {}
            }
        }
    }

    /// Report the highlighted entry as the new selection.
    fn choose(&mut self) {
        let Some(value) = self.selector.choose() else {
            return;
        };
        info!(selected = %value, "municipality selected");
        let view = self.session.select(&value);
        self.panel.set_subject(&value);
        self.panel.show(&view);
    }
}

/// Entry point: sets up terminal, runs event loop, restores terminal.
pub(crate) fn run() -> Result<()> {
    let config = load_config()?;
    let load = LoadConfig::from(&config);
    let (session, source, opts) = session_from_config(&load, config.display.clone())?;
    let runtime = Runtime::new()?;

    // Setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let mut app = App::new(session, source, opts);
    let result = run_app(&mut terminal, &mut app, &runtime);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    runtime.shutdown_timeout(Duration::from_millis(100));
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    runtime: &Runtime,
) -> Result<()> {
    app.start_load(runtime);

    loop {
        app.poll_loads();
        terminal.draw(|f| draw(f, app))?;

        // Poll for events with 100ms timeout for responsive UI
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, runtime, key.code, key.modifiers);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_key(app: &mut App, runtime: &Runtime, code: KeyCode, modifiers: KeyModifiers) {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);

    // Global keybindings (always active)
    match code {
        KeyCode::Char('c') | KeyCode::Char('q') if ctrl => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('r') if ctrl => {
            app.start_load(runtime);
            return;
        }
        KeyCode::F(1) => {
            app.show_help = !app.show_help;
            return;
        }
        _ => {}
    }

    // If help is showing, consume any key to dismiss
    if app.show_help {
        app.show_help = false;
        return;
    }

    match code {
        KeyCode::Esc if app.selector.query().is_empty() => app.should_quit = true,
        KeyCode::Esc => app.selector.clear_query(),
        KeyCode::Enter => app.choose(),
        KeyCode::Up => app.selector.move_up(1),
        KeyCode::Down => app.selector.move_down(1),
        KeyCode::PageUp => app.selector.page_up(),
        KeyCode::PageDown => app.selector.page_down(),
        KeyCode::Backspace => app.selector.pop_char(),
        KeyCode::Char(c) if !ctrl => app.selector.push_char(c),
        _ => {}
    }
}

fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            "Municípios limítrofes",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  [{}]", app.session.state().name())),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Limitrofe "),
    );
    f.render_widget(title, chunks[0]);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    app.selector.draw(f, content[0]);
    app.panel.draw(f, content[1]);

    // Status bar
    let bar = status_bar(&app.status);
    f.render_widget(bar, chunks[2]);

    // Help overlay
    if app.show_help {
        draw_help_overlay(f);
    }
}

fn draw_help_overlay(f: &mut Frame) {
    let area = centered_rect(60, 60, f.area());

    let help_text = vec![
        Line::from("Keybindings").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from(""),
        Line::from("  type         Filter municipalities"),
        Line::from("  ↑/↓ PgUp/Dn  Navigate list"),
        Line::from("  Enter        Select municipality"),
        Line::from("  Backspace    Edit filter"),
        Line::from("  Esc          Clear filter / quit"),
        Line::from("  Ctrl-R       Reload dataset"),
        Line::from("  F1           Toggle this help"),
        Line::from("  Ctrl-C       Quit"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help — press any key to close ")
                .style(Style::default().bg(Color::DarkGray)),
        )
        .style(Style::default().fg(Color::White).bg(Color::DarkGray));

    // Clear background
    f.render_widget(ratatui::widgets::Clear, area);
    f.render_widget(help, area);
}
