//! Executives TUI - Terminal User Interface for browsing organization executives.
//!
//! Main entry point and event loop for the application.

mod app;
mod config;
mod executives;
mod fetcher;
mod logging;
mod opener;
mod ui;

use app::{App, RetryPolicy, Tab, ViewKind};
use config::Config;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use executives::ExecutivesClient;
use fetcher::{FetchEvent, Fetcher};
use opener::open_url;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use ui::ContactLink;

/// Screen regions, kept between frames for mouse hit-testing.
#[derive(Debug, Clone, Copy, Default)]
struct ScreenAreas {
    tabs: Rect,
    body: Rect,
    status: Rect,
}

impl ScreenAreas {
    fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Tabs
                Constraint::Min(0),    // Executives
                Constraint::Length(3), // Status bar
            ])
            .split(area);
        Self {
            tabs: chunks[0],
            body: chunks[1],
            status: chunks[2],
        }
    }
}

/// Main application entry point.
///
/// # Returns
/// * `Result<()>` - Success or error
///
/// # Details
/// Loads configuration, sets up logging and the terminal, starts the first
/// fetch, and runs the event loop.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load(None)?;
    let _log_guard = logging::init_tui_logging(config.log_file.as_deref());

    let client = match ExecutivesClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!(
                "Config file location: {}",
                Config::default_config_path()?.display()
            );
            return Err(e);
        }
    };
    tracing::info!(api_url = %config.api_url, "starting exec-tui");

    let (mut fetcher, mut events) = Fetcher::new(client);
    let mut app = App::new(
        RetryPolicy::from_config(&config),
        config.placeholder_image_url.clone(),
    );
    fetcher.execute(app.mount());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &mut fetcher, &mut events).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = %e, "event loop failed");
    }
    result
}

/// Render the complete UI.
///
/// # Details
/// Tabs on top, then exactly one of the loading, error, empty, or grid views,
/// then the status bar.
fn render_ui(f: &mut ratatui::Frame, app: &App, areas: &ScreenAreas) {
    let buf = f.buffer_mut();
    ui::render_tabs(app, areas.tabs, buf);

    match app.view_kind() {
        ViewKind::Loading => ui::render_loading(areas.body, buf),
        ViewKind::Error => {
            let message = app
                .state
                .error
                .as_ref()
                .map(|e| e.user_message())
                .unwrap_or_default();
            ui::render_error(&message, areas.body, buf);
        }
        ViewKind::Empty => ui::render_empty(app.state.year_range, areas.body, buf),
        ViewKind::Grid => ui::render_grid(app, areas.body, buf),
    }

    ui::render_status_bar(app, areas.status, buf);
}

/// Main event loop.
///
/// # Arguments
/// * `terminal` - Terminal instance
/// * `app` - Application state
/// * `fetcher` - Executes commands returned by the application state
/// * `events` - Progress events from the fetcher
///
/// # Returns
/// * `Result<()>` - Success or error
///
/// # Details
/// Each iteration draws a frame, applies pending fetcher events, and waits up
/// to 100ms for keyboard or mouse input.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    fetcher: &mut Fetcher,
    events: &mut UnboundedReceiver<FetchEvent>,
) -> anyhow::Result<()> {
    let mut areas = ScreenAreas::default();

    loop {
        terminal.draw(|f| {
            areas = ScreenAreas::new(f.area());
            render_ui(f, app, &areas);
        })?;
        app.grid_columns = ui::columns_for(areas.body.width.saturating_sub(2));

        while let Ok(event) = events.try_recv() {
            if let Some(command) = app.handle_fetch_event(event) {
                fetcher.execute(command);
            }
        }

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        match event::read()? {
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => break,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                    KeyCode::Char('c') => select_tab(app, fetcher, Tab::Current),
                    KeyCode::Char('p') => select_tab(app, fetcher, Tab::Past),
                    KeyCode::Char('r') if app.view_kind() == ViewKind::Error => {
                        fetcher.execute(app.retry());
                    }
                    code if app.view_kind() == ViewKind::Grid => match code {
                        KeyCode::Left | KeyCode::Char('h') => app.move_left(),
                        KeyCode::Right | KeyCode::Char('l') => app.move_right(),
                        KeyCode::Up | KeyCode::Char('k') => app.move_up(),
                        KeyCode::Down | KeyCode::Char('j') => app.move_down(),
                        KeyCode::Enter | KeyCode::Char('m') => open_contact(app, false),
                        KeyCode::Char('i') => open_contact(app, true),
                        _ => {}
                    },
                    _ => {}
                }
            }
            Event::Mouse(mouse) => handle_mouse_event(mouse, app, fetcher, &areas),
            _ => {}
        }
    }

    Ok(())
}

fn select_tab(app: &mut App, fetcher: &mut Fetcher, tab: Tab) {
    if let Some(command) = app.select_tab(tab) {
        fetcher.execute(command);
    }
}

/// Open the selected executive's mail or LinkedIn link.
///
/// # Arguments
/// * `app` - Application state
/// * `linkedin` - Open LinkedIn instead of mail
///
/// # Details
/// The outcome is reported in the status bar; failures are never fatal.
fn open_contact(app: &mut App, linkedin: bool) {
    let Some(executive) = app.selected_executive() else {
        return;
    };

    let link = ui::contact_links(executive)
        .into_iter()
        .find(|link| matches!(link, ContactLink::LinkedIn(_)) == linkedin);

    let message = match link {
        Some(link) => match open_url(link.url()) {
            Ok(()) => format!("Opened {} for {}", link.label(), executive.name),
            Err(e) => {
                tracing::warn!(error = %e, "failed to open contact link");
                format!("Failed to open {}: {}", link.label(), e)
            }
        },
        None => format!("{} has no LinkedIn profile", executive.name),
    };
    app.set_status(message);
}

/// Handle mouse events (scroll and click).
///
/// # Arguments
/// * `mouse` - Mouse event
/// * `app` - Application state
/// * `fetcher` - Executes commands returned by the application state
/// * `areas` - Screen regions from the last frame
///
/// # Details
/// Clicks select tabs, press the retry button, or select cards; scrolling
/// moves the selection by one row.
fn handle_mouse_event(mouse: MouseEvent, app: &mut App, fetcher: &mut Fetcher, areas: &ScreenAreas) {
    let view = app.view_kind();
    match mouse.kind {
        MouseEventKind::ScrollUp if view == ViewKind::Grid => app.move_up(),
        MouseEventKind::ScrollDown if view == ViewKind::Grid => app.move_down(),
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(tab) = ui::tab_at(areas.tabs, mouse.column, mouse.row) {
                select_tab(app, fetcher, tab);
                return;
            }

            match view {
                ViewKind::Error => {
                    let button = ui::retry_button_area(areas.body);
                    if button.contains((mouse.column, mouse.row).into()) {
                        fetcher.execute(app.retry());
                    }
                }
                ViewKind::Grid => {
                    let len = app.state.executives.len();
                    let layout = ui::GridLayout::new(areas.body, len, app.selected_index);
                    if let Some(index) = layout.index_at(len, mouse.column, mouse.row) {
                        app.select(index);
                    }
                }
                ViewKind::Loading | ViewKind::Empty => {}
            }
        }
        _ => {}
    }
}
