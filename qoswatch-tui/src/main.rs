// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};

mod app;
mod config;
mod control;
mod data;
mod events;
mod source;
mod ui;

use app::{App, View};
use config::DashboardConfig;
use control::ControlHandle;
use qoswatch_client::SimulatorClient;
use source::{DataSource, EventSource, FileSource, HttpSource};

#[derive(Parser, Debug)]
#[command(name = "qoswatch")]
#[command(about = "Diagnostic TUI for monitoring a packet-scheduler simulation backend")]
struct Args {
    /// Backend HTTP endpoint (e.g. http://127.0.0.1:5432)
    #[arg(long, conflicts_with = "file")]
    endpoint: Option<String>,

    /// Event feed address for packet_status push events (host:port)
    #[arg(long, conflicts_with = "file")]
    events: Option<String>,

    /// Replay a recorded metrics snapshot file instead of a live backend
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Path to a config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Poll interval in seconds
    #[arg(short, long)]
    refresh: Option<u64>,

    /// Samples kept per chart series
    #[arg(short, long)]
    window: Option<usize>,

    /// Export metrics from a replay file to JSON and exit
    #[arg(short, long, requires = "file")]
    export: Option<PathBuf>,

    /// Write tracing diagnostics to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(ref path) = args.log_file {
        init_tracing(path)?;
    }

    let mut config = DashboardConfig::load(args.config.as_deref())?;
    if let Some(endpoint) = args.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(events) = args.events {
        config.events = Some(events);
    }
    if let Some(refresh) = args.refresh {
        config.refresh_secs = refresh;
    }
    if let Some(window) = args.window {
        config.window = window;
    }

    // Handle export mode (non-interactive)
    if let Some(ref export_path) = args.export {
        let file = args.file.as_ref().expect("clap enforces --file with --export");
        return export_from_file(file, export_path, &config);
    }

    // Handle replay mode
    if let Some(ref path) = args.file {
        let source = Box::new(FileSource::new(path));
        let app = App::new(source, &config);
        return run_tui(app);
    }

    run_live(&config)
}

/// Run against a live backend: HTTP poller, event feed, control executor.
fn run_live(config: &DashboardConfig) -> Result<()> {
    // The TUI loop runs on this thread; the runtime drives the background
    // tasks and must outlive it.
    let rt = tokio::runtime::Runtime::new()?;

    let client = SimulatorClient::builder()
        .endpoint(&config.endpoint)
        .build();

    let refresh = Duration::from_secs(config.refresh_secs.max(1));
    let events_addr = config.events.clone();

    let (source, events, control) = rt.block_on(async {
        let source = Box::new(HttpSource::spawn(client.clone(), refresh)) as Box<dyn DataSource>;
        let control = ControlHandle::spawn(client.clone());

        let events = match events_addr {
            Some(ref addr) => match EventSource::connect(addr).await {
                Ok(feed) => Some(feed),
                Err(e) => {
                    eprintln!("Warning: event feed {} unavailable: {}", addr, e);
                    None
                }
            },
            None => None,
        };

        (source, events, control)
    });

    let mut app = App::new(source, config).with_control(control);
    if let Some(events) = events {
        app = app.with_events(events);
    }

    run_tui(app)
}

/// Run the TUI main loop with the given app.
fn run_tui(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 16;

    while app.running {
        // Fold in everything the background tasks delivered
        app.tick();

        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered =
                    ratatui::layout::Rect::new(0, (area.height / 2).saturating_sub(2), area.width, 5);
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);

            match app.current_view {
                View::Overview => ui::overview::render(frame, app, chunks[2]),
                View::Traffic => ui::traffic::render(frame, app, chunks[2]),
                View::Streams => ui::streams::render(frame, app, chunks[2]),
            }

            ui::common::render_status_bar(frame, app, chunks[3]);

            // Render overlays if active
            if app.dialog.is_some() {
                ui::dialog::render_overlay(frame, app, area);
            }
            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }
    }

    Ok(())
}

/// Export metrics from a replay file without entering the TUI.
fn export_from_file(file: &Path, export_path: &Path, config: &DashboardConfig) -> Result<()> {
    let source = Box::new(FileSource::new(file));
    let mut app = App::new(source, config);
    app.tick();

    if let Some(ref err) = app.load_error {
        anyhow::bail!("failed to load {}: {}", file.display(), err);
    }

    app.export_state(export_path)?;
    println!("Exported metrics to: {}", export_path.display());
    Ok(())
}

fn init_tracing(path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    tracing_subscriber::fmt()
        .with_writer(std::sync::Arc::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    Ok(())
}
