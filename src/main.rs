// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::io;
use std::path::PathBuf;
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
use tracing_subscriber::EnvFilter;

mod app;
mod config;
mod data;
mod error;
mod events;
mod metric;
mod poll;
mod ui;

use app::{App, View};
use config::AppConfig;
use metric::MetricClient;

#[derive(Parser, Debug)]
#[command(name = "daqwatch")]
#[command(about = "Diagnostic TUI for monitoring detector DAQ metrics and run state")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Monitoring server endpoint, e.g. http://daq.local:5000
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Sampling step for metric queries, in seconds
    #[arg(short, long)]
    step: Option<u64>,

    /// Poll interval in seconds
    #[arg(short, long)]
    refresh: Option<u64>,

    /// Query window span in seconds
    #[arg(long)]
    span: Option<u64>,

    /// HTTP request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(endpoint) = args.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(step) = args.step {
        config.step = step;
    }
    if let Some(refresh) = args.refresh {
        config.refresh = refresh;
    }
    if let Some(span) = args.span {
        config.span = span;
    }
    if let Some(timeout) = args.timeout {
        config.timeout = timeout;
    }

    tracing::info!("starting daqwatch against {}", config.endpoint);

    // The pollers run on this runtime; the TUI stays on the main thread
    let runtime = tokio::runtime::Runtime::new()?;

    let client = MetricClient::builder()
        .endpoint(config.endpoint_base())
        .timeout(Duration::from_secs(config.timeout))
        .build();

    let app = App::new(config, client, runtime.handle().clone());

    run_tui(app)
}

/// Log to a file so the alternate screen stays clean. Controlled with
/// `DAQWATCH_LOG` (an EnvFilter directive, default "info").
fn init_tracing() {
    let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("daqwatch.log")
    else {
        return;
    };

    let filter = EnvFilter::try_from_env("DAQWATCH_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

/// Run the TUI with the given application state
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

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

    // Stop the pollers before tearing the terminal down
    app.shutdown();

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
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        // Pull any results the pollers have published
        app.drain();

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
                let centered = ratatui::layout::Rect::new(0, area.height / 2 - 2, area.width, 5);
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

            // Render header
            ui::common::render_header(frame, app, chunks[0]);

            // Render tabs
            ui::common::render_tabs(frame, app, chunks[1]);

            // Render current view
            match app.current_view {
                View::Horizon | View::Network => ui::horizon::render(frame, app, chunks[2]),
                View::Crates => ui::crates::render(frame, app, chunks[2]),
                View::Files => ui::files::render(frame, app, chunks[2]),
                View::Settings => ui::settings::render(frame, app, chunks[2]),
                View::Scatter => ui::scatter::render(frame, app, chunks[2]),
            }

            // Render status bar
            ui::common::render_status_bar(frame, app, chunks[3]);

            // Render help overlay if active
            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }
    }

    Ok(())
}
