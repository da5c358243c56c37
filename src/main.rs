// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tokio::sync::mpsc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod app;
mod config;
mod data;
mod events;
mod poll;
mod ui;

use api::{Backend, HttpBackend};
use app::App;
use config::Settings;
use poll::{apply_event, PollEvent, Poller};
use ui::Theme;

#[derive(Parser, Debug)]
#[command(name = "pulsewatch")]
#[command(about = "Terminal dashboard for the pulsewatch uptime monitor")]
struct Args {
    /// Base URL of the monitoring backend
    #[arg(short, long)]
    url: Option<String>,

    /// Refresh interval in seconds
    #[arg(short, long)]
    refresh: Option<u64>,

    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Append logs to this file. The TUI owns the terminal, so logging
    /// stays off unless a sink is given.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(ref path) = args.log_file {
        init_logging(path)?;
    }

    let mut settings = Settings::load(args.config.as_deref())?;

    // CLI flags override file and environment settings
    if let Some(url) = args.url {
        settings.base_url = url;
    }
    if let Some(refresh) = args.refresh {
        settings.refresh_secs = refresh;
    }

    run_dashboard(settings)
}

/// Route tracing output to a file; stdout belongs to the TUI.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "pulsewatch=info".into());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::sync::Mutex::new(file)).with_ansi(false))
        .init();

    Ok(())
}

/// Wire up the runtime, backend client, and poller, then hand the
/// terminal to the run loop.
fn run_dashboard(settings: Settings) -> Result<()> {
    tracing::info!(
        base_url = %settings.base_url,
        refresh_secs = settings.refresh_secs,
        "starting dashboard"
    );

    // The TUI runs synchronously on this thread; fetch cycles run on the
    // runtime and come back through the event channel
    let runtime = tokio::runtime::Runtime::new()?;

    let http = HttpBackend::new(&settings.base_url, settings.request_timeout())
        .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {}", e))?;
    let backend: Arc<dyn Backend> = Arc::new(http);

    let (events_tx, mut events_rx) = mpsc::channel(64);
    let poller = Poller::new(
        backend,
        runtime.handle().clone(),
        events_tx,
        settings.fetch_windows(),
    );

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

    let mut app = App::new(&settings.base_url, Theme::auto_detect());

    let result = run_app(
        &mut terminal,
        &mut app,
        &poller,
        &mut events_rx,
        settings.refresh_interval(),
    );

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

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    poller: &Poller,
    events_rx: &mut mpsc::Receiver<PollEvent>,
    refresh_interval: Duration,
) -> Result<()> {
    // Initial load: overview and alerts; the first overview selects a
    // target and that pulls in its timeseries
    poller.request_tick(app.selected());
    let mut last_refresh = Instant::now();

    while app.running {
        // Apply every completed fetch cycle before drawing
        while let Ok(event) = events_rx.try_recv() {
            apply_event(app, poller, event);
        }

        // Draw UI
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Poll for input with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, poller, key),
                Event::Mouse(mouse) => {
                    // Hit-test against the same layout the frame used
                    let size = terminal.size()?;
                    let chunks = ui::layout_chunks(Rect::new(0, 0, size.width, size.height));
                    events::handle_mouse_event(app, poller, mouse, chunks[1]);
                }
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Auto-refresh periodically
        if last_refresh.elapsed() >= refresh_interval {
            poller.request_tick(app.selected());
            last_refresh = Instant::now();
        }
    }

    Ok(())
}
