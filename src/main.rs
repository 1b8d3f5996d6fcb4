mod app;
mod handlers;
mod signal;
#[cfg(test)]
mod test_utils;
mod tui;

use anyhow::{Context, Result};
use app::{App, AppEvent};
use clap::Parser;
use crossterm::{
    event::{self as crossterm_event, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use solis::config::{self, Config};
use solis::host::{Host, ReplayFeed, UdpBridge};
use solis::ingest::{EventHub, IngestionListener, ROW_BATCH_CHANNEL};
use solis::prefs::{self, Prefs};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// Constants
const INPUT_POLL_DURATION_MS: u64 = 100;
const LOG_ENV_VAR: &str = "SOLIS_LOG";

#[derive(Parser, Debug)]
#[command(name = "solis")]
#[command(about = "A terminal viewer for live racing simulator telemetry", long_about = None)]
struct Args {
    /// UDP address to listen on (overrides config)
    #[arg(long)]
    address: Option<String>,

    /// UDP port to listen on (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Start listening immediately
    #[arg(long)]
    connect: bool,

    /// Replay a JSON-lines capture, one batch per line
    #[arg(long, value_name = "FILE")]
    replay: Option<PathBuf>,

    /// Config file (default: ~/.config/solis/config.yaml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log file (default: ~/.config/solis/solis.log)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (mut config, config_warning) = match config::load(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("{}", e.format_cargo_style());
            std::process::exit(1);
        }
    };
    apply_overrides(&mut config, &args);

    init_logging(log_path(&args, &config).as_deref());
    info!(version = env!("CARGO_PKG_VERSION"), "starting");
    if let Some(ref warning) = config_warning {
        warn!(%warning, "config ignored, using defaults");
    }

    let flush_interval = Duration::from_millis(config.flush_interval_ms);
    let hub = EventHub::new();
    let mut listener = IngestionListener::new(&hub);
    let mut bridge = UdpBridge::new(hub.emitter(ROW_BATCH_CHANNEL), flush_interval);

    let mut replay = match &args.replay {
        Some(path) => Some(
            ReplayFeed::start(path, hub.emitter(ROW_BATCH_CHANNEL), flush_interval)
                .with_context(|| format!("Failed to start replay of {}", path.display()))?,
        ),
        None => None,
    };

    let mut app = App::new(&config, Prefs::load_default());
    app.apply_event(AppEvent::RefreshDevices, &mut bridge);
    if config.auto_connect {
        app.apply_event(AppEvent::Connect, &mut bridge);
    }
    if config_warning.is_some() {
        app.set_status("Config file has errors, using defaults (see log)");
    }

    let shutdown = signal::setup_shutdown_handlers().context("Failed to install signal handlers")?;

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let res = run_app(&mut terminal, &mut app, &mut listener, &mut bridge, &shutdown);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // No merges after this point, even if the bridge flushes once more
    listener.release();
    bridge.stop_listener();
    if let Some(feed) = replay.as_mut() {
        feed.stop();
    }
    info!(rows = app.store.total_rows(), "stopped");

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(ref address) = args.address {
        config.address = address.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if args.connect {
        config.auto_connect = true;
    }
    if args.log_file.is_some() {
        config.log_file = args.log_file.clone();
    }
}

fn log_path(args: &Args, config: &Config) -> Option<PathBuf> {
    args.log_file
        .clone()
        .or_else(|| config.log_file.clone())
        .or_else(|| prefs::solis_dir().map(|dir| dir.join("solis.log")))
}

/// Send tracing output to a file; the terminal belongs to the TUI.
fn init_logging(path: Option<&Path>) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"));

    let file = path.and_then(|p| {
        if let Some(parent) = p.parent() {
            let _ = fs::create_dir_all(parent);
        }
        OpenOptions::new().create(true).append(true).open(p).ok()
    });

    match file {
        Some(file) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::sink)
                .try_init();
        }
    }
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    listener: &mut IngestionListener,
    host: &mut dyn Host,
    shutdown: &AtomicBool,
) -> Result<()> {
    loop {
        // Merge whatever the host delivered since the last frame
        let summary = listener.pump(&mut app.store);
        app.note_ingest(listener.batches_seen(), summary);

        terminal.draw(|f| {
            if let Err(e) = tui::render(f, app) {
                warn!(error = %e, "render failed");
            }
        })?;
        terminal.hide_cursor()?;

        let mut events = Vec::new();

        if crossterm_event::poll(Duration::from_millis(INPUT_POLL_DURATION_MS))? {
            match crossterm_event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    events.extend(handlers::input::handle_input_event(key, app));
                }
                Event::Mouse(mouse_event) => {
                    use crossterm_event::MouseEventKind;

                    match mouse_event.kind {
                        MouseEventKind::ScrollDown => events.push(AppEvent::RowSelectDown),
                        MouseEventKind::ScrollUp => events.push(AppEvent::RowSelectUp),
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        for event in events {
            app.apply_event(event, host);
        }

        if app.should_quit || shutdown.load(Ordering::SeqCst) {
            break;
        }
    }

    Ok(())
}
