//! RVU Tracker - a terminal form for tracking daily RVUs against a target.
//!
//! Enter how many of each exam type you have read and your daily RVU
//! threshold; totals, progress, and suggestions update as you type.
//!
//! `rvutrack --sync-assets [ORIGIN]` instead installs and activates the
//! offline asset cache for the web front-end served from ORIGIN.

mod app;
mod ui;

use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use rvutrack_core::assets::{AssetRequest, CacheStorage, HttpFetcher, OfflineWorker};
use rvutrack_core::{AppConfig, Config};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file written while the TUI owns the terminal
const LOG_FILE: &str = "rvutrack.log";

fn env_filter() -> EnvFilter {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Log to stderr, for commands that do not take over the terminal.
fn init_stderr_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter())
        .init();
}

/// Log to a file in `log_dir`, since stderr would draw over the TUI.
/// The returned guard flushes the log when dropped.
fn init_file_tracing(log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;
    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(env_filter())
        .init();
    Ok(guard)
}

fn load_config() -> Result<(Config, AppConfig)> {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: {}; using defaults", e);
            Config::default()
        }
    };
    let app_config = config
        .clone()
        .into_app_config()
        .context("Invalid configuration")?;
    Ok((config, app_config))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let (config, app_config) = load_config()?;

    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h") {
        print_usage();
        return Ok(());
    }
    if args.len() > 1 && args[1] == "--sync-assets" {
        init_stderr_tracing();
        return sync_assets(&app_config, args.get(2).map(|s| s.as_str())).await;
    }

    let log_dir = config
        .cache_dir()
        .unwrap_or_else(|_| std::path::PathBuf::from("./cache"));
    let _log_guard = init_file_tracing(&log_dir)?;
    info!(exams = app_config.catalog.len(), "RVU Tracker starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&app_config);
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("RVU Tracker shutting down");
    Ok(())
}

fn print_usage() {
    println!("Usage:");
    println!("  rvutrack                        Open the RVU tracker");
    println!("  rvutrack --sync-assets [ORIGIN] Cache the web front-end for offline use");
    println!();
    println!("Configuration is read from {} or $RVUTRACK_CONFIG.",
        Config::config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| "~/.config/rvutrack/config.json".to_string()));
}

/// Install and activate the offline cache against `origin` (or the
/// configured `asset_origin`), then list what is cached and when.
async fn sync_assets(config: &AppConfig, origin: Option<&str>) -> Result<()> {
    let origin = origin
        .map(|s| s.to_string())
        .or_else(|| config.cache.origin.clone())
        .context("No origin given; pass one after --sync-assets or set asset_origin in the config")?;

    let fetcher = HttpFetcher::new(&origin).context("Invalid asset origin")?;
    let storage = match config.cache.storage_dir {
        Some(ref dir) => CacheStorage::open_dir(dir)
            .with_context(|| format!("Failed to open cache directory {}", dir.display()))?,
        None => {
            warn!("No cache directory available, cache will not persist");
            CacheStorage::in_memory()
        }
    };

    let mut worker = OfflineWorker::new(&config.cache, fetcher, storage);
    eprintln!("Caching {} assets from {}...", config.cache.manifest.len(), origin);
    worker
        .start()
        .await
        .context("Failed to install offline cache")?;

    for path in &config.cache.manifest {
        let request = AssetRequest::get(path);
        if let Some(cached) = worker.storage().entry(worker.version(), &request).await {
            println!("{:<40} {}", request.cache_key(), cached.age_display());
        }
    }
    let stored = worker.storage().entries(worker.version()).await.len();
    eprintln!("Done! Cache generation {} is active with {} entries.", worker.version(), stored);
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ignore key release events on platforms that report them
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key) {
                    return Ok(());
                }
            }
        }

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
