use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use ratatui::crossterm::event;
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use paperlens_core::Session;

mod action;
mod app;
mod backend;
mod config;
mod input;
mod model;
mod theme;
mod tui_event;
mod view;

use app::App;
use model::picker::FilePicker;

/// PaperLens TUI: upload research papers, browse the library, compare papers.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// PDF files to pre-select for upload
    pdf_paths: Vec<PathBuf>,

    /// Directory the upload picker lists PDFs from
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Path to the config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for the log file
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

/// Log to a daily rolling file; the terminal belongs to the UI.
fn init_logging(log_dir: &Path) -> anyhow::Result<tracing_appender::non_blocking::WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("cannot create log directory {}", log_dir.display()))?;
    let appender = tracing_appender::rolling::daily(log_dir, "paperlens-tui.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter =
        EnvFilter::try_from_env("PAPERLENS_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(guard)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Validate any PDF paths provided on the command line
    for path in &args.pdf_paths {
        if !path.exists() {
            anyhow::bail!("PDF file not found: {}", path.display());
        }
    }

    let file_config = match args.config.clone().or_else(config::default_config_path) {
        Some(path) => config::load(&path)?,
        None => config::ConfigFile::default(),
    };

    // Resolve config from CLI flags > env vars > config file > defaults
    let upload_dir = args
        .dir
        .or_else(|| std::env::var("PAPERLENS_UPLOAD_DIR").ok().map(PathBuf::from))
        .or(file_config.upload_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    let log_dir = args
        .log_dir
        .or_else(|| std::env::var("PAPERLENS_LOG_DIR").ok().map(PathBuf::from))
        .or(file_config.log_dir)
        .unwrap_or_else(config::default_log_dir);

    let _log_guard = init_logging(&log_dir)?;
    log::info!("starting; upload dir {}", upload_dir.display());

    let mut picker = FilePicker::scan(&upload_dir)
        .with_context(|| format!("cannot list {}", upload_dir.display()))?;
    picker.preselect(&args.pdf_paths);

    let session = Session::new();
    let max_chars = session.limits().max_text_chars;
    let mut app = App::new(session, picker);

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Install panic hook that restores terminal before printing panic
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(panic_info);
    }));

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    let (tx, mut rx) = mpsc::unbounded_channel();

    // Main event loop
    let tick_rate = Duration::from_millis(100);

    loop {
        // Draw
        terminal.draw(|f| app.view(f))?;

        // Launch extraction for a freshly requested upload batch
        if let Some(paths) = app.take_upload_request() {
            log::info!("upload batch of {} file(s)", paths.len());
            let tx = tx.clone();
            tokio::spawn(async move {
                backend::run_batch(paths, max_chars, tx).await;
            });
        }

        tokio::select! {
            // Backend events (non-blocking drain)
            Some(backend_event) = rx.recv() => {
                app.handle_backend_event(backend_event);
                // Drain any additional queued backend events
                while let Ok(evt) = rx.try_recv() {
                    app.handle_backend_event(evt);
                }
            }
            // Terminal input events
            _ = async {
                if event::poll(tick_rate).unwrap_or(false) {
                    if let Ok(evt) = event::read() {
                        let action = input::map_event(&evt);
                        app.update(action);
                    }
                }
            } => {}
        }

        // Process tick
        app.update(action::Action::Tick);

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}
