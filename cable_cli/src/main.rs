//! # Cable Design Tool
//!
//! Terminal interface for 33 kV cable system calculations, built with
//! Ratatui. Opens the persistent parameter store at startup and degrades
//! to the embedded catalog when the store is unavailable.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

mod app;
mod source;
mod ui;

use app::App;
use source::CatalogSource;

/// Interactive 33 kV cable sizing and voltage-drop calculator.
#[derive(Parser, Debug)]
#[command(name = "cable_cli", version, about)]
struct Args {
    /// Path of the persistent parameter store
    #[arg(
        long = "db",
        value_name = "PATH",
        default_value = cable_core::store::DEFAULT_STORE_FILE
    )]
    db_path: PathBuf,

    /// Write a diagnostic log to this file (level via RUST_LOG)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

/// Route tracing output to a file so the TUI screen stays clean.
fn init_tracing(path: &Path) -> Result<WorkerGuard> {
    let file = std::fs::File::create(path)?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(guard)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = match &args.log_file {
        Some(path) => Some(init_tracing(path)?),
        None => None,
    };

    let source = CatalogSource::open_or_fallback(&args.db_path);
    let mut app = App::new(source);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.source.close();
    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;
        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }
        if app.should_quit {
            return Ok(());
        }
    }
}
