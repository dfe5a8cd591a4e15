//! FocusStudy - flashcard study TUI
//!
//! Write question/answer cards, study them, and review the ones that are due.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use focus_study::collection::Collection;
use focus_study::config::Config;
use focus_study::logging;
use focus_study::storage::JsonFileStore;
use focus_study::ui::App;

// ══════════════════════════════════════════════════════════════════════════
// CLI Arguments
// ══════════════════════════════════════════════════════════════════════════

#[derive(Parser, Debug)]
#[command(name = "focus")]
#[command(author, version, about = "Flashcard study TUI with spaced repetition review", long_about = None)]
struct Args {
    /// Directory holding the card snapshot and logs
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

// ══════════════════════════════════════════════════════════════════════════
// Main Entry Point
// ══════════════════════════════════════════════════════════════════════════

fn main() -> Result<()> {
    let args = Args::parse();

    // Load config, falling back to defaults if it is unreadable
    let config_path = args.config.unwrap_or_else(Config::default_path);
    let (config, config_error) = match Config::load(&config_path) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    // Determine data directory: flag, then config, then platform default
    let data_dir = args
        .data_dir
        .or_else(|| config.data_dir.clone())
        .unwrap_or_else(JsonFileStore::default_path);

    let store = JsonFileStore::new(data_dir).context("Failed to open data directory")?;
    let _log_guard = logging::init_tracing(store.data_dir())?;
    if let Some(e) = config_error {
        tracing::warn!(error = %format!("{:#}", e), "using default config");
    }

    let collection = Collection::open(Box::new(store)).context("Failed to load flashcards")?;
    tracing::info!(cards = collection.len(), "starting session");

    let app = App::new(collection, config, Some(config_path));
    run_tui(app)
}

fn run_tui(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = %err, "session ended with an error");
        eprintln!("Error: {}", err);
        return Err(err);
    }

    tracing::info!(reviewed = app.reviewed_count, "session finished");
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|frame| app.render(frame))?;
        app.handle_events()?;
    }
    Ok(())
}
