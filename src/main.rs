use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use lazysensu::app::App;
use lazysensu::config::Config;
use lazysensu::namespace::Namespace;
use lazysensu::{events, logging};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;

/// Terminal UI for Sensu events
#[derive(Parser, Debug)]
#[command(name = "lazysensu", version, about)]
struct Args {
    /// Config file (default: ~/.config/lazysensu/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Namespace to open, as organization/environment
    #[arg(short, long)]
    namespace: Option<Namespace>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load config
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    if let Some(ns) = &args.namespace {
        config.namespace = Some(ns.to_string());
    }

    if let Some(path) = logging::log_path() {
        if let Err(e) = logging::init(&path, &config.settings.log_level) {
            eprintln!("Warning: logging disabled: {e:#}");
        }
    }
    tracing::info!(version = env!("CARGO_PKG_VERSION"), api = %config.api.url, "starting");

    // Setup panic hook for clean terminal restore
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and run
    let mut app = App::new(config);
    let res = events::run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!("exited with error: {err:#}");
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    Ok(())
}
