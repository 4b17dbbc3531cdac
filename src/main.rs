//! ratechart - chart daily exchange rates over a date range
//!
//! A terminal UI that lets the user pick a date range of up to 14 days, fetches
//! one exchange rate per day and plots the series.

use std::io;
use std::panic;
use std::sync::Arc;
use std::time::Duration;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::{backend::CrosstermBackend, Terminal};

use ratechart::app::App;
use ratechart::cache::RateCache;
use ratechart::cli::{Cli, StartupConfig};
use ratechart::data::OpenExchangeRatesClient;
use ratechart::fetcher::RateFetcher;
use ratechart::logging::{self, LogOutput};
use ratechart::ui;

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Renders the UI based on the current application state
fn render_ui(frame: &mut ratatui::Frame, app: &App) {
    ui::render_range_view(frame, app);
    if app.show_help {
        ui::render_help_overlay(frame);
    }
}

/// Fetches the configured range once and prints it as JSON
async fn print_series(config: &StartupConfig) -> Result<(), Box<dyn std::error::Error>> {
    let dates = config.range.fetch_dates();
    if dates.is_empty() {
        info!(
            "range {} to {} not fetchable, nothing to print",
            config.range.start, config.range.end
        );
    }

    let source = Arc::new(OpenExchangeRatesClient::new(config.app_id.clone()));
    let cache = Arc::new(RateCache::new(config.cache_capacity));
    let fetcher = Arc::new(RateFetcher::new(source, cache, config.currency.clone()));

    let rates = fetcher.fetch_range(&dates).await?;
    println!("{}", serde_json::to_string_pretty(&rates)?);
    Ok(())
}

/// Runs the interactive terminal UI until the user quits
async fn run_tui(config: &StartupConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // The session cache lives inside the app for the whole loop
    let mut app = App::new(config);

    // Main event loop
    loop {
        if app.fetch_requested {
            app.start_batch();
        }
        app.poll_batches();

        // Render UI
        terminal.draw(|f| render_ui(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    // Reported like clap's own argument errors, exiting with status 2
    let config = StartupConfig::from_cli(&cli)
        .unwrap_or_else(|e| Cli::command().error(ErrorKind::ValueValidation, e).exit());

    let fallback = if config.print {
        LogOutput::Stderr
    } else {
        LogOutput::Off
    };
    // Headless runs keep stderr quiet unless logs go to a file
    let default_filter = if config.print && config.log_file.is_none() {
        "warn"
    } else {
        "info"
    };
    logging::init(config.log_file.as_deref(), fallback, default_filter)?;

    if config.print {
        print_series(&config).await
    } else {
        run_tui(&config).await
    }
}
