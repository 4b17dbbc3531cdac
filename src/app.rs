//! Application state management for ratechart
//!
//! This module contains the main application state: the date picker fields,
//! the displayed series, keyboard handling, and the hand-off between range
//! changes and background fetch batches.

use chrono::{DateTime, Duration, Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent};
use log::{debug, warn};
use std::sync::Arc;

use crate::batch::{BatchMessage, BatchRunner};
use crate::cache::RateCache;
use crate::cli::StartupConfig;
use crate::data::{DateRange, OpenExchangeRatesClient, Rate, RateSource};
use crate::fetcher::{FetchStats, RateFetcher};

/// Which picker field arrow keys edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Start,
    End,
}

impl DateField {
    fn toggled(self) -> Self {
        match self {
            DateField::Start => DateField::End,
            DateField::End => DateField::Start,
        }
    }
}

/// State of the most recent fetch batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    /// Nothing in flight
    Idle,
    /// A batch is running for the current range
    Loading,
    /// The last batch failed; the previous series is still shown
    Failed(String),
}

/// Main application struct managing state and data
pub struct App {
    /// Range currently held by the picker
    pub range: DateRange,
    /// Field edited by the arrow keys
    pub active_field: DateField,
    /// Series of the last successful batch
    pub rates: Vec<Rate>,
    /// Range the displayed series was fetched for
    pub rates_range: Option<DateRange>,
    /// Index of the inspected point in `rates`
    pub inspect_cursor: usize,
    /// Outcome of the latest batch
    pub status: FetchStatus,
    /// Flag indicating a new batch should be started
    pub fetch_requested: bool,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Timestamp of last successful batch
    pub last_refresh: Option<DateTime<Local>>,
    /// Session cache, shared with the fetcher
    cache: Arc<RateCache>,
    fetcher: Arc<RateFetcher>,
    batches: BatchRunner,
}

impl App {
    /// Creates an App fetching from Open Exchange Rates
    pub fn new(config: &StartupConfig) -> Self {
        let source = Arc::new(OpenExchangeRatesClient::new(config.app_id.clone()));
        Self::with_source(config, source)
    }

    /// Creates an App with a custom rate source
    ///
    /// The session cache is created here, once, and shared by every batch the
    /// App starts.
    pub fn with_source(config: &StartupConfig, source: Arc<dyn RateSource>) -> Self {
        let cache = Arc::new(RateCache::new(config.cache_capacity));
        let fetcher = Arc::new(RateFetcher::new(
            source,
            Arc::clone(&cache),
            config.currency.clone(),
        ));

        Self {
            range: config.range,
            active_field: DateField::Start,
            rates: Vec::new(),
            rates_range: None,
            inspect_cursor: 0,
            status: FetchStatus::Idle,
            fetch_requested: true,
            should_quit: false,
            show_help: false,
            last_refresh: None,
            cache,
            fetcher,
            batches: BatchRunner::new(),
        }
    }

    pub fn currency(&self) -> &str {
        self.fetcher.currency()
    }

    pub fn cache(&self) -> &RateCache {
        &self.cache
    }

    pub fn fetch_stats(&self) -> FetchStats {
        self.fetcher.stats()
    }

    /// Whether the current picker range may be fetched and charted
    pub fn fetching_enabled(&self) -> bool {
        self.range.is_fetchable()
    }

    /// Currently inspected point, if any
    pub fn inspected_rate(&self) -> Option<&Rate> {
        self.rates.get(self.inspect_cursor)
    }

    /// Sets the picker range and schedules a new batch
    pub fn set_range(&mut self, range: DateRange) {
        if range != self.range {
            self.range = range;
            self.fetch_requested = true;
        }
    }

    /// Starts a batch for the current range
    ///
    /// Any batch still in flight becomes stale. An unfetchable range starts
    /// nothing and leaves the displayed series untouched. Must be called from
    /// within a tokio runtime.
    pub fn start_batch(&mut self) {
        self.fetch_requested = false;

        if !self.range.is_fetchable() {
            self.batches.invalidate();
            self.status = FetchStatus::Idle;
            debug!(
                "range {} to {} not fetchable, batch skipped",
                self.range.start, self.range.end
            );
            return;
        }

        let generation = self.batches.spawn(Arc::clone(&self.fetcher), self.range);
        self.status = FetchStatus::Loading;
        debug!(
            "batch {} started for {} to {}",
            generation, self.range.start, self.range.end
        );
    }

    /// Applies every finished batch without blocking
    pub fn poll_batches(&mut self) {
        while let Some(message) = self.batches.try_recv() {
            self.apply_batch(message);
        }
    }

    /// Waits for the next finished batch and applies it
    pub async fn wait_for_batch(&mut self) {
        if let Some(message) = self.batches.recv().await {
            self.apply_batch(message);
        }
    }

    /// Applies a batch result if it belongs to the latest generation
    ///
    /// Failures keep the previous series; only the status changes.
    pub fn apply_batch(&mut self, message: BatchMessage) {
        if !self.batches.is_current(&message) {
            debug!("discarding stale batch {}", message.generation);
            return;
        }

        match message.result {
            Ok(rates) => {
                self.rates = rates;
                self.rates_range = Some(message.range);
                self.inspect_cursor = self.inspect_cursor.min(self.rates.len().saturating_sub(1));
                self.status = FetchStatus::Idle;
                self.last_refresh = Some(Local::now());
            }
            Err(e) => {
                warn!("batch {} failed: {}", message.generation, e);
                self.status = FetchStatus::Failed(e.to_string());
            }
        }
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `Tab`/`BackTab`: Switch between start and end field
    /// - `Up`/`k`, `Down`/`j`: Move the active date one day later/earlier
    /// - `PageUp`/`PageDown`: Move the active date one week later/earlier
    /// - `Left`/`h`, `Right`/`l`: Inspect the previous/next point
    /// - `r`: Fetch the current range again
    /// - `?`: Toggle help
    /// - `q` or `Esc`: Quit
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.active_field = self.active_field.toggled();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.shift_active_date(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.shift_active_date(-1);
            }
            KeyCode::PageUp => {
                self.shift_active_date(7);
            }
            KeyCode::PageDown => {
                self.shift_active_date(-7);
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.move_inspect_cursor_left();
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.move_inspect_cursor_right();
            }
            KeyCode::Char('r') => {
                self.fetch_requested = true;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            _ => {}
        }
    }

    /// Moves the active picker date by `days`, ignoring calendar overflow
    fn shift_active_date(&mut self, days: i64) {
        let current = self.active_date();
        let Some(shifted) = current.checked_add_signed(Duration::days(days)) else {
            return;
        };

        let range = match self.active_field {
            DateField::Start => DateRange::new(shifted, self.range.end),
            DateField::End => DateRange::new(self.range.start, shifted),
        };
        self.set_range(range);
    }

    /// Date held by the active picker field
    pub fn active_date(&self) -> NaiveDate {
        match self.active_field {
            DateField::Start => self.range.start,
            DateField::End => self.range.end,
        }
    }

    /// Moves the inspect cursor left, wrapping to the last point
    fn move_inspect_cursor_left(&mut self) {
        let count = self.rates.len();
        if count == 0 {
            return;
        }
        if self.inspect_cursor == 0 {
            self.inspect_cursor = count - 1;
        } else {
            self.inspect_cursor -= 1;
        }
    }

    /// Moves the inspect cursor right, wrapping to the first point
    fn move_inspect_cursor_right(&mut self) {
        let count = self.rates.len();
        if count == 0 {
            return;
        }
        self.inspect_cursor = (self.inspect_cursor + 1) % count;
    }
}
