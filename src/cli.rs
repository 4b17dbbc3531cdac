//! Command-line interface parsing for ratechart
//!
//! This module handles parsing of CLI arguments using clap and turns them into a
//! validated `StartupConfig`.

use chrono::{Local, NaiveDate};
use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

use crate::cache::DEFAULT_CACHE_CAPACITY;
use crate::data::{DateRange, MAX_RANGE_DAYS};

/// Currency charted when none is given
pub const DEFAULT_CURRENCY: &str = "ILS";

/// Static Open Exchange Rates key used when `--app-id` is absent
pub const DEFAULT_APP_ID: &str = "dc971481899445898f79d05116d52967";

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// The currency is not a three-letter code
    #[error("Invalid currency: '{0}'. Expected a three-letter code such as ILS or EUR")]
    InvalidCurrency(String),

    /// The cache must hold at least one entry
    #[error("Invalid cache capacity: {0}. Must be greater than zero")]
    InvalidCacheCapacity(usize),
}

/// ratechart - chart daily exchange rates over a date range
#[derive(Parser, Debug)]
#[command(name = "ratechart")]
#[command(about = "Chart daily exchange rates over a date range of up to 14 days")]
#[command(version)]
pub struct Cli {
    /// First day of the range (inclusive); defaults to 14 days before --end
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub start: Option<NaiveDate>,

    /// Day after the last charted day (exclusive); defaults to today
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub end: Option<NaiveDate>,

    /// Currency to chart against the API base currency
    #[arg(long, value_name = "CODE", default_value = DEFAULT_CURRENCY)]
    pub currency: String,

    /// Open Exchange Rates app id
    #[arg(long, value_name = "KEY")]
    pub app_id: Option<String>,

    /// Maximum number of daily rates kept in memory
    #[arg(long, value_name = "N", default_value_t = DEFAULT_CACHE_CAPACITY)]
    pub cache_capacity: usize,

    /// Append log output to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Fetch the range once, print it as JSON and exit instead of opening the UI
    #[arg(long)]
    pub print: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Initial date range shown in the picker
    pub range: DateRange,
    /// Upper-cased currency code
    pub currency: String,
    /// API key sent with every request
    pub app_id: String,
    /// Capacity of the session rate cache
    pub cache_capacity: usize,
    /// Log file, if any
    pub log_file: Option<PathBuf>,
    /// Headless print mode
    pub print: bool,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            range: default_range(Local::now().date_naive()),
            currency: DEFAULT_CURRENCY.to_string(),
            app_id: DEFAULT_APP_ID.to_string(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            log_file: None,
            print: false,
        }
    }
}

/// The two weeks leading up to `today`
pub fn default_range(today: NaiveDate) -> DateRange {
    DateRange::ending_at(today, MAX_RANGE_DAYS)
}

/// Validates and normalizes a currency code
///
/// # Returns
/// * `Ok(String)` with the upper-cased code
/// * `Err(CliError::InvalidCurrency)` unless the input is three ASCII letters
pub fn parse_currency_arg(s: &str) -> Result<String, CliError> {
    let trimmed = s.trim();
    if trimmed.len() == 3 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(trimmed.to_ascii_uppercase())
    } else {
        Err(CliError::InvalidCurrency(s.to_string()))
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments, relative to today
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        Self::from_cli_on(cli, Local::now().date_naive())
    }

    /// Creates a StartupConfig from parsed CLI arguments, relative to `today`
    ///
    /// Missing dates are filled in the way the picker initialises itself: the
    /// end defaults to today and the start to 14 days before the end.
    pub fn from_cli_on(cli: &Cli, today: NaiveDate) -> Result<Self, CliError> {
        let currency = parse_currency_arg(&cli.currency)?;

        if cli.cache_capacity == 0 {
            return Err(CliError::InvalidCacheCapacity(cli.cache_capacity));
        }

        let end = cli.end.unwrap_or(today);
        let range = match cli.start {
            Some(start) => DateRange::new(start, end),
            None => DateRange::ending_at(end, MAX_RANGE_DAYS),
        };

        Ok(StartupConfig {
            range,
            currency,
            app_id: cli
                .app_id
                .clone()
                .unwrap_or_else(|| DEFAULT_APP_ID.to_string()),
            cache_capacity: cli.cache_capacity,
            log_file: cli.log_file.clone(),
            print: cli.print,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_currency_arg_uppercases() {
        assert_eq!(parse_currency_arg("ils").unwrap(), "ILS");
        assert_eq!(parse_currency_arg("Eur").unwrap(), "EUR");
        assert_eq!(parse_currency_arg(" JPY ").unwrap(), "JPY");
    }

    #[test]
    fn test_parse_currency_arg_invalid() {
        for bad in ["", "US", "EURO", "1LS", "I S"] {
            let result = parse_currency_arg(bad);
            assert!(result.is_err(), "{bad:?} should be rejected");
        }
        let err = parse_currency_arg("EURO").unwrap_err();
        assert!(err.to_string().contains("Invalid currency"));
        assert!(err.to_string().contains("EURO"));
    }

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["ratechart"]);
        assert!(cli.start.is_none());
        assert!(cli.end.is_none());
        assert_eq!(cli.currency, "ILS");
        assert_eq!(cli.cache_capacity, 500);
        assert!(!cli.print);
    }

    #[test]
    fn test_cli_parse_dates() {
        let cli = Cli::parse_from(["ratechart", "--start", "2023-01-01", "--end", "2023-01-04"]);
        assert_eq!(cli.start, Some(date(2023, 1, 1)));
        assert_eq!(cli.end, Some(date(2023, 1, 4)));
    }

    #[test]
    fn test_cli_rejects_malformed_date() {
        let result = Cli::try_parse_from(["ratechart", "--start", "2023-13-01"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_startup_config_defaults_to_last_two_weeks() {
        let cli = Cli::parse_from(["ratechart"]);
        let config = StartupConfig::from_cli_on(&cli, date(2023, 1, 15)).unwrap();

        assert_eq!(config.range, DateRange::new(date(2023, 1, 1), date(2023, 1, 15)));
        assert!(config.range.is_fetchable());
        assert_eq!(config.currency, "ILS");
        assert_eq!(config.app_id, DEFAULT_APP_ID);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_startup_config_start_only_ends_today() {
        let cli = Cli::parse_from(["ratechart", "--start", "2023-01-10"]);
        let config = StartupConfig::from_cli_on(&cli, date(2023, 1, 15)).unwrap();
        assert_eq!(config.range, DateRange::new(date(2023, 1, 10), date(2023, 1, 15)));
    }

    #[test]
    fn test_startup_config_end_only_spans_two_weeks() {
        let cli = Cli::parse_from(["ratechart", "--end", "2023-03-01"]);
        let config = StartupConfig::from_cli_on(&cli, date(2024, 1, 1)).unwrap();
        assert_eq!(config.range, DateRange::new(date(2023, 2, 15), date(2023, 3, 1)));
    }

    #[test]
    fn test_startup_config_keeps_unfetchable_range() {
        // The picker may hold any pair; fetching is simply disabled
        let cli = Cli::parse_from(["ratechart", "--start", "2023-01-10", "--end", "2023-01-01"]);
        let config = StartupConfig::from_cli_on(&cli, date(2023, 1, 15)).unwrap();
        assert!(!config.range.is_fetchable());
    }

    #[test]
    fn test_startup_config_custom_options() {
        let cli = Cli::parse_from([
            "ratechart",
            "--currency",
            "eur",
            "--app-id",
            "abc",
            "--cache-capacity",
            "16",
            "--log-file",
            "/tmp/ratechart.log",
            "--print",
        ]);
        let config = StartupConfig::from_cli_on(&cli, date(2023, 1, 15)).unwrap();

        assert_eq!(config.currency, "EUR");
        assert_eq!(config.app_id, "abc");
        assert_eq!(config.cache_capacity, 16);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/ratechart.log")));
        assert!(config.print);
    }

    #[test]
    fn test_startup_config_invalid_currency() {
        let cli = Cli::parse_from(["ratechart", "--currency", "shekel"]);
        let result = StartupConfig::from_cli_on(&cli, date(2023, 1, 15));
        assert!(matches!(result, Err(CliError::InvalidCurrency(_))));
    }

    #[test]
    fn test_startup_config_zero_capacity() {
        let cli = Cli::parse_from(["ratechart", "--cache-capacity", "0"]);
        let result = StartupConfig::from_cli_on(&cli, date(2023, 1, 15));
        assert!(matches!(result, Err(CliError::InvalidCacheCapacity(0))));
    }

    #[test]
    fn test_default_range_is_fetchable() {
        let range = default_range(date(2024, 3, 1));
        assert_eq!(range.span_days(), MAX_RANGE_DAYS);
        assert!(range.is_fetchable());
    }
}
