//! Core data models for ratechart
//!
//! This module contains the date range model, the rate value type and the
//! client for the external exchange rate source.

pub mod range;
pub mod rates;

pub use range::{expand, DateRange, MAX_RANGE_DAYS};
pub use rates::{OpenExchangeRatesClient, RateSource, RatesError};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Exchange rate of one currency on one calendar date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rate {
    /// Units of the target currency per unit of the base currency
    pub value: f64,
    /// ISO date string (`YYYY-MM-DD`) the rate belongs to
    pub date: String,
}

impl Rate {
    pub fn new(value: f64, date: impl Into<String>) -> Self {
        Self {
            value,
            date: date.into(),
        }
    }
}

/// Canonical key for a date, used for API requests and cache lookups
pub fn iso_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
