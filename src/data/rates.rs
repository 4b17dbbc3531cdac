//! Open Exchange Rates API client
//!
//! This module fetches historical daily rates from the Open Exchange Rates API
//! and extracts a single currency from the response body.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

use super::iso_key;

/// Base URL for the Open Exchange Rates API
const OPEN_EXCHANGE_RATES_BASE_URL: &str = "https://openexchangerates.org/api";

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when fetching a rate
#[derive(Debug, Error)]
pub enum RatesError {
    /// HTTP request failed (connectivity, timeout, body read)
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("API returned HTTP status {0}")]
    HttpStatus(u16),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The requested currency is absent from the `rates` map
    #[error("Currency {0} missing from response")]
    MissingCurrency(String),

    /// The task running the request panicked or was cancelled
    #[error("Rate request did not complete: {0}")]
    Interrupted(String),
}

impl RatesError {
    /// Whether the source answered but the body was unusable
    pub fn is_malformed_response(&self) -> bool {
        matches!(self, Self::ParseError(_) | Self::MissingCurrency(_))
    }
}

/// A provider of one exchange rate per calendar date
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Returns the rate of `currency` on `date`
    async fn fetch_rate(&self, date: NaiveDate, currency: &str) -> Result<f64, RatesError>;
}

/// Body of `GET /historical/{date}.json`
#[derive(Debug, Deserialize)]
struct HistoricalRates {
    /// Base currency the rates are quoted against (USD on the free plan)
    #[allow(dead_code)]
    base: Option<String>,
    /// Unix timestamp of the quote
    #[allow(dead_code)]
    timestamp: Option<i64>,
    /// Currency code to rate
    rates: HashMap<String, f64>,
}

/// Extracts the rate for `currency` from a historical rates body
pub fn extract_rate(body: &str, currency: &str) -> Result<f64, RatesError> {
    let parsed: HistoricalRates = serde_json::from_str(body)?;
    parsed
        .rates
        .get(currency)
        .copied()
        .ok_or_else(|| RatesError::MissingCurrency(currency.to_string()))
}

/// Client for the Open Exchange Rates historical endpoint
#[derive(Debug, Clone)]
pub struct OpenExchangeRatesClient {
    client: Client,
    app_id: String,
    /// Base URL for the API (allows override for testing)
    base_url: String,
}

impl OpenExchangeRatesClient {
    /// Create a client with the default base URL and a request timeout
    pub fn new(app_id: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self::with_client(client, app_id)
    }

    /// Create a client with a custom HTTP client
    pub fn with_client(client: Client, app_id: impl Into<String>) -> Self {
        Self {
            client,
            app_id: app_id.into(),
            base_url: OPEN_EXCHANGE_RATES_BASE_URL.to_string(),
        }
    }

    /// Override the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// URL of the historical rates document for `date`
    pub fn historical_url(&self, date: NaiveDate) -> String {
        format!(
            "{}/historical/{}.json?app_id={}",
            self.base_url.trim_end_matches('/'),
            iso_key(date),
            self.app_id
        )
    }
}

#[async_trait]
impl RateSource for OpenExchangeRatesClient {
    async fn fetch_rate(&self, date: NaiveDate, currency: &str) -> Result<f64, RatesError> {
        let url = self.historical_url(date);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RatesError::HttpStatus(status.as_u16()));
        }

        let text = response.text().await?;
        extract_rate(&text, currency)
    }
}
