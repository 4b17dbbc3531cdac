//! Cache-checked rate fetching
//!
//! `RateFetcher` resolves calendar dates to rates. Every lookup goes through the
//! session's shared [`RateCache`]; only misses reach the [`RateSource`]. A whole
//! range is fetched concurrently and fails as soon as any single date fails,
//! while the requests still in flight run to completion and fill the cache.

use chrono::NaiveDate;
use futures::future::try_join_all;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;

use crate::cache::RateCache;
use crate::data::{iso_key, Rate, RateSource, RatesError};

/// Failure to resolve the rate of one date
#[derive(Debug, Error)]
#[error("failed to fetch rate for {date}: {source}")]
pub struct FetchError {
    /// ISO key of the date that failed
    pub date: String,
    pub source: RatesError,
}

/// Counters distinguishing cache hits from network requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchStats {
    pub cache_hits: usize,
    pub network_requests: usize,
}

/// Resolves dates to rates through a shared cache
pub struct RateFetcher {
    source: Arc<dyn RateSource>,
    cache: Arc<RateCache>,
    currency: String,
    cache_hits: AtomicUsize,
    network_requests: AtomicUsize,
}

impl RateFetcher {
    /// Creates a fetcher over an existing cache
    ///
    /// The cache is owned by the session and must outlive individual fetches,
    /// so it is passed in rather than created here.
    pub fn new(
        source: Arc<dyn RateSource>,
        cache: Arc<RateCache>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            source,
            cache,
            currency: currency.into(),
            cache_hits: AtomicUsize::new(0),
            network_requests: AtomicUsize::new(0),
        }
    }

    /// Currency code extracted from every response
    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn cache(&self) -> &Arc<RateCache> {
        &self.cache
    }

    pub fn stats(&self) -> FetchStats {
        FetchStats {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            network_requests: self.network_requests.load(Ordering::Relaxed),
        }
    }

    /// Returns the rate for `date`, from cache when possible
    ///
    /// A miss performs exactly one request and stores the result under the
    /// date's ISO key before returning it.
    pub async fn fetch_rate(&self, date: NaiveDate) -> Result<Rate, FetchError> {
        let key = iso_key(date);

        if let Some(value) = self.cache.get(&key) {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            info!("{} found in cache", key);
            return Ok(Rate::new(value, key));
        }

        self.network_requests.fetch_add(1, Ordering::Relaxed);
        debug!("{} not cached, requesting {}", key, self.currency);

        let value = match self.source.fetch_rate(date, &self.currency).await {
            Ok(value) => value,
            Err(source) => {
                if source.is_malformed_response() {
                    warn!("{} returned an unusable body: {}", key, source);
                } else {
                    warn!("{} request failed: {}", key, source);
                }
                return Err(FetchError { date: key, source });
            }
        };

        self.cache.insert(key.clone(), value);
        info!("{} saved in cache", key);
        Ok(Rate::new(value, key))
    }

    /// Fetches every date concurrently, preserving input order
    ///
    /// Each date runs in its own task. Fails with the first error and returns
    /// no partial series; the remaining tasks are detached, not aborted, so
    /// their rates still land in the cache. Must be called within a tokio
    /// runtime.
    pub async fn fetch_range(
        self: &Arc<Self>,
        dates: &[NaiveDate],
    ) -> Result<Vec<Rate>, FetchError> {
        let tasks: Vec<_> = dates
            .iter()
            .map(|&date| {
                let fetcher = Arc::clone(self);
                let handle = tokio::spawn(async move { fetcher.fetch_rate(date).await });
                async move {
                    match handle.await {
                        Ok(result) => result,
                        Err(e) => Err(FetchError {
                            date: iso_key(date),
                            source: RatesError::Interrupted(e.to_string()),
                        }),
                    }
                }
            })
            .collect();

        try_join_all(tasks).await
    }
}
