//! Bounded LRU cache of daily rates
//!
//! Provides a `RateCache` mapping ISO date keys to rate values, safe to share
//! between concurrently running fetch futures.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};

/// Capacity used when none is configured
pub const DEFAULT_CACHE_CAPACITY: usize = 500;

/// In-memory LRU cache from ISO date string to rate value
///
/// The lock is only held for a single lookup or insert, so callers never hold
/// it across an `.await`.
#[derive(Debug)]
pub struct RateCache {
    entries: Mutex<LruCache<String, f64>>,
}

impl Default for RateCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl RateCache {
    /// Creates an empty cache holding at most `capacity` entries
    ///
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, f64>> {
        // Every critical section is a single map call, so poisoning is ignored
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Looks up a key, marking it as most recently used
    pub fn get(&self, key: &str) -> Option<f64> {
        self.lock().get(key).copied()
    }

    /// Stores a value, evicting the least recently used entry when full
    pub fn insert(&self, key: impl Into<String>, value: f64) {
        self.lock().put(key.into(), value);
    }

    /// Whether a key is present, without touching its recency
    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains(key)
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }
}
