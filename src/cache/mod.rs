//! Cache module for exchange rates fetched during a session
//!
//! This module provides a bounded, least-recently-used, in-memory cache keyed by
//! ISO date string. One instance is created per session and shared by every
//! fetch; nothing is written to disk.

mod rate_cache;

pub use rate_cache::{RateCache, DEFAULT_CACHE_CAPACITY};
