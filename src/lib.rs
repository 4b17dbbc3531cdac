//! ratechart library
//!
//! Date range expansion, the session rate cache, cache-checked fetching and the
//! terminal UI that charts the resulting series.

pub mod app;
pub mod batch;
pub mod cache;
pub mod cli;
pub mod data;
pub mod fetcher;
pub mod logging;
pub mod ui;
