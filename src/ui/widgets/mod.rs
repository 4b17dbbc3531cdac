//! Custom widgets

pub mod rate_chart;

pub use rate_chart::{y_bounds, RateChart};
