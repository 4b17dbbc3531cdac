//! UI rendering module for ratechart
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod help_overlay;
pub mod range_view;
pub mod widgets;

pub use help_overlay::render as render_help_overlay;
pub use range_view::render as render_range_view;
