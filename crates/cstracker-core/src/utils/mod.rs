//! Utility functions for display formatting.

pub mod format;

pub use format::{format_hours, format_phone, progress_bar, truncate_string};
