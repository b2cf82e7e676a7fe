//! Utility functions for display formatting.

pub mod format;

pub use format::{format_expiry, format_optional, format_timestamp, truncate_string};
