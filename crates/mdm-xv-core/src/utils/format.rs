use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone, Utc};

/// Format a timestamp as `YYYY-MM-DD HH:MM:SS +HH:MM`.
///
/// The zone is printed as a numeric offset: chrono has no zone abbreviations
/// for `Local`, and `%Z` would silently fall back to the offset anyway.
pub fn format_timestamp<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    dt.format("%Y-%m-%d %H:%M:%S %:z").to_string()
}

/// Token expiry in the operator's local time zone
pub fn format_expiry(expires_at: &DateTime<Utc>) -> String {
    format_timestamp(&expires_at.with_timezone(&Local))
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Render an optional value, empty when absent
pub fn format_optional<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
