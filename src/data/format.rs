//! Formatting helpers for table cells.
//!
//! Probe fields are absent until the first sample arrives, so every
//! helper renders missing data as "-" rather than erroring.

use chrono::{DateTime, Local};

/// Format a millisecond measurement (e.g. `42.50`).
pub fn format_ms(value: Option<f64>) -> String {
    match value {
        Some(ms) => format!("{:.2}", ms),
        None => "-".to_string(),
    }
}

/// Format an availability ratio as a percentage (e.g. `99.87%`).
pub fn format_availability(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) => format!("{:.2}%", r * 100.0),
        None => "-".to_string(),
    }
}

/// Format an RFC 3339 timestamp in local time.
///
/// Falls back to the raw string when the backend sends something
/// unparsable, and to "-" when there is no timestamp at all.
pub fn format_timestamp(ts: Option<&str>) -> String {
    match ts {
        Some(raw) => match DateTime::parse_from_rfc3339(raw) {
            Ok(dt) => dt.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
            Err(_) => raw.to_string(),
        },
        None => "-".to_string(),
    }
}
