//! Date/time formatting helpers for feedrelay.

use chrono::{DateTime, Utc};

/// Format used for publish times in message footers.
pub const PUBLISH_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Marker emitted when an entry carries no timestamp.
pub const UNKNOWN_TIME: &str = "unknown";

/// Format a UTC timestamp for display in a message footer.
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format(PUBLISH_TIME_FORMAT).to_string()
}

/// Format an optional timestamp, falling back to the "unknown" marker.
pub fn format_optional(dt: Option<&DateTime<Utc>>) -> String {
    match dt {
        Some(dt) => format_timestamp(dt),
        None => UNKNOWN_TIME.to_string(),
    }
}
