//! Time helpers
//!
//! All stored timestamps are Unix millis (`i64`). Analytics rows are
//! bucketed by UTC date; the date string is the analytics table key part.

use chrono::{DateTime, Timelike, Utc};

/// Current time in epoch milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// UTC date string (`YYYY-MM-DD`) for a millisecond timestamp
pub fn utc_date_string(millis: i64) -> String {
    millis_to_datetime(millis).format("%Y-%m-%d").to_string()
}

/// UTC hour of day (0-23) for a millisecond timestamp
pub fn utc_hour(millis: i64) -> u8 {
    millis_to_datetime(millis).hour() as u8
}

fn millis_to_datetime(millis: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_else(Utc::now)
}
