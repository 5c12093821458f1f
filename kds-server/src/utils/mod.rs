//! Shared utilities

pub mod logger;
pub mod time;

pub use time::{now_millis, utc_date_string, utc_hour};
