//! Per-station daily analytics

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Running counters for one (station, date), upserted on line completion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StationDailyAnalytics {
    pub station_id: u64,
    /// UTC date, `YYYY-MM-DD`
    pub date: String,
    pub total_orders: u32,
    pub sla_breach_count: u32,
    /// Two-term running average: `(old + new) / 2`, not a true mean.
    /// Kept for continuity with historical rows; 0 until the first sample.
    pub average_preparation_ms: i64,
    /// Completions per UTC hour (0-23)
    #[serde(default)]
    pub peak_hours: BTreeMap<u8, u32>,
}

impl StationDailyAnalytics {
    pub fn new(station_id: u64, date: impl Into<String>) -> Self {
        Self {
            station_id,
            date: date.into(),
            total_orders: 0,
            sla_breach_count: 0,
            average_preparation_ms: 0,
            peak_hours: BTreeMap::new(),
        }
    }
}
