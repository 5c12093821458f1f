//! Per-station daily analytics
//!
//! One upserted row per (station, date). The running average is the
//! two-term form `(old + new) / 2`, kept deliberately instead of a true
//! mean so historical rows stay comparable across deployments.
//!
//! SLA breaches are counted once, at line completion. The periodic sweep
//! only emits delay notifications for overdue orders; it never touches
//! the counters, so a breached order that later completes is not counted
//! twice.

use std::sync::Arc;

use redb::WriteTransaction;
use serde::Serialize;
use shared::PrepStatus;
use shared::models::StationDailyAnalytics;

use crate::branch::BranchConfigSource;
use crate::core::KitchenResult;
use crate::notify::NotificationRelay;
use crate::storage::{KitchenStorage, StorageResult};
use crate::utils::{utc_date_string, utc_hour};

/// Preparation time above which a completed line counts as a breach
const SLA_BREACH_MS: i64 = 15 * 60_000;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;
const MINUTE_MS: i64 = 60_000;

/// Efficiency score below which a station gets flagged in reports
const LOW_EFFICIENCY_SCORE: f64 = 70.0;

/// Breach share above which a station gets flagged in reports
const BREACH_RATE_ALERT: f64 = 0.1;

/// Aggregated efficiency metrics over a trailing window
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StationEfficiency {
    pub total_orders: u32,
    pub sla_breach_count: u32,
    pub average_preparation_ms: Option<i64>,
    /// 0-100, derived from the breach rate
    pub efficiency_score: f64,
}

/// Branch performance report over a trailing window
#[derive(Debug, Clone, Serialize)]
pub struct KitchenReport {
    pub start_date: String,
    pub end_date: String,
    pub total_orders: usize,
    pub completed_orders: usize,
    pub cancelled_orders: usize,
    /// 0-100, completed over total
    pub completion_rate: f64,
    pub average_preparation_ms: Option<i64>,
    pub stations: Vec<StationPerformance>,
    pub recommendations: Vec<Recommendation>,
}

/// One station's totals within a report window
#[derive(Debug, Clone, Serialize)]
pub struct StationPerformance {
    pub station_id: u64,
    pub station_name: String,
    pub total_orders: u32,
    pub sla_breach_count: u32,
    pub efficiency_score: f64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Efficiency,
    SlaBreaches,
}

/// Threshold-based advice attached to a report
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub station_name: String,
    pub kind: RecommendationKind,
    pub message: String,
}

fn recommendations(stations: &[StationPerformance]) -> Vec<Recommendation> {
    let mut out = Vec::new();
    for station in stations {
        // Idle stations have nothing to advise on
        if station.total_orders == 0 {
            continue;
        }
        if station.efficiency_score < LOW_EFFICIENCY_SCORE {
            out.push(Recommendation {
                station_name: station.station_name.clone(),
                kind: RecommendationKind::Efficiency,
                message: format!(
                    "Station {} is running below the efficiency target; review staffing or preparation flow",
                    station.station_name
                ),
            });
        }
        if f64::from(station.sla_breach_count)
            > f64::from(station.total_orders) * BREACH_RATE_ALERT
        {
            out.push(Recommendation {
                station_name: station.station_name.clone(),
                kind: RecommendationKind::SlaBreaches,
                message: format!(
                    "Station {} breaches its preparation deadline too often; review workload and staffing",
                    station.station_name
                ),
            });
        }
    }
    out
}

#[derive(Clone)]
pub struct AnalyticsAggregator {
    storage: KitchenStorage,
    branches: Arc<dyn BranchConfigSource>,
    relay: NotificationRelay,
}

impl AnalyticsAggregator {
    pub fn new(
        storage: KitchenStorage,
        branches: Arc<dyn BranchConfigSource>,
        relay: NotificationRelay,
    ) -> Self {
        Self {
            storage,
            branches,
            relay,
        }
    }

    /// Fold one completed line into its station's daily row
    ///
    /// Runs inside the completing transaction so the counters commit
    /// atomically with the order transition.
    pub(crate) fn record_line_completion_txn(
        &self,
        txn: &WriteTransaction,
        station_id: u64,
        duration_ms: i64,
        completed_at_ms: i64,
    ) -> StorageResult<()> {
        let date = utc_date_string(completed_at_ms);
        let mut row = self
            .storage
            .get_analytics_txn(txn, station_id, &date)?
            .unwrap_or_else(|| StationDailyAnalytics::new(station_id, &date));

        row.total_orders += 1;
        // Two-term running average, not a true mean
        row.average_preparation_ms = (row.average_preparation_ms + duration_ms) / 2;
        if duration_ms > SLA_BREACH_MS {
            row.sla_breach_count += 1;
        }
        *row.peak_hours.entry(utc_hour(completed_at_ms)).or_insert(0) += 1;

        self.storage.put_analytics(txn, &row)?;
        Ok(())
    }

    /// Daily row for a station and date, if any
    pub fn get_daily(
        &self,
        station_id: u64,
        date: &str,
    ) -> KitchenResult<Option<StationDailyAnalytics>> {
        Ok(self.storage.get_analytics(station_id, date)?)
    }

    /// All daily rows of a station, oldest first
    pub fn history(&self, station_id: u64) -> KitchenResult<Vec<StationDailyAnalytics>> {
        Ok(self.storage.analytics_for_station(station_id)?)
    }

    /// Efficiency over the trailing `days` window ending at `now_ms`
    pub fn station_efficiency(
        &self,
        station_id: u64,
        days: u32,
        now_ms: i64,
    ) -> KitchenResult<StationEfficiency> {
        let start = utc_date_string(now_ms - i64::from(days) * DAY_MS);
        let rows: Vec<StationDailyAnalytics> = self
            .storage
            .analytics_for_station(station_id)?
            .into_iter()
            .filter(|r| r.date.as_str() >= start.as_str())
            .collect();
        if rows.is_empty() {
            return Ok(StationEfficiency {
                total_orders: 0,
                sla_breach_count: 0,
                average_preparation_ms: None,
                efficiency_score: 0.0,
            });
        }

        let total_orders: u32 = rows.iter().map(|r| r.total_orders).sum();
        let sla_breach_count: u32 = rows.iter().map(|r| r.sla_breach_count).sum();
        let average_preparation_ms =
            rows.iter().map(|r| r.average_preparation_ms).sum::<i64>() / rows.len() as i64;

        let efficiency_score = if total_orders > 0 {
            let breach_rate = f64::from(sla_breach_count) / f64::from(total_orders) * 100.0;
            (100.0 - breach_rate).max(0.0)
        } else {
            100.0
        };

        Ok(StationEfficiency {
            total_orders,
            sla_breach_count,
            average_preparation_ms: Some(average_preparation_ms),
            efficiency_score,
        })
    }

    /// Branch performance report over the trailing `days` window
    ///
    /// Order totals come from the stored aggregates, per-station totals
    /// from the daily analytics rows, and recommendations from fixed
    /// efficiency and breach-rate thresholds.
    pub fn generate_report(
        &self,
        branch_id: i64,
        days: u32,
        now_ms: i64,
    ) -> KitchenResult<KitchenReport> {
        let window_start_ms = now_ms - i64::from(days) * DAY_MS;

        let orders: Vec<_> = self
            .storage
            .orders_for_branch(branch_id)?
            .into_iter()
            .filter(|o| o.created_at >= window_start_ms && o.created_at <= now_ms)
            .collect();
        let total_orders = orders.len();
        let completed_orders = orders
            .iter()
            .filter(|o| o.status == PrepStatus::Completed)
            .count();
        let cancelled_orders = orders
            .iter()
            .filter(|o| o.status == PrepStatus::Cancelled)
            .count();
        let completion_rate = if total_orders > 0 {
            completed_orders as f64 / total_orders as f64 * 100.0
        } else {
            0.0
        };

        let durations: Vec<i64> = orders
            .iter()
            .flat_map(|o| o.lines.iter())
            .filter(|l| l.status == PrepStatus::Completed)
            .filter_map(|l| match (l.started_at, l.completed_at) {
                (Some(started), Some(completed)) => Some(completed - started),
                _ => None,
            })
            .collect();
        let average_preparation_ms = if durations.is_empty() {
            None
        } else {
            Some(durations.iter().sum::<i64>() / durations.len() as i64)
        };

        let mut stations = Vec::new();
        for station in self.storage.stations_for_branch(branch_id)? {
            if !station.is_active {
                continue;
            }
            let efficiency = self.station_efficiency(station.id, days, now_ms)?;
            stations.push(StationPerformance {
                station_id: station.id,
                station_name: station.name,
                total_orders: efficiency.total_orders,
                sla_breach_count: efficiency.sla_breach_count,
                efficiency_score: efficiency.efficiency_score,
            });
        }

        let recommendations = recommendations(&stations);
        Ok(KitchenReport {
            start_date: utc_date_string(window_start_ms),
            end_date: utc_date_string(now_ms),
            total_orders,
            completed_orders,
            cancelled_orders,
            completion_rate,
            average_preparation_ms,
            stations,
            recommendations,
        })
    }

    /// Find preparing orders past their branch's delay threshold and emit
    /// a delay alert per order. Returns how many alerts went out.
    ///
    /// Safe to run concurrently with live updates: reads order timing,
    /// writes only notifications.
    pub fn check_sla_breaches(&self, now_ms: i64) -> KitchenResult<usize> {
        let mut notified = 0;
        for order in self.storage.active_orders()? {
            if order.status != PrepStatus::Preparing {
                continue;
            }
            let Some(started_at) = order.started_at else {
                continue;
            };
            let settings = self.branches.settings(order.branch_id);
            if !settings.notify_on_delay {
                continue;
            }
            let threshold_ms = i64::from(settings.delay_threshold_minutes) * MINUTE_MS;
            let elapsed = now_ms - started_at;
            if elapsed <= threshold_ms {
                continue;
            }

            let delay_minutes = elapsed / MINUTE_MS;
            tracing::warn!(
                order_id = %order.source_order_id,
                branch_id = order.branch_id,
                delay_minutes,
                "Order past delay threshold"
            );
            if self
                .relay
                .notify_delay(order.branch_id, &order.source_order_id, delay_minutes)
            {
                notified += 1;
            }
        }
        Ok(notified)
    }
}
