//! Station assignment engine
//!
//! Routes kitchen order lines to stations. Category affinity is tried
//! first against a fixed substring table, then workload balancing picks
//! the least loaded active station. Ties break on the lowest station id.

use redb::WriteTransaction;
use serde::Serialize;
use shared::PrepStatus;
use shared::models::{KitchenOrderRecord, Station};

use crate::core::{KitchenError, KitchenResult};
use crate::staff::StaffRoster;
use crate::storage::{KitchenStorage, StorageResult};
use crate::utils::now_millis;

/// Category keyword to preferred station-name substrings, matched in order
const CATEGORY_STATION_AFFINITY: &[(&str, &[&str])] = &[
    ("dessert", &["dessert", "bakery", "pastry"]),
    ("salad", &["salad", "cold kitchen", "prep"]),
    ("grill", &["grill", "bbq", "hot kitchen"]),
    ("pizza", &["pizza", "oven", "hot kitchen"]),
    ("sushi", &["sushi", "cold kitchen", "prep"]),
    ("drinks", &["bar", "beverage", "drinks"]),
    ("appetizer", &["appetizer", "prep", "cold kitchen"]),
    ("main course", &["main kitchen", "hot kitchen", "grill"]),
    ("side dish", &["prep", "cold kitchen", "main kitchen"]),
];

/// Upper bound on lines moved per rebalancing pass
const MAX_REBALANCE_LINES: usize = 2;

/// Queue depth of one station
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StationWorkload {
    pub station_id: u64,
    pub station_name: String,
    pub pending: usize,
    pub preparing: usize,
    pub total: usize,
}

/// Result of a manual line reassignment
#[derive(Debug, Clone, Serialize)]
pub struct ReassignOutcome {
    pub station_id: u64,
    /// Whether an available staff member was paired with the order
    pub staff_paired: bool,
}

fn queued_lines(orders: &[KitchenOrderRecord], station_id: u64) -> usize {
    orders
        .iter()
        .flat_map(|o| o.lines.iter())
        .filter(|l| {
            l.station_id == Some(station_id)
                && matches!(l.status, PrepStatus::Pending | PrepStatus::Preparing)
        })
        .count()
}

/// Pick a station for a line
///
/// `active_stations` must be sorted by id; `active_orders` supplies the
/// current queue depths. Returns `None` only when no station is active.
pub(crate) fn select_station(
    active_stations: &[Station],
    active_orders: &[KitchenOrderRecord],
    category: Option<&str>,
) -> Option<u64> {
    if active_stations.is_empty() {
        return None;
    }

    if let Some(category) = category {
        let category = category.to_lowercase();
        let preferred = CATEGORY_STATION_AFFINITY
            .iter()
            .find(|(key, _)| category.contains(key))
            .map(|(_, names)| *names);
        if let Some(preferred) = preferred {
            for name in preferred {
                if let Some(station) = active_stations
                    .iter()
                    .find(|s| s.name.to_lowercase().contains(name))
                {
                    return Some(station.id);
                }
            }
        }
    }

    active_stations
        .iter()
        .map(|s| (queued_lines(active_orders, s.id), s.id))
        .min()
        .map(|(_, id)| id)
}

#[derive(Clone)]
pub struct AssignmentEngine {
    storage: KitchenStorage,
    roster: StaffRoster,
}

impl AssignmentEngine {
    pub fn new(storage: KitchenStorage, roster: StaffRoster) -> Self {
        Self { storage, roster }
    }

    /// Pick a station within the caller's transaction
    pub(crate) fn select_station_txn(
        &self,
        txn: &WriteTransaction,
        branch_id: i64,
        category: Option<&str>,
    ) -> StorageResult<Option<u64>> {
        let stations: Vec<Station> = self
            .storage
            .stations_for_branch_txn(txn, branch_id)?
            .into_iter()
            .filter(|s| s.is_active)
            .collect();
        let orders: Vec<KitchenOrderRecord> = self
            .storage
            .active_orders_txn(txn)?
            .into_iter()
            .filter(|o| o.branch_id == branch_id)
            .collect();
        Ok(select_station(&stations, &orders, category))
    }

    /// Move a line to another station, then try to pair staff there
    ///
    /// Staff pairing is best effort; its outcome never fails the
    /// reassignment itself.
    pub fn reassign(
        &self,
        source_order_id: &str,
        line_id: u64,
        station_id: u64,
    ) -> KitchenResult<ReassignOutcome> {
        let txn = self.storage.begin_write()?;
        let mut order = self
            .storage
            .get_order_txn(&txn, source_order_id)?
            .ok_or_else(|| KitchenError::OrderNotFound(source_order_id.to_string()))?;
        let station = self
            .storage
            .get_station_txn(&txn, station_id)?
            .filter(|s| s.branch_id == order.branch_id)
            .ok_or(KitchenError::StationNotFound(station_id))?;
        if !station.is_active {
            return Err(KitchenError::StationInactive(station_id));
        }

        let order_id = order.source_order_id.clone();
        let line = order
            .line_mut(line_id)
            .ok_or(KitchenError::LineNotFound(line_id))?;
        line.station_id = Some(station_id);

        let mut staff_paired = false;
        if line.status == PrepStatus::Pending {
            if let Some(staff) = self.roster.pair_with_order_txn(&txn, station_id, &order_id)? {
                line.status = PrepStatus::Preparing;
                line.started_at = Some(now_millis());
                line.prepared_by = Some(staff.user_id);
                staff_paired = true;
            }
        }

        self.storage.put_order(&txn, &order)?;
        txn.commit().map_err(crate::storage::StorageError::from)?;

        tracing::info!(
            order_id = %source_order_id,
            line_id,
            station_id,
            staff_paired,
            "Line reassigned"
        );
        Ok(ReassignOutcome {
            station_id,
            staff_paired,
        })
    }

    /// Pair available staff with every pending line that has a station
    ///
    /// Lines without free staff are left untouched and can be retried.
    /// Returns how many lines moved to preparing.
    pub fn auto_assign_pending(&self, branch_id: i64) -> KitchenResult<usize> {
        let txn = self.storage.begin_write()?;
        let orders = self.storage.active_orders_txn(&txn)?;
        let mut assigned = 0;

        for mut order in orders {
            if order.branch_id != branch_id {
                continue;
            }
            let order_id = order.source_order_id.clone();
            let mut touched = false;
            for line in &mut order.lines {
                if line.status != PrepStatus::Pending {
                    continue;
                }
                let Some(station_id) = line.station_id else {
                    continue;
                };
                match self.roster.pair_with_order_txn(&txn, station_id, &order_id)? {
                    Some(staff) => {
                        line.status = PrepStatus::Preparing;
                        line.started_at = Some(now_millis());
                        line.prepared_by = Some(staff.user_id);
                        touched = true;
                        assigned += 1;
                    }
                    None => {
                        tracing::debug!(
                            order_id = %order_id,
                            line_id = line.id,
                            station_id,
                            "No available staff, line left pending"
                        );
                    }
                }
            }
            if touched {
                self.storage.put_order(&txn, &order)?;
            }
        }

        txn.commit().map_err(crate::storage::StorageError::from)?;
        if assigned > 0 {
            tracing::info!(branch_id, assigned, "Auto-assigned pending lines");
        }
        Ok(assigned)
    }

    /// Rebalance queued work across a branch's stations
    ///
    /// Moves up to [`MAX_REBALANCE_LINES`] pending lines from the most
    /// loaded station to the least loaded one, pairing staff at the
    /// target where possible. A balanced branch is left alone, so the
    /// pass is safe to run periodically. Returns how many lines moved.
    pub fn optimize_station_assignments(&self, branch_id: i64) -> KitchenResult<usize> {
        let (stations, orders) = self.storage.workload_snapshot(branch_id)?;
        if stations.len() < 2 {
            return Ok(0);
        }
        let mut loads: Vec<(usize, u64)> = stations
            .iter()
            .map(|s| (queued_lines(&orders, s.id), s.id))
            .collect();
        loads.sort();
        let (least_load, target) = loads[0];
        let (most_load, source) = loads[loads.len() - 1];
        // Half the imbalance, so a later pass never swings it back
        let budget = MAX_REBALANCE_LINES.min((most_load - least_load) / 2);
        if budget == 0 {
            return Ok(0);
        }

        let mut candidates = Vec::new();
        'orders: for order in &orders {
            for line in &order.lines {
                if line.station_id == Some(source) && line.status == PrepStatus::Pending {
                    candidates.push((order.source_order_id.clone(), line.id));
                    if candidates.len() == budget {
                        break 'orders;
                    }
                }
            }
        }

        let mut moved = 0;
        for (order_id, line_id) in candidates {
            self.reassign(&order_id, line_id, target)?;
            moved += 1;
        }
        if moved > 0 {
            tracing::info!(
                branch_id,
                moved,
                from_station = source,
                to_station = target,
                "Rebalanced pending lines"
            );
        }
        Ok(moved)
    }

    /// Queue depth per active station of a branch, from one snapshot
    pub fn station_workload(&self, branch_id: i64) -> KitchenResult<Vec<StationWorkload>> {
        let (stations, orders) = self.storage.workload_snapshot(branch_id)?;
        Ok(stations
            .into_iter()
            .map(|station| {
                let count = |status: PrepStatus| {
                    orders
                        .iter()
                        .flat_map(|o| o.lines.iter())
                        .filter(|l| l.station_id == Some(station.id) && l.status == status)
                        .count()
                };
                let pending = count(PrepStatus::Pending);
                let preparing = count(PrepStatus::Preparing);
                StationWorkload {
                    station_id: station.id,
                    station_name: station.name,
                    pending,
                    preparing,
                    total: pending + preparing,
                }
            })
            .collect())
    }
}
