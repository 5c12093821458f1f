//! redb-based storage layer for the kitchen core
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `stations` | station id | `Station` | Station registry |
//! | `staff` | staff id | `StaffAssignment` | Staff roster |
//! | `kitchen_orders` | source order id | `KitchenOrderRecord` | Aggregate (order + lines) |
//! | `active_orders` | source order id | `()` | Non-terminal order index |
//! | `analytics` | (station id, date) | `StationDailyAnalytics` | Daily counters |
//! | `notifications` | notification id | `Notification` | Fallback notification log |
//! | `counters` | name | `u64` | Monotonic id counters |
//!
//! # Aggregate atomicity
//!
//! A kitchen order and its lines are one record under one key. Every state
//! transition mutates the aggregate (plus any touched staff/analytics rows)
//! inside a single write transaction, and redb's single-writer model
//! serializes concurrent transition attempts on the same aggregate.
//!
//! # Durability
//!
//! redb commits with `Durability::Immediate` by default: once `commit()`
//! returns the data survives power loss, and the file is always in a
//! consistent state (copy-on-write with atomic pointer swap).

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use thiserror::Error;

use shared::models::{
    KitchenOrderRecord, Notification, StaffAssignment, Station, StationDailyAnalytics,
};

/// Station registry: key = station id, value = JSON-serialized Station
const STATIONS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("stations");

/// Staff roster: key = staff id, value = JSON-serialized StaffAssignment
const STAFF_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("staff");

/// Kitchen order aggregates: key = source order id, value = JSON-serialized KitchenOrderRecord
const KITCHEN_ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("kitchen_orders");

/// Active (non-terminal) order index: key = source order id, value = empty
const ACTIVE_ORDERS_TABLE: TableDefinition<&str, ()> = TableDefinition::new("active_orders");

/// Daily analytics: key = (station id, YYYY-MM-DD), value = JSON-serialized StationDailyAnalytics
const ANALYTICS_TABLE: TableDefinition<(u64, &str), &[u8]> = TableDefinition::new("analytics");

/// Fallback notifications: key = notification id, value = JSON-serialized Notification
const NOTIFICATIONS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("notifications");

/// Monotonic id counters: key = counter name, value = last issued id
const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("counters");

pub const STATION_SEQ: &str = "station_seq";
pub const STAFF_SEQ: &str = "staff_seq";
pub const LINE_SEQ: &str = "line_seq";
pub const NOTIFICATION_SEQ: &str = "notification_seq";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Kitchen storage backed by redb
#[derive(Clone)]
pub struct KitchenStorage {
    db: Arc<Database>,
}

impl std::fmt::Debug for KitchenStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KitchenStorage").finish()
    }
}

impl KitchenStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    fn init_tables(&self) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(STATIONS_TABLE)?;
            let _ = write_txn.open_table(STAFF_TABLE)?;
            let _ = write_txn.open_table(KITCHEN_ORDERS_TABLE)?;
            let _ = write_txn.open_table(ACTIVE_ORDERS_TABLE)?;
            let _ = write_txn.open_table(ANALYTICS_TABLE)?;
            let _ = write_txn.open_table(NOTIFICATIONS_TABLE)?;
            let _ = write_txn.open_table(COUNTERS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Counters ==========

    /// Increment and return the named counter (within transaction)
    pub fn next_id(&self, txn: &WriteTransaction, counter: &str) -> StorageResult<u64> {
        let mut table = txn.open_table(COUNTERS_TABLE)?;
        let current = table.get(counter)?.map(|g| g.value()).unwrap_or(0);
        let next = current + 1;
        table.insert(counter, next)?;
        Ok(next)
    }

    // ========== Stations ==========

    /// Insert or update a station (within transaction)
    pub fn put_station(&self, txn: &WriteTransaction, station: &Station) -> StorageResult<()> {
        let mut table = txn.open_table(STATIONS_TABLE)?;
        let value = serde_json::to_vec(station)?;
        table.insert(station.id, value.as_slice())?;
        Ok(())
    }

    /// Get a station by id
    pub fn get_station(&self, id: u64) -> StorageResult<Option<Station>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(STATIONS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get a station by id (within transaction)
    pub fn get_station_txn(&self, txn: &WriteTransaction, id: u64) -> StorageResult<Option<Station>> {
        let table = txn.open_table(STATIONS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// All stations of a branch, sorted by id
    pub fn stations_for_branch(&self, branch_id: i64) -> StorageResult<Vec<Station>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(STATIONS_TABLE)?;
        let mut stations = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let station: Station = serde_json::from_slice(value.value())?;
            if station.branch_id == branch_id {
                stations.push(station);
            }
        }
        stations.sort_by_key(|s| s.id);
        Ok(stations)
    }

    /// All stations of a branch, sorted by id (within transaction)
    pub fn stations_for_branch_txn(
        &self,
        txn: &WriteTransaction,
        branch_id: i64,
    ) -> StorageResult<Vec<Station>> {
        let table = txn.open_table(STATIONS_TABLE)?;
        let mut stations = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let station: Station = serde_json::from_slice(value.value())?;
            if station.branch_id == branch_id {
                stations.push(station);
            }
        }
        stations.sort_by_key(|s| s.id);
        Ok(stations)
    }

    /// Delete a station (within transaction)
    pub fn delete_station(&self, txn: &WriteTransaction, id: u64) -> StorageResult<()> {
        let mut table = txn.open_table(STATIONS_TABLE)?;
        table.remove(id)?;
        Ok(())
    }

    // ========== Staff ==========

    /// Insert or update a staff assignment (within transaction)
    pub fn put_staff(&self, txn: &WriteTransaction, staff: &StaffAssignment) -> StorageResult<()> {
        let mut table = txn.open_table(STAFF_TABLE)?;
        let value = serde_json::to_vec(staff)?;
        table.insert(staff.id, value.as_slice())?;
        Ok(())
    }

    /// Get a staff assignment by id
    pub fn get_staff(&self, id: u64) -> StorageResult<Option<StaffAssignment>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(STAFF_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get a staff assignment by id (within transaction)
    pub fn get_staff_txn(
        &self,
        txn: &WriteTransaction,
        id: u64,
    ) -> StorageResult<Option<StaffAssignment>> {
        let table = txn.open_table(STAFF_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// All staff assignments, sorted by id (within transaction)
    pub fn all_staff_txn(&self, txn: &WriteTransaction) -> StorageResult<Vec<StaffAssignment>> {
        let table = txn.open_table(STAFF_TABLE)?;
        let mut staff = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            staff.push(serde_json::from_slice(value.value())?);
        }
        staff.sort_by_key(|s: &StaffAssignment| s.id);
        Ok(staff)
    }

    /// All staff assignments, sorted by id
    pub fn all_staff(&self) -> StorageResult<Vec<StaffAssignment>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(STAFF_TABLE)?;
        let mut staff = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            staff.push(serde_json::from_slice(value.value())?);
        }
        staff.sort_by_key(|s: &StaffAssignment| s.id);
        Ok(staff)
    }

    /// Delete a staff assignment (within transaction)
    pub fn delete_staff(&self, txn: &WriteTransaction, id: u64) -> StorageResult<()> {
        let mut table = txn.open_table(STAFF_TABLE)?;
        table.remove(id)?;
        Ok(())
    }

    // ========== Kitchen Orders ==========

    /// Insert or update a kitchen order aggregate (within transaction)
    ///
    /// Maintains the active-order index: non-terminal orders are indexed,
    /// terminal ones removed.
    pub fn put_order(&self, txn: &WriteTransaction, order: &KitchenOrderRecord) -> StorageResult<()> {
        {
            let mut table = txn.open_table(KITCHEN_ORDERS_TABLE)?;
            let value = serde_json::to_vec(order)?;
            table.insert(order.source_order_id.as_str(), value.as_slice())?;
        }
        let mut active = txn.open_table(ACTIVE_ORDERS_TABLE)?;
        if order.status.is_terminal() {
            active.remove(order.source_order_id.as_str())?;
        } else {
            active.insert(order.source_order_id.as_str(), ())?;
        }
        Ok(())
    }

    /// Get a kitchen order by source order id
    pub fn get_order(&self, source_order_id: &str) -> StorageResult<Option<KitchenOrderRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(KITCHEN_ORDERS_TABLE)?;
        match table.get(source_order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get a kitchen order by source order id (within transaction)
    pub fn get_order_txn(
        &self,
        txn: &WriteTransaction,
        source_order_id: &str,
    ) -> StorageResult<Option<KitchenOrderRecord>> {
        let table = txn.open_table(KITCHEN_ORDERS_TABLE)?;
        match table.get(source_order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Delete a kitchen order and its active-index entry (within transaction)
    pub fn delete_order(&self, txn: &WriteTransaction, source_order_id: &str) -> StorageResult<()> {
        {
            let mut table = txn.open_table(KITCHEN_ORDERS_TABLE)?;
            table.remove(source_order_id)?;
        }
        let mut active = txn.open_table(ACTIVE_ORDERS_TABLE)?;
        active.remove(source_order_id)?;
        Ok(())
    }

    /// All non-terminal kitchen orders, sorted by creation time then id
    pub fn active_orders(&self) -> StorageResult<Vec<KitchenOrderRecord>> {
        let read_txn = self.db.begin_read()?;
        let active = read_txn.open_table(ACTIVE_ORDERS_TABLE)?;
        let mut ids = Vec::new();
        for result in active.iter()? {
            let (key, _value) = result?;
            ids.push(key.value().to_string());
        }

        let table = read_txn.open_table(KITCHEN_ORDERS_TABLE)?;
        let mut orders = Vec::new();
        for id in &ids {
            if let Some(value) = table.get(id.as_str())? {
                orders.push(serde_json::from_slice(value.value())?);
            }
        }
        orders.sort_by(|a: &KitchenOrderRecord, b: &KitchenOrderRecord| {
            a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id))
        });
        Ok(orders)
    }

    /// All non-terminal kitchen orders (within transaction)
    pub fn active_orders_txn(
        &self,
        txn: &WriteTransaction,
    ) -> StorageResult<Vec<KitchenOrderRecord>> {
        let mut ids = Vec::new();
        {
            let active = txn.open_table(ACTIVE_ORDERS_TABLE)?;
            for result in active.iter()? {
                let (key, _value) = result?;
                ids.push(key.value().to_string());
            }
        }

        let table = txn.open_table(KITCHEN_ORDERS_TABLE)?;
        let mut orders = Vec::new();
        for id in &ids {
            if let Some(value) = table.get(id.as_str())? {
                orders.push(serde_json::from_slice(value.value())?);
            }
        }
        orders.sort_by(|a: &KitchenOrderRecord, b: &KitchenOrderRecord| {
            a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id))
        });
        Ok(orders)
    }

    /// All kitchen orders of a branch, active and terminal, sorted by
    /// creation time then id
    pub fn orders_for_branch(&self, branch_id: i64) -> StorageResult<Vec<KitchenOrderRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(KITCHEN_ORDERS_TABLE)?;
        let mut orders = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let order: KitchenOrderRecord = serde_json::from_slice(value.value())?;
            if order.branch_id == branch_id {
                orders.push(order);
            }
        }
        orders.sort_by(|a: &KitchenOrderRecord, b: &KitchenOrderRecord| {
            a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id))
        });
        Ok(orders)
    }

    /// All kitchen orders, active and terminal (within transaction)
    pub fn all_orders_txn(&self, txn: &WriteTransaction) -> StorageResult<Vec<KitchenOrderRecord>> {
        let table = txn.open_table(KITCHEN_ORDERS_TABLE)?;
        let mut orders = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            orders.push(serde_json::from_slice(value.value())?);
        }
        orders.sort_by(|a: &KitchenOrderRecord, b: &KitchenOrderRecord| {
            a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id))
        });
        Ok(orders)
    }

    /// Active stations and non-terminal orders of a branch from one read
    /// snapshot, so workload counts cannot skew across tables
    pub fn workload_snapshot(
        &self,
        branch_id: i64,
    ) -> StorageResult<(Vec<Station>, Vec<KitchenOrderRecord>)> {
        let read_txn = self.db.begin_read()?;

        let stations_table = read_txn.open_table(STATIONS_TABLE)?;
        let mut stations = Vec::new();
        for result in stations_table.iter()? {
            let (_key, value) = result?;
            let station: Station = serde_json::from_slice(value.value())?;
            if station.branch_id == branch_id && station.is_active {
                stations.push(station);
            }
        }
        stations.sort_by_key(|s| s.id);

        let active = read_txn.open_table(ACTIVE_ORDERS_TABLE)?;
        let mut ids = Vec::new();
        for result in active.iter()? {
            let (key, _value) = result?;
            ids.push(key.value().to_string());
        }
        let orders_table = read_txn.open_table(KITCHEN_ORDERS_TABLE)?;
        let mut orders = Vec::new();
        for id in &ids {
            if let Some(value) = orders_table.get(id.as_str())? {
                let order: KitchenOrderRecord = serde_json::from_slice(value.value())?;
                if order.branch_id == branch_id {
                    orders.push(order);
                }
            }
        }
        orders.sort_by(|a: &KitchenOrderRecord, b: &KitchenOrderRecord| {
            a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id))
        });

        Ok((stations, orders))
    }

    // ========== Analytics ==========

    /// Get the analytics row for (station, date) (within transaction)
    pub fn get_analytics_txn(
        &self,
        txn: &WriteTransaction,
        station_id: u64,
        date: &str,
    ) -> StorageResult<Option<StationDailyAnalytics>> {
        let table = txn.open_table(ANALYTICS_TABLE)?;
        match table.get((station_id, date))? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Insert or update an analytics row (within transaction)
    pub fn put_analytics(
        &self,
        txn: &WriteTransaction,
        row: &StationDailyAnalytics,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(ANALYTICS_TABLE)?;
        let value = serde_json::to_vec(row)?;
        table.insert((row.station_id, row.date.as_str()), value.as_slice())?;
        Ok(())
    }

    /// Get the analytics row for (station, date)
    pub fn get_analytics(
        &self,
        station_id: u64,
        date: &str,
    ) -> StorageResult<Option<StationDailyAnalytics>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ANALYTICS_TABLE)?;
        match table.get((station_id, date))? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// All analytics rows of one station, sorted by date
    pub fn analytics_for_station(&self, station_id: u64) -> StorageResult<Vec<StationDailyAnalytics>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ANALYTICS_TABLE)?;
        let mut rows = Vec::new();
        for result in table.range((station_id, "")..=(station_id, "\u{10FFFF}"))? {
            let (_key, value) = result?;
            rows.push(serde_json::from_slice(value.value())?);
        }
        rows.sort_by(|a: &StationDailyAnalytics, b: &StationDailyAnalytics| a.date.cmp(&b.date));
        Ok(rows)
    }

    // ========== Notifications ==========

    /// Append a notification row, assigning its id (standalone transaction)
    pub fn insert_notification(
        &self,
        mut notification: Notification,
    ) -> StorageResult<Notification> {
        let txn = self.begin_write()?;
        notification.id = self.next_id(&txn, NOTIFICATION_SEQ)?;
        {
            let mut table = txn.open_table(NOTIFICATIONS_TABLE)?;
            let value = serde_json::to_vec(&notification)?;
            table.insert(notification.id, value.as_slice())?;
        }
        txn.commit()?;
        Ok(notification)
    }

    /// Get a notification by id
    pub fn get_notification(&self, id: u64) -> StorageResult<Option<Notification>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(NOTIFICATIONS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Insert or update a notification (within transaction)
    pub fn put_notification(
        &self,
        txn: &WriteTransaction,
        notification: &Notification,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(NOTIFICATIONS_TABLE)?;
        let value = serde_json::to_vec(notification)?;
        table.insert(notification.id, value.as_slice())?;
        Ok(())
    }

    /// All notifications of a branch, newest first
    pub fn notifications_for_branch(&self, branch_id: i64) -> StorageResult<Vec<Notification>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(NOTIFICATIONS_TABLE)?;
        let mut rows = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let notification: Notification = serde_json::from_slice(value.value())?;
            if notification.branch_id == branch_id {
                rows.push(notification);
            }
        }
        rows.sort_by(|a: &Notification, b: &Notification| {
            b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id))
        });
        Ok(rows)
    }

    /// Delete all notifications of a branch, returning the removed count
    pub fn clear_notifications(&self, branch_id: i64) -> StorageResult<usize> {
        let txn = self.begin_write()?;
        let removed;
        {
            let mut table = txn.open_table(NOTIFICATIONS_TABLE)?;
            let mut ids = Vec::new();
            for result in table.iter()? {
                let (key, value) = result?;
                let notification: Notification = serde_json::from_slice(value.value())?;
                if notification.branch_id == branch_id {
                    ids.push(key.value());
                }
            }
            removed = ids.len();
            for id in ids {
                table.remove(id)?;
            }
        }
        txn.commit()?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::PrepStatus;
    use shared::models::KitchenLineRecord;

    fn sample_order(id: &str, status: PrepStatus) -> KitchenOrderRecord {
        KitchenOrderRecord {
            id: uuid::Uuid::new_v4().to_string(),
            source_order_id: id.to_string(),
            branch_id: 1,
            status,
            priority: 5,
            notes: String::new(),
            created_at: 1_000,
            started_at: None,
            completed_at: None,
            estimated_completion_at: None,
            preparation_duration_ms: None,
            lines: vec![KitchenLineRecord {
                id: 1,
                source_line_id: "l1".to_string(),
                name: "Tiramisu".to_string(),
                category: Some("Dessert".to_string()),
                quantity: 1,
                station_id: None,
                status: PrepStatus::Pending,
                prepared_by: None,
                started_at: None,
                completed_at: None,
                note: None,
            }],
        }
    }

    #[test]
    fn test_order_roundtrip_and_active_index() {
        let storage = KitchenStorage::open_in_memory().unwrap();

        let order = sample_order("ord-1", PrepStatus::Pending);
        let txn = storage.begin_write().unwrap();
        storage.put_order(&txn, &order).unwrap();
        txn.commit().unwrap();

        let loaded = storage.get_order("ord-1").unwrap().unwrap();
        assert_eq!(loaded.lines.len(), 1);
        assert_eq!(storage.active_orders().unwrap().len(), 1);

        // Terminal status drops out of the active index
        let mut completed = loaded;
        completed.status = PrepStatus::Completed;
        let txn = storage.begin_write().unwrap();
        storage.put_order(&txn, &completed).unwrap();
        txn.commit().unwrap();

        assert!(storage.active_orders().unwrap().is_empty());
        assert!(storage.get_order("ord-1").unwrap().is_some());
    }

    #[test]
    fn test_counters_are_monotonic() {
        let storage = KitchenStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        assert_eq!(storage.next_id(&txn, STATION_SEQ).unwrap(), 1);
        assert_eq!(storage.next_id(&txn, STATION_SEQ).unwrap(), 2);
        assert_eq!(storage.next_id(&txn, LINE_SEQ).unwrap(), 1);
        txn.commit().unwrap();

        let txn = storage.begin_write().unwrap();
        assert_eq!(storage.next_id(&txn, STATION_SEQ).unwrap(), 3);
        txn.commit().unwrap();
    }

    #[test]
    fn test_analytics_range_is_station_scoped() {
        let storage = KitchenStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        for (station, date) in [(1u64, "2024-03-01"), (1, "2024-03-02"), (2, "2024-03-01")] {
            let row = shared::models::StationDailyAnalytics::new(station, date);
            storage.put_analytics(&txn, &row).unwrap();
        }
        txn.commit().unwrap();

        let rows = storage.analytics_for_station(1).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.station_id == 1));
    }

    #[test]
    fn test_notification_clear_is_branch_scoped() {
        let storage = KitchenStorage::open_in_memory().unwrap();
        for branch in [1, 1, 2] {
            storage
                .insert_notification(Notification {
                    id: 0,
                    branch_id: branch,
                    order_id: "ord-1".to_string(),
                    status: "PREPARING".to_string(),
                    message: "msg".to_string(),
                    notification_type: shared::KitchenEventKind::OrderUpdate,
                    is_read: false,
                    created_at: 0,
                })
                .unwrap();
        }

        assert_eq!(storage.clear_notifications(1).unwrap(), 2);
        assert_eq!(storage.notifications_for_branch(2).unwrap().len(), 1);
    }
}
