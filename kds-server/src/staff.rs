//! Kitchen staff roster
//!
//! Tracks which user works which station and whether they are free to
//! take an order. Pairing binds a member to one kitchen order at a time;
//! terminal order transitions release every member bound to that order.

use redb::WriteTransaction;
use shared::models::StaffAssignment;

use crate::core::{KitchenError, KitchenResult};
use crate::storage::{KitchenStorage, STAFF_SEQ, StorageResult};
use crate::utils::now_millis;

#[derive(Clone)]
pub struct StaffRoster {
    storage: KitchenStorage,
}

impl StaffRoster {
    pub fn new(storage: KitchenStorage) -> Self {
        Self { storage }
    }

    /// Register a staff member, optionally bound to a station
    pub fn register(&self, user_id: i64, station_id: Option<u64>) -> KitchenResult<StaffAssignment> {
        let txn = self.storage.begin_write()?;
        if let Some(station_id) = station_id {
            let station = self
                .storage
                .get_station_txn(&txn, station_id)?
                .ok_or(KitchenError::StationNotFound(station_id))?;
            if !station.is_active {
                return Err(KitchenError::StationInactive(station_id));
            }
        }
        let duplicate = self
            .storage
            .all_staff_txn(&txn)?
            .iter()
            .any(|s| s.user_id == user_id && s.station_id == station_id);
        if duplicate {
            return Err(KitchenError::DuplicateStaff {
                user_id,
                station_id,
            });
        }

        let staff = StaffAssignment {
            id: self.storage.next_id(&txn, STAFF_SEQ)?,
            user_id,
            station_id,
            is_available: true,
            current_order_id: None,
            created_at: now_millis(),
        };
        self.storage.put_staff(&txn, &staff)?;
        txn.commit().map_err(crate::storage::StorageError::from)?;

        tracing::info!(staff_id = staff.id, user_id, ?station_id, "Staff registered");
        Ok(staff)
    }

    /// Move a staff member to another station
    pub fn assign_station(&self, staff_id: u64, station_id: u64) -> KitchenResult<StaffAssignment> {
        let txn = self.storage.begin_write()?;
        let mut staff = self
            .storage
            .get_staff_txn(&txn, staff_id)?
            .ok_or(KitchenError::StaffNotFound(staff_id))?;
        let station = self
            .storage
            .get_station_txn(&txn, station_id)?
            .ok_or(KitchenError::StationNotFound(station_id))?;
        if !station.is_active {
            return Err(KitchenError::StationInactive(station_id));
        }

        staff.station_id = Some(station_id);
        self.storage.put_staff(&txn, &staff)?;
        txn.commit().map_err(crate::storage::StorageError::from)?;
        Ok(staff)
    }

    /// Detach a staff member from their station
    pub fn unassign_station(&self, staff_id: u64) -> KitchenResult<StaffAssignment> {
        let txn = self.storage.begin_write()?;
        let mut staff = self
            .storage
            .get_staff_txn(&txn, staff_id)?
            .ok_or(KitchenError::StaffNotFound(staff_id))?;
        staff.station_id = None;
        self.storage.put_staff(&txn, &staff)?;
        txn.commit().map_err(crate::storage::StorageError::from)?;
        Ok(staff)
    }

    /// Flip availability; becoming available drops any order binding
    pub fn set_available(&self, staff_id: u64, available: bool) -> KitchenResult<StaffAssignment> {
        let txn = self.storage.begin_write()?;
        let mut staff = self
            .storage
            .get_staff_txn(&txn, staff_id)?
            .ok_or(KitchenError::StaffNotFound(staff_id))?;
        staff.is_available = available;
        if available {
            staff.current_order_id = None;
        }
        self.storage.put_staff(&txn, &staff)?;
        txn.commit().map_err(crate::storage::StorageError::from)?;
        Ok(staff)
    }

    /// Manually bind a staff member to an order
    pub fn bind_to_order(&self, staff_id: u64, order_id: &str) -> KitchenResult<StaffAssignment> {
        let txn = self.storage.begin_write()?;
        let mut staff = self
            .storage
            .get_staff_txn(&txn, staff_id)?
            .ok_or(KitchenError::StaffNotFound(staff_id))?;
        if !staff.is_available {
            return Err(KitchenError::StaffUnavailable(staff_id));
        }
        staff.is_available = false;
        staff.current_order_id = Some(order_id.to_string());
        self.storage.put_staff(&txn, &staff)?;
        txn.commit().map_err(crate::storage::StorageError::from)?;
        Ok(staff)
    }

    /// Remove a staff member from the roster
    pub fn remove(&self, staff_id: u64) -> KitchenResult<()> {
        let txn = self.storage.begin_write()?;
        if self.storage.get_staff_txn(&txn, staff_id)?.is_none() {
            return Err(KitchenError::StaffNotFound(staff_id));
        }
        self.storage.delete_staff(&txn, staff_id)?;
        txn.commit().map_err(crate::storage::StorageError::from)?;
        Ok(())
    }

    pub fn get(&self, staff_id: u64) -> KitchenResult<StaffAssignment> {
        self.storage
            .get_staff(staff_id)?
            .ok_or(KitchenError::StaffNotFound(staff_id))
    }

    /// Members assigned to one station, sorted by id
    pub fn list_for_station(&self, station_id: u64) -> KitchenResult<Vec<StaffAssignment>> {
        Ok(self
            .storage
            .all_staff()?
            .into_iter()
            .filter(|s| s.station_id == Some(station_id))
            .collect())
    }

    /// Bind the lowest-id available member of a station to an order
    ///
    /// Returns `None` when nobody at the station is free. Runs inside the
    /// caller's transaction so the pairing commits with the line update.
    pub(crate) fn pair_with_order_txn(
        &self,
        txn: &WriteTransaction,
        station_id: u64,
        order_id: &str,
    ) -> StorageResult<Option<StaffAssignment>> {
        let candidate = self
            .storage
            .all_staff_txn(txn)?
            .into_iter()
            .find(|s| s.station_id == Some(station_id) && s.is_available);
        let Some(mut staff) = candidate else {
            return Ok(None);
        };
        staff.is_available = false;
        staff.current_order_id = Some(order_id.to_string());
        self.storage.put_staff(txn, &staff)?;
        Ok(Some(staff))
    }

    /// Release every member bound to an order, returning how many
    pub(crate) fn release_order_txn(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
    ) -> StorageResult<usize> {
        let mut released = 0;
        for mut staff in self.storage.all_staff_txn(txn)? {
            if staff.current_order_id.as_deref() == Some(order_id) {
                staff.is_available = true;
                staff.current_order_id = None;
                self.storage.put_staff(txn, &staff)?;
                released += 1;
            }
        }
        Ok(released)
    }
}
