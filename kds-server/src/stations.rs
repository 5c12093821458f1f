//! Station registry
//!
//! Branch-scoped preparation stations. Names are unique per branch
//! (case-insensitive). A station that is referenced by kitchen order
//! lines is deactivated instead of hard-deleted, so historical orders
//! and analytics keep resolving.

use shared::models::{Station, StationCreate, StationUpdate};

use crate::core::{KitchenError, KitchenResult};
use crate::storage::{KitchenStorage, STATION_SEQ};
use crate::utils::now_millis;

/// Default stations provisioned when a branch enables the kitchen
const DEFAULT_STATIONS: &[(&str, &str)] = &[
    ("Main Kitchen", "Main cooking station"),
    ("Grill", "Grill station"),
    ("Salad", "Salad and cold items"),
    ("Dessert", "Dessert station"),
];

#[derive(Clone)]
pub struct StationRegistry {
    storage: KitchenStorage,
}

impl StationRegistry {
    pub fn new(storage: KitchenStorage) -> Self {
        Self { storage }
    }

    /// Create a station in a branch
    pub fn create(&self, branch_id: i64, payload: StationCreate) -> KitchenResult<Station> {
        let name = payload.name.trim().to_string();
        if name.is_empty() {
            return Err(KitchenError::Validation("station name is empty".into()));
        }

        let txn = self.storage.begin_write()?;
        let existing = self.storage.stations_for_branch_txn(&txn, branch_id)?;
        if existing
            .iter()
            .any(|s| s.name.eq_ignore_ascii_case(&name))
        {
            return Err(KitchenError::DuplicateStation(name));
        }

        let station = Station {
            id: self.storage.next_id(&txn, STATION_SEQ)?,
            branch_id,
            name,
            description: payload.description,
            is_active: true,
            created_at: now_millis(),
        };
        self.storage.put_station(&txn, &station)?;
        txn.commit().map_err(crate::storage::StorageError::from)?;

        tracing::info!(
            station_id = station.id,
            branch_id,
            name = %station.name,
            "Station created"
        );
        Ok(station)
    }

    /// Provision the default station set for a branch, skipping names
    /// that already exist. Returns the stations created.
    pub fn provision_defaults(&self, branch_id: i64) -> KitchenResult<Vec<Station>> {
        let mut created = Vec::new();
        for (name, description) in DEFAULT_STATIONS {
            match self.create(
                branch_id,
                StationCreate {
                    name: (*name).to_string(),
                    description: Some((*description).to_string()),
                },
            ) {
                Ok(station) => created.push(station),
                Err(KitchenError::DuplicateStation(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(created)
    }

    /// Update name, description, or active flag
    pub fn update(&self, station_id: u64, update: StationUpdate) -> KitchenResult<Station> {
        let txn = self.storage.begin_write()?;
        let mut station = self
            .storage
            .get_station_txn(&txn, station_id)?
            .ok_or(KitchenError::StationNotFound(station_id))?;

        if let Some(name) = update.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(KitchenError::Validation("station name is empty".into()));
            }
            if !name.eq_ignore_ascii_case(&station.name) {
                let siblings = self
                    .storage
                    .stations_for_branch_txn(&txn, station.branch_id)?;
                if siblings
                    .iter()
                    .any(|s| s.id != station_id && s.name.eq_ignore_ascii_case(&name))
                {
                    return Err(KitchenError::DuplicateStation(name));
                }
            }
            station.name = name;
        }
        if let Some(description) = update.description {
            station.description = Some(description);
        }
        if let Some(is_active) = update.is_active {
            station.is_active = is_active;
        }

        self.storage.put_station(&txn, &station)?;
        txn.commit().map_err(crate::storage::StorageError::from)?;
        Ok(station)
    }

    /// Deactivate a station; lines already routed to it keep their reference
    pub fn deactivate(&self, station_id: u64) -> KitchenResult<Station> {
        self.update(
            station_id,
            StationUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
    }

    /// Hard-delete a station
    ///
    /// Refused while any kitchen order line references it; callers should
    /// deactivate instead.
    pub fn remove(&self, station_id: u64) -> KitchenResult<()> {
        let txn = self.storage.begin_write()?;
        if self
            .storage
            .get_station_txn(&txn, station_id)?
            .is_none()
        {
            return Err(KitchenError::StationNotFound(station_id));
        }

        let referenced = self.storage.all_orders_txn(&txn)?.iter().any(|order| {
            order
                .lines
                .iter()
                .any(|line| line.station_id == Some(station_id))
        });
        if referenced {
            return Err(KitchenError::StationReferenced(station_id));
        }

        self.storage.delete_station(&txn, station_id)?;
        txn.commit().map_err(crate::storage::StorageError::from)?;
        tracing::info!(station_id, "Station removed");
        Ok(())
    }

    /// Deactivate every station of a branch, returning how many changed
    ///
    /// Part of the kitchen-disable flow.
    pub fn deactivate_branch(&self, branch_id: i64) -> KitchenResult<usize> {
        let txn = self.storage.begin_write()?;
        let stations = self.storage.stations_for_branch_txn(&txn, branch_id)?;
        let mut changed = 0;
        for mut station in stations {
            if station.is_active {
                station.is_active = false;
                self.storage.put_station(&txn, &station)?;
                changed += 1;
            }
        }
        txn.commit().map_err(crate::storage::StorageError::from)?;
        Ok(changed)
    }

    pub fn get(&self, station_id: u64) -> KitchenResult<Station> {
        self.storage
            .get_station(station_id)?
            .ok_or(KitchenError::StationNotFound(station_id))
    }

    /// All stations of a branch, sorted by id
    pub fn list(&self, branch_id: i64) -> KitchenResult<Vec<Station>> {
        Ok(self.storage.stations_for_branch(branch_id)?)
    }

    /// Active stations of a branch, sorted by id
    pub fn list_active(&self, branch_id: i64) -> KitchenResult<Vec<Station>> {
        Ok(self
            .storage
            .stations_for_branch(branch_id)?
            .into_iter()
            .filter(|s| s.is_active)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> StationRegistry {
        StationRegistry::new(KitchenStorage::open_in_memory().unwrap())
    }

    #[test]
    fn test_create_and_duplicate_name() {
        let registry = registry();
        let station = registry
            .create(
                1,
                StationCreate {
                    name: "Grill".into(),
                    description: None,
                },
            )
            .unwrap();
        assert!(station.is_active);

        // Case-insensitive uniqueness within the branch
        assert!(matches!(
            registry.create(
                1,
                StationCreate {
                    name: "grill".into(),
                    description: None
                }
            ),
            Err(KitchenError::DuplicateStation(_))
        ));

        // Same name in another branch is fine
        registry
            .create(
                2,
                StationCreate {
                    name: "Grill".into(),
                    description: None,
                },
            )
            .unwrap();
    }

    #[test]
    fn test_provision_defaults_is_idempotent() {
        let registry = registry();
        assert_eq!(registry.provision_defaults(1).unwrap().len(), 4);
        assert_eq!(registry.provision_defaults(1).unwrap().len(), 0);
        assert_eq!(registry.list(1).unwrap().len(), 4);
    }

    #[test]
    fn test_deactivate_hides_from_active_list() {
        let registry = registry();
        let station = registry
            .create(
                1,
                StationCreate {
                    name: "Salad".into(),
                    description: None,
                },
            )
            .unwrap();

        registry.deactivate(station.id).unwrap();
        assert!(registry.list_active(1).unwrap().is_empty());
        assert_eq!(registry.list(1).unwrap().len(), 1);
    }

    #[test]
    fn test_deactivate_branch() {
        let registry = registry();
        registry.provision_defaults(1).unwrap();
        assert_eq!(registry.deactivate_branch(1).unwrap(), 4);
        assert_eq!(registry.deactivate_branch(1).unwrap(), 0);
    }
}
