//! Assembled kitchen core
//!
//! Owns the storage handle and wires the registries, the state machine,
//! the relay and the analytics together. Hosts the kitchen
//! enable/disable lifecycle and the background SLA sweep.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use shared::models::Station;

use crate::analytics::AnalyticsAggregator;
use crate::assignment::AssignmentEngine;
use crate::branch::BranchConfigSource;
use crate::core::config::Config;
use crate::core::error::{KitchenError, KitchenResult};
use crate::manager::KitchenManager;
use crate::notify::{ChannelTransport, NotificationRelay};
use crate::staff::StaffRoster;
use crate::stations::StationRegistry;
use crate::storage::KitchenStorage;
use crate::utils::now_millis;

pub struct KitchenCore {
    config: Config,
    pub stations: StationRegistry,
    pub staff: StaffRoster,
    pub assignment: AssignmentEngine,
    pub manager: KitchenManager,
    pub analytics: AnalyticsAggregator,
    pub notifications: NotificationRelay,
}

impl KitchenCore {
    /// Open the database under the configured work dir and wire the system
    pub fn open(
        config: Config,
        branches: Arc<dyn BranchConfigSource>,
        transport: Arc<dyn ChannelTransport>,
    ) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.work_dir)
            .with_context(|| format!("Failed to create work dir {}", config.work_dir))?;
        let storage = KitchenStorage::open(config.db_path())
            .with_context(|| format!("Failed to open database {:?}", config.db_path()))?;

        let relay = NotificationRelay::new(storage.clone(), transport);
        let roster = StaffRoster::new(storage.clone());
        let assignment = AssignmentEngine::new(storage.clone(), roster.clone());
        let analytics = AnalyticsAggregator::new(storage.clone(), branches.clone(), relay.clone());
        let manager = KitchenManager::new(
            storage.clone(),
            branches,
            relay.clone(),
            assignment.clone(),
            roster.clone(),
            analytics.clone(),
        );

        tracing::info!(db = %config.db_path().display(), "Kitchen core ready");
        Ok(Self {
            config,
            stations: StationRegistry::new(storage),
            staff: roster,
            assignment,
            manager,
            analytics,
            notifications: relay,
        })
    }

    /// Provision the default station set when a branch turns the kitchen on
    ///
    /// The enable flag itself lives at the branch-configuration boundary;
    /// this only prepares the kitchen side.
    pub fn enable_kitchen(&self, branch_id: i64) -> KitchenResult<Vec<Station>> {
        let created = self.stations.provision_defaults(branch_id)?;
        tracing::info!(branch_id, stations = created.len(), "Kitchen enabled for branch");
        Ok(created)
    }

    /// Deactivate a branch's stations, refused while orders are in flight
    pub fn disable_kitchen(&self, branch_id: i64) -> KitchenResult<usize> {
        let active = self.manager.active_orders(branch_id)?;
        if !active.is_empty() {
            return Err(KitchenError::KitchenBusy(active.len()));
        }
        let deactivated = self.stations.deactivate_branch(branch_id)?;
        tracing::info!(branch_id, deactivated, "Kitchen disabled for branch");
        Ok(deactivated)
    }

    /// Spawn the periodic SLA sweep
    ///
    /// Runs until the handle is aborted. Sweep failures are logged and the
    /// loop keeps going.
    pub fn spawn_sla_sweep(&self) -> tokio::task::JoinHandle<()> {
        let analytics = self.analytics.clone();
        let period = Duration::from_secs(self.config.sla_sweep_interval_secs.max(1));
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                match analytics.check_sla_breaches(now_millis()) {
                    Ok(0) => {}
                    Ok(notified) => {
                        tracing::info!(notified, "SLA sweep sent delay alerts");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "SLA sweep failed");
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branch::StaticBranchDirectory;
    use crate::notify::MemoryTransport;
    use shared::{ActorContext, BranchKitchenConfig, OrderType, SourceOrder, SourceOrderLine, StaffRole};

    fn open_core(dir: &std::path::Path) -> (KitchenCore, Arc<StaticBranchDirectory>) {
        let branches = Arc::new(StaticBranchDirectory::new());
        branches.set(BranchKitchenConfig::enabled(1));
        let core = KitchenCore::open(
            Config::with_work_dir(dir.to_string_lossy()),
            branches.clone(),
            Arc::new(MemoryTransport::new()),
        )
        .unwrap();
        (core, branches)
    }

    #[test]
    fn test_open_creates_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let (core, _branches) = open_core(dir.path());
        assert!(dir.path().join("kitchen.redb").exists());
        assert!(core.stations.list(1).unwrap().is_empty());
    }

    #[test]
    fn test_enable_then_disable_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let (core, _branches) = open_core(dir.path());

        assert_eq!(core.enable_kitchen(1).unwrap().len(), 4);
        assert_eq!(core.disable_kitchen(1).unwrap(), 4);
        assert!(core.stations.list_active(1).unwrap().is_empty());
    }

    #[test]
    fn test_disable_blocked_by_active_orders() {
        let dir = tempfile::tempdir().unwrap();
        let (core, _branches) = open_core(dir.path());
        core.enable_kitchen(1).unwrap();

        let order = SourceOrder {
            id: "ord-1".to_string(),
            branch_id: 1,
            order_type: OrderType::DineIn,
            created_at: now_millis(),
            lines: vec![SourceOrderLine {
                id: "l1".to_string(),
                name: "Ribeye".to_string(),
                category: Some("Grill".to_string()),
                quantity: 1,
                note: None,
            }],
        };
        core.manager.on_order_created(&order).unwrap();

        assert!(matches!(
            core.disable_kitchen(1),
            Err(KitchenError::KitchenBusy(1))
        ));

        let ctx = ActorContext::new(1, None, StaffRole::Manager);
        core.manager.cancel(&ctx, "ord-1").unwrap();
        assert_eq!(core.disable_kitchen(1).unwrap(), 4);
    }
}
