//! Branch configuration boundary
//!
//! Branch management lives outside this core; the kitchen only reads a
//! typed per-branch kitchen config through this trait. Validation of the
//! settings happens at that boundary, not here.

use std::collections::HashMap;

use parking_lot::RwLock;
use shared::{BranchKitchenConfig, KitchenSettings};

/// Read-only view of branch kitchen configuration
pub trait BranchConfigSource: Send + Sync {
    /// Kitchen config of a branch; `None` for unknown branches
    fn kitchen_config(&self, branch_id: i64) -> Option<BranchKitchenConfig>;

    /// Whether the kitchen feature is enabled for a branch
    fn kitchen_enabled(&self, branch_id: i64) -> bool {
        self.kitchen_config(branch_id)
            .map(|c| c.kitchen_enabled)
            .unwrap_or(false)
    }

    /// Settings of a branch, defaulted when the branch is unknown
    fn settings(&self, branch_id: i64) -> KitchenSettings {
        self.kitchen_config(branch_id)
            .map(|c| c.settings)
            .unwrap_or_default()
    }
}

/// In-memory branch directory
///
/// Serves embedded deployments and tests; production callers typically
/// adapt their own branch store to [`BranchConfigSource`].
#[derive(Debug, Default)]
pub struct StaticBranchDirectory {
    configs: RwLock<HashMap<i64, BranchKitchenConfig>>,
}

impl StaticBranchDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the config of a branch
    pub fn set(&self, config: BranchKitchenConfig) {
        self.configs.write().insert(config.branch_id, config);
    }

    /// Flip the kitchen flag of a branch, creating a default entry if missing
    pub fn set_enabled(&self, branch_id: i64, enabled: bool) {
        let mut configs = self.configs.write();
        configs
            .entry(branch_id)
            .or_insert_with(|| BranchKitchenConfig::disabled(branch_id))
            .kitchen_enabled = enabled;
    }
}

impl BranchConfigSource for StaticBranchDirectory {
    fn kitchen_config(&self, branch_id: i64) -> Option<BranchKitchenConfig> {
        self.configs.read().get(&branch_id).cloned()
    }
}
