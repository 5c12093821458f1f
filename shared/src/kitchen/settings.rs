//! Per-branch kitchen configuration
//!
//! Branch configuration is an external collaborator; the core reads a
//! typed value object with named fields and defaults instead of probing
//! an untyped settings map.

use serde::{Deserialize, Serialize};

fn default_auto_assign() -> bool {
    true
}

fn default_preparation_minutes() -> u32 {
    15
}

fn default_notify_on_delay() -> bool {
    true
}

fn default_delay_threshold_minutes() -> u32 {
    20
}

/// Typed kitchen settings for a branch
///
/// Unknown fields from the configuration source are ignored; missing
/// fields fall back to the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KitchenSettings {
    /// Pair available staff with pending lines right after order creation
    #[serde(default = "default_auto_assign")]
    pub auto_assign_stations: bool,
    /// Used to compute `estimated_completion_at` on new kitchen orders
    #[serde(default = "default_preparation_minutes")]
    pub default_preparation_minutes: u32,
    /// Emit delay alerts from the SLA sweep
    #[serde(default = "default_notify_on_delay")]
    pub notify_on_delay: bool,
    /// Minutes in `preparing` before an order counts as overdue
    #[serde(default = "default_delay_threshold_minutes")]
    pub delay_threshold_minutes: u32,
}

impl Default for KitchenSettings {
    fn default() -> Self {
        Self {
            auto_assign_stations: default_auto_assign(),
            default_preparation_minutes: default_preparation_minutes(),
            notify_on_delay: default_notify_on_delay(),
            delay_threshold_minutes: default_delay_threshold_minutes(),
        }
    }
}

/// Kitchen configuration of one branch, as exposed by the branch directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchKitchenConfig {
    pub branch_id: i64,
    pub kitchen_enabled: bool,
    #[serde(default)]
    pub settings: KitchenSettings,
}

impl BranchKitchenConfig {
    /// A disabled-kitchen config (the default for unknown branches)
    pub fn disabled(branch_id: i64) -> Self {
        Self {
            branch_id,
            kitchen_enabled: false,
            settings: KitchenSettings::default(),
        }
    }

    pub fn enabled(branch_id: i64) -> Self {
        Self {
            branch_id,
            kitchen_enabled: true,
            settings: KitchenSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied_to_empty_settings() {
        let settings: KitchenSettings = serde_json::from_str("{}").unwrap();
        assert!(settings.auto_assign_stations);
        assert_eq!(settings.default_preparation_minutes, 15);
        assert!(settings.notify_on_delay);
        assert_eq!(settings.delay_threshold_minutes, 20);
    }

    #[test]
    fn test_partial_settings_override() {
        let settings: KitchenSettings =
            serde_json::from_str(r#"{"auto_assign_stations": false, "delay_threshold_minutes": 30}"#)
                .unwrap();
        assert!(!settings.auto_assign_stations);
        assert_eq!(settings.delay_threshold_minutes, 30);
        assert_eq!(settings.default_preparation_minutes, 15);
    }
}
