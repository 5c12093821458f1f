//! Kitchen status-change events
//!
//! Published on every kitchen order / line transition, both to in-process
//! subscribers (broadcast channel) and to the live channel transport
//! scoped by branch.

use serde::{Deserialize, Serialize};

/// Category of a kitchen event / fallback notification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KitchenEventKind {
    #[default]
    OrderUpdate,
    DelayAlert,
    StaffAssignment,
    SystemAlert,
}

/// A status-change event for a branch-scoped kitchen channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitchenEvent {
    pub branch_id: i64,
    /// Source order id (what kitchen displays key on)
    pub order_id: String,
    /// Status text, e.g. `PREPARING` or `ITEM_COMPLETED`
    pub status: String,
    #[serde(default)]
    pub kind: KitchenEventKind,
    /// Event time in epoch milliseconds
    pub timestamp: i64,
}

impl KitchenEvent {
    pub fn order_update(branch_id: i64, order_id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            branch_id,
            order_id: order_id.into(),
            status: status.into(),
            kind: KitchenEventKind::OrderUpdate,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn delay_alert(branch_id: i64, order_id: impl Into<String>, delay_minutes: i64) -> Self {
        Self {
            branch_id,
            order_id: order_id.into(),
            status: format!("DELAYED_{}M", delay_minutes),
            kind: KitchenEventKind::DelayAlert,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Channel key the event is published under
    pub fn channel_key(&self) -> String {
        format!("kitchen_{}", self.branch_id)
    }
}
