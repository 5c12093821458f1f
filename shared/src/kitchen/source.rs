//! Source-order snapshots
//!
//! The order-management collaborator drives the kitchen core through
//! explicit lifecycle calls (`on_order_created`, `on_order_status_changed`,
//! ...). These are the payloads it hands over; the core has no other
//! coupling to order CRUD.

use serde::{Deserialize, Serialize};

use super::types::OrderType;

/// Lifecycle status of the originating order, as reported by the order source
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceOrderStatus {
    Pending,
    Preparing,
    Completed,
    Cancelled,
}

/// Snapshot of an originating order at the time of a lifecycle call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceOrder {
    /// Order id in the order-management system
    pub id: String,
    pub branch_id: i64,
    pub order_type: OrderType,
    /// Creation time in epoch milliseconds; drives wait-time priority
    pub created_at: i64,
    #[serde(default)]
    pub lines: Vec<SourceOrderLine>,
}

/// Snapshot of one order line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceOrderLine {
    /// Line id in the order-management system
    pub id: String,
    /// Item name, carried onto the kitchen ticket
    pub name: String,
    /// Item category name; drives station affinity routing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
