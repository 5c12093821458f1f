//! Kitchen staff roster model

use serde::{Deserialize, Serialize};

/// A staff member's station assignment and availability
///
/// Unique per (user, station). `current_order_id` binds the member to one
/// kitchen order while unavailable; terminal order transitions release it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StaffAssignment {
    pub id: u64,
    pub user_id: i64,
    /// None after an explicit unassign
    pub station_id: Option<u64>,
    pub is_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_order_id: Option<String>,
    /// Epoch milliseconds
    pub created_at: i64,
}
