//! Kitchen station model

use serde::{Deserialize, Serialize};

/// A named preparation station (Grill, Fryer, Salad, ...), branch-scoped
///
/// Stations are deactivated, never hard-deleted while referenced by
/// active kitchen order lines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Station {
    pub id: u64,
    pub branch_id: i64,
    /// Unique per branch (case-insensitive)
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
    /// Epoch milliseconds
    pub created_at: i64,
}

/// Create station payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Update station payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StationUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}
