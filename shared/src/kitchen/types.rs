//! Preparation status enums and actor context

use serde::{Deserialize, Serialize};

/// Preparation status, used by both kitchen orders and their lines
///
/// Lifecycle: `pending → preparing → {ready → completed | completed}`,
/// with `{pending, preparing} → cancelled`. `completed` and `cancelled`
/// are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrepStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl PrepStatus {
    /// Terminal states admit no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, PrepStatus::Completed | PrepStatus::Cancelled)
    }

    /// Wire representation, also used as the channel event status text
    pub fn as_str(&self) -> &'static str {
        match self {
            PrepStatus::Pending => "PENDING",
            PrepStatus::Preparing => "PREPARING",
            PrepStatus::Ready => "READY",
            PrepStatus::Completed => "COMPLETED",
            PrepStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for PrepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order service type, used for priority weighting
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Dine-in orders get the highest priority bump
    DineIn,
    #[default]
    Takeaway,
    /// Delivery orders get a medium priority bump
    Delivery,
}

/// Role of the acting staff member
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffRole {
    Owner,
    Manager,
    Kitchen,
    Service,
}

/// Explicit actor context passed into every core operation
///
/// Replaces ambient "current user" lookups: the caller resolves identity
/// and branch membership up front, the core only scopes and records it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ActorContext {
    /// Branch the actor operates in; all lookups are scoped to it
    pub branch_id: i64,
    /// Staff member id, recorded as `prepared_by` on line starts
    pub staff_id: Option<i64>,
    pub role: StaffRole,
}

impl ActorContext {
    pub fn new(branch_id: i64, staff_id: Option<i64>, role: StaffRole) -> Self {
        Self {
            branch_id,
            staff_id,
            role,
        }
    }
}
