//! Fallback notification model
//!
//! Append-only log of kitchen events that could not be delivered over the
//! live channel. Read-side operations work against this table only.

use serde::{Deserialize, Serialize};

use crate::kitchen::event::KitchenEventKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    pub branch_id: i64,
    /// Source order id the event was about
    pub order_id: String,
    /// Status text of the undelivered event
    pub status: String,
    pub message: String,
    pub notification_type: KitchenEventKind,
    pub is_read: bool,
    /// Epoch milliseconds
    pub created_at: i64,
}
