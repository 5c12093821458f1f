//! Kitchen order aggregate
//!
//! One record per source order, lines embedded. The aggregate is stored
//! and mutated as a unit, so a partial status update is never observable.

use serde::{Deserialize, Serialize};

use crate::kitchen::types::PrepStatus;

/// Kitchen-side mirror of a customer order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitchenOrderRecord {
    /// Kitchen order id (UUID)
    pub id: String,
    /// One-to-one with the originating order
    pub source_order_id: String,
    pub branch_id: i64,
    pub status: PrepStatus,
    /// 0-10, higher is more urgent
    pub priority: u8,
    #[serde(default)]
    pub notes: String,
    /// Epoch milliseconds
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_completion_at: Option<i64>,
    /// `completed_at - started_at`, set exactly once on completion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preparation_duration_ms: Option<i64>,
    #[serde(default)]
    pub lines: Vec<KitchenLineRecord>,
}

impl KitchenOrderRecord {
    /// True once every line reached `completed`
    pub fn all_lines_completed(&self) -> bool {
        !self.lines.is_empty()
            && self
                .lines
                .iter()
                .all(|line| line.status == PrepStatus::Completed)
    }

    pub fn line(&self, line_id: u64) -> Option<&KitchenLineRecord> {
        self.lines.iter().find(|l| l.id == line_id)
    }

    pub fn line_mut(&mut self, line_id: u64) -> Option<&mut KitchenLineRecord> {
        self.lines.iter_mut().find(|l| l.id == line_id)
    }
}

/// One kitchen order line, mirroring one source order line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitchenLineRecord {
    pub id: u64,
    pub source_line_id: String,
    /// Item name snapshot for the ticket
    pub name: String,
    /// Item category snapshot; drives station affinity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub quantity: i32,
    /// A line without a station cannot leave `pending`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_id: Option<u64>,
    pub status: PrepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prepared_by: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
