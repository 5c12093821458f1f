//! Kitchen order-routing core
//!
//! Mirrors customer orders into kitchen orders, routes lines to preparation
//! stations, tracks per-line preparation state, and keeps per-station daily
//! analytics.
//!
//! # Architecture
//!
//! ```text
//! Order source ──▶ KitchenManager ──▶ KitchenStorage (redb)
//!  (lifecycle          │
//!   calls)             ├─▶ assignment (station routing)
//!                      ├─▶ NotificationRelay ──▶ ChannelTransport
//!                      │        └─ fallback Notification rows
//!                      ├─▶ AnalyticsAggregator
//!                      └─▶ broadcast::Sender<KitchenEvent>
//! ```
//!
//! Every mutation of a kitchen order aggregate (order + lines + touched
//! staff/analytics rows) happens inside a single redb write transaction,
//! so partial status updates are never observable and concurrent
//! transition attempts serialize on the single writer.

pub mod analytics;
pub mod assignment;
pub mod branch;
pub mod core;
pub mod manager;
pub mod notify;
pub mod priority;
pub mod staff;
pub mod stations;
pub mod storage;
pub mod utils;

// Re-exports
pub use crate::core::{Config, KitchenCore, KitchenError, KitchenResult};
pub use analytics::{
    AnalyticsAggregator, KitchenReport, Recommendation, RecommendationKind, StationEfficiency,
    StationPerformance,
};
pub use assignment::{AssignmentEngine, ReassignOutcome, StationWorkload};
pub use branch::{BranchConfigSource, StaticBranchDirectory};
pub use manager::KitchenManager;
pub use notify::{ChannelTransport, MemoryTransport, NotificationRelay};
pub use priority::calculate_order_priority;
pub use staff::StaffRoster;
pub use stations::StationRegistry;
pub use storage::{KitchenStorage, StorageError, StorageResult};
