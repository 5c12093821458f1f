//! Kitchen domain types
//!
//! - **types**: preparation status enums and actor context
//! - **settings**: per-branch kitchen configuration
//! - **source**: snapshots of the originating order, carried by lifecycle calls
//! - **event**: status-change events published by the kitchen core

pub mod event;
pub mod settings;
pub mod source;
pub mod types;

pub use event::{KitchenEvent, KitchenEventKind};
pub use settings::{BranchKitchenConfig, KitchenSettings};
pub use source::{SourceOrder, SourceOrderLine, SourceOrderStatus};
pub use types::{ActorContext, OrderType, PrepStatus, StaffRole};
