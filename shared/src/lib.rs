//! Shared types for the kitchen display system
//!
//! Common types used by the kitchen core and its collaborators: status
//! enums, source-order event payloads, branch kitchen settings, stored
//! model types, and unified error codes.

pub mod error;
pub mod kitchen;
pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::ErrorCode;
pub use kitchen::{
    ActorContext, BranchKitchenConfig, KitchenEvent, KitchenEventKind, KitchenSettings, OrderType,
    PrepStatus, SourceOrder, SourceOrderLine, SourceOrderStatus, StaffRole,
};
