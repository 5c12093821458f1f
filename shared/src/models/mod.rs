//! Stored model types for the kitchen core

pub mod analytics;
pub mod kitchen_order;
pub mod notification;
pub mod staff;
pub mod station;

pub use analytics::StationDailyAnalytics;
pub use kitchen_order::{KitchenLineRecord, KitchenOrderRecord};
pub use notification::Notification;
pub use staff::StaffAssignment;
pub use station::{Station, StationCreate, StationUpdate};
