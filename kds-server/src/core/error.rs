//! Kitchen core error taxonomy
//!
//! `InvalidTransition` is always surfaced to the caller and never retried
//! automatically. Transport failures never appear here; the notification
//! relay converts them into persisted fallback rows. Analytics and
//! auto-assignment sweeps swallow per-item failures.

use shared::ErrorCode;
use thiserror::Error;

use crate::storage::StorageError;

/// Kitchen core errors
#[derive(Debug, Error)]
pub enum KitchenError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Line {0} has no station assigned")]
    NoStationAssigned(u64),

    #[error("Station is inactive: {0}")]
    StationInactive(u64),

    #[error("Station not found: {0}")]
    StationNotFound(u64),

    #[error("Station {0} is still referenced by kitchen orders")]
    StationReferenced(u64),

    #[error("Station name already exists in branch: {0}")]
    DuplicateStation(String),

    #[error("Staff not found: {0}")]
    StaffNotFound(u64),

    #[error("User {user_id} is already registered at station {station_id:?}")]
    DuplicateStaff {
        user_id: i64,
        station_id: Option<u64>,
    },

    #[error("Staff member is not available: {0}")]
    StaffUnavailable(u64),

    #[error("Kitchen order not found: {0}")]
    OrderNotFound(String),

    #[error("Line not found: {0}")]
    LineNotFound(u64),

    #[error("Notification not found: {0}")]
    NotificationNotFound(u64),

    #[error("Kitchen has {0} active orders")]
    KitchenBusy(usize),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type KitchenResult<T> = Result<T, KitchenError>;

impl KitchenError {
    /// Map to the unified error code surfaced to callers
    pub fn code(&self) -> ErrorCode {
        match self {
            KitchenError::Storage(e) => classify_storage_error(e),
            KitchenError::InvalidTransition(_) => ErrorCode::InvalidTransition,
            KitchenError::NoStationAssigned(_) => ErrorCode::NoStationAssigned,
            KitchenError::StationInactive(_) => ErrorCode::StationInactive,
            KitchenError::StationNotFound(_) => ErrorCode::StationNotFound,
            KitchenError::StationReferenced(_) => ErrorCode::KitchenBusy,
            KitchenError::DuplicateStation(_) => ErrorCode::AlreadyExists,
            KitchenError::StaffNotFound(_) => ErrorCode::StaffNotFound,
            KitchenError::DuplicateStaff { .. } => ErrorCode::AlreadyExists,
            KitchenError::StaffUnavailable(_) => ErrorCode::StaffUnavailable,
            KitchenError::OrderNotFound(_) => ErrorCode::OrderNotFound,
            KitchenError::LineNotFound(_) => ErrorCode::LineNotFound,
            KitchenError::NotificationNotFound(_) => ErrorCode::NotFound,
            KitchenError::KitchenBusy(_) => ErrorCode::KitchenBusy,
            KitchenError::Validation(_) => ErrorCode::ValidationFailed,
        }
    }
}

/// Classify a storage error into a caller-facing code
fn classify_storage_error(e: &StorageError) -> ErrorCode {
    if let StorageError::Serialization(_) = e {
        return ErrorCode::InternalError;
    }

    let err_str = e.to_string().to_lowercase();

    if err_str.contains("no space") || err_str.contains("disk full") || err_str.contains("enospc") {
        return ErrorCode::StorageFull;
    }

    if err_str.contains("corrupt") || err_str.contains("invalid database") {
        return ErrorCode::StorageCorrupted;
    }

    ErrorCode::SystemBusy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            KitchenError::InvalidTransition("pending -> completed".into()).code(),
            ErrorCode::InvalidTransition
        );
        assert_eq!(
            KitchenError::NoStationAssigned(7).code(),
            ErrorCode::NoStationAssigned
        );
        assert_eq!(
            KitchenError::OrderNotFound("ord-1".into()).code(),
            ErrorCode::OrderNotFound
        );
        assert_eq!(
            KitchenError::DuplicateStation("Grill".into()).code(),
            ErrorCode::AlreadyExists
        );
    }
}
