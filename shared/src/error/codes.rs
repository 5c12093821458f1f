//! Unified error codes for the kitchen display system
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Kitchen errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,

    // ==================== 4xxx: Kitchen ====================
    /// Illegal state transition attempted
    InvalidTransition = 4001,
    /// Line action requires a station that is absent
    NoStationAssigned = 4002,
    /// Reassignment target station is inactive
    StationInactive = 4003,
    /// Station not found
    StationNotFound = 4004,
    /// Staff member not found
    StaffNotFound = 4005,
    /// Staff member is not available
    StaffUnavailable = 4006,
    /// Kitchen order not found
    OrderNotFound = 4007,
    /// Kitchen order line not found
    LineNotFound = 4008,
    /// Kitchen feature is disabled for this branch
    KitchenDisabled = 4009,
    /// Kitchen has active orders blocking the operation
    KitchenBusy = 4010,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9000,
    /// Storage is full
    StorageFull = 9001,
    /// Storage is corrupted
    StorageCorrupted = 9002,
    /// System is busy, retry later
    SystemBusy = 9003,
}

impl ErrorCode {
    /// Numeric error code value
    #[inline]
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Default English message for the code (callers localize as needed)
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "Unknown error",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidTransition => "Illegal state transition",
            ErrorCode::NoStationAssigned => "No station assigned",
            ErrorCode::StationInactive => "Station is inactive",
            ErrorCode::StationNotFound => "Station not found",
            ErrorCode::StaffNotFound => "Staff member not found",
            ErrorCode::StaffUnavailable => "Staff member is not available",
            ErrorCode::OrderNotFound => "Kitchen order not found",
            ErrorCode::LineNotFound => "Kitchen order line not found",
            ErrorCode::KitchenDisabled => "Kitchen is disabled for this branch",
            ErrorCode::KitchenBusy => "Kitchen has active orders",
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::StorageFull => "Storage is full",
            ErrorCode::StorageCorrupted => "Storage is corrupted",
            ErrorCode::SystemBusy => "System is busy",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when deserializing an unknown error code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),

            // Kitchen
            4001 => Ok(ErrorCode::InvalidTransition),
            4002 => Ok(ErrorCode::NoStationAssigned),
            4003 => Ok(ErrorCode::StationInactive),
            4004 => Ok(ErrorCode::StationNotFound),
            4005 => Ok(ErrorCode::StaffNotFound),
            4006 => Ok(ErrorCode::StaffUnavailable),
            4007 => Ok(ErrorCode::OrderNotFound),
            4008 => Ok(ErrorCode::LineNotFound),
            4009 => Ok(ErrorCode::KitchenDisabled),
            4010 => Ok(ErrorCode::KitchenBusy),

            // System
            9000 => Ok(ErrorCode::InternalError),
            9001 => Ok(ErrorCode::StorageFull),
            9002 => Ok(ErrorCode::StorageCorrupted),
            9003 => Ok(ErrorCode::SystemBusy),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}
