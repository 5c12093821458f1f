//! Unified error codes shared between the kitchen core and its callers

mod codes;

pub use codes::{ErrorCode, InvalidErrorCode};
