//! Unified error system
//!
//! - [`ErrorCode`]: standardized numeric error codes
//! - [`AppError`]: rich error type with code, message and details
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Region errors
//! - 4xxx: Shipping fee errors
//! - 5xxx: Zone errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::invalid_price("returnPrice");
//! assert_eq!(err.code, ErrorCode::InvalidPrice);
//! assert_eq!(err.code.code(), 4003);
//! ```

mod codes;
mod http;
mod types;

pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::AppError;
