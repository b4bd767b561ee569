//! Shared types for the shipping admin workspace
//!
//! Wire models for regions, cities, shipping fees and zones, the unified
//! error code system, and small utilities used by both the HTTP client and
//! the zone editor.

pub mod error;
pub mod models;
pub mod query;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, ErrorCode};
pub use query::{PageMeta, PaginatedResponse};
