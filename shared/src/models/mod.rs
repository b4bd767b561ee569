//! Data models
//!
//! Wire types shared between the HTTP client and the zone editor. Field
//! names follow the backend's camelCase JSON (`fromWilayaCode`, `cityIds`).

pub mod region;
pub mod serde_helpers;
pub mod shipping_fee;

// Re-exports
pub use region::*;
pub use shipping_fee::*;
