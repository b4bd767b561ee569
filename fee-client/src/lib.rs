//! Fee Client - HTTP client for the shipping admin backend
//!
//! Provides typed access to the shipping fee / zone service and to the
//! region directory.

pub mod api;
pub mod config;
pub mod error;
pub mod http;

pub use api::{RegionApi, ShippingFeeApi};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, NetworkHttpClient};
