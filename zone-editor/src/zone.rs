//! Zone identity and metadata

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

/// Zone identifier
///
/// Zones loaded from the backend keep their server id; zones created in the
/// current session get a random local id until they are saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum ZoneRef {
    Persisted(i64),
    Local(Uuid),
}

impl ZoneRef {
    /// Fresh local id
    pub fn new_local() -> Self {
        Self::Local(Uuid::new_v4())
    }

    /// Server id, if the zone exists on the backend
    pub fn persisted_id(&self) -> Option<i64> {
        match self {
            Self::Persisted(id) => Some(*id),
            Self::Local(_) => None,
        }
    }

    pub fn is_persisted(&self) -> bool {
        matches!(self, Self::Persisted(_))
    }
}

impl fmt::Display for ZoneRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Persisted(id) => write!(f, "{}", id),
            Self::Local(uuid) => write!(f, "local:{}", uuid),
        }
    }
}

/// Zone metadata
///
/// Cities are not stored here; the partition owns the city → zone mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Zone {
    pub zone_ref: ZoneRef,
    pub title: String,
    pub price: f64,
}

impl Zone {
    pub fn new(zone_ref: ZoneRef, title: impl Into<String>, price: f64) -> Self {
        Self {
            zone_ref,
            title: title.into(),
            price,
        }
    }
}

/// Default title for the n-th zone (1-based)
pub fn default_title(prefix: &str, n: usize) -> String {
    format!("{} {}", prefix, n)
}
