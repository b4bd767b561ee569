//! Region (wilaya) and City models

use serde::{Deserialize, Serialize};

use super::serde_helpers::FlexibleId;

/// City identifier as assigned by the region directory
pub type CityId = i64;

/// Top-level destination region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub code: String,
    pub name: String,
    /// Arabic name
    #[serde(rename = "ar_name", default, skip_serializing_if = "Option::is_none")]
    pub localized_name: Option<String>,
}

/// City inside a region; the unit partitioned into zones
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CityWire")]
pub struct City {
    pub id: CityId,
    pub name: String,
    #[serde(rename = "ar_name", skip_serializing_if = "Option::is_none")]
    pub localized_name: Option<String>,
}

impl City {
    pub fn new(id: CityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            localized_name: None,
        }
    }

    pub fn with_localized_name(mut self, name: impl Into<String>) -> Self {
        self.localized_name = Some(name.into());
        self
    }
}

/// Directory payload: some cities carry `id`, older ones only a `code`.
#[derive(Deserialize)]
struct CityWire {
    #[serde(default)]
    id: Option<FlexibleId>,
    #[serde(default)]
    code: Option<FlexibleId>,
    name: String,
    #[serde(default)]
    ar_name: Option<String>,
}

impl TryFrom<CityWire> for City {
    type Error = String;

    fn try_from(wire: CityWire) -> Result<Self, Self::Error> {
        let id = wire
            .id
            .or(wire.code)
            .ok_or_else(|| format!("city '{}' has neither id nor code", wire.name))?;
        Ok(Self {
            id: id.0,
            name: wire.name,
            localized_name: wire.ar_name,
        })
    }
}
