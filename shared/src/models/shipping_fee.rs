//! Shipping fee and zone models
//!
//! A shipping fee prices one origin → destination region pair. Besides the
//! three fixed prices it carries an optional list of zones, each grouping
//! destination cities under its own price.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::region::CityId;
use super::serde_helpers::{flexible_id, flexible_id_opt, flexible_price};

/// Shipping fee record as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingFee {
    #[serde(deserialize_with = "flexible_id")]
    pub id: i64,
    #[serde(rename = "fromWilayaCode")]
    pub from_region_code: String,
    #[serde(rename = "toWilayaCode")]
    pub to_region_code: String,
    /// Stopdesk price
    #[serde(default, deserialize_with = "flexible_price")]
    pub desktop_price: f64,
    #[serde(default, deserialize_with = "flexible_price")]
    pub home_price: f64,
    #[serde(default, deserialize_with = "flexible_price")]
    pub return_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Only populated by the detail endpoint
    #[serde(default)]
    pub zones: Vec<ShippingZoneRecord>,
}

/// Zone as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingZoneRecord {
    #[serde(default, deserialize_with = "flexible_id_opt")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "flexible_price")]
    pub price: f64,
    #[serde(default)]
    pub cities: Vec<ZoneCityRef>,
}

impl ShippingZoneRecord {
    /// City ids in backend order
    pub fn city_ids(&self) -> Vec<CityId> {
        self.cities.iter().map(|c| c.id).collect()
    }
}

/// City reference embedded in a zone record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneCityRef {
    #[serde(deserialize_with = "flexible_id")]
    pub id: CityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Create shipping fee payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingFeeCreate {
    #[serde(rename = "fromWilayaCode")]
    pub from_region_code: String,
    #[serde(rename = "toWilayaCode")]
    pub to_region_code: String,
    pub desktop_price: f64,
    pub home_price: f64,
    pub return_price: f64,
}

/// Update shipping fee payload
///
/// Carries the complete zone list; the backend reconciles zones itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingFeeUpdate {
    pub desktop_price: f64,
    pub home_price: f64,
    pub return_price: f64,
    pub zones: Vec<ZonePayload>,
}

/// Zone entry of an update payload
///
/// `id` is omitted for zones created during the current edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZonePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub price: f64,
    pub city_ids: Vec<CityId>,
}

/// Zone entry of a bulk create payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneCreate {
    pub name: String,
    pub price: f64,
    pub city_ids: Vec<CityId>,
}

/// Bulk create zones payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkCreateZones {
    pub shipping_fee_id: i64,
    pub zones: Vec<ZoneCreate>,
}

impl From<ZonePayload> for ZoneCreate {
    fn from(zone: ZonePayload) -> Self {
        Self {
            name: zone.name,
            price: zone.price,
            city_ids: zone.city_ids,
        }
    }
}

/// Fee list query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingFeeQuery {
    #[serde(rename = "fromWilayaCode", skip_serializing_if = "Option::is_none")]
    pub from_region_code: Option<String>,
    pub page: u32,
    pub limit: u32,
}

impl ShippingFeeQuery {
    pub fn from_region(code: impl Into<String>) -> Self {
        Self {
            from_region_code: Some(code.into()),
            page: 1,
            limit: 10,
        }
    }

    pub fn paginate(mut self, page: u32, limit: u32) -> Self {
        self.page = page.max(1);
        self.limit = limit.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_detail_with_string_prices() {
        let json = r#"{
            "id": 12,
            "fromWilayaCode": "16",
            "toWilayaCode": "31",
            "desktopPrice": "400.00",
            "homePrice": 650,
            "returnPrice": null,
            "updatedAt": "2025-03-01T10:00:00Z",
            "zones": [
                {"id": 5, "name": "Centre", "price": "700", "cities": [{"id": 3101}, {"id": "3102", "name": "Bir El Djir"}]}
            ]
        }"#;
        let fee: ShippingFee = serde_json::from_str(json).unwrap();
        assert_eq!(fee.id, 12);
        assert_eq!(fee.from_region_code, "16");
        assert_eq!(fee.desktop_price, 400.0);
        assert_eq!(fee.return_price, 0.0);
        assert!(fee.updated_at.is_some());
        assert_eq!(fee.zones[0].id, Some(5));
        assert_eq!(fee.zones[0].price, 700.0);
        assert_eq!(fee.zones[0].city_ids(), vec![3101, 3102]);
    }

    #[test]
    fn test_fee_summary_without_zones() {
        let json = r#"{"id":"3","fromWilayaCode":"16","toWilayaCode":"09","desktopPrice":300,"homePrice":500,"returnPrice":200}"#;
        let fee: ShippingFee = serde_json::from_str(json).unwrap();
        assert_eq!(fee.id, 3);
        assert!(fee.zones.is_empty());
    }

    #[test]
    fn test_zone_payload_omits_missing_id() {
        let zone = ZonePayload {
            id: None,
            name: "Zone 2".into(),
            price: 500.0,
            city_ids: vec![1, 2],
        };
        let json = serde_json::to_value(&zone).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["cityIds"], serde_json::json!([1, 2]));

        let zone = ZonePayload { id: Some(9), ..zone };
        let json = serde_json::to_value(&zone).unwrap();
        assert_eq!(json["id"], 9);
    }

    #[test]
    fn test_create_payload_wire_names() {
        let payload = ShippingFeeCreate {
            from_region_code: "16".into(),
            to_region_code: "31".into(),
            desktop_price: 400.0,
            home_price: 600.0,
            return_price: 200.0,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["fromWilayaCode"], "16");
        assert_eq!(json["toWilayaCode"], "31");
        assert_eq!(json["desktopPrice"], 400.0);
    }

    #[test]
    fn test_bulk_create_wire_names() {
        let payload = BulkCreateZones {
            shipping_fee_id: 44,
            zones: vec![ZoneCreate {
                name: "North".into(),
                price: 500.0,
                city_ids: vec![1],
            }],
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["shippingFeeId"], 44);
        assert_eq!(json["zones"][0]["cityIds"], serde_json::json!([1]));
    }

    #[test]
    fn test_query_paginate_clamps() {
        let q = ShippingFeeQuery::from_region("16").paginate(0, 0);
        assert_eq!(q.page, 1);
        assert_eq!(q.limit, 1);
    }
}
