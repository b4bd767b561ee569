//! Load / save against the fee service
//!
//! Loading turns a backend fee record into a [`Partition`]. Saving snapshots
//! local state into a [`SavePlan`] up front, so the plan can be executed
//! without holding any borrow of the session across the network calls.

use fee_client::{ClientError, ClientResult, RegionApi, ShippingFeeApi};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    BulkCreateZones, City, CityId, ShippingFee, ShippingFeeCreate, ShippingFeeUpdate, ZoneCreate,
    ZonePayload,
};

use crate::error::{EditorError, EditorResult};
use crate::money::require_valid_price;
use crate::partition::Partition;
use crate::zone::{Zone, ZoneRef, default_title};

/// Entity names: zone titles
pub const MAX_NAME_LEN: usize = 200;

/// Stopdesk, home delivery and return prices of a region pair
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FixedPrices {
    pub desktop: f64,
    pub home: f64,
    pub return_price: f64,
}

impl FixedPrices {
    pub fn new(desktop: f64, home: f64, return_price: f64) -> Self {
        Self {
            desktop,
            home,
            return_price,
        }
    }

    pub fn from_fee(fee: &ShippingFee) -> Self {
        Self::new(fee.desktop_price, fee.home_price, fee.return_price)
    }

    /// All three must be finite and `>= 0`
    pub fn validate(&self) -> EditorResult<()> {
        require_valid_price(self.desktop, "desktopPrice")?;
        require_valid_price(self.home, "homePrice")?;
        require_valid_price(self.return_price, "returnPrice")
    }
}

/// What the editor is editing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    /// New fee; the destination is picked inside the editor
    Create {
        from_region: String,
        to_region: Option<String>,
    },
    /// Existing fee
    Edit {
        fee_id: i64,
        from_region: String,
        to_region: String,
    },
}

impl EditorMode {
    pub fn from_region(&self) -> &str {
        match self {
            Self::Create { from_region, .. } | Self::Edit { from_region, .. } => from_region,
        }
    }

    pub fn to_region(&self) -> Option<&str> {
        match self {
            Self::Create { to_region, .. } => to_region.as_deref(),
            Self::Edit { to_region, .. } => Some(to_region),
        }
    }

    pub fn fee_id(&self) -> Option<i64> {
        match self {
            Self::Create { .. } => None,
            Self::Edit { fee_id, .. } => Some(*fee_id),
        }
    }
}

// ==================== Load ====================

/// A pending load, stamped with the session epoch it was started in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub(crate) epoch: u64,
    pub region_code: String,
    pub fee_id: Option<i64>,
}

impl LoadTicket {
    /// Fetch the city catalog, then the fee record when editing
    pub async fn fetch(
        &self,
        regions: &dyn RegionApi,
        fees: &dyn ShippingFeeApi,
    ) -> ClientResult<LoadedData> {
        let cities = regions.get_cities_by_code(&self.region_code).await?;
        let fee = match self.fee_id {
            Some(id) => Some(fees.get_shipping_fee_by_id(id).await?),
            None => None,
        };
        Ok(LoadedData { cities, fee })
    }
}

/// Raw load result
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedData {
    pub cities: Vec<City>,
    pub fee: Option<ShippingFee>,
}

/// Data dropped while converting a fee record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// City ids not present in the destination's catalog
    pub unknown_cities: Vec<CityId>,
    /// City ids claimed by more than one zone (kept by the first)
    pub contested_cities: Vec<CityId>,
    /// Zones that came without a usable id
    pub unidentified_zones: usize,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.unknown_cities.is_empty()
            && self.contested_cities.is_empty()
            && self.unidentified_zones == 0
    }
}

/// Build a partition from the catalog and the backend's zone list
pub fn partition_from_fee(
    catalog: Vec<City>,
    fee: Option<&ShippingFee>,
    title_prefix: &str,
) -> (Partition, LoadReport) {
    let mut partition = Partition::new(catalog);
    let mut report = LoadReport::default();

    for (index, record) in fee.map(|f| f.zones.as_slice()).unwrap_or_default().iter().enumerate() {
        let zone_ref = match record.id {
            Some(id) => ZoneRef::Persisted(id),
            None => {
                report.unidentified_zones += 1;
                ZoneRef::new_local()
            }
        };
        let title = if record.name.trim().is_empty() {
            default_title(title_prefix, index + 1)
        } else {
            record.name.clone()
        };

        let (zone_ref, rejected) =
            partition.restore_zone(Zone::new(zone_ref, title, record.price), record.city_ids());
        // a repeated backend id is restored under a fresh local ref
        if record.id.is_some() && !zone_ref.is_persisted() {
            report.unidentified_zones += 1;
        }
        report.unknown_cities.extend(rejected.unknown);
        report.contested_cities.extend(rejected.contested);
    }

    (partition, report)
}

// ==================== Save ====================

/// Zone list of a save, in tab order
pub fn zone_payloads(partition: &Partition) -> Vec<ZonePayload> {
    partition
        .zones()
        .iter()
        .map(|zone| ZonePayload {
            id: zone.zone_ref.persisted_id(),
            name: zone.title.trim().to_string(),
            price: zone.price,
            city_ids: partition.zone_cities(zone.zone_ref),
        })
        .collect()
}

fn validate_titles(partition: &Partition) -> EditorResult<()> {
    for zone in partition.zones() {
        let title = zone.title.trim();
        if title.is_empty() {
            return Err(EditorError::Validation(
                AppError::new(ErrorCode::ZoneNameInvalid).with_detail("zone", zone.zone_ref.to_string()),
            ));
        }
        if title.chars().count() > MAX_NAME_LEN {
            return Err(EditorError::Validation(
                AppError::with_message(
                    ErrorCode::ZoneNameInvalid,
                    format!("Zone name is too long (max {} chars)", MAX_NAME_LEN),
                )
                .with_detail("zone", zone.zone_ref.to_string()),
            ));
        }
    }
    Ok(())
}

/// Network work of one save, captured before the first request
#[derive(Debug, Clone, PartialEq)]
pub enum SavePlan {
    /// One PATCH carrying the prices and every zone
    Update {
        fee_id: i64,
        payload: ShippingFeeUpdate,
    },
    /// Create the fee, then bulk-create zones when there are any
    Create {
        payload: ShippingFeeCreate,
        zones: Vec<ZoneCreate>,
    },
}

impl SavePlan {
    /// Validate local state and snapshot it
    pub fn build(mode: &EditorMode, prices: FixedPrices, partition: &Partition) -> EditorResult<Self> {
        prices.validate()?;
        validate_titles(partition)?;
        let zones = zone_payloads(partition);

        match mode {
            EditorMode::Edit { fee_id, .. } => Ok(Self::Update {
                fee_id: *fee_id,
                payload: ShippingFeeUpdate {
                    desktop_price: prices.desktop,
                    home_price: prices.home,
                    return_price: prices.return_price,
                    zones,
                },
            }),
            EditorMode::Create {
                from_region,
                to_region,
            } => {
                let to_region = to_region
                    .clone()
                    .ok_or_else(|| EditorError::Validation(AppError::new(ErrorCode::DestinationRequired)))?;
                Ok(Self::Create {
                    payload: ShippingFeeCreate {
                        from_region_code: from_region.clone(),
                        to_region_code: to_region,
                        desktop_price: prices.desktop,
                        home_price: prices.home,
                        return_price: prices.return_price,
                    },
                    zones: zones.into_iter().map(ZoneCreate::from).collect(),
                })
            }
        }
    }

    pub fn zone_count(&self) -> usize {
        match self {
            Self::Update { payload, .. } => payload.zones.len(),
            Self::Create { zones, .. } => zones.len(),
        }
    }

    /// Run the plan
    ///
    /// A create whose zone step fails reports the id of the fee that was
    /// created, so the caller can retry as an update.
    pub async fn execute(&self, api: &dyn ShippingFeeApi) -> Result<SaveOutcome, SaveFailure> {
        match self {
            Self::Update { fee_id, payload } => {
                api.update_shipping_fee(*fee_id, payload)
                    .await
                    .map_err(SaveFailure::before_create)?;
                Ok(SaveOutcome {
                    fee_id: *fee_id,
                    created: false,
                    zone_count: payload.zones.len(),
                })
            }
            Self::Create { payload, zones } => {
                let fee_id = api
                    .create_shipping_fee(payload)
                    .await
                    .map_err(SaveFailure::before_create)?;
                if !zones.is_empty() {
                    let bulk = BulkCreateZones {
                        shipping_fee_id: fee_id,
                        zones: zones.clone(),
                    };
                    api.bulk_create_zones(&bulk).await.map_err(|error| SaveFailure {
                        created_fee_id: Some(fee_id),
                        error,
                    })?;
                }
                Ok(SaveOutcome {
                    fee_id,
                    created: true,
                    zone_count: zones.len(),
                })
            }
        }
    }
}

/// Successful save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOutcome {
    pub fee_id: i64,
    /// A new fee was created
    pub created: bool,
    pub zone_count: usize,
}

/// Failed save
#[derive(Debug)]
pub struct SaveFailure {
    /// Set when the fee was created but its zones were not
    pub created_fee_id: Option<i64>,
    pub error: ClientError,
}

impl SaveFailure {
    fn before_create(error: ClientError) -> Self {
        Self {
            created_fee_id: None,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{ShippingZoneRecord, ZoneCityRef};

    fn catalog() -> Vec<City> {
        (3101..=3105).map(|id| City::new(id, format!("city {id}"))).collect()
    }

    fn record(id: Option<i64>, name: &str, price: f64, cities: &[CityId]) -> ShippingZoneRecord {
        ShippingZoneRecord {
            id,
            name: name.into(),
            price,
            cities: cities
                .iter()
                .map(|id| ZoneCityRef { id: *id, name: None })
                .collect(),
        }
    }

    fn fee(zones: Vec<ShippingZoneRecord>) -> ShippingFee {
        ShippingFee {
            id: 12,
            from_region_code: "16".into(),
            to_region_code: "31".into(),
            desktop_price: 400.0,
            home_price: 650.0,
            return_price: 200.0,
            updated_at: None,
            zones,
        }
    }

    fn edit_mode() -> EditorMode {
        EditorMode::Edit {
            fee_id: 12,
            from_region: "16".into(),
            to_region: "31".into(),
        }
    }

    #[test]
    fn test_partition_from_fee() {
        let fee = fee(vec![
            record(Some(5), "Centre", 700.0, &[3101, 3102, 9999]),
            record(None, "  ", -3.0, &[3102, 3103]),
        ]);
        let (p, report) = partition_from_fee(catalog(), Some(&fee), "Zone");

        assert_eq!(p.zone_count(), 2);
        let centre = p.zones()[0].zone_ref;
        assert_eq!(centre, ZoneRef::Persisted(5));
        assert_eq!(p.zone_cities(centre), vec![3101, 3102]);

        let second = &p.zones()[1];
        assert!(!second.zone_ref.is_persisted());
        assert_eq!(second.title, "Zone 2");
        assert_eq!(second.price, 0.0);
        assert_eq!(p.zone_cities(second.zone_ref), vec![3103]);

        assert_eq!(report.unknown_cities, vec![9999]);
        assert_eq!(report.contested_cities, vec![3102]);
        assert_eq!(report.unidentified_zones, 1);
        assert!(!report.is_clean());
        assert_eq!(p.unassigned(), vec![3104, 3105]);
    }

    #[test]
    fn test_duplicate_zone_id_restored_as_local() {
        let fee = fee(vec![
            record(Some(5), "Centre", 700.0, &[3101]),
            record(Some(5), "Centre again", 650.0, &[3102]),
        ]);
        let (p, report) = partition_from_fee(catalog(), Some(&fee), "Zone");

        assert_eq!(p.zone_count(), 2);
        assert_eq!(p.zones()[0].zone_ref, ZoneRef::Persisted(5));
        let copy = &p.zones()[1];
        assert!(!copy.zone_ref.is_persisted());
        assert_eq!(copy.title, "Centre again");
        assert_eq!(p.zone_cities(copy.zone_ref), vec![3102]);
        assert_eq!(report.unidentified_zones, 1);
    }

    #[test]
    fn test_load_then_update_payload_round_trip() {
        let fee = fee(vec![
            record(Some(5), "Centre", 700.0, &[3102, 3101]),
            record(Some(6), "Coast", 550.5, &[3104]),
        ]);
        let (p, report) = partition_from_fee(catalog(), Some(&fee), "Zone");
        assert!(report.is_clean());

        let plan = SavePlan::build(&edit_mode(), FixedPrices::from_fee(&fee), &p).unwrap();
        let SavePlan::Update { fee_id, payload } = plan else {
            panic!("expected update plan");
        };
        assert_eq!(fee_id, 12);
        assert_eq!(payload.home_price, 650.0);
        for (sent, original) in payload.zones.iter().zip(&fee.zones) {
            assert_eq!(sent.id, original.id);
            assert_eq!(sent.name, original.name);
            let mut expected = original.city_ids();
            expected.sort();
            let mut got = sent.city_ids.clone();
            got.sort();
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn test_build_rejects_bad_prices() {
        let p = Partition::new(catalog());
        let err = SavePlan::build(&edit_mode(), FixedPrices::new(400.0, -1.0, 0.0), &p).unwrap_err();
        match err {
            EditorError::Validation(e) => {
                assert_eq!(e.code, ErrorCode::InvalidPrice);
                assert_eq!(e.details.unwrap()["field"], "homePrice");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(SavePlan::build(&edit_mode(), FixedPrices::new(f64::NAN, 0.0, 0.0), &p).is_err());
    }

    #[test]
    fn test_build_create_requires_destination() {
        let p = Partition::new(catalog());
        let mode = EditorMode::Create {
            from_region: "16".into(),
            to_region: None,
        };
        let err = SavePlan::build(&mode, FixedPrices::default(), &p).unwrap_err();
        assert!(matches!(err, EditorError::Validation(ref e) if e.code == ErrorCode::DestinationRequired));
    }

    #[test]
    fn test_build_rejects_blank_and_long_titles() {
        let mut p = Partition::new(catalog());
        let z = p.create_zone("   ", 0.0);
        assert!(SavePlan::build(&edit_mode(), FixedPrices::default(), &p).is_err());

        p.rename_zone(z, "x".repeat(MAX_NAME_LEN + 1)).unwrap();
        assert!(SavePlan::build(&edit_mode(), FixedPrices::default(), &p).is_err());

        p.rename_zone(z, " North ").unwrap();
        let plan = SavePlan::build(&edit_mode(), FixedPrices::default(), &p).unwrap();
        let SavePlan::Update { payload, .. } = plan else {
            panic!("expected update plan");
        };
        assert_eq!(payload.zones[0].name, "North");
        assert_eq!(payload.zones[0].id, None);
    }

    #[test]
    fn test_build_create_plan() {
        let mut p = Partition::new(catalog());
        let z = p.create_zone("Zone 1", 450.0);
        p.transfer(&[3105, 3101], crate::transfer::TransferTarget::Zone(z)).unwrap();
        let mode = EditorMode::Create {
            from_region: "16".into(),
            to_region: Some("31".into()),
        };

        let plan = SavePlan::build(&mode, FixedPrices::new(300.0, 500.0, 150.0), &p).unwrap();
        assert_eq!(plan.zone_count(), 1);
        let SavePlan::Create { payload, zones } = plan else {
            panic!("expected create plan");
        };
        assert_eq!(payload.to_region_code, "31");
        assert_eq!(zones[0].city_ids, vec![3101, 3105]);
    }

    #[test]
    fn test_mode_accessors() {
        let mode = edit_mode();
        assert_eq!(mode.fee_id(), Some(12));
        assert_eq!(mode.to_region(), Some("31"));
        let mode = EditorMode::Create {
            from_region: "16".into(),
            to_region: None,
        };
        assert_eq!(mode.from_region(), "16");
        assert_eq!(mode.to_region(), None);
    }
}
