// zone-editor/tests/common/mod.rs
// In-memory fee / region backend for editor tests

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use fee_client::{ClientError, ClientResult, RegionApi, ShippingFeeApi};
use shared::error::ErrorCode;
use shared::models::{
    BulkCreateZones, City, ShippingFee, ShippingFeeCreate, ShippingFeeQuery, ShippingFeeUpdate,
    ShippingZoneRecord, ZoneCityRef,
};
use shared::PaginatedResponse;

/// Backend call, recorded in order
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetFee(i64),
    ListFees(ShippingFeeQuery),
    CreateFee(ShippingFeeCreate),
    UpdateFee(i64, ShippingFeeUpdate),
    BulkCreateZones(BulkCreateZones),
    DeleteZone(i64),
    DeleteFee(i64),
    GetCities(String),
}

#[derive(Default)]
struct State {
    fees: HashMap<i64, ShippingFee>,
    cities: HashMap<String, Vec<City>>,
    calls: Vec<Call>,
    failing: HashSet<&'static str>,
    failing_fee_deletes: HashSet<i64>,
    next_fee_id: i64,
    next_zone_id: i64,
}

#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<State>,
}

impl FakeBackend {
    pub fn new() -> Self {
        let backend = Self::default();
        {
            let mut state = backend.state.lock().unwrap();
            state.next_fee_id = 100;
            state.next_zone_id = 500;
        }
        backend
    }

    pub fn with_cities(self, region: &str, cities: Vec<City>) -> Self {
        self.state
            .lock()
            .unwrap()
            .cities
            .insert(region.to_string(), cities);
        self
    }

    pub fn with_fee(self, fee: ShippingFee) -> Self {
        self.state.lock().unwrap().fees.insert(fee.id, fee);
        self
    }

    /// Make an operation fail: "get_fee", "get_cities", "create_fee",
    /// "update_fee", "bulk_create_zones", "delete_zone", "list_fees"
    pub fn fail_on(&self, op: &'static str) {
        self.state.lock().unwrap().failing.insert(op);
    }

    pub fn recover(&self, op: &'static str) {
        self.state.lock().unwrap().failing.remove(op);
    }

    pub fn fail_fee_delete(&self, id: i64) {
        self.state.lock().unwrap().failing_fee_deletes.insert(id);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn fee(&self, id: i64) -> Option<ShippingFee> {
        self.state.lock().unwrap().fees.get(&id).cloned()
    }

    pub fn fee_count(&self) -> usize {
        self.state.lock().unwrap().fees.len()
    }

    fn record(&self, call: Call, op: &'static str) -> ClientResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.failing.contains(op) {
            return Err(ClientError::Api {
                status: 500,
                code: ErrorCode::InternalError,
                message: format!("{op} failed"),
                details: None,
            });
        }
        Ok(())
    }
}

fn zone_record(id: i64, name: &str, price: f64, city_ids: &[i64]) -> ShippingZoneRecord {
    ShippingZoneRecord {
        id: Some(id),
        name: name.to_string(),
        price,
        cities: city_ids
            .iter()
            .map(|id| ZoneCityRef { id: *id, name: None })
            .collect(),
    }
}

#[async_trait]
impl ShippingFeeApi for FakeBackend {
    async fn get_shipping_fee_by_id(&self, id: i64) -> ClientResult<ShippingFee> {
        self.record(Call::GetFee(id), "get_fee")?;
        self.fee(id)
            .ok_or_else(|| ClientError::NotFound(format!("shipping fee {id}")))
    }

    async fn list_shipping_fees(
        &self,
        query: &ShippingFeeQuery,
    ) -> ClientResult<PaginatedResponse<ShippingFee>> {
        self.record(Call::ListFees(query.clone()), "list_fees")?;
        let state = self.state.lock().unwrap();
        let mut rows: Vec<ShippingFee> = state
            .fees
            .values()
            .filter(|f| {
                query
                    .from_region_code
                    .as_ref()
                    .is_none_or(|code| &f.from_region_code == code)
            })
            .cloned()
            .collect();
        rows.sort_by_key(|f| f.id);
        let total = rows.len() as u64;
        let start = ((query.page.max(1) - 1) * query.limit) as usize;
        let data = rows
            .into_iter()
            .skip(start)
            .take(query.limit as usize)
            .collect();
        Ok(PaginatedResponse::new(data, total, query.page, query.limit))
    }

    async fn create_shipping_fee(&self, payload: &ShippingFeeCreate) -> ClientResult<i64> {
        self.record(Call::CreateFee(payload.clone()), "create_fee")?;
        let mut state = self.state.lock().unwrap();
        let id = state.next_fee_id;
        state.next_fee_id += 1;
        state.fees.insert(
            id,
            ShippingFee {
                id,
                from_region_code: payload.from_region_code.clone(),
                to_region_code: payload.to_region_code.clone(),
                desktop_price: payload.desktop_price,
                home_price: payload.home_price,
                return_price: payload.return_price,
                updated_at: None,
                zones: Vec::new(),
            },
        );
        Ok(id)
    }

    async fn update_shipping_fee(&self, id: i64, payload: &ShippingFeeUpdate) -> ClientResult<()> {
        self.record(Call::UpdateFee(id, payload.clone()), "update_fee")?;
        let mut state = self.state.lock().unwrap();
        let mut next_zone_id = state.next_zone_id;
        let fee = state
            .fees
            .get_mut(&id)
            .ok_or_else(|| ClientError::NotFound(format!("shipping fee {id}")))?;
        fee.desktop_price = payload.desktop_price;
        fee.home_price = payload.home_price;
        fee.return_price = payload.return_price;
        fee.zones = payload
            .zones
            .iter()
            .map(|z| {
                let zone_id = z.id.unwrap_or_else(|| {
                    next_zone_id += 1;
                    next_zone_id
                });
                zone_record(zone_id, &z.name, z.price, &z.city_ids)
            })
            .collect();
        state.next_zone_id = next_zone_id;
        Ok(())
    }

    async fn bulk_create_zones(&self, payload: &BulkCreateZones) -> ClientResult<()> {
        self.record(Call::BulkCreateZones(payload.clone()), "bulk_create_zones")?;
        let mut state = self.state.lock().unwrap();
        let mut next_zone_id = state.next_zone_id;
        let fee = state
            .fees
            .get_mut(&payload.shipping_fee_id)
            .ok_or_else(|| ClientError::NotFound("shipping fee".into()))?;
        for z in &payload.zones {
            next_zone_id += 1;
            fee.zones
                .push(zone_record(next_zone_id, &z.name, z.price, &z.city_ids));
        }
        state.next_zone_id = next_zone_id;
        Ok(())
    }

    async fn delete_zone(&self, zone_id: i64) -> ClientResult<()> {
        self.record(Call::DeleteZone(zone_id), "delete_zone")?;
        let mut state = self.state.lock().unwrap();
        for fee in state.fees.values_mut() {
            fee.zones.retain(|z| z.id != Some(zone_id));
        }
        Ok(())
    }

    async fn delete_shipping_fee(&self, id: i64) -> ClientResult<()> {
        self.record(Call::DeleteFee(id), "delete_fee")?;
        let mut state = self.state.lock().unwrap();
        if state.failing_fee_deletes.contains(&id) {
            return Err(ClientError::Api {
                status: 409,
                code: ErrorCode::InvalidRequest,
                message: "fee is in use".into(),
                details: None,
            });
        }
        state.fees.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl RegionApi for FakeBackend {
    async fn get_regions(&self) -> ClientResult<Vec<shared::models::Region>> {
        Ok(Vec::new())
    }

    async fn get_cities_by_code(&self, region_code: &str) -> ClientResult<Vec<City>> {
        self.record(Call::GetCities(region_code.to_string()), "get_cities")?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .cities
            .get(region_code)
            .cloned()
            .unwrap_or_default())
    }
}

// ==================== Fixtures ====================

/// Oran: five cities
pub fn oran_cities() -> Vec<City> {
    vec![
        City::new(3101, "Oran"),
        City::new(3102, "Bir El Djir"),
        City::new(3103, "Es Senia"),
        City::new(3104, "Ain Turk"),
        City::new(3105, "Arzew"),
    ]
}

/// Fee 12 (16 → 31) with two persisted zones
pub fn oran_fee() -> ShippingFee {
    ShippingFee {
        id: 12,
        from_region_code: "16".into(),
        to_region_code: "31".into(),
        desktop_price: 400.0,
        home_price: 650.0,
        return_price: 200.0,
        updated_at: None,
        zones: vec![
            zone_record(5, "Centre", 700.0, &[3101, 3102]),
            zone_record(6, "Coast", 550.5, &[3104]),
        ],
    }
}

pub fn backend() -> FakeBackend {
    FakeBackend::new()
        .with_cities("31", oran_cities())
        .with_cities(
            "09",
            vec![City::new(901, "Blida"), City::new(902, "Boufarik")],
        )
        .with_fee(oran_fee())
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("zone_editor=debug")
        .with_test_writer()
        .try_init();
}
