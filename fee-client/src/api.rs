//! Typed service APIs
//!
//! [`ShippingFeeApi`] and [`RegionApi`] are the seams the zone editor talks
//! to. [`NetworkHttpClient`] implements both over REST; tests substitute
//! in-memory fakes.

use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;
use shared::models::serde_helpers::flexible_id;
use shared::models::{
    BulkCreateZones, City, Region, ShippingFee, ShippingFeeCreate, ShippingFeeQuery,
    ShippingFeeUpdate,
};
use shared::PaginatedResponse;

use crate::http::{HttpClient, NetworkHttpClient};
use crate::ClientResult;

/// Fee and zone endpoints
#[async_trait]
pub trait ShippingFeeApi: Send + Sync {
    /// Full fee record including zones and their cities
    async fn get_shipping_fee_by_id(&self, id: i64) -> ClientResult<ShippingFee>;

    /// One page of fees, optionally filtered by origin region
    async fn list_shipping_fees(
        &self,
        query: &ShippingFeeQuery,
    ) -> ClientResult<PaginatedResponse<ShippingFee>>;

    /// Create a fee; returns the new server id
    async fn create_shipping_fee(&self, payload: &ShippingFeeCreate) -> ClientResult<i64>;

    /// Replace fixed prices and the whole zone list of a fee
    async fn update_shipping_fee(&self, id: i64, payload: &ShippingFeeUpdate) -> ClientResult<()>;

    async fn bulk_create_zones(&self, payload: &BulkCreateZones) -> ClientResult<()>;

    async fn delete_zone(&self, zone_id: i64) -> ClientResult<()>;

    async fn delete_shipping_fee(&self, id: i64) -> ClientResult<()>;

    /// Delete several fees concurrently
    ///
    /// Every id is attempted; the result for each id is returned in input
    /// order.
    async fn delete_shipping_fees(&self, ids: &[i64]) -> Vec<(i64, ClientResult<()>)> {
        let results = join_all(ids.iter().map(|id| self.delete_shipping_fee(*id))).await;
        ids.iter().copied().zip(results).collect()
    }
}

/// Region / city directory endpoints
#[async_trait]
pub trait RegionApi: Send + Sync {
    async fn get_regions(&self) -> ClientResult<Vec<Region>>;

    async fn get_cities_by_code(&self, region_code: &str) -> ClientResult<Vec<City>>;
}

/// `{ "id": ... }` part of a create response
#[derive(Deserialize)]
struct Created {
    #[serde(deserialize_with = "flexible_id")]
    id: i64,
}

#[async_trait]
impl ShippingFeeApi for NetworkHttpClient {
    async fn get_shipping_fee_by_id(&self, id: i64) -> ClientResult<ShippingFee> {
        self.get(&format!("shipping-fees/{}", id)).await
    }

    async fn list_shipping_fees(
        &self,
        query: &ShippingFeeQuery,
    ) -> ClientResult<PaginatedResponse<ShippingFee>> {
        self.get_query("shipping-fees", query).await
    }

    async fn create_shipping_fee(&self, payload: &ShippingFeeCreate) -> ClientResult<i64> {
        let created: Created = self.post("shipping-fees", payload).await?;
        tracing::info!(
            fee_id = created.id,
            from = %payload.from_region_code,
            to = %payload.to_region_code,
            "Shipping fee created"
        );
        Ok(created.id)
    }

    async fn update_shipping_fee(&self, id: i64, payload: &ShippingFeeUpdate) -> ClientResult<()> {
        self.patch_no_content(&format!("shipping-fees/{}", id), payload)
            .await?;
        tracing::info!(fee_id = id, zones = payload.zones.len(), "Shipping fee updated");
        Ok(())
    }

    async fn bulk_create_zones(&self, payload: &BulkCreateZones) -> ClientResult<()> {
        self.post_no_content("shipping-fees/zones/bulk", payload)
            .await?;
        tracing::info!(
            fee_id = payload.shipping_fee_id,
            zones = payload.zones.len(),
            "Zones created"
        );
        Ok(())
    }

    async fn delete_zone(&self, zone_id: i64) -> ClientResult<()> {
        self.delete_no_content(&format!("shipping-fees/zones/{}", zone_id))
            .await?;
        tracing::info!(zone_id, "Zone deleted");
        Ok(())
    }

    async fn delete_shipping_fee(&self, id: i64) -> ClientResult<()> {
        self.delete_no_content(&format!("shipping-fees/{}", id))
            .await?;
        tracing::info!(fee_id = id, "Shipping fee deleted");
        Ok(())
    }
}

#[async_trait]
impl RegionApi for NetworkHttpClient {
    async fn get_regions(&self) -> ClientResult<Vec<Region>> {
        self.get("wilayas").await
    }

    async fn get_cities_by_code(&self, region_code: &str) -> ClientResult<Vec<City>> {
        self.get(&format!("wilayas/{}/cities", region_code)).await
    }
}
