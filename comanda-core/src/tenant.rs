use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::BoxError;

/// Geographic coordinates of a restaurant or a delivery address.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Restaurant profile fields that order processing reads.
///
/// When `coordinates` is absent the tenant runs in flat-fee mode: every
/// delivery order is priced with `flat_delivery_fee_cents` and the
/// distance-tier resolver never runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantSettings {
    pub tenant_id: Uuid,
    pub name: String,
    pub coordinates: Option<GeoPoint>,
    pub flat_delivery_fee_cents: i32,
}

impl TenantSettings {
    pub fn new(tenant_id: Uuid, name: String) -> Self {
        Self {
            tenant_id,
            name,
            coordinates: None,
            flat_delivery_fee_cents: 0,
        }
    }
}

/// Repository trait for tenant profile access
#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn get_settings(&self, tenant_id: Uuid) -> Result<Option<TenantSettings>, BoxError>;

    async fn put_settings(&self, settings: &TenantSettings) -> Result<(), BoxError>;
}
