use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use comanda_core::tenant::{TenantRepository, TenantSettings};
use comanda_core::BoxError;
use comanda_delivery::{DeliveryTier, TierRepository};
use comanda_plan::{PlanRepository, TenantPlan};

/// In-memory plan store. Plans are replaced wholesale, matching the
/// immutable-per-cycle contract.
pub struct InMemoryPlanRepository {
    plans: RwLock<HashMap<Uuid, TenantPlan>>,
}

impl InMemoryPlanRepository {
    pub fn new() -> Self {
        Self {
            plans: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryPlanRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlanRepository for InMemoryPlanRepository {
    async fn get_plan(&self, tenant_id: Uuid) -> Result<Option<TenantPlan>, BoxError> {
        Ok(self.plans.read().await.get(&tenant_id).cloned())
    }

    async fn put_plan(&self, plan: &TenantPlan) -> Result<(), BoxError> {
        self.plans.write().await.insert(plan.tenant_id, plan.clone());
        Ok(())
    }
}

pub struct InMemoryTenantRepository {
    settings: RwLock<HashMap<Uuid, TenantSettings>>,
}

impl InMemoryTenantRepository {
    pub fn new() -> Self {
        Self {
            settings: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryTenantRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TenantRepository for InMemoryTenantRepository {
    async fn get_settings(&self, tenant_id: Uuid) -> Result<Option<TenantSettings>, BoxError> {
        Ok(self.settings.read().await.get(&tenant_id).cloned())
    }

    async fn put_settings(&self, settings: &TenantSettings) -> Result<(), BoxError> {
        self.settings
            .write()
            .await
            .insert(settings.tenant_id, settings.clone());
        Ok(())
    }
}

/// In-memory tier store. The whole list is swapped per replace, so a
/// concurrent fee resolution reads either the old set or the new one,
/// never a mix.
pub struct InMemoryTierRepository {
    tiers: RwLock<HashMap<Uuid, Vec<DeliveryTier>>>,
}

impl InMemoryTierRepository {
    pub fn new() -> Self {
        Self {
            tiers: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryTierRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TierRepository for InMemoryTierRepository {
    async fn tiers_for(&self, tenant_id: Uuid) -> Result<Vec<DeliveryTier>, BoxError> {
        Ok(self
            .tiers
            .read()
            .await
            .get(&tenant_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn replace_tiers(
        &self,
        tenant_id: Uuid,
        tiers: Vec<DeliveryTier>,
    ) -> Result<(), BoxError> {
        self.tiers.write().await.insert(tenant_id, tiers);
        Ok(())
    }
}
