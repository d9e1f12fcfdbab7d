use async_trait::async_trait;
use uuid::Uuid;

use comanda_core::BoxError;

use crate::models::TenantPlan;

/// Repository trait for subscription records
#[async_trait]
pub trait PlanRepository: Send + Sync {
    async fn get_plan(&self, tenant_id: Uuid) -> Result<Option<TenantPlan>, BoxError>;

    /// Wholesale replacement; plans are never partially mutated.
    async fn put_plan(&self, plan: &TenantPlan) -> Result<(), BoxError>;
}
