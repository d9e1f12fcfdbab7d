use async_trait::async_trait;
use uuid::Uuid;

use comanda_core::BoxError;

use crate::models::DeliveryTier;

/// Repository trait for tenant delivery tier access.
///
/// `replace_tiers` swaps the whole list in one step so concurrent fee
/// resolution always reads a consistent snapshot, never a half-written set.
#[async_trait]
pub trait TierRepository: Send + Sync {
    async fn tiers_for(&self, tenant_id: Uuid) -> Result<Vec<DeliveryTier>, BoxError>;

    async fn replace_tiers(
        &self,
        tenant_id: Uuid,
        tiers: Vec<DeliveryTier>,
    ) -> Result<(), BoxError>;
}
