use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subscription tier of a tenant
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanTier {
    Free,
    DeliveryPro,
    SalonPdv,
    Premium,
}

/// A tenant's subscription record.
///
/// Immutable per billing cycle: plan changes (webhook-driven upgrades)
/// replace the whole record, they never patch individual fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantPlan {
    pub tenant_id: Uuid,
    pub tier: PlanTier,
    pub has_salon_module: bool,
    pub has_delivery_module: bool,
    pub is_legacy_free: bool,
    pub is_beta_tester: bool,
    pub table_limit: u32,
    pub user_limit: u32,
    pub monthly_order_limit: u32,
}

impl TenantPlan {
    /// Entry-level plan: both modules visible in limited capacity,
    /// metered at `monthly_order_limit` delivery orders per month.
    pub fn free(tenant_id: Uuid, monthly_order_limit: u32) -> Self {
        Self {
            tenant_id,
            tier: PlanTier::Free,
            has_salon_module: false,
            has_delivery_module: false,
            is_legacy_free: false,
            is_beta_tester: false,
            table_limit: 5,
            user_limit: 1,
            monthly_order_limit,
        }
    }

    pub fn delivery_pro(tenant_id: Uuid) -> Self {
        Self {
            tenant_id,
            tier: PlanTier::DeliveryPro,
            has_salon_module: false,
            has_delivery_module: true,
            is_legacy_free: false,
            is_beta_tester: false,
            table_limit: 5,
            user_limit: 3,
            monthly_order_limit: 0,
        }
    }

    pub fn salon_pdv(tenant_id: Uuid) -> Self {
        Self {
            tenant_id,
            tier: PlanTier::SalonPdv,
            has_salon_module: true,
            has_delivery_module: false,
            is_legacy_free: false,
            is_beta_tester: false,
            table_limit: 30,
            user_limit: 5,
            monthly_order_limit: 0,
        }
    }

    pub fn premium(tenant_id: Uuid) -> Self {
        Self {
            tenant_id,
            tier: PlanTier::Premium,
            has_salon_module: true,
            has_delivery_module: true,
            is_legacy_free: false,
            is_beta_tester: false,
            table_limit: 50,
            user_limit: 10,
            monthly_order_limit: 0,
        }
    }
}
