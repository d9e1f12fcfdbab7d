use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use comanda_core::tenant::{GeoPoint, TenantSettings};
use comanda_order::Table;
use comanda_plan::{PlanTier, TenantPlan};

use crate::error::ApiError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateTenantRequest {
    pub name: String,
    pub tier: PlanTier,
    pub table_count: Option<u32>,
    pub coordinates: Option<GeoPoint>,
    pub flat_delivery_fee_cents: Option<i32>,
    pub is_legacy_free: Option<bool>,
    pub is_beta_tester: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct CreateTenantResponse {
    pub tenant_id: Uuid,
    pub plan: TenantPlan,
    pub tables: Vec<Table>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /v1/admin/tenants
/// Provision a tenant: plan record, profile, and its initial tables
pub async fn create_tenant(
    State(state): State<AppState>,
    Json(req): Json<CreateTenantRequest>,
) -> Result<(StatusCode, Json<CreateTenantResponse>), ApiError> {
    let tenant_id = Uuid::new_v4();

    let mut plan = match req.tier {
        PlanTier::Free => TenantPlan::free(
            tenant_id,
            state.business_rules.free_monthly_order_limit,
        ),
        PlanTier::DeliveryPro => TenantPlan::delivery_pro(tenant_id),
        PlanTier::SalonPdv => TenantPlan::salon_pdv(tenant_id),
        PlanTier::Premium => TenantPlan::premium(tenant_id),
    };
    plan.is_legacy_free = req.is_legacy_free.unwrap_or(false);
    plan.is_beta_tester = req.is_beta_tester.unwrap_or(false);

    state
        .plans
        .put_plan(&plan)
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!(e.to_string())))?;

    let mut settings = TenantSettings::new(tenant_id, req.name);
    settings.coordinates = req.coordinates;
    settings.flat_delivery_fee_cents = req.flat_delivery_fee_cents.unwrap_or(0);
    state
        .tenants
        .put_settings(&settings)
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!(e.to_string())))?;

    let mut tables = Vec::new();
    for number in 1..=req.table_count.unwrap_or(0) {
        tables.push(state.gateway.register_table(tenant_id, number).await?);
    }

    Ok((
        StatusCode::CREATED,
        Json(CreateTenantResponse {
            tenant_id,
            plan,
            tables,
        }),
    ))
}
