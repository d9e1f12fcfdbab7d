use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use comanda_delivery::DeliveryTier;
use comanda_order::CycleCloseReport;
use comanda_plan::{Entitlements, UsageSnapshot};
use comanda_shared::models::events::CycleClosedEvent;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TierRequest {
    pub max_distance_km: f64,
    pub fee_cents: i32,
    pub minimum_order_cents: Option<i32>,
}

/// GET /v1/tenants/{id}/usage
pub async fn get_usage(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
) -> Result<Json<UsageSnapshot>, ApiError> {
    Ok(Json(state.gateway.usage(tenant_id).await?))
}

/// GET /v1/tenants/{id}/entitlements
/// Module visibility for the calling tenant's current plan
pub async fn get_entitlements(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
) -> Result<Json<Entitlements>, ApiError> {
    Ok(Json(state.gateway.entitlements(tenant_id).await?))
}

/// PUT /v1/tenants/{id}/delivery-tiers
/// Validated full replacement of the tenant's tier set
pub async fn replace_delivery_tiers(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Json(req): Json<Vec<TierRequest>>,
) -> Result<StatusCode, ApiError> {
    let tiers: Vec<DeliveryTier> = req
        .into_iter()
        .map(|t| DeliveryTier::new(t.max_distance_km, t.fee_cents, t.minimum_order_cents.unwrap_or(0)))
        .collect();

    state.gateway.replace_delivery_tiers(tenant_id, tiers).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/tenants/{id}/close-cycle
/// Irreversible: wipes open orders, releases tables, resets usage
pub async fn close_cycle(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
) -> Result<Json<CycleCloseReport>, ApiError> {
    let report = state.gateway.close_cycle(tenant_id).await?;

    state
        .telemetry
        .log_cycle_closed(CycleClosedEvent {
            tenant_id,
            orders_cleared: report.orders_cleared,
            tables_released: report.tables_released,
            timestamp: chrono::Utc::now().timestamp(),
        })
        .await;

    Ok(Json(report))
}
