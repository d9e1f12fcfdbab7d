use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use comanda_order::{Table, TableStatus};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTableRequest {
    pub number: u32,
}

#[derive(Debug, Deserialize)]
pub struct TransitionTableRequest {
    pub requested_status: TableStatus,
    pub customer_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TransitionTableResponse {
    pub status: TableStatus,
}

/// POST /v1/tenants/{id}/tables
pub async fn create_table(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Json(req): Json<CreateTableRequest>,
) -> Result<(StatusCode, Json<Table>), ApiError> {
    let table = state.gateway.register_table(tenant_id, req.number).await?;
    Ok((StatusCode::CREATED, Json(table)))
}

/// GET /v1/tenants/{id}/tables
pub async fn list_tables(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
) -> Json<Vec<Table>> {
    Json(state.gateway.tables(tenant_id).await)
}

/// POST /v1/tables/{id}/transition
/// Walk the table cycle: LIVRE → OCUPADA → PAGA → LIVRE
pub async fn transition_table(
    State(state): State<AppState>,
    Path(table_id): Path<Uuid>,
    Json(req): Json<TransitionTableRequest>,
) -> Result<Json<TransitionTableResponse>, ApiError> {
    let status = state
        .gateway
        .transition_table(table_id, req.requested_status, req.customer_name)
        .await?;
    Ok(Json(TransitionTableResponse { status }))
}
