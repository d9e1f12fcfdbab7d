use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use comanda_order::{AdmissionOutcome, Channel, ItemDraft, Order, OrderDraft, OrderStatus, RejectReason};
use comanda_shared::models::events::{OrderAdmittedEvent, OrderRetainedEvent, OrderStatusChangedEvent};

use crate::error::ApiError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AdmitOrderRequest {
    pub tenant_id: Uuid,
    pub channel: Channel,
    #[serde(flatten)]
    pub draft: OrderDraft,
}

#[derive(Debug, Serialize)]
pub struct AdmitOrderResponse {
    pub order_id: Option<Uuid>,
    pub status: Option<OrderStatus>,
    pub delivery_fee_cents: Option<i32>,
    pub total_cents: Option<i32>,
    pub reason: Option<&'static str>,
    pub checkout_url: Option<String>,
    pub checkout_session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TransitionOrderRequest {
    pub requested_status: OrderStatus,
}

#[derive(Debug, Serialize)]
pub struct TransitionOrderResponse {
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize)]
pub struct AppendItemsRequest {
    pub items: Vec<ItemDraft>,
}

#[derive(Debug, Serialize)]
pub struct AppendItemsResponse {
    pub total_cents: i32,
}

#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    pub tenant_id: Uuid,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /v1/orders
/// Admit a new order through the gateway
pub async fn admit_order(
    State(state): State<AppState>,
    Json(req): Json<AdmitOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .gateway
        .admit_order(req.tenant_id, req.channel, req.draft)
        .await?;

    match outcome {
        AdmissionOutcome::Admitted(order) => {
            state
                .telemetry
                .log_order_admitted(OrderAdmittedEvent {
                    order_id: order.id,
                    tenant_id: order.tenant_id,
                    channel: format!("{:?}", order.channel).to_uppercase(),
                    total_cents: order.total_cents,
                    delivery_fee_cents: order.delivery_fee_cents,
                    timestamp: chrono::Utc::now().timestamp(),
                })
                .await;

            Ok((
                StatusCode::CREATED,
                Json(AdmitOrderResponse {
                    order_id: Some(order.id),
                    status: Some(order.status),
                    delivery_fee_cents: order.delivery_fee_cents,
                    total_cents: Some(order.total_cents),
                    reason: None,
                    checkout_url: None,
                    checkout_session_id: None,
                }),
            ))
        }
        AdmissionOutcome::Retained { order, checkout } => {
            let usage = state.gateway.usage(req.tenant_id).await?;
            state
                .telemetry
                .log_order_retained(OrderRetainedEvent {
                    order_id: order.id,
                    tenant_id: order.tenant_id,
                    used: usage.used,
                    limit: usage.limit.unwrap_or(0),
                    checkout_url: Some(checkout.url.clone()),
                    timestamp: chrono::Utc::now().timestamp(),
                })
                .await;

            Ok((
                StatusCode::ACCEPTED,
                Json(AdmitOrderResponse {
                    order_id: Some(order.id),
                    status: Some(order.status),
                    delivery_fee_cents: order.delivery_fee_cents,
                    total_cents: Some(order.total_cents),
                    reason: Some("LIMIT_REACHED"),
                    checkout_url: Some(checkout.url),
                    checkout_session_id: Some(checkout.id),
                }),
            ))
        }
        AdmissionOutcome::Rejected(reason) => {
            let reason = match reason {
                RejectReason::NotCovered => "NOT_COVERED",
                RejectReason::LimitReachedHard => "LIMIT_REACHED_HARD",
            };

            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(AdmitOrderResponse {
                    order_id: None,
                    status: None,
                    delivery_fee_cents: None,
                    total_cents: None,
                    reason: Some(reason),
                    checkout_url: None,
                    checkout_session_id: None,
                }),
            ))
        }
    }
}

/// POST /v1/orders/{id}/transition
/// Apply a client-requested status change
pub async fn transition_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(req): Json<TransitionOrderRequest>,
) -> Result<Json<TransitionOrderResponse>, ApiError> {
    let previous = state
        .gateway
        .order(order_id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("order {}", order_id)))?;

    let status = state
        .gateway
        .transition_order(order_id, req.requested_status)
        .await?;

    state
        .telemetry
        .log_status_changed(OrderStatusChangedEvent {
            order_id,
            tenant_id: previous.tenant_id,
            from: format!("{:?}", previous.status),
            to: format!("{:?}", status),
            timestamp: chrono::Utc::now().timestamp(),
        })
        .await;

    Ok(Json(TransitionOrderResponse { status }))
}

/// POST /v1/orders/{id}/items
/// Append lines to an order, recomputing its total
pub async fn append_items(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(req): Json<AppendItemsRequest>,
) -> Result<Json<AppendItemsResponse>, ApiError> {
    let total_cents = state.gateway.append_items(order_id, req.items).await?;
    Ok(Json(AppendItemsResponse { total_cents }))
}

/// GET /v1/orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<Order>, ApiError> {
    let order = state
        .gateway
        .order(order_id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("order {}", order_id)))?;
    Ok(Json(order))
}

/// GET /v1/orders?tenant_id=
/// Pull-based order list for polling clients
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> Json<Vec<Order>> {
    Json(state.gateway.orders(query.tenant_id).await)
}
