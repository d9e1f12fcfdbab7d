use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use comanda_core::billing::{CheckoutKind, CheckoutStatus};
use comanda_shared::models::events::TopUpConfirmedEvent;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BillingWebhook {
    pub session_id: String,
    #[serde(rename = "type")]
    pub type_: String,
}

/// POST /v1/webhooks/billing
/// Receive checkout confirmations from the payment provider.
///
/// A confirmed pay-per-use top-up is the only thing that unlocks retained
/// orders; client status-change calls can never reach that transition.
pub async fn handle_billing_webhook(
    State(state): State<AppState>,
    Json(payload): Json<BillingWebhook>,
) -> Result<StatusCode, StatusCode> {
    tracing::info!(
        "Received billing webhook: {} for session {}",
        payload.type_,
        payload.session_id
    );

    if payload.type_ != "checkout.session.completed" {
        return Ok(StatusCode::OK);
    }

    let session = state
        .gateway
        .billing()
        .process_confirmation(&payload.session_id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if session.status != CheckoutStatus::Succeeded {
        return Ok(StatusCode::OK);
    }

    match session.kind {
        CheckoutKind::PayPerUseTopUp => {
            let released = state
                .gateway
                .confirm_top_up(session.tenant_id)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to release retained orders: {}", e);
                    StatusCode::INTERNAL_SERVER_ERROR
                })?;

            state
                .telemetry
                .log_top_up_confirmed(TopUpConfirmedEvent {
                    tenant_id: session.tenant_id,
                    released_orders: released,
                    timestamp: chrono::Utc::now().timestamp(),
                })
                .await;
        }
        CheckoutKind::PlanUpgrade => {
            // Plan swaps arrive through the provider's subscription webhook,
            // which replaces the plan record wholesale; nothing to do here.
            tracing::info!(tenant_id = %session.tenant_id, "upgrade checkout completed");
        }
    }

    Ok(StatusCode::OK)
}
