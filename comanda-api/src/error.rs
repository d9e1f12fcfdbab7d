use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use comanda_order::{GatewayError, LifecycleError};

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unprocessable(String),
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Internal(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::UnknownTenant(id) => ApiError::NotFound(format!("tenant {}", id)),
            GatewayError::ModuleDisabled(module) => {
                ApiError::Unprocessable(format!("module not enabled for this plan: {}", module))
            }
            GatewayError::InvalidDraft(msg) => ApiError::BadRequest(msg),
            GatewayError::TableLimitReached { limit } => {
                ApiError::Unprocessable(format!("plan allows at most {} tables", limit))
            }
            GatewayError::Lifecycle(inner) => match inner {
                LifecycleError::OrderNotFound(_) | LifecycleError::TableNotFound(_) => {
                    ApiError::NotFound(inner.to_string())
                }
                LifecycleError::InvalidTransition { .. }
                | LifecycleError::ModificationFailed(_) => ApiError::Conflict(inner.to_string()),
            },
            GatewayError::Quota(inner) => ApiError::Conflict(inner.to_string()),
            GatewayError::InvalidTiers(inner) => ApiError::BadRequest(inner.to_string()),
            GatewayError::Storage(msg) => ApiError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}
