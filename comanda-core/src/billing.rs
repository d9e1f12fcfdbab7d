use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::BoxError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckoutKind {
    PlanUpgrade,
    PayPerUseTopUp,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckoutStatus {
    Pending,
    Succeeded,
    Canceled,
}

/// A checkout hosted by the payment provider. The core only ever sees the
/// opaque URL and the provider's session id; card handling stays outside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String, // Provider's ID (e.g., cs_123)
    pub tenant_id: Uuid,
    pub kind: CheckoutKind,
    pub url: String,
    pub amount_cents: i32,
    pub status: CheckoutStatus,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait CheckoutAdapter: Send + Sync {
    /// Create a hosted checkout session with the provider
    async fn create_session(
        &self,
        tenant_id: Uuid,
        kind: CheckoutKind,
        amount_cents: i32,
    ) -> Result<CheckoutSession, BoxError>;

    /// Retrieve session status
    async fn get_session(&self, session_id: &str) -> Result<CheckoutSession, BoxError>;
}
