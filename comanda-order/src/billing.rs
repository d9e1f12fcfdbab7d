use comanda_core::billing::{CheckoutAdapter, CheckoutKind, CheckoutSession, CheckoutStatus};
use comanda_core::BoxError;
use std::sync::Arc;
use uuid::Uuid;

/// Mints checkout sessions for plan upgrades and pay-per-use top-ups and
/// interprets provider confirmations. The provider interaction itself
/// stays behind the adapter; the core only handles the opaque URL.
pub struct BillingOrchestrator {
    adapter: Arc<dyn CheckoutAdapter>,
    top_up_price_cents: i32,
}

impl BillingOrchestrator {
    pub fn new(adapter: Arc<dyn CheckoutAdapter>, top_up_price_cents: i32) -> Self {
        Self {
            adapter,
            top_up_price_cents,
        }
    }

    /// Start a pay-per-use checkout for a tenant whose quota is exhausted.
    pub async fn initialize_top_up(&self, tenant_id: Uuid) -> Result<CheckoutSession, BoxError> {
        self.adapter
            .create_session(tenant_id, CheckoutKind::PayPerUseTopUp, self.top_up_price_cents)
            .await
    }

    /// Start an upgrade checkout (amount decided by the provider's plan page).
    pub async fn initialize_upgrade(&self, tenant_id: Uuid) -> Result<CheckoutSession, BoxError> {
        self.adapter
            .create_session(tenant_id, CheckoutKind::PlanUpgrade, 0)
            .await
    }

    /// Re-read a session after a provider webhook lands.
    pub async fn process_confirmation(
        &self,
        session_id: &str,
    ) -> Result<CheckoutSession, BoxError> {
        let session = self.adapter.get_session(session_id).await?;

        if session.status == CheckoutStatus::Succeeded {
            tracing::info!(
                session_id = %session.id,
                tenant_id = %session.tenant_id,
                "checkout confirmed"
            );
        }

        Ok(session)
    }
}

pub struct MockCheckoutAdapter;

#[async_trait::async_trait]
impl CheckoutAdapter for MockCheckoutAdapter {
    async fn create_session(
        &self,
        tenant_id: Uuid,
        kind: CheckoutKind,
        amount_cents: i32,
    ) -> Result<CheckoutSession, BoxError> {
        // Encode tenant_id in the session id so the mock can "remember" it
        Ok(CheckoutSession {
            id: format!("mock_cs_{}", tenant_id.simple()),
            tenant_id,
            kind,
            url: format!("https://checkout.example/session/{}", tenant_id.simple()),
            amount_cents,
            status: CheckoutStatus::Pending,
            created_at: chrono::Utc::now(),
        })
    }

    async fn get_session(&self, session_id: &str) -> Result<CheckoutSession, BoxError> {
        // Decode tenant_id from the mock session id
        let tenant_str = session_id.strip_prefix("mock_cs_").unwrap_or_default();
        let tenant_id = Uuid::parse_str(tenant_str).unwrap_or_else(|_| Uuid::new_v4());

        // Mock sessions always come back paid
        Ok(CheckoutSession {
            id: session_id.to_string(),
            tenant_id,
            kind: CheckoutKind::PayPerUseTopUp,
            url: format!("https://checkout.example/session/{}", tenant_str),
            amount_cents: 0,
            status: CheckoutStatus::Succeeded,
            created_at: chrono::Utc::now(),
        })
    }
}
