use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::info;

use comanda_shared::models::events::{
    CycleClosedEvent, OrderAdmittedEvent, OrderRetainedEvent, OrderStatusChangedEvent,
    TopUpConfirmedEvent,
};

#[derive(Debug, Clone)]
pub struct RecordedEvent {
    pub topic: &'static str,
    pub payload: serde_json::Value,
    pub recorded_at: DateTime<Utc>,
}

/// Append-only audit sink for domain events.
///
/// Events are traced and kept in memory for inspection; a broker-backed
/// producer can replace this behind the same methods.
pub struct EventLog {
    entries: RwLock<Vec<RecordedEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    async fn record(&self, topic: &'static str, payload: serde_json::Value) {
        info!(topic, %payload, "domain event");
        self.entries.write().await.push(RecordedEvent {
            topic,
            payload,
            recorded_at: Utc::now(),
        });
    }

    pub async fn log_order_admitted(&self, event: OrderAdmittedEvent) {
        if let Ok(payload) = serde_json::to_value(&event) {
            self.record("orders.admitted", payload).await;
        }
    }

    pub async fn log_order_retained(&self, event: OrderRetainedEvent) {
        if let Ok(payload) = serde_json::to_value(&event) {
            self.record("orders.retained", payload).await;
        }
    }

    pub async fn log_status_changed(&self, event: OrderStatusChangedEvent) {
        if let Ok(payload) = serde_json::to_value(&event) {
            self.record("orders.status_changed", payload).await;
        }
    }

    pub async fn log_top_up_confirmed(&self, event: TopUpConfirmedEvent) {
        if let Ok(payload) = serde_json::to_value(&event) {
            self.record("billing.top_up_confirmed", payload).await;
        }
    }

    pub async fn log_cycle_closed(&self, event: CycleClosedEvent) {
        if let Ok(payload) = serde_json::to_value(&event) {
            self.record("tenants.cycle_closed", payload).await;
        }
    }

    pub async fn entries(&self) -> Vec<RecordedEvent> {
        self.entries.read().await.clone()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}
