use uuid::Uuid;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct OrderAdmittedEvent {
    pub order_id: Uuid,
    pub tenant_id: Uuid,
    pub channel: String,
    pub total_cents: i32,
    pub delivery_fee_cents: Option<i32>,
    pub timestamp: i64,
}

/// Emitted when an over-quota order is parked instead of dropped.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct OrderRetainedEvent {
    pub order_id: Uuid,
    pub tenant_id: Uuid,
    pub used: u32,
    pub limit: u32,
    pub checkout_url: Option<String>,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct OrderStatusChangedEvent {
    pub order_id: Uuid,
    pub tenant_id: Uuid,
    pub from: String,
    pub to: String,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct TopUpConfirmedEvent {
    pub tenant_id: Uuid,
    pub released_orders: Vec<Uuid>,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct CycleClosedEvent {
    pub tenant_id: Uuid,
    pub orders_cleared: usize,
    pub tables_released: usize,
    pub timestamp: i64,
}
