use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use comanda_shared::pii::Masked;

/// Sales channel an order came through
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    Table,
    Delivery,
}

/// Delivery order status in the lifecycle.
///
/// AguardandoPgtoLimite is the retention branch for over-quota admissions;
/// it is entered only at creation time and left only through the internal
/// top-up unlock, never through a client transition call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pendente,
    EmPreparo,
    ProntoParaEntrega,
    Finalizado,
    AguardandoPgtoLimite,
}

/// Dine-in table status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    Livre,
    Ocupada,
    Paga,
}

/// An individual line within an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub name: String,
    pub unit_price_cents: i32,
    pub quantity: u32,
    pub notes: Option<String>,
}

impl OrderItem {
    pub fn new(
        order_id: Uuid,
        name: String,
        unit_price_cents: i32,
        quantity: u32,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            name,
            unit_price_cents,
            quantity,
            notes,
        }
    }

    pub fn line_total_cents(&self) -> i32 {
        self.unit_price_cents * self.quantity as i32
    }
}

/// A customer order, table or delivery.
///
/// Status is mutated only by the lifecycle; items are immutable after
/// creation except through `append_items`, which recomputes the total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub channel: Channel,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub total_cents: i32,
    pub delivery_fee_cents: Option<i32>,
    pub minimum_order_cents: Option<i32>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<Masked<String>>,
    pub delivery_address: Option<String>,
    pub table_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new(tenant_id: Uuid, channel: Channel, status: OrderStatus) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            channel,
            status,
            items: Vec::new(),
            total_cents: 0,
            delivery_fee_cents: None,
            minimum_order_cents: None,
            customer_name: None,
            customer_phone: None,
            delivery_address: None,
            table_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn add_item(&mut self, item: OrderItem) {
        self.total_cents += item.line_total_cents();
        self.items.push(item);
        self.updated_at = Utc::now();
    }

    pub fn update_status(&mut self, new_status: OrderStatus) {
        self.status = new_status;
        self.updated_at = Utc::now();
    }

    /// Items total plus the delivery fee, when one applies.
    pub fn grand_total_cents(&self) -> i32 {
        self.total_cents + self.delivery_fee_cents.unwrap_or(0)
    }
}

/// Incoming line item, before it is bound to an order id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    pub unit_price_cents: i32,
    pub quantity: u32,
    pub notes: Option<String>,
}

impl ItemDraft {
    pub fn into_item(self, order_id: Uuid) -> OrderItem {
        OrderItem::new(
            order_id,
            self.name,
            self.unit_price_cents,
            self.quantity,
            self.notes,
        )
    }
}

/// A dine-in table. Occupancy session data (customer name, accumulated
/// order links) lives here and is discarded when the table goes back to
/// LIVRE.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub number: u32,
    pub status: TableStatus,
    pub customer_name: Option<String>,
    pub open_orders: Vec<Uuid>,
}

impl Table {
    pub fn new(tenant_id: Uuid, number: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            number,
            status: TableStatus::Livre,
            customer_name: None,
            open_orders: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_item_accumulates_total() {
        let mut order = Order::new(Uuid::new_v4(), Channel::Table, OrderStatus::Pendente);

        let item = OrderItem::new(order.id, "Feijoada".to_string(), 4500, 2, None);
        order.add_item(item);
        let item = OrderItem::new(order.id, "Caipirinha".to_string(), 1800, 1, None);
        order.add_item(item);

        assert_eq!(order.total_cents, 10800);
    }

    #[test]
    fn grand_total_includes_delivery_fee() {
        let mut order = Order::new(Uuid::new_v4(), Channel::Delivery, OrderStatus::Pendente);
        order.add_item(OrderItem::new(order.id, "Pizza".to_string(), 5200, 1, None));
        order.delivery_fee_cents = Some(800);

        assert_eq!(order.grand_total_cents(), 6000);
    }
}
