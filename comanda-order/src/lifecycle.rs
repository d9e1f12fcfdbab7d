use std::collections::HashMap;
use uuid::Uuid;

use crate::models::{Channel, ItemDraft, Order, OrderStatus, Table, TableStatus};

/// Owns order and table records and governs every status transition.
///
/// Transitions are one-directional except the table cycle. The retention
/// branch (AGUARDANDO_PGTO_LIMITE) is reachable only at creation and left
/// only via `release_retained`; `transition_order` refuses it in both
/// directions.
pub struct OrderLifecycle {
    orders: HashMap<Uuid, Order>,
    tables: HashMap<Uuid, Table>,
}

impl OrderLifecycle {
    pub fn new() -> Self {
        Self {
            orders: HashMap::new(),
            tables: HashMap::new(),
        }
    }

    // ------------------------------------------------------------------
    // Orders
    // ------------------------------------------------------------------

    /// Insert a freshly admitted order. Table orders must point at an
    /// occupied table; the order is linked into the table's session.
    pub fn create_order(&mut self, order: Order) -> Result<(), LifecycleError> {
        if order.channel == Channel::Table {
            let table_id = order
                .table_id
                .ok_or_else(|| LifecycleError::ModificationFailed("table order without table id".to_string()))?;

            let table = self
                .tables
                .get_mut(&table_id)
                .filter(|t| t.tenant_id == order.tenant_id)
                .ok_or_else(|| LifecycleError::TableNotFound(table_id.to_string()))?;

            if table.status != TableStatus::Ocupada {
                return Err(LifecycleError::InvalidTransition {
                    from: format!("{:?}", table.status),
                    to: "order attachment".to_string(),
                });
            }

            table.open_orders.push(order.id);
        }

        self.orders.insert(order.id, order);
        Ok(())
    }

    /// Undo an insert whose quota commit failed. Detaches the order from
    /// its table as well, so no dangling link survives the rollback.
    pub fn remove_order(&mut self, order_id: &Uuid) -> Option<Order> {
        let order = self.orders.remove(order_id)?;

        if let Some(table_id) = order.table_id {
            if let Some(table) = self.tables.get_mut(&table_id) {
                table.open_orders.retain(|id| id != order_id);
            }
        }

        Some(order)
    }

    pub fn order(&self, order_id: &Uuid) -> Option<&Order> {
        self.orders.get(order_id)
    }

    pub fn orders_for_tenant(&self, tenant_id: Uuid) -> Vec<Order> {
        let mut orders: Vec<Order> = self
            .orders
            .values()
            .filter(|o| o.tenant_id == tenant_id)
            .cloned()
            .collect();
        orders.sort_by_key(|o| o.created_at);
        orders
    }

    pub fn retained_for_tenant(&self, tenant_id: Uuid) -> Vec<Uuid> {
        self.orders
            .values()
            .filter(|o| o.tenant_id == tenant_id && o.status == OrderStatus::AguardandoPgtoLimite)
            .map(|o| o.id)
            .collect()
    }

    /// Apply a client-requested status change to a delivery order.
    pub fn transition_order(
        &mut self,
        order_id: &Uuid,
        requested: OrderStatus,
    ) -> Result<OrderStatus, LifecycleError> {
        let order = self
            .orders
            .get_mut(order_id)
            .ok_or_else(|| LifecycleError::OrderNotFound(order_id.to_string()))?;

        let allowed = order.channel == Channel::Delivery
            && matches!(
                (order.status, requested),
                (OrderStatus::Pendente, OrderStatus::EmPreparo)
                    | (OrderStatus::EmPreparo, OrderStatus::ProntoParaEntrega)
                    | (OrderStatus::ProntoParaEntrega, OrderStatus::Finalizado)
            );

        if !allowed {
            return Err(LifecycleError::InvalidTransition {
                from: format!("{:?}", order.status),
                to: format!("{:?}", requested),
            });
        }

        order.update_status(requested);
        Ok(requested)
    }

    /// Unlock a retained order after a confirmed pay-per-use top-up.
    /// Internal operation; client status-change calls cannot reach it.
    pub fn release_retained(&mut self, order_id: &Uuid) -> Result<(), LifecycleError> {
        let order = self
            .orders
            .get_mut(order_id)
            .ok_or_else(|| LifecycleError::OrderNotFound(order_id.to_string()))?;

        if order.status != OrderStatus::AguardandoPgtoLimite {
            return Err(LifecycleError::InvalidTransition {
                from: format!("{:?}", order.status),
                to: format!("{:?}", OrderStatus::Pendente),
            });
        }

        order.update_status(OrderStatus::Pendente);
        Ok(())
    }

    /// Append lines to an existing order, recomputing its total.
    pub fn append_items(
        &mut self,
        order_id: &Uuid,
        items: Vec<ItemDraft>,
    ) -> Result<i32, LifecycleError> {
        let order = self
            .orders
            .get_mut(order_id)
            .ok_or_else(|| LifecycleError::OrderNotFound(order_id.to_string()))?;

        if order.status == OrderStatus::Finalizado {
            return Err(LifecycleError::ModificationFailed(
                "cannot append items to a finalized order".to_string(),
            ));
        }

        for draft in items {
            let item = draft.into_item(order.id);
            order.add_item(item);
        }

        Ok(order.total_cents)
    }

    // ------------------------------------------------------------------
    // Tables
    // ------------------------------------------------------------------

    pub fn register_table(&mut self, tenant_id: Uuid, number: u32) -> Table {
        let table = Table::new(tenant_id, number);
        self.tables.insert(table.id, table.clone());
        table
    }

    pub fn table(&self, table_id: &Uuid) -> Option<&Table> {
        self.tables.get(table_id)
    }

    pub fn tables_for_tenant(&self, tenant_id: Uuid) -> Vec<Table> {
        let mut tables: Vec<Table> = self
            .tables
            .values()
            .filter(|t| t.tenant_id == tenant_id)
            .cloned()
            .collect();
        tables.sort_by_key(|t| t.number);
        tables
    }

    pub fn table_count(&self, tenant_id: Uuid) -> usize {
        self.tables
            .values()
            .filter(|t| t.tenant_id == tenant_id)
            .count()
    }

    /// Walk the table cycle: LIVRE → OCUPADA → PAGA → LIVRE.
    ///
    /// Paying marks the session's accumulated orders finalized; releasing
    /// back to LIVRE discards the session (customer name, order links).
    pub fn transition_table(
        &mut self,
        table_id: &Uuid,
        requested: TableStatus,
        customer_name: Option<String>,
    ) -> Result<TableStatus, LifecycleError> {
        // Take the table out so session orders can be finalized without
        // holding two mutable borrows into the same map set.
        let mut table = self
            .tables
            .remove(table_id)
            .ok_or_else(|| LifecycleError::TableNotFound(table_id.to_string()))?;

        let result = match (table.status, requested) {
            (TableStatus::Livre, TableStatus::Ocupada) => {
                table.status = TableStatus::Ocupada;
                table.customer_name = customer_name;
                Ok(requested)
            }
            (TableStatus::Ocupada, TableStatus::Paga) => {
                table.status = TableStatus::Paga;
                for order_id in &table.open_orders {
                    if let Some(order) = self.orders.get_mut(order_id) {
                        order.update_status(OrderStatus::Finalizado);
                    }
                }
                Ok(requested)
            }
            (TableStatus::Paga, TableStatus::Livre) => {
                table.status = TableStatus::Livre;
                table.customer_name = None;
                table.open_orders.clear();
                Ok(requested)
            }
            (from, to) => Err(LifecycleError::InvalidTransition {
                from: format!("{:?}", from),
                to: format!("{:?}", to),
            }),
        };

        self.tables.insert(*table_id, table);
        result
    }

    // ------------------------------------------------------------------
    // Cycle close
    // ------------------------------------------------------------------

    /// Destructive end-of-cycle wipe: drops the tenant's open orders and
    /// releases every table. Finalized orders stay as history.
    pub fn close_cycle_wipe(&mut self, tenant_id: Uuid) -> (usize, usize) {
        let before = self.orders.len();
        self.orders
            .retain(|_, o| o.tenant_id != tenant_id || o.status == OrderStatus::Finalizado);
        let orders_cleared = before - self.orders.len();

        let mut tables_released = 0;
        for table in self
            .tables
            .values_mut()
            .filter(|t| t.tenant_id == tenant_id)
        {
            if table.status != TableStatus::Livre {
                tables_released += 1;
            }
            table.status = TableStatus::Livre;
            table.customer_name = None;
            table.open_orders.clear();
        }

        (orders_cleared, tables_released)
    }
}

impl Default for OrderLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Order modification failed: {0}")]
    ModificationFailed(String),
}
