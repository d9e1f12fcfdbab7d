use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use comanda_core::billing::CheckoutSession;
use comanda_core::tenant::{GeoPoint, TenantRepository};
use comanda_core::BoxError;
use comanda_delivery::{
    haversine_km, resolver, validate_tiers, DeliveryTier, FeeResolution, TierRepository,
    TierValidationError,
};
use comanda_plan::{
    entitlements, Entitlements, PlanRepository, QuotaDecision, QuotaError, QuotaTracker,
    TenantPlan, UsageSnapshot,
};
use comanda_shared::pii::Masked;

use crate::billing::BillingOrchestrator;
use crate::lifecycle::{LifecycleError, OrderLifecycle};
use crate::models::{Channel, ItemDraft, Order, OrderStatus, Table, TableStatus};

/// Incoming order payload, before admission.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderDraft {
    pub items: Vec<ItemDraft>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub delivery_address: Option<String>,
    pub customer_coordinates: Option<GeoPoint>,
    pub table_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectReason {
    NotCovered,
    LimitReachedHard,
}

/// Admission result. Policy outcomes are values, not errors: callers
/// branch on them explicitly.
#[derive(Debug)]
pub enum AdmissionOutcome {
    Admitted(Order),
    /// Over-quota order parked in AGUARDANDO_PGTO_LIMITE with a checkout
    /// prompt attached; the order is retained, not dropped.
    Retained {
        order: Order,
        checkout: CheckoutSession,
    },
    Rejected(RejectReason),
}

/// Result of an irreversible cycle close.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleCloseReport {
    pub tenant_id: Uuid,
    pub orders_cleared: usize,
    pub tables_released: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Unknown tenant: {0}")]
    UnknownTenant(Uuid),

    #[error("Module not enabled for this plan: {0}")]
    ModuleDisabled(&'static str),

    #[error("Invalid order draft: {0}")]
    InvalidDraft(String),

    #[error("Table limit reached for plan: {limit}")]
    TableLimitReached { limit: u32 },

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Quota(#[from] QuotaError),

    #[error(transparent)]
    InvalidTiers(#[from] TierValidationError),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl GatewayError {
    fn storage(err: BoxError) -> Self {
        GatewayError::Storage(err.to_string())
    }
}

/// Front door for new orders and the operations around them.
///
/// Composes the entitlement resolver, the quota tracker, the fee resolver
/// and the lifecycle. Admissions for the same tenant are serialized by a
/// per-tenant mutex so quota check-then-commit acts as one atomic step;
/// order creation and the usage increment stand or fall together.
pub struct AdmissionGateway {
    plans: Arc<dyn PlanRepository>,
    tenants: Arc<dyn TenantRepository>,
    tiers: Arc<dyn TierRepository>,
    quota: Mutex<QuotaTracker>,
    lifecycle: RwLock<OrderLifecycle>,
    billing: BillingOrchestrator,
    admission_locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
    retain_over_limit: bool,
}

impl AdmissionGateway {
    pub fn new(
        plans: Arc<dyn PlanRepository>,
        tenants: Arc<dyn TenantRepository>,
        tiers: Arc<dyn TierRepository>,
        billing: BillingOrchestrator,
        retain_over_limit: bool,
    ) -> Self {
        Self {
            plans,
            tenants,
            tiers,
            quota: Mutex::new(QuotaTracker::new()),
            lifecycle: RwLock::new(OrderLifecycle::new()),
            billing,
            admission_locks: Mutex::new(HashMap::new()),
            retain_over_limit,
        }
    }

    pub fn billing(&self) -> &BillingOrchestrator {
        &self.billing
    }

    async fn tenant_lock(&self, tenant_id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self.admission_locks.lock().await;
        locks
            .entry(tenant_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn load_plan(&self, tenant_id: Uuid) -> Result<TenantPlan, GatewayError> {
        self.plans
            .get_plan(tenant_id)
            .await
            .map_err(GatewayError::storage)?
            .ok_or(GatewayError::UnknownTenant(tenant_id))
    }

    /// Admit a new order: entitlements, delivery pricing, quota, creation.
    pub async fn admit_order(
        &self,
        tenant_id: Uuid,
        channel: Channel,
        draft: OrderDraft,
    ) -> Result<AdmissionOutcome, GatewayError> {
        // Entitlements are re-resolved on every admission; plans change
        // between requests under webhook-driven upgrades.
        let plan = self.load_plan(tenant_id).await?;
        let ents = entitlements::resolve(&plan);

        match channel {
            Channel::Table if !ents.salon_visible => {
                return Err(GatewayError::ModuleDisabled("salon"));
            }
            Channel::Delivery if !ents.delivery_visible => {
                return Err(GatewayError::ModuleDisabled("delivery"));
            }
            Channel::Table if draft.table_id.is_none() => {
                return Err(GatewayError::InvalidDraft(
                    "table order without table id".to_string(),
                ));
            }
            _ => {}
        }

        // Delivery orders are priced before the quota is consulted, so an
        // uncoverable address never burns a quota check.
        let mut delivery_fee_cents = None;
        let mut minimum_order_cents = None;
        if channel == Channel::Delivery {
            let settings = self
                .tenants
                .get_settings(tenant_id)
                .await
                .map_err(GatewayError::storage)?
                .ok_or(GatewayError::UnknownTenant(tenant_id))?;

            match settings.coordinates {
                Some(origin) => {
                    let destination = match draft.customer_coordinates {
                        Some(point) => point,
                        None => {
                            tracing::info!(%tenant_id, "tier-mode admission without customer coordinates");
                            return Ok(AdmissionOutcome::Rejected(RejectReason::NotCovered));
                        }
                    };

                    let distance_km = haversine_km(origin, destination);
                    let tiers = self
                        .tiers
                        .tiers_for(tenant_id)
                        .await
                        .map_err(GatewayError::storage)?;

                    match resolver::resolve(distance_km, &tiers) {
                        FeeResolution::Covered {
                            fee_cents,
                            minimum_order_cents: minimum,
                        } => {
                            delivery_fee_cents = Some(fee_cents);
                            minimum_order_cents = Some(minimum);
                        }
                        FeeResolution::NotCovered => {
                            tracing::info!(%tenant_id, distance_km, "address outside delivery area");
                            return Ok(AdmissionOutcome::Rejected(RejectReason::NotCovered));
                        }
                    }
                }
                None => {
                    // Flat-fee mode: no coordinates configured, the tier
                    // resolver never runs.
                    delivery_fee_cents = Some(settings.flat_delivery_fee_cents);
                }
            }
        }

        let lock = self.tenant_lock(tenant_id).await;
        let _guard = lock.lock().await;

        // Dine-in is unmetered; only delivery admissions consult the quota.
        let decision = if channel == Channel::Delivery {
            self.quota.lock().await.check_and_reserve(tenant_id, &plan)
        } else {
            QuotaDecision::Allowed
        };

        let status = match decision {
            QuotaDecision::Allowed => OrderStatus::Pendente,
            QuotaDecision::LimitReached if self.retain_over_limit => {
                OrderStatus::AguardandoPgtoLimite
            }
            QuotaDecision::LimitReached => {
                tracing::info!(%tenant_id, "admission rejected at quota limit");
                return Ok(AdmissionOutcome::Rejected(RejectReason::LimitReachedHard));
            }
        };

        let mut order = Order::new(tenant_id, channel, status);
        order.customer_name = draft.customer_name;
        order.customer_phone = draft.customer_phone.map(Masked);
        order.delivery_address = draft.delivery_address;
        order.table_id = draft.table_id;
        order.delivery_fee_cents = delivery_fee_cents;
        order.minimum_order_cents = minimum_order_cents;
        for item in draft.items {
            let item = item.into_item(order.id);
            order.add_item(item);
        }

        if status == OrderStatus::AguardandoPgtoLimite {
            let mut lifecycle = self.lifecycle.write().await;
            lifecycle.create_order(order.clone())?;

            let checkout = match self.billing.initialize_top_up(tenant_id).await {
                Ok(session) => session,
                Err(err) => {
                    lifecycle.remove_order(&order.id);
                    return Err(GatewayError::storage(err));
                }
            };

            tracing::info!(order_id = %order.id, %tenant_id, "order retained at quota limit");
            return Ok(AdmissionOutcome::Retained { order, checkout });
        }

        {
            let mut lifecycle = self.lifecycle.write().await;
            lifecycle.create_order(order.clone())?;

            // Creation and the usage increment stand or fall together; a
            // counter bump without an order is the bug class this rollback
            // exists to prevent.
            if channel == Channel::Delivery {
                let mut quota = self.quota.lock().await;
                if let Err(err) = quota.commit(tenant_id, order.id) {
                    lifecycle.remove_order(&order.id);
                    return Err(err.into());
                }
            }
        }

        tracing::info!(order_id = %order.id, %tenant_id, ?channel, "order admitted");
        Ok(AdmissionOutcome::Admitted(order))
    }

    /// Release every retained order of the tenant after a confirmed
    /// pay-per-use top-up, committing their usage as they enter PENDENTE.
    pub async fn confirm_top_up(&self, tenant_id: Uuid) -> Result<Vec<Uuid>, GatewayError> {
        let lock = self.tenant_lock(tenant_id).await;
        let _guard = lock.lock().await;

        let mut lifecycle = self.lifecycle.write().await;
        let retained = lifecycle.retained_for_tenant(tenant_id);

        let mut quota = self.quota.lock().await;
        for order_id in &retained {
            lifecycle.release_retained(order_id)?;
            quota.commit(tenant_id, *order_id)?;
        }

        tracing::info!(%tenant_id, released = retained.len(), "top-up confirmed, retained orders released");
        Ok(retained)
    }

    pub async fn transition_order(
        &self,
        order_id: Uuid,
        requested: OrderStatus,
    ) -> Result<OrderStatus, GatewayError> {
        let status = self
            .lifecycle
            .write()
            .await
            .transition_order(&order_id, requested)?;
        Ok(status)
    }

    pub async fn transition_table(
        &self,
        table_id: Uuid,
        requested: TableStatus,
        customer_name: Option<String>,
    ) -> Result<TableStatus, GatewayError> {
        let status = self
            .lifecycle
            .write()
            .await
            .transition_table(&table_id, requested, customer_name)?;
        Ok(status)
    }

    pub async fn append_items(
        &self,
        order_id: Uuid,
        items: Vec<ItemDraft>,
    ) -> Result<i32, GatewayError> {
        let total = self.lifecycle.write().await.append_items(&order_id, items)?;
        Ok(total)
    }

    pub async fn order(&self, order_id: Uuid) -> Option<Order> {
        self.lifecycle.read().await.order(&order_id).cloned()
    }

    pub async fn orders(&self, tenant_id: Uuid) -> Vec<Order> {
        self.lifecycle.read().await.orders_for_tenant(tenant_id)
    }

    pub async fn tables(&self, tenant_id: Uuid) -> Vec<Table> {
        self.lifecycle.read().await.tables_for_tenant(tenant_id)
    }

    /// Register a dine-in table, bounded by the plan's table allowance.
    pub async fn register_table(
        &self,
        tenant_id: Uuid,
        number: u32,
    ) -> Result<Table, GatewayError> {
        let plan = self.load_plan(tenant_id).await?;

        let mut lifecycle = self.lifecycle.write().await;
        if lifecycle.table_count(tenant_id) as u32 >= plan.table_limit {
            return Err(GatewayError::TableLimitReached {
                limit: plan.table_limit,
            });
        }

        Ok(lifecycle.register_table(tenant_id, number))
    }

    pub async fn usage(&self, tenant_id: Uuid) -> Result<UsageSnapshot, GatewayError> {
        let plan = self.load_plan(tenant_id).await?;
        Ok(self.quota.lock().await.usage(tenant_id, &plan))
    }

    pub async fn entitlements(&self, tenant_id: Uuid) -> Result<Entitlements, GatewayError> {
        let plan = self.load_plan(tenant_id).await?;
        Ok(entitlements::resolve(&plan))
    }

    /// Validated full replacement of the tenant's delivery tier set.
    pub async fn replace_delivery_tiers(
        &self,
        tenant_id: Uuid,
        tiers: Vec<DeliveryTier>,
    ) -> Result<(), GatewayError> {
        self.load_plan(tenant_id).await?;
        validate_tiers(&tiers)?;
        self.tiers
            .replace_tiers(tenant_id, tiers)
            .await
            .map_err(GatewayError::storage)
    }

    /// Irreversible close of the tenant's cycle: wipes open orders,
    /// releases every table and resets the usage counter, as one step.
    pub async fn close_cycle(&self, tenant_id: Uuid) -> Result<CycleCloseReport, GatewayError> {
        self.load_plan(tenant_id).await?;

        let lock = self.tenant_lock(tenant_id).await;
        let _guard = lock.lock().await;

        let (orders_cleared, tables_released) =
            self.lifecycle.write().await.close_cycle_wipe(tenant_id);
        self.quota.lock().await.reset(tenant_id);

        tracing::warn!(%tenant_id, orders_cleared, tables_released, "cycle closed");
        Ok(CycleCloseReport {
            tenant_id,
            orders_cleared,
            tables_released,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::MockCheckoutAdapter;
    use async_trait::async_trait;
    use comanda_core::tenant::TenantSettings;

    struct MemPlans(std::sync::Mutex<HashMap<Uuid, TenantPlan>>);

    #[async_trait]
    impl PlanRepository for MemPlans {
        async fn get_plan(&self, tenant_id: Uuid) -> Result<Option<TenantPlan>, BoxError> {
            Ok(self.0.lock().unwrap().get(&tenant_id).cloned())
        }

        async fn put_plan(&self, plan: &TenantPlan) -> Result<(), BoxError> {
            self.0.lock().unwrap().insert(plan.tenant_id, plan.clone());
            Ok(())
        }
    }

    struct MemTenants(std::sync::Mutex<HashMap<Uuid, TenantSettings>>);

    #[async_trait]
    impl TenantRepository for MemTenants {
        async fn get_settings(&self, tenant_id: Uuid) -> Result<Option<TenantSettings>, BoxError> {
            Ok(self.0.lock().unwrap().get(&tenant_id).cloned())
        }

        async fn put_settings(&self, settings: &TenantSettings) -> Result<(), BoxError> {
            self.0
                .lock()
                .unwrap()
                .insert(settings.tenant_id, settings.clone());
            Ok(())
        }
    }

    struct MemTiers(std::sync::Mutex<HashMap<Uuid, Vec<DeliveryTier>>>);

    #[async_trait]
    impl TierRepository for MemTiers {
        async fn tiers_for(&self, tenant_id: Uuid) -> Result<Vec<DeliveryTier>, BoxError> {
            Ok(self
                .0
                .lock()
                .unwrap()
                .get(&tenant_id)
                .cloned()
                .unwrap_or_default())
        }

        async fn replace_tiers(
            &self,
            tenant_id: Uuid,
            tiers: Vec<DeliveryTier>,
        ) -> Result<(), BoxError> {
            self.0.lock().unwrap().insert(tenant_id, tiers);
            Ok(())
        }
    }

    fn gateway_for(
        plan: TenantPlan,
        settings: TenantSettings,
        tiers: Vec<DeliveryTier>,
        retain_over_limit: bool,
    ) -> AdmissionGateway {
        let tenant_id = plan.tenant_id;
        let plans = MemPlans(std::sync::Mutex::new(HashMap::from([(tenant_id, plan)])));
        let tenants = MemTenants(std::sync::Mutex::new(HashMap::from([(
            tenant_id, settings,
        )])));
        let tier_repo = MemTiers(std::sync::Mutex::new(HashMap::from([(tenant_id, tiers)])));

        AdmissionGateway::new(
            Arc::new(plans),
            Arc::new(tenants),
            Arc::new(tier_repo),
            BillingOrchestrator::new(Arc::new(MockCheckoutAdapter), 990),
            retain_over_limit,
        )
    }

    fn flat_settings(tenant_id: Uuid, fee: i32) -> TenantSettings {
        TenantSettings {
            tenant_id,
            name: "Cantina da Praça".to_string(),
            coordinates: None,
            flat_delivery_fee_cents: fee,
        }
    }

    fn delivery_draft() -> OrderDraft {
        OrderDraft {
            items: vec![ItemDraft {
                name: "Marmita".to_string(),
                unit_price_cents: 2500,
                quantity: 1,
                notes: None,
            }],
            customer_name: Some("Carla".to_string()),
            customer_phone: Some("11 91234-5678".to_string()),
            delivery_address: Some("Rua das Flores, 100".to_string()),
            customer_coordinates: None,
            table_id: None,
        }
    }

    #[tokio::test]
    async fn sixth_order_is_retained_not_dropped() {
        let tenant_id = Uuid::new_v4();
        let gateway = gateway_for(
            TenantPlan::free(tenant_id, 5),
            flat_settings(tenant_id, 500),
            vec![],
            true,
        );

        for n in 1..=5u32 {
            let outcome = gateway
                .admit_order(tenant_id, Channel::Delivery, delivery_draft())
                .await
                .unwrap();
            assert!(matches!(outcome, AdmissionOutcome::Admitted(_)));
            assert_eq!(gateway.usage(tenant_id).await.unwrap().used, n);
        }

        let outcome = gateway
            .admit_order(tenant_id, Channel::Delivery, delivery_draft())
            .await
            .unwrap();

        match outcome {
            AdmissionOutcome::Retained { order, checkout } => {
                assert_eq!(order.status, OrderStatus::AguardandoPgtoLimite);
                assert!(!checkout.url.is_empty());
            }
            other => panic!("expected retained order, got {:?}", other),
        }

        // Retained order did not inflate the counter
        assert_eq!(gateway.usage(tenant_id).await.unwrap().used, 5);
    }

    #[tokio::test]
    async fn hard_rejection_when_retention_is_disabled() {
        let tenant_id = Uuid::new_v4();
        let gateway = gateway_for(
            TenantPlan::free(tenant_id, 0),
            flat_settings(tenant_id, 500),
            vec![],
            false,
        );

        let outcome = gateway
            .admit_order(tenant_id, Channel::Delivery, delivery_draft())
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            AdmissionOutcome::Rejected(RejectReason::LimitReachedHard)
        ));
    }

    #[tokio::test]
    async fn paid_plans_are_never_metered() {
        let tenant_id = Uuid::new_v4();
        let gateway = gateway_for(
            TenantPlan::delivery_pro(tenant_id),
            flat_settings(tenant_id, 500),
            vec![],
            true,
        );

        for _ in 0..10 {
            let outcome = gateway
                .admit_order(tenant_id, Channel::Delivery, delivery_draft())
                .await
                .unwrap();
            assert!(matches!(outcome, AdmissionOutcome::Admitted(_)));
        }

        let usage = gateway.usage(tenant_id).await.unwrap();
        assert_eq!(usage.limit, None);
    }

    #[tokio::test]
    async fn confirmed_top_up_releases_retained_orders_and_commits_usage() {
        let tenant_id = Uuid::new_v4();
        let gateway = gateway_for(
            TenantPlan::free(tenant_id, 1),
            flat_settings(tenant_id, 500),
            vec![],
            true,
        );

        gateway
            .admit_order(tenant_id, Channel::Delivery, delivery_draft())
            .await
            .unwrap();
        let outcome = gateway
            .admit_order(tenant_id, Channel::Delivery, delivery_draft())
            .await
            .unwrap();
        let retained_id = match outcome {
            AdmissionOutcome::Retained { order, .. } => order.id,
            other => panic!("expected retained order, got {:?}", other),
        };

        let released = gateway.confirm_top_up(tenant_id).await.unwrap();
        assert_eq!(released, vec![retained_id]);
        assert_eq!(
            gateway.order(retained_id).await.unwrap().status,
            OrderStatus::Pendente
        );
        // Released order now counts as usage
        assert_eq!(gateway.usage(tenant_id).await.unwrap().used, 2);
    }

    #[tokio::test]
    async fn tier_mode_prices_by_distance() {
        let tenant_id = Uuid::new_v4();
        let origin = GeoPoint {
            lat: -23.5505,
            lng: -46.6333,
        };
        let mut settings = flat_settings(tenant_id, 0);
        settings.coordinates = Some(origin);

        let tiers = vec![
            DeliveryTier::new(3.0, 500, 0),
            DeliveryTier::new(6.0, 800, 0),
            DeliveryTier::new(10.0, 1200, 0),
        ];
        let gateway = gateway_for(TenantPlan::premium(tenant_id), settings, tiers, true);

        // Roughly 4.5 km north of the restaurant
        let mut draft = delivery_draft();
        draft.customer_coordinates = Some(GeoPoint {
            lat: origin.lat + 0.0405,
            lng: origin.lng,
        });

        let outcome = gateway
            .admit_order(tenant_id, Channel::Delivery, draft)
            .await
            .unwrap();
        match outcome {
            AdmissionOutcome::Admitted(order) => {
                assert_eq!(order.delivery_fee_cents, Some(800));
            }
            other => panic!("expected admitted order, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn out_of_range_address_is_rejected_not_covered() {
        let tenant_id = Uuid::new_v4();
        let origin = GeoPoint {
            lat: -23.5505,
            lng: -46.6333,
        };
        let mut settings = flat_settings(tenant_id, 0);
        settings.coordinates = Some(origin);

        let tiers = vec![DeliveryTier::new(10.0, 1200, 0)];
        let gateway = gateway_for(TenantPlan::premium(tenant_id), settings, tiers, true);

        // Roughly 15 km away
        let mut draft = delivery_draft();
        draft.customer_coordinates = Some(GeoPoint {
            lat: origin.lat + 0.135,
            lng: origin.lng,
        });

        let outcome = gateway
            .admit_order(tenant_id, Channel::Delivery, draft)
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            AdmissionOutcome::Rejected(RejectReason::NotCovered)
        ));
    }

    #[tokio::test]
    async fn tier_mode_without_customer_coordinates_is_not_covered() {
        let tenant_id = Uuid::new_v4();
        let mut settings = flat_settings(tenant_id, 0);
        settings.coordinates = Some(GeoPoint {
            lat: -23.5505,
            lng: -46.6333,
        });

        let gateway = gateway_for(
            TenantPlan::premium(tenant_id),
            settings,
            vec![DeliveryTier::new(10.0, 1200, 0)],
            true,
        );

        let outcome = gateway
            .admit_order(tenant_id, Channel::Delivery, delivery_draft())
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            AdmissionOutcome::Rejected(RejectReason::NotCovered)
        ));
    }

    #[tokio::test]
    async fn flat_mode_uses_the_fixed_fee() {
        let tenant_id = Uuid::new_v4();
        let gateway = gateway_for(
            TenantPlan::premium(tenant_id),
            flat_settings(tenant_id, 700),
            vec![],
            true,
        );

        let outcome = gateway
            .admit_order(tenant_id, Channel::Delivery, delivery_draft())
            .await
            .unwrap();
        match outcome {
            AdmissionOutcome::Admitted(order) => {
                assert_eq!(order.delivery_fee_cents, Some(700));
            }
            other => panic!("expected admitted order, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn table_orders_never_touch_the_quota() {
        let tenant_id = Uuid::new_v4();
        let gateway = gateway_for(
            TenantPlan::free(tenant_id, 5),
            flat_settings(tenant_id, 0),
            vec![],
            true,
        );

        let table = gateway.register_table(tenant_id, 1).await.unwrap();
        gateway
            .transition_table(table.id, TableStatus::Ocupada, Some("Davi".to_string()))
            .await
            .unwrap();

        let mut draft = delivery_draft();
        draft.table_id = Some(table.id);
        let outcome = gateway
            .admit_order(tenant_id, Channel::Table, draft)
            .await
            .unwrap();
        assert!(matches!(outcome, AdmissionOutcome::Admitted(_)));

        assert_eq!(gateway.usage(tenant_id).await.unwrap().used, 0);
    }

    #[tokio::test]
    async fn delivery_channel_requires_the_module() {
        let tenant_id = Uuid::new_v4();
        let gateway = gateway_for(
            TenantPlan::salon_pdv(tenant_id),
            flat_settings(tenant_id, 0),
            vec![],
            true,
        );

        let err = gateway
            .admit_order(tenant_id, Channel::Delivery, delivery_draft())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::ModuleDisabled("delivery")));
    }

    #[tokio::test]
    async fn table_registration_respects_the_plan_limit() {
        let tenant_id = Uuid::new_v4();
        let mut plan = TenantPlan::free(tenant_id, 5);
        plan.table_limit = 1;
        let gateway = gateway_for(plan, flat_settings(tenant_id, 0), vec![], true);

        gateway.register_table(tenant_id, 1).await.unwrap();
        let err = gateway.register_table(tenant_id, 2).await.unwrap_err();
        assert!(matches!(
            err,
            GatewayError::TableLimitReached { limit: 1 }
        ));
    }

    #[tokio::test]
    async fn tier_replacement_validates_input() {
        let tenant_id = Uuid::new_v4();
        let gateway = gateway_for(
            TenantPlan::premium(tenant_id),
            flat_settings(tenant_id, 0),
            vec![],
            true,
        );

        let err = gateway
            .replace_delivery_tiers(tenant_id, vec![DeliveryTier::new(-2.0, 500, 0)])
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidTiers(_)));
    }

    #[tokio::test]
    async fn close_cycle_resets_usage_and_releases_tables() {
        let tenant_id = Uuid::new_v4();
        let gateway = gateway_for(
            TenantPlan::free(tenant_id, 5),
            flat_settings(tenant_id, 500),
            vec![],
            true,
        );

        let table = gateway.register_table(tenant_id, 1).await.unwrap();
        gateway
            .transition_table(table.id, TableStatus::Ocupada, None)
            .await
            .unwrap();
        gateway
            .admit_order(tenant_id, Channel::Delivery, delivery_draft())
            .await
            .unwrap();

        let report = gateway.close_cycle(tenant_id).await.unwrap();
        assert_eq!(report.orders_cleared, 1);
        assert_eq!(report.tables_released, 1);

        let usage = gateway.usage(tenant_id).await.unwrap();
        assert_eq!(usage.used, 0);
        for table in gateway.tables(tenant_id).await {
            assert_eq!(table.status, TableStatus::Livre);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_admissions_never_overshoot_the_limit() {
        let tenant_id = Uuid::new_v4();
        let gateway = Arc::new(gateway_for(
            TenantPlan::free(tenant_id, 1),
            flat_settings(tenant_id, 500),
            vec![],
            true,
        ));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let gateway = gateway.clone();
            handles.push(tokio::spawn(async move {
                gateway
                    .admit_order(tenant_id, Channel::Delivery, delivery_draft())
                    .await
                    .unwrap()
            }));
        }

        let mut admitted = 0;
        let mut retained = 0;
        for handle in handles {
            match handle.await.unwrap() {
                AdmissionOutcome::Admitted(_) => admitted += 1,
                AdmissionOutcome::Retained { .. } => retained += 1,
                AdmissionOutcome::Rejected(reason) => panic!("unexpected rejection: {:?}", reason),
            }
        }

        assert_eq!(admitted, 1);
        assert_eq!(retained, 7);
        assert_eq!(gateway.usage(tenant_id).await.unwrap().used, 1);
    }
}
