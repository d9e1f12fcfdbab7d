use std::sync::Arc;

use comanda_core::tenant::TenantRepository;
use comanda_order::AdmissionGateway;
use comanda_plan::PlanRepository;
use comanda_store::app_config::BusinessRules;
use comanda_store::EventLog;

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<AdmissionGateway>,
    pub plans: Arc<dyn PlanRepository>,
    pub tenants: Arc<dyn TenantRepository>,
    pub telemetry: Arc<EventLog>,
    pub business_rules: BusinessRules,
}
