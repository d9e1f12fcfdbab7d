use serde::{Deserialize, Serialize};

use crate::models::{PlanTier, TenantPlan};

/// Effective capability set derived from a tenant's plan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entitlements {
    pub salon_visible: bool,
    pub delivery_visible: bool,
    pub quota_applies: bool,
}

/// Derive the capability set for a plan.
///
/// Free tenants always see both modules in a limited capacity (the
/// acquisition funnel), and only free tenants without a legacy, beta or
/// paid-delivery exemption are metered. Pure function of the plan record;
/// callers must re-resolve on every admission because plans change under
/// webhook-driven upgrades.
pub fn resolve(plan: &TenantPlan) -> Entitlements {
    let is_free = plan.tier == PlanTier::Free;

    Entitlements {
        salon_visible: plan.has_salon_module || is_free,
        delivery_visible: plan.has_delivery_module || is_free,
        quota_applies: is_free
            && !plan.is_legacy_free
            && !plan.is_beta_tester
            && !plan.has_delivery_module,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn free_tenant_sees_both_modules_and_is_metered() {
        let plan = TenantPlan::free(Uuid::new_v4(), 5);
        let ents = resolve(&plan);

        assert!(ents.salon_visible);
        assert!(ents.delivery_visible);
        assert!(ents.quota_applies);
    }

    #[test]
    fn legacy_free_tenant_is_not_metered() {
        let mut plan = TenantPlan::free(Uuid::new_v4(), 5);
        plan.is_legacy_free = true;

        assert!(!resolve(&plan).quota_applies);
    }

    #[test]
    fn beta_tester_is_not_metered() {
        let mut plan = TenantPlan::free(Uuid::new_v4(), 5);
        plan.is_beta_tester = true;

        assert!(!resolve(&plan).quota_applies);
    }

    #[test]
    fn delivery_module_exempts_from_quota_even_on_free_tier() {
        let mut plan = TenantPlan::free(Uuid::new_v4(), 5);
        plan.has_delivery_module = true;

        let ents = resolve(&plan);
        assert!(ents.delivery_visible);
        assert!(!ents.quota_applies);
    }

    #[test]
    fn salon_pdv_plan_hides_delivery() {
        let plan = TenantPlan::salon_pdv(Uuid::new_v4());
        let ents = resolve(&plan);

        assert!(ents.salon_visible);
        assert!(!ents.delivery_visible);
        assert!(!ents.quota_applies);
    }

    #[test]
    fn delivery_pro_plan_hides_salon() {
        let plan = TenantPlan::delivery_pro(Uuid::new_v4());
        let ents = resolve(&plan);

        assert!(!ents.salon_visible);
        assert!(ents.delivery_visible);
        assert!(!ents.quota_applies);
    }

    #[test]
    fn premium_plan_sees_everything_unmetered() {
        let plan = TenantPlan::premium(Uuid::new_v4());
        let ents = resolve(&plan);

        assert!(ents.salon_visible);
        assert!(ents.delivery_visible);
        assert!(!ents.quota_applies);
    }
}
