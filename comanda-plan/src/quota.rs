use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::entitlements;
use crate::models::TenantPlan;

/// Outcome of a quota check. LimitReached is a decision, not an error:
/// the caller chooses between a hard rejection and a retained order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDecision {
    Allowed,
    LimitReached,
}

/// Point-in-time view of a tenant's monthly usage. `limit`/`remaining`
/// are absent for unmetered tenants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageSnapshot {
    pub used: u32,
    pub limit: Option<u32>,
    pub remaining: Option<u32>,
}

#[derive(Debug, thiserror::Error)]
pub enum QuotaError {
    #[error("Usage already committed for order {order_id}")]
    DoubleCommit { order_id: Uuid },
}

#[derive(Debug, Default)]
struct CounterState {
    used: u32,
    committed: HashSet<Uuid>,
}

/// Tracks billable order counts per tenant and calendar month.
///
/// Sole owner of the usage counters. The check/commit split is load-bearing:
/// a check may be followed by a rejected downstream step without inflating
/// the counter, so the increment happens exactly once per durably created
/// order. Callers serialize check+commit per tenant; the tracker itself
/// holds no locks.
pub struct QuotaTracker {
    counters: HashMap<(Uuid, String), CounterState>,
}

impl QuotaTracker {
    pub fn new() -> Self {
        Self {
            counters: HashMap::new(),
        }
    }

    /// Decide whether one more billable order fits the tenant's plan.
    /// Never mutates the counter.
    pub fn check_and_reserve(&self, tenant_id: Uuid, plan: &TenantPlan) -> QuotaDecision {
        if !entitlements::resolve(plan).quota_applies {
            return QuotaDecision::Allowed;
        }

        let used = self
            .counters
            .get(&(tenant_id, current_month()))
            .map(|c| c.used)
            .unwrap_or(0);

        if used >= plan.monthly_order_limit {
            QuotaDecision::LimitReached
        } else {
            QuotaDecision::Allowed
        }
    }

    /// Record one billable admitted order. Committing the same order twice
    /// is a programming error and fails hard without touching the counter.
    pub fn commit(&mut self, tenant_id: Uuid, order_id: Uuid) -> Result<(), QuotaError> {
        let counter = self
            .counters
            .entry((tenant_id, current_month()))
            .or_default();

        if !counter.committed.insert(order_id) {
            return Err(QuotaError::DoubleCommit { order_id });
        }

        counter.used += 1;
        tracing::debug!(%tenant_id, %order_id, used = counter.used, "quota committed");
        Ok(())
    }

    pub fn usage(&self, tenant_id: Uuid, plan: &TenantPlan) -> UsageSnapshot {
        let used = self
            .counters
            .get(&(tenant_id, current_month()))
            .map(|c| c.used)
            .unwrap_or(0);

        if !entitlements::resolve(plan).quota_applies {
            return UsageSnapshot {
                used,
                limit: None,
                remaining: None,
            };
        }

        UsageSnapshot {
            used,
            limit: Some(plan.monthly_order_limit),
            remaining: Some(plan.monthly_order_limit.saturating_sub(used)),
        }
    }

    /// Wipe the tenant's counter for the current month. Only invoked by the
    /// cycle-close operation; counters never decrement otherwise.
    pub fn reset(&mut self, tenant_id: Uuid) {
        self.counters.remove(&(tenant_id, current_month()));
        tracing::info!(%tenant_id, "usage counter reset");
    }
}

impl Default for QuotaTracker {
    fn default() -> Self {
        Self::new()
    }
}

fn current_month() -> String {
    Utc::now().format("%Y-%m").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metered_plan(limit: u32) -> TenantPlan {
        TenantPlan::free(Uuid::new_v4(), limit)
    }

    #[test]
    fn unmetered_plans_are_always_allowed() {
        let tracker = QuotaTracker::new();

        let pro = TenantPlan::delivery_pro(Uuid::new_v4());
        assert_eq!(
            tracker.check_and_reserve(pro.tenant_id, &pro),
            QuotaDecision::Allowed
        );

        let mut legacy = metered_plan(5);
        legacy.is_legacy_free = true;
        assert_eq!(
            tracker.check_and_reserve(legacy.tenant_id, &legacy),
            QuotaDecision::Allowed
        );
    }

    #[test]
    fn check_alone_never_increments() {
        let tracker = QuotaTracker::new();
        let plan = metered_plan(5);

        for _ in 0..10 {
            assert_eq!(
                tracker.check_and_reserve(plan.tenant_id, &plan),
                QuotaDecision::Allowed
            );
        }
        assert_eq!(tracker.usage(plan.tenant_id, &plan).used, 0);
    }

    #[test]
    fn limit_reached_after_five_commits() {
        let mut tracker = QuotaTracker::new();
        let plan = metered_plan(5);

        for n in 1..=5 {
            assert_eq!(
                tracker.check_and_reserve(plan.tenant_id, &plan),
                QuotaDecision::Allowed
            );
            tracker.commit(plan.tenant_id, Uuid::new_v4()).unwrap();
            assert_eq!(tracker.usage(plan.tenant_id, &plan).used, n);
        }

        assert_eq!(
            tracker.check_and_reserve(plan.tenant_id, &plan),
            QuotaDecision::LimitReached
        );
        assert_eq!(tracker.usage(plan.tenant_id, &plan).remaining, Some(0));
    }

    #[test]
    fn double_commit_fails_without_counting_twice() {
        let mut tracker = QuotaTracker::new();
        let plan = metered_plan(5);
        let order_id = Uuid::new_v4();

        tracker.commit(plan.tenant_id, order_id).unwrap();
        let err = tracker.commit(plan.tenant_id, order_id).unwrap_err();

        assert!(matches!(err, QuotaError::DoubleCommit { .. }));
        assert_eq!(tracker.usage(plan.tenant_id, &plan).used, 1);
    }

    #[test]
    fn reset_wipes_the_counter() {
        let mut tracker = QuotaTracker::new();
        let plan = metered_plan(5);

        tracker.commit(plan.tenant_id, Uuid::new_v4()).unwrap();
        tracker.reset(plan.tenant_id);

        let snapshot = tracker.usage(plan.tenant_id, &plan);
        assert_eq!(snapshot.used, 0);
        assert_eq!(snapshot.remaining, Some(5));
    }

    #[test]
    fn usage_is_scoped_per_tenant() {
        let mut tracker = QuotaTracker::new();
        let a = metered_plan(5);
        let b = metered_plan(5);

        tracker.commit(a.tenant_id, Uuid::new_v4()).unwrap();

        assert_eq!(tracker.usage(a.tenant_id, &a).used, 1);
        assert_eq!(tracker.usage(b.tenant_id, &b).used, 0);
    }
}
