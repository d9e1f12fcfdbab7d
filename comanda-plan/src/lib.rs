pub mod entitlements;
pub mod models;
pub mod quota;
pub mod repository;

pub use entitlements::{resolve, Entitlements};
pub use models::{PlanTier, TenantPlan};
pub use quota::{QuotaDecision, QuotaError, QuotaTracker, UsageSnapshot};
pub use repository::PlanRepository;
