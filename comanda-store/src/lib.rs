pub mod app_config;
pub mod events;
pub mod memory;

pub use events::EventLog;
pub use memory::{InMemoryPlanRepository, InMemoryTenantRepository, InMemoryTierRepository};
