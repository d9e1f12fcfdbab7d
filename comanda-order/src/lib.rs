pub mod billing;
pub mod gateway;
pub mod lifecycle;
pub mod models;

pub use billing::{BillingOrchestrator, MockCheckoutAdapter};
pub use gateway::{
    AdmissionGateway, AdmissionOutcome, CycleCloseReport, GatewayError, OrderDraft, RejectReason,
};
pub use lifecycle::{LifecycleError, OrderLifecycle};
pub use models::{Channel, ItemDraft, Order, OrderItem, OrderStatus, Table, TableStatus};
