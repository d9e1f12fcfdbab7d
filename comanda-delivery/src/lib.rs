pub mod distance;
pub mod models;
pub mod repository;
pub mod resolver;

pub use distance::haversine_km;
pub use models::{validate_tiers, DeliveryTier, TierValidationError};
pub use repository::TierRepository;
pub use resolver::{resolve, FeeResolution};
