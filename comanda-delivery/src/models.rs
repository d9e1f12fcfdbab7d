use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One distance band of a tenant's delivery pricing.
///
/// Tiers conceptually partition distance into increasing bands. Storage
/// order is unconstrained (admin input arrives in any order); the resolver
/// sorts its own snapshot before evaluating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryTier {
    pub id: Uuid,
    pub max_distance_km: f64,
    pub fee_cents: i32,
    pub minimum_order_cents: i32,
}

impl DeliveryTier {
    pub fn new(max_distance_km: f64, fee_cents: i32, minimum_order_cents: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            max_distance_km,
            fee_cents,
            minimum_order_cents,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TierValidationError {
    #[error("Tier {id} has non-positive max distance {max_distance_km}")]
    InvalidDistance { id: Uuid, max_distance_km: f64 },

    #[error("Tier {id} has negative amount")]
    NegativeAmount { id: Uuid },
}

/// Write-time validation for a full tier replacement.
///
/// Overlapping or gapped bands are accepted: the resolver's deterministic
/// ordering makes them harmless, and rejecting them would break tenants
/// that already saved such configs. Duplicate distances only get a warning.
pub fn validate_tiers(tiers: &[DeliveryTier]) -> Result<(), TierValidationError> {
    for tier in tiers {
        if !tier.max_distance_km.is_finite() || tier.max_distance_km <= 0.0 {
            return Err(TierValidationError::InvalidDistance {
                id: tier.id,
                max_distance_km: tier.max_distance_km,
            });
        }
        if tier.fee_cents < 0 || tier.minimum_order_cents < 0 {
            return Err(TierValidationError::NegativeAmount { id: tier.id });
        }
    }

    for (i, a) in tiers.iter().enumerate() {
        for b in &tiers[i + 1..] {
            if a.max_distance_km == b.max_distance_km {
                tracing::warn!(
                    max_distance_km = a.max_distance_km,
                    "duplicate tier distance, lower fee will win"
                );
            }
        }
    }

    Ok(())
}
