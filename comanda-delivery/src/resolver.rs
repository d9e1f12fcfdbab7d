use serde::{Deserialize, Serialize};

use crate::models::DeliveryTier;

/// Result of pricing a delivery distance against a tenant's tier set.
///
/// NotCovered means the address sits outside every configured band. It is
/// a rejection condition for the order, never a fallback to the widest tier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum FeeResolution {
    Covered {
        fee_cents: i32,
        minimum_order_cents: i32,
    },
    NotCovered,
}

/// Select the tier covering `distance_km`.
///
/// Tiers are evaluated in ascending `max_distance_km` order regardless of
/// storage order; the first band whose ceiling reaches the distance wins.
/// Bands sharing a ceiling break the tie toward the lower fee, so the
/// outcome is deterministic for unconstrained admin input.
pub fn resolve(distance_km: f64, tiers: &[DeliveryTier]) -> FeeResolution {
    let mut sorted: Vec<&DeliveryTier> = tiers.iter().collect();
    sorted.sort_by(|a, b| {
        a.max_distance_km
            .total_cmp(&b.max_distance_km)
            .then(a.fee_cents.cmp(&b.fee_cents))
    });

    for tier in sorted {
        if distance_km <= tier.max_distance_km {
            return FeeResolution::Covered {
                fee_cents: tier.fee_cents,
                minimum_order_cents: tier.minimum_order_cents,
            };
        }
    }

    FeeResolution::NotCovered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(max_km: f64, fee: i32) -> DeliveryTier {
        DeliveryTier::new(max_km, fee, 0)
    }

    #[test]
    fn picks_the_band_containing_the_distance() {
        let tiers = vec![band(3.0, 500), band(6.0, 800), band(10.0, 1200)];

        assert_eq!(
            resolve(4.5, &tiers),
            FeeResolution::Covered {
                fee_cents: 800,
                minimum_order_cents: 0
            }
        );
    }

    #[test]
    fn distance_on_the_boundary_stays_in_the_band() {
        let tiers = vec![band(3.0, 500), band(6.0, 800)];

        assert_eq!(
            resolve(3.0, &tiers),
            FeeResolution::Covered {
                fee_cents: 500,
                minimum_order_cents: 0
            }
        );
    }

    #[test]
    fn beyond_the_widest_band_is_not_covered() {
        let tiers = vec![band(3.0, 500), band(6.0, 800), band(10.0, 1200)];

        assert_eq!(resolve(15.0, &tiers), FeeResolution::NotCovered);
    }

    #[test]
    fn empty_tier_set_is_not_covered() {
        assert_eq!(resolve(1.0, &[]), FeeResolution::NotCovered);
    }

    #[test]
    fn storage_order_does_not_matter() {
        let tiers = vec![band(10.0, 1200), band(3.0, 500), band(6.0, 800)];

        assert_eq!(
            resolve(4.5, &tiers),
            FeeResolution::Covered {
                fee_cents: 800,
                minimum_order_cents: 0
            }
        );
    }

    #[test]
    fn equal_ceilings_favor_the_customer() {
        let tiers = vec![band(5.0, 900), band(5.0, 700)];

        assert_eq!(
            resolve(4.0, &tiers),
            FeeResolution::Covered {
                fee_cents: 700,
                minimum_order_cents: 0
            }
        );
    }

    #[test]
    fn minimum_order_comes_from_the_selected_band() {
        let tiers = vec![
            DeliveryTier::new(3.0, 500, 2000),
            DeliveryTier::new(6.0, 800, 3500),
        ];

        assert_eq!(
            resolve(5.0, &tiers),
            FeeResolution::Covered {
                fee_cents: 800,
                minimum_order_cents: 3500
            }
        );
    }
}
