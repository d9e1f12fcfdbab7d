use comanda_core::tenant::GeoPoint;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates, in kilometers.
///
/// Straight-line distance is what tier bands are configured against;
/// route distance would need an external routing provider.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_for_same_point() {
        let p = GeoPoint {
            lat: -23.5505,
            lng: -46.6333,
        };
        assert!(haversine_km(p, p) < 1e-9);
    }

    #[test]
    fn known_distance_within_tolerance() {
        // Praça da Sé to Paulista Avenue, roughly 2.9 km
        let se = GeoPoint {
            lat: -23.5503,
            lng: -46.6339,
        };
        let paulista = GeoPoint {
            lat: -23.5614,
            lng: -46.6559,
        };

        let d = haversine_km(se, paulista);
        assert!(d > 2.0 && d < 4.0, "got {}", d);
    }

    #[test]
    fn symmetric() {
        let a = GeoPoint {
            lat: -23.55,
            lng: -46.63,
        };
        let b = GeoPoint {
            lat: -23.60,
            lng: -46.70,
        };

        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
    }
}
