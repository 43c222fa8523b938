pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers between two points given in decimal degrees.
///
/// NaN inputs propagate to a NaN result.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = haversine_term(d_phi, d_lambda, phi1, phi2);
    central_angle(a) * EARTH_RADIUS_KM
}

fn haversine_term(d_phi: f64, d_lambda: f64, phi1: f64, phi2: f64) -> f64 {
    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // rounding can push `a` a hair outside [0, 1] near antipodes
    a.clamp(0.0, 1.0)
}

fn central_angle(a: f64) -> f64 {
    2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORK: (f64, f64) = (51.8985, -8.4756);
    const DUBLIN: (f64, f64) = (53.3498, -6.2603);

    #[test]
    fn test_identical_points_are_zero_apart() {
        assert_eq!(distance_km(CORK.0, CORK.1, CORK.0, CORK.1), 0.0);
        assert_eq!(distance_km(0.0, 0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let there = distance_km(CORK.0, CORK.1, DUBLIN.0, DUBLIN.1);
        let back = distance_km(DUBLIN.0, DUBLIN.1, CORK.0, CORK.1);
        assert!((there - back).abs() < 1e-9);
    }

    #[test]
    fn test_cork_to_dublin() {
        let d = distance_km(CORK.0, CORK.1, DUBLIN.0, DUBLIN.1);
        assert!((d - 219.0).abs() < 5.0, "got {}", d);
    }

    #[test]
    fn test_antipodal_points_are_half_circumference() {
        let d = distance_km(0.0, 0.0, 0.0, 180.0);
        let half = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!(d.is_finite());
        assert!((d - half).abs() < 1e-6);
    }

    #[test]
    fn test_tiny_separation_is_stable() {
        let d = distance_km(51.0, -8.0, 51.0 + 1e-9, -8.0);
        assert!(d > 0.0);
        assert!(d < 1e-3);
    }

    #[test]
    fn test_nan_propagates() {
        assert!(distance_km(f64::NAN, 0.0, 0.0, 0.0).is_nan());
    }
}
