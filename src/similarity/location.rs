use ndarray::Array2;
use rayon::prelude::*;

use crate::geo::GeoPoint;

/// `exp(-d / scale)`: 1 at zero distance, decaying towards 0, never negative
pub fn distance_to_similarity(distance_km: f64, scale_km: f64) -> f64 {
    (-distance_km / scale_km).exp()
}

/// Pairwise location similarity. Rows are computed in parallel; a restaurant
/// without coordinates is similar only to itself.
pub fn location_similarity(points: &[Option<GeoPoint>], scale_km: f64) -> Array2<f64> {
    let n = points.len();

    let rows: Vec<Vec<f64>> = points
        .par_iter()
        .enumerate()
        .map(|(i, here)| {
            (0..n)
                .map(|j| {
                    if i == j {
                        return 1.0;
                    }
                    match (here, &points[j]) {
                        (Some(a), Some(b)) => distance_to_similarity(a.distance_to(b), scale_km),
                        _ => 0.0,
                    }
                })
                .collect()
        })
        .collect();

    Array2::from_shape_vec((n, n), rows.into_iter().flatten().collect())
        .unwrap_or_else(|_| Array2::zeros((n, n)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cork() -> Vec<Option<GeoPoint>> {
        vec![
            Some(GeoPoint::new(51.8985, -8.4756)),
            Some(GeoPoint::new(51.8990, -8.4756)),
            Some(GeoPoint::new(51.9500, -8.4756)),
            None,
        ]
    }

    #[test]
    fn test_diagonal_is_one() {
        let sim = location_similarity(&cork(), 5.0);
        for i in 0..4 {
            assert_eq!(sim[[i, i]], 1.0);
        }
    }

    #[test]
    fn test_similarity_decreases_with_distance() {
        let sim = location_similarity(&cork(), 5.0);

        assert!(sim[[0, 1]] > sim[[0, 2]]);
        assert!(sim[[0, 2]] > 0.0);
    }

    #[test]
    fn test_missing_coordinates_are_similar_to_nothing() {
        let sim = location_similarity(&cork(), 5.0);

        assert_eq!(sim[[3, 0]], 0.0);
        assert_eq!(sim[[0, 3]], 0.0);
    }

    #[test]
    fn test_symmetric() {
        let sim = location_similarity(&cork(), 5.0);
        assert_eq!(sim, sim.t());
    }

    #[test]
    fn test_decay_scale() {
        assert_eq!(distance_to_similarity(0.0, 5.0), 1.0);
        assert!((distance_to_similarity(5.0, 5.0) - (-1.0f64).exp()).abs() < 1e-12);
    }
}
