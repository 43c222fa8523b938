use ndarray::{Array1, Array2};

/// `1 - |a - b|` over values already scaled into [0, 1]
pub fn absolute_difference_similarity(scaled: &Array1<f64>) -> Array2<f64> {
    let n = scaled.len();
    Array2::from_shape_fn((n, n), |(i, j)| 1.0 - (scaled[i] - scaled[j]).abs())
}

/// Min-max scaled rating similarity; missing ratings take the catalog mean.
/// A catalog with a single distinct rating is uniformly similar.
pub fn rating_similarity(ratings: &[Option<f64>]) -> Array2<f64> {
    let present: Vec<f64> = ratings.iter().flatten().copied().collect();
    let mean = if present.is_empty() {
        0.0
    } else {
        present.iter().sum::<f64>() / present.len() as f64
    };

    let imputed = Array1::from_iter(ratings.iter().map(|r| r.unwrap_or(mean)));
    absolute_difference_similarity(&min_max_scale(&imputed))
}

/// Price level divided by the number of tiers, so 1..=tiers maps into (0, 1]
pub fn price_similarity(levels: &[u8], tiers: u8) -> Array2<f64> {
    let tiers = f64::from(tiers.max(1));
    let scaled = Array1::from_iter(levels.iter().map(|&l| (f64::from(l) / tiers).min(1.0)));
    absolute_difference_similarity(&scaled)
}

pub fn min_max_scale(values: &Array1<f64>) -> Array1<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if !range.is_finite() || range <= 0.0 {
        return Array1::zeros(values.len());
    }
    values.mapv(|v| (v - min) / range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_rating_similarity_extremes() {
        let sim = rating_similarity(&[Some(1.0), Some(5.0), Some(3.0)]);

        assert_eq!(sim[[0, 1]], 0.0);
        assert_eq!(sim[[0, 2]], 0.5);
        assert_eq!(sim[[1, 1]], 1.0);
    }

    #[test]
    fn test_missing_rating_takes_mean() {
        let sim = rating_similarity(&[Some(2.0), Some(4.0), None]);

        assert_eq!(sim[[2, 0]], 0.5);
        assert_eq!(sim[[2, 1]], 0.5);
    }

    #[test]
    fn test_identical_ratings_are_fully_similar() {
        let sim = rating_similarity(&[Some(4.0), Some(4.0)]);
        assert_eq!(sim, array![[1.0, 1.0], [1.0, 1.0]]);
    }

    #[test]
    fn test_price_similarity_uses_tier_count() {
        let sim = price_similarity(&[1, 3, 2], 3);

        assert!((sim[[0, 1]] - (1.0 - 2.0 / 3.0)).abs() < 1e-12);
        assert!((sim[[0, 2]] - (1.0 - 1.0 / 3.0)).abs() < 1e-12);
        assert_eq!(sim[[1, 1]], 1.0);
    }
}
