use serde::{Deserialize, Serialize};

use crate::collaborative::CollaborativeMethod;
use crate::errors::EngineError;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Weights of the five component similarity matrices
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusionWeights {
    pub content: f64,
    pub rating: f64,
    pub price: f64,
    pub reviews: f64,
    pub location: f64,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            content: 0.35,
            rating: 0.20,
            price: 0.10,
            reviews: 0.20,
            location: 0.15,
        }
    }
}

impl FusionWeights {
    pub fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }

    pub fn as_array(&self) -> [f64; 5] {
        [self.content, self.rating, self.price, self.reviews, self.location]
    }

    /// Rejects weights that would let the fused value leave [0, 1].
    pub fn validate(&self) -> Result<(), EngineError> {
        if let Some(bad) = self.as_array().iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(EngineError::InvalidWeights(format!(
                "every weight must be finite and non-negative, got {}",
                bad
            )));
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(EngineError::InvalidWeights(format!(
                "weights must sum to 1.0, got {:.6}",
                sum
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct FusionSettings {
    pub weights: FusionWeights,
    pub location_scale_km: f64,
    pub content_max_features: usize,
    pub review_max_features: usize,
    pub price_tiers: u8,
    pub use_reviews: bool,
    pub use_location: bool,
}

impl Default for FusionSettings {
    fn default() -> Self {
        Self {
            weights: FusionWeights::default(),
            location_scale_km: 5.0,
            content_max_features: 500,
            review_max_features: 100,
            price_tiers: 3,
            use_reviews: true,
            use_location: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CollaborativeSettings {
    pub method: CollaborativeMethod,
    pub n_factors: usize,
    pub neighbours: usize,
    pub min_predicted_rating: f64,
}

impl Default for CollaborativeSettings {
    fn default() -> Self {
        Self {
            method: CollaborativeMethod::UserBased,
            n_factors: 20,
            neighbours: 10,
            min_predicted_rating: 4.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeocoderSettings {
    pub base_url: &'static str,
    pub user_agent: &'static str,
    pub timeout_secs: u64,
    pub rate_limit_ms: u64,
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org",
            user_agent: "RestaurantRecommender/2.0",
            timeout_secs: 5,
            rate_limit_ms: 1000, // Nominatim usage policy: 1 req/sec
        }
    }
}

#[derive(Debug, Clone)]
pub struct QuerySettings {
    pub default_limit: usize,
    pub default_radius_km: f64,
    pub hybrid_candidate_multiplier: usize,
    pub content_weight: f64,
    pub collaborative_weight: f64,
    pub min_reviews_for_top_rated: u32,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            default_limit: 10,
            default_radius_km: 5.0,
            hybrid_candidate_multiplier: 2,
            content_weight: 0.5,
            collaborative_weight: 0.5,
            min_reviews_for_top_rated: 5,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub fusion: FusionSettings,
    pub collaborative: CollaborativeSettings,
    pub geocoder: GeocoderSettings,
    pub query: QuerySettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Resolves the model path: explicit argument, then `MODEL_PATH`, then the default file.
pub fn model_path(explicit: Option<&str>) -> String {
    explicit
        .map(str::to_string)
        .or_else(|| std::env::var("MODEL_PATH").ok())
        .unwrap_or_else(|| "restaurant_model.json".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        let weights = FusionWeights::default();
        assert!((weights.sum() - 1.0).abs() < 1e-12);
        assert!(weights.validate().is_ok());
    }

    #[test]
    fn test_weights_not_summing_to_one_are_rejected() {
        let weights = FusionWeights {
            content: 0.5,
            ..FusionWeights::default()
        };
        assert!(matches!(weights.validate(), Err(EngineError::InvalidWeights(_))));
    }

    #[test]
    fn test_negative_weight_is_rejected() {
        let weights = FusionWeights {
            content: 0.55,
            rating: -0.2,
            price: 0.2,
            reviews: 0.3,
            location: 0.15,
        };
        assert!(weights.validate().is_err());
    }

    #[test]
    fn test_explicit_model_path_wins() {
        assert_eq!(model_path(Some("custom.json")), "custom.json");
    }
}
