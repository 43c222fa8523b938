use log::{info, warn};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::cosine::cosine_similarity;
use super::location::location_similarity;
use super::numeric::{price_similarity, rating_similarity};
use super::tfidf::TfidfVectorizer;
use crate::config::FusionSettings;
use crate::domain::Catalog;
use crate::errors::EngineError;

/// The fused N×N matrix plus the raw location matrix, indexed by catalog position
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimilarityModel {
    pub fused: Array2<f64>,
    pub location: Array2<f64>,
}

impl SimilarityModel {
    pub fn size(&self) -> usize {
        self.fused.nrows()
    }

    /// The matrices must cover exactly the catalog they are queried with
    pub fn ensure_built_for(&self, catalog: &Catalog) -> Result<(), EngineError> {
        let n = catalog.len();
        if self.fused.dim() != (n, n) {
            return Err(EngineError::ModelNotBuilt("fused similarity matrix"));
        }
        if self.location.dim() != (n, n) {
            return Err(EngineError::ModelNotBuilt("location similarity matrix"));
        }
        Ok(())
    }
}

/// Builds the five component matrices and fuses them with the configured weights
pub struct FusionEngine {
    settings: FusionSettings,
}

impl FusionEngine {
    pub fn new(settings: FusionSettings) -> Self {
        Self { settings }
    }

    pub fn build(&self, catalog: &Catalog) -> Result<SimilarityModel, EngineError> {
        let weights = self.settings.weights;
        weights.validate()?;

        let n = catalog.len();
        info!("=== Building similarity model for {} restaurants ===", n);

        info!("1. Content similarity");
        let features: Vec<&str> = catalog
            .restaurants
            .iter()
            .map(|r| r.combined_features.as_str())
            .collect();
        let content_vectors =
            TfidfVectorizer::bigrams(self.settings.content_max_features).fit_transform(&features);
        let content = cosine_similarity(&content_vectors);
        info!("  → {} content features", content_vectors.ncols());

        info!("2. Rating similarity");
        let ratings: Vec<Option<f64>> = catalog.restaurants.iter().map(|r| r.rating).collect();
        let rating = rating_similarity(&ratings);

        info!("3. Price similarity");
        let levels: Vec<u8> = catalog.restaurants.iter().map(|r| r.price_level).collect();
        let price = price_similarity(&levels, self.settings.price_tiers);

        info!("4. Review text similarity");
        let reviews = self.review_similarity(catalog);

        info!("5. Location similarity");
        let points: Vec<_> = catalog.restaurants.iter().map(|r| r.location()).collect();
        let location = location_similarity(&points, self.settings.location_scale_km);
        let location_component = if self.settings.use_location {
            location.clone()
        } else {
            warn!("  → Location similarity disabled, component is zero");
            Array2::zeros((n, n))
        };

        info!("6. Fusing components");
        let fused = &content * weights.content
            + &rating * weights.rating
            + &price * weights.price
            + &reviews * weights.reviews
            + &location_component * weights.location;

        if n > 0 {
            let min = fused.iter().copied().fold(f64::INFINITY, f64::min);
            let max = fused.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            info!("  → Fused matrix {:?}, range [{:.3}, {:.3}]", fused.dim(), min, max);
        } else {
            warn!("  → Empty catalog, similarity model is empty");
        }

        Ok(SimilarityModel { fused, location })
    }

    fn review_similarity(&self, catalog: &Catalog) -> Array2<f64> {
        let n = catalog.len();
        let texts: Vec<&str> = catalog
            .restaurants
            .iter()
            .map(|r| r.reviews.review_text.as_str())
            .collect();

        if !self.settings.use_reviews {
            warn!("  → Review similarity disabled, component is zero");
            return Array2::zeros((n, n));
        }
        if texts.iter().all(|t| t.trim().is_empty()) {
            warn!("  → No review text in catalog, component is zero");
            return Array2::zeros((n, n));
        }

        let vectors =
            TfidfVectorizer::unigrams(self.settings.review_max_features).fit_transform(&texts);
        info!(
            "  → {} restaurants with review text, {} review features",
            texts.iter().filter(|t| !t.trim().is_empty()).count(),
            vectors.ncols()
        );
        cosine_similarity(&vectors)
    }
}
