pub mod factorization;
pub mod item_based;
pub mod user_based;
pub mod user_item;

use clap::ValueEnum;
use log::{info, warn};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::config::CollaborativeSettings;
use crate::domain::Review;
use crate::errors::EngineError;
pub use factorization::{Factorization, FactorizationSkipped};
pub use user_item::UserItemMatrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CollaborativeMethod {
    UserBased,
    ItemBased,
    MatrixFactorization,
}

impl CollaborativeMethod {
    pub fn as_str(&self) -> &str {
        match self {
            CollaborativeMethod::UserBased => "user-based",
            CollaborativeMethod::ItemBased => "item-based",
            CollaborativeMethod::MatrixFactorization => "matrix-factorization",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub place_id: String,
    pub predicted_rating: f64,
}

/// Rating matrix plus whichever similarity or factorisation the method needs.
/// `method` is the strategy actually built, after any fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaborativeModel {
    pub method: CollaborativeMethod,
    pub neighbours: usize,
    pub matrix: UserItemMatrix,
    pub user_similarity: Option<Array2<f64>>,
    pub item_similarity: Option<Array2<f64>>,
    pub factorization: Option<Factorization>,
}

impl CollaborativeModel {
    pub fn build(reviews: &[Review], settings: &CollaborativeSettings) -> Self {
        info!(
            "=== Building collaborative filtering model ({}) ===",
            settings.method.as_str()
        );

        let matrix = UserItemMatrix::from_reviews(reviews);
        let (users, items) = matrix.shape();
        info!("  → User-item matrix: {} users × {} items", users, items);
        info!("  → Sparsity: {:.2}%", matrix.sparsity());
        info!("  → Total ratings: {}", matrix.rating_count());

        let mut model = Self {
            method: settings.method,
            neighbours: settings.neighbours,
            matrix,
            user_similarity: None,
            item_similarity: None,
            factorization: None,
        };

        match settings.method {
            CollaborativeMethod::UserBased => model.with_user_similarity(),
            CollaborativeMethod::ItemBased => {
                model.item_similarity = Some(item_based::item_similarity(&model.matrix));
                info!("  → Item similarity matrix: {} × {}", items, items);
                model
            }
            CollaborativeMethod::MatrixFactorization => {
                match factorization::factorize(&model.matrix, settings.n_factors) {
                    Ok(f) => {
                        info!("  → Matrix factorization with {} factors", f.rank());
                        model.factorization = Some(f);
                        model
                    }
                    Err(reason) => {
                        warn!("  → {}, using user-based instead", reason);
                        model.method = CollaborativeMethod::UserBased;
                        model.with_user_similarity()
                    }
                }
            }
        }
    }

    fn with_user_similarity(mut self) -> Self {
        let similarity = user_based::user_similarity(&self.matrix);
        info!("  → User similarity matrix: {:?}", similarity.dim());
        self.user_similarity = Some(similarity);
        self
    }

    /// Unrated restaurants predicted at or above `min_rating`, best first.
    ///
    /// `Ok(None)` when the user has no ratings; an empty list is a valid answer.
    pub fn recommend_for_user(
        &self,
        username: &str,
        n: usize,
        min_rating: f64,
    ) -> Result<Option<Vec<Prediction>>, EngineError> {
        let Some(user) = self.matrix.user_index(username) else {
            return Ok(None);
        };

        let raw = match self.method {
            CollaborativeMethod::UserBased => {
                let similarity = self
                    .user_similarity
                    .as_ref()
                    .ok_or(EngineError::ModelNotBuilt("user similarity matrix"))?;
                user_based::predict(&self.matrix, similarity, user, self.neighbours)
            }
            CollaborativeMethod::ItemBased => {
                let similarity = self
                    .item_similarity
                    .as_ref()
                    .ok_or(EngineError::ModelNotBuilt("item similarity matrix"))?;
                item_based::predict(&self.matrix, similarity, user, self.neighbours)
            }
            CollaborativeMethod::MatrixFactorization => self
                .factorization
                .as_ref()
                .ok_or(EngineError::ModelNotBuilt("matrix factorization"))?
                .predict(&self.matrix, user),
        };

        let mut predictions: Vec<Prediction> = raw
            .into_iter()
            .filter(|(_, rating)| *rating >= min_rating)
            .map(|(item, rating)| Prediction {
                place_id: self.matrix.items[item].clone(),
                predicted_rating: rating,
            })
            .collect();
        predictions.sort_by(|a, b| b.predicted_rating.total_cmp(&a.predicted_rating));
        predictions.truncate(n);

        Ok(Some(predictions))
    }
}
