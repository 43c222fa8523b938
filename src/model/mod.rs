use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collaborative::CollaborativeModel;
use crate::config::FusionWeights;
use crate::domain::Catalog;
use crate::errors::EngineError;
use crate::similarity::SimilarityModel;

/// Everything queries need, built and persisted as one unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedModel {
    pub built_at: DateTime<Utc>,
    pub weights: FusionWeights,
    pub catalog: Catalog,
    pub similarity: SimilarityModel,
    pub collaborative: CollaborativeModel,
}

impl TrainedModel {
    pub fn new(
        weights: FusionWeights,
        catalog: Catalog,
        similarity: SimilarityModel,
        collaborative: CollaborativeModel,
    ) -> Self {
        Self {
            built_at: Utc::now(),
            weights,
            catalog,
            similarity,
            collaborative,
        }
    }

    /// Restores derived lookups and checks the matrices match the catalog
    pub fn prepare(mut self) -> Result<Self, EngineError> {
        self.catalog.reindex();
        self.similarity.ensure_built_for(&self.catalog)?;
        Ok(self)
    }
}
