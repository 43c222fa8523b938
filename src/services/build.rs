use anyhow::{Context, Result};
use log::info;

use crate::collaborative::CollaborativeModel;
use crate::config::settings::AppConfig;
use crate::dataset::{self, DatasetSource};
use crate::domain::RawDataset;
use crate::model::TrainedModel;
use crate::persistence::ModelStore;
use crate::preprocessing;
use crate::similarity::FusionEngine;

/// Raw dataset → preprocessed catalog → similarity + collaborative models → model file
pub struct BuildService {
    config: AppConfig,
}

impl BuildService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, source: &DatasetSource, output: &str) -> Result<TrainedModel> {
        info!("=== Starting Model Build ===\n");

        let raw = dataset::load(source)?;
        let model = self.build(raw)?;

        ModelStore::new(output).save(&model)?;

        info!("=== Model Build Complete ===");
        Ok(model)
    }

    /// Builds the model in memory. Schema problems and invalid weights abort here.
    pub fn build(&self, raw: RawDataset) -> Result<TrainedModel> {
        let catalog = preprocessing::preprocess(raw).context("Preprocessing failed")?;
        info!("  → Catalog ready: {} restaurants, {} reviews\n", catalog.len(), catalog.reviews.len());

        let similarity = FusionEngine::new(self.config.fusion.clone())
            .build(&catalog)
            .context("Similarity model build failed")?;

        let collaborative = CollaborativeModel::build(&catalog.reviews, &self.config.collaborative);
        info!("  → Collaborative method: {}\n", collaborative.method.as_str());

        Ok(TrainedModel::new(
            self.config.fusion.weights,
            catalog,
            similarity,
            collaborative,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EngineError;
    use std::fs;

    const RESTAURANTS: &str = r#"[
        {"place_id": "p1", "name": "Market Lane", "latitude": 51.8989, "longitude": -8.4732,
         "rating": 4.6, "address": "5 Oliver Plunkett St", "cuisine_type": "Irish",
         "price_range": "€20-30"},
        {"place_id": "p2", "name": "Nash 19", "latitude": "51.8981", "longitude": "-8.4760",
         "rating": "4.5", "address": "Princes St", "cuisine_type": "Irish", "price_range": ""},
        {"place_id": "p3", "name": "Miyazaki", "latitude": 51.8945, "longitude": -8.4808,
         "rating": 4.8, "address": "1A Evergreen St", "cuisine_type": "Japanese",
         "price_range": "€10-15"}
    ]"#;

    const REVIEWS: &str = r#"[
        {"place_id": "p1", "username": "ann", "rating": 5, "review_text": "Excellent chowder, friendly staff"},
        {"place_id": "p2", "username": "ann", "rating": 4, "review_text": "Great brunch"},
        {"place_id": "p1", "username": "bob", "rating": 5, "review_text": "Lovely lamb"},
        {"place_id": "p3", "username": "bob", "rating": 5, "review_text": "Best ramen in town"}
    ]"#;

    #[test]
    fn test_build_and_save_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let restaurants = dir.path().join("restaurants.json");
        let reviews = dir.path().join("reviews.json");
        let output = dir.path().join("model.json");
        fs::write(&restaurants, RESTAURANTS).unwrap();
        fs::write(&reviews, REVIEWS).unwrap();

        let source = DatasetSource::detect(&restaurants, Some(&reviews)).unwrap();
        let model = BuildService::new(AppConfig::default())
            .run(&source, output.to_str().unwrap())
            .unwrap();

        assert_eq!(model.catalog.len(), 3);
        assert_eq!(model.similarity.fused.dim(), (3, 3));
        assert_eq!(model.catalog.restaurants[1].price_level, 2);
        assert_eq!(model.catalog.restaurants[2].price_level, 1);
        assert_eq!(model.collaborative.matrix.shape(), (2, 3));

        let loaded = ModelStore::new(&output).load().unwrap();
        assert_eq!(loaded.catalog.find_by_name("miyazaki"), Some(2));
    }

    #[test]
    fn test_missing_required_column_aborts_build() {
        let raw = RawDataset {
            restaurant_columns: vec!["place_id".into(), "name".into()],
            review_columns: vec![
                "place_id".into(),
                "username".into(),
                "rating".into(),
                "review_text".into(),
            ],
            ..Default::default()
        };

        let err = BuildService::new(AppConfig::default()).build(raw).unwrap_err();
        let schema = err.downcast_ref::<EngineError>().unwrap();
        assert!(matches!(schema, EngineError::Schema { table: "restaurants", .. }));
    }

    #[test]
    fn test_build_from_empty_reviews_file() {
        let dir = tempfile::tempdir().unwrap();
        let restaurants = dir.path().join("restaurants.json");
        let reviews = dir.path().join("reviews.json");
        let output = dir.path().join("model.json");
        fs::write(&restaurants, RESTAURANTS).unwrap();
        fs::write(&reviews, "[]").unwrap();

        let source = DatasetSource::detect(&restaurants, Some(&reviews)).unwrap();
        let model = BuildService::new(AppConfig::default())
            .run(&source, output.to_str().unwrap())
            .unwrap();

        assert_eq!(model.catalog.len(), 3);
        assert!(model.catalog.reviews.is_empty());
        assert_eq!(model.collaborative.matrix.shape(), (0, 0));
        assert!(output.exists());
    }
}
