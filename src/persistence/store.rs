use anyhow::{Context, Result, bail};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::model_context;
use crate::model::TrainedModel;

/// JSON file holding one trained model
pub struct ModelStore {
    path: PathBuf,
}

impl ModelStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Writes to `<path>.tmp` and renames over `<path>`, so readers never see a partial file
    pub fn save(&self, model: &TrainedModel) -> Result<()> {
        let location = self.path.display().to_string();
        let temp_path = self.temp_path();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| model_context("create directory for", &location))?;
        }
        if temp_path.exists() {
            fs::remove_file(&temp_path)?;
        }

        let json = serde_json::to_vec(model).context("Failed to serialize model")?;
        fs::write(&temp_path, &json).with_context(|| model_context("write", &location))?;
        fs::rename(&temp_path, &self.path).with_context(|| model_context("swap", &location))?;

        info!("Saved model to: {}", location);
        info!("  → File size: {:.2} MB", json.len() as f64 / (1024.0 * 1024.0));
        info!("  → Restaurants: {}", model.catalog.len());
        info!("  → Reviews: {}", model.catalog.reviews.len());
        Ok(())
    }

    pub fn load(&self) -> Result<TrainedModel> {
        let location = self.path.display().to_string();
        if !self.path.exists() {
            bail!("Model file not found: {} (run `build` first)", location);
        }

        let json = fs::read(&self.path).with_context(|| model_context("read", &location))?;
        let model: TrainedModel = serde_json::from_slice(&json)
            .with_context(|| model_context("deserialize", &location))?;
        let model = model.prepare()?;

        info!(
            "Loaded model from: {} (built {}, {} restaurants)",
            location,
            model.built_at.format("%Y-%m-%d %H:%M:%S"),
            model.catalog.len()
        );
        Ok(model)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborative::CollaborativeModel;
    use crate::config::{CollaborativeSettings, FusionSettings};
    use crate::domain::Catalog;
    use crate::domain::catalog::fixtures::{restaurant, review};
    use crate::similarity::FusionEngine;

    fn model() -> TrainedModel {
        let catalog = Catalog::new(
            vec![restaurant("p1", "One"), restaurant("p2", "Two")],
            vec![review("p1", "ann", 5.0)],
        );
        let settings = FusionSettings::default();
        let similarity = FusionEngine::new(settings.clone()).build(&catalog).unwrap();
        let collaborative =
            CollaborativeModel::build(&catalog.reviews, &CollaborativeSettings::default());
        TrainedModel::new(settings.weights, catalog, similarity, collaborative)
    }

    #[test]
    fn test_save_then_load_restores_lookups() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("nested").join("model.json"));

        let saved = model();
        store.save(&saved).unwrap();
        assert!(store.exists());
        assert!(!dir.path().join("nested").join("model.json.tmp").exists());

        let loaded = store.load().unwrap();
        assert_eq!(loaded.catalog.index_of("p2"), Some(1));
        let drift = (&loaded.similarity.fused - &saved.similarity.fused)
            .iter()
            .fold(0.0f64, |acc, v| acc.max(v.abs()));
        assert!(drift < 1e-12);
        assert_eq!(loaded.built_at, saved.built_at);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("absent.json"));

        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_save_replaces_previous_model() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("model.json"));

        store.save(&model()).unwrap();
        let mut second = model();
        second.catalog = Catalog::new(vec![restaurant("p9", "Nine")], Vec::new());
        second.similarity = FusionEngine::new(FusionSettings::default())
            .build(&second.catalog)
            .unwrap();
        store.save(&second).unwrap();

        assert_eq!(store.load().unwrap().catalog.len(), 1);
    }
}
