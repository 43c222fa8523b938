use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use log::info;
use std::sync::Arc;

use super::{AppState, internal_error};
use crate::api::models::ReloadResponse;
use crate::geocoding::Geocoder;
use crate::persistence::ModelStore;
use crate::ranking::RecommendationService;

/// Reloads the model file and swaps it in. In-flight requests keep the
/// snapshot they started with.
pub async fn reload<G: Geocoder + 'static>(State(state): State<Arc<AppState<G>>>) -> impl IntoResponse {
    info!("Admin triggered model reload from {}", state.model_path);

    let store = ModelStore::new(&state.model_path);
    let model = match tokio::task::spawn_blocking(move || store.load()).await {
        Ok(Ok(model)) => model,
        Ok(Err(e)) => return internal_error(format!("{:#}", e)),
        Err(e) => return internal_error(e),
    };

    let service = RecommendationService::new(model, &state.config);
    let response = ReloadResponse {
        restaurants: service.catalog().len(),
        built_at: service.model().built_at.to_rfc3339(),
    };
    state.replace(service);

    info!("  → Serving {} restaurants", response.restaurants);
    Json(response).into_response()
}

#[cfg(test)]
mod tests {
    use super::super::AppState;
    use super::super::test_support::{call, get, post_json, state};
    use crate::persistence::ModelStore;
    use axum::http::StatusCode;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_reload_missing_file_keeps_current_model() {
        let dir = tempfile::tempdir().unwrap();
        let current = state();
        let state = Arc::new(AppState::new(
            (*current.snapshot()).clone(),
            current.geocoder.clone(),
            current.config.clone(),
            dir.path().join("missing.json").to_string_lossy().into_owned(),
        ));

        let (status, body) = call(state.clone(), post_json("/api/admin/reload", json!({}))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["kind"], "internal");

        let (status, _) = call(state, get("/api/restaurants/Quay%20Co-op")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_reload_swaps_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let current = state();
        let old = current.snapshot();

        let mut smaller = old.model().clone();
        smaller.catalog.restaurants.truncate(2);
        smaller.similarity = crate::similarity::FusionEngine::new(current.config.fusion.clone())
            .build(&smaller.catalog)
            .unwrap();
        ModelStore::new(&path).save(&smaller).unwrap();

        let state = Arc::new(AppState::new(
            (*old).clone(),
            current.geocoder.clone(),
            current.config.clone(),
            path.to_string_lossy().into_owned(),
        ));
        let (status, body) = call(state.clone(), post_json("/api/admin/reload", json!({}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["restaurants"], 2);
        assert_eq!(old.catalog().len(), 3);
        assert_eq!(state.snapshot().catalog().len(), 2);
    }
}
