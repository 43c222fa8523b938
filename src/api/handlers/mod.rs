use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use std::sync::{Arc, RwLock};

use crate::api::models::{ErrorResponse, ResultsResponse};
use crate::config::settings::AppConfig;
use crate::errors::EngineError;
use crate::geocoding::Geocoder;
use crate::ranking::{QueryOutcome, RecommendationService, Unresolved};

pub mod admin;
pub mod recommendations;
pub mod restaurants;
pub mod users;

/// Shared request context. Handlers take an `Arc` snapshot of the service and
/// never mutate it; a reload swaps the whole snapshot.
pub struct AppState<G> {
    model: RwLock<Arc<RecommendationService>>,
    pub geocoder: G,
    pub config: AppConfig,
    pub model_path: String,
}

impl<G: Geocoder> AppState<G> {
    pub fn new(
        service: RecommendationService,
        geocoder: G,
        config: AppConfig,
        model_path: String,
    ) -> Self {
        Self {
            model: RwLock::new(Arc::new(service)),
            geocoder,
            config,
            model_path,
        }
    }

    pub fn snapshot(&self) -> Arc<RecommendationService> {
        let guard = self.model.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&*guard)
    }

    pub fn replace(&self, service: RecommendationService) {
        let mut guard = self.model.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::new(service);
    }
}

/// 200 with results, 404 for empty or unresolved queries
pub fn outcome_response<T: Serialize>(strategy: &'static str, outcome: QueryOutcome<T>) -> Response {
    match outcome {
        QueryOutcome::Found(results) => Json(ResultsResponse {
            strategy,
            count: results.len(),
            results,
        })
        .into_response(),
        QueryOutcome::Empty => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "No restaurants match your filters.".to_string(),
                kind: "empty",
                unresolved: None,
            }),
        )
            .into_response(),
        QueryOutcome::NotFound(what) => not_found(what),
    }
}

pub fn not_found(what: Unresolved) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: what.to_string(),
            kind: "not_found",
            unresolved: Some(what),
        }),
    )
        .into_response()
}

/// 400 for contradictory queries, 500 for everything else
pub fn engine_error(error: EngineError) -> Response {
    match error {
        EngineError::InvalidQuery(reason) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: reason,
                kind: "invalid_query",
                unresolved: None,
            }),
        )
            .into_response(),
        other => internal_error(other),
    }
}

pub fn internal_error(error: impl std::fmt::Display) -> Response {
    log::error!("Request failed: {}", error);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: error.to_string(),
            kind: "internal",
            unresolved: None,
        }),
    )
        .into_response()
}
