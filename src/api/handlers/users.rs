use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{AppState, internal_error, not_found, outcome_response};
use crate::api::models::LimitParams;
use crate::geocoding::Geocoder;

pub async fn profile<G: Geocoder + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(username): Path<String>,
) -> impl IntoResponse {
    match state.snapshot().user_profile(&username) {
        Ok(profile) => Json(profile).into_response(),
        Err(what) => not_found(what),
    }
}

pub async fn recommendations<G: Geocoder + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(username): Path<String>,
    Query(params): Query<LimitParams>,
) -> impl IntoResponse {
    let service = state.snapshot();
    let limit = params.limit.unwrap_or(service.settings().default_limit);

    match service.user_recommendations(&username, limit) {
        Ok(outcome) => outcome_response("collaborative", outcome),
        Err(e) => internal_error(e),
    }
}
