use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{AppState, internal_error, not_found, outcome_response};
use crate::api::models::{LikedParams, LimitParams, NearParams, TopParams};
use crate::filters::RestaurantFilter;
use crate::geo::GeoPoint;
use crate::geocoding::Geocoder;
use crate::ranking::QueryOutcome;

const DEFAULT_LIKED_THRESHOLD: f64 = 4.0;

pub async fn near<G: Geocoder + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Query(params): Query<NearParams>,
) -> impl IntoResponse {
    let service = state.snapshot();
    let radius_km = params.radius_km.unwrap_or(service.settings().default_radius_km);
    let limit = params.limit.unwrap_or(service.settings().default_limit);

    let outcome = service.near(
        GeoPoint::new(params.lat, params.lon),
        radius_km,
        limit,
        &params.to_filter(),
    );
    outcome_response("near", outcome)
}

pub async fn top<G: Geocoder + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Query(params): Query<TopParams>,
) -> impl IntoResponse {
    let service = state.snapshot();
    let limit = params.limit.unwrap_or(service.settings().default_limit);
    let min_reviews = params
        .min_reviews
        .unwrap_or(service.settings().min_reviews_for_top_rated);

    outcome_response("top_rated", service.top_rated(limit, min_reviews))
}

pub async fn details<G: Geocoder + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match state.snapshot().restaurant_details(&name) {
        Ok(details) => Json(details).into_response(),
        Err(what) => not_found(what),
    }
}

/// Restaurants closest to the named one, by location alone
pub async fn nearby<G: Geocoder + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(name): Path<String>,
    Query(params): Query<LimitParams>,
) -> impl IntoResponse {
    let service = state.snapshot();
    let limit = params.limit.unwrap_or(service.settings().default_limit);

    match service.closest_to(&name, limit, &RestaurantFilter::default()) {
        Ok(outcome) => outcome_response("closest", outcome),
        Err(e) => internal_error(e),
    }
}

pub async fn liked_by<G: Geocoder + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(name): Path<String>,
    Query(params): Query<LikedParams>,
) -> impl IntoResponse {
    let min_rating = params.min_rating.unwrap_or(DEFAULT_LIKED_THRESHOLD);
    outcome_response("liked_by", state.snapshot().users_who_liked(&name, min_rating))
}

pub async fn cuisines<G: Geocoder + 'static>(
    State(state): State<Arc<AppState<G>>>,
) -> impl IntoResponse {
    let stats = state.snapshot().cuisine_statistics();
    outcome_response("cuisine_statistics", QueryOutcome::from_results(stats))
}

pub async fn service_options<G: Geocoder + 'static>(
    State(state): State<Arc<AppState<G>>>,
) -> impl IntoResponse {
    let summary = state.snapshot().service_options_summary();
    outcome_response("service_options", QueryOutcome::from_results(summary))
}
