use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use log::info;
use std::sync::Arc;

use super::{AppState, engine_error, internal_error, outcome_response};
use crate::api::models::Preferences;
use crate::geocoding::Geocoder;

/// Picks a strategy from whichever inputs the preferences carry:
/// restaurant and user together go hybrid, then restaurant, address and user
/// alone, and plain attribute search when none are given.
pub async fn recommend<G: Geocoder + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Json(prefs): Json<Preferences>,
) -> impl IntoResponse {
    let service = state.snapshot();
    let query = service.settings();
    let limit = prefs.limit.unwrap_or(query.default_limit).max(1);
    let filter = prefs.to_filter();

    let name = prefs.restaurant_name.as_deref().filter(|s| !s.trim().is_empty());
    let username = prefs.username.as_deref().filter(|s| !s.trim().is_empty());
    let address = prefs.address.as_deref().filter(|s| !s.trim().is_empty());

    match (name, username, address) {
        (Some(name), Some(username), _) => {
            info!("Hybrid recommendation for '{}' and user '{}'", name, username);
            let content_weight = prefs.content_weight.unwrap_or(query.content_weight);
            let collaborative_weight =
                prefs.collaborative_weight.unwrap_or(query.collaborative_weight);
            match service.hybrid(Some(name), Some(username), limit, content_weight, collaborative_weight) {
                Ok(outcome) => outcome_response("hybrid", outcome),
                Err(e) => internal_error(e),
            }
        }
        (Some(name), None, _) => match service.similar_to(name, limit, &filter) {
            Ok(outcome) => outcome_response("similar", outcome),
            Err(e) => internal_error(e),
        },
        (None, _, Some(address)) => {
            let radius_km = prefs.max_distance_km.unwrap_or(query.default_radius_km);
            match service
                .by_user_address(&state.geocoder, address, radius_km, limit, &filter)
                .await
            {
                Ok(outcome) => outcome_response("near_address", outcome),
                Err(e) => internal_error(e),
            }
        }
        (None, Some(username), None) => match service.user_recommendations(username, limit) {
            Ok(outcome) => outcome_response("collaborative", outcome),
            Err(e) => internal_error(e),
        },
        (None, None, None) => match service.search(&filter, None, limit) {
            Ok(outcome) => outcome_response("search", outcome),
            Err(e) => engine_error(e),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{call, post_json, state};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_restaurant_name_uses_content_similarity() {
        let (status, body) = call(
            state(),
            post_json("/api/recommendations", json!({"restaurant_name": "Quay Co-op"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["strategy"], "similar");
        assert_eq!(body["count"], 2);
        assert!(body["results"][0]["similarity_score"].is_number());
    }

    #[tokio::test]
    async fn test_unknown_restaurant_is_not_found() {
        let (status, body) = call(
            state(),
            post_json("/api/recommendations", json!({"restaurant_name": "Nowhere Diner"})),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["kind"], "not_found");
        assert_eq!(body["unresolved"]["kind"], "restaurant");
        assert_eq!(body["unresolved"]["query"], "Nowhere Diner");
    }

    #[tokio::test]
    async fn test_address_is_geocoded() {
        let (status, body) = call(
            state(),
            post_json(
                "/api/recommendations",
                json!({"address": "Grand Parade, Cork", "max_distance_km": 2.0}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["strategy"], "near_address");
        assert_eq!(body["count"], 2);
    }

    #[tokio::test]
    async fn test_unknown_address_is_not_found() {
        let (status, body) = call(
            state(),
            post_json("/api/recommendations", json!({"address": "Atlantis"})),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["unresolved"]["kind"], "address");
    }

    #[tokio::test]
    async fn test_filters_only_fall_back_to_search() {
        let (status, body) = call(
            state(),
            post_json("/api/recommendations", json!({"cuisine": "seafood"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["strategy"], "search");
        assert_eq!(body["results"][0]["name"], "Kinsale Fish");
    }

    #[tokio::test]
    async fn test_distance_limit_without_origin_is_rejected() {
        let (status, body) = call(
            state(),
            post_json(
                "/api/recommendations",
                json!({"cuisine": "seafood", "max_distance_km": 1.0}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "invalid_query");
    }

    #[tokio::test]
    async fn test_filters_matching_nothing_are_empty() {
        let (status, body) = call(
            state(),
            post_json("/api/recommendations", json!({"cuisine": ["Thai", "Korean"]})),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["kind"], "empty");
    }

    #[tokio::test]
    async fn test_name_and_user_go_hybrid() {
        let (status, body) = call(
            state(),
            post_json(
                "/api/recommendations",
                json!({"restaurant_name": "English Market Cafe", "username": "ann"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["strategy"], "hybrid");
        assert!(body["results"][0]["hybrid_score"].is_number());
    }
}
