use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::api::handlers::{AppState, admin, recommendations, restaurants, users};
use crate::geocoding::Geocoder;

pub fn create_router<G: Geocoder + 'static>(state: Arc<AppState<G>>) -> Router {
    Router::new()
        .route("/api/recommendations", post(recommendations::recommend::<G>))
        .route("/api/restaurants/near", get(restaurants::near::<G>))
        .route("/api/restaurants/top", get(restaurants::top::<G>))
        .route("/api/restaurants/:name", get(restaurants::details::<G>))
        .route("/api/restaurants/:name/nearby", get(restaurants::nearby::<G>))
        .route("/api/restaurants/:name/liked-by", get(restaurants::liked_by::<G>))
        .route("/api/cuisines", get(restaurants::cuisines::<G>))
        .route("/api/service-options", get(restaurants::service_options::<G>))
        .route("/api/users/:username", get(users::profile::<G>))
        .route("/api/users/:username/recommendations", get(users::recommendations::<G>))
        .route("/api/admin/reload", post(admin::reload::<G>))
        .with_state(state)
}
