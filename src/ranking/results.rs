use serde::Serialize;

use crate::domain::{Restaurant, Review, SentimentCounts};

/// Base attributes of a restaurant as returned by every query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantCard {
    pub place_id: String,
    pub name: String,
    pub cuisine_type: String,
    pub restaurant_type: String,
    pub rating: Option<f64>,
    pub review_count: u32,
    pub price_range: String,
    pub price_level: u8,
    pub atmosphere: String,
    pub amenities: String,
    pub dietary_options: String,
    pub service_options: String,
    pub address: String,
    pub county: String,
    pub phone: String,
    pub website: String,
    pub url: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<&Restaurant> for RestaurantCard {
    fn from(r: &Restaurant) -> Self {
        Self {
            place_id: r.place_id.clone(),
            name: r.name.clone(),
            cuisine_type: r.cuisine_type.clone(),
            restaurant_type: r.restaurant_type.clone(),
            rating: r.rating,
            review_count: r.review_count,
            price_range: r.price_range.clone(),
            price_level: r.price_level,
            atmosphere: r.atmosphere.clone(),
            amenities: r.amenities.clone(),
            dietary_options: r.dietary_options.clone(),
            service_options: r.service_options.clone(),
            address: r.address.clone(),
            county: r.county.clone(),
            phone: r.phone.clone(),
            website: r.website.clone(),
            url: r.url.clone(),
            latitude: r.latitude,
            longitude: r.longitude,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarRestaurant {
    #[serde(flatten)]
    pub restaurant: RestaurantCard,
    pub similarity_score: f64,
    pub distance_km: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    #[serde(flatten)]
    pub restaurant: RestaurantCard,
    /// Present when the search had an origin
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyRestaurant {
    #[serde(flatten)]
    pub restaurant: RestaurantCard,
    pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictedRestaurant {
    #[serde(flatten)]
    pub restaurant: RestaurantCard,
    pub predicted_rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HybridRecommendation {
    #[serde(flatten)]
    pub restaurant: RestaurantCard,
    pub content_score: f64,
    pub collaborative_score: f64,
    pub hybrid_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteStop {
    #[serde(flatten)]
    pub restaurant: RestaurantCard,
    pub detour_km: f64,
    pub distance_from_start_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantDetails {
    #[serde(flatten)]
    pub restaurant: RestaurantCard,
    pub avg_review_rating: Option<f64>,
    pub rating_std: f64,
    pub sentiment: SentimentCounts,
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CuisineCount {
    pub cuisine: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserReview {
    pub place_id: String,
    pub restaurant: String,
    pub cuisine: String,
    pub user_rating: Option<f64>,
    pub avg_rating: Option<f64>,
    pub price_range: String,
    pub review_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub username: String,
    pub total_reviews: usize,
    pub avg_rating_given: Option<f64>,
    pub favorite_cuisines: Vec<CuisineCount>,
    pub reviews: Vec<UserReview>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewerRating {
    pub username: String,
    pub rating: f64,
    pub review_date: Option<String>,
    pub review_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CuisineStats {
    pub cuisine: String,
    pub restaurants: usize,
    pub avg_rating: Option<f64>,
    pub total_reviews: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceOptionCount {
    pub service_option: String,
    pub restaurants: usize,
}
