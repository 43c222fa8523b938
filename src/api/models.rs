use serde::{Deserialize, Serialize};

use crate::filters::{Budget, RestaurantFilter};
use crate::ranking::Unresolved;

/// A filter value given either as one string or as a list
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl Default for OneOrMany {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

/// Body of `POST /api/recommendations`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub address: Option<String>,
    pub restaurant_name: Option<String>,
    pub username: Option<String>,
    pub cuisine: OneOrMany,
    pub dietary: OneOrMany,
    pub service: OneOrMany,
    pub atmosphere: OneOrMany,
    pub amenities: OneOrMany,
    pub restaurant_type: OneOrMany,
    /// Substring of the street address, unlike `address` which is geocoded
    pub address_contains: OneOrMany,
    pub budget: Option<Budget>,
    pub price_level: Option<u8>,
    pub min_rating: Option<f64>,
    pub max_distance_km: Option<f64>,
    pub limit: Option<usize>,
    pub content_weight: Option<f64>,
    pub collaborative_weight: Option<f64>,
}

impl Preferences {
    pub fn to_filter(&self) -> RestaurantFilter {
        RestaurantFilter {
            min_rating: self.min_rating,
            price_level: self.price_level,
            budget: self.budget.clone(),
            cuisine: self.cuisine.clone().into_vec(),
            max_distance_km: self.max_distance_km,
            atmosphere: self.atmosphere.clone().into_vec(),
            amenities: self.amenities.clone().into_vec(),
            restaurant_type: self.restaurant_type.clone().into_vec(),
            dietary: self.dietary.clone().into_vec(),
            service: self.service.clone().into_vec(),
            county: Vec::new(),
            address: self.address_contains.clone().into_vec(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NearParams {
    pub lat: f64,
    pub lon: f64,
    pub radius_km: Option<f64>,
    pub limit: Option<usize>,
    pub cuisine: Option<String>,
    pub min_rating: Option<f64>,
}

impl NearParams {
    pub fn to_filter(&self) -> RestaurantFilter {
        RestaurantFilter {
            cuisine: self.cuisine.iter().cloned().collect(),
            min_rating: self.min_rating,
            ..Default::default()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TopParams {
    pub limit: Option<usize>,
    pub min_reviews: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct LikedParams {
    pub min_rating: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ResultsResponse<T> {
    pub strategy: &'static str,
    pub count: usize,
    pub results: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unresolved: Option<Unresolved>,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub restaurants: usize,
    pub built_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_accept_one_or_many() {
        let prefs: Preferences = serde_json::from_str(
            r#"{"cuisine": "Italian", "dietary": ["Vegan", "Gluten free"], "budget": 2}"#,
        )
        .unwrap();
        let filter = prefs.to_filter();

        assert_eq!(filter.cuisine, vec!["Italian"]);
        assert_eq!(filter.dietary, vec!["Vegan", "Gluten free"]);
        assert_eq!(filter.budget, Some(Budget::Level(2)));
        assert!(filter.atmosphere.is_empty());
    }

    #[test]
    fn test_empty_preferences() {
        let prefs: Preferences = serde_json::from_str("{}").unwrap();
        assert!(prefs.to_filter().is_empty());
        assert_eq!(prefs.limit, None);
    }
}
