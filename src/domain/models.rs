use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Review sentiment label, derived once during preprocessing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Good,
    Bad,
    Mixed,
}

impl Sentiment {
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "good" | "positive" => Some(Sentiment::Good),
            "bad" | "negative" => Some(Sentiment::Bad),
            "mixed" | "neutral" => Some(Sentiment::Mixed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Sentiment::Good => "Good",
            Sentiment::Bad => "Bad",
            Sentiment::Mixed => "Mixed",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub good: u32,
    pub bad: u32,
    pub mixed: u32,
}

impl SentimentCounts {
    pub fn record(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Good => self.good += 1,
            Sentiment::Bad => self.bad += 1,
            Sentiment::Mixed => self.mixed += 1,
        }
    }
}

/// Per-restaurant aggregate of its reviews
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewStats {
    /// Number of reviews carrying a rating
    pub count: u32,
    /// Mean review rating; falls back to the restaurant's own rating when it has no rated reviews
    pub avg_review_rating: Option<f64>,
    pub rating_std: f64,
    pub review_text: String,
    pub sentiment: SentimentCounts,
}

/// A preprocessed catalog entry. Categorical fields never hold raw nulls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub place_id: String,
    pub name: String,
    pub restaurant_type: String,
    pub cuisine_type: String,
    pub address: String,
    pub county: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub rating: Option<f64>,
    pub review_count: u32,
    pub price_range: String,
    pub price_level: u8,
    pub phone: String,
    pub website: String,
    pub url: String,
    pub atmosphere: String,
    pub dietary_options: String,
    pub service_options: String,
    pub amenities: String,
    pub combined_features: String,
    pub reviews: ReviewStats,
}

impl Restaurant {
    pub fn location(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => {
                Some(GeoPoint::new(lat, lon))
            }
            _ => None,
        }
    }

    pub fn distance_to(&self, point: &GeoPoint) -> Option<f64> {
        self.location().map(|here| here.distance_to(point))
    }

    pub fn rating_or_zero(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }
}

/// A preprocessed review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub place_id: String,
    pub username: String,
    pub rating: Option<f64>,
    pub review_text: String,
    pub review_date: Option<String>,
    pub sentiment: Sentiment,
}
