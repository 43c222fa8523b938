use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Columns a restaurant table must carry for a model build
pub const REQUIRED_RESTAURANT_COLUMNS: [&str; 6] =
    ["place_id", "name", "latitude", "longitude", "rating", "address"];

/// Columns a review table must carry for a model build
pub const REQUIRED_REVIEW_COLUMNS: [&str; 4] = ["place_id", "username", "rating", "review_text"];

/// Restaurant record as produced by the scraping/ingestion collaborator.
/// Scraped data is loosely typed, so numeric fields accept numbers or numeric strings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawRestaurant {
    #[serde(default, deserialize_with = "lenient_string")]
    pub place_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub restaurant_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cuisine_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub county: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub review_count: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub price_range: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub atmosphere: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub dietary_options: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub service_options: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub amenities: Option<String>,
}

/// Review record as produced by the scraping/ingestion collaborator
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawReview {
    #[serde(default, deserialize_with = "lenient_string")]
    pub place_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub review_text: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub review_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sentiment: Option<String>,
}

/// Raw tables plus the column names each one actually carried
#[derive(Debug, Clone, Default)]
pub struct RawDataset {
    pub restaurants: Vec<RawRestaurant>,
    pub restaurant_columns: Vec<String>,
    pub reviews: Vec<RawReview>,
    pub review_columns: Vec<String>,
}

pub fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_f64))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_strings_are_accepted() {
        let raw: RawRestaurant = serde_json::from_str(
            r#"{"place_id": 42, "name": "Cafe", "rating": "4.5", "latitude": 51.9, "longitude": "-8.47"}"#,
        )
        .unwrap();

        assert_eq!(raw.place_id.as_deref(), Some("42"));
        assert_eq!(raw.rating, Some(4.5));
        assert_eq!(raw.longitude, Some(-8.47));
        assert_eq!(raw.cuisine_type, None);
    }

    #[test]
    fn test_blank_and_null_values_are_absent() {
        let raw: RawReview = serde_json::from_str(
            r#"{"place_id": "p1", "username": "  ", "rating": null, "review_text": ""}"#,
        )
        .unwrap();

        assert_eq!(raw.username, None);
        assert_eq!(raw.rating, None);
        assert_eq!(raw.review_text, None);
    }

    #[test]
    fn test_unparsable_number_is_absent() {
        let raw: RawRestaurant = serde_json::from_str(r#"{"rating": "n/a"}"#).unwrap();
        assert_eq!(raw.rating, None);
    }
}
