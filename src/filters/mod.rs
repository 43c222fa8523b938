use serde::{Deserialize, Serialize};

use crate::domain::Restaurant;
use crate::geo::GeoPoint;

/// Budget preference: an exact price level, or text matched against the price range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Budget {
    Level(u8),
    Text(String),
}

/// Hard filters applied to candidate restaurants.
///
/// Text fields match case-insensitively as substrings. Several values for one
/// field are OR-ed; distinct fields are AND-ed. Unset fields accept everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestaurantFilter {
    pub min_rating: Option<f64>,
    pub price_level: Option<u8>,
    pub budget: Option<Budget>,
    pub cuisine: Vec<String>,
    pub max_distance_km: Option<f64>,
    pub atmosphere: Vec<String>,
    pub amenities: Vec<String>,
    pub restaurant_type: Vec<String>,
    pub dietary: Vec<String>,
    pub service: Vec<String>,
    pub county: Vec<String>,
    pub address: Vec<String>,
}

impl RestaurantFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Checks every active predicate in a fixed order, stopping at the first miss.
    ///
    /// `origin` anchors the distance limit; without one the limit is not applied.
    /// Restaurants lacking a rating fail a minimum rating, and restaurants lacking
    /// coordinates fail a distance limit.
    pub fn matches(&self, restaurant: &Restaurant, origin: Option<&GeoPoint>) -> bool {
        if let Some(min) = self.min_rating {
            match restaurant.rating {
                Some(rating) if rating >= min => {}
                _ => return false,
            }
        }

        if let Some(level) = self.price_level {
            if restaurant.price_level != level {
                return false;
            }
        }

        match &self.budget {
            Some(Budget::Level(level)) if restaurant.price_level != *level => return false,
            Some(Budget::Text(text)) if !contains_ci(&restaurant.price_range, text) => {
                return false;
            }
            _ => {}
        }

        if !any_match(&restaurant.cuisine_type, &self.cuisine) {
            return false;
        }

        if let (Some(max_km), Some(origin)) = (self.max_distance_km, origin) {
            match restaurant.distance_to(origin) {
                Some(distance) if distance <= max_km => {}
                _ => return false,
            }
        }

        any_match(&restaurant.atmosphere, &self.atmosphere)
            && any_match(&restaurant.amenities, &self.amenities)
            && any_match(&restaurant.restaurant_type, &self.restaurant_type)
            && any_match(&restaurant.dietary_options, &self.dietary)
            && any_match(&restaurant.service_options, &self.service)
            && any_match(&restaurant.county, &self.county)
            && any_match(&restaurant.address, &self.address)
    }

    pub fn apply<'a>(
        &self,
        restaurants: impl IntoIterator<Item = &'a Restaurant>,
        origin: Option<&GeoPoint>,
    ) -> Vec<&'a Restaurant> {
        restaurants
            .into_iter()
            .filter(|r| self.matches(r, origin))
            .collect()
    }
}

fn any_match(field: &str, wanted: &[String]) -> bool {
    let wanted: Vec<&String> = wanted.iter().filter(|w| !w.trim().is_empty()).collect();
    wanted.is_empty() || wanted.iter().any(|w| contains_ci(field, w))
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack
        .to_lowercase()
        .contains(needle.trim().to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::fixtures::restaurant;

    fn italian() -> Restaurant {
        let mut r = restaurant("p1", "Luigi's");
        r.cuisine_type = "Italian, Pizza".to_string();
        r.atmosphere = "Casual, Family friendly".to_string();
        r.dietary_options = "Vegetarian options".to_string();
        r.price_range = "€10-20".to_string();
        r.price_level = 1;
        r.rating = Some(4.4);
        r
    }

    #[test]
    fn test_empty_filter_accepts_everything() {
        let filter = RestaurantFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&italian(), None));
    }

    #[test]
    fn test_values_within_a_field_are_ored() {
        let filter = RestaurantFilter {
            cuisine: vec!["indian".into(), "PIZZA".into()],
            ..Default::default()
        };
        assert!(filter.matches(&italian(), None));
    }

    #[test]
    fn test_fields_are_anded() {
        let filter = RestaurantFilter {
            cuisine: vec!["italian".into()],
            atmosphere: vec!["fine dining".into()],
            ..Default::default()
        };
        assert!(!filter.matches(&italian(), None));
    }

    #[test]
    fn test_min_rating_rejects_unrated() {
        let filter = RestaurantFilter {
            min_rating: Some(4.0),
            ..Default::default()
        };
        let mut unrated = italian();
        unrated.rating = None;

        assert!(filter.matches(&italian(), None));
        assert!(!filter.matches(&unrated, None));
    }

    #[test]
    fn test_budget_by_level_or_text() {
        let by_level = RestaurantFilter {
            budget: Some(Budget::Level(2)),
            ..Default::default()
        };
        let by_text = RestaurantFilter {
            budget: Some(Budget::Text("€10".into())),
            ..Default::default()
        };

        assert!(!by_level.matches(&italian(), None));
        assert!(by_text.matches(&italian(), None));
    }

    #[test]
    fn test_budget_deserializes_from_number_or_text() {
        let level: Budget = serde_json::from_str("2").unwrap();
        let text: Budget = serde_json::from_str("\"€€\"").unwrap();

        assert_eq!(level, Budget::Level(2));
        assert_eq!(text, Budget::Text("€€".into()));
    }

    #[test]
    fn test_distance_limit_needs_origin_and_coordinates() {
        let filter = RestaurantFilter {
            max_distance_km: Some(1.0),
            ..Default::default()
        };
        let near = GeoPoint::new(51.8990, -8.4756);
        let far = GeoPoint::new(52.6638, -8.6267);
        let mut nowhere = italian();
        nowhere.latitude = None;

        assert!(filter.matches(&italian(), Some(&near)));
        assert!(!filter.matches(&italian(), Some(&far)));
        assert!(!filter.matches(&nowhere, Some(&near)));
        assert!(filter.matches(&italian(), None));
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let mut cafe = restaurant("p2", "Cafe");
        cafe.cuisine_type = "Cafe".to_string();
        let all = vec![italian(), cafe, restaurant("p3", "Other")];
        let filter = RestaurantFilter {
            cuisine: vec!["italian".into(), "cafe".into()],
            ..Default::default()
        };

        let once = filter.apply(&all, None);
        let twice = filter.apply(once.iter().copied(), None);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn test_address_substring() {
        let mut quay = italian();
        quay.address = "24 Sullivan's Quay, Cork".to_string();
        let filter = RestaurantFilter {
            address: vec!["sullivan".into()],
            ..Default::default()
        };
        let elsewhere = RestaurantFilter {
            address: vec!["Oliver Plunkett".into()],
            ..Default::default()
        };

        assert!(filter.matches(&quay, None));
        assert!(!elsewhere.matches(&quay, None));
    }
}
