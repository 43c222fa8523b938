pub mod aggregation;
pub mod cleaning;
pub mod sentiment;

use log::{info, warn};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::domain::raw::{REQUIRED_RESTAURANT_COLUMNS, REQUIRED_REVIEW_COLUMNS};
use crate::domain::{
    Catalog, RawDataset, RawRestaurant, RawReview, Restaurant, Review, ReviewStats, Sentiment,
};
use crate::errors::EngineError;
use cleaning::CategoricalFields;

/// Turns the raw tables into a model-ready catalog.
///
/// Missing required columns abort the build, except for a review table with no
/// rows. Rows without a usable place id or name are dropped, as are reviews of
/// unknown restaurants.
pub fn preprocess(raw: RawDataset) -> Result<Catalog, EngineError> {
    info!("=== Preprocessing dataset ===");

    check_columns("restaurants", &raw.restaurant_columns, &REQUIRED_RESTAURANT_COLUMNS)?;
    if raw.reviews.is_empty() {
        warn!("Review table is empty, building without reviews");
    } else {
        check_columns("reviews", &raw.review_columns, &REQUIRED_REVIEW_COLUMNS)?;
    }

    let reviews = clean_reviews(raw.reviews);
    let aggregated = aggregation::aggregate_reviews(&reviews);

    let mut seen = HashSet::new();
    let mut restaurants = Vec::with_capacity(raw.restaurants.len());
    let mut dropped = 0usize;

    for row in raw.restaurants {
        let Some(restaurant) = clean_restaurant(row, &aggregated) else {
            dropped += 1;
            continue;
        };

        if !seen.insert(restaurant.place_id.clone()) {
            warn!("Duplicate place id {}, keeping first occurrence", restaurant.place_id);
            continue;
        }

        if restaurant.location().is_none() {
            warn!("Restaurant {} has no coordinates", restaurant.name);
        }
        restaurants.push(restaurant);
    }

    if dropped > 0 {
        warn!("Dropped {} restaurant rows without place id or name", dropped);
    }

    let total_reviews = reviews.len();
    let reviews: Vec<Review> = reviews
        .into_iter()
        .filter(|r| seen.contains(&r.place_id))
        .collect();
    if reviews.len() < total_reviews {
        warn!(
            "Dropped {} reviews of unknown restaurants",
            total_reviews - reviews.len()
        );
    }

    log_summary(&restaurants);

    Ok(Catalog::new(restaurants, reviews))
}

fn check_columns(
    table: &'static str,
    present: &[String],
    required: &[&str],
) -> Result<(), EngineError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|col| !present.iter().any(|p| p == *col))
        .map(|col| col.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(EngineError::schema(table, missing))
    }
}

fn clean_restaurant(
    row: RawRestaurant,
    aggregated: &HashMap<String, ReviewStats>,
) -> Option<Restaurant> {
    let place_id = row.place_id.clone().filter(|id| !id.trim().is_empty())?;
    let name = row.name.clone().filter(|n| !n.trim().is_empty())?;

    let fields = CategoricalFields::from_raw(&row);
    let rating = cleaning::clamp_rating(row.rating);
    let reviews = aggregation::stats_for(aggregated, &place_id, rating);
    // Restaurants with reviews in the dataset report the aggregated count
    let review_count = if aggregated.contains_key(&place_id) {
        reviews.count
    } else {
        row.review_count
            .filter(|c| *c >= 0.0)
            .map(|c| c.round() as u32)
            .unwrap_or(0)
    };

    Some(Restaurant {
        price_level: cleaning::price_level(&fields.price_range),
        combined_features: fields.combined_features(),
        place_id,
        name,
        restaurant_type: fields.restaurant_type,
        cuisine_type: fields.cuisine_type,
        address: row.address.unwrap_or_default(),
        county: fields.county,
        latitude: row.latitude,
        longitude: row.longitude,
        rating,
        review_count,
        price_range: fields.price_range,
        phone: fields.phone,
        website: fields.website,
        url: fields.url,
        atmosphere: fields.atmosphere,
        dietary_options: fields.dietary_options,
        service_options: fields.service_options,
        amenities: fields.amenities,
        reviews,
    })
}

fn clean_reviews(rows: Vec<RawReview>) -> Vec<Review> {
    let total = rows.len();
    let reviews: Vec<Review> = rows.into_iter().filter_map(clean_review).collect();

    if reviews.len() < total {
        warn!("Dropped {} reviews without place id", total - reviews.len());
    }
    reviews
}

fn clean_review(row: RawReview) -> Option<Review> {
    let place_id = row.place_id?;
    let rating = cleaning::clamp_rating(row.rating);
    let review_text = row.review_text.unwrap_or_default();
    let sentiment = row
        .sentiment
        .as_deref()
        .and_then(Sentiment::parse)
        .unwrap_or_else(|| sentiment::classify(&review_text, rating));

    Some(Review {
        place_id,
        username: row.username.unwrap_or_default(),
        rating,
        review_text,
        review_date: row.review_date,
        sentiment,
    })
}

fn log_summary(restaurants: &[Restaurant]) {
    let mut levels: BTreeMap<u8, usize> = BTreeMap::new();
    for r in restaurants {
        *levels.entry(r.price_level).or_default() += 1;
    }
    let with_reviews = restaurants
        .iter()
        .filter(|r| !r.reviews.review_text.is_empty())
        .count();

    info!("  → {} restaurants", restaurants.len());
    info!("  → Price level distribution: {:?}", levels);
    info!("  → {} restaurants with review text", with_reviews);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn raw_restaurant(place_id: &str, name: &str) -> RawRestaurant {
        RawRestaurant {
            place_id: Some(place_id.into()),
            name: Some(name.into()),
            latitude: Some(51.9),
            longitude: Some(-8.47),
            rating: Some(4.0),
            address: Some("Cork".into()),
            ..Default::default()
        }
    }

    fn raw_review(place_id: &str, username: &str, rating: f64, text: &str) -> RawReview {
        RawReview {
            place_id: Some(place_id.into()),
            username: Some(username.into()),
            rating: Some(rating),
            review_text: Some(text.into()),
            ..Default::default()
        }
    }

    fn dataset(restaurants: Vec<RawRestaurant>, reviews: Vec<RawReview>) -> RawDataset {
        RawDataset {
            restaurants,
            restaurant_columns: columns(&REQUIRED_RESTAURANT_COLUMNS),
            reviews,
            review_columns: columns(&REQUIRED_REVIEW_COLUMNS),
        }
    }

    #[test]
    fn test_missing_restaurant_columns_is_schema_error() {
        let mut raw = dataset(vec![raw_restaurant("p1", "A")], Vec::new());
        raw.restaurant_columns = columns(&["place_id", "name", "rating", "address"]);

        match preprocess(raw) {
            Err(EngineError::Schema { table, missing }) => {
                assert_eq!(table, "restaurants");
                assert_eq!(missing, vec!["latitude".to_string(), "longitude".to_string()]);
            }
            other => panic!("expected schema error, got {:?}", other.map(|c| c.len())),
        }
    }

    #[test]
    fn test_missing_review_columns_is_schema_error() {
        let mut raw = dataset(
            vec![raw_restaurant("p1", "A")],
            vec![raw_review("p1", "aoife", 4.0, "Nice")],
        );
        raw.review_columns = columns(&["place_id", "rating"]);

        let err = preprocess(raw).unwrap_err();
        assert!(matches!(err, EngineError::Schema { table: "reviews", .. }));
    }

    #[test]
    fn test_sentinels_never_left_empty() {
        let catalog = preprocess(dataset(vec![raw_restaurant("p1", "A")], Vec::new())).unwrap();
        let r = &catalog.restaurants[0];

        for field in [
            &r.cuisine_type,
            &r.atmosphere,
            &r.dietary_options,
            &r.service_options,
            &r.amenities,
            &r.restaurant_type,
            &r.price_range,
        ] {
            assert!(!field.is_empty());
        }
        assert_eq!(r.price_level, 2);
        assert_eq!(r.combined_features, "General Restaurant General None None None");
    }

    #[test]
    fn test_reviews_are_aggregated_and_classified() {
        let raw = dataset(
            vec![raw_restaurant("p1", "A"), raw_restaurant("p2", "B")],
            vec![
                raw_review("p1", "aoife", 5.0, "Delicious food, friendly staff"),
                raw_review("p1", "sean", 3.0, "ok"),
                raw_review("missing", "sean", 1.0, "Terrible"),
            ],
        );
        let catalog = preprocess(raw).unwrap();

        assert_eq!(catalog.reviews.len(), 2);
        assert_eq!(catalog.reviews[0].sentiment, Sentiment::Good);
        assert_eq!(catalog.reviews[1].sentiment, Sentiment::Mixed);

        let p1 = &catalog.restaurants[0];
        assert_eq!(p1.reviews.count, 2);
        assert_eq!(p1.reviews.avg_review_rating, Some(4.0));
        assert_eq!(p1.review_count, 2);
        assert_eq!(p1.reviews.review_text, "Delicious food, friendly staff ok");

        let p2 = &catalog.restaurants[1];
        assert_eq!(p2.reviews.avg_review_rating, Some(4.0));
        assert!(p2.reviews.review_text.is_empty());
    }

    #[test]
    fn test_existing_sentiment_label_is_kept() {
        let mut review = raw_review("p1", "aoife", 5.0, "Delicious food, friendly staff");
        review.sentiment = Some("bad".into());
        let catalog =
            preprocess(dataset(vec![raw_restaurant("p1", "A")], vec![review])).unwrap();

        assert_eq!(catalog.reviews[0].sentiment, Sentiment::Bad);
    }

    #[test]
    fn test_rows_without_id_or_name_and_duplicates_are_dropped() {
        let mut nameless = raw_restaurant("p2", "x");
        nameless.name = None;
        let raw = dataset(
            vec![
                raw_restaurant("p1", "First"),
                nameless,
                raw_restaurant("p1", "Second"),
            ],
            Vec::new(),
        );
        let catalog = preprocess(raw).unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.restaurants[0].name, "First");
    }

    #[test]
    fn test_rating_clamped_and_aggregated_review_count_preferred() {
        let mut reviewed = raw_restaurant("p1", "A");
        reviewed.rating = Some(9.0);
        reviewed.review_count = Some(120.0);
        let mut unreviewed = raw_restaurant("p2", "B");
        unreviewed.review_count = Some(45.0);

        let catalog = preprocess(dataset(
            vec![reviewed, unreviewed],
            vec![raw_review("p1", "aoife", 5.0, "Great")],
        ))
        .unwrap();

        assert_eq!(catalog.restaurants[0].rating, Some(5.0));
        assert_eq!(catalog.restaurants[0].review_count, 1);
        assert_eq!(catalog.restaurants[1].review_count, 45);
    }

    #[test]
    fn test_empty_review_table_needs_no_columns() {
        let mut raw = dataset(vec![raw_restaurant("p1", "A")], Vec::new());
        raw.review_columns = Vec::new();

        let catalog = preprocess(raw).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.reviews.is_empty());
    }
}
