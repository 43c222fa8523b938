use std::collections::HashMap;

use crate::domain::{Review, ReviewStats};

/// Per place id: mean/count/sample std of the rated reviews, the concatenated
/// review text and the sentiment tallies.
pub fn aggregate_reviews(reviews: &[Review]) -> HashMap<String, ReviewStats> {
    let mut ratings: HashMap<&str, Vec<f64>> = HashMap::new();
    let mut stats: HashMap<String, ReviewStats> = HashMap::new();

    for review in reviews {
        let entry = stats.entry(review.place_id.clone()).or_default();
        entry.sentiment.record(review.sentiment);

        let text = review.review_text.trim();
        if !text.is_empty() {
            if !entry.review_text.is_empty() {
                entry.review_text.push(' ');
            }
            entry.review_text.push_str(text);
        }

        if let Some(rating) = review.rating.filter(|r| r.is_finite()) {
            ratings.entry(review.place_id.as_str()).or_default().push(rating);
        }
    }

    for (place_id, values) in ratings {
        if let Some(entry) = stats.get_mut(place_id) {
            entry.count = values.len() as u32;
            entry.avg_review_rating = Some(mean(&values));
            entry.rating_std = sample_std(&values);
        }
    }

    stats
}

/// Left join: restaurants without rated reviews fall back to their own rating
pub fn stats_for(
    aggregated: &HashMap<String, ReviewStats>,
    place_id: &str,
    own_rating: Option<f64>,
) -> ReviewStats {
    let mut stats = aggregated.get(place_id).cloned().unwrap_or_default();
    if stats.avg_review_rating.is_none() {
        stats.avg_review_rating = own_rating;
    }
    stats
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let avg = mean(values);
    let variance =
        values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
