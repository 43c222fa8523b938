use ndarray::Array2;

use super::user_item::UserItemMatrix;
use crate::similarity::cosine::cosine_similarity;

pub fn user_similarity(matrix: &UserItemMatrix) -> Array2<f64> {
    cosine_similarity(&matrix.ratings)
}

/// Predicted ratings for the items `user` has not rated.
///
/// The `neighbours` most similar other users vote with their actual ratings,
/// weighted by similarity. Items none of them rated get no prediction.
pub fn predict(
    matrix: &UserItemMatrix,
    similarity: &Array2<f64>,
    user: usize,
    neighbours: usize,
) -> Vec<(usize, f64)> {
    let mut similar: Vec<(usize, f64)> = similarity
        .row(user)
        .iter()
        .copied()
        .enumerate()
        .filter(|(other, _)| *other != user)
        .collect();
    similar.sort_by(|a, b| b.1.total_cmp(&a.1));
    similar.truncate(neighbours);
    similar.retain(|(_, sim)| *sim > 0.0);

    let own = matrix.ratings.row(user);
    let mut predictions = Vec::new();

    for (item, own_rating) in own.iter().enumerate() {
        if *own_rating > 0.0 {
            continue;
        }

        let (weighted, total) = similar
            .iter()
            .map(|&(other, sim)| (matrix.ratings[[other, item]], sim))
            .filter(|(rating, _)| *rating > 0.0)
            .fold((0.0, 0.0), |(w, t), (rating, sim)| (w + rating * sim, t + sim));

        if total > 0.0 {
            predictions.push((item, weighted / total));
        }
    }

    predictions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::fixtures::review;

    #[test]
    fn test_prediction_from_similar_user() {
        let matrix = UserItemMatrix::from_reviews(&[
            review("p1", "ann", 5.0),
            review("p1", "bob", 5.0),
            review("p2", "bob", 4.0),
        ]);
        let similarity = user_similarity(&matrix);
        let predictions = predict(&matrix, &similarity, 0, 10);

        assert_eq!(predictions.len(), 1);
        assert_eq!(predictions[0].0, 1);
        assert!((predictions[0].1 - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_overlap_means_no_prediction() {
        let matrix = UserItemMatrix::from_reviews(&[
            review("p1", "ann", 5.0),
            review("p2", "bob", 4.0),
        ]);
        let similarity = user_similarity(&matrix);

        assert!(predict(&matrix, &similarity, 0, 10).is_empty());
    }

    #[test]
    fn test_weighted_by_similarity() {
        let matrix = UserItemMatrix::from_reviews(&[
            review("p1", "ann", 5.0),
            review("p2", "ann", 1.0),
            review("p1", "bob", 5.0),
            review("p2", "bob", 1.0),
            review("p3", "bob", 5.0),
            review("p2", "cat", 5.0),
            review("p3", "cat", 1.0),
        ]);
        let similarity = user_similarity(&matrix);
        let predictions = predict(&matrix, &similarity, 0, 10);

        let (_, p3) = predictions[0];
        assert!(p3 > 3.0 && p3 < 5.0);
    }

    #[test]
    fn test_neighbour_limit() {
        let matrix = UserItemMatrix::from_reviews(&[
            review("p1", "ann", 5.0),
            review("p1", "bob", 5.0),
            review("p2", "bob", 2.0),
            review("p1", "cat", 5.0),
            review("p2", "cat", 5.0),
            review("p3", "cat", 5.0),
        ]);
        let similarity = user_similarity(&matrix);
        let predictions = predict(&matrix, &similarity, 0, 1);

        // bob (cos 0.93) outranks cat (cos 0.58) and is the only voter
        assert_eq!(predictions, vec![(1, 2.0)]);
    }
}
