use ndarray::Array2;

use super::user_item::UserItemMatrix;
use crate::similarity::cosine::cosine_similarity;

pub fn item_similarity(matrix: &UserItemMatrix) -> Array2<f64> {
    cosine_similarity(&matrix.ratings.t().to_owned())
}

/// Predicted ratings for the items `user` has not rated, from the user's own
/// ratings of the `neighbours` most similar items they did rate.
pub fn predict(
    matrix: &UserItemMatrix,
    similarity: &Array2<f64>,
    user: usize,
    neighbours: usize,
) -> Vec<(usize, f64)> {
    let own = matrix.ratings.row(user);
    let rated: Vec<usize> = (0..own.len()).filter(|&i| own[i] > 0.0).collect();
    let mut predictions = Vec::new();

    for item in (0..own.len()).filter(|&i| own[i] <= 0.0) {
        let mut similar: Vec<(usize, f64)> = rated
            .iter()
            .map(|&other| (other, similarity[[item, other]]))
            .filter(|(_, sim)| *sim > 0.0)
            .collect();
        similar.sort_by(|a, b| b.1.total_cmp(&a.1));
        similar.truncate(neighbours);

        let (weighted, total) = similar
            .iter()
            .fold((0.0, 0.0), |(w, t), &(other, sim)| (w + own[other] * sim, t + sim));

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
    fn test_items_rated_together_predict_each_other() {
        let matrix = UserItemMatrix::from_reviews(&[
            review("p1", "ann", 4.0),
            review("p1", "bob", 5.0),
            review("p2", "bob", 5.0),
        ]);
        let similarity = item_similarity(&matrix);
        let predictions = predict(&matrix, &similarity, 0, 10);

        assert_eq!(predictions.len(), 1);
        assert_eq!(predictions[0].0, 1);
        assert!((predictions[0].1 - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_unrelated_item_gets_no_prediction() {
        let matrix = UserItemMatrix::from_reviews(&[
            review("p1", "ann", 4.0),
            review("p2", "bob", 5.0),
        ]);
        let similarity = item_similarity(&matrix);

        assert!(predict(&matrix, &similarity, 0, 10).is_empty());
    }

    #[test]
    fn test_item_similarity_is_square_over_items() {
        let matrix = UserItemMatrix::from_reviews(&[
            review("p1", "ann", 4.0),
            review("p2", "ann", 3.0),
            review("p3", "bob", 5.0),
        ]);
        assert_eq!(item_similarity(&matrix).dim(), (3, 3));
    }
}
