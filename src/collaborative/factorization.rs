use nalgebra::DMatrix;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::user_item::UserItemMatrix;

/// Truncated SVD of the rating matrix: `ratings ≈ U · diag(σ) · Vᵀ`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Factorization {
    pub user_factors: Array2<f64>,
    pub singular_values: Array1<f64>,
    pub item_factors: Array2<f64>,
}

impl Factorization {
    pub fn rank(&self) -> usize {
        self.singular_values.len()
    }

    pub fn predicted_rating(&self, user: usize, item: usize) -> f64 {
        (0..self.rank())
            .map(|f| {
                self.user_factors[[user, f]] * self.singular_values[f] * self.item_factors[[f, item]]
            })
            .sum()
    }

    /// Reconstructed ratings for the items `user` has not rated
    pub fn predict(&self, matrix: &UserItemMatrix, user: usize) -> Vec<(usize, f64)> {
        matrix
            .ratings
            .row(user)
            .iter()
            .enumerate()
            .filter(|(_, rating)| **rating <= 0.0)
            .map(|(item, _)| (item, self.predicted_rating(user, item)))
            .collect()
    }
}

/// Why a rating matrix was not factorised
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactorizationSkipped {
    #[error("Not enough data for {n_factors} factors ({users} × {items})")]
    TooSmall {
        n_factors: usize,
        users: usize,
        items: usize,
    },

    #[error("SVD of the {users} × {items} rating matrix produced no singular vectors")]
    SvdFailed { users: usize, items: usize },
}

/// Rank-k factorisation with `k = min(n_factors, min(users, items) - 1)`.
///
/// Fails unless both dimensions exceed `n_factors`; the caller falls back to
/// user-based filtering then.
pub fn factorize(
    matrix: &UserItemMatrix,
    n_factors: usize,
) -> Result<Factorization, FactorizationSkipped> {
    let (n_users, n_items) = matrix.shape();
    if n_factors == 0 || n_users <= n_factors || n_items <= n_factors {
        return Err(FactorizationSkipped::TooSmall {
            n_factors,
            users: n_users,
            items: n_items,
        });
    }
    let k = n_factors.min(n_users.min(n_items) - 1);

    let dense = DMatrix::from_row_slice(
        n_users,
        n_items,
        &matrix.ratings.iter().copied().collect::<Vec<_>>(),
    );
    let svd = dense.svd(true, true);
    let (Some(u), Some(v_t)) = (svd.u, svd.v_t) else {
        return Err(FactorizationSkipped::SvdFailed {
            users: n_users,
            items: n_items,
        });
    };

    let mut order: Vec<usize> = (0..svd.singular_values.len()).collect();
    order.sort_by(|a, b| svd.singular_values[*b].total_cmp(&svd.singular_values[*a]));
    order.truncate(k);

    let user_factors = Array2::from_shape_fn((n_users, k), |(row, f)| u[(row, order[f])]);
    let item_factors = Array2::from_shape_fn((k, n_items), |(f, col)| v_t[(order[f], col)]);
    let singular_values = Array1::from_iter(order.iter().map(|&f| svd.singular_values[f]));

    Ok(Factorization {
        user_factors,
        singular_values,
        item_factors,
    })
}
