use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::Review;

/// Users × restaurants rating matrix. 0 means "unrated", never "rated zero".
///
/// Users and place ids are kept sorted so lookups are binary searches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserItemMatrix {
    pub users: Vec<String>,
    pub items: Vec<String>,
    pub ratings: Array2<f64>,
}

impl UserItemMatrix {
    /// Pivots reviews by username and place id; repeated ratings of the same
    /// restaurant by the same user are averaged. Anonymous or unrated reviews are skipped.
    pub fn from_reviews(reviews: &[Review]) -> Self {
        let mut cells: BTreeMap<(&str, &str), (f64, u32)> = BTreeMap::new();
        let mut users = BTreeSet::new();
        let mut items = BTreeSet::new();

        for review in reviews {
            let username = review.username.trim();
            let Some(rating) = review.rating.filter(|r| *r > 0.0) else {
                continue;
            };
            if username.is_empty() {
                continue;
            }

            users.insert(username);
            items.insert(review.place_id.as_str());
            let cell = cells.entry((username, review.place_id.as_str())).or_default();
            cell.0 += rating;
            cell.1 += 1;
        }

        let users: Vec<String> = users.into_iter().map(str::to_string).collect();
        let items: Vec<String> = items.into_iter().map(str::to_string).collect();
        let mut ratings = Array2::<f64>::zeros((users.len(), items.len()));

        for ((user, item), (sum, count)) in cells {
            if let (Ok(u), Ok(i)) = (
                users.binary_search_by(|known| known.as_str().cmp(user)),
                items.binary_search_by(|known| known.as_str().cmp(item)),
            ) {
                ratings[[u, i]] = sum / f64::from(count);
            }
        }

        Self {
            users,
            items,
            ratings,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.ratings.dim()
    }

    pub fn user_index(&self, username: &str) -> Option<usize> {
        self.users
            .binary_search_by(|known| known.as_str().cmp(username.trim()))
            .ok()
    }

    pub fn rating_count(&self) -> usize {
        self.ratings.iter().filter(|r| **r > 0.0).count()
    }

    /// Share of empty cells, in percent
    pub fn sparsity(&self) -> f64 {
        let cells = self.ratings.len();
        if cells == 0 {
            return 100.0;
        }
        (cells - self.rating_count()) as f64 / cells as f64 * 100.0
    }
}
