use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::models::{Restaurant, Review};

/// The preprocessed restaurant and review tables.
///
/// Restaurant positions (0..N-1) are the row/column indices of every similarity matrix
/// built from this catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub restaurants: Vec<Restaurant>,
    pub reviews: Vec<Review>,
    #[serde(skip)]
    place_index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(restaurants: Vec<Restaurant>, reviews: Vec<Review>) -> Self {
        let mut catalog = Self {
            restaurants,
            reviews,
            place_index: HashMap::new(),
        };
        catalog.reindex();
        catalog
    }

    /// Rebuilds the place id lookup; needed after deserialization
    pub fn reindex(&mut self) {
        self.place_index = self
            .restaurants
            .iter()
            .enumerate()
            .map(|(idx, r)| (r.place_id.clone(), idx))
            .collect();
    }

    pub fn len(&self) -> usize {
        self.restaurants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.restaurants.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Restaurant> {
        self.restaurants.get(idx)
    }

    pub fn index_of(&self, place_id: &str) -> Option<usize> {
        self.place_index.get(place_id).copied()
    }

    pub fn by_place_id(&self, place_id: &str) -> Option<&Restaurant> {
        self.index_of(place_id).map(|idx| &self.restaurants[idx])
    }

    /// Exact case-insensitive name match first, then the first substring match
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        self.restaurants
            .iter()
            .position(|r| r.name.to_lowercase() == needle)
            .or_else(|| {
                self.restaurants
                    .iter()
                    .position(|r| r.name.to_lowercase().contains(&needle))
            })
    }

    /// Exact case-insensitive name match only
    pub fn find_exact(&self, name: &str) -> Option<usize> {
        let needle = name.trim().to_lowercase();
        self.restaurants
            .iter()
            .position(|r| r.name.to_lowercase() == needle)
    }

    pub fn reviews_for<'a>(&'a self, place_id: &'a str) -> impl Iterator<Item = &'a Review> + 'a {
        self.reviews.iter().filter(move |r| r.place_id == place_id)
    }

    pub fn reviews_by<'a>(&'a self, username: &'a str) -> impl Iterator<Item = &'a Review> + 'a {
        self.reviews.iter().filter(move |r| r.username == username)
    }
}
