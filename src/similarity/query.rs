use super::fusion::SimilarityModel;
use crate::domain::Catalog;
use crate::errors::EngineError;
use crate::filters::RestaurantFilter;

/// A candidate surviving `most_similar`
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityHit {
    pub index: usize,
    pub score: f64,
    /// Distance from the seed, when both have coordinates
    pub distance_km: Option<f64>,
}

impl SimilarityModel {
    /// Up to `k` restaurants most similar to `seed`, best first.
    ///
    /// Candidates are walked in descending similarity (ties keep catalog order) and
    /// filtered lazily: a filtered-out candidate is skipped for good, and the walk
    /// stops as soon as `k` have been collected. The result may be shorter than `k`.
    pub fn most_similar(
        &self,
        catalog: &Catalog,
        seed: usize,
        k: usize,
        filter: &RestaurantFilter,
    ) -> Result<Vec<SimilarityHit>, EngineError> {
        self.ensure_built_for(catalog)?;
        let seed_restaurant = catalog
            .get(seed)
            .ok_or(EngineError::ModelNotBuilt("seed restaurant row"))?;

        let origin = seed_restaurant.location();
        if k == 0 || (filter.max_distance_km.is_some() && origin.is_none()) {
            return Ok(Vec::new());
        }

        let row = self.fused.row(seed);
        let mut ranked: Vec<(usize, f64)> = row.iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut hits = Vec::with_capacity(k);
        for (index, score) in ranked {
            if index == seed {
                continue;
            }
            let candidate = &catalog.restaurants[index];
            if !filter.matches(candidate, origin.as_ref()) {
                continue;
            }

            hits.push(SimilarityHit {
                index,
                score,
                distance_km: origin.and_then(|o| candidate.distance_to(&o)),
            });
            if hits.len() >= k {
                break;
            }
        }

        Ok(hits)
    }

    /// Up to `k` restaurants geographically closest to `seed`, ranked by the stored
    /// location similarity alone. Restaurants without coordinates never qualify, and
    /// a seed without coordinates has no neighbours.
    pub fn nearest_by_location(
        &self,
        catalog: &Catalog,
        seed: usize,
        k: usize,
        filter: &RestaurantFilter,
    ) -> Result<Vec<SimilarityHit>, EngineError> {
        self.ensure_built_for(catalog)?;
        let Some(origin) = catalog.get(seed).and_then(|r| r.location()) else {
            return Ok(Vec::new());
        };

        let mut ranked: Vec<(usize, f64)> = self
            .location
            .row(seed)
            .iter()
            .copied()
            .enumerate()
            .filter(|(idx, _)| *idx != seed)
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        let hits = ranked
            .into_iter()
            .filter_map(|(index, score)| {
                let candidate = &catalog.restaurants[index];
                let distance_km = candidate.distance_to(&origin)?;
                filter.matches(candidate, Some(&origin)).then_some(SimilarityHit {
                    index,
                    score,
                    distance_km: Some(distance_km),
                })
            })
            .take(k)
            .collect();

        Ok(hits)
    }
}
