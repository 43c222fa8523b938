use anyhow::Result;
use log::{debug, info};
use std::collections::{BTreeMap, HashMap};

use super::outcome::{QueryOutcome, Unresolved};
use super::results::{
    CuisineCount, CuisineStats, HybridRecommendation, NearbyRestaurant, PredictedRestaurant,
    RestaurantCard, RestaurantDetails, ReviewerRating, RouteStop, SearchResult,
    ServiceOptionCount, SimilarRestaurant, UserProfile, UserReview,
};
use crate::config::{AppConfig, QuerySettings};
use crate::domain::{Catalog, Restaurant};
use crate::errors::EngineError;
use crate::filters::RestaurantFilter;
use crate::geo::GeoPoint;
use crate::geocoding::Geocoder;
use crate::model::TrainedModel;

const FAVORITE_CUISINES: usize = 3;
const SERVICE_OPTIONS: [&str; 3] = ["Dine-in", "Takeaway", "Delivery"];

/// Read-only query surface over one trained model snapshot
#[derive(Debug, Clone)]
pub struct RecommendationService {
    model: TrainedModel,
    settings: QuerySettings,
    min_predicted_rating: f64,
}

impl RecommendationService {
    pub fn new(model: TrainedModel, config: &AppConfig) -> Self {
        Self {
            model,
            settings: config.query.clone(),
            min_predicted_rating: config.collaborative.min_predicted_rating,
        }
    }

    pub fn model(&self) -> &TrainedModel {
        &self.model
    }

    pub fn catalog(&self) -> &Catalog {
        &self.model.catalog
    }

    pub fn settings(&self) -> &QuerySettings {
        &self.settings
    }

    /// Restaurants most similar to the one named `name`
    pub fn similar_to(
        &self,
        name: &str,
        k: usize,
        filter: &RestaurantFilter,
    ) -> Result<QueryOutcome<SimilarRestaurant>, EngineError> {
        let catalog = self.catalog();
        let Some(seed) = catalog.find_by_name(name) else {
            return Ok(QueryOutcome::NotFound(Unresolved::Restaurant(name.to_string())));
        };
        debug!("Seed for '{}' is {}", name, catalog.restaurants[seed].name);

        let hits = self.model.similarity.most_similar(catalog, seed, k, filter)?;
        let results = hits
            .into_iter()
            .map(|hit| SimilarRestaurant {
                restaurant: RestaurantCard::from(&catalog.restaurants[hit.index]),
                similarity_score: hit.score,
                distance_km: hit.distance_km,
            })
            .collect();

        Ok(QueryOutcome::from_results(results))
    }

    /// Restaurants within `radius_km` of `point`, nearest first
    pub fn near(
        &self,
        point: GeoPoint,
        radius_km: f64,
        k: usize,
        filter: &RestaurantFilter,
    ) -> QueryOutcome<NearbyRestaurant> {
        let mut results: Vec<NearbyRestaurant> = self
            .catalog()
            .restaurants
            .iter()
            .filter_map(|r| r.distance_to(&point).map(|d| (r, d)))
            .filter(|(r, d)| *d <= radius_km && filter.matches(r, Some(&point)))
            .map(|(r, distance_km)| NearbyRestaurant {
                restaurant: RestaurantCard::from(r),
                distance_km,
            })
            .collect();

        results.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        results.truncate(k);
        QueryOutcome::from_results(results)
    }

    /// Geocodes `address` and delegates to [`Self::near`]
    pub async fn by_user_address<G: Geocoder>(
        &self,
        geocoder: &G,
        address: &str,
        radius_km: f64,
        k: usize,
        filter: &RestaurantFilter,
    ) -> Result<QueryOutcome<NearbyRestaurant>> {
        let Some(location) = geocoder.geocode(address).await? else {
            return Ok(QueryOutcome::NotFound(Unresolved::Address(address.to_string())));
        };

        info!(
            "Resolved '{}' to {} ({:.5}, {:.5})",
            address, location.formatted_address, location.latitude, location.longitude
        );
        Ok(self.near(location.point(), radius_km, k, filter))
    }

    /// Collaborative recommendations for `username`
    pub fn user_recommendations(
        &self,
        username: &str,
        k: usize,
    ) -> Result<QueryOutcome<PredictedRestaurant>, EngineError> {
        let catalog = self.catalog();
        let Some(predictions) =
            self.model
                .collaborative
                .recommend_for_user(username, k, self.min_predicted_rating)?
        else {
            return Ok(QueryOutcome::NotFound(Unresolved::User(username.to_string())));
        };

        let results = predictions
            .into_iter()
            .filter_map(|p| {
                catalog.by_place_id(&p.place_id).map(|r| PredictedRestaurant {
                    restaurant: RestaurantCard::from(r),
                    predicted_rating: p.predicted_rating,
                })
            })
            .collect();

        Ok(QueryOutcome::from_results(results))
    }

    /// Content and collaborative candidates merged by place id.
    ///
    /// Each side fetches `k * hybrid_candidate_multiplier` candidates. A source
    /// whose input does not resolve contributes nothing; the query is `NotFound`
    /// only when every requested source failed to resolve.
    pub fn hybrid(
        &self,
        name: Option<&str>,
        username: Option<&str>,
        k: usize,
        content_weight: f64,
        collaborative_weight: f64,
    ) -> Result<QueryOutcome<HybridRecommendation>, EngineError> {
        let candidates = k.saturating_mul(self.settings.hybrid_candidate_multiplier.max(1));
        let mut merged: Vec<HybridRecommendation> = Vec::new();
        let mut position: HashMap<String, usize> = HashMap::new();
        let mut unresolved = Vec::new();

        if let Some(name) = name {
            match self.similar_to(name, candidates, &RestaurantFilter::default())? {
                QueryOutcome::NotFound(what) => unresolved.push(what),
                outcome => {
                    for hit in outcome.into_results() {
                        position.insert(hit.restaurant.place_id.clone(), merged.len());
                        merged.push(HybridRecommendation {
                            restaurant: hit.restaurant,
                            content_score: hit.similarity_score * content_weight,
                            collaborative_score: 0.0,
                            hybrid_score: 0.0,
                        });
                    }
                }
            }
        }

        if let Some(username) = username {
            match self.user_recommendations(username, candidates)? {
                QueryOutcome::NotFound(what) => unresolved.push(what),
                outcome => {
                    for hit in outcome.into_results() {
                        let score = hit.predicted_rating / 5.0 * collaborative_weight;
                        match position.get(&hit.restaurant.place_id) {
                            Some(&idx) => merged[idx].collaborative_score = score,
                            None => {
                                position.insert(hit.restaurant.place_id.clone(), merged.len());
                                merged.push(HybridRecommendation {
                                    restaurant: hit.restaurant,
                                    content_score: 0.0,
                                    collaborative_score: score,
                                    hybrid_score: 0.0,
                                });
                            }
                        }
                    }
                }
            }
        }

        let requested = usize::from(name.is_some()) + usize::from(username.is_some());
        if requested > 0 && unresolved.len() == requested {
            return Ok(QueryOutcome::NotFound(unresolved.remove(0)));
        }

        for rec in &mut merged {
            rec.hybrid_score = rec.content_score + rec.collaborative_score;
        }
        merged.sort_by(|a, b| b.hybrid_score.total_cmp(&a.hybrid_score));
        merged.truncate(k);

        Ok(QueryOutcome::from_results(merged))
    }

    /// Highest rated restaurants with at least `min_reviews` reviews
    pub fn top_rated(&self, n: usize, min_reviews: u32) -> QueryOutcome<RestaurantCard> {
        let mut rated: Vec<&Restaurant> = self
            .catalog()
            .restaurants
            .iter()
            .filter(|r| r.rating.is_some() && r.review_count >= min_reviews)
            .collect();

        rated.sort_by(|a, b| b.rating_or_zero().total_cmp(&a.rating_or_zero()));
        QueryOutcome::from_results(rated.into_iter().take(n).map(RestaurantCard::from).collect())
    }

    /// Restaurants whose detour off the straight line from `start` to `end` is at
    /// most `max_detour_km`, smallest detour first
    pub fn between_points(
        &self,
        start: GeoPoint,
        end: GeoPoint,
        max_detour_km: f64,
        filter: &RestaurantFilter,
    ) -> QueryOutcome<RouteStop> {
        let direct = start.distance_to(&end);

        let mut stops: Vec<RouteStop> = self
            .catalog()
            .restaurants
            .iter()
            .filter_map(|r| {
                let here = r.location()?;
                let from_start = start.distance_to(&here);
                let detour = from_start + here.distance_to(&end) - direct;
                (detour <= max_detour_km && filter.matches(r, Some(&start))).then(|| RouteStop {
                    restaurant: RestaurantCard::from(r),
                    detour_km: detour.max(0.0),
                    distance_from_start_km: from_start,
                })
            })
            .collect();

        stops.sort_by(|a, b| {
            a.detour_km
                .total_cmp(&b.detour_km)
                .then_with(|| a.distance_from_start_km.total_cmp(&b.distance_from_start_km))
        });
        QueryOutcome::from_results(stops)
    }

    /// Catalog entries passing `filter`.
    ///
    /// With an `origin` the distance limit is measured from it and results come
    /// nearest first; otherwise best rated first. A distance limit without an
    /// origin is rejected rather than ignored.
    pub fn search(
        &self,
        filter: &RestaurantFilter,
        origin: Option<GeoPoint>,
        n: usize,
    ) -> Result<QueryOutcome<SearchResult>, EngineError> {
        if filter.max_distance_km.is_some() && origin.is_none() {
            return Err(EngineError::InvalidQuery(
                "a maximum distance needs an origin to measure from".to_string(),
            ));
        }

        let mut matches: Vec<SearchResult> = filter
            .apply(&self.catalog().restaurants, origin.as_ref())
            .into_iter()
            .map(|r| SearchResult {
                restaurant: RestaurantCard::from(r),
                distance_km: origin.and_then(|o| r.distance_to(&o)),
            })
            .collect();

        if origin.is_some() {
            matches.sort_by(|a, b| {
                a.distance_km
                    .unwrap_or(f64::INFINITY)
                    .total_cmp(&b.distance_km.unwrap_or(f64::INFINITY))
            });
        } else {
            matches.sort_by(|a, b| {
                b.restaurant
                    .rating
                    .unwrap_or(f64::NEG_INFINITY)
                    .total_cmp(&a.restaurant.rating.unwrap_or(f64::NEG_INFINITY))
            });
        }
        matches.truncate(n);

        Ok(QueryOutcome::from_results(matches))
    }

    /// Restaurants geographically closest to the one named `name`
    pub fn closest_to(
        &self,
        name: &str,
        k: usize,
        filter: &RestaurantFilter,
    ) -> Result<QueryOutcome<SimilarRestaurant>, EngineError> {
        let catalog = self.catalog();
        let Some(seed) = catalog.find_by_name(name) else {
            return Ok(QueryOutcome::NotFound(Unresolved::Restaurant(name.to_string())));
        };

        let hits = self
            .model
            .similarity
            .nearest_by_location(catalog, seed, k, filter)?;
        let results = hits
            .into_iter()
            .map(|hit| SimilarRestaurant {
                restaurant: RestaurantCard::from(&catalog.restaurants[hit.index]),
                similarity_score: hit.score,
                distance_km: hit.distance_km,
            })
            .collect();

        Ok(QueryOutcome::from_results(results))
    }

    /// A restaurant (exact name match) with its aggregates and reviews
    pub fn restaurant_details(&self, name: &str) -> Result<RestaurantDetails, Unresolved> {
        let catalog = self.catalog();
        let restaurant = catalog
            .find_exact(name)
            .map(|idx| &catalog.restaurants[idx])
            .ok_or_else(|| Unresolved::Restaurant(name.to_string()))?;

        Ok(RestaurantDetails {
            restaurant: RestaurantCard::from(restaurant),
            avg_review_rating: restaurant.reviews.avg_review_rating,
            rating_std: restaurant.reviews.rating_std,
            sentiment: restaurant.reviews.sentiment.clone(),
            reviews: catalog.reviews_for(&restaurant.place_id).cloned().collect(),
        })
    }

    /// What a reviewer has rated, their average and favourite cuisines
    pub fn user_profile(&self, username: &str) -> Result<UserProfile, Unresolved> {
        let catalog = self.catalog();
        let mut reviews: Vec<UserReview> = catalog
            .reviews_by(username)
            .filter_map(|review| {
                catalog.by_place_id(&review.place_id).map(|r| UserReview {
                    place_id: r.place_id.clone(),
                    restaurant: r.name.clone(),
                    cuisine: r.cuisine_type.clone(),
                    user_rating: review.rating,
                    avg_rating: r.rating,
                    price_range: r.price_range.clone(),
                    review_date: review.review_date.clone(),
                })
            })
            .collect();

        if reviews.is_empty() {
            return Err(Unresolved::User(username.to_string()));
        }

        let given: Vec<f64> = reviews.iter().filter_map(|r| r.user_rating).collect();
        let avg_rating_given =
            (!given.is_empty()).then(|| given.iter().sum::<f64>() / given.len() as f64);

        let mut cuisine_counts: BTreeMap<&str, usize> = BTreeMap::new();
        for review in &reviews {
            *cuisine_counts.entry(review.cuisine.as_str()).or_default() += 1;
        }
        let mut favorite_cuisines: Vec<CuisineCount> = cuisine_counts
            .into_iter()
            .map(|(cuisine, count)| CuisineCount {
                cuisine: cuisine.to_string(),
                count,
            })
            .collect();
        favorite_cuisines.sort_by(|a, b| b.count.cmp(&a.count));
        favorite_cuisines.truncate(FAVORITE_CUISINES);

        reviews.sort_by(|a, b| {
            b.user_rating
                .unwrap_or(f64::NEG_INFINITY)
                .total_cmp(&a.user_rating.unwrap_or(f64::NEG_INFINITY))
        });

        Ok(UserProfile {
            username: username.to_string(),
            total_reviews: reviews.len(),
            avg_rating_given,
            favorite_cuisines,
            reviews,
        })
    }

    /// Reviewers who rated the restaurant (exact name match) at least `min_rating`
    pub fn users_who_liked(&self, name: &str, min_rating: f64) -> QueryOutcome<ReviewerRating> {
        let catalog = self.catalog();
        let Some(idx) = catalog.find_exact(name) else {
            return QueryOutcome::NotFound(Unresolved::Restaurant(name.to_string()));
        };

        let mut reviewers: Vec<ReviewerRating> = catalog
            .reviews_for(&catalog.restaurants[idx].place_id)
            .filter_map(|review| {
                let rating = review.rating.filter(|r| *r >= min_rating)?;
                Some(ReviewerRating {
                    username: review.username.clone(),
                    rating,
                    review_date: review.review_date.clone(),
                    review_text: review.review_text.clone(),
                })
            })
            .collect();

        reviewers.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        QueryOutcome::from_results(reviewers)
    }

    /// Restaurant count, mean rating and total reviews per cuisine, largest first
    pub fn cuisine_statistics(&self) -> Vec<CuisineStats> {
        let mut groups: BTreeMap<&str, (usize, Vec<f64>, u64)> = BTreeMap::new();
        for r in &self.catalog().restaurants {
            let entry = groups.entry(r.cuisine_type.as_str()).or_default();
            entry.0 += 1;
            entry.1.extend(r.rating);
            entry.2 += u64::from(r.review_count);
        }

        let mut stats: Vec<CuisineStats> = groups
            .into_iter()
            .map(|(cuisine, (restaurants, ratings, total_reviews))| CuisineStats {
                cuisine: cuisine.to_string(),
                restaurants,
                avg_rating: (!ratings.is_empty())
                    .then(|| ratings.iter().sum::<f64>() / ratings.len() as f64),
                total_reviews,
            })
            .collect();

        stats.sort_by(|a, b| b.restaurants.cmp(&a.restaurants));
        stats
    }

    /// How many restaurants offer each of the common service options
    pub fn service_options_summary(&self) -> Vec<ServiceOptionCount> {
        SERVICE_OPTIONS
            .iter()
            .map(|option| {
                let needle = option.to_lowercase();
                ServiceOptionCount {
                    service_option: option.to_string(),
                    restaurants: self
                        .catalog()
                        .restaurants
                        .iter()
                        .filter(|r| r.service_options.to_lowercase().contains(&needle))
                        .count(),
                }
            })
            .collect()
    }
}
