pub mod api;
pub mod cli;
pub mod collaborative;
pub mod config;
pub mod dataset;
pub mod domain;
pub mod errors;
pub mod filters;
pub mod geo;
pub mod geocoding;
pub mod http;
pub mod model;
pub mod persistence;
pub mod preprocessing;
pub mod ranking;
pub mod rate_limiter;
pub mod services;
pub mod similarity;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;
use serde::Serialize;
use std::path::Path;

use crate::collaborative::CollaborativeMethod;
use crate::config::settings::{AppConfig, model_path};
use crate::dataset::DatasetSource;
use crate::filters::RestaurantFilter;
use crate::geo::GeoPoint;
use crate::geocoding::NominatimGeocoder;
use crate::persistence::ModelStore;
use crate::ranking::{QueryOutcome, RecommendationService};
use crate::services::build::BuildService;
use crate::services::server::ServerService;

pub fn interpret() -> Cli {
    Cli::parse()
}

pub fn handle_init_db(
    database: &Path,
    restaurants: Option<&Path>,
    reviews: Option<&Path>,
) -> Result<()> {
    match (restaurants, reviews) {
        (Some(restaurants), Some(reviews)) => dataset::import_json(database, restaurants, reviews),
        _ => dataset::init_database(database),
    }
}

pub fn handle_build(
    model: Option<&str>,
    restaurants: &Path,
    reviews: Option<&Path>,
    output: Option<&str>,
    method: CollaborativeMethod,
    factors: usize,
) -> Result<()> {
    let mut config = AppConfig::new();
    config.collaborative.method = method;
    config.collaborative.n_factors = factors;

    let output = output.map(str::to_string).unwrap_or_else(|| model_path(model));
    let source = DatasetSource::detect(restaurants, reviews)?;
    BuildService::new(config).run(&source, &output)?;
    Ok(())
}

pub fn handle_similar(model: Option<&str>, name: &str, k: usize, filter: &RestaurantFilter) -> Result<()> {
    let service = load_service(model)?;
    print_outcome(service.similar_to(name, k, filter)?)
}

pub fn handle_near(
    model: Option<&str>,
    point: GeoPoint,
    radius_km: f64,
    k: usize,
    filter: &RestaurantFilter,
) -> Result<()> {
    let service = load_service(model)?;
    print_outcome(service.near(point, radius_km, k, filter))
}

pub fn handle_address(
    model: Option<&str>,
    address: &str,
    radius_km: f64,
    k: usize,
    filter: &RestaurantFilter,
) -> Result<()> {
    let service = load_service(model)?;
    let runtime = tokio::runtime::Runtime::new()?;
    let outcome = runtime.block_on(async {
        let geocoder = NominatimGeocoder::new(&AppConfig::new().geocoder)?;
        service
            .by_user_address(&geocoder, address, radius_km, k, filter)
            .await
    })?;
    print_outcome(outcome)
}

pub fn handle_user(model: Option<&str>, username: &str, k: usize) -> Result<()> {
    let service = load_service(model)?;
    print_outcome(service.user_recommendations(username, k)?)
}

pub fn handle_hybrid(
    model: Option<&str>,
    name: Option<&str>,
    username: Option<&str>,
    k: usize,
    content_weight: f64,
    collaborative_weight: f64,
) -> Result<()> {
    let service = load_service(model)?;
    print_outcome(service.hybrid(name, username, k, content_weight, collaborative_weight)?)
}

pub fn handle_top_rated(model: Option<&str>, n: usize, min_reviews: u32) -> Result<()> {
    let service = load_service(model)?;
    print_outcome(service.top_rated(n, min_reviews))
}

pub fn handle_route(
    model: Option<&str>,
    start: GeoPoint,
    end: GeoPoint,
    max_detour_km: f64,
    filter: &RestaurantFilter,
) -> Result<()> {
    let service = load_service(model)?;
    print_outcome(service.between_points(start, end, max_detour_km, filter))
}

pub fn handle_search(
    model: Option<&str>,
    n: usize,
    origin: Option<GeoPoint>,
    filter: &RestaurantFilter,
) -> Result<()> {
    let service = load_service(model)?;
    print_outcome(service.search(filter, origin, n)?)
}

pub fn handle_closest(model: Option<&str>, name: &str, k: usize, filter: &RestaurantFilter) -> Result<()> {
    let service = load_service(model)?;
    print_outcome(service.closest_to(name, k, filter)?)
}

pub fn handle_details(model: Option<&str>, name: &str) -> Result<()> {
    let service = load_service(model)?;
    match service.restaurant_details(name) {
        Ok(details) => print_json(&details),
        Err(what) => {
            println!("{}", what);
            Ok(())
        }
    }
}

pub fn handle_profile(model: Option<&str>, username: &str) -> Result<()> {
    let service = load_service(model)?;
    match service.user_profile(username) {
        Ok(profile) => print_json(&profile),
        Err(what) => {
            println!("{}", what);
            Ok(())
        }
    }
}

pub fn handle_liked_by(model: Option<&str>, name: &str, min_rating: f64) -> Result<()> {
    let service = load_service(model)?;
    print_outcome(service.users_who_liked(name, min_rating))
}

pub fn handle_cuisines(model: Option<&str>) -> Result<()> {
    let service = load_service(model)?;
    print_json(&service.cuisine_statistics())
}

pub fn handle_service_options(model: Option<&str>) -> Result<()> {
    let service = load_service(model)?;
    print_json(&service.service_options_summary())
}

pub fn handle_serve(model: Option<&str>, port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = ServerService::new(port, model_path(model), config);
        service.run().await
    })
}

fn load_service(model: Option<&str>) -> Result<RecommendationService> {
    let path = model_path(model);
    let trained = ModelStore::new(&path).load()?;
    info!(
        "Loaded model built at {} ({} restaurants)",
        trained.built_at.to_rfc3339(),
        trained.catalog.len()
    );
    Ok(RecommendationService::new(trained, &AppConfig::new()))
}

fn print_outcome<T: Serialize>(outcome: QueryOutcome<T>) -> Result<()> {
    match outcome {
        QueryOutcome::Found(results) => print_json(&results),
        QueryOutcome::Empty => {
            println!("No restaurants match your filters.");
            Ok(())
        }
        QueryOutcome::NotFound(what) => {
            println!("{}", what);
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
