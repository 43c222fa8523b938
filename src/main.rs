use anyhow::Result;

use restaurant_recommender::cli::{Cli, Command};
use restaurant_recommender::geo::GeoPoint;
use restaurant_recommender::{
    handle_address, handle_build, handle_closest, handle_cuisines, handle_details, handle_hybrid,
    handle_init_db, handle_liked_by, handle_near, handle_profile, handle_route, handle_search,
    handle_serve, handle_service_options, handle_similar, handle_top_rated, handle_user, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let cli = interpret();
    execute_command(&cli)
}

fn execute_command(cli: &Cli) -> Result<()> {
    let model = cli.model.as_deref();
    match &cli.command {
        Command::InitDb {
            database,
            restaurants,
            reviews,
        } => handle_init_db(database, restaurants.as_deref(), reviews.as_deref()),
        Command::Build {
            restaurants,
            reviews,
            output,
            method,
            factors,
        } => handle_build(
            model,
            restaurants,
            reviews.as_deref(),
            output.as_deref(),
            *method,
            *factors,
        ),
        Command::Similar { name, limit, filters } => {
            handle_similar(model, name, *limit, &filters.to_filter())
        }
        Command::Near {
            lat,
            lon,
            radius,
            limit,
            filters,
        } => handle_near(model, GeoPoint::new(*lat, *lon), *radius, *limit, &filters.to_filter()),
        Command::Address {
            address,
            radius,
            limit,
            filters,
        } => handle_address(model, address, *radius, *limit, &filters.to_filter()),
        Command::User { username, limit } => handle_user(model, username, *limit),
        Command::Hybrid {
            name,
            username,
            content_weight,
            collaborative_weight,
            limit,
        } => handle_hybrid(
            model,
            name.as_deref(),
            username.as_deref(),
            *limit,
            *content_weight,
            *collaborative_weight,
        ),
        Command::TopRated { limit, min_reviews } => handle_top_rated(model, *limit, *min_reviews),
        Command::Route {
            from_lat,
            from_lon,
            to_lat,
            to_lon,
            max_detour,
            filters,
        } => handle_route(
            model,
            GeoPoint::new(*from_lat, *from_lon),
            GeoPoint::new(*to_lat, *to_lon),
            *max_detour,
            &filters.to_filter(),
        ),
        Command::Search {
            limit,
            lat,
            lon,
            filters,
        } => {
            let origin = lat.zip(*lon).map(|(lat, lon)| GeoPoint::new(lat, lon));
            handle_search(model, *limit, origin, &filters.to_filter())
        }
        Command::Closest {
            name,
            limit,
            filters,
        } => handle_closest(model, name, *limit, &filters.to_filter()),
        Command::Details { name } => handle_details(model, name),
        Command::Profile { username } => handle_profile(model, username),
        Command::LikedBy { name, min_rating } => handle_liked_by(model, name, *min_rating),
        Command::Cuisines => handle_cuisines(model),
        Command::ServiceOptions => handle_service_options(model),
        Command::Serve { port } => handle_serve(model, *port),
    }
}
