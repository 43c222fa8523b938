use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::collaborative::CollaborativeMethod;
use crate::filters::{Budget, RestaurantFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Hybrid restaurant recommendation engine")]
pub struct Cli {
    /// Model file (defaults to $MODEL_PATH, then restaurant_model.json)
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

/// Attribute filters shared by the query commands
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct FilterArgs {
    /// Minimum restaurant rating
    #[arg(long)]
    pub min_rating: Option<f64>,
    /// Exact price level (1-3)
    #[arg(long)]
    pub price_level: Option<u8>,
    /// Budget, either a level (1-3) or a price range such as "€10-25"
    #[arg(long)]
    pub budget: Option<String>,
    /// Cuisine substring; repeat for alternatives
    #[arg(long)]
    pub cuisine: Vec<String>,
    #[arg(long)]
    pub atmosphere: Vec<String>,
    #[arg(long)]
    pub amenities: Vec<String>,
    #[arg(long)]
    pub restaurant_type: Vec<String>,
    #[arg(long)]
    pub dietary: Vec<String>,
    #[arg(long)]
    pub service: Vec<String>,
    #[arg(long)]
    pub county: Vec<String>,
    /// Street address substring
    #[arg(long)]
    pub address_contains: Vec<String>,
    /// Maximum distance in km from the query origin
    #[arg(long)]
    pub max_distance: Option<f64>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> RestaurantFilter {
        let budget = self.budget.as_deref().map(|b| match b.trim().parse::<u8>() {
            Ok(level) => Budget::Level(level),
            Err(_) => Budget::Text(b.to_string()),
        });

        RestaurantFilter {
            min_rating: self.min_rating,
            price_level: self.price_level,
            budget,
            cuisine: self.cuisine.clone(),
            max_distance_km: self.max_distance,
            atmosphere: self.atmosphere.clone(),
            amenities: self.amenities.clone(),
            restaurant_type: self.restaurant_type.clone(),
            dietary: self.dietary.clone(),
            service: self.service.clone(),
            county: self.county.clone(),
            address: self.address_contains.clone(),
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Create an empty dataset database (restaurants and reviews tables)
    InitDb {
        #[arg(long)]
        database: PathBuf,
        /// Restaurants JSON export to import
        #[arg(long, requires = "reviews")]
        restaurants: Option<PathBuf>,
        /// Reviews JSON export to import
        #[arg(long, requires = "restaurants")]
        reviews: Option<PathBuf>,
    },
    /// Build the similarity and collaborative models and save them
    Build {
        /// Restaurants JSON file or SQLite database
        #[arg(long)]
        restaurants: PathBuf,
        /// Reviews JSON file (not needed for a SQLite database)
        #[arg(long)]
        reviews: Option<PathBuf>,
        /// Output model file (defaults to --model)
        #[arg(short, long)]
        output: Option<String>,
        #[arg(long, value_enum, default_value_t = CollaborativeMethod::UserBased)]
        method: CollaborativeMethod,
        /// Latent factors for matrix factorization
        #[arg(long, default_value_t = 20)]
        factors: usize,
    },
    /// Restaurants similar to a named one
    Similar {
        #[arg(long)]
        name: String,
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Restaurants near a coordinate
    Near {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        #[arg(long, default_value_t = 5.0)]
        radius: f64,
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Restaurants near a street address (geocoded)
    Address {
        #[arg(long)]
        address: String,
        #[arg(long, default_value_t = 5.0)]
        radius: f64,
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Collaborative recommendations for a reviewer
    User {
        #[arg(long)]
        username: String,
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },
    /// Content and collaborative recommendations combined
    Hybrid {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long, default_value_t = 0.5)]
        content_weight: f64,
        #[arg(long, default_value_t = 0.5)]
        collaborative_weight: f64,
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },
    /// Best rated restaurants
    TopRated {
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
        #[arg(long, default_value_t = 5)]
        min_reviews: u32,
    },
    /// Restaurants along the way between two coordinates
    Route {
        #[arg(long, allow_hyphen_values = true)]
        from_lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        from_lon: f64,
        #[arg(long, allow_hyphen_values = true)]
        to_lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        to_lon: f64,
        /// Maximum detour in km
        #[arg(long, default_value_t = 2.0)]
        max_detour: f64,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Filter the catalog without a seed
    Search {
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
        /// Latitude to measure --max-distance from
        #[arg(long, allow_hyphen_values = true, requires = "lon")]
        lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lon: Option<f64>,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Restaurants geographically closest to a named one
    Closest {
        #[arg(long)]
        name: String,
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// A restaurant with its reviews
    Details {
        #[arg(long)]
        name: String,
    },
    /// A reviewer's history and favourite cuisines
    Profile {
        #[arg(long)]
        username: String,
    },
    /// Reviewers who rated a restaurant highly
    LikedBy {
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 4.0)]
        min_rating: f64,
    },
    /// Restaurant count and mean rating per cuisine
    Cuisines,
    /// How many restaurants offer dine-in, takeaway and delivery
    ServiceOptions,
    /// Start the HTTP server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
}
