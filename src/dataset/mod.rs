pub mod connection;
pub mod json;
pub mod setup;
pub mod sqlite;

pub use connection::{DbConn, DbPool, create_pool, get_connection, open_read_only};

use anyhow::{Context, Result, bail};
use log::info;
use std::path::Path;

use crate::domain::RawDataset;
use crate::errors::dataset_context;

/// Where the raw restaurant and review tables come from
#[derive(Debug, Clone)]
pub enum DatasetSource<'a> {
    Json { restaurants: &'a Path, reviews: &'a Path },
    Sqlite { database: &'a Path },
}

impl<'a> DatasetSource<'a> {
    /// SQLite when the restaurants path looks like a database file, JSON otherwise
    pub fn detect(restaurants: &'a Path, reviews: Option<&'a Path>) -> Result<Self> {
        if is_sqlite_path(restaurants) {
            return Ok(DatasetSource::Sqlite { database: restaurants });
        }

        match reviews {
            Some(reviews) => Ok(DatasetSource::Json { restaurants, reviews }),
            None => bail!("A reviews file is required when restaurants are loaded from JSON"),
        }
    }

    fn describe(&self) -> String {
        match self {
            DatasetSource::Json { restaurants, reviews } => {
                format!("{} + {}", restaurants.display(), reviews.display())
            }
            DatasetSource::Sqlite { database } => database.display().to_string(),
        }
    }
}

pub fn load(source: &DatasetSource) -> Result<RawDataset> {
    let dataset = match source {
        DatasetSource::Json { restaurants, reviews } => load_json(restaurants, reviews),
        DatasetSource::Sqlite { database } => load_sqlite(database),
    }
    .with_context(|| dataset_context(&source.describe()))?;

    info!(
        "Loaded {} restaurants and {} reviews",
        dataset.restaurants.len(),
        dataset.reviews.len()
    );
    Ok(dataset)
}

/// Creates an empty dataset database for the ingestion collaborator to fill
pub fn init_database(path: &Path) -> Result<()> {
    let pool = create_pool(path)?;
    let mut conn = get_connection(&pool)?;
    setup::create_schema(&mut conn)
}

/// Creates the dataset database and fills it from the JSON exports
pub fn import_json(database: &Path, restaurants: &Path, reviews: &Path) -> Result<()> {
    let dataset = load_json(restaurants, reviews)
        .with_context(|| dataset_context(&format!("{} + {}", restaurants.display(), reviews.display())))?;

    let pool = create_pool(database)?;
    let mut conn = get_connection(&pool)?;
    setup::create_schema(&mut conn)?;

    for restaurant in &dataset.restaurants {
        sqlite::insert_restaurant(&mut conn, restaurant)?;
    }
    for review in &dataset.reviews {
        sqlite::insert_review(&mut conn, review)?;
    }

    info!(
        "Imported {} restaurants and {} reviews into {}",
        dataset.restaurants.len(),
        dataset.reviews.len(),
        database.display()
    );
    Ok(())
}

fn load_json(restaurants: &Path, reviews: &Path) -> Result<RawDataset> {
    let (restaurants, restaurant_columns) = json::load_records(restaurants)?;
    let (reviews, review_columns) = json::load_records(reviews)?;

    Ok(RawDataset {
        restaurants,
        restaurant_columns,
        reviews,
        review_columns,
    })
}

fn load_sqlite(database: &Path) -> Result<RawDataset> {
    let pool = open_read_only(database)?;
    let mut conn = get_connection(&pool)?;

    let (restaurants, restaurant_columns) = sqlite::load_restaurants(&mut conn)?;
    let (reviews, review_columns) = sqlite::load_reviews(&mut conn)?;

    Ok(RawDataset {
        restaurants,
        restaurant_columns,
        reviews,
        review_columns,
    })
}

fn is_sqlite_path(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("db" | "sqlite" | "sqlite3")
    )
}
