use anyhow::{Context, Result};
use rusqlite::types::ValueRef;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::connection::DbConn;
use crate::domain::{RawRestaurant, RawReview};

const RESTAURANT_FIELDS: [&str; 18] = [
    "place_id",
    "name",
    "restaurant_type",
    "cuisine_type",
    "address",
    "county",
    "latitude",
    "longitude",
    "rating",
    "review_count",
    "price_range",
    "phone",
    "website",
    "url",
    "atmosphere",
    "dietary_options",
    "service_options",
    "amenities",
];

const REVIEW_FIELDS: [&str; 6] = [
    "place_id",
    "username",
    "rating",
    "review_text",
    "review_date",
    "sentiment",
];

/// Column names of a table, empty when the table does not exist
pub fn table_columns(conn: &mut DbConn, table: &str) -> Result<Vec<String>> {
    let sql = format!("PRAGMA table_info({})", table);
    let mut stmt = conn.prepare(&sql)?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("Failed to read columns of table {}", table))?;

    Ok(columns)
}

pub fn load_restaurants(conn: &mut DbConn) -> Result<(Vec<RawRestaurant>, Vec<String>)> {
    load_table(conn, "restaurants", &RESTAURANT_FIELDS)
}

pub fn load_reviews(conn: &mut DbConn) -> Result<(Vec<RawReview>, Vec<String>)> {
    load_table(conn, "reviews", &REVIEW_FIELDS)
}

pub fn insert_restaurant(conn: &mut DbConn, restaurant: &RawRestaurant) -> Result<()> {
    let sql = "INSERT INTO restaurants (place_id, name, restaurant_type, cuisine_type, address, county, latitude, longitude, rating, review_count, price_range, phone, website, url, atmosphere, dietary_options, service_options, amenities) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)";

    conn.execute(
        sql,
        rusqlite::params![
            restaurant.place_id,
            restaurant.name,
            restaurant.restaurant_type,
            restaurant.cuisine_type,
            restaurant.address,
            restaurant.county,
            restaurant.latitude,
            restaurant.longitude,
            restaurant.rating,
            restaurant.review_count,
            restaurant.price_range,
            restaurant.phone,
            restaurant.website,
            restaurant.url,
            restaurant.atmosphere,
            restaurant.dietary_options,
            restaurant.service_options,
            restaurant.amenities,
        ],
    )
    .context("Failed to insert restaurant")
    .map(|_| ())
}

pub fn insert_review(conn: &mut DbConn, review: &RawReview) -> Result<()> {
    let sql = "INSERT INTO reviews (place_id, username, rating, review_text, review_date, sentiment) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

    conn.execute(
        sql,
        rusqlite::params![
            review.place_id,
            review.username,
            review.rating,
            review.review_text,
            review.review_date,
            review.sentiment,
        ],
    )
    .context("Failed to insert review")
    .map(|_| ())
}

/// Reads the known fields that exist in `table`; unknown columns are ignored and
/// missing ones are left for the preprocessor's schema check.
fn load_table<T: DeserializeOwned>(
    conn: &mut DbConn,
    table: &str,
    known_fields: &[&str],
) -> Result<(Vec<T>, Vec<String>)> {
    let columns = table_columns(conn, table)?;
    let selected: Vec<&str> = known_fields
        .iter()
        .copied()
        .filter(|field| columns.iter().any(|c| c == field))
        .collect();

    if selected.is_empty() {
        return Ok((Vec::new(), columns));
    }

    let sql = format!("SELECT {} FROM {}", selected.join(", "), table);
    let mut stmt = conn.prepare(&sql)?;
    let records = stmt
        .query_map([], |row| {
            let mut record = Map::new();
            for (idx, field) in selected.iter().enumerate() {
                record.insert(field.to_string(), sql_value_to_json(row.get_ref(idx)?));
            }
            Ok(Value::Object(record))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("Failed to read rows of table {}", table))?;

    let rows = records
        .into_iter()
        .map(serde_json::from_value)
        .collect::<std::result::Result<Vec<T>, _>>()
        .with_context(|| format!("Failed to map rows of table {}", table))?;

    Ok((rows, columns))
}

fn sql_value_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Value::from(f),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(_) => Value::Null,
    }
}
