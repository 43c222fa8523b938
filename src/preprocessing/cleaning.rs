use regex::Regex;
use std::sync::LazyLock;

use crate::domain::RawRestaurant;

pub const GENERAL: &str = "General";
pub const NONE: &str = "None";
pub const DEFAULT_RESTAURANT_TYPE: &str = "Restaurant";
pub const DEFAULT_PRICE_RANGE: &str = "€10-25";

pub const BUDGET_LEVEL: u8 = 1;
pub const MID_RANGE_LEVEL: u8 = 2;
pub const PREMIUM_LEVEL: u8 = 3;

const BUDGET_MAX_PRICE: f64 = 15.0;
const MID_RANGE_MAX_PRICE: f64 = 25.0;

static PRICE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid price regex"));

/// Categorical fields with their sentinels applied
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalFields {
    pub cuisine_type: String,
    pub restaurant_type: String,
    pub atmosphere: String,
    pub dietary_options: String,
    pub service_options: String,
    pub amenities: String,
    pub price_range: String,
    pub county: String,
    pub phone: String,
    pub website: String,
    pub url: String,
}

impl CategoricalFields {
    pub fn from_raw(raw: &RawRestaurant) -> Self {
        Self {
            cuisine_type: or_sentinel(&raw.cuisine_type, GENERAL),
            restaurant_type: or_sentinel(&raw.restaurant_type, DEFAULT_RESTAURANT_TYPE),
            atmosphere: or_sentinel(&raw.atmosphere, GENERAL),
            dietary_options: or_sentinel(&raw.dietary_options, NONE),
            service_options: or_sentinel(&raw.service_options, NONE),
            amenities: or_sentinel(&raw.amenities, NONE),
            price_range: or_sentinel(&raw.price_range, DEFAULT_PRICE_RANGE),
            county: or_sentinel(&raw.county, ""),
            phone: or_sentinel(&raw.phone, ""),
            website: or_sentinel(&raw.website, ""),
            url: or_sentinel(&raw.url, ""),
        }
    }

    /// Text-similarity input; field order is fixed
    pub fn combined_features(&self) -> String {
        [
            self.cuisine_type.as_str(),
            self.restaurant_type.as_str(),
            self.atmosphere.as_str(),
            self.dietary_options.as_str(),
            self.service_options.as_str(),
            self.amenities.as_str(),
        ]
        .join(" ")
    }
}

fn or_sentinel(value: &Option<String>, sentinel: &str) -> String {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(sentinel)
        .to_string()
}

pub fn clamp_rating(rating: Option<f64>) -> Option<f64> {
    rating.filter(|r| r.is_finite()).map(|r| r.clamp(0.0, 5.0))
}

/// Ordinal price tier from free text such as "€10-20", "€€" or "£25+".
///
/// Up to two embedded numbers are averaged and bucketed; text without numbers is
/// tiered by its count of currency signs; anything else is mid-range.
pub fn price_level(price_range: &str) -> u8 {
    let numbers: Vec<f64> = PRICE_NUMBER
        .find_iter(price_range)
        .take(2)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect();

    if !numbers.is_empty() {
        let average = numbers.iter().sum::<f64>() / numbers.len() as f64;
        return bucket_price(average);
    }

    level_from_currency_signs(price_range)
}

fn bucket_price(average: f64) -> u8 {
    if average <= BUDGET_MAX_PRICE {
        BUDGET_LEVEL
    } else if average <= MID_RANGE_MAX_PRICE {
        MID_RANGE_LEVEL
    } else {
        PREMIUM_LEVEL
    }
}

fn level_from_currency_signs(price_range: &str) -> u8 {
    let signs = price_range
        .chars()
        .filter(|c| matches!(c, '€' | '$' | '£'))
        .count();

    match signs {
        1 => BUDGET_LEVEL,
        2 => MID_RANGE_LEVEL,
        n if n >= 3 => PREMIUM_LEVEL,
        _ => MID_RANGE_LEVEL,
    }
}
