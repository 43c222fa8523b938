pub mod nominatim;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;

use crate::geo::GeoPoint;

pub use nominatim::NominatimGeocoder;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedAddress {
    pub latitude: f64,
    pub longitude: f64,
    pub formatted_address: String,
}

impl GeocodedAddress {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Resolves free-text addresses to coordinates. `Ok(None)` means the address
/// could not be resolved; `Err` is reserved for unusable configuration.
pub trait Geocoder: Send + Sync {
    fn geocode(&self, address: &str) -> impl Future<Output = Result<Option<GeocodedAddress>>> + Send;
}

/// Fixed lookup table, for offline use and tests
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    entries: HashMap<String, GeocodedAddress>,
}

impl StaticGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, address: &str, latitude: f64, longitude: f64) -> Self {
        self.entries.insert(
            address.trim().to_lowercase(),
            GeocodedAddress {
                latitude,
                longitude,
                formatted_address: address.to_string(),
            },
        );
        self
    }
}

impl Geocoder for StaticGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<GeocodedAddress>> {
        Ok(self.entries.get(&address.trim().to_lowercase()).cloned())
    }
}
