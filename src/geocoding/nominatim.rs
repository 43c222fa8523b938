use anyhow::{Context, Result};
use log::{debug, warn};
use serde::Deserialize;

use super::{GeocodedAddress, Geocoder};
use crate::config::GeocoderSettings;
use crate::http::RateLimitedClient;

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

/// OpenStreetMap Nominatim search, first hit only
pub struct NominatimGeocoder {
    client: RateLimitedClient,
    search_url: String,
}

impl NominatimGeocoder {
    pub fn new(settings: &GeocoderSettings) -> Result<Self> {
        let client = RateLimitedClient::new(
            settings.user_agent,
            settings.timeout_secs,
            settings.rate_limit_ms,
        )?;

        Ok(Self {
            client,
            search_url: format!("{}/search", settings.base_url.trim_end_matches('/')),
        })
    }

    fn search_request(&self, address: &str) -> String {
        format!(
            "{}?q={}&format=json&limit=1",
            self.search_url,
            urlencoding::encode(address.trim())
        )
    }
}

impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<GeocodedAddress>> {
        let url = self.search_request(address);
        debug!("Geocoding via {}", url);

        let body = match self.client.get_text(&url).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Geocoding request for '{}' failed: {:#}", address, e);
                return Ok(None);
            }
        };

        match parse_search_response(&body, address) {
            Ok(found) => Ok(found),
            Err(e) => {
                warn!("Unexpected geocoding response for '{}': {:#}", address, e);
                Ok(None)
            }
        }
    }
}

fn parse_search_response(body: &str, address: &str) -> Result<Option<GeocodedAddress>> {
    let places: Vec<NominatimPlace> =
        serde_json::from_str(body).context("Failed to parse Nominatim response")?;

    let Some(place) = places.into_iter().next() else {
        return Ok(None);
    };

    let latitude = place.lat.trim().parse::<f64>().context("Invalid latitude")?;
    let longitude = place.lon.trim().parse::<f64>().context("Invalid longitude")?;

    Ok(Some(GeocodedAddress {
        latitude,
        longitude,
        formatted_address: place.display_name.unwrap_or_else(|| address.to_string()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_result_is_used() {
        let body = r#"[
            {"lat": "51.8969", "lon": "-8.4863", "display_name": "Cork, Munster, Ireland"},
            {"lat": "0", "lon": "0", "display_name": "Elsewhere"}
        ]"#;
        let found = parse_search_response(body, "cork").unwrap().unwrap();

        assert_eq!(found.latitude, 51.8969);
        assert_eq!(found.longitude, -8.4863);
        assert_eq!(found.formatted_address, "Cork, Munster, Ireland");
    }

    #[test]
    fn test_missing_display_name_falls_back_to_query() {
        let body = r#"[{"lat": "51.9", "lon": "-8.5"}]"#;
        let found = parse_search_response(body, "somewhere").unwrap().unwrap();
        assert_eq!(found.formatted_address, "somewhere");
    }

    #[test]
    fn test_no_results() {
        assert!(parse_search_response("[]", "nowhere").unwrap().is_none());
    }

    #[test]
    fn test_malformed_response_is_an_error() {
        assert!(parse_search_response("{\"error\": true}", "x").is_err());
        assert!(parse_search_response(r#"[{"lat": "north", "lon": "1"}]"#, "x").is_err());
    }

    #[test]
    fn test_search_request_is_encoded() {
        let geocoder = NominatimGeocoder::new(&GeocoderSettings::default()).unwrap();
        assert_eq!(
            geocoder.search_request(" 12 Oliver Plunkett St, Cork "),
            "https://nominatim.openstreetmap.org/search?q=12%20Oliver%20Plunkett%20St%2C%20Cork&format=json&limit=1"
        );
    }
}
