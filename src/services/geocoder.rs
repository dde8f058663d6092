/// Geocoding of free-text starting locations
///
/// Resolution order: one call to the configured geocoding provider, then the
/// static table of known Pune localities. With no API key the provider call
/// is skipped entirely and only the table is consulted.
use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::Coordinates,
};

/// Bound on every outbound geocoding call; a hung provider becomes a
/// GeocodeError rather than a hung request
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve a free-text location to coordinates
    async fn geocode(&self, location: &str) -> AppResult<Coordinates>;
}

#[derive(Clone)]
pub struct GeocodingClient {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
    /// Known localities within the supported city, keyed by lowercase name
    fallback: HashMap<&'static str, Coordinates>,
}

/// Localities the service can resolve without a provider. Coordinates are
/// locality centroids.
fn known_localities() -> HashMap<&'static str, Coordinates> {
    [
        ("pune", (18.5204, 73.8567)),
        ("kothrud", (18.5074, 73.8077)),
        ("shivajinagar", (18.5308, 73.8475)),
        ("hinjewadi", (18.5913, 73.7389)),
        ("viman nagar", (18.5679, 73.9143)),
        ("koregaon park", (18.5362, 73.8940)),
        ("baner", (18.5590, 73.7868)),
        ("aundh", (18.5593, 73.8078)),
        ("hadapsar", (18.5089, 73.9260)),
        ("deccan gymkhana", (18.5158, 73.8408)),
        ("swargate", (18.5018, 73.8636)),
        ("katraj", (18.4575, 73.8677)),
    ]
    .into_iter()
    .map(|(name, (lat, lon))| (name, Coordinates { lat, lon }))
    .collect()
}

impl GeocodingClient {
    pub fn new(api_key: Option<String>, api_url: String) -> Self {
        Self {
            http_client: HttpClient::builder()
                .timeout(HTTP_TIMEOUT)
                .build()
                .expect("failed to build HTTP client"),
            api_key,
            api_url,
            fallback: known_localities(),
        }
    }

    /// Looks the location up in the static table: the full trimmed string
    /// first, then its first comma-separated segment, so "Kothrud, Pune"
    /// matches the "kothrud" entry.
    fn lookup_fallback(&self, location: &str) -> Option<Coordinates> {
        let normalized = location.trim().to_lowercase();
        if let Some(coords) = self.fallback.get(normalized.as_str()) {
            return Some(*coords);
        }
        let first_segment = normalized.split(',').next()?.trim();
        self.fallback.get(first_segment).copied()
    }

    async fn geocode_via_provider(&self, location: &str, api_key: &str) -> AppResult<Coordinates> {
        let url = format!("{}/geocode/v1/json", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[("q", location), ("key", api_key), ("limit", "1")])
            .send()
            .await
            .map_err(|e| AppError::Geocode(format!("geocoding request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Geocode(format!(
                "geocoding provider returned status {}: {}",
                status, body
            )));
        }

        #[derive(Deserialize)]
        struct GeocodeResponse {
            results: Vec<GeocodeResult>,
        }

        #[derive(Deserialize)]
        struct GeocodeResult {
            geometry: Geometry,
        }

        #[derive(Deserialize)]
        struct Geometry {
            lat: f64,
            lng: f64,
        }

        let parsed: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| AppError::Geocode(format!("invalid geocoding response: {}", e)))?;

        parsed
            .results
            .first()
            .and_then(|r| Coordinates::new(r.geometry.lat, r.geometry.lng))
            .ok_or_else(|| AppError::Geocode(format!("no match for location '{}'", location)))
    }
}

#[async_trait::async_trait]
impl Geocoder for GeocodingClient {
    async fn geocode(&self, location: &str) -> AppResult<Coordinates> {
        let location = location.trim();
        if location.is_empty() {
            return Err(AppError::Geocode("starting location missing".to_string()));
        }

        let provider_error = match &self.api_key {
            Some(key) => match self.geocode_via_provider(location, key).await {
                Ok(coords) => {
                    tracing::info!(
                        location = %location,
                        lat = coords.lat,
                        lon = coords.lon,
                        "Location geocoded"
                    );
                    return Ok(coords);
                }
                Err(e) => Some(e),
            },
            None => None,
        };

        if let Some(coords) = self.lookup_fallback(location) {
            tracing::info!(
                location = %location,
                lat = coords.lat,
                lon = coords.lon,
                "Location resolved from static locality table"
            );
            return Ok(coords);
        }

        Err(provider_error.unwrap_or_else(|| {
            AppError::Geocode(format!("could not geocode location '{}'", location))
        }))
    }
}
