/// Foursquare-style places API provider
///
/// One authenticated GET against /v3/places/search per call. The fields
/// projection asks for photos up front so photo URLs ride along with the
/// search response instead of needing a second request per place.
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{Coordinates, FsqPlace, RawRecord},
    services::providers::PlaceProvider,
};

/// Bound on the outbound search call; a hung provider becomes a Provider
/// error and the request falls back to the offline catalog
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Candidate count requested from the provider; the ranker narrows this down
const SEARCH_LIMIT: u32 = 40;

const SEARCH_FIELDS: &str = "fsq_id,name,geocodes,location,popularity,price,photos";

#[derive(Clone)]
pub struct FoursquareProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl FoursquareProvider {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::builder()
                .timeout(HTTP_TIMEOUT)
                .build()
                .expect("failed to build HTTP client"),
            api_key,
            api_url,
        }
    }
}

#[async_trait::async_trait]
impl PlaceProvider for FoursquareProvider {
    async fn search(&self, center: Coordinates, radius_m: f64) -> AppResult<Vec<RawRecord>> {
        let url = format!("{}/v3/places/search", self.api_url);
        let ll = format!("{},{}", center.lat, center.lon);
        let radius = format!("{}", radius_m.round() as u64);
        let limit = SEARCH_LIMIT.to_string();

        let response = self
            .http_client
            .get(&url)
            .header("Authorization", &self.api_key)
            .query(&[
                ("ll", ll.as_str()),
                ("radius", radius.as_str()),
                ("limit", limit.as_str()),
                ("fields", SEARCH_FIELDS),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Provider(format!(
                "places API returned status {}: {}",
                status, body
            )));
        }

        #[derive(Deserialize)]
        struct SearchResponse {
            results: Vec<FsqPlace>,
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::Provider(format!("invalid places API response: {}", e)))?;

        tracing::info!(
            results = parsed.results.len(),
            radius_m = radius_m,
            provider = self.name(),
            "Place search completed"
        );

        Ok(parsed
            .results
            .into_iter()
            .map(RawRecord::Online)
            .collect())
    }

    fn name(&self) -> &'static str {
        "foursquare"
    }
}
