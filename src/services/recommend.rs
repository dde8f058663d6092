/// Recommendation orchestrator
///
/// The only component that sees the whole pipeline: resolve the starting
/// point, fetch candidates online with offline fallback, normalize, rank.
/// Stateless across requests; concurrent requests share nothing but the
/// read-only catalog behind the Arc.
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Coordinates, Place, RankedResult, RecommendationRequest},
    services::{
        catalog::OfflineCatalog, geocoder::Geocoder, normalize, providers::PlaceProvider, ranking,
    },
};

pub struct Recommender {
    geocoder: Arc<dyn Geocoder>,
    provider: Option<Arc<dyn PlaceProvider>>,
    catalog: Option<Arc<OfflineCatalog>>,
    max_results: usize,
}

impl Recommender {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        provider: Option<Arc<dyn PlaceProvider>>,
        catalog: Option<Arc<OfflineCatalog>>,
        max_results: usize,
    ) -> Self {
        Self {
            geocoder,
            provider,
            catalog,
            max_results,
        }
    }

    /// Runs the full pipeline for one request
    pub async fn recommend(&self, request: RecommendationRequest) -> AppResult<RankedResult> {
        request.validate()?;

        let center = self.resolve_start(&request.start).await?;
        let places = self.fetch_candidates(center, request.radius).await?;
        let ranked = ranking::rank(places, center, &request, self.max_results);

        tracing::info!(
            start = %request.start,
            results = ranked.len(),
            radius_m = request.radius,
            "Recommendation pipeline completed"
        );

        Ok(ranked)
    }

    /// A raw "lat,lon" pair short-circuits geocoding; anything else goes to
    /// the geocoder and an unresolvable location aborts the request.
    async fn resolve_start(&self, start: &str) -> AppResult<Coordinates> {
        if let Some(coords) = Coordinates::parse(start) {
            return Ok(coords);
        }
        self.geocoder.geocode(start).await
    }

    /// Tries the online provider, falling back to the offline catalog on
    /// failure or an empty result; with no source left the request fails
    /// with NoData.
    async fn fetch_candidates(&self, center: Coordinates, radius_m: f64) -> AppResult<Vec<Place>> {
        if let Some(provider) = &self.provider {
            match provider.search(center, radius_m).await {
                Ok(records) if !records.is_empty() => {
                    return Ok(normalize::normalize_all(records));
                }
                Ok(_) => {
                    tracing::info!(
                        provider = provider.name(),
                        "Online search returned no candidates, trying offline catalog"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        provider = provider.name(),
                        "Online search failed, falling back to offline catalog"
                    );
                }
            }
        }

        if let Some(catalog) = &self.catalog {
            let places = catalog.query(center, radius_m);
            tracing::info!(results = places.len(), "Offline catalog queried");
            return Ok(places);
        }

        Err(AppError::NoData(
            "no place source available for this request".to_string(),
        ))
    }
}
