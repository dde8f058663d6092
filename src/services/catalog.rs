/// Offline places catalog
///
/// Loaded once at process start from a CSV dataset and read-only afterwards,
/// so concurrent requests can query it without locking. Rows that fail
/// normalization are dropped at load time and counted, never fatal; only a
/// missing or unreadable dataset aborts startup.
use std::path::Path;

use crate::{
    error::{AppError, AppResult},
    geo,
    models::{CatalogRow, Coordinates, Place, RawRecord},
    services::normalize,
};

pub struct OfflineCatalog {
    places: Vec<Place>,
}

impl OfflineCatalog {
    /// Loads the dataset, normalizing every row through the shared
    /// normalizer and dropping the ones it rejects.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path).map_err(|e| {
            AppError::CatalogUnavailable(format!("failed to open {}: {}", path.display(), e))
        })?;

        let mut rows = Vec::new();
        let mut undecodable = 0usize;
        for record in reader.deserialize::<CatalogRow>() {
            match record {
                Ok(row) => rows.push(RawRecord::Offline(row)),
                // A row the CSV reader cannot decode is malformed the same
                // way a row the normalizer rejects is: dropped, counted
                Err(e) => {
                    undecodable += 1;
                    tracing::debug!(error = %e, "Skipping undecodable catalog row");
                }
            }
        }
        if undecodable > 0 {
            tracing::warn!(undecodable, "Dropped undecodable catalog rows");
        }

        let places = normalize::normalize_all(rows);
        if places.is_empty() {
            tracing::warn!(path = %path.display(), "Offline catalog loaded with zero usable places");
        } else {
            tracing::info!(
                path = %path.display(),
                places = places.len(),
                "Offline catalog loaded"
            );
        }

        Ok(Self { places })
    }

    /// Builds a catalog from already-normalized places, for tests and
    /// programmatic setups.
    pub fn from_places(places: Vec<Place>) -> Self {
        Self { places }
    }

    /// Returns every cataloged place within `radius_m` of `center`, in no
    /// particular order; ordering is the ranker's job.
    pub fn query(&self, center: Coordinates, radius_m: f64) -> Vec<Place> {
        self.places
            .iter()
            .filter(|place| geo::haversine_m(center, place.coords) <= radius_m)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}
