/// Live places provider abstraction
///
/// A provider issues one authenticated search per call and returns raw
/// records for the normalizer; it never produces canonical places itself.
/// Provider failures are non-fatal to a request: the orchestrator falls
/// back to the offline catalog.
use crate::{
    error::AppResult,
    models::{Coordinates, RawRecord},
};

pub mod foursquare;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PlaceProvider: Send + Sync {
    /// Search for candidate places within `radius_m` of `center`
    ///
    /// One outbound request per invocation, no retries; any failure maps to
    /// a Provider error and triggers the caller's fallback.
    async fn search(&self, center: Coordinates, radius_m: f64) -> AppResult<Vec<RawRecord>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
