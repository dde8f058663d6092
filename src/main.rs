use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use weekendwish_api::{
    config::Config,
    routes::{create_router, AppState},
    services::{
        catalog::OfflineCatalog,
        geocoder::GeocodingClient,
        providers::{foursquare::FoursquareProvider, PlaceProvider},
        recommend::Recommender,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    // The offline catalog is the fallback for every request; failing to load
    // it is a startup error, not something to discover per request
    let catalog = Arc::new(OfflineCatalog::load(&config.dataset_path)?);

    let geocoder = Arc::new(GeocodingClient::new(
        config.geocoder_api_key.clone(),
        config.geocoder_api_url.clone(),
    ));
    if config.geocoder_api_key.is_none() {
        tracing::warn!("GEOCODER_API_KEY not set, geocoding limited to known localities");
    }

    let provider: Option<Arc<dyn PlaceProvider>> = match &config.places_api_key {
        Some(key) => Some(Arc::new(FoursquareProvider::new(
            key.clone(),
            config.places_api_url.clone(),
        ))),
        None => {
            tracing::warn!("PLACES_API_KEY not set, running in offline-only mode");
            None
        }
    };

    let recommender = Arc::new(Recommender::new(
        geocoder,
        provider,
        Some(catalog),
        config.max_results,
    ));

    let app = create_router(AppState { recommender });

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
