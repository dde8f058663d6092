use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Geocoding provider API key; geocoding degrades to the static
    /// locality table when absent
    #[serde(default)]
    pub geocoder_api_key: Option<String>,

    /// Geocoding provider base URL
    #[serde(default = "default_geocoder_api_url")]
    pub geocoder_api_url: String,

    /// Places provider API key; the online search path is disabled when absent
    #[serde(default)]
    pub places_api_key: Option<String>,

    /// Places provider base URL
    #[serde(default = "default_places_api_url")]
    pub places_api_url: String,

    /// Path to the offline places dataset (CSV)
    #[serde(default = "default_dataset_path")]
    pub dataset_path: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum number of places returned per request
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_geocoder_api_url() -> String {
    "https://api.opencagedata.com".to_string()
}

fn default_places_api_url() -> String {
    "https://api.foursquare.com".to_string()
}

fn default_dataset_path() -> String {
    "data/pune_places.csv".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_results() -> usize {
    12
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
