use std::io::Write;
use std::sync::Arc;

use axum_test::TestServer;
use serde_json::json;
use tempfile::NamedTempFile;

use weekendwish_api::routes::{create_router, AppState};
use weekendwish_api::services::{
    catalog::OfflineCatalog, geocoder::GeocodingClient, recommend::Recommender,
};

/// Server backed by the real geocoder (static locality table only, no key)
/// and an offline catalog built from a temporary dataset; no online provider.
fn create_test_server(dataset: &str) -> TestServer {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(dataset.as_bytes()).unwrap();
    file.flush().unwrap();

    let catalog = Arc::new(OfflineCatalog::load(file.path()).unwrap());
    let geocoder = Arc::new(GeocodingClient::new(None, "http://unused.local".to_string()));
    let recommender = Arc::new(Recommender::new(geocoder, None, Some(catalog), 12));

    let app = create_router(AppState { recommender });
    TestServer::new(app).unwrap()
}

const DATASET: &str = "id,name,lat,lon,popularity,price_tier,address,photo\n\
    p1,Vaishali,18.5167,73.8414,9.5,2,\"FC Road, Pune\",\n\
    p2,Cafe Goodluck,18.5196,73.8416,9.1,2,\"Deccan Gymkhana, Pune\",\n\
    p3,Conrad Rooftop Lounge,18.5362,73.8875,7.9,4,\"Mangaldas Road, Pune\",\n";

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(DATASET);
    let response = server.get("/health").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_recommend_returns_ordered_results() {
    let server = create_test_server(DATASET);

    let response = server
        .post("/api/v1/recommend")
        .json(&json!({
            "start": "Kothrud, Pune",
            "budget": 2000,
            "people": 2,
            "radius": 8000
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let results = body["results"].as_array().unwrap();

    // Budget per person is 1000: the Luxury lounge (estimate 1200) is
    // filtered out, the two Moderate cafes stay
    assert_eq!(results.len(), 2);
    for result in results {
        assert!(result["distance_m"].as_f64().unwrap() <= 8000.0);
        assert!(result["name"].is_string());
    }

    // Vaishali has the higher popularity and sits closer to Kothrud
    assert_eq!(results[0]["name"], "Vaishali");
    assert_eq!(results[0]["price"], "moderate");
}

#[tokio::test]
async fn test_recommend_accepts_latlng_start() {
    let server = create_test_server(DATASET);

    let response = server
        .post("/api/v1/recommend")
        .json(&json!({
            "start": "18.5204, 73.8567",
            "budget": 5000,
            "people": 1
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(!body["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_recommend_unresolvable_start_is_error_shape() {
    let server = create_test_server(DATASET);

    let response = server
        .post("/api/v1/recommend")
        .json(&json!({
            "start": "Atlantis, Lost Continent",
            "budget": 2000,
            "people": 2
        }))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert!(body["error"].is_string());
    assert!(body.get("results").is_none());
}

#[tokio::test]
async fn test_recommend_missing_start_is_bad_request() {
    let server = create_test_server(DATASET);

    let response = server
        .post("/api/v1/recommend")
        .json(&json!({
            "start": "  ",
            "budget": 2000
        }))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_recommend_zero_in_radius_candidates_is_empty_success() {
    // Every dataset place is far from Hinjewadi at a 1 km radius
    let server = create_test_server(DATASET);

    let response = server
        .post("/api/v1/recommend")
        .json(&json!({
            "start": "Hinjewadi",
            "budget": 2000,
            "people": 2,
            "radius": 1000
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["results"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_recommend_echoes_request_id_header() {
    let server = create_test_server(DATASET);

    let response = server.get("/health").await;
    let header = response.header("x-request-id");
    assert!(!header.is_empty());
}
