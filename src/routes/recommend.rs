use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::json;

use crate::{
    error::AppResult,
    models::{PriceLevel, RankedPlace, RecommendationRequest},
    routes::AppState,
};

#[derive(Debug, Serialize)]
pub struct PlaceResponse {
    pub name: String,
    pub address: Option<String>,
    pub popularity: Option<f64>,
    pub price: Option<PriceLevel>,
    pub photo: Option<String>,
    pub distance_m: f64,
}

impl From<&RankedPlace> for PlaceResponse {
    fn from(ranked: &RankedPlace) -> Self {
        Self {
            name: ranked.place.name.clone(),
            address: ranked.place.address.clone(),
            popularity: ranked.place.popularity,
            price: ranked.place.price,
            photo: ranked.place.photo.clone(),
            distance_m: ranked.distance_m,
        }
    }
}

/// Handler for the recommend endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let ranked = state.recommender.recommend(request).await?;
    let results: Vec<PlaceResponse> = ranked.iter().map(PlaceResponse::from).collect();
    Ok(Json(json!({ "results": results })))
}
