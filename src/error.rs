use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Geocoding failed: {0}")]
    Geocode(String),

    #[error("Places provider error: {0}")]
    Provider(String),

    #[error("Offline catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("No place data available: {0}")]
    NoData(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Provider(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Geocode(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Provider(_) | AppError::NoData(_) => {
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            AppError::CatalogUnavailable(_)
            | AppError::MalformedRecord(_)
            | AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
