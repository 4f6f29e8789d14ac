use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::types::ApiResponse;

pub type ApiServiceResult<T> = Result<T, ApiServiceError>;

/// Errors returned by the read API.
///
/// Every variant is rendered as an `ApiResponse` with `success: false`:
/// * `MissingParameter`, `InvalidHash`, `InvalidAddress` -> 400 Bad Request
/// * `NotFound` -> 404 Not Found
/// * `StoreError`, `PriceError` -> 500 Internal Server Error
#[derive(Debug, thiserror::Error)]
pub enum ApiServiceError {
    #[error("Missing query parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid transaction hash: {0}")]
    InvalidHash(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Transaction not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Price error: {0}")]
    PriceError(String),
}

impl IntoResponse for ApiServiceError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::MissingParameter(_) | Self::InvalidHash(_) | Self::InvalidAddress(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            Self::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            // internals stay in the logs
            Self::StoreError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "error calling API".to_string()),
            Self::PriceError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "error fetching price".to_string()),
        };
        (status, Json(ApiResponse::error(message))).into_response()
    }
}
