use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, instrument};

use super::super::error::{ApiServiceError, ApiServiceResult};
use super::super::service::PriceService;
use super::super::types::ApiResponse;
use crate::core::config::Config;

/// Handles `GET /getethprice`
#[instrument(skip(config))]
async fn handle_get_eth_price(State(config): State<Arc<Config>>) -> ApiServiceResult<impl IntoResponse> {
    let price = PriceService::get_price(config).await.map_err(|e| {
        error!(error = %e, "Failed to get price");
        ApiServiceError::PriceError(e.to_string())
    })?;
    Ok(Json(ApiResponse::success_with_data(price, None)))
}

pub(super) fn price_router(config: Arc<Config>) -> Router {
    Router::new().route("/getethprice", get(handle_get_eth_price)).with_state(config)
}
