use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, instrument};

use super::super::error::{ApiServiceError, ApiServiceResult};
use super::super::service::TransactionService;
use super::super::types::{parse_address, parse_hash, AddressQuery, ApiResponse, HashQuery};
use crate::core::config::Config;

/// Handles `GET /gettx?hash=`.
///
/// # Errors
/// * `MissingParameter` / `InvalidHash` - 400 when the hash is absent or not 32 bytes of hex
/// * `NotFound` - 404 when no transaction has that hash
/// * `StoreError` - 500 when the lookup fails
#[instrument(skip(config))]
async fn handle_get_transaction(
    Query(query): Query<HashQuery>,
    State(config): State<Arc<Config>>,
) -> ApiServiceResult<impl IntoResponse> {
    let raw = query.hash.ok_or(ApiServiceError::MissingParameter("hash"))?;
    let hash = parse_hash(&raw).ok_or_else(|| ApiServiceError::InvalidHash(raw.clone()))?;

    let transaction = TransactionService::by_hash(hash, config).await.map_err(|e| {
        error!(error = %e, "Failed to get transaction");
        ApiServiceError::StoreError(e.to_string())
    })?;

    match transaction {
        Some(transaction) => Ok(Json(ApiResponse::success_with_data(transaction, None))),
        None => Err(ApiServiceError::NotFound(raw)),
    }
}

/// Handles `GET /gettxs?address=`. Returns received then sent transactions.
#[instrument(skip(config))]
async fn handle_get_transactions_by_address(
    Query(query): Query<AddressQuery>,
    State(config): State<Arc<Config>>,
) -> ApiServiceResult<impl IntoResponse> {
    let raw = query.address.ok_or(ApiServiceError::MissingParameter("address"))?;
    let address = parse_address(&raw).ok_or(ApiServiceError::InvalidAddress(raw))?;

    let transactions = TransactionService::by_address(address, config).await.map_err(|e| {
        error!(error = %e, "Failed to get transactions by address");
        ApiServiceError::StoreError(e.to_string())
    })?;

    Ok(Json(ApiResponse::success_with_data(transactions, None)))
}

pub(super) fn transaction_router(config: Arc<Config>) -> Router {
    Router::new()
        .route("/gettx", get(handle_get_transaction))
        .route("/gettxs", get(handle_get_transactions_by_address))
        .with_state(config)
}
