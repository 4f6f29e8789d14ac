use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use rstest::*;
use serde_json::Value;
use tower::ServiceExt;

use crate::core::client::price::{MockQuoteSource, PriceError};
use crate::core::client::store::{MockTransactionStore, StoreError};
use crate::core::client::{InMemoryTransactionStore, TransactionStore};
use crate::core::config::Config;
use crate::server::server_router;
use crate::tests::common::{build_transaction, ALICE, BOB, CAROL};
use crate::tests::config::TestConfigBuilder;

async fn get(config: Arc<Config>, uri: &str) -> (StatusCode, Value) {
    let response = server_router(config).oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[fixture]
async fn populated_config() -> Arc<Config> {
    let store = Arc::new(InMemoryTransactionStore::new());
    store
        .batch_write(&[
            build_transaction(1, 0, ALICE, Some(BOB)),
            build_transaction(1, 1, CAROL, Some(ALICE)),
            build_transaction(1, 2, ALICE, Some(ALICE)),
        ])
        .await
        .unwrap();
    TestConfigBuilder::new().configure_store(store).build()
}

#[rstest]
#[tokio::test]
async fn health_is_up() {
    let response = server_router(TestConfigBuilder::new().build())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"UP");
}

#[rstest]
#[tokio::test]
async fn get_transaction_by_hash(#[future] populated_config: Arc<Config>) {
    let tx = build_transaction(1, 1, CAROL, Some(ALICE));

    let (status, body) = get(populated_config.await, &format!("/gettx?hash={}", tx.hash)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], serde_json::to_value(&tx).unwrap());
}

#[rstest]
#[case("/gettx", StatusCode::BAD_REQUEST)]
#[case("/gettx?hash=0x1234", StatusCode::BAD_REQUEST)]
#[case("/gettx?hash=0x00000000000000000000000000000000000000000000000000000000deadbeef", StatusCode::NOT_FOUND)]
#[case("/gettxs", StatusCode::BAD_REQUEST)]
#[case("/gettxs?address=0xnothex", StatusCode::BAD_REQUEST)]
#[case("/unknown", StatusCode::NOT_FOUND)]
#[tokio::test]
async fn invalid_requests(#[future] populated_config: Arc<Config>, #[case] uri: &str, #[case] expected: StatusCode) {
    let (status, body) = get(populated_config.await, uri).await;

    assert_eq!(status, expected);
    assert_eq!(body["success"], false);
}

#[rstest]
#[tokio::test]
async fn transactions_by_address_lists_received_then_sent(#[future] populated_config: Arc<Config>) {
    let (status, body) = get(populated_config.await, &format!("/gettxs?address={}", ALICE)).await;

    assert_eq!(status, StatusCode::OK);
    let hashes: Vec<String> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|tx| tx["hash"].as_str().unwrap().to_string())
        .collect();
    let expected: Vec<String> = [(1, 1), (1, 2), (1, 0), (1, 2)]
        .iter()
        .map(|(block, index)| build_transaction(*block, *index, ALICE, None).hash.to_string())
        .collect();
    // the self transfer shows up once as received and once as sent
    assert_eq!(hashes, expected);
}

#[rstest]
#[tokio::test]
async fn store_failure_is_an_internal_error() {
    let mut store = MockTransactionStore::new();
    store.expect_get_by_to().returning(|_| Err(StoreError::FailedToSerializeDocument("boom".to_string())));
    store.expect_get_by_from().returning(|_| Ok(vec![]));
    let config = TestConfigBuilder::new().configure_store(Arc::new(store)).build();

    let (status, body) = get(config, &format!("/gettxs?address={}", BOB)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "error calling API");
}

#[rstest]
#[tokio::test]
async fn eth_price_is_served_and_cached() {
    let mut quote_source = MockQuoteSource::new();
    quote_source.expect_fetch_usd_price().times(1).returning(|_| Ok(3210.0));
    let config = TestConfigBuilder::new().configure_quote_source(quote_source).build();

    let (status, first) = get(config.clone(), "/getethprice").await;
    let (_, second) = get(config, "/getethprice").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["data"]["usdPrice"], 3210.0);
    assert!(first["data"]["lastUpdated"].is_i64());
    assert_eq!(first, second);
}

#[rstest]
#[tokio::test]
async fn quote_failure_is_an_internal_error() {
    let mut quote_source = MockQuoteSource::new();
    quote_source.expect_fetch_usd_price().returning(|c| Err(PriceError::MissingQuote(c.to_string())));
    let config = TestConfigBuilder::new().configure_quote_source(quote_source).build();

    let (status, body) = get(config, "/getethprice").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
}
