use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use futures::{stream, StreamExt};
use mockall::predicate::eq;
use rstest::*;
use tokio_util::sync::CancellationToken;
use tracing_test::traced_test;

use crate::core::client::block_source::{BlockSourceError, MockBlockSource};
use crate::core::client::relay::{MockRelayClient, RelayError};
use crate::core::client::{InMemoryRelay, RelayClient};
use crate::error::ingest::IngestError;
use crate::tests::common::{build_block, build_header};
use crate::types::params::service::ServiceParams;
use crate::types::BlockHeader;
use crate::worker::coordinator::{HeaderOutcome, IngestionCoordinator};

fn coordinator(block_source: MockBlockSource, relay: Arc<dyn RelayClient>) -> IngestionCoordinator {
    IngestionCoordinator::new(Arc::new(block_source), relay, ServiceParams::default(), CancellationToken::new())
}

#[rstest]
#[tokio::test]
async fn header_without_number_makes_no_downstream_call() {
    let mut block_source = MockBlockSource::new();
    block_source.expect_fetch_block().never();
    let mut relay = MockRelayClient::new();
    relay.expect_send().never();

    let outcome = coordinator(block_source, Arc::new(relay)).process_header(BlockHeader::default()).await;

    assert_matches!(outcome, HeaderOutcome::Discarded);
}

#[rstest]
#[tokio::test]
async fn block_is_forwarded_as_one_batch() {
    let mut block_source = MockBlockSource::new();
    block_source.expect_fetch_block().with(eq(100)).times(1).returning(|n| Ok(build_block(n, 30)));
    let mut relay = MockRelayClient::new();
    relay
        .expect_send()
        .withf(|batch| batch.block_number == 100 && batch.len() == 30)
        .times(1)
        .returning(|_| Ok(()));

    let outcome = coordinator(block_source, Arc::new(relay)).process_header(build_header(100)).await;

    assert_matches!(outcome, HeaderOutcome::Done { block_number: 100, transactions: 30 });
}

#[rstest]
#[tokio::test]
async fn empty_block_is_done_without_relaying() {
    let mut block_source = MockBlockSource::new();
    block_source.expect_fetch_block().times(1).returning(|n| Ok(build_block(n, 0)));
    let mut relay = MockRelayClient::new();
    relay.expect_send().never();

    let outcome = coordinator(block_source, Arc::new(relay)).process_header(build_header(5)).await;

    assert_matches!(outcome, HeaderOutcome::Done { block_number: 5, transactions: 0 });
}

#[rstest]
#[tokio::test]
#[traced_test]
async fn missing_block_is_lost_without_retry() {
    let mut block_source = MockBlockSource::new();
    block_source.expect_fetch_block().times(1).returning(|n| Err(BlockSourceError::NotFound(n)));
    let mut relay = MockRelayClient::new();
    relay.expect_send().never();

    let outcome = coordinator(block_source, Arc::new(relay)).process_header(build_header(8)).await;

    assert_matches!(
        outcome,
        HeaderOutcome::Failed(IngestError::FetchFailed { block_number: 8, source: BlockSourceError::NotFound(8) })
    );
    assert!(logs_contain("Block lost"));
    assert!(logs_contain("transient=false"));
}

#[rstest]
#[tokio::test]
#[traced_test]
async fn fetch_timeout_is_lost_as_transient() {
    let mut block_source = MockBlockSource::new();
    block_source
        .expect_fetch_block()
        .times(1)
        .returning(|_| Err(BlockSourceError::Timeout(Duration::from_secs(30))));
    let mut relay = MockRelayClient::new();
    relay.expect_send().never();

    let outcome = coordinator(block_source, Arc::new(relay)).process_header(build_header(9)).await;

    assert_matches!(outcome, HeaderOutcome::Failed(IngestError::FetchFailed { block_number: 9, .. }));
    assert!(logs_contain("transient=true"));
}

#[rstest]
#[tokio::test]
async fn relay_failure_is_isolated_to_its_block() {
    let mut block_source = MockBlockSource::new();
    block_source.expect_fetch_block().times(2).returning(|n| Ok(build_block(n, 2)));
    let mut relay = MockRelayClient::new();
    relay
        .expect_send()
        .times(2)
        .returning(|batch| match batch.block_number {
            1 => Err(RelayError::MalformedMessage("rejected")),
            _ => Ok(()),
        });

    let coordinator = coordinator(block_source, Arc::new(relay));
    let first = coordinator.process_header(build_header(1)).await;
    let second = coordinator.process_header(build_header(2)).await;

    assert_matches!(first, HeaderOutcome::Failed(IngestError::RelayFailed { block_number: 1, .. }));
    assert_matches!(second, HeaderOutcome::Done { block_number: 2, transactions: 2 });
}

#[rstest]
#[tokio::test]
async fn run_relays_every_valid_header_until_cancelled() {
    let subscriptions = Arc::new(AtomicUsize::new(0));
    let calls = subscriptions.clone();

    let mut block_source = MockBlockSource::new();
    block_source.expect_subscribe().returning(move || {
        if calls.fetch_add(1, Ordering::SeqCst) == 0 {
            let headers = vec![Ok(build_header(1)), Ok(BlockHeader::default()), Ok(build_header(2)), Ok(build_header(3))];
            Ok(stream::iter(headers).boxed())
        } else {
            Ok(stream::pending().boxed())
        }
    });
    block_source.expect_fetch_block().times(3).returning(|n| Ok(build_block(n, 4)));

    let relay = Arc::new(InMemoryRelay::new(3));
    let token = CancellationToken::new();
    let coordinator =
        IngestionCoordinator::new(Arc::new(block_source), relay.clone(), ServiceParams::default(), token.clone());
    let handle = tokio::spawn(async move { coordinator.run().await });

    tokio::time::timeout(Duration::from_secs(10), async {
        while relay.pending().await < 3 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("blocks were not relayed in time");

    token.cancel();
    tokio::time::timeout(Duration::from_secs(5), handle).await.expect("coordinator did not stop").unwrap();

    let mut relayed = BTreeSet::new();
    while let Some(delivery) = relay.receive().await.unwrap() {
        let transactions = delivery.message.transactions().unwrap();
        relayed.insert(transactions[0].block_number().unwrap());
        relay.ack(&delivery).await.unwrap();
    }
    assert_eq!(relayed, BTreeSet::from([1, 2, 3]));
    assert!(subscriptions.load(Ordering::SeqCst) >= 1);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn failed_subscription_is_retried() {
    let subscriptions = Arc::new(AtomicUsize::new(0));
    let calls = subscriptions.clone();

    let mut block_source = MockBlockSource::new();
    block_source.expect_subscribe().returning(move || match calls.fetch_add(1, Ordering::SeqCst) {
        0 => Err(BlockSourceError::SubscriptionError("connection reset".to_string())),
        _ => Ok(stream::iter(vec![Ok(build_header(42))]).chain(stream::pending()).boxed()),
    });
    block_source.expect_fetch_block().with(eq(42)).times(1).returning(|n| Ok(build_block(n, 1)));

    let relay = Arc::new(InMemoryRelay::new(3));
    let token = CancellationToken::new();
    let coordinator =
        IngestionCoordinator::new(Arc::new(block_source), relay.clone(), ServiceParams::default(), token.clone());
    let handle = tokio::spawn(async move { coordinator.run().await });

    while relay.pending().await < 1 {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    token.cancel();
    handle.await.unwrap();

    assert_eq!(subscriptions.load(Ordering::SeqCst), 2);
}

#[rstest]
#[tokio::test(start_paused = true)]
#[traced_test]
async fn malformed_header_does_not_drop_the_following_heads() {
    let subscriptions = Arc::new(AtomicUsize::new(0));
    let calls = subscriptions.clone();

    let mut block_source = MockBlockSource::new();
    block_source.expect_subscribe().returning(move || match calls.fetch_add(1, Ordering::SeqCst) {
        0 => {
            let headers = vec![
                Ok(build_header(1)),
                Err(BlockSourceError::MalformedHeader("invalid type: string".to_string())),
                Ok(build_header(2)),
            ];
            Ok(stream::iter(headers).chain(stream::pending()).boxed())
        }
        _ => Ok(stream::pending().boxed()),
    });
    block_source.expect_fetch_block().times(2).returning(|n| Ok(build_block(n, 1)));

    let relay = Arc::new(InMemoryRelay::new(3));
    let token = CancellationToken::new();
    let coordinator =
        IngestionCoordinator::new(Arc::new(block_source), relay.clone(), ServiceParams::default(), token.clone());
    let handle = tokio::spawn(async move { coordinator.run().await });

    let _ = tokio::time::timeout(Duration::from_secs(30), async {
        while relay.pending().await < 2 {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    })
    .await;
    token.cancel();
    handle.await.unwrap();

    let mut relayed = BTreeSet::new();
    while let Some(delivery) = relay.receive().await.unwrap() {
        relayed.insert(delivery.message.transactions().unwrap()[0].block_number().unwrap());
        relay.ack(&delivery).await.unwrap();
    }
    assert_eq!(relayed, BTreeSet::from([1, 2]));
    assert_eq!(subscriptions.load(Ordering::SeqCst), 1);
    assert!(logs_contain("Malformed header, discarding"));
}
