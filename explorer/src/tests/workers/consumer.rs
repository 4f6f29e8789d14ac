use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use rstest::*;
use tokio_util::sync::CancellationToken;

use crate::core::client::relay::MockRelayClient;
use crate::core::client::store::{BatchWriteOutput, MockTransactionStore};
use crate::core::client::{InMemoryRelay, InMemoryTransactionStore, RelayClient, TransactionStore};
use crate::tests::common::{build_transactions, ALICE};
use crate::types::{RelayDelivery, RelayMessage, TransactionBatch};
use crate::worker::batch_writer::BatchWriter;
use crate::worker::consumer::{DeliveryOutcome, RelayConsumer};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

fn consumer(relay: Arc<dyn RelayClient>, store: Arc<dyn TransactionStore>) -> RelayConsumer {
    RelayConsumer::new(relay, BatchWriter::new(store, Duration::from_secs(30)), POLL_INTERVAL, CancellationToken::new())
}

#[rstest]
#[tokio::test]
async fn delivery_is_written_then_acked() {
    let relay = Arc::new(InMemoryRelay::new(3));
    let store = Arc::new(InMemoryTransactionStore::new());
    let transactions = build_transactions(12, 30);
    relay.send(&TransactionBatch::new(12, transactions.clone())).await.unwrap();

    let delivery = relay.receive().await.unwrap().unwrap();
    let outcome = consumer(relay.clone(), store.clone()).handle_delivery(&delivery).await.unwrap();

    assert_matches!(outcome, DeliveryOutcome::Handled(report) if report.is_complete() && report.chunks() == 2);
    assert_eq!(store.len().await, 30);
    assert_eq!(relay.pending().await, 0);
    // acked: nothing comes back
    assert!(relay.receive().await.unwrap().is_none());
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn abandoned_items_do_not_block_the_ack() {
    let mut store = MockTransactionStore::new();
    store.expect_batch_write().returning(|items| Ok(BatchWriteOutput { unprocessed: items[..1].to_vec() }));

    let mut relay = MockRelayClient::new();
    relay.expect_ack().times(1).returning(|_| Ok(()));
    relay.expect_nack().never();

    let delivery = RelayDelivery {
        receipt: "receipt-1".to_string(),
        message: RelayMessage::from_batch(&TransactionBatch::new(3, build_transactions(3, 5))).unwrap(),
        receive_count: 1,
    };
    let outcome = consumer(Arc::new(relay), Arc::new(store)).handle_delivery(&delivery).await.unwrap();

    assert_matches!(outcome, DeliveryOutcome::Handled(report) if report.abandoned() == 1);
}

#[rstest]
#[tokio::test]
async fn malformed_body_is_nacked() {
    let mut store = MockTransactionStore::new();
    store.expect_batch_write().never();

    let mut relay = MockRelayClient::new();
    relay.expect_nack().times(1).returning(|_| Ok(()));
    relay.expect_ack().never();

    let delivery = RelayDelivery {
        receipt: "receipt-1".to_string(),
        message: RelayMessage::from_body("{\"not\": \"a list\"}".to_string()),
        receive_count: 1,
    };
    let outcome = consumer(Arc::new(relay), Arc::new(store)).handle_delivery(&delivery).await.unwrap();

    assert_matches!(outcome, DeliveryOutcome::Rejected);
}

#[rstest]
#[tokio::test]
async fn run_drains_the_relay_in_order() {
    let relay = Arc::new(InMemoryRelay::new(3));
    let store = Arc::new(InMemoryTransactionStore::new());
    for block_number in 1..=3 {
        relay.send(&TransactionBatch::new(block_number, build_transactions(block_number, 10))).await.unwrap();
    }

    let token = CancellationToken::new();
    let consumer = RelayConsumer::new(
        relay.clone(),
        BatchWriter::new(store.clone(), Duration::from_secs(30)),
        POLL_INTERVAL,
        token.clone(),
    );
    let handle = tokio::spawn(async move { consumer.run().await });

    tokio::time::timeout(Duration::from_secs(10), async {
        while store.len().await < 30 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("relay was not drained in time");

    token.cancel();
    handle.await.unwrap();

    assert_eq!(relay.pending().await, 0);
    assert!(relay.dead_letters().await.is_empty());

    let written: Vec<u64> =
        store.get_by_from(ALICE).await.unwrap().iter().filter_map(|tx| tx.block_number()).collect();
    let mut sorted = written.clone();
    sorted.sort_unstable();
    assert_eq!(written, sorted);
}
