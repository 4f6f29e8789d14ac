use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy_primitives::{Address, B256};
use assert_matches::assert_matches;
use async_trait::async_trait;
use mockall::Sequence;
use rstest::*;
use tracing_test::traced_test;

use crate::core::client::store::{BatchWriteOutput, MockTransactionStore, StoreError};
use crate::core::client::{InMemoryTransactionStore, TransactionStore};
use crate::tests::common::{block_with_30_transactions, build_transactions};
use crate::types::{Block, Transaction};
use crate::worker::batch_writer::{BatchWriter, ChunkOutcome};

const WRITE_TIMEOUT: Duration = Duration::from_secs(30);

fn writer(store: impl TransactionStore + 'static) -> BatchWriter {
    BatchWriter::new(Arc::new(store), WRITE_TIMEOUT)
}

#[rstest]
#[tokio::test]
async fn thirty_transactions_are_written_in_two_chunks(block_with_30_transactions: Block) {
    let sizes = Arc::new(Mutex::new(Vec::new()));
    let recorded = sizes.clone();

    let mut store = MockTransactionStore::new();
    store.expect_batch_write().times(2).returning(move |items| {
        recorded.lock().unwrap().push(items.len());
        Ok(BatchWriteOutput::default())
    });

    let report = writer(store).write(&block_with_30_transactions.transactions).await;

    assert_eq!(report.chunks(), 2);
    assert!(report.is_complete());
    let mut sizes = sizes.lock().unwrap().clone();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![5, 25]);
}

#[rstest]
#[case(1, 1)]
#[case(25, 1)]
#[case(26, 2)]
#[case(50, 2)]
#[case(51, 3)]
#[case(130, 6)]
#[tokio::test]
async fn one_store_call_per_chunk(#[case] transactions: u64, #[case] chunks: usize) {
    let mut store = MockTransactionStore::new();
    store
        .expect_batch_write()
        .withf(|items| !items.is_empty() && items.len() <= 25)
        .times(chunks)
        .returning(|_| Ok(BatchWriteOutput::default()));

    let report = writer(store).write(&build_transactions(1, transactions)).await;

    assert_eq!(report.chunks(), chunks);
    assert_eq!(report.written(), chunks);
}

#[tokio::test]
async fn empty_batch_makes_no_store_call() {
    let mut store = MockTransactionStore::new();
    store.expect_batch_write().never();

    let report = writer(store).write(&[]).await;

    assert_eq!(report.chunks(), 0);
    assert!(report.is_complete());
}

#[tokio::test(start_paused = true)]
async fn only_unprocessed_items_are_resubmitted() {
    let transactions = build_transactions(7, 25);
    let tx_7 = transactions[7].clone();
    let mut seq = Sequence::new();

    let mut store = MockTransactionStore::new();
    let unprocessed = tx_7.clone();
    store
        .expect_batch_write()
        .withf(|items| items.len() == 25)
        .times(1)
        .in_sequence(&mut seq)
        .returning(move |_| Ok(BatchWriteOutput { unprocessed: vec![unprocessed.clone()] }));
    let expected = tx_7.clone();
    store
        .expect_batch_write()
        .withf(move |items| items == [expected.clone()].as_slice())
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(BatchWriteOutput::default()));

    let report = writer(store).write(&transactions).await;

    assert_eq!(report.chunks(), 1);
    assert_matches!(report.outcomes[0], ChunkOutcome::Written { attempts: 2 });
    assert_eq!(report.abandoned(), 0);
}

#[tokio::test(start_paused = true)]
#[traced_test]
async fn chunk_is_abandoned_after_three_retries() {
    let transactions = build_transactions(7, 25);
    let tx_7 = transactions[7].clone();

    let mut store = MockTransactionStore::new();
    let unprocessed = tx_7.clone();
    store
        .expect_batch_write()
        .times(4)
        .returning(move |_| Ok(BatchWriteOutput { unprocessed: vec![unprocessed.clone()] }));

    let report = writer(store).write(&transactions).await;

    assert_matches!(&report.outcomes[0], ChunkOutcome::Exhausted { attempts: 4, abandoned } => {
        assert_eq!(abandoned, &vec![tx_7]);
    });
    assert_eq!(report.abandoned(), 1);
    assert!(!report.is_complete());
    assert!(logs_contain("abandoning unprocessed items"));
}

#[tokio::test]
async fn failed_chunk_does_not_affect_the_others() {
    let transactions = build_transactions(3, 30);

    let mut store = MockTransactionStore::new();
    store.expect_batch_write().times(2).returning(|items| {
        if items.len() == 25 {
            Err(StoreError::FailedToSerializeDocument("boom".to_string()))
        } else {
            Ok(BatchWriteOutput::default())
        }
    });

    let report = writer(store).write(&transactions).await;

    assert_matches!(report.outcomes[0], ChunkOutcome::Failed { attempts: 1, .. });
    assert_matches!(report.outcomes[1], ChunkOutcome::Written { attempts: 1 });
    assert_eq!(report.failed(), 1);
    assert_eq!(report.written(), 1);
}

/// Store that never answers in time
struct StalledStore;

#[async_trait]
impl TransactionStore for StalledStore {
    async fn batch_write(&self, _items: &[Transaction]) -> Result<BatchWriteOutput, StoreError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(BatchWriteOutput::default())
    }

    async fn get_by_hash(&self, _hash: B256) -> Result<Option<Transaction>, StoreError> {
        Ok(None)
    }

    async fn get_by_from(&self, _address: Address) -> Result<Vec<Transaction>, StoreError> {
        Ok(vec![])
    }

    async fn get_by_to(&self, _address: Address) -> Result<Vec<Transaction>, StoreError> {
        Ok(vec![])
    }

    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn store_timeout_fails_the_chunk() {
    let report = writer(StalledStore).write(&build_transactions(1, 3)).await;

    assert_matches!(report.outcomes[0], ChunkOutcome::Failed { attempts: 1, error: StoreError::Timeout(t) } if t == WRITE_TIMEOUT);
}

#[tokio::test]
async fn rewriting_a_batch_leaves_one_record_per_hash() {
    let store = Arc::new(InMemoryTransactionStore::new());
    let writer = BatchWriter::new(store.clone(), WRITE_TIMEOUT);
    let transactions = build_transactions(9, 40);

    assert!(writer.write(&transactions).await.is_complete());
    assert!(writer.write(&transactions).await.is_complete());

    assert_eq!(store.len().await, 40);
    assert_eq!(store.get_by_hash(transactions[39].hash).await.unwrap(), Some(transactions[39].clone()));
}
