use std::collections::HashMap;

use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::core::client::store::{BatchWriteOutput, StoreError, TransactionStore};
use crate::types::constant::WRITE_CHUNK_SIZE;
use crate::types::Transaction;

#[derive(Debug, Default)]
struct Records {
    transactions: Vec<Transaction>,
    by_hash: HashMap<B256, usize>,
}

/// Transaction store kept in process memory. Lookups return records in first write order.
#[derive(Debug, Default)]
pub struct InMemoryTransactionStore {
    records: RwLock<Records>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.transactions.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn filter(&self, predicate: impl Fn(&Transaction) -> bool) -> Vec<Transaction> {
        self.records.read().await.transactions.iter().filter(|tx| predicate(tx)).cloned().collect()
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn batch_write(&self, items: &[Transaction]) -> Result<BatchWriteOutput, StoreError> {
        if items.len() > WRITE_CHUNK_SIZE {
            return Err(StoreError::ChunkTooLarge { size: items.len(), max: WRITE_CHUNK_SIZE });
        }

        let mut records = self.records.write().await;
        for item in items {
            match records.by_hash.get(&item.hash).copied() {
                Some(index) => records.transactions[index] = item.clone(),
                None => {
                    let index = records.transactions.len();
                    records.transactions.push(item.clone());
                    records.by_hash.insert(item.hash, index);
                }
            }
        }
        Ok(BatchWriteOutput::default())
    }

    async fn get_by_hash(&self, hash: B256) -> Result<Option<Transaction>, StoreError> {
        let records = self.records.read().await;
        Ok(records.by_hash.get(&hash).map(|index| records.transactions[*index].clone()))
    }

    async fn get_by_from(&self, address: Address) -> Result<Vec<Transaction>, StoreError> {
        Ok(self.filter(|tx| tx.from == address).await)
    }

    async fn get_by_to(&self, address: Address) -> Result<Vec<Transaction>, StoreError> {
        Ok(self.filter(|tx| tx.to == Some(address)).await)
    }

    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
