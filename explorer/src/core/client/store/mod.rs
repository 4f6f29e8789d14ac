pub mod error;
pub mod memory;
pub mod mongodb;

use crate::types::Transaction;
use alloy_primitives::{Address, B256};
use async_trait::async_trait;
pub use error::StoreError;

/// Result of a store batch write. Items listed in `unprocessed` were not persisted and may be resubmitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchWriteOutput {
    pub unprocessed: Vec<Transaction>,
}

impl BatchWriteOutput {
    pub fn is_complete(&self) -> bool {
        self.unprocessed.is_empty()
    }
}

/// Trait defining the transaction store operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// batch_write - Upsert up to 25 transactions keyed by hash.
    /// Writing the same transaction twice leaves a single record.
    async fn batch_write(&self, items: &[Transaction]) -> Result<BatchWriteOutput, StoreError>;

    /// get_by_hash - Point lookup on the primary key
    async fn get_by_hash(&self, hash: B256) -> Result<Option<Transaction>, StoreError>;

    /// get_by_from - Every transaction sent by `address`
    async fn get_by_from(&self, address: Address) -> Result<Vec<Transaction>, StoreError>;

    /// get_by_to - Every transaction received by `address`
    async fn get_by_to(&self, address: Address) -> Result<Vec<Transaction>, StoreError>;

    /// ensure_indexes - Unique index on `hash`, secondary indexes on `from` and `to`
    async fn ensure_indexes(&self) -> Result<(), StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
