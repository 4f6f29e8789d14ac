use std::sync::Arc;

use alloy_primitives::{Address, B256};
use tracing::debug;

use crate::core::client::store::StoreError;
use crate::core::config::Config;
use crate::types::Transaction;

/// Read side of the transaction store
pub struct TransactionService;

impl TransactionService {
    /// Look up a single transaction by its hash
    pub async fn by_hash(hash: B256, config: Arc<Config>) -> Result<Option<Transaction>, StoreError> {
        config.store().get_by_hash(hash).await
    }

    /// Every transaction that touches `address`.
    ///
    /// Received transactions come first, then sent ones. Nothing is de-duplicated, so a
    /// self transfer is listed twice.
    pub async fn by_address(address: Address, config: Arc<Config>) -> Result<Vec<Transaction>, StoreError> {
        let store = config.store();
        let (received, sent) = tokio::try_join!(store.get_by_to(address), store.get_by_from(address))?;
        debug!(%address, received = received.len(), sent = sent.len(), "Transactions by address");

        let mut transactions = received;
        transactions.extend(sent);
        Ok(transactions)
    }
}
