pub mod error;
pub mod memory;
pub mod sqs;

use crate::types::{RelayDelivery, TransactionBatch};
use async_trait::async_trait;
pub use error::RelayError;

/// Trait defining the ordered relay operations.
///
/// Every batch is sent under the same group key, so deliveries come back in send order.
/// Delivery is at least once: a message that is not acked is handed out again.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelayClient: Send + Sync {
    /// send - Enqueue one block batch. Identical bodies inside the deduplication window collapse.
    async fn send(&self, batch: &TransactionBatch) -> Result<(), RelayError>;

    /// receive - Next message of the group, `None` when nothing is available right now.
    async fn receive(&self) -> Result<Option<RelayDelivery>, RelayError>;

    /// ack - The message was handled, remove it for good.
    async fn ack(&self, delivery: &RelayDelivery) -> Result<(), RelayError>;

    /// nack - Make the message visible again. Past the max receive count it is dead-lettered.
    async fn nack(&self, delivery: &RelayDelivery) -> Result<(), RelayError>;

    /// Perform a health check on the relay backend
    async fn health_check(&self) -> Result<(), RelayError>;
}
