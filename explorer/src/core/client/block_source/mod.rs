pub mod error;
pub mod rpc;

use crate::types::{Block, BlockHeader};
use async_trait::async_trait;
pub use error::BlockSourceError;
use futures::stream::BoxStream;

/// Stream of new heads. Infinite while the upstream connection holds.
pub type HeaderStream = BoxStream<'static, Result<BlockHeader, BlockSourceError>>;

/// Trait defining the block source operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlockSource: Send + Sync {
    /// subscribe - Open a subscription to new block headers.
    /// Headers are neither buffered nor de-duplicated.
    async fn subscribe(&self) -> Result<HeaderStream, BlockSourceError>;

    /// fetch_block - Resolve a block height into the block with its full transactions.
    /// Fails with `BlockSourceError::NotFound` when the height does not exist yet.
    async fn fetch_block(&self, number: u64) -> Result<Block, BlockSourceError>;
}
