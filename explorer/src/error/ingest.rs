use thiserror::Error;

use crate::core::client::block_source::BlockSourceError;
use crate::core::client::relay::RelayError;

/// Why a single header failed to make it to the relay.
///
/// These never escape the coordinator loop: they end up in `HeaderOutcome::Failed`,
/// get logged and counted, and the loop moves on.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to fetch block {block_number}: {source}")]
    FetchFailed { block_number: u64, source: BlockSourceError },

    #[error("Fetch of block {block_number} timed out")]
    FetchTimedOut { block_number: u64 },

    #[error("Failed to relay block {block_number}: {source}")]
    RelayFailed { block_number: u64, source: RelayError },

    #[error("Relay of block {block_number} timed out")]
    RelayTimedOut { block_number: u64 },
}
