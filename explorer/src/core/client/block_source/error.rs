use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlockSourceError {
    #[error("Block {0} not found")]
    NotFound(u64),

    #[error("Failed to connect to block source: {0}")]
    ConnectionError(String),

    #[error("Subscription failed: {0}")]
    SubscriptionError(String),

    /// A single pushed head could not be decoded. The subscription itself is still live.
    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    #[error("Upstream call failed: {0}")]
    TransportError(String),

    #[error("Upstream call timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Failed to decode block {block_number}: {error}")]
    DecodeError { block_number: u64, error: serde_json::Error },
}

impl BlockSourceError {
    /// Whether the same call could succeed later. `NotFound` is a drop, not a retry.
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::NotFound(_) | Self::MalformedHeader(_) | Self::DecodeError { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::time::Duration;

    #[rstest]
    #[case(BlockSourceError::NotFound(7), false)]
    #[case(BlockSourceError::MalformedHeader("missing field".to_string()), false)]
    #[case(BlockSourceError::TransportError("connection reset".to_string()), true)]
    #[case(BlockSourceError::Timeout(Duration::from_secs(30)), true)]
    #[case(BlockSourceError::SubscriptionError("closed".to_string()), true)]
    fn missing_or_malformed_data_is_not_transient(#[case] error: BlockSourceError, #[case] transient: bool) {
        assert_eq!(error.is_transient(), transient);
    }

    #[test]
    fn undecodable_block_is_not_transient() {
        let error = serde_json::from_str::<u64>("\"0x\"").unwrap_err();
        assert!(!BlockSourceError::DecodeError { block_number: 3, error }.is_transient());
    }
}
