use sha3::{Digest, Sha3_256};

use super::constant::RELAY_GROUP_KEY;
use super::transaction::{Transaction, TransactionBatch};

/// Envelope handed to the ordered relay. One message per block batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayMessage {
    /// Every batch shares the same group so the relay keeps them in send order
    pub group_key: String,
    /// Content based deduplication id, hex encoded SHA3-256 of `body`
    pub dedup_id: String,
    /// JSON array of transactions
    pub body: String,
}

impl RelayMessage {
    pub fn from_body(body: String) -> Self {
        let dedup_id = content_dedup_id(&body);
        Self { group_key: RELAY_GROUP_KEY.to_string(), dedup_id, body }
    }

    pub fn from_batch(batch: &TransactionBatch) -> Result<Self, serde_json::Error> {
        Ok(Self::from_body(serde_json::to_string(&batch.transactions)?))
    }

    pub fn transactions(&self) -> Result<Vec<Transaction>, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// A received relay message together with what is needed to acknowledge it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayDelivery {
    /// Opaque handle used by `ack` / `nack`
    pub receipt: String,
    pub message: RelayMessage,
    /// How many times this message has been handed out, this delivery included
    pub receive_count: u32,
}

pub fn content_dedup_id(body: &str) -> String {
    hex::encode(Sha3_256::digest(body.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, B256, U256};

    fn batch(number: u64) -> TransactionBatch {
        TransactionBatch::new(
            number,
            vec![Transaction::new(B256::repeat_byte(number as u8), Address::ZERO, None, U256::from(1), number)],
        )
    }

    #[test]
    fn identical_batches_share_a_dedup_id() {
        let a = RelayMessage::from_batch(&batch(7)).unwrap();
        let b = RelayMessage::from_batch(&batch(7)).unwrap();
        let c = RelayMessage::from_batch(&batch(8)).unwrap();

        assert_eq!(a.dedup_id, b.dedup_id);
        assert_ne!(a.dedup_id, c.dedup_id);
        assert_eq!(a.group_key, RELAY_GROUP_KEY);
        assert_eq!(a.dedup_id.len(), 64);
    }

    #[test]
    fn body_decodes_back_to_the_batch() {
        let original = batch(3);
        let message = RelayMessage::from_batch(&original).unwrap();
        assert_eq!(message.transactions().unwrap(), original.transactions);
    }
}
