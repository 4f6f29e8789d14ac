use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

use super::transaction::Transaction;

/// New head announced by the block source.
///
/// `number` is optional on purpose: a header without a height is malformed and must be
/// dropped before any downstream call is made.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub number: Option<u64>,
    pub hash: Option<B256>,
}

impl BlockHeader {
    pub fn new(number: u64, hash: B256) -> Self {
        Self { number: Some(number), hash: Some(hash) }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub number: u64,
    pub transactions: Vec<Transaction>,
}
