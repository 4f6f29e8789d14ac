use alloy_primitives::{Address, B256, U256, U64};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A chain transaction as it is relayed and persisted.
///
/// Only the fields the pipeline and the read side rely on are typed. Every other
/// chain-native field (nonce, gas, input, signature, ...) is carried untouched in
/// `extra`. Quantities serialize as `0x` prefixed hex strings, so they survive JSON
/// and BSON without losing precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Primary key in the store
    pub hash: B256,
    pub from: Address,
    /// `None` for contract creations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    #[serde(default)]
    pub value: U256,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<U64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Transaction {
    pub fn new(hash: B256, from: Address, to: Option<Address>, value: U256, block_number: u64) -> Self {
        Self { hash, from, to, value, block_number: Some(U64::from(block_number)), extra: Map::new() }
    }

    /// Block height as a plain integer, if the transaction is mined.
    pub fn block_number(&self) -> Option<u64> {
        self.block_number.map(|n| n.to::<u64>())
    }
}

/// All transactions of one block. Relayed as a single message.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBatch {
    pub block_number: u64,
    pub transactions: Vec<Transaction>,
}

impl TransactionBatch {
    pub fn new(block_number: u64, transactions: Vec<Transaction>) -> Self {
        Self { block_number, transactions }
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
