use alloy_primitives::{address, Address, B256, U256};
use rstest::*;

use crate::types::{Block, BlockHeader, Transaction};

pub const ALICE: Address = address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
pub const BOB: Address = address!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");
pub const CAROL: Address = address!("cccccccccccccccccccccccccccccccccccccccc");

/// Deterministic transaction: the hash encodes `block_number` and `index`
pub fn build_transaction(block_number: u64, index: u64, from: Address, to: Option<Address>) -> Transaction {
    let hash = B256::from(U256::from(block_number * 1_000 + index));
    Transaction::new(hash, from, to, U256::from(index), block_number)
}

pub fn build_transactions(block_number: u64, count: u64) -> Vec<Transaction> {
    (0..count).map(|index| build_transaction(block_number, index, ALICE, Some(BOB))).collect()
}

pub fn build_block(number: u64, count: u64) -> Block {
    Block { number, transactions: build_transactions(number, count) }
}

pub fn build_header(number: u64) -> BlockHeader {
    BlockHeader::new(number, B256::from(U256::from(number)))
}

#[fixture]
pub fn block_with_30_transactions() -> Block {
    build_block(100, 30)
}
