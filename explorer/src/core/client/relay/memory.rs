use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::core::client::relay::{RelayClient, RelayError};
use crate::types::constant::RELAY_DEDUP_WINDOW;
use crate::types::{RelayDelivery, RelayMessage, TransactionBatch};

#[derive(Debug)]
struct Entry {
    message: RelayMessage,
    receive_count: u32,
}

#[derive(Debug, Default)]
struct RelayState {
    pending: VecDeque<Entry>,
    /// receipt -> message currently handed out
    in_flight: HashMap<String, Entry>,
    /// groups with a message in flight; their next message stays hidden until ack or nack
    busy_groups: HashSet<String>,
    recent: VecDeque<(Instant, String)>,
    dead_letters: Vec<RelayMessage>,
    next_receipt: u64,
}

impl RelayState {
    fn forget_expired(&mut self, now: Instant, window: Duration) {
        while self.recent.front().is_some_and(|(sent_at, _)| now.duration_since(*sent_at) >= window) {
            self.recent.pop_front();
        }
    }

    fn is_duplicate(&self, dedup_id: &str) -> bool {
        self.recent.iter().any(|(_, id)| id == dedup_id)
    }
}

/// In-process relay with the same delivery rules as the SQS FIFO queue:
/// per group FIFO with one message in flight, content based deduplication inside a window,
/// redelivery on nack and a dead-letter list once `max_receive_count` is reached.
#[derive(Debug)]
pub struct InMemoryRelay {
    state: Mutex<RelayState>,
    max_receive_count: u32,
    dedup_window: Duration,
}

impl InMemoryRelay {
    pub fn new(max_receive_count: u32) -> Self {
        Self::with_dedup_window(max_receive_count, RELAY_DEDUP_WINDOW)
    }

    pub fn with_dedup_window(max_receive_count: u32, dedup_window: Duration) -> Self {
        Self { state: Mutex::new(RelayState::default()), max_receive_count, dedup_window }
    }

    /// Messages that are neither in flight nor dead-lettered
    pub async fn pending(&self) -> usize {
        self.state.lock().await.pending.len()
    }

    pub async fn dead_letters(&self) -> Vec<RelayMessage> {
        self.state.lock().await.dead_letters.clone()
    }
}

#[async_trait]
impl RelayClient for InMemoryRelay {
    async fn send(&self, batch: &TransactionBatch) -> Result<(), RelayError> {
        let message = RelayMessage::from_batch(batch)?;
        let now = Instant::now();

        let mut state = self.state.lock().await;
        state.forget_expired(now, self.dedup_window);
        if state.is_duplicate(&message.dedup_id) {
            tracing::debug!(
                block_number = batch.block_number,
                dedup_id = %message.dedup_id,
                "Dropping duplicate batch inside the deduplication window"
            );
            return Ok(());
        }

        state.recent.push_back((now, message.dedup_id.clone()));
        state.pending.push_back(Entry { message, receive_count: 0 });
        Ok(())
    }

    async fn receive(&self) -> Result<Option<RelayDelivery>, RelayError> {
        let mut state = self.state.lock().await;

        let Some(position) = state.pending.iter().position(|entry| !state.busy_groups.contains(&entry.message.group_key))
        else {
            return Ok(None);
        };
        let Some(mut entry) = state.pending.remove(position) else {
            return Ok(None);
        };

        entry.receive_count += 1;
        state.next_receipt += 1;
        let receipt = format!("receipt-{}", state.next_receipt);
        let delivery =
            RelayDelivery { receipt: receipt.clone(), message: entry.message.clone(), receive_count: entry.receive_count };

        state.busy_groups.insert(entry.message.group_key.clone());
        state.in_flight.insert(receipt, entry);
        Ok(Some(delivery))
    }

    async fn ack(&self, delivery: &RelayDelivery) -> Result<(), RelayError> {
        let mut state = self.state.lock().await;
        let entry =
            state.in_flight.remove(&delivery.receipt).ok_or_else(|| RelayError::UnknownReceipt(delivery.receipt.clone()))?;
        state.busy_groups.remove(&entry.message.group_key);
        Ok(())
    }

    async fn nack(&self, delivery: &RelayDelivery) -> Result<(), RelayError> {
        let mut state = self.state.lock().await;
        let entry =
            state.in_flight.remove(&delivery.receipt).ok_or_else(|| RelayError::UnknownReceipt(delivery.receipt.clone()))?;
        state.busy_groups.remove(&entry.message.group_key);

        if entry.receive_count >= self.max_receive_count {
            tracing::warn!(
                dedup_id = %entry.message.dedup_id,
                receive_count = entry.receive_count,
                "Message exceeded max receive count, moving to dead letters"
            );
            state.dead_letters.push(entry.message);
        } else {
            // Head of its group again, ahead of anything sent after it
            state.pending.push_front(entry);
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), RelayError> {
        Ok(())
    }
}
