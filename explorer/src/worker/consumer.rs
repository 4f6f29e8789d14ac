use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::core::client::relay::RelayError;
use crate::core::client::RelayClient;
use crate::types::RelayDelivery;
use crate::utils::metrics::EXPLORER_METRICS;
use crate::worker::batch_writer::{log_report, BatchWriteReport, BatchWriter};

const ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// What happened to one relay delivery
#[derive(Debug)]
pub enum DeliveryOutcome {
    /// Every chunk resolved and the message was acked
    Handled(BatchWriteReport),
    /// The body did not decode into transactions, the message was nacked
    Rejected,
}

/// Drains the relay into the store, one message at a time so the group stays in order.
pub struct RelayConsumer {
    relay: Arc<dyn RelayClient>,
    writer: BatchWriter,
    poll_interval: Duration,
    cancellation_token: CancellationToken,
}

impl RelayConsumer {
    pub fn new(
        relay: Arc<dyn RelayClient>,
        writer: BatchWriter,
        poll_interval: Duration,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self { relay, writer, poll_interval, cancellation_token }
    }

    /// run - Receive, write and ack until the cancellation token fires.
    /// A message being written when the token fires is finished first.
    pub async fn run(&self) {
        info!("Starting relay consumer");

        loop {
            let received = tokio::select! {
                biased;
                _ = self.cancellation_token.cancelled() => break,
                received = self.relay.receive() => received,
            };

            let idle = match received {
                Ok(Some(delivery)) => {
                    let span = info_span!("delivery", stage = "consume", receive_count = delivery.receive_count);
                    if let Err(e) = self.handle_delivery(&delivery).instrument(span).await {
                        error!(error = %e, "Failed to settle relay message");
                        Some(ERROR_BACKOFF)
                    } else {
                        None
                    }
                }
                Ok(None) => Some(self.poll_interval),
                Err(e) => {
                    error!(error = %e, "Failed to receive from the relay");
                    Some(ERROR_BACKOFF)
                }
            };

            if let Some(delay) = idle {
                tokio::select! {
                    _ = self.cancellation_token.cancelled() => break,
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }

        info!("Relay consumer stopped");
    }

    /// handle_delivery - Persist the transactions of one message, then ack it.
    ///
    /// The ack happens once every chunk is resolved, abandoned items included. Those are
    /// already logged by the writer. An undecodable body is nacked so it can reach the
    /// dead-letter queue.
    pub async fn handle_delivery(&self, delivery: &RelayDelivery) -> Result<DeliveryOutcome, RelayError> {
        let transactions = match delivery.message.transactions() {
            Ok(transactions) => transactions,
            Err(e) => {
                EXPLORER_METRICS.relay_messages_rejected.add(1, &[]);
                warn!(error = %e, dedup_id = %delivery.message.dedup_id, "Malformed relay message, rejecting");
                self.relay.nack(delivery).await?;
                return Ok(DeliveryOutcome::Rejected);
            }
        };

        let block_number = transactions.first().and_then(|tx| tx.block_number());
        debug!(block_number = ?block_number, transactions = transactions.len(), "Writing relay message");

        let report = self.writer.write(&transactions).await;
        log_report(block_number, &report);

        self.relay.ack(delivery).await?;
        EXPLORER_METRICS.relay_messages_handled.add(1, &[]);
        Ok(DeliveryOutcome::Handled(report))
    }
}
