use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use opentelemetry::KeyValue;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, field, info, info_span, warn, Instrument, Span};

use crate::core::client::block_source::BlockSourceError;
use crate::core::client::relay::RelayError;
use crate::core::client::{BlockSource, RelayClient};
use crate::error::ingest::IngestError;
use crate::types::params::service::ServiceParams;
use crate::types::{BlockHeader, TransactionBatch};
use crate::utils::metrics::EXPLORER_METRICS;

const RESUBSCRIBE_BASE_DELAY: Duration = Duration::from_secs(1);
const RESUBSCRIBE_MAX_DELAY: Duration = Duration::from_secs(60);

/// Where a single header ended up.
#[derive(Debug)]
pub enum HeaderOutcome {
    /// The block was fetched and, unless it had no transactions, handed to the relay
    Done { block_number: u64, transactions: usize },
    /// The header carried no block number, nothing downstream was called
    Discarded,
    /// Fetching or relaying failed. The block is lost.
    Failed(IngestError),
}

impl HeaderOutcome {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done { .. })
    }
}

/// Turns new heads into relayed block batches.
///
/// A subscription loop feeds headers into a bounded channel and a dispatcher drains it into
/// at most `max_concurrent_headers` tasks. Headers are independent: a failure is logged and
/// counted, never retried, and never stops the loop.
#[derive(Clone)]
pub struct IngestionCoordinator {
    block_source: Arc<dyn BlockSource>,
    relay: Arc<dyn RelayClient>,
    params: ServiceParams,
    cancellation_token: CancellationToken,
}

impl IngestionCoordinator {
    pub fn new(
        block_source: Arc<dyn BlockSource>,
        relay: Arc<dyn RelayClient>,
        params: ServiceParams,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self { block_source, relay, params, cancellation_token }
    }

    /// process_header - Validate a header, fetch its block and forward the transactions
    /// to the relay as one batch.
    pub async fn process_header(&self, header: BlockHeader) -> HeaderOutcome {
        EXPLORER_METRICS.headers_received.add(1, &[]);

        let Some(block_number) = header.number else {
            EXPLORER_METRICS.headers_discarded.add(1, &[]);
            warn!(hash = ?header.hash, "Header without block number, discarding");
            return HeaderOutcome::Discarded;
        };
        Span::current().record("block_number", block_number);

        let outcome = match self.ingest(block_number).await {
            Ok(transactions) => HeaderOutcome::Done { block_number, transactions },
            Err(err) => HeaderOutcome::Failed(err),
        };
        Self::record_outcome(&outcome);
        outcome
    }

    async fn ingest(&self, block_number: u64) -> Result<usize, IngestError> {
        debug!("Fetching block");
        let block = tokio::time::timeout(self.params.fetch_timeout, self.block_source.fetch_block(block_number))
            .await
            .map_err(|_| IngestError::FetchTimedOut { block_number })?
            .map_err(|source| IngestError::FetchFailed { block_number, source })?;

        let batch = TransactionBatch::new(block.number, block.transactions);
        if batch.is_empty() {
            debug!("Block has no transactions, nothing to relay");
            return Ok(0);
        }

        debug!(transactions = batch.len(), "Forwarding block to the relay");
        tokio::time::timeout(self.params.relay_timeout, self.relay.send(&batch))
            .await
            .map_err(|_| IngestError::RelayTimedOut { block_number })?
            .map_err(|source| IngestError::RelayFailed { block_number, source })?;

        Ok(batch.len())
    }

    fn record_outcome(outcome: &HeaderOutcome) {
        match outcome {
            HeaderOutcome::Done { block_number, transactions } => {
                EXPLORER_METRICS.latest_block.record(*block_number, &[]);
                if *transactions > 0 {
                    EXPLORER_METRICS.blocks_forwarded.add(1, &[]);
                }
                info!(transactions, "Block ingested");
            }
            HeaderOutcome::Failed(err) => {
                let (stage, transient) = match err {
                    IngestError::FetchFailed { source, .. } => ("fetch", source.is_transient()),
                    IngestError::FetchTimedOut { .. } => ("fetch", true),
                    IngestError::RelayFailed { source, .. } => ("relay", !matches!(source, RelayError::MalformedMessage(_))),
                    IngestError::RelayTimedOut { .. } => ("relay", true),
                };
                EXPLORER_METRICS
                    .blocks_lost
                    .add(1, &[KeyValue::new("stage", stage), KeyValue::new("transient", transient)]);
                error!(error = %err, stage, transient, "Block lost");
            }
            HeaderOutcome::Discarded => {}
        }
    }

    /// run - Ingest new heads until the cancellation token fires, then drain in-flight headers
    pub async fn run(&self) {
        let (sender, mut receiver) = mpsc::channel(self.params.header_queue_capacity);
        let subscription = tokio::spawn(self.clone().subscribe_loop(sender));

        let mut tasks = JoinSet::new();
        let max_concurrent_tasks = self.params.max_concurrent_headers;
        info!("Starting ingestion (pool_size={})", max_concurrent_tasks);

        loop {
            tokio::select! {
                biased;

                Some(result) = tasks.join_next(), if !tasks.is_empty() => {
                    Self::handle_task_result(result);
                }

                _ = self.cancellation_token.cancelled() => {
                    info!("Shutdown signal received, stopping ingestion");
                    break;
                }

                header = receiver.recv(), if tasks.len() < max_concurrent_tasks => {
                    let Some(header) = header else {
                        info!("Header channel closed, stopping ingestion");
                        break;
                    };
                    let coordinator = self.clone();
                    let span = info_span!("header", stage = "ingest", block_number = field::Empty);
                    tasks.spawn(async move { coordinator.process_header(header).await }.instrument(span));
                }
            }
        }

        receiver.close();
        if !tasks.is_empty() {
            info!("Waiting for {} in-flight headers", tasks.len());
        }
        while let Some(result) = tasks.join_next().await {
            Self::handle_task_result(result);
        }
        if let Err(e) = subscription.await {
            error!("Subscription task panicked: {:?}", e);
        }
        info!("Ingestion stopped");
    }

    fn handle_task_result(result: Result<HeaderOutcome, tokio::task::JoinError>) {
        if let Err(e) = result {
            error!("Header task panicked or was cancelled: {:?}", e);
        }
    }

    /// Push headers into `sender` for as long as the token is live, resubscribing when the
    /// stream fails or ends. A full channel pauses the subscription.
    async fn subscribe_loop(self, sender: mpsc::Sender<BlockHeader>) {
        let mut delay = RESUBSCRIBE_BASE_DELAY;

        while !self.cancellation_token.is_cancelled() {
            let subscribed = tokio::select! {
                _ = self.cancellation_token.cancelled() => return,
                subscribed = self.block_source.subscribe() => subscribed,
            };
            match subscribed {
                Ok(mut stream) => {
                    info!("Subscribed to new heads");
                    loop {
                        let next = tokio::select! {
                            _ = self.cancellation_token.cancelled() => return,
                            next = stream.next() => next,
                        };
                        match next {
                            Some(Ok(header)) => {
                                delay = RESUBSCRIBE_BASE_DELAY;
                                tokio::select! {
                                    _ = self.cancellation_token.cancelled() => return,
                                    sent = sender.send(header) => {
                                        if sent.is_err() {
                                            return;
                                        }
                                    }
                                }
                            }
                            Some(Err(BlockSourceError::MalformedHeader(e))) => {
                                EXPLORER_METRICS.headers_received.add(1, &[]);
                                EXPLORER_METRICS.headers_discarded.add(1, &[]);
                                warn!(error = %e, "Malformed header, discarding");
                            }
                            Some(Err(e)) => {
                                warn!(error = %e, "Subscription failed");
                                break;
                            }
                            None => {
                                warn!("Subscription ended");
                                break;
                            }
                        }
                    }
                }
                Err(e) => error!(error = %e, "Failed to subscribe to new heads"),
            }

            info!("Resubscribing in {:?}", delay);
            tokio::select! {
                _ = self.cancellation_token.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }
            delay = next_delay(delay);
        }
    }
}

fn next_delay(delay: Duration) -> Duration {
    (delay * 2).min(RESUBSCRIBE_MAX_DELAY)
}
