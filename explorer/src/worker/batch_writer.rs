use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use opentelemetry::KeyValue;
use tracing::{debug, error, info, warn};

use crate::core::client::store::{StoreError, TransactionStore};
use crate::types::constant::{CHUNK_RETRY_BASE_DELAY, MAX_CHUNK_RETRIES, WRITE_CHUNK_SIZE};
use crate::types::Transaction;
use crate::utils::metrics::EXPLORER_METRICS;

/// chunk_batch - Split a batch into positional chunks of at most `WRITE_CHUNK_SIZE` items.
/// Produces `ceil(N / 25)` chunks, order preserved, only the last one may be shorter.
pub fn chunk_batch(transactions: &[Transaction]) -> Vec<&[Transaction]> {
    transactions.chunks(WRITE_CHUNK_SIZE).collect()
}

/// How a single chunk ended. No outcome is an error of the batch as a whole.
#[derive(Debug)]
pub enum ChunkOutcome {
    /// Every item persisted
    Written { attempts: u32 },
    /// Retries ran out with items still unprocessed. Those items are lost.
    Exhausted { attempts: u32, abandoned: Vec<Transaction> },
    /// The store call itself failed or timed out. The chunk is not retried.
    Failed { attempts: u32, error: StoreError },
}

impl ChunkOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }
}

/// Outcomes of every chunk of one batch, in chunk order
#[derive(Debug, Default)]
pub struct BatchWriteReport {
    pub outcomes: Vec<ChunkOutcome>,
}

impl BatchWriteReport {
    pub fn chunks(&self) -> usize {
        self.outcomes.len()
    }

    pub fn written(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.is_written()).count()
    }

    /// Items left behind by exhausted chunks
    pub fn abandoned(&self) -> usize {
        self.outcomes
            .iter()
            .map(|outcome| match outcome {
                ChunkOutcome::Exhausted { abandoned, .. } => abandoned.len(),
                _ => 0,
            })
            .sum()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|outcome| matches!(outcome, ChunkOutcome::Failed { .. })).count()
    }

    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(ChunkOutcome::is_written)
    }
}

/// Persists a batch through the store, one concurrent write per chunk.
///
/// A chunk is sent once, then only its unprocessed items are resubmitted, at most
/// `MAX_CHUNK_RETRIES` times. Chunks never wait on or affect each other.
pub struct BatchWriter {
    store: Arc<dyn TransactionStore>,
    write_timeout: Duration,
    max_retries: u32,
}

impl BatchWriter {
    pub fn new(store: Arc<dyn TransactionStore>, write_timeout: Duration) -> Self {
        Self { store, write_timeout, max_retries: MAX_CHUNK_RETRIES }
    }

    /// write - Resolve every chunk of `transactions`. Completes once no chunk is pending.
    pub async fn write(&self, transactions: &[Transaction]) -> BatchWriteReport {
        let start = Instant::now();
        let chunks = chunk_batch(transactions);
        debug!(items = transactions.len(), chunks = chunks.len(), "Writing batch");

        let outcomes =
            join_all(chunks.into_iter().enumerate().map(|(index, chunk)| self.write_chunk(index, chunk))).await;

        EXPLORER_METRICS.batch_write_duration.record(start.elapsed().as_secs_f64(), &[]);
        BatchWriteReport { outcomes }
    }

    async fn write_chunk(&self, index: usize, chunk: &[Transaction]) -> ChunkOutcome {
        let mut pending = chunk.to_vec();
        let mut attempts = 0;

        let outcome = loop {
            attempts += 1;
            let output = match tokio::time::timeout(self.write_timeout, self.store.batch_write(&pending)).await {
                Ok(Ok(output)) => output,
                Ok(Err(error)) => break ChunkOutcome::Failed { attempts, error },
                Err(_) => break ChunkOutcome::Failed { attempts, error: StoreError::Timeout(self.write_timeout) },
            };

            if output.is_complete() {
                break ChunkOutcome::Written { attempts };
            }
            if attempts > self.max_retries {
                break ChunkOutcome::Exhausted { attempts, abandoned: output.unprocessed };
            }

            debug!(chunk = index, attempt = attempts, unprocessed = output.unprocessed.len(), "Retrying unprocessed items");
            tokio::time::sleep(CHUNK_RETRY_BASE_DELAY * 2u32.saturating_pow(attempts - 1)).await;
            pending = output.unprocessed;
        };

        Self::record_outcome(index, chunk.len(), &outcome);
        outcome
    }

    fn record_outcome(index: usize, size: usize, outcome: &ChunkOutcome) {
        match outcome {
            ChunkOutcome::Written { attempts } => {
                EXPLORER_METRICS.chunks_written.add(1, &[]);
                debug!(chunk = index, size, attempts, "Chunk written");
            }
            ChunkOutcome::Exhausted { attempts, abandoned } => {
                EXPLORER_METRICS.chunks_exhausted.add(1, &[]);
                EXPLORER_METRICS.items_abandoned.add(abandoned.len() as u64, &[]);
                let hashes: Vec<String> = abandoned.iter().map(|tx| tx.hash.to_string()).collect();
                warn!(
                    chunk = index,
                    attempts,
                    abandoned = abandoned.len(),
                    hashes = ?hashes,
                    "Max retry attempts reached, abandoning unprocessed items"
                );
            }
            ChunkOutcome::Failed { attempts, error } => {
                EXPLORER_METRICS.chunks_failed.add(1, &[KeyValue::new("reason", failure_reason(error))]);
                error!(chunk = index, size, attempts, error = %error, "Chunk write failed");
            }
        }
    }
}

fn failure_reason(error: &StoreError) -> &'static str {
    match error {
        StoreError::Timeout(_) => "timeout",
        StoreError::ChunkTooLarge { .. } => "too_large",
        _ => "store",
    }
}

impl std::fmt::Display for BatchWriteReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} chunks written, {} failed, {} items abandoned", self.written(), self.chunks(), self.failed(), self.abandoned())
    }
}

/// Log a one line summary of a report
pub fn log_report(block_number: Option<u64>, report: &BatchWriteReport) {
    if report.is_complete() {
        info!(block_number = ?block_number, chunks = report.chunks(), "Batch persisted");
    } else {
        warn!(block_number = ?block_number, summary = %report, "Batch partially persisted");
    }
}
