pub mod batch_writer;
pub mod consumer;
pub mod coordinator;

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::core::config::Config;
use crate::worker::batch_writer::BatchWriter;
use crate::worker::consumer::RelayConsumer;
use crate::worker::coordinator::IngestionCoordinator;
use crate::ExplorerResult;

/// Runs the two halves of the pipeline: the ingestion coordinator that feeds the relay and
/// the consumer that drains it into the store.
pub struct WorkerController {
    config: Arc<Config>,
    shutdown_token: CancellationToken,
    worker_handles: Vec<JoinHandle<()>>,
}

impl WorkerController {
    pub fn new(config: Arc<Config>, shutdown_token: CancellationToken) -> Self {
        Self { config, shutdown_token, worker_handles: Vec::new() }
    }

    /// Start the coordinator and the consumer as background tasks
    pub fn start(&mut self) -> ExplorerResult<()> {
        let service_config = self.config.service_config().clone();

        let coordinator = IngestionCoordinator::new(
            self.config.block_source()?,
            self.config.relay(),
            service_config.clone(),
            self.shutdown_token.clone(),
        );
        let writer = BatchWriter::new(self.config.store(), service_config.write_timeout);
        let consumer = RelayConsumer::new(
            self.config.relay(),
            writer,
            service_config.relay_poll_interval,
            self.shutdown_token.clone(),
        );

        self.worker_handles.push(tokio::spawn(async move { coordinator.run().await }));
        self.worker_handles.push(tokio::spawn(async move { consumer.run().await }));

        info!(worker_count = self.worker_handles.len(), "All workers started");
        Ok(())
    }

    /// Wait for all workers to complete (typically after shutdown signal)
    pub async fn wait_for_completion(&mut self) {
        for handle in self.worker_handles.drain(..) {
            if let Err(e) = handle.await {
                error!(error = %e, "Worker task panicked");
            }
        }
        info!("All workers completed");
    }

    /// Trigger shutdown and wait for graceful completion
    pub async fn shutdown(&mut self) {
        info!("Initiating graceful shutdown of workers");
        self.shutdown_token.cancel();
        self.wait_for_completion().await;
    }
}
