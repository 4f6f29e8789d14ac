use anyhow::{anyhow, Result};
use std::future::Future;
use std::time::Duration;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[cfg(unix)]
use signal::unix::{signal, SignalKind};

/// Signal types that can trigger shutdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum ShutdownSignal {
    /// SIGTERM - Docker/Kubernetes graceful shutdown
    #[strum(serialize = "SIGTERM")]
    Terminate,
    /// SIGINT - Ctrl+C interactive shutdown
    #[strum(serialize = "SIGINT")]
    Interrupt,
    /// A worker cancelled the shared token
    #[strum(serialize = "INTERNAL")]
    Internal,
}

/// Waits for an OS signal or an internal cancellation, then drives the shutdown.
pub struct SignalHandler {
    cancellation_token: CancellationToken,
}

impl SignalHandler {
    pub fn new(cancellation_token: CancellationToken) -> Self {
        Self { cancellation_token }
    }

    /// Wait for any shutdown signal, cancel the shared token and return which signal fired
    pub async fn wait_for_shutdown(&self) -> std::io::Result<ShutdownSignal> {
        let signal = self.wait_for_signal().await?;
        info!(signal = %signal, "Received shutdown signal");
        self.cancellation_token.cancel();
        Ok(signal)
    }

    #[cfg(unix)]
    async fn wait_for_signal(&self) -> std::io::Result<ShutdownSignal> {
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        Ok(tokio::select! {
            _ = sigterm.recv() => ShutdownSignal::Terminate,
            _ = sigint.recv() => ShutdownSignal::Interrupt,
            _ = self.cancellation_token.cancelled() => ShutdownSignal::Internal,
        })
    }

    #[cfg(not(unix))]
    async fn wait_for_signal(&self) -> std::io::Result<ShutdownSignal> {
        tokio::select! {
            result = signal::ctrl_c() => result.map(|_| ShutdownSignal::Interrupt),
            _ = self.cancellation_token.cancelled() => Ok(ShutdownSignal::Internal),
        }
    }

    /// Run `shutdown_fn` and give up once `timeout` elapses
    pub async fn handle_graceful_shutdown<F, Fut>(&self, shutdown_fn: F, timeout: Duration) -> Result<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        info!(timeout_secs = timeout.as_secs(), "Starting graceful shutdown");

        match tokio::time::timeout(timeout, shutdown_fn()).await {
            Ok(Ok(())) => {
                info!("Graceful shutdown completed successfully");
                Ok(())
            }
            Ok(Err(e)) => {
                error!(error = %e, "Graceful shutdown failed");
                Err(e)
            }
            Err(_) => {
                warn!("Shutdown timeout reached, in-flight work may be incomplete");
                Err(anyhow!("Shutdown timeout exceeded"))
            }
        }
    }
}
