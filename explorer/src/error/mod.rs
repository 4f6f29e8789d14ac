pub mod ingest;

use thiserror::Error;

use crate::core::client::block_source::BlockSourceError;
use crate::core::client::price::PriceError;
use crate::core::client::relay::RelayError;
use crate::core::client::store::StoreError;
pub use ingest::IngestError;

/// Result type for explorer operations
pub type ExplorerResult<T> = Result<T, ExplorerError>;

/// Error types for the explorer
#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error("Block source error: {0}")]
    BlockSourceError(#[from] BlockSourceError),

    #[error("Relay error: {0}")]
    RelayError(#[from] RelayError),

    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),

    #[error("Price error: {0}")]
    PriceError(#[from] PriceError),

    #[error("Ingest error: {0}")]
    IngestError(#[from] IngestError),

    /// Setup Command error
    #[error("Setup Command Error: {0}")]
    SetupCommandError(String),

    /// Missing or invalid configuration. Aborts startup.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Resource Setup error
    #[error("Resource setup error: {0}")]
    ResourceSetupError(String),

    #[error("OTL Metrics Error: {0}")]
    OTLMetricsError(String),

    /// Server error
    #[error("Server error: {0}")]
    ServerError(String),

    /// Mongo error
    #[error("Mongo error: {0}")]
    MongoError(#[from] mongodb::error::Error),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
