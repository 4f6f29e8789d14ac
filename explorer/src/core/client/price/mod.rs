pub mod coingecko;
pub mod error;
pub mod memory;
pub mod mongodb;

use crate::types::Price;
use async_trait::async_trait;
pub use error::PriceError;

/// External source of USD quotes
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// fetch_usd_price - Current USD price of `currency`, e.g. "ethereum"
    async fn fetch_usd_price(&self, currency: &str) -> Result<f64, PriceError>;
}

/// Last known quote per currency
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceCache: Send + Sync {
    async fn get(&self, currency: &str) -> Result<Option<Price>, PriceError>;

    /// put - Overwrite the cached quote of `currency`
    async fn put(&self, currency: &str, price: Price) -> Result<(), PriceError>;
}
