use thiserror::Error;

use crate::core::client::store::StoreError;

#[derive(Error, Debug)]
pub enum PriceError {
    #[error("Quote request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Quote source returned no USD price for {0}")]
    MissingQuote(String),

    #[error("Invalid quote url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Price cache error: {0}")]
    CacheError(#[from] StoreError),

    #[error("Mongo error: {0}")]
    MongoError(#[from] mongodb::error::Error),
}
