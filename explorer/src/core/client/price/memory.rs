use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::core::client::price::{PriceCache, PriceError};
use crate::types::Price;

#[derive(Debug, Default)]
pub struct InMemoryPriceCache {
    prices: RwLock<HashMap<String, Price>>,
}

impl InMemoryPriceCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PriceCache for InMemoryPriceCache {
    async fn get(&self, currency: &str) -> Result<Option<Price>, PriceError> {
        Ok(self.prices.read().await.get(currency).copied())
    }

    async fn put(&self, currency: &str, price: Price) -> Result<(), PriceError> {
        self.prices.write().await.insert(currency.to_string(), price);
        Ok(())
    }
}
