use std::sync::Arc;

use tracing::{debug, info};

use crate::core::client::price::PriceError;
use crate::core::config::Config;
use crate::types::constant::PRICE_CURRENCY;
use crate::types::Price;
use crate::utils::metrics::EXPLORER_METRICS;
use crate::utils::now_ms;

pub struct PriceService;

impl PriceService {
    /// get_price - USD quote of ether, served from the cache while it is fresh
    pub async fn get_price(config: Arc<Config>) -> Result<Price, PriceError> {
        Self::get_price_at(now_ms(), config).await
    }

    /// get_price_at - Same as `get_price`, with `now` given in unix milliseconds.
    ///
    /// A stale or missing quote is fetched from the quote source, written back to the cache
    /// and returned stamped with `now`.
    pub async fn get_price_at(now: i64, config: Arc<Config>) -> Result<Price, PriceError> {
        let cache = config.price_cache();

        if let Some(price) = cache.get(PRICE_CURRENCY).await? {
            if price.is_fresh(now) {
                EXPLORER_METRICS.price_cache_hits.add(1, &[]);
                debug!(last_updated = price.last_updated, "Serving cached price");
                return Ok(price);
            }
        }

        EXPLORER_METRICS.price_cache_misses.add(1, &[]);
        let usd_price = config.quote_source().fetch_usd_price(PRICE_CURRENCY).await?;
        let price = Price { usd_price, last_updated: now };
        cache.put(PRICE_CURRENCY, price).await?;
        info!(usd_price, "Refreshed price");

        Ok(price)
    }
}
