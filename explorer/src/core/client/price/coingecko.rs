use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::core::client::price::{PriceError, QuoteSource};
use crate::types::params::PriceArgs;

const VS_CURRENCY: &str = "usd";

/// `simple/price` response: currency -> vs currency -> price
type SimplePriceResponse = HashMap<String, HashMap<String, f64>>;

/// Quote source backed by the CoinGecko `simple/price` endpoint
#[derive(Debug, Clone)]
pub struct CoinGeckoQuoteSource {
    client: Client,
    base_url: Url,
}

impl CoinGeckoQuoteSource {
    pub fn new(args: &PriceArgs) -> Result<Self, PriceError> {
        let client = Client::builder().timeout(args.request_timeout).build()?;
        Ok(Self { client, base_url: args.api_url.clone() })
    }
}

#[async_trait]
impl QuoteSource for CoinGeckoQuoteSource {
    async fn fetch_usd_price(&self, currency: &str) -> Result<f64, PriceError> {
        let url = self.base_url.join("simple/price")?;
        let response: SimplePriceResponse = self
            .client
            .get(url)
            .query(&[("ids", currency), ("vs_currencies", VS_CURRENCY)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response
            .get(currency)
            .and_then(|quotes| quotes.get(VS_CURRENCY))
            .copied()
            .ok_or_else(|| PriceError::MissingQuote(currency.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    fn source(server: &MockServer) -> CoinGeckoQuoteSource {
        let args = PriceArgs {
            api_url: Url::parse(&server.url("/api/v3/")).unwrap(),
            request_timeout: Duration::from_secs(5),
        };
        CoinGeckoQuoteSource::new(&args).unwrap()
    }

    #[tokio::test]
    async fn reads_the_usd_quote() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v3/simple/price")
                .query_param("ids", "ethereum")
                .query_param("vs_currencies", "usd");
            then.status(200).json_body(json!({ "ethereum": { "usd": 3120.55 } }));
        });

        let price = source(&server).fetch_usd_price("ethereum").await.unwrap();

        mock.assert();
        assert_eq!(price, 3120.55);
    }

    #[tokio::test]
    async fn missing_currency_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/v3/simple/price");
            then.status(200).json_body(json!({}));
        });

        let result = source(&server).fetch_usd_price("ethereum").await;
        assert!(matches!(result, Err(PriceError::MissingQuote(currency)) if currency == "ethereum"));
    }

    #[tokio::test]
    async fn upstream_error_status_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/v3/simple/price");
            then.status(429);
        });

        let result = source(&server).fetch_usd_price("ethereum").await;
        assert!(matches!(result, Err(PriceError::RequestError(_))));
    }
}
