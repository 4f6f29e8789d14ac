use clap::Args;
use url::Url;

/// Parameters used to config the price quote source.
#[derive(Debug, Clone, Args)]
pub struct PriceCliArgs {
    /// Base url of the CoinGecko compatible API.
    #[arg(env = "EXPLORER_PRICE_API_URL", long, default_value = "https://api.coingecko.com/api/v3/")]
    pub price_api_url: Url,

    /// Deadline in seconds for a quote request.
    #[arg(env = "EXPLORER_PRICE_TIMEOUT_SECONDS", long, default_value = "10")]
    pub price_timeout_seconds: u64,
}
