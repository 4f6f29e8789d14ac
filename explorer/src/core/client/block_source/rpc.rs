use crate::core::client::block_source::{BlockSource, BlockSourceError, HeaderStream};
use crate::types::params::BlockSourceArgs;
use crate::types::{Block, BlockHeader, Transaction};
use alloy::eips::BlockNumberOrTag;
use alloy::providers::{Provider, ProviderBuilder, WsConnect};
use alloy::pubsub::PubSubFrontend;
use alloy_primitives::{B256, U64};
use async_trait::async_trait;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Head as pushed by `eth_subscribe("newHeads")`. Only the fields the pipeline needs.
#[derive(Debug, Deserialize)]
struct RawHeader {
    #[serde(default)]
    number: Option<U64>,
    #[serde(default)]
    hash: Option<B256>,
}

impl From<RawHeader> for BlockHeader {
    fn from(raw: RawHeader) -> Self {
        Self { number: raw.number.map(|n| n.to::<u64>()), hash: raw.hash }
    }
}

/// A head that fails to decode is an item error, the stream carries on after it
fn decode_header(value: Value) -> Result<BlockHeader, BlockSourceError> {
    serde_json::from_value::<RawHeader>(value)
        .map(BlockHeader::from)
        .map_err(|e| BlockSourceError::MalformedHeader(e.to_string()))
}

/// Block as returned by `eth_getBlockByNumber(n, true)`
#[derive(Debug, Deserialize)]
struct RawBlock {
    number: U64,
    #[serde(default)]
    transactions: Vec<Transaction>,
}

/// Block source backed by an Ethereum JSON-RPC node over a websocket.
///
/// Transactions are decoded from the node's JSON so every chain-native field is kept,
/// not only the ones known to alloy's typed responses.
#[derive(Debug, Clone)]
pub struct RpcBlockSource<P> {
    provider: P,
    request_timeout: Duration,
}

impl<P> RpcBlockSource<P> {
    pub fn new(provider: P, request_timeout: Duration) -> Self {
        Self { provider, request_timeout }
    }
}

/// connect - Open the websocket connection used for both the subscription and block fetches
pub async fn connect(
    args: &BlockSourceArgs,
) -> Result<RpcBlockSource<impl Provider<PubSubFrontend> + 'static>, BlockSourceError> {
    let provider = ProviderBuilder::new()
        .on_ws(WsConnect::new(args.ws_url.as_str()))
        .await
        .map_err(|e| BlockSourceError::ConnectionError(e.to_string()))?;
    tracing::info!(url = %args.ws_url, "Connected to block source");
    Ok(RpcBlockSource::new(provider, args.request_timeout))
}

#[async_trait]
impl<P> BlockSource for RpcBlockSource<P>
where
    P: Provider<PubSubFrontend> + 'static,
{
    async fn subscribe(&self) -> Result<HeaderStream, BlockSourceError> {
        let subscription = self
            .provider
            .subscribe::<_, Value>(("newHeads",))
            .await
            .map_err(|e| BlockSourceError::SubscriptionError(e.to_string()))?;

        Ok(subscription.into_stream().map(decode_header).boxed())
    }

    async fn fetch_block(&self, number: u64) -> Result<Block, BlockSourceError> {
        let request = self
            .provider
            .raw_request::<_, Option<Value>>("eth_getBlockByNumber".into(), (BlockNumberOrTag::Number(number), true));

        let response = tokio::time::timeout(self.request_timeout, request)
            .await
            .map_err(|_| BlockSourceError::Timeout(self.request_timeout))?
            .map_err(|e| BlockSourceError::TransportError(e.to_string()))?;

        let Some(value) = response else {
            return Err(BlockSourceError::NotFound(number));
        };

        let raw: RawBlock = serde_json::from_value(value)
            .map_err(|error| BlockSourceError::DecodeError { block_number: number, error })?;

        Ok(Block { number: raw.number.to::<u64>(), transactions: raw.transactions })
    }
}
