use std::sync::Arc;

use mongodb::{Client, Database};
use tracing::info;

use crate::cli::RunCmd;
use crate::core::client::block_source::rpc;
use crate::core::client::price::memory::InMemoryPriceCache;
use crate::core::client::price::mongodb::MongoPriceCache;
use crate::core::client::{
    BlockSource, CoinGeckoQuoteSource, InMemoryRelay, InMemoryTransactionStore, MongoTransactionStore, PriceCache,
    QuoteSource, RelayClient, SqsRelay, TransactionStore,
};
use crate::core::cloud::CloudProvider;
use crate::types::params::service::{ServerParams, ServiceParams};
use crate::types::params::{BlockSourceArgs, DatabaseArgs, PriceArgs, RelayArgs, StoreArgs};
use crate::{ExplorerError, ExplorerResult};

pub struct ExplorerParams {
    pub service_config: ServiceParams,
    pub server_config: ServerParams,
}

/// The app config. Owns every external client and is shared as `Arc<Config>`
/// between the workers and the server.
pub struct Config {
    params: ExplorerParams,
    /// `None` when the service runs read only
    block_source: Option<Arc<dyn BlockSource>>,
    relay: Arc<dyn RelayClient>,
    store: Arc<dyn TransactionStore>,
    quote_source: Arc<dyn QuoteSource>,
    price_cache: Arc<dyn PriceCache>,
}

impl Config {
    pub fn new(
        params: ExplorerParams,
        block_source: Option<Arc<dyn BlockSource>>,
        relay: Arc<dyn RelayClient>,
        store: Arc<dyn TransactionStore>,
        quote_source: Arc<dyn QuoteSource>,
        price_cache: Arc<dyn PriceCache>,
    ) -> Self {
        Self { params, block_source, relay, store, quote_source, price_cache }
    }

    /// from_run_cmd - Validate the run command and connect every client it selects
    pub async fn from_run_cmd(run_cmd: &RunCmd) -> ExplorerResult<Self> {
        let params = ExplorerParams {
            service_config: ServiceParams::from(run_cmd),
            server_config: ServerParams::from(run_cmd.server_args.clone()),
        };
        let relay_args = RelayArgs::try_from(run_cmd.clone())?;
        let store_args = StoreArgs::try_from(run_cmd.clone())?;
        let price_args = PriceArgs::from(run_cmd.price_args.clone());

        let block_source = if params.service_config.read_only {
            info!("Read only mode, block ingestion is disabled");
            None
        } else {
            let block_source_args = BlockSourceArgs::try_from(run_cmd.clone())?;
            Some(Self::build_block_source(&block_source_args).await?)
        };

        let relay = match relay_args {
            RelayArgs::AwsSqs(queue_args) => {
                let provider = CloudProvider::load().await;
                Arc::new(SqsRelay::new(provider.aws_config(), &queue_args)) as Arc<dyn RelayClient>
            }
            RelayArgs::InMemory { max_receive_count } => Arc::new(InMemoryRelay::new(max_receive_count)),
        };

        let (store, price_cache) = match store_args {
            StoreArgs::MongoDB(database_args) => {
                let database = Self::build_database(&database_args).await?;
                let store = MongoTransactionStore::new(database.clone(), database_args.transactions_collection);
                (
                    Arc::new(store) as Arc<dyn TransactionStore>,
                    Arc::new(MongoPriceCache::new(database)) as Arc<dyn PriceCache>,
                )
            }
            StoreArgs::InMemory => (
                Arc::new(InMemoryTransactionStore::new()) as Arc<dyn TransactionStore>,
                Arc::new(InMemoryPriceCache::new()) as Arc<dyn PriceCache>,
            ),
        };

        let quote_source = Arc::new(CoinGeckoQuoteSource::new(&price_args)?);

        Ok(Self::new(params, block_source, relay, store, quote_source, price_cache))
    }

    async fn build_block_source(args: &BlockSourceArgs) -> ExplorerResult<Arc<dyn BlockSource>> {
        Ok(Arc::new(rpc::connect(args).await?))
    }

    async fn build_database(args: &DatabaseArgs) -> ExplorerResult<Database> {
        let client = Client::with_uri_str(&args.connection_uri).await?;
        Ok(client.database(&args.database_name))
    }

    /// Returns the server config
    pub fn server_config(&self) -> &ServerParams {
        &self.params.server_config
    }

    /// Returns the service config
    pub fn service_config(&self) -> &ServiceParams {
        &self.params.service_config
    }

    /// Returns the block source, failing when the service runs read only
    pub fn block_source(&self) -> ExplorerResult<Arc<dyn BlockSource>> {
        self.block_source
            .clone()
            .ok_or_else(|| ExplorerError::ConfigError("Block source is not configured".to_string()))
    }

    /// Returns the relay client
    pub fn relay(&self) -> Arc<dyn RelayClient> {
        self.relay.clone()
    }

    /// Returns the transaction store
    pub fn store(&self) -> Arc<dyn TransactionStore> {
        self.store.clone()
    }

    pub fn quote_source(&self) -> Arc<dyn QuoteSource> {
        self.quote_source.clone()
    }

    pub fn price_cache(&self) -> Arc<dyn PriceCache> {
        self.price_cache.clone()
    }
}
