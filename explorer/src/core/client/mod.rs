// Client abstractions module - contains all client interface traits

pub mod block_source;
pub mod price;
pub mod relay;
pub mod store;

// Re-export commonly used types
pub use block_source::{rpc::RpcBlockSource, BlockSource};
pub use price::{coingecko::CoinGeckoQuoteSource, PriceCache, QuoteSource};
pub use relay::{memory::InMemoryRelay, sqs::SqsRelay, RelayClient};
pub use store::{memory::InMemoryTransactionStore, mongodb::MongoTransactionStore, TransactionStore};
