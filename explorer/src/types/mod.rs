pub mod block;
pub mod constant;
pub mod params;
pub mod price;
pub mod relay;
pub mod transaction;

pub use block::{Block, BlockHeader};
pub use price::Price;
pub use relay::{RelayDelivery, RelayMessage};
pub use transaction::{Transaction, TransactionBatch};
