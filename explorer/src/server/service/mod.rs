pub mod price;
pub mod transactions;

pub use price::PriceService;
pub use transactions::TransactionService;
