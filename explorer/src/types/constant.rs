use std::time::Duration;

/// Group shared by every relayed batch, so the relay keeps one global FIFO stream
pub const RELAY_GROUP_KEY: &str = "BlockInfo";

/// Maximum number of items accepted by a single store batch write
pub const WRITE_CHUNK_SIZE: usize = 25;

/// Resubmissions of unprocessed items allowed per chunk, on top of the first attempt
pub const MAX_CHUNK_RETRIES: u32 = 3;

/// Window in which two relay messages with identical content collapse into one delivery.
/// Same value as the fixed deduplication interval of SQS FIFO queues.
pub const RELAY_DEDUP_WINDOW: Duration = Duration::from_secs(5 * 60);

/// Cached price older than this is refreshed from the quote source
pub const PRICE_REFRESH_TTL_MS: i64 = 600_000;

/// Currency whose USD quote is cached
pub const PRICE_CURRENCY: &str = "ethereum";

pub const PRICES_COLLECTION: &str = "prices";

/// Version of the explorer
pub const EXPLORER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Delay before the first resubmission of unprocessed items, doubled on every further retry
pub const CHUNK_RETRY_BASE_DELAY: Duration = Duration::from_millis(100);
