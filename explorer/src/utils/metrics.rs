use once_cell::sync::Lazy;
use opentelemetry::global;
use opentelemetry::metrics::{Counter, Gauge, Histogram, Meter};

pub static EXPLORER_METRICS: Lazy<ExplorerMetrics> = Lazy::new(ExplorerMetrics::register);

pub struct ExplorerMetrics {
    pub latest_block: Gauge<u64>,
    pub headers_received: Counter<u64>,
    pub headers_discarded: Counter<u64>,
    pub blocks_forwarded: Counter<u64>,
    pub blocks_lost: Counter<u64>,
    pub chunks_written: Counter<u64>,
    pub chunks_exhausted: Counter<u64>,
    pub chunks_failed: Counter<u64>,
    pub items_abandoned: Counter<u64>,
    pub relay_messages_handled: Counter<u64>,
    pub relay_messages_rejected: Counter<u64>,
    pub price_cache_hits: Counter<u64>,
    pub price_cache_misses: Counter<u64>,
    pub batch_write_duration: Histogram<f64>,
    pub db_calls_response_time: Histogram<f64>,
}

impl ExplorerMetrics {
    pub fn register() -> Self {
        let meter: Meter = global::meter("crates.explorer.opentelemetry");

        let latest_block = meter
            .u64_gauge("latest_block")
            .with_description("Height of the last block forwarded to the relay")
            .with_unit("block")
            .build();

        let headers_received = meter
            .u64_counter("headers_received")
            .with_description("Count of block headers pushed by the subscription")
            .with_unit("headers")
            .build();

        let headers_discarded = meter
            .u64_counter("headers_discarded")
            .with_description("Count of headers dropped because they carry no block number")
            .with_unit("headers")
            .build();

        let blocks_forwarded = meter
            .u64_counter("blocks_forwarded")
            .with_description("Count of block batches sent to the relay")
            .with_unit("blocks")
            .build();

        let blocks_lost = meter
            .u64_counter("blocks_lost")
            .with_description("Count of blocks that failed to be fetched or relayed")
            .with_unit("blocks")
            .build();

        let chunks_written = meter
            .u64_counter("chunks_written")
            .with_description("Count of write chunks fully persisted")
            .with_unit("chunks")
            .build();

        let chunks_exhausted = meter
            .u64_counter("chunks_exhausted")
            .with_description("Count of write chunks abandoned after the last retry")
            .with_unit("chunks")
            .build();

        let chunks_failed = meter
            .u64_counter("chunks_failed")
            .with_description("Count of write chunks whose store request failed")
            .with_unit("chunks")
            .build();

        let items_abandoned = meter
            .u64_counter("items_abandoned")
            .with_description("Count of transactions never persisted")
            .with_unit("transactions")
            .build();

        let relay_messages_handled = meter
            .u64_counter("relay_messages_handled")
            .with_description("Count of relay messages written and acknowledged")
            .with_unit("messages")
            .build();

        let relay_messages_rejected = meter
            .u64_counter("relay_messages_rejected")
            .with_description("Count of relay messages handed back because they could not be decoded")
            .with_unit("messages")
            .build();

        let price_cache_hits = meter
            .u64_counter("price_cache_hits")
            .with_description("Count of price requests served from the cache")
            .with_unit("requests")
            .build();

        let price_cache_misses = meter
            .u64_counter("price_cache_misses")
            .with_description("Count of price requests that refreshed the quote")
            .with_unit("requests")
            .build();

        let batch_write_duration = meter
            .f64_histogram("batch_write_duration")
            .with_description("Time taken to resolve every chunk of a batch")
            .with_unit("s")
            .build();

        let db_calls_response_time = meter
            .f64_histogram("db_calls_response_time")
            .with_description("Response time of DB calls over time")
            .with_unit("s")
            .build();

        Self {
            latest_block,
            headers_received,
            headers_discarded,
            blocks_forwarded,
            blocks_lost,
            chunks_written,
            chunks_exhausted,
            chunks_failed,
            items_abandoned,
            relay_messages_handled,
            relay_messages_rejected,
            price_cache_hits,
            price_cache_misses,
            batch_write_duration,
            db_calls_response_time,
        }
    }
}
