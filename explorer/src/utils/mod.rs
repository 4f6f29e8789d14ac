pub mod instrument;
pub mod logging;
pub mod metrics;
pub mod signal_handler;

use chrono::Utc;

/// Current unix time in milliseconds
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
