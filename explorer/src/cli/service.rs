use clap::Args;

fn parse_positive_usize(s: &str) -> Result<usize, String> {
    let value: usize = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if value == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(value)
}

#[derive(Debug, Clone, Args)]
pub struct ServiceCliArgs {
    /// The maximum number of headers processed concurrently.
    #[arg(env = "EXPLORER_MAX_CONCURRENT_HEADERS", long, default_value = "8", value_parser = parse_positive_usize)]
    pub max_concurrent_headers: usize,

    /// Headers buffered between the subscription and the workers. A full buffer pauses the subscription.
    #[arg(env = "EXPLORER_HEADER_QUEUE_CAPACITY", long, default_value = "64", value_parser = parse_positive_usize)]
    pub header_queue_capacity: usize,

    /// Deadline in seconds for sending a batch to the relay.
    #[arg(env = "EXPLORER_RELAY_TIMEOUT_SECONDS", long, default_value = "30")]
    pub relay_timeout_seconds: u64,

    /// Deadline in seconds for a single store batch write.
    #[arg(env = "EXPLORER_WRITE_TIMEOUT_SECONDS", long, default_value = "30")]
    pub write_timeout_seconds: u64,

    /// Polling interval when the relay has no message available (milliseconds)
    #[arg(env = "EXPLORER_RELAY_POLL_INTERVAL_MS", long, default_value = "1000")]
    pub relay_poll_interval_ms: u64,

    /// Run only the read API, without ingesting blocks.
    #[arg(env = "EXPLORER_READ_ONLY", long, default_value_t = false)]
    pub read_only: bool,
}
