use crate::cli::server::ServerCliArgs;
use crate::cli::RunCmd;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServiceParams {
    /// Upper bound of headers processed at the same time
    pub max_concurrent_headers: usize,
    /// Capacity of the channel between the subscription and the workers
    pub header_queue_capacity: usize,
    pub fetch_timeout: Duration,
    pub relay_timeout: Duration,
    pub write_timeout: Duration,
    /// Sleep between polls when the relay is empty
    pub relay_poll_interval: Duration,
    pub read_only: bool,
}

impl From<&RunCmd> for ServiceParams {
    fn from(run_cmd: &RunCmd) -> Self {
        let args = &run_cmd.service_args;
        Self {
            max_concurrent_headers: args.max_concurrent_headers,
            header_queue_capacity: args.header_queue_capacity,
            fetch_timeout: Duration::from_secs(run_cmd.block_source_args.fetch_timeout_seconds),
            relay_timeout: Duration::from_secs(args.relay_timeout_seconds),
            write_timeout: Duration::from_secs(args.write_timeout_seconds),
            relay_poll_interval: Duration::from_millis(args.relay_poll_interval_ms),
            read_only: args.read_only,
        }
    }
}

impl Default for ServiceParams {
    fn default() -> Self {
        Self {
            max_concurrent_headers: 8,
            header_queue_capacity: 64,
            fetch_timeout: Duration::from_secs(30),
            relay_timeout: Duration::from_secs(30),
            write_timeout: Duration::from_secs(30),
            relay_poll_interval: Duration::from_secs(1),
            read_only: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerParams {
    pub host: String,
    pub port: u16,
}

impl From<ServerCliArgs> for ServerParams {
    fn from(value: ServerCliArgs) -> Self {
        Self { host: value.host, port: value.port }
    }
}
