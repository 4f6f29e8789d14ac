pub mod database;
pub mod otel;
pub mod service;

use crate::cli::block_source::BlockSourceCliArgs;
use crate::cli::price::PriceCliArgs;
use crate::cli::provider::aws::AWSConfigCliArgs;
use crate::cli::queue::aws_sqs::AWSSQSCliArgs;
use crate::cli::{RunCmd, SetupCmd};
use crate::ExplorerError;
pub use database::{DatabaseArgs, StoreArgs};
pub use otel::OTELConfig;
use std::time::Duration;
use url::Url;

const FIFO_SUFFIX: &str = ".fifo";

/// BlockSourceArgs - Arguments used to connect to the block source
#[derive(Debug, Clone)]
pub struct BlockSourceArgs {
    pub ws_url: Url,
    pub request_timeout: Duration,
}

impl TryFrom<BlockSourceCliArgs> for BlockSourceArgs {
    type Error = ExplorerError;
    fn try_from(args: BlockSourceCliArgs) -> Result<Self, Self::Error> {
        Ok(Self {
            ws_url: args
                .ws_url
                .ok_or_else(|| ExplorerError::ConfigError("Block source websocket url is required".to_string()))?,
            request_timeout: Duration::from_secs(args.fetch_timeout_seconds),
        })
    }
}

impl TryFrom<RunCmd> for BlockSourceArgs {
    type Error = ExplorerError;
    fn try_from(run_cmd: RunCmd) -> Result<Self, Self::Error> {
        Self::try_from(run_cmd.block_source_args)
    }
}

/// QueueArgs - Arguments used to setup and reach the FIFO relay queue
#[derive(Debug, Clone)]
pub struct QueueArgs {
    pub queue_name: String,
    pub dlq_name: String,
    pub max_receive_count: u32,
    pub wait_time_seconds: i32,
    pub visibility_timeout: i32,
}

impl QueueArgs {
    fn from_cli(aws: &AWSConfigCliArgs, sqs: &AWSSQSCliArgs) -> Result<Self, ExplorerError> {
        let queue_name = sqs
            .sqs_queue_name
            .as_deref()
            .ok_or_else(|| ExplorerError::ConfigError("SQS queue name is required".to_string()))?;
        let dlq_name = sqs
            .sqs_dlq_name
            .as_deref()
            .ok_or_else(|| ExplorerError::ConfigError("SQS dead-letter queue name is required".to_string()))?;
        if sqs.sqs_max_receive_count == 0 {
            return Err(ExplorerError::ConfigError("SQS max receive count must be greater than 0".to_string()));
        }
        Ok(Self {
            queue_name: fifo_queue_name(aws.aws_prefix.as_deref(), queue_name),
            dlq_name: fifo_queue_name(aws.aws_prefix.as_deref(), dlq_name),
            max_receive_count: sqs.sqs_max_receive_count,
            wait_time_seconds: sqs.sqs_wait_time_seconds,
            visibility_timeout: sqs.sqs_visibility_timeout,
        })
    }
}

impl TryFrom<SetupCmd> for QueueArgs {
    type Error = ExplorerError;
    fn try_from(setup_cmd: SetupCmd) -> Result<Self, Self::Error> {
        Self::from_cli(&setup_cmd.aws_config_args, &setup_cmd.aws_sqs_args)
    }
}

/// RelayArgs - Which relay backend to run against
#[derive(Debug, Clone)]
pub enum RelayArgs {
    AwsSqs(QueueArgs),
    InMemory { max_receive_count: u32 },
}

impl TryFrom<RunCmd> for RelayArgs {
    type Error = ExplorerError;
    fn try_from(run_cmd: RunCmd) -> Result<Self, Self::Error> {
        match (run_cmd.aws_sqs_args.aws_sqs, run_cmd.in_memory_relay_args.in_memory_relay) {
            (true, false) => Ok(Self::AwsSqs(QueueArgs::from_cli(&run_cmd.aws_config_args, &run_cmd.aws_sqs_args)?)),
            (false, true) => Ok(Self::InMemory {
                max_receive_count: run_cmd.in_memory_relay_args.in_memory_max_receive_count.max(1),
            }),
            (true, true) => Err(ExplorerError::ConfigError("Only one relay backend can be selected".to_string())),
            (false, false) => Err(ExplorerError::ConfigError("A relay backend is required".to_string())),
        }
    }
}

/// PriceArgs - Arguments used to reach the quote source
#[derive(Debug, Clone)]
pub struct PriceArgs {
    pub api_url: Url,
    pub request_timeout: Duration,
}

impl From<PriceCliArgs> for PriceArgs {
    fn from(args: PriceCliArgs) -> Self {
        Self { api_url: args.price_api_url, request_timeout: Duration::from_secs(args.price_timeout_seconds) }
    }
}

/// fifo_queue_name - Apply the resource prefix and make sure the name carries the FIFO suffix
pub fn fifo_queue_name(prefix: Option<&str>, name: &str) -> String {
    let name = match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{}_{}", prefix, name),
        _ => name.to_string(),
    };
    if name.ends_with(FIFO_SUFFIX) {
        name
    } else {
        format!("{}{}", name, FIFO_SUFFIX)
    }
}
