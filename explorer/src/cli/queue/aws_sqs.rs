use clap::Args;

/// Parameters used to config the AWS SQS FIFO relay.
#[derive(Debug, Clone, Args)]
pub struct AWSSQSCliArgs {
    /// Use the AWS SQS FIFO queue as relay
    #[arg(long, requires = "aws")]
    pub aws_sqs: bool,

    /// Name of the FIFO queue carrying block batches. `.fifo` is appended when missing.
    #[arg(env = "EXPLORER_AWS_SQS_QUEUE_NAME", long, default_value = Some("explorer_block_info"))]
    pub sqs_queue_name: Option<String>,

    /// Name of the FIFO dead-letter queue.
    #[arg(env = "EXPLORER_AWS_SQS_DLQ_NAME", long, default_value = Some("explorer_block_info_dlq"))]
    pub sqs_dlq_name: Option<String>,

    /// Receives allowed before a message is moved to the dead-letter queue.
    #[arg(env = "EXPLORER_AWS_SQS_MAX_RECEIVE_COUNT", long, default_value = "5")]
    pub sqs_max_receive_count: u32,

    /// Long polling wait in seconds, at most 20.
    #[arg(env = "EXPLORER_AWS_SQS_WAIT_TIME_SECONDS", long, default_value = "20", value_parser = clap::value_parser!(i32).range(0..=20))]
    pub sqs_wait_time_seconds: i32,

    /// How long a received message stays hidden before it is redelivered.
    #[arg(env = "EXPLORER_AWS_SQS_VISIBILITY_TIMEOUT", long, default_value = "60")]
    pub sqs_visibility_timeout: i32,
}
