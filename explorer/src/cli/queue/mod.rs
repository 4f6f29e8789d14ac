pub mod aws_sqs;
pub mod memory;
