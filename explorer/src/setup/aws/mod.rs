pub(crate) mod sqs;
