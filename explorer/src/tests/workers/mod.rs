pub mod batch_writer;
pub mod consumer;
pub mod coordinator;
