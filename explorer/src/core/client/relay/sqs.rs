use crate::core::client::relay::{RelayClient, RelayError};
use crate::types::params::QueueArgs;
use crate::types::{RelayDelivery, RelayMessage, TransactionBatch};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_sqs::types::{MessageSystemAttributeName, QueueAttributeName};
use aws_sdk_sqs::Client;
use tokio::sync::OnceCell;

/// Ordered relay on an AWS SQS FIFO queue.
///
/// All messages share one message group, so SQS hands them out one at a time in send
/// order. The queue must be created by `setup` with content based deduplication and a
/// redrive policy towards the dead-letter queue.
#[derive(Debug)]
pub struct SqsRelay {
    client: Client,
    queue_name: String,
    wait_time_seconds: i32,
    visibility_timeout: i32,
    queue_url: OnceCell<String>,
}

impl SqsRelay {
    /// new - Create a new SQS relay client.
    /// # Arguments
    /// * `aws_config` - The AWS configuration.
    /// * `args` - The queue arguments.
    pub fn new(aws_config: &SdkConfig, args: &QueueArgs) -> Self {
        let sqs_config_builder = aws_sdk_sqs::config::Builder::from(aws_config);
        Self {
            client: Client::from_conf(sqs_config_builder.build()),
            queue_name: args.queue_name.clone(),
            wait_time_seconds: args.wait_time_seconds,
            visibility_timeout: args.visibility_timeout,
            queue_url: OnceCell::new(),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// queue_url - Resolve the queue url from its name once, then reuse it
    async fn queue_url(&self) -> Result<&str, RelayError> {
        let url = self
            .queue_url
            .get_or_try_init(|| async {
                self.client
                    .get_queue_url()
                    .queue_name(&self.queue_name)
                    .send()
                    .await?
                    .queue_url()
                    .map(str::to_string)
                    .ok_or_else(|| RelayError::FailedToGetQueueUrl(self.queue_name.clone()))
            })
            .await?;
        Ok(url.as_str())
    }
}

#[async_trait]
impl RelayClient for SqsRelay {
    async fn send(&self, batch: &TransactionBatch) -> Result<(), RelayError> {
        let message = RelayMessage::from_batch(batch)?;
        let queue_url = self.queue_url().await?;

        self.client
            .send_message()
            .queue_url(queue_url)
            .message_body(&message.body)
            .message_group_id(&message.group_key)
            .message_deduplication_id(&message.dedup_id)
            .send()
            .await?;

        tracing::debug!(
            queue = %self.queue_name,
            block_number = batch.block_number,
            dedup_id = %message.dedup_id,
            "Sent batch to relay"
        );
        Ok(())
    }

    /// Receives at most one message so the group is never split across two consumers.
    async fn receive(&self) -> Result<Option<RelayDelivery>, RelayError> {
        let queue_url = self.queue_url().await?;

        let output = self
            .client
            .receive_message()
            .queue_url(queue_url)
            .max_number_of_messages(1)
            .wait_time_seconds(self.wait_time_seconds)
            .visibility_timeout(self.visibility_timeout)
            .message_system_attribute_names(MessageSystemAttributeName::ApproximateReceiveCount)
            .message_system_attribute_names(MessageSystemAttributeName::MessageGroupId)
            .message_system_attribute_names(MessageSystemAttributeName::MessageDeduplicationId)
            .send()
            .await?;

        let Some(message) = output.messages.and_then(|messages| messages.into_iter().next()) else {
            return Ok(None);
        };

        let receipt = message.receipt_handle().ok_or(RelayError::MalformedMessage("receipt handle"))?.to_string();
        let body = message.body().ok_or(RelayError::MalformedMessage("body"))?.to_string();

        let attribute = |name: MessageSystemAttributeName| message.attributes().and_then(|a| a.get(&name)).cloned();
        let receive_count =
            attribute(MessageSystemAttributeName::ApproximateReceiveCount).and_then(|c| c.parse().ok()).unwrap_or(1);

        let mut relay_message = RelayMessage::from_body(body);
        if let Some(group_key) = attribute(MessageSystemAttributeName::MessageGroupId) {
            relay_message.group_key = group_key;
        }
        if let Some(dedup_id) = attribute(MessageSystemAttributeName::MessageDeduplicationId) {
            relay_message.dedup_id = dedup_id;
        }

        Ok(Some(RelayDelivery { receipt, message: relay_message, receive_count }))
    }

    async fn ack(&self, delivery: &RelayDelivery) -> Result<(), RelayError> {
        let queue_url = self.queue_url().await?;
        self.client.delete_message().queue_url(queue_url).receipt_handle(&delivery.receipt).send().await?;
        Ok(())
    }

    async fn nack(&self, delivery: &RelayDelivery) -> Result<(), RelayError> {
        let queue_url = self.queue_url().await?;
        self.client
            .change_message_visibility()
            .queue_url(queue_url)
            .receipt_handle(&delivery.receipt)
            .visibility_timeout(0)
            .send()
            .await?;
        Ok(())
    }

    /// Verifies that the queue exists and its attributes can be read with the current credentials.
    async fn health_check(&self) -> Result<(), RelayError> {
        let queue_url = self.queue_url().await?;
        self.client
            .get_queue_attributes()
            .queue_url(queue_url)
            .attribute_names(QueueAttributeName::QueueArn)
            .send()
            .await?;
        Ok(())
    }
}
