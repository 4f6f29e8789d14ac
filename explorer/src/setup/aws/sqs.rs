use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_sqs::types::QueueAttributeName;
use aws_sdk_sqs::Client;
use tracing::info;

use crate::setup::Resource;
use crate::types::params::QueueArgs;
use crate::{ExplorerError, ExplorerResult};

/// Creates the FIFO relay queue and its FIFO dead-letter queue
pub(crate) struct RelayQueueSetup {
    client: Client,
}

impl RelayQueueSetup {
    pub(crate) fn new(aws_config: &SdkConfig) -> Self {
        Self { client: Client::from_conf(aws_sdk_sqs::config::Builder::from(aws_config).build()) }
    }

    /// Create a FIFO queue with content based deduplication and return its url
    async fn create_fifo_queue(
        &self,
        queue_name: &str,
        mut attributes: HashMap<QueueAttributeName, String>,
    ) -> ExplorerResult<String> {
        attributes.insert(QueueAttributeName::FifoQueue, "true".to_string());
        attributes.insert(QueueAttributeName::ContentBasedDeduplication, "true".to_string());

        let res = self
            .client
            .create_queue()
            .queue_name(queue_name)
            .set_attributes(Some(attributes))
            .send()
            .await
            .map_err(|e| {
                ExplorerError::ResourceSetupError(format!("Failed to create SQS queue '{}': {}", queue_name, e))
            })?;

        res.queue_url()
            .map(str::to_string)
            .ok_or_else(|| ExplorerError::ResourceSetupError(format!("Failed to get queue url of '{}'", queue_name)))
    }

    async fn get_queue_arn(&self, queue_url: &str) -> ExplorerResult<String> {
        let attributes = self
            .client
            .get_queue_attributes()
            .queue_url(queue_url)
            .attribute_names(QueueAttributeName::QueueArn)
            .send()
            .await
            .map_err(|e| ExplorerError::ResourceSetupError(format!("Failed to get queue attributes: {}", e)))?;

        attributes
            .attributes()
            .and_then(|attributes| attributes.get(&QueueAttributeName::QueueArn))
            .cloned()
            .ok_or_else(|| ExplorerError::ResourceSetupError(format!("No ARN for queue {}", queue_url)))
    }

    async fn queue_exists(&self, queue_name: &str) -> bool {
        self.client.get_queue_url().queue_name(queue_name).send().await.is_ok()
    }
}

#[async_trait]
impl Resource for RelayQueueSetup {
    type SetupArgs = QueueArgs;

    /// setup - Create the dead-letter queue first, then the relay queue with a redrive
    /// policy pointing at it.
    async fn setup(&self, args: &QueueArgs) -> ExplorerResult<()> {
        if self.check_if_exists(args).await? {
            info!(" ⏭️️ SQS queues already exist: {} / {}", args.queue_name, args.dlq_name);
            return Ok(());
        }

        let dlq_url = self.create_fifo_queue(&args.dlq_name, HashMap::new()).await?;
        let dlq_arn = self.get_queue_arn(&dlq_url).await?;
        info!("DL queue created: {}", args.dlq_name);

        let mut attributes = HashMap::new();
        attributes.insert(QueueAttributeName::VisibilityTimeout, args.visibility_timeout.to_string());
        attributes.insert(QueueAttributeName::ReceiveMessageWaitTimeSeconds, args.wait_time_seconds.to_string());
        attributes.insert(QueueAttributeName::RedrivePolicy, redrive_policy(&dlq_arn, args.max_receive_count));
        self.create_fifo_queue(&args.queue_name, attributes).await?;

        info!("Setup completed for queue: {}", args.queue_name);
        Ok(())
    }

    async fn check_if_exists(&self, args: &QueueArgs) -> ExplorerResult<bool> {
        Ok(self.queue_exists(&args.queue_name).await && self.queue_exists(&args.dlq_name).await)
    }
}

fn redrive_policy(dlq_arn: &str, max_receive_count: u32) -> String {
    format!(r#"{{"deadLetterTargetArn":"{}","maxReceiveCount":"{}"}}"#, dlq_arn, max_receive_count)
}
