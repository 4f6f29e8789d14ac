use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::cli::SetupCmd;
use crate::core::cloud::CloudProvider;
use crate::setup::aws::sqs::RelayQueueSetup;
use crate::setup::mongodb::StoreSetup;
use crate::types::params::{DatabaseArgs, QueueArgs};
use crate::ExplorerResult;

pub(crate) mod aws;
pub(crate) mod mongodb;

/// A piece of infrastructure the explorer expects to exist before `run`
#[async_trait]
pub trait Resource: Send + Sync {
    type SetupArgs: Send + Sync;

    /// setup - Create the resource unless it already exists. Safe to run repeatedly.
    async fn setup(&self, args: &Self::SetupArgs) -> ExplorerResult<()>;

    /// check_if_exists - Whether the resource is already there
    async fn check_if_exists(&self, args: &Self::SetupArgs) -> ExplorerResult<bool>;
}

/// Setup function that creates the relay queues and the store indexes
pub async fn setup(setup_cmd: &SetupCmd) -> ExplorerResult<()> {
    let cloud_provider = Arc::new(CloudProvider::load().await);
    info!("Cloud Provider initialized - {}", cloud_provider.get_provider_name());

    let queue_params = QueueArgs::try_from(setup_cmd.clone())?;
    let database_params = DatabaseArgs::try_from(setup_cmd.clone())?;
    debug!("Queue Params: {:?}", queue_params);

    info!("Setting up resources for the explorer...");
    RelayQueueSetup::new(cloud_provider.aws_config()).setup(&queue_params).await?;
    StoreSetup::connect(&database_params).await?.setup(&database_params).await?;

    info!("All resources are set up");
    Ok(())
}
