use async_trait::async_trait;
use mongodb::{Client, Database};
use tracing::info;

use crate::core::client::{MongoTransactionStore, TransactionStore};
use crate::setup::Resource;
use crate::types::params::DatabaseArgs;
use crate::{ExplorerError, ExplorerResult};

/// Creates the indexes of the transaction collection
pub(crate) struct StoreSetup {
    database: Database,
}

impl StoreSetup {
    pub(crate) async fn connect(args: &DatabaseArgs) -> ExplorerResult<Self> {
        let client = Client::with_uri_str(&args.connection_uri).await?;
        Ok(Self { database: client.database(&args.database_name) })
    }
}

#[async_trait]
impl Resource for StoreSetup {
    type SetupArgs = DatabaseArgs;

    /// setup - Index creation is idempotent, so this always runs
    async fn setup(&self, args: &DatabaseArgs) -> ExplorerResult<()> {
        if !self.check_if_exists(args).await? {
            info!("Collection {} does not exist yet, it is created with its indexes", args.transactions_collection);
        }
        MongoTransactionStore::new(self.database.clone(), args.transactions_collection.as_str())
            .ensure_indexes()
            .await
            .map_err(|e| ExplorerError::ResourceSetupError(format!("Failed to create indexes: {}", e)))?;
        info!("Indexes ready on {}.{}", args.database_name, args.transactions_collection);
        Ok(())
    }

    async fn check_if_exists(&self, args: &DatabaseArgs) -> ExplorerResult<bool> {
        let collections = self.database.list_collection_names(None).await?;
        Ok(collections.iter().any(|name| *name == args.transactions_collection))
    }
}
