use clap::Args;

/// Parameters used to config MongoDB.
#[derive(Debug, Clone, Args)]
pub struct MongoDBCliArgs {
    /// Use the MongoDB client
    #[arg(long)]
    pub mongodb: bool,

    /// The connection string to the MongoDB server.
    #[arg(env = "EXPLORER_MONGODB_CONNECTION_URL", long, default_value = Some("mongodb://localhost:27017"))]
    pub mongodb_connection_url: Option<String>,

    /// The name of the database.
    #[arg(env = "EXPLORER_DATABASE_NAME", long, default_value = Some("explorer"))]
    pub mongodb_database_name: Option<String>,

    /// The collection holding the ingested transactions.
    #[arg(env = "EXPLORER_TRANSACTIONS_COLLECTION", long, default_value = Some("transactions"))]
    pub mongodb_transactions_collection: Option<String>,
}
