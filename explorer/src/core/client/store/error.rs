use mongodb::bson;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Batch of {size} items exceeds the maximum of {max}")]
    ChunkTooLarge { size: usize, max: usize },

    #[error("Store call timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Mongo error: {0}")]
    MongoError(#[from] mongodb::error::Error),

    #[error("Failed to encode item: {0}")]
    EncodeError(#[from] serde_json::Error),

    #[error("BSON serialization error: {0}")]
    BsonSerError(#[from] bson::ser::Error),

    #[error("Failed to serialize document: {0}")]
    FailedToSerializeDocument(String),
}
