use crate::core::client::store::{BatchWriteOutput, StoreError, TransactionStore};
use crate::types::constant::WRITE_CHUNK_SIZE;
use crate::types::Transaction;
use crate::utils::metrics::EXPLORER_METRICS;
use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use futures::future::join_all;
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::options::{FindOneOptions, FindOptions, IndexOptions, ReplaceOptions};
use mongodb::{bson, Collection, Database, IndexModel};
use opentelemetry::KeyValue;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Instant;
use tracing::warn;

/// Conversions between domain types and BSON documents.
///
/// Values go through their JSON form so that quantities stay `0x` hex strings in the
/// store, the same encoding the relay and the API use.
pub trait ToDocument {
    fn to_document(&self) -> Result<Document, StoreError>;
}

impl<T: Serialize> ToDocument for T {
    fn to_document(&self) -> Result<Document, StoreError> {
        match to_bson(self)? {
            Bson::Document(doc) => Ok(doc),
            other => Err(StoreError::FailedToSerializeDocument(format!("Failed to serialize document: {}", other))),
        }
    }
}

pub fn to_bson<T: Serialize>(value: &T) -> Result<Bson, StoreError> {
    Ok(bson::to_bson(&serde_json::to_value(value)?)?)
}

pub fn from_document<T: DeserializeOwned>(document: Document) -> Result<T, StoreError> {
    Ok(serde_json::from_value(Bson::Document(document).into_relaxed_extjson())?)
}

fn without_id() -> Document {
    doc! { "_id": 0 }
}

/// Record the latency of a store call, labelled by operation
async fn record_metrics<T, F, Fut>(operation: &'static str, f: F) -> Result<T, StoreError>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<T, StoreError>>,
{
    let start = Instant::now();
    let result = f().await;
    let attributes = [KeyValue::new("db_operation_name", operation)];
    EXPLORER_METRICS.db_calls_response_time.record(start.elapsed().as_secs_f64(), &attributes);
    result
}

/// MongoDB backed transaction store. One document per transaction, keyed by hash.
pub struct MongoTransactionStore {
    database: Database,
    collection_name: String,
}

impl MongoTransactionStore {
    pub fn new(database: Database, collection_name: impl Into<String>) -> Self {
        Self { database, collection_name: collection_name.into() }
    }

    fn collection(&self) -> Collection<Document> {
        self.database.collection(&self.collection_name)
    }

    async fn find_by(&self, field: &str, address: Address) -> Result<Vec<Transaction>, StoreError> {
        let filter = doc! { field: to_bson(&address)? };
        let options = FindOptions::builder().projection(without_id()).build();
        let documents: Vec<Document> = self.collection().find(filter, options).await?.try_collect().await?;
        documents.into_iter().map(from_document).collect()
    }
}

#[async_trait]
impl TransactionStore for MongoTransactionStore {
    /// Every item is an independent upsert on `hash`, issued concurrently.
    /// Items whose upsert fails come back as unprocessed.
    async fn batch_write(&self, items: &[Transaction]) -> Result<BatchWriteOutput, StoreError> {
        if items.len() > WRITE_CHUNK_SIZE {
            return Err(StoreError::ChunkTooLarge { size: items.len(), max: WRITE_CHUNK_SIZE });
        }

        record_metrics("batch_write", || async {
            let collection = self.collection();
            let options = ReplaceOptions::builder().upsert(true).build();

            let mut upserts = Vec::with_capacity(items.len());
            for item in items {
                let filter = doc! { "hash": to_bson(&item.hash)? };
                let document = item.to_document()?;
                let collection = collection.clone();
                let options = options.clone();
                upserts.push(async move { collection.replace_one(filter, document, options).await });
            }

            let unprocessed = join_all(upserts)
                .await
                .into_iter()
                .zip(items)
                .filter_map(|(result, item)| match result {
                    Ok(_) => None,
                    Err(e) => {
                        warn!(hash = %item.hash, error = %e, "Upsert failed, item left unprocessed");
                        Some(item.clone())
                    }
                })
                .collect();

            Ok(BatchWriteOutput { unprocessed })
        })
        .await
    }

    async fn get_by_hash(&self, hash: B256) -> Result<Option<Transaction>, StoreError> {
        record_metrics("get_by_hash", || async {
            let filter = doc! { "hash": to_bson(&hash)? };
            let options = FindOneOptions::builder().projection(without_id()).build();
            self.collection().find_one(filter, options).await?.map(from_document).transpose()
        })
        .await
    }

    async fn get_by_from(&self, address: Address) -> Result<Vec<Transaction>, StoreError> {
        record_metrics("get_by_from", || self.find_by("from", address)).await
    }

    async fn get_by_to(&self, address: Address) -> Result<Vec<Transaction>, StoreError> {
        record_metrics("get_by_to", || self.find_by("to", address)).await
    }

    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "hash": 1 })
                .options(IndexOptions::builder().unique(true).name("hash_unique".to_string()).build())
                .build(),
            IndexModel::builder()
                .keys(doc! { "from": 1 })
                .options(IndexOptions::builder().name("from_index".to_string()).build())
                .build(),
            IndexModel::builder()
                .keys(doc! { "to": 1 })
                .options(IndexOptions::builder().name("to_index".to_string()).build())
                .build(),
        ];
        self.collection().create_indexes(indexes, None).await?;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.database.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }
}
