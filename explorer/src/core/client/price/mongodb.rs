use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::options::{FindOneOptions, UpdateOptions};
use mongodb::{Collection, Database};

use crate::core::client::price::{PriceCache, PriceError};
use crate::core::client::store::mongodb::{from_document, ToDocument};
use crate::types::constant::PRICES_COLLECTION;
use crate::types::Price;

/// Price cache in the `prices` collection, one document per currency
pub struct MongoPriceCache {
    database: Database,
}

impl MongoPriceCache {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    fn collection(&self) -> Collection<Document> {
        self.database.collection(PRICES_COLLECTION)
    }
}

#[async_trait]
impl PriceCache for MongoPriceCache {
    async fn get(&self, currency: &str) -> Result<Option<Price>, PriceError> {
        let options = FindOneOptions::builder().projection(doc! { "_id": 0, "currency": 0 }).build();
        let document = self.collection().find_one(doc! { "currency": currency }, options).await?;
        Ok(document.map(from_document).transpose()?)
    }

    async fn put(&self, currency: &str, price: Price) -> Result<(), PriceError> {
        let options = UpdateOptions::builder().upsert(true).build();
        self.collection()
            .update_one(doc! { "currency": currency }, doc! { "$set": price.to_document()? }, options)
            .await?;
        Ok(())
    }
}
