//! Generic CRUD persistence and its two backends.

use crate::models::Text;
use crate::services::MongoDb;
use async_trait::async_trait;
use dashmap::DashMap;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::ReplaceOptions,
    Collection,
};
use service_core::error::AppError;
use std::sync::Arc;

/// Lazy, finite, single-pass sequence of entities.
pub type EntityStream<T> = BoxStream<'static, Result<T, AppError>>;

/// Create/read/update/delete keyed by identifier. No custom queries.
#[async_trait]
pub trait CrudRepository<T, ID>: Send + Sync
where
    T: Send + 'static,
    ID: Send + 'static,
{
    /// Insert when the entity has no identifier, full replace otherwise.
    /// The returned entity always carries its identifier.
    async fn save(&self, entity: T) -> Result<T, AppError>;

    async fn find_by_id(&self, id: ID) -> Result<Option<T>, AppError>;

    async fn find_all(&self) -> Result<EntityStream<T>, AppError>;

    /// Returns whether anything was removed.
    async fn delete_by_id(&self, id: ID) -> Result<bool, AppError>;

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}

pub type TextRepository = dyn CrudRepository<Text, ObjectId>;

#[derive(Clone)]
pub struct MongoTextRepository {
    db: MongoDb,
    collection: Collection<Text>,
}

impl MongoTextRepository {
    pub fn new(db: MongoDb, collection: &str) -> Self {
        let collection = db.collection(collection);
        Self { db, collection }
    }

    pub fn collection(&self) -> &Collection<Text> {
        &self.collection
    }
}

#[async_trait]
impl CrudRepository<Text, ObjectId> for MongoTextRepository {
    async fn save(&self, mut text: Text) -> Result<Text, AppError> {
        match text.id {
            None => {
                let result = self.collection.insert_one(&text, None).await?;
                let id = result.inserted_id.as_object_id().ok_or_else(|| {
                    AppError::DatabaseError(anyhow::anyhow!(
                        "Inserted id is not an ObjectId: {}",
                        result.inserted_id
                    ))
                })?;
                text.id = Some(id);
            }
            Some(id) => {
                let options = ReplaceOptions::builder().upsert(true).build();
                self.collection
                    .replace_one(doc! { "_id": id }, &text, options)
                    .await?;
            }
        }
        Ok(text)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Text>, AppError> {
        Ok(self.collection.find_one(doc! { "_id": id }, None).await?)
    }

    async fn find_all(&self) -> Result<EntityStream<Text>, AppError> {
        let cursor = self.collection.find(None, None).await?;
        Ok(cursor.map_err(AppError::from).boxed())
    }

    async fn delete_by_id(&self, id: ObjectId) -> Result<bool, AppError> {
        let result = self.collection.delete_one(doc! { "_id": id }, None).await?;
        Ok(result.deleted_count > 0)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.db.health_check().await
    }
}

/// Process-local backend; identifiers are generated here instead of by the server.
#[derive(Clone, Default)]
pub struct InMemoryTextRepository {
    texts: Arc<DashMap<ObjectId, Text>>,
}

impl InMemoryTextRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CrudRepository<Text, ObjectId> for InMemoryTextRepository {
    async fn save(&self, mut text: Text) -> Result<Text, AppError> {
        let id = *text.id.get_or_insert_with(ObjectId::new);
        self.texts.insert(id, text.clone());
        Ok(text)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Text>, AppError> {
        Ok(self.texts.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_all(&self) -> Result<EntityStream<Text>, AppError> {
        // Snapshot so the stream does not hold shard locks while it is polled.
        let mut texts: Vec<Text> = self.texts.iter().map(|e| e.value().clone()).collect();
        texts.sort_by_key(|text| text.id);
        Ok(stream::iter(texts.into_iter().map(Ok)).boxed())
    }

    async fn delete_by_id(&self, id: ObjectId) -> Result<bool, AppError> {
        Ok(self.texts.remove(&id).is_some())
    }
}
