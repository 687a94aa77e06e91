use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use vault_recall_core::{cosine_similarity, is_zero_vector};

use crate::error::MemoryError;
use crate::types::MemoryRecord;

/// Collection-scoped record storage with similarity lookup.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Create the collection if it does not exist yet.
    async fn create_collection(&self, collection: &str) -> Result<(), MemoryError>;

    async fn does_collection_exist(&self, collection: &str) -> bool;

    /// Collection names, sorted.
    async fn get_collections(&self) -> Vec<String>;

    async fn delete_collection(&self, collection: &str) -> Result<(), MemoryError>;

    /// Insert or replace the record with the same id. Returns its key.
    async fn upsert(&self, collection: &str, record: MemoryRecord) -> Result<String, MemoryError>;

    async fn get(
        &self,
        collection: &str,
        key: &str,
        with_embedding: bool,
    ) -> Result<Option<MemoryRecord>, MemoryError>;

    async fn remove(&self, collection: &str, key: &str) -> Result<(), MemoryError>;

    /// Records most similar to `embedding`, best first, with their relevance.
    ///
    /// Only records scoring at least `min_relevance` are returned. A missing
    /// collection yields no matches.
    async fn get_nearest_matches(
        &self,
        collection: &str,
        embedding: &[f32],
        limit: usize,
        min_relevance: f32,
        with_embeddings: bool,
    ) -> Result<Vec<(MemoryRecord, f32)>, MemoryError>;
}

/// Process-local store. Nothing is persisted; dropping the store drops every record.
#[derive(Debug, Default)]
pub struct VolatileMemoryStore {
    collections: RwLock<HashMap<String, HashMap<String, MemoryRecord>>>,
}

impl VolatileMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn validate_collection(collection: &str) -> Result<(), MemoryError> {
    if collection.trim().is_empty() {
        return Err(MemoryError::InvalidInput("collection name is empty".to_owned()));
    }
    Ok(())
}

#[async_trait]
impl MemoryStore for VolatileMemoryStore {
    async fn create_collection(&self, collection: &str) -> Result<(), MemoryError> {
        validate_collection(collection)?;
        let mut collections = self.collections.write().await;
        collections.entry(collection.to_owned()).or_default();
        Ok(())
    }

    async fn does_collection_exist(&self, collection: &str) -> bool {
        self.collections.read().await.contains_key(collection)
    }

    async fn get_collections(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    async fn delete_collection(&self, collection: &str) -> Result<(), MemoryError> {
        match self.collections.write().await.remove(collection) {
            Some(_) => Ok(()),
            None => Err(MemoryError::CollectionNotFound(collection.to_owned())),
        }
    }

    async fn upsert(&self, collection: &str, mut record: MemoryRecord) -> Result<String, MemoryError> {
        if record.metadata.id.is_empty() {
            return Err(MemoryError::InvalidInput("record id is empty".to_owned()));
        }
        let mut collections = self.collections.write().await;
        let records = collections
            .get_mut(collection)
            .ok_or_else(|| MemoryError::CollectionNotFound(collection.to_owned()))?;

        record.key = record.metadata.id.clone();
        let key = record.key.clone();
        if records.insert(key.clone(), record).is_some() {
            tracing::debug!(collection, key = %key, "replaced existing memory record");
        }
        Ok(key)
    }

    async fn get(
        &self,
        collection: &str,
        key: &str,
        with_embedding: bool,
    ) -> Result<Option<MemoryRecord>, MemoryError> {
        let collections = self.collections.read().await;
        let records = collections
            .get(collection)
            .ok_or_else(|| MemoryError::CollectionNotFound(collection.to_owned()))?;
        Ok(records.get(key).cloned().map(|r| if with_embedding { r } else { r.without_embedding() }))
    }

    async fn remove(&self, collection: &str, key: &str) -> Result<(), MemoryError> {
        let mut collections = self.collections.write().await;
        let records = collections
            .get_mut(collection)
            .ok_or_else(|| MemoryError::CollectionNotFound(collection.to_owned()))?;
        records.remove(key);
        Ok(())
    }

    async fn get_nearest_matches(
        &self,
        collection: &str,
        embedding: &[f32],
        limit: usize,
        min_relevance: f32,
        with_embeddings: bool,
    ) -> Result<Vec<(MemoryRecord, f32)>, MemoryError> {
        if limit == 0 || is_zero_vector(embedding) {
            return Ok(Vec::new());
        }
        let collections = self.collections.read().await;
        let Some(records) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut scored: Vec<(&MemoryRecord, f32)> = records
            .values()
            .filter(|r| !is_zero_vector(&r.embedding))
            .map(|r| (r, cosine_similarity(embedding, &r.embedding)))
            .filter(|(_, score)| *score >= min_relevance)
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.key.cmp(&b.0.key)));
        scored.truncate(limit);

        Ok(scored
            .into_iter()
            .map(|(r, score)| {
                let record = if with_embeddings { r.clone() } else { r.clone().without_embedding() };
                (record, score)
            })
            .collect())
    }
}
