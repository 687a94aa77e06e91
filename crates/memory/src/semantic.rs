use std::sync::Arc;

use vault_recall_embeddings::EmbeddingProvider;

use crate::error::MemoryError;
use crate::store::MemoryStore;
use crate::types::{MemoryQueryResult, MemoryRecord, MemoryRecordMetadata};

/// Text memory: embeds on save and on search, delegates storage to a [`MemoryStore`].
pub struct SemanticTextMemory {
    store: Arc<dyn MemoryStore>,
    embeddings: Arc<dyn EmbeddingProvider>,
}

impl std::fmt::Debug for SemanticTextMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticTextMemory")
            .field("embedding_model", &self.embeddings.model())
            .finish_non_exhaustive()
    }
}

impl SemanticTextMemory {
    #[must_use]
    pub fn new(store: Arc<dyn MemoryStore>, embeddings: Arc<dyn EmbeddingProvider>) -> Self {
        Self { store, embeddings }
    }

    /// Embed `text` and store it under `id`, creating the collection on demand.
    ///
    /// Saving an existing id replaces the earlier record.
    pub async fn save_information(
        &self,
        collection: &str,
        id: &str,
        text: &str,
        description: Option<&str>,
        additional_metadata: Option<&str>,
    ) -> Result<String, MemoryError> {
        if id.trim().is_empty() {
            return Err(MemoryError::InvalidInput("memory id is empty".to_owned()));
        }
        let embedding = self.embeddings.embed(text).await?;

        let mut metadata = MemoryRecordMetadata::new(id, text);
        metadata.description = description.unwrap_or_default().to_owned();
        metadata.additional_metadata = additional_metadata.unwrap_or_default().to_owned();

        self.store.create_collection(collection).await?;
        let key = self.store.upsert(collection, MemoryRecord::local(metadata, embedding)).await?;
        tracing::info!(collection, id, "saved memory record");
        Ok(key)
    }

    /// Look up a record by id. `Ok(None)` when the collection or id is unknown.
    pub async fn get(
        &self,
        collection: &str,
        id: &str,
        with_embedding: bool,
    ) -> Result<Option<MemoryQueryResult>, MemoryError> {
        if !self.store.does_collection_exist(collection).await {
            return Ok(None);
        }
        let record = self.store.get(collection, id, with_embedding).await?;
        Ok(record.map(|r| MemoryQueryResult {
            metadata: r.metadata,
            relevance: 1.0,
            embedding: with_embedding.then_some(r.embedding),
        }))
    }

    /// Remove a record. Unknown collections and ids are ignored.
    pub async fn remove(&self, collection: &str, id: &str) -> Result<(), MemoryError> {
        if !self.store.does_collection_exist(collection).await {
            return Ok(());
        }
        self.store.remove(collection, id).await
    }

    /// Records most relevant to `query`, best first.
    pub async fn search(
        &self,
        collection: &str,
        query: &str,
        limit: usize,
        min_relevance: f32,
        with_embeddings: bool,
    ) -> Result<Vec<MemoryQueryResult>, MemoryError> {
        let query_embedding = self.embeddings.embed(query).await?;
        let matches = self
            .store
            .get_nearest_matches(collection, &query_embedding, limit, min_relevance, with_embeddings)
            .await?;
        tracing::debug!(collection, query, hits = matches.len(), "memory search");

        Ok(matches
            .into_iter()
            .map(|(record, relevance)| MemoryQueryResult {
                metadata: record.metadata,
                relevance,
                embedding: with_embeddings.then_some(record.embedding),
            })
            .collect())
    }

    pub async fn get_collections(&self) -> Vec<String> {
        self.store.get_collections().await
    }
}
