//! Typed error enum for the memory crate.

use thiserror::Error;
use vault_recall_embeddings::EmbeddingError;

/// Errors from memory store and semantic memory operations.
#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("collection not found: {0}")]
    CollectionNotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("embedding: {0}")]
    Embedding(#[from] EmbeddingError),
}
