//! Embedding generation for semantic recall

mod client;
pub mod error;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;

#[cfg(test)]
mod client_tests;

use async_trait::async_trait;

pub use client::OpenAiEmbeddings;
pub use error::EmbeddingError;

/// Turns text into a vector for similarity search.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate the embedding for one text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Model identifier the vectors come from.
    fn model(&self) -> &str;
}
