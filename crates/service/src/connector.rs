use std::sync::Arc;
use std::time::Duration;

use vault_recall_core::{ChatModelSpec, OpenAiCredentials};
use vault_recall_embeddings::{EmbeddingProvider, OpenAiEmbeddings};
use vault_recall_llm::{ChatCompletion, LlmClient};

use crate::ServiceError;

/// Builds model clients once credentials are known.
pub trait ModelConnector: Send + Sync {
    fn chat(
        &self,
        credentials: &OpenAiCredentials,
        spec: &ChatModelSpec,
    ) -> Result<Arc<dyn ChatCompletion>, ServiceError>;

    fn embeddings(
        &self,
        credentials: &OpenAiCredentials,
        model: &str,
    ) -> Result<Arc<dyn EmbeddingProvider>, ServiceError>;
}

/// Connects to the OpenAI API (or a compatible endpoint at `base_url`).
#[derive(Debug, Clone)]
pub struct OpenAiConnector {
    base_url: String,
    timeout: Duration,
}

impl OpenAiConnector {
    #[must_use]
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self { base_url: base_url.into(), timeout }
    }
}

impl ModelConnector for OpenAiConnector {
    fn chat(
        &self,
        credentials: &OpenAiCredentials,
        spec: &ChatModelSpec,
    ) -> Result<Arc<dyn ChatCompletion>, ServiceError> {
        let client = LlmClient::new(credentials.clone(), &self.base_url, &spec.model_id, self.timeout)?;
        Ok(Arc::new(client))
    }

    fn embeddings(
        &self,
        credentials: &OpenAiCredentials,
        model: &str,
    ) -> Result<Arc<dyn EmbeddingProvider>, ServiceError> {
        let client = OpenAiEmbeddings::new(credentials.clone(), &self.base_url, model, self.timeout)?;
        Ok(Arc::new(client))
    }
}
