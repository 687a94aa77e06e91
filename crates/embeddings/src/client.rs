use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vault_recall_core::{OpenAiCredentials, truncate};

use crate::EmbeddingProvider;
use crate::error::EmbeddingError;

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Client for the OpenAI `/v1/embeddings` endpoint.
pub struct OpenAiEmbeddings {
    client: reqwest::Client,
    credentials: OpenAiCredentials,
    base_url: String,
    model: String,
}

impl std::fmt::Debug for OpenAiEmbeddings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEmbeddings")
            .field("credentials", &self.credentials)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiEmbeddings {
    /// Creates an embeddings client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(
        credentials: OpenAiCredentials,
        base_url: &str,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, EmbeddingError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EmbeddingError::ClientInit(e.to_string()))?;
        Ok(Self {
            client,
            credentials,
            base_url: base_url.trim_end_matches('/').to_owned(),
            model: model.into(),
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::InvalidInput("cannot embed empty text".to_owned()));
        }

        let mut request = self
            .client
            .post(format!("{}/v1/embeddings", self.base_url))
            .bearer_auth(self.credentials.api_key())
            .json(&EmbeddingRequest { model: &self.model, input: text });
        if let Some(org) = self.credentials.org_id() {
            request = request.header("OpenAI-Organization", org);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(EmbeddingError::HttpStatus { code: status.as_u16(), body });
        }

        let parsed: EmbeddingResponse =
            serde_json::from_str(&body).map_err(|e| EmbeddingError::JsonParse {
                context: format!("embedding response (body: {})", truncate(&body, 200)),
                source: e,
            })?;

        let vector = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .filter(|v| !v.is_empty())
            .ok_or(EmbeddingError::EmptyResult)?;
        tracing::debug!(model = %self.model, dimension = vector.len(), "embedding generated");
        Ok(vector)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
