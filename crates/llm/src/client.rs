use std::time::Duration;

use async_trait::async_trait;
use vault_recall_core::{OpenAiCredentials, truncate};

use crate::ChatCompletion;
use crate::ai_types::{ChatRequest, ChatResponse, Message};
use crate::error::LlmError;
use crate::settings::{ChatResult, PromptExecutionSettings};

/// Client for LLM API calls.
pub struct LlmClient {
    pub(crate) client: reqwest::Client,
    pub(crate) credentials: OpenAiCredentials,
    pub(crate) base_url: String,
    pub(crate) model: String,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("client", &self.client)
            .field("credentials", &self.credentials)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl LlmClient {
    /// Creates a new LLM client bound to `model`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(
        credentials: OpenAiCredentials,
        base_url: &str,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::ClientInit(e.to_string()))?;
        Ok(Self { client, credentials, base_url, model: model.into() })
    }

    /// Send a chat completion request and return the first choice.
    ///
    /// # Errors
    /// Returns an error if the HTTP request fails, the API returns a
    /// non-success status, the response body cannot be parsed, or the choices
    /// array is empty.
    async fn chat_completion(&self, request: &ChatRequest) -> Result<ChatResult, LlmError> {
        let mut builder = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.credentials.api_key()))
            .json(request);
        if let Some(org) = self.credentials.org_id() {
            builder = builder.header("OpenAI-Organization", org);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body =
                response.text().await.unwrap_or_else(|_| "Could not read error body".to_owned());
            let err = LlmError::HttpStatus { code: status.as_u16(), body };
            tracing::warn!(model = %self.model, transient = err.is_transient(), "chat completion rejected");
            return Err(err);
        }

        let body = response.text().await?;
        let chat_response: ChatResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::JsonParse {
                context: format!("chat completion response (body: {})", truncate(&body, 200)),
                source: e,
            })?;

        let usage = chat_response.usage;
        let first_choice = chat_response.choices.into_iter().next().ok_or(LlmError::EmptyResponse)?;
        Ok(ChatResult {
            content: first_choice.message.content.unwrap_or_default(),
            finish_reason: first_choice.finish_reason,
            usage,
        })
    }
}

#[async_trait]
impl ChatCompletion for LlmClient {
    async fn complete(
        &self,
        prompt: &str,
        settings: &PromptExecutionSettings,
    ) -> Result<ChatResult, LlmError> {
        if prompt.trim().is_empty() {
            return Err(LlmError::InvalidPrompt("rendered prompt is empty".to_owned()));
        }

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message { role: "user".to_owned(), content: prompt.to_owned() }],
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        };
        tracing::debug!(
            model = %self.model,
            prompt_len = prompt.len(),
            max_tokens = ?settings.max_tokens,
            temperature = ?settings.temperature,
            "sending chat completion"
        );

        let result = self.chat_completion(&request).await?;
        if let Some(usage) = result.usage {
            tracing::debug!(
                model = %self.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "chat completion finished"
            );
        }
        if result.is_truncated() {
            tracing::warn!(model = %self.model, max_tokens = ?settings.max_tokens, "completion hit the token bound");
        }
        Ok(result)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
