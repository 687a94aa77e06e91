//! Chat completion client for OpenAI-compatible endpoints

mod ai_types;
mod client;
mod error;
mod settings;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;


use async_trait::async_trait;

pub use ai_types::TokenUsage;
pub use client::LlmClient;
pub use error::LlmError;
pub use settings::{ChatResult, PromptExecutionSettings};

/// A model that turns a rendered prompt into text.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Run one completion for `prompt`.
    async fn complete(
        &self,
        prompt: &str,
        settings: &PromptExecutionSettings,
    ) -> Result<ChatResult, LlmError>;

    /// Model identifier requests are sent with.
    fn model(&self) -> &str;
}
