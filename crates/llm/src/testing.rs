//! Chat completion double for tests in this and dependent crates.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::{ChatCompletion, ChatResult, LlmError, PromptExecutionSettings, TokenUsage};

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Status(u16, String),
}

/// Returns a canned reply and records every prompt and settings it receives.
#[derive(Debug)]
pub struct ScriptedChat {
    model: String,
    reply: Reply,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, PromptExecutionSettings)>>,
}

impl ScriptedChat {
    #[must_use]
    pub fn replying(model: &str, text: &str) -> Self {
        Self::with_reply(model, Reply::Text(text.to_owned()))
    }

    /// Fails every call with an HTTP status error.
    #[must_use]
    pub fn failing(model: &str, code: u16, body: &str) -> Self {
        Self::with_reply(model, Reply::Status(code, body.to_owned()))
    }

    fn with_reply(model: &str, reply: Reply) -> Self {
        Self { model: model.to_owned(), reply, calls: AtomicUsize::new(0), seen: Mutex::new(Vec::new()) }
    }

    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received so far, oldest first.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.seen.lock().map(|s| s.iter().map(|(p, _)| p.clone()).collect()).unwrap_or_default()
    }

    /// Settings received with the most recent call.
    #[must_use]
    pub fn last_settings(&self) -> Option<PromptExecutionSettings> {
        self.seen.lock().ok().and_then(|s| s.last().map(|(_, settings)| settings.clone()))
    }
}

#[async_trait]
impl ChatCompletion for ScriptedChat {
    async fn complete(
        &self,
        prompt: &str,
        settings: &PromptExecutionSettings,
    ) -> Result<ChatResult, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.seen.lock() {
            seen.push((prompt.to_owned(), settings.clone()));
        }
        match &self.reply {
            Reply::Text(text) => Ok(ChatResult {
                content: text.clone(),
                finish_reason: Some("stop".to_owned()),
                usage: Some(TokenUsage { prompt_tokens: 10, completion_tokens: 5, total_tokens: 15 }),
            }),
            Reply::Status(code, body) => Err(LlmError::HttpStatus { code: *code, body: body.clone() }),
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}
