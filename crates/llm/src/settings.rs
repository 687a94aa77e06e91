/// Per-invocation knobs for a chat completion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptExecutionSettings {
    /// Upper bound on generated tokens.
    pub max_tokens: Option<u32>,
    /// Sampling temperature.
    pub temperature: Option<f32>,
    /// Chat service to run on. `None` selects the kernel's default service.
    pub service_id: Option<String>,
}

impl PromptExecutionSettings {
    #[must_use]
    pub fn new(max_tokens: u32, temperature: f32) -> Self {
        Self { max_tokens: Some(max_tokens), temperature: Some(temperature), service_id: None }
    }

    #[must_use]
    pub fn with_service_id(mut self, service_id: impl Into<String>) -> Self {
        self.service_id = Some(service_id.into());
        self
    }
}

/// Text produced by one completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResult {
    pub content: String,
    pub finish_reason: Option<String>,
    pub usage: Option<crate::TokenUsage>,
}

impl ChatResult {
    /// Whether generation stopped because it hit the token bound.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.finish_reason.as_deref() == Some("length")
    }
}
