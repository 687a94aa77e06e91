use async_trait::async_trait;
use vault_recall_llm::PromptExecutionSettings;

use crate::arguments::KernelArguments;
use crate::error::KernelError;
use crate::function::{FunctionResult, KernelFunction};
use crate::kernel::Kernel;
use crate::template::PromptTemplate;

/// A function whose body is a prompt template sent to a chat service.
#[derive(Debug, Clone)]
pub struct PromptFunction {
    name: String,
    template: PromptTemplate,
    settings: PromptExecutionSettings,
}

impl PromptFunction {
    /// Parse `prompt` and bind it to `settings`.
    ///
    /// # Errors
    /// Returns [`KernelError::Template`] if the prompt does not parse.
    pub fn from_prompt(
        name: impl Into<String>,
        prompt: &str,
        settings: PromptExecutionSettings,
    ) -> Result<Self, KernelError> {
        Ok(Self { name: name.into(), template: PromptTemplate::parse(prompt)?, settings })
    }
}

#[async_trait]
impl KernelFunction for PromptFunction {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(
        &self,
        kernel: &Kernel,
        args: &KernelArguments,
    ) -> Result<FunctionResult, KernelError> {
        let rendered = self.template.render(kernel, args).await?;
        let service = kernel.chat_service(self.settings.service_id.as_deref())?;
        tracing::info!(function = %self.name, model = service.model(), prompt_len = rendered.len(), "invoking chat service");

        let result = service.complete(&rendered, &self.settings).await?;
        if result.content.trim().is_empty() {
            return Err(KernelError::EmptyResult);
        }
        Ok(FunctionResult { value: result.content, usage: result.usage })
    }
}
