use async_trait::async_trait;
use vault_recall_llm::TokenUsage;

use crate::arguments::KernelArguments;
use crate::error::KernelError;
use crate::kernel::Kernel;

/// Output of one function invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionResult {
    pub value: String,
    /// Token accounting when the function called a model.
    pub usage: Option<TokenUsage>,
}

impl FunctionResult {
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self { value: value.into(), usage: None }
    }
}

impl std::fmt::Display for FunctionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

/// A named operation callable from templates and from code.
#[async_trait]
pub trait KernelFunction: Send + Sync {
    fn name(&self) -> &str;

    async fn invoke(
        &self,
        kernel: &Kernel,
        args: &KernelArguments,
    ) -> Result<FunctionResult, KernelError>;
}
