//! Typed error enum for the kernel crate.

use thiserror::Error;
use vault_recall_llm::LlmError;
use vault_recall_memory::MemoryError;

/// Errors from template parsing, function dispatch and prompt execution.
#[derive(Debug, Error)]
pub enum KernelError {
    #[error("template: {0}")]
    Template(String),

    #[error("function not found: {0}")]
    FunctionNotFound(String),

    #[error("chat service not found: {0}")]
    ServiceNotFound(String),

    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error("llm: {0}")]
    Llm(#[from] LlmError),

    #[error("memory: {0}")]
    Memory(#[from] MemoryError),

    #[error("model returned an empty result")]
    EmptyResult,
}

impl KernelError {
    pub(crate) fn invalid_argument(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument { name: name.to_owned(), reason: reason.into() }
    }
}
