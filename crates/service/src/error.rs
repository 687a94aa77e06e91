//! Typed error enum for the service layer.
//!
//! Unifies vault, model, memory and kernel failures into a single error type
//! so the binary can report which collaborator stopped the run.

use thiserror::Error;
use vault_recall_core::CoreError;
use vault_recall_embeddings::EmbeddingError;
use vault_recall_kernel::KernelError;
use vault_recall_llm::LlmError;
use vault_recall_memory::MemoryError;
use vault_recall_vault::VaultError;

/// Service-layer error unifying every collaborator failure.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Credential exchange or secret read failed.
    #[error("vault: {0}")]
    Vault(#[from] VaultError),

    /// Chat completion client failed.
    #[error("llm: {0}")]
    Llm(#[from] LlmError),

    /// Embedding client failed.
    #[error("embedding: {0}")]
    Embedding(#[from] EmbeddingError),

    /// Memory store rejected an operation.
    #[error("memory: {0}")]
    Memory(#[from] MemoryError),

    /// Template rendering or prompt execution failed.
    #[error("kernel: {0}")]
    Kernel(#[from] KernelError),

    /// A value read from configuration or the vault is unusable.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<CoreError> for ServiceError {
    fn from(e: CoreError) -> Self {
        Self::InvalidInput(e.to_string())
    }
}

impl ServiceError {
    /// Whether the run stopped before any model service was contacted.
    pub fn is_vault_failure(&self) -> bool {
        matches!(self, Self::Vault(_))
    }
}
