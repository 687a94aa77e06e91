//! Typed error enum for the vault crate.

use thiserror::Error;

/// Errors from credential exchange and secret retrieval.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    #[error("authentication failed with HTTP status {code}: {body}")]
    Authentication { code: u16, body: String },
    #[error("secret '{name}' request failed with HTTP status {code}: {body}")]
    SecretStatus { name: String, code: u16, body: String },
    #[error("JSON parse error in {context}: {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("secret '{0}' is empty")]
    EmptySecret(String),
    #[error("invalid vault name: '{0}'")]
    InvalidVaultName(String),
    #[error("invalid secret name: '{0}'")]
    InvalidSecretName(String),
    #[error("client initialization failed: {0}")]
    ClientInit(String),
}

impl VaultError {
    /// Whether the failure came from rejected credentials or missing access rights.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Self::Authentication { .. } => true,
            Self::SecretStatus { code, .. } => matches!(code, 401 | 403),
            _ => false,
        }
    }
}
