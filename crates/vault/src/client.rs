use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::credential::ClientSecretCredential;
use crate::error::VaultError;
use crate::types::{SecretBundle, describe_error_body};

/// Key Vault REST API version used for secret reads.
pub const API_VERSION: &str = "7.4";

/// Source of named secret strings.
#[async_trait]
pub trait SecretProvider: Send + Sync {
    /// Fetch the current value of the named secret.
    async fn get_secret(&self, name: &str) -> Result<String, VaultError>;
}

/// Builds `https://{vault_name}.vault.azure.net/`.
///
/// # Errors
/// Returns [`VaultError::InvalidVaultName`] for empty names or names holding
/// anything other than ASCII alphanumerics and `-`.
pub fn vault_uri_for(vault_name: &str) -> Result<String, VaultError> {
    let name = vault_name.trim();
    if !is_valid_name(name) {
        return Err(VaultError::InvalidVaultName(vault_name.to_owned()));
    }
    Ok(format!("https://{name}.vault.azure.net/"))
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Secret reader for one Key Vault.
#[derive(Debug)]
pub struct KeyVaultClient {
    client: reqwest::Client,
    vault_uri: String,
    credential: Arc<ClientSecretCredential>,
}

impl KeyVaultClient {
    /// Creates a client for the vault at `vault_uri` (normalized to end with `/`).
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(
        vault_uri: &str,
        credential: Arc<ClientSecretCredential>,
        timeout: Duration,
    ) -> Result<Self, VaultError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VaultError::ClientInit(e.to_string()))?;
        let vault_uri = format!("{}/", vault_uri.trim_end_matches('/'));
        Ok(Self { client, vault_uri, credential })
    }

    /// Creates a client for the named vault in the public cloud.
    ///
    /// # Errors
    /// Returns [`VaultError::InvalidVaultName`] if the name cannot form a vault URI.
    pub fn for_vault(
        vault_name: &str,
        credential: Arc<ClientSecretCredential>,
        timeout: Duration,
    ) -> Result<Self, VaultError> {
        Self::new(&vault_uri_for(vault_name)?, credential, timeout)
    }

    #[must_use]
    pub fn vault_uri(&self) -> &str {
        &self.vault_uri
    }
}

#[async_trait]
impl SecretProvider for KeyVaultClient {
    async fn get_secret(&self, name: &str) -> Result<String, VaultError> {
        if !is_valid_name(name) {
            return Err(VaultError::InvalidSecretName(name.to_owned()));
        }
        let token = self.credential.token().await?;
        let url = format!("{}secrets/{name}", self.vault_uri);

        let response = self
            .client
            .get(&url)
            .query(&[("api-version", API_VERSION)])
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(VaultError::SecretStatus {
                name: name.to_owned(),
                code: status.as_u16(),
                body: describe_error_body(&body),
            });
        }

        let bundle: SecretBundle =
            serde_json::from_str(&body).map_err(|e| VaultError::JsonParse {
                context: format!("secret '{name}' response"),
                source: e,
            })?;
        tracing::debug!(secret = name, id = bundle.id.as_deref().unwrap_or(""), "secret retrieved");

        match bundle.value {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(VaultError::EmptySecret(name.to_owned())),
        }
    }
}
