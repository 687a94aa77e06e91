use std::sync::Arc;
use std::time::Duration;

use vault_recall_vault::{ClientSecretCredential, KeyVaultClient};

use crate::ServiceError;

/// Everything needed to reach the vault holding the OpenAI secrets.
#[derive(Clone, PartialEq, Eq)]
pub struct VaultSettings {
    pub vault_name: String,
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    /// Identity authority override. `None` uses the public cloud.
    pub authority_host: Option<String>,
    /// Full vault URI override. `None` derives it from `vault_name`.
    pub vault_uri: Option<String>,
}

impl std::fmt::Debug for VaultSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSettings")
            .field("vault_name", &self.vault_name)
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("authority_host", &self.authority_host)
            .field("vault_uri", &self.vault_uri)
            .finish()
    }
}

impl VaultSettings {
    /// Build the vault client. No network traffic happens here.
    pub fn connect(&self, timeout: Duration) -> Result<KeyVaultClient, ServiceError> {
        let mut credential = ClientSecretCredential::new(
            self.tenant_id.clone(),
            self.client_id.clone(),
            self.client_secret.clone(),
            timeout,
        )?;
        if let Some(host) = &self.authority_host {
            credential = credential.with_authority_host(host);
        }

        let credential = Arc::new(credential);
        let client = match &self.vault_uri {
            Some(uri) => KeyVaultClient::new(uri, credential, timeout)?,
            None => KeyVaultClient::for_vault(&self.vault_name, credential, timeout)?,
        };
        tracing::debug!(vault_uri = client.vault_uri(), "vault client ready");
        Ok(client)
    }
}
