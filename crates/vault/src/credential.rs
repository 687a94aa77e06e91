use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::error::VaultError;
use crate::types::{TokenResponse, describe_error_body};

/// Microsoft identity platform authority.
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

/// Scope granting access to Key Vault data-plane operations.
pub const KEY_VAULT_SCOPE: &str = "https://vault.azure.net/.default";

/// Tokens are refreshed this long before the identity platform says they expire.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Lifetime assumed when the token response omits `expires_in`.
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(300);

struct CachedToken {
    token: String,
    refresh_at: Instant,
}

/// Application (service principal) credential using the OAuth2
/// client-credentials grant.
pub struct ClientSecretCredential {
    client: reqwest::Client,
    tenant_id: String,
    client_id: String,
    client_secret: String,
    authority_host: String,
    cached: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for ClientSecretCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSecretCredential")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("authority_host", &self.authority_host)
            .finish()
    }
}

impl ClientSecretCredential {
    /// Creates a credential against the public Azure authority.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(
        tenant_id: String,
        client_id: String,
        client_secret: String,
        timeout: Duration,
    ) -> Result<Self, VaultError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VaultError::ClientInit(e.to_string()))?;
        Ok(Self {
            client,
            tenant_id,
            client_id,
            client_secret,
            authority_host: DEFAULT_AUTHORITY_HOST.to_owned(),
            cached: Mutex::new(None),
        })
    }

    /// Points the credential at a different authority (sovereign clouds, tests).
    #[must_use]
    pub fn with_authority_host(mut self, authority_host: &str) -> Self {
        self.authority_host = authority_host.trim_end_matches('/').to_owned();
        self
    }

    /// Returns a bearer token for Key Vault, exchanging credentials on first use.
    ///
    /// # Errors
    /// Returns [`VaultError::Authentication`] if the identity platform rejects
    /// the credentials, or a transport/parse error.
    pub async fn token(&self) -> Result<String, VaultError> {
        let mut cached = self.cached.lock().await;
        if let Some(entry) = cached.as_ref() {
            if Instant::now() < entry.refresh_at {
                return Ok(entry.token.clone());
            }
        }

        let fresh = self.request_token().await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }

    async fn request_token(&self) -> Result<CachedToken, VaultError> {
        let url = format!("{}/{}/oauth2/v2.0/token", self.authority_host, self.tenant_id);
        tracing::debug!(tenant = %self.tenant_id, client_id = %self.client_id, "requesting Key Vault token");

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", KEY_VAULT_SCOPE),
        ];
        let response = self.client.post(&url).form(&params).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(VaultError::Authentication {
                code: status.as_u16(),
                body: describe_error_body(&body),
            });
        }

        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|e| VaultError::JsonParse {
                context: "token response".to_owned(),
                source: e,
            })?;
        if parsed.access_token.is_empty() {
            return Err(VaultError::Authentication {
                code: status.as_u16(),
                body: "token response carried an empty access_token".to_owned(),
            });
        }

        let lifetime = parsed.expires_in.map_or(DEFAULT_TOKEN_LIFETIME, Duration::from_secs);
        let refresh_at = Instant::now() + lifetime.saturating_sub(EXPIRY_MARGIN);
        Ok(CachedToken { token: parsed.access_token, refresh_at })
    }
}
