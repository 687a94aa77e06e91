use serde::Deserialize;

/// OAuth2 token endpoint response.
#[derive(Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Key Vault `GET /secrets/{name}` response. Only `value` is used.
#[derive(Deserialize)]
pub(crate) struct SecretBundle {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

/// Key Vault error envelope: `{"error": {"code": "...", "message": "..."}}`.
#[derive(Deserialize)]
pub(crate) struct VaultErrorEnvelope {
    pub error: VaultErrorBody,
}

#[derive(Deserialize)]
pub(crate) struct VaultErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Identity platform error: `{"error": "...", "error_description": "..."}`.
#[derive(Deserialize)]
pub(crate) struct TokenErrorBody {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

/// Pulls a readable message out of an Azure error body, falling back to the raw body.
pub(crate) fn describe_error_body(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<VaultErrorEnvelope>(body) {
        let code = envelope.error.code.unwrap_or_default();
        let message = envelope.error.message.unwrap_or_default();
        return format!("{code}: {message}");
    }
    if let Ok(token_err) = serde_json::from_str::<TokenErrorBody>(body) {
        return match token_err.error_description {
            Some(desc) => format!("{}: {desc}", token_err.error),
            None => token_err.error,
        };
    }
    vault_recall_core::truncate(body, 300).to_owned()
}
