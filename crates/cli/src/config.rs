//! User configuration: a TOML file plus environment overrides.
//!
//! The file lives at `{config_dir}/vault-recall/secrets.toml` unless a path is
//! given. Every key may be overridden by a `VAULT_RECALL_*` variable; the four
//! vault keys must end up non-empty before anything touches the network.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use vault_recall_core::constants::{HTTP_TIMEOUT_ENV, HTTP_TIMEOUT_SECS, OPENAI_BASE_URL};
use vault_recall_core::env_parse_with_default;
use vault_recall_service::VaultSettings;

pub(crate) const ENV_APP_TENANT: &str = "VAULT_RECALL_APP_TENANT";
pub(crate) const ENV_APP_ID: &str = "VAULT_RECALL_APP_ID";
pub(crate) const ENV_APP_PASSWORD: &str = "VAULT_RECALL_APP_PASSWORD";
pub(crate) const ENV_KEY_VAULT: &str = "VAULT_RECALL_KEY_VAULT";
pub(crate) const ENV_AUTHORITY_HOST: &str = "VAULT_RECALL_AUTHORITY_HOST";
pub(crate) const ENV_OPENAI_BASE_URL: &str = "VAULT_RECALL_OPENAI_BASE_URL";
pub(crate) const ENV_VAULT_URI: &str = "VAULT_RECALL_VAULT_URI";

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("missing configuration value '{0}' (set it in secrets.toml or the matching VAULT_RECALL_* variable)")]
    Missing(&'static str),
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FileConfig {
    #[serde(rename = "appTenant")]
    app_tenant: Option<String>,
    #[serde(rename = "appId")]
    app_id: Option<String>,
    #[serde(rename = "appPassword")]
    app_password: Option<String>,
    #[serde(rename = "KeyVault")]
    key_vault: Option<String>,
    #[serde(rename = "authorityHost")]
    authority_host: Option<String>,
    #[serde(rename = "openAiBaseUrl")]
    openai_base_url: Option<String>,
    /// Full vault URI, for private endpoints; `KeyVault` still names the vault.
    #[serde(rename = "vaultUri")]
    vault_uri: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct AppConfig {
    pub vault: VaultSettings,
    pub openai_base_url: String,
    pub http_timeout: Duration,
}

pub(crate) fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("vault-recall").join("secrets.toml"))
}

/// Load from `explicit` (which must exist) or the default location (which may not).
pub(crate) fn load(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let file = match explicit {
        Some(path) => read_file(path)?,
        None => match default_config_path() {
            Some(path) if path.exists() => read_file(&path)?,
            _ => FileConfig::default(),
        },
    };
    let timeout = Duration::from_secs(env_parse_with_default(HTTP_TIMEOUT_ENV, HTTP_TIMEOUT_SECS));
    resolve(file, |key| std::env::var(key).ok(), timeout)
}

pub(crate) fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    let parsed = toml::from_str(&raw)
        .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
    tracing::debug!(path = %path.display(), "read config file");
    Ok(parsed)
}

/// Apply overrides from `env` on top of `file` and validate required keys.
pub(crate) fn resolve(
    file: FileConfig,
    env: impl Fn(&str) -> Option<String>,
    http_timeout: Duration,
) -> Result<AppConfig, ConfigError> {
    let non_blank = |v: String| Some(v.trim().to_owned()).filter(|v| !v.is_empty());
    let pick = |var: &str, from_file: Option<String>| {
        env(var).and_then(non_blank).or_else(|| from_file.and_then(non_blank))
    };
    let required = |var: &str, from_file: Option<String>, key: &'static str| {
        pick(var, from_file).ok_or(ConfigError::Missing(key))
    };

    let vault = VaultSettings {
        tenant_id: required(ENV_APP_TENANT, file.app_tenant, "appTenant")?,
        client_id: required(ENV_APP_ID, file.app_id, "appId")?,
        client_secret: required(ENV_APP_PASSWORD, file.app_password, "appPassword")?,
        vault_name: required(ENV_KEY_VAULT, file.key_vault, "KeyVault")?,
        authority_host: pick(ENV_AUTHORITY_HOST, file.authority_host),
        vault_uri: pick(ENV_VAULT_URI, file.vault_uri),
    };
    let openai_base_url = pick(ENV_OPENAI_BASE_URL, file.openai_base_url)
        .unwrap_or_else(|| OPENAI_BASE_URL.to_owned());

    Ok(AppConfig { vault, openai_base_url, http_timeout })
}
