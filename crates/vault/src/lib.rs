//! Key Vault secret retrieval
//!
//! Exchanges application credentials for a bearer token and reads named
//! secrets over the Key Vault REST API. Callers depend on [`SecretProvider`]
//! so a test double can stand in for the remote vault.

mod client;
mod credential;
pub mod error;
mod types;


pub use client::{API_VERSION, KeyVaultClient, SecretProvider, vault_uri_for};
pub use credential::{ClientSecretCredential, DEFAULT_AUTHORITY_HOST, KEY_VAULT_SCOPE};
pub use error::VaultError;
