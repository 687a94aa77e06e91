//! Service layer for vault-recall
//!
//! Runs the tour: secrets from the vault, model clients, a seeded volatile
//! memory and one templated prompt. Collaborators come in through
//! [`SecretProvider`](vault_recall_vault::SecretProvider) and
//! [`ModelConnector`] so tests can replace the network.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]

mod connector;
mod error;
mod tour;
mod vault_settings;

#[cfg(test)]
mod tour_tests;

pub use connector::{ModelConnector, OpenAiConnector};
pub use error::ServiceError;
pub use tour::{TourOptions, TourOutcome, build_kernel, fetch_credentials, run_tour, seed_memory};
pub use vault_settings::VaultSettings;
