//! Core types and helpers for vault-recall
//!
//! This crate contains domain types shared across all other crates.

pub mod constants;
mod credentials;
mod env_config;
mod error;
mod similarity;
mod text;

pub use credentials::*;
pub use env_config::env_parse_with_default;
pub use error::*;
pub use similarity::*;
pub use text::*;
