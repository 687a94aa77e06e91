//! Volatile semantic text memory
//!
//! Records live in process memory only: each [`VolatileMemoryStore`] starts
//! empty and nothing survives the process.

pub mod error;
mod semantic;
mod store;
mod types;

#[cfg(test)]
mod semantic_tests;

pub use error::MemoryError;
pub use semantic::SemanticTextMemory;
pub use store::{MemoryStore, VolatileMemoryStore};
pub use types::{MemoryQueryResult, MemoryRecord, MemoryRecordMetadata};
