//! Deterministic embedding double for tests in this and dependent crates.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::{EmbeddingError, EmbeddingProvider};

/// Bag-of-words embeddings over a fixed vocabulary: component `i` counts the
/// occurrences of `vocabulary[i]` in the lowercased text.
#[derive(Debug)]
pub struct KeywordEmbeddings {
    vocabulary: Vec<String>,
    calls: AtomicUsize,
}

impl KeywordEmbeddings {
    #[must_use]
    pub fn new(vocabulary: &[&str]) -> Self {
        Self {
            vocabulary: vocabulary.iter().map(|w| w.to_lowercase()).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Vocabulary covering the seeded tour facts and queries.
    #[must_use]
    pub fn tour() -> Self {
        Self::new(&["favorite", "city", "paris", "activity", "museums", "visiting"])
    }

    /// Number of `embed` calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let lowered = text.to_lowercase();
        let words: Vec<&str> =
            lowered.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()).collect();
        self.vocabulary
            .iter()
            .map(|term| {
                let count = words.iter().filter(|w| **w == term.as_str()).count();
                #[allow(clippy::cast_precision_loss, reason = "word counts are tiny")]
                let value = count as f32;
                value
            })
            .collect()
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbeddings {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if text.trim().is_empty() {
            return Err(EmbeddingError::InvalidInput("cannot embed empty text".to_owned()));
        }
        Ok(self.vectorize(text))
    }

    fn model(&self) -> &str {
        "keyword-test"
    }
}

/// Provider that always fails, for error-propagation tests.
#[derive(Debug, Default)]
pub struct FailingEmbeddings {
    calls: AtomicUsize,
}

impl FailingEmbeddings {
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for FailingEmbeddings {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(EmbeddingError::HttpStatus { code: 500, body: "embedding backend down".to_owned() })
    }

    fn model(&self) -> &str {
        "failing-test"
    }
}
