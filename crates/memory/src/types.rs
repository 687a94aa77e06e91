use chrono::{DateTime, Utc};

/// Descriptive half of a memory record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRecordMetadata {
    /// Caller-assigned id, unique within a collection.
    pub id: String,
    /// Text the embedding was computed from.
    pub text: String,
    pub description: String,
    pub additional_metadata: String,
    /// Origin of the text when the record only references external data.
    pub external_source_name: String,
    pub is_reference: bool,
}

impl MemoryRecordMetadata {
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            description: String::new(),
            additional_metadata: String::new(),
            external_source_name: String::new(),
            is_reference: false,
        }
    }
}

/// A stored text plus its embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryRecord {
    pub metadata: MemoryRecordMetadata,
    pub embedding: Vec<f32>,
    /// Storage key. The volatile store uses the record id.
    pub key: String,
    pub timestamp: Option<DateTime<Utc>>,
}

impl MemoryRecord {
    /// Builds a local-information record keyed by its id.
    #[must_use]
    pub fn local(metadata: MemoryRecordMetadata, embedding: Vec<f32>) -> Self {
        let key = metadata.id.clone();
        Self { metadata, embedding, key, timestamp: Some(Utc::now()) }
    }

    /// Copy with the embedding cleared, for callers that did not ask for vectors.
    #[must_use]
    pub fn without_embedding(mut self) -> Self {
        self.embedding = Vec::new();
        self
    }
}

/// One hit from a similarity search.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryQueryResult {
    pub metadata: MemoryRecordMetadata,
    /// Cosine similarity to the query.
    pub relevance: f32,
    pub embedding: Option<Vec<f32>>,
}
