use std::sync::Arc;

use vault_recall_core::constants::{ACTIVITY_QUERY, CITY_QUERY, MEMORY_COLLECTION, SEED_FACTS};
use vault_recall_embeddings::testing::{FailingEmbeddings, KeywordEmbeddings};

use crate::{MemoryError, SemanticTextMemory, VolatileMemoryStore};

fn memory_with(embeddings: Arc<KeywordEmbeddings>) -> SemanticTextMemory {
    SemanticTextMemory::new(Arc::new(VolatileMemoryStore::new()), embeddings)
}

async fn seeded(embeddings: Arc<KeywordEmbeddings>) -> SemanticTextMemory {
    let memory = memory_with(embeddings);
    for (id, text) in SEED_FACTS {
        memory.save_information(MEMORY_COLLECTION, id, text, None, None).await.unwrap();
    }
    memory
}

#[tokio::test]
async fn test_seed_facts_recalled_by_topic() {
    let memory = seeded(Arc::new(KeywordEmbeddings::tour())).await;

    let city = memory.search(MEMORY_COLLECTION, CITY_QUERY, 1, 0.0, false).await.unwrap();
    assert_eq!(city.len(), 1);
    assert_eq!(city[0].metadata.text, "My favorite city is Paris");

    let activity = memory.search(MEMORY_COLLECTION, ACTIVITY_QUERY, 1, 0.0, false).await.unwrap();
    assert_eq!(activity[0].metadata.text, "My favorite activity is visiting museums");
    assert!(activity[0].embedding.is_none());
}

#[tokio::test]
async fn test_save_embeds_once_per_record() {
    let embeddings = Arc::new(KeywordEmbeddings::tour());
    let _memory = seeded(embeddings.clone()).await;
    assert_eq!(embeddings.calls(), 2);
}

#[tokio::test]
async fn test_save_creates_collection_and_returns_key() {
    let memory = memory_with(Arc::new(KeywordEmbeddings::tour()));
    let key = memory
        .save_information("notes", "42", "Paris city", Some("a city"), Some("{\"src\":\"test\"}"))
        .await
        .unwrap();
    assert_eq!(key, "42");
    assert_eq!(memory.get_collections().await, vec!["notes".to_owned()]);

    let hit = memory.get("notes", "42", true).await.unwrap().unwrap();
    assert_eq!(hit.metadata.description, "a city");
    assert_eq!(hit.metadata.additional_metadata, "{\"src\":\"test\"}");
    assert!(hit.embedding.is_some());
}

#[tokio::test]
async fn test_get_and_remove_unknown_collection() {
    let memory = memory_with(Arc::new(KeywordEmbeddings::tour()));
    assert!(memory.get("nowhere", "1", false).await.unwrap().is_none());
    memory.remove("nowhere", "1").await.unwrap();
}

#[tokio::test]
async fn test_remove_then_search_misses() {
    let memory = seeded(Arc::new(KeywordEmbeddings::tour())).await;
    memory.remove(MEMORY_COLLECTION, "1").await.unwrap();
    let hits = memory.search(MEMORY_COLLECTION, CITY_QUERY, 5, 0.0, false).await.unwrap();
    assert!(hits.iter().all(|h| h.metadata.id != "1"));
}

#[tokio::test]
async fn test_empty_id_rejected_before_embedding() {
    let embeddings = Arc::new(KeywordEmbeddings::tour());
    let memory = memory_with(embeddings.clone());
    let err = memory.save_information("c", " ", "text", None, None).await.unwrap_err();
    assert!(matches!(err, MemoryError::InvalidInput(_)));
    assert_eq!(embeddings.calls(), 0);
}

#[tokio::test]
async fn test_embedding_failure_propagates() {
    let memory =
        SemanticTextMemory::new(Arc::new(VolatileMemoryStore::new()), Arc::new(FailingEmbeddings::default()));
    let err = memory.save_information("c", "1", "text", None, None).await.unwrap_err();
    assert!(matches!(err, MemoryError::Embedding(_)));
    assert!(memory.get_collections().await.is_empty());
}

#[tokio::test]
async fn test_separate_memories_share_nothing() {
    let first = seeded(Arc::new(KeywordEmbeddings::tour())).await;
    let second = memory_with(Arc::new(KeywordEmbeddings::tour()));

    assert_eq!(first.get_collections().await.len(), 1);
    assert!(second.get_collections().await.is_empty());
    assert!(second.search(MEMORY_COLLECTION, CITY_QUERY, 1, 0.0, false).await.unwrap().is_empty());
}
