use std::time::Duration;

use vault_recall_core::OpenAiCredentials;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::{EmbeddingError, EmbeddingProvider, OpenAiEmbeddings};

fn client(server: &MockServer, org: Option<&str>) -> OpenAiEmbeddings {
    let creds = OpenAiCredentials::new("test-key", org.map(str::to_owned)).unwrap();
    OpenAiEmbeddings::new(creds, &server.uri(), "text-embedding-3-small", Duration::from_secs(5))
        .unwrap()
}

#[tokio::test]
async fn test_embed_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_json(serde_json::json!({
            "model": "text-embedding-3-small",
            "input": "My favorite city is Paris"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "object": "list",
            "data": [{ "object": "embedding", "index": 0, "embedding": [0.1, 0.2, 0.3] }],
            "model": "text-embedding-3-small"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let vector = client(&server, None).embed("My favorite city is Paris").await.unwrap();
    assert_eq!(vector, vec![0.1, 0.2, 0.3]);
}

#[tokio::test]
async fn test_org_header_sent_when_present() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(header("OpenAI-Organization", "org-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{ "embedding": [1.0] }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server, Some("org-42")).embed("hello").await.unwrap();
}

#[tokio::test]
async fn test_org_header_absent_without_org() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{ "embedding": [1.0] }]
        })))
        .mount(&server)
        .await;

    client(&server, None).embed("hello").await.unwrap();
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("openai-organization"));
}

#[tokio::test]
async fn test_http_error_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Rate limit exceeded"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server, None).embed("hello").await.unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("429"));
    assert!(msg.contains("Rate limit exceeded"));
}

#[tokio::test]
async fn test_empty_data_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": [] })))
        .mount(&server)
        .await;

    let err = client(&server, None).embed("hello").await.unwrap_err();
    assert!(matches!(err, EmbeddingError::EmptyResult));
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client(&server, None).embed("hello").await.unwrap_err();
    assert!(matches!(err, EmbeddingError::JsonParse { .. }));
}

#[tokio::test]
async fn test_blank_input_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server, None).embed("  ").await.unwrap_err();
    assert!(matches!(err, EmbeddingError::InvalidInput(_)));
}
