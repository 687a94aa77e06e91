//! Full run against a mock identity endpoint, vault and OpenAI API.

use std::time::Duration;

use serde_json::json;
use vault_recall_service::{OpenAiConnector, ServiceError, TourOptions, VaultSettings, run_tour};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(server: &MockServer) -> VaultSettings {
    VaultSettings {
        vault_name: "tour-vault".to_owned(),
        tenant_id: "tenant-1".to_owned(),
        client_id: "app-1".to_owned(),
        client_secret: "app-secret".to_owned(),
        authority_host: Some(server.uri()),
        vault_uri: Some(server.uri()),
    }
}

async fn mount_vault(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/tenant-1/oauth2/v2.0/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "expires_in": 3599,
            "access_token": "vault-token"
        })))
        .expect(1)
        .mount(server)
        .await;
    for (name, value) in [("OpenAIapiKey", "sk-e2e"), ("OpenAIorgId", "org-e2e")] {
        Mock::given(method("GET"))
            .and(path(format!("/secrets/{name}")))
            .and(header("Authorization", "Bearer vault-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": value })))
            .expect(1)
            .mount(server)
            .await;
    }
}

async fn mount_embeddings(server: &MockServer) {
    for (keyword, vector) in [("city", [1.0, 0.0]), ("activity", [0.0, 1.0])] {
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .and(header("Authorization", "Bearer sk-e2e"))
            .and(body_string_contains(keyword))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "embedding": vector }]
            })))
            .expect(2)
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn test_full_run_over_http() {
    let server = MockServer::start().await;
    mount_vault(&server).await;
    mount_embeddings(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("OpenAI-Organization", "org-e2e"))
        .and(body_string_contains("\"model\":\"gpt-4\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": { "role": "assistant", "content": "Morning at the Louvre, afternoon at the Orsay." },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 80, "completion_tokens": 12, "total_tokens": 92 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let timeout = Duration::from_secs(5);
    let vault = settings(&server).connect(timeout).unwrap();
    let connector = OpenAiConnector::new(server.uri(), timeout);

    let outcome = run_tour(&vault, &connector, &TourOptions::default()).await.unwrap();
    assert_eq!(outcome.text, "Morning at the Louvre, afternoon at the Orsay.");
    assert_eq!(outcome.usage.map(|u| u.total_tokens), Some(92));

    let requests = server.received_requests().await.unwrap();
    let chat = requests.iter().find(|r| r.url.path() == "/v1/chat/completions").unwrap();
    let body: serde_json::Value = serde_json::from_slice(&chat.body).unwrap();
    let prompt = body["messages"][0]["content"].as_str().unwrap();
    assert!(prompt.contains("What is my favorite city? My favorite city is Paris"));
    assert!(prompt.contains("What is my favorite activity? My favorite activity is visiting museums"));
    assert_eq!(body["max_tokens"], 2000);

    let embedding_calls = requests.iter().filter(|r| r.url.path() == "/v1/embeddings");
    assert!(embedding_calls.clone().count() == 4);
    assert!(embedding_calls.into_iter().all(|r| !r.headers.contains_key("OpenAI-Organization")));
}

#[tokio::test]
async fn test_rejected_credentials_never_reach_openai() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tenant-1/oauth2/v2.0/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "AADSTS7000215: Invalid client secret provided."
        })))
        .mount(&server)
        .await;
    Mock::given(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let timeout = Duration::from_secs(5);
    let vault = settings(&server).connect(timeout).unwrap();
    let connector = OpenAiConnector::new(server.uri(), timeout);

    let err = run_tour(&vault, &connector, &TourOptions::default()).await.unwrap_err();
    assert!(matches!(err, ServiceError::Vault(ref e) if e.is_auth_failure()));
}
