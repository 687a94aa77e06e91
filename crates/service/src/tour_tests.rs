use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use vault_recall_core::{ChatModelSpec, OpenAiCredentials};
use vault_recall_embeddings::EmbeddingProvider;
use vault_recall_embeddings::testing::KeywordEmbeddings;
use vault_recall_llm::ChatCompletion;
use vault_recall_llm::testing::ScriptedChat;
use vault_recall_vault::{SecretProvider, VaultError};

use crate::{ModelConnector, ServiceError, TourOptions, fetch_credentials, run_tour};

struct FakeVault {
    secrets: HashMap<&'static str, &'static str>,
    fail_with_status: Option<u16>,
    calls: AtomicUsize,
}

impl FakeVault {
    fn with_secrets() -> Self {
        Self {
            secrets: HashMap::from([("OpenAIapiKey", "sk-test"), ("OpenAIorgId", "org-test")]),
            fail_with_status: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn rejecting(code: u16) -> Self {
        Self { fail_with_status: Some(code), ..Self::with_secrets() }
    }
}

#[async_trait]
impl SecretProvider for FakeVault {
    async fn get_secret(&self, name: &str) -> Result<String, VaultError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(code) = self.fail_with_status {
            return Err(VaultError::Authentication { code, body: "invalid_client".to_owned() });
        }
        self.secrets
            .get(name)
            .map(|v| (*v).to_owned())
            .ok_or_else(|| VaultError::SecretStatus { name: name.to_owned(), code: 404, body: "SecretNotFound".to_owned() })
    }
}

struct FakeConnector {
    gpt35: Arc<ScriptedChat>,
    gpt4: Arc<ScriptedChat>,
    embeddings: Arc<KeywordEmbeddings>,
    seen_credentials: std::sync::Mutex<Vec<OpenAiCredentials>>,
    builds: AtomicUsize,
}

impl FakeConnector {
    fn new(reply: &str) -> Self {
        Self {
            gpt35: Arc::new(ScriptedChat::replying("gpt-3.5-turbo", "from gpt-3.5")),
            gpt4: Arc::new(ScriptedChat::replying("gpt-4", reply)),
            embeddings: Arc::new(KeywordEmbeddings::tour()),
            seen_credentials: std::sync::Mutex::new(Vec::new()),
            builds: AtomicUsize::new(0),
        }
    }

    fn model_calls(&self) -> usize {
        self.gpt35.calls() + self.gpt4.calls() + self.embeddings.calls()
    }
}

impl ModelConnector for FakeConnector {
    fn chat(
        &self,
        credentials: &OpenAiCredentials,
        spec: &ChatModelSpec,
    ) -> Result<Arc<dyn ChatCompletion>, ServiceError> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        self.seen_credentials.lock().unwrap().push(credentials.clone());
        match spec.service_id.as_str() {
            "gpt35" => Ok(self.gpt35.clone()),
            "gpt4" => Ok(self.gpt4.clone()),
            other => Err(ServiceError::InvalidInput(format!("unexpected service {other}"))),
        }
    }

    fn embeddings(
        &self,
        credentials: &OpenAiCredentials,
        model: &str,
    ) -> Result<Arc<dyn EmbeddingProvider>, ServiceError> {
        assert_eq!(model, "text-embedding-3-small");
        self.builds.fetch_add(1, Ordering::SeqCst);
        self.seen_credentials.lock().unwrap().push(credentials.clone());
        Ok(self.embeddings.clone())
    }
}

#[tokio::test]
async fn test_fetch_credentials_reads_both_secrets() {
    let vault = FakeVault::with_secrets();
    let creds = fetch_credentials(&vault).await.unwrap();
    assert_eq!(creds.api_key(), "sk-test");
    assert_eq!(creds.org_id(), Some("org-test"));
    assert_eq!(vault.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_fetch_credentials_rejects_blank_secret() {
    let vault = FakeVault {
        secrets: HashMap::from([("OpenAIapiKey", "sk-test"), ("OpenAIorgId", " ")]),
        ..FakeVault::with_secrets()
    };
    let err = fetch_credentials(&vault).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
}

#[tokio::test]
async fn test_run_tour_end_to_end_with_doubles() {
    let vault = FakeVault::with_secrets();
    let connector = FakeConnector::new("Spend the day at the Louvre.");

    let outcome = run_tour(&vault, &connector, &TourOptions::default()).await.unwrap();
    assert_eq!(outcome.text, "Spend the day at the Louvre.");
    assert!(outcome.usage.is_some());

    assert_eq!(connector.gpt4.calls(), 1);
    assert_eq!(connector.gpt35.calls(), 0);
    // Two facts saved plus one recall query per fact.
    assert_eq!(connector.embeddings.calls(), 4);

    let prompt = &connector.gpt4.prompts()[0];
    assert!(prompt.contains("What is my favorite city? My favorite city is Paris"));
    assert!(prompt.contains("What is my favorite activity? My favorite activity is visiting museums"));
    assert!(prompt.contains("Generate a personalized tour of activities"));

    let settings = connector.gpt4.last_settings().unwrap();
    assert_eq!(settings.max_tokens, Some(2000));
    assert_eq!(settings.temperature, Some(0.8));
}

#[tokio::test]
async fn test_run_tour_configures_clients_with_vault_credentials() {
    let vault = FakeVault::with_secrets();
    let connector = FakeConnector::new("ok");
    run_tour(&vault, &connector, &TourOptions::default()).await.unwrap();

    let seen = connector.seen_credentials.lock().unwrap().clone();
    assert_eq!(seen.len(), 3);
    assert!(seen.iter().all(|c| c.api_key() == "sk-test"));
    assert_eq!(seen[0].org_id(), Some("org-test"));
    assert_eq!(seen[2].org_id(), None);
}

#[tokio::test]
async fn test_run_tour_respects_service_override() {
    let vault = FakeVault::with_secrets();
    let connector = FakeConnector::new("from gpt-4");
    let options = TourOptions { service_id: Some("gpt35".to_owned()) };

    let outcome = run_tour(&vault, &connector, &options).await.unwrap();
    assert_eq!(outcome.text, "from gpt-3.5");
    assert_eq!(connector.gpt4.calls(), 0);
}

#[tokio::test]
async fn test_vault_failure_stops_before_any_model_call() {
    let vault = FakeVault::rejecting(401);
    let connector = FakeConnector::new("never");

    let err = run_tour(&vault, &connector, &TourOptions::default()).await.unwrap_err();
    assert!(err.is_vault_failure());
    assert_eq!(vault.calls.load(Ordering::SeqCst), 1);
    assert_eq!(connector.builds.load(Ordering::SeqCst), 0);
    assert_eq!(connector.model_calls(), 0);
}

#[tokio::test]
async fn test_missing_secret_stops_before_any_model_call() {
    let vault = FakeVault { secrets: HashMap::from([("OpenAIapiKey", "sk-test")]), ..FakeVault::with_secrets() };
    let connector = FakeConnector::new("never");

    let err = run_tour(&vault, &connector, &TourOptions::default()).await.unwrap_err();
    assert!(err.is_vault_failure());
    assert!(err.to_string().contains("OpenAIorgId"));
    assert_eq!(connector.model_calls(), 0);
}

#[tokio::test]
async fn test_chat_failure_propagates() {
    let vault = FakeVault::with_secrets();
    let mut connector = FakeConnector::new("unused");
    connector.gpt4 = Arc::new(ScriptedChat::failing("gpt-4", 429, "Rate limit exceeded"));

    let err = run_tour(&vault, &connector, &TourOptions::default()).await.unwrap_err();
    assert!(matches!(err, ServiceError::Kernel(_)));
    assert!(err.to_string().contains("429"));
    assert_eq!(connector.gpt4.calls(), 1);
}

#[tokio::test]
async fn test_runs_are_independent() {
    let vault = FakeVault::with_secrets();
    let first = FakeConnector::new("one");
    let second = FakeConnector::new("two");

    let a = run_tour(&vault, &first, &TourOptions::default()).await.unwrap();
    let b = run_tour(&vault, &second, &TourOptions::default()).await.unwrap();
    assert_ne!(a.run_id, b.run_id);
    // Each run seeds its own store: two saves and two recalls, never more.
    assert_eq!(first.embeddings.calls(), 4);
    assert_eq!(second.embeddings.calls(), 4);
    assert_eq!(b.text, "two");
}
