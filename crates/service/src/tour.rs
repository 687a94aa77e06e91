//! The single tour run: secrets, clients, memory, one prompt.

use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;
use vault_recall_core::constants::{
    ACTIVITY_QUERY, ARG_ACTIVITY, ARG_CITY, CITY_QUERY, EMBEDDING_MODEL, MAX_TOKENS, MEMORY_COLLECTION,
    SECRET_API_KEY, SECRET_ORG_ID, SEED_FACTS, TEMPERATURE, TOUR_PROMPT,
};
use vault_recall_core::{ChatModelSpec, OpenAiCredentials};
use vault_recall_kernel::memory_plugin::{COLLECTION_ARG, PLUGIN_NAME};
use vault_recall_kernel::{Kernel, KernelArguments, KernelFunction, PromptFunction, TextMemoryPlugin};
use vault_recall_llm::{PromptExecutionSettings, TokenUsage};
use vault_recall_memory::{SemanticTextMemory, VolatileMemoryStore};
use vault_recall_vault::{SecretProvider, VaultError};

use crate::{ModelConnector, ServiceError};

/// Knobs the caller may change without altering the run's shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TourOptions {
    /// Chat service to answer with. `None` uses the kernel default (`gpt4`).
    pub service_id: Option<String>,
}

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TourOutcome {
    pub run_id: Uuid,
    pub text: String,
    pub usage: Option<TokenUsage>,
}

/// Read the API key and organization id from the vault.
///
/// Both values must be non-empty; the key is read first so a bad credential
/// fails on the first request.
pub async fn fetch_credentials(secrets: &dyn SecretProvider) -> Result<OpenAiCredentials, ServiceError> {
    let api_key = read_secret(secrets, SECRET_API_KEY).await?;
    let org_id = read_secret(secrets, SECRET_ORG_ID).await?;
    tracing::info!("retrieved OpenAI credentials from vault");
    Ok(OpenAiCredentials::new(api_key, Some(org_id))?)
}

async fn read_secret(secrets: &dyn SecretProvider, name: &str) -> Result<String, VaultError> {
    secrets.get_secret(name).await.inspect_err(|e| {
        tracing::error!(secret = name, auth_failure = e.is_auth_failure(), error = %e, "vault read failed");
    })
}

/// Register every tour chat model on a fresh kernel.
pub fn build_kernel(
    connector: &dyn ModelConnector,
    credentials: &OpenAiCredentials,
) -> Result<Kernel, ServiceError> {
    let mut kernel = Kernel::new();
    for spec in ChatModelSpec::tour_models() {
        let service = connector.chat(credentials, &spec)?;
        kernel = kernel.with_chat_completion(spec.service_id, service);
    }
    Ok(kernel)
}

/// Volatile memory seeded with the two tour facts.
pub async fn seed_memory(
    connector: &dyn ModelConnector,
    credentials: &OpenAiCredentials,
) -> Result<Arc<SemanticTextMemory>, ServiceError> {
    let embeddings = connector.embeddings(&credentials.without_org(), EMBEDDING_MODEL)?;
    let memory = Arc::new(SemanticTextMemory::new(Arc::new(VolatileMemoryStore::new()), embeddings));
    for (id, text) in SEED_FACTS {
        memory.save_information(MEMORY_COLLECTION, id, text, None, None).await?;
    }
    Ok(memory)
}

/// Execute the whole run. The first failure ends it; nothing is retried.
pub async fn run_tour(
    secrets: &dyn SecretProvider,
    connector: &dyn ModelConnector,
    options: &TourOptions,
) -> Result<TourOutcome, ServiceError> {
    let run_id = Uuid::new_v4();
    let span = tracing::info_span!("tour", %run_id);
    async move {
        let credentials = fetch_credentials(secrets).await?;

        let mut kernel = build_kernel(connector, &credentials)?;
        let memory = seed_memory(connector, &credentials).await?;
        kernel.import_plugin(PLUGIN_NAME, TextMemoryPlugin::new(memory).functions());
        tracing::info!(services = ?kernel.service_ids(), "kernel ready");

        let mut settings = PromptExecutionSettings::new(MAX_TOKENS, TEMPERATURE);
        settings.service_id.clone_from(&options.service_id);
        let function = PromptFunction::from_prompt("tour", TOUR_PROMPT, settings)?;

        let args = KernelArguments::new()
            .with(ARG_CITY, CITY_QUERY)
            .with(ARG_ACTIVITY, ACTIVITY_QUERY)
            .with(COLLECTION_ARG, MEMORY_COLLECTION);
        let result = function.invoke(&kernel, &args).await?;
        tracing::info!(chars = result.value.len(), "tour generated");

        Ok(TourOutcome { run_id, text: result.value, usage: result.usage })
    }
    .instrument(span)
    .await
}
