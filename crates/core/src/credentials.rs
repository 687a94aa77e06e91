use crate::constants::{MODEL_GPT4, MODEL_GPT35, SERVICE_GPT4, SERVICE_GPT35};
use crate::{CoreError, Result};

/// Key and organization pair used by every OpenAI client.
#[derive(Clone, PartialEq, Eq)]
pub struct OpenAiCredentials {
    api_key: String,
    org_id: Option<String>,
}

impl std::fmt::Debug for OpenAiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCredentials")
            .field("api_key", &"***")
            .field("org_id", &self.org_id)
            .finish()
    }
}

impl OpenAiCredentials {
    /// Builds credentials, rejecting blank values.
    ///
    /// # Errors
    /// Returns [`CoreError::Missing`] if the key is empty, or
    /// [`CoreError::InvalidInput`] if an org id is given but blank.
    pub fn new(api_key: impl Into<String>, org_id: Option<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(CoreError::Missing("api key"));
        }
        if let Some(org) = &org_id {
            if org.trim().is_empty() {
                return Err(CoreError::InvalidInput("organization id is blank".to_owned()));
            }
        }
        Ok(Self { api_key, org_id })
    }

    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    #[must_use]
    pub fn org_id(&self) -> Option<&str> {
        self.org_id.as_deref()
    }

    /// Same key without the organization, as the embedding client is configured.
    #[must_use]
    pub fn without_org(&self) -> Self {
        Self { api_key: self.api_key.clone(), org_id: None }
    }
}

/// A chat model registered under a service id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatModelSpec {
    pub service_id: String,
    pub model_id: String,
}

impl ChatModelSpec {
    #[must_use]
    pub fn new(service_id: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self { service_id: service_id.into(), model_id: model_id.into() }
    }

    /// The two chat models the tour registers, in registration order.
    #[must_use]
    pub fn tour_models() -> Vec<Self> {
        vec![Self::new(SERVICE_GPT35, MODEL_GPT35), Self::new(SERVICE_GPT4, MODEL_GPT4)]
    }
}
