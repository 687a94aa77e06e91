use std::collections::BTreeMap;
use std::sync::Arc;

use vault_recall_llm::ChatCompletion;

use crate::error::KernelError;
use crate::function::KernelFunction;

/// Chat services and plugin functions available to prompt execution.
///
/// Services keep their registration order; without an explicit service id
/// the most recently registered one answers.
#[derive(Default)]
pub struct Kernel {
    services: Vec<(String, Arc<dyn ChatCompletion>)>,
    plugins: BTreeMap<String, BTreeMap<String, Arc<dyn KernelFunction>>>,
}

impl std::fmt::Debug for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let services: Vec<(&str, &str)> =
            self.services.iter().map(|(id, s)| (id.as_str(), s.model())).collect();
        let plugins: Vec<&str> = self.plugins.keys().map(String::as_str).collect();
        f.debug_struct("Kernel").field("services", &services).field("plugins", &plugins).finish()
    }
}

impl Kernel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a chat service. Re-registering an id replaces the old service
    /// and makes it the default.
    #[must_use]
    pub fn with_chat_completion(
        mut self,
        service_id: impl Into<String>,
        service: Arc<dyn ChatCompletion>,
    ) -> Self {
        let service_id = service_id.into();
        self.services.retain(|(id, _)| *id != service_id);
        tracing::debug!(service_id = %service_id, model = service.model(), "registered chat service");
        self.services.push((service_id, service));
        self
    }

    /// Service ids in registration order.
    #[must_use]
    pub fn service_ids(&self) -> Vec<&str> {
        self.services.iter().map(|(id, _)| id.as_str()).collect()
    }

    /// The named service, or the default one when `service_id` is `None`.
    pub fn chat_service(
        &self,
        service_id: Option<&str>,
    ) -> Result<&Arc<dyn ChatCompletion>, KernelError> {
        match service_id {
            Some(wanted) => self
                .services
                .iter()
                .find(|(id, _)| id == wanted)
                .map(|(_, s)| s)
                .ok_or_else(|| KernelError::ServiceNotFound(wanted.to_owned())),
            None => self
                .services
                .last()
                .map(|(_, s)| s)
                .ok_or_else(|| KernelError::ServiceNotFound("no chat service registered".to_owned())),
        }
    }

    /// Add a plugin's functions under `plugin_name`, replacing same-named functions.
    pub fn import_plugin(
        &mut self,
        plugin_name: &str,
        functions: impl IntoIterator<Item = Arc<dyn KernelFunction>>,
    ) {
        let entry = self.plugins.entry(plugin_name.to_owned()).or_default();
        for function in functions {
            tracing::debug!(plugin = plugin_name, function = function.name(), "imported function");
            entry.insert(function.name().to_owned(), function);
        }
    }

    /// Look up `plugin.function`, or a bare function name across all plugins.
    ///
    /// A bare name present in several plugins resolves to the plugin whose
    /// name sorts first.
    pub fn function(&self, name: &str) -> Result<&Arc<dyn KernelFunction>, KernelError> {
        let found = match name.split_once('.') {
            Some((plugin, function)) => self.plugins.get(plugin).and_then(|p| p.get(function)),
            None => self.plugins.values().find_map(|p| p.get(name)),
        };
        found.ok_or_else(|| KernelError::FunctionNotFound(name.to_owned()))
    }
}
