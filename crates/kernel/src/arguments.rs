use std::collections::BTreeMap;

/// Name of the argument a function call's positional value is bound to.
pub const INPUT_ARG: &str = "input";

/// Named string arguments passed to templates and functions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KernelArguments {
    values: BTreeMap<String, String>,
}

impl KernelArguments {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name`, replacing any earlier value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}
