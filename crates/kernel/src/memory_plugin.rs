//! Exposes a [`SemanticTextMemory`] to templates as `recall`, `save`,
//! `retrieve` and `remove`.

use std::sync::Arc;

use async_trait::async_trait;
use vault_recall_memory::SemanticTextMemory;

use crate::arguments::{INPUT_ARG, KernelArguments};
use crate::error::KernelError;
use crate::function::{FunctionResult, KernelFunction};
use crate::kernel::Kernel;

pub const COLLECTION_ARG: &str = "collection";
pub const RELEVANCE_ARG: &str = "relevance";
pub const LIMIT_ARG: &str = "limit";
pub const KEY_ARG: &str = "key";

pub const DEFAULT_COLLECTION: &str = "generic";
pub const DEFAULT_RELEVANCE: f32 = 0.0;
pub const DEFAULT_LIMIT: usize = 1;

/// Plugin name the memory functions are usually imported under.
pub const PLUGIN_NAME: &str = "TextMemoryPlugin";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemoryOp {
    Recall,
    Save,
    Retrieve,
    Remove,
}

/// Builds the memory functions for one [`SemanticTextMemory`].
#[derive(Debug, Clone)]
pub struct TextMemoryPlugin {
    memory: Arc<SemanticTextMemory>,
}

impl TextMemoryPlugin {
    #[must_use]
    pub fn new(memory: Arc<SemanticTextMemory>) -> Self {
        Self { memory }
    }

    #[must_use]
    pub fn functions(&self) -> Vec<Arc<dyn KernelFunction>> {
        [MemoryOp::Recall, MemoryOp::Save, MemoryOp::Retrieve, MemoryOp::Remove]
            .into_iter()
            .map(|op| Arc::new(MemoryFunction { op, memory: self.memory.clone() }) as Arc<dyn KernelFunction>)
            .collect()
    }
}

struct MemoryFunction {
    op: MemoryOp,
    memory: Arc<SemanticTextMemory>,
}

fn collection(args: &KernelArguments) -> &str {
    args.get(COLLECTION_ARG).filter(|c| !c.trim().is_empty()).unwrap_or(DEFAULT_COLLECTION)
}

fn required<'a>(args: &'a KernelArguments, name: &str) -> Result<&'a str, KernelError> {
    args.get(name)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| KernelError::invalid_argument(name, "must not be empty"))
}

fn parse_relevance(args: &KernelArguments) -> Result<f32, KernelError> {
    match args.get(RELEVANCE_ARG) {
        None => Ok(DEFAULT_RELEVANCE),
        Some(raw) => raw
            .trim()
            .parse::<f32>()
            .ok()
            .filter(|r| (-1.0..=1.0).contains(r))
            .ok_or_else(|| KernelError::invalid_argument(RELEVANCE_ARG, format!("expected a number in [-1, 1], got '{raw}'"))),
    }
}

fn parse_limit(args: &KernelArguments) -> Result<usize, KernelError> {
    match args.get(LIMIT_ARG) {
        None => Ok(DEFAULT_LIMIT),
        Some(raw) => raw
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|l| *l > 0)
            .ok_or_else(|| KernelError::invalid_argument(LIMIT_ARG, format!("expected a positive integer, got '{raw}'"))),
    }
}

impl MemoryFunction {
    async fn recall(&self, args: &KernelArguments) -> Result<String, KernelError> {
        let query = required(args, INPUT_ARG)?;
        let collection = collection(args);
        let relevance = parse_relevance(args)?;
        let limit = parse_limit(args)?;

        let hits = self.memory.search(collection, query, limit, relevance, false).await?;
        tracing::debug!(collection, query, hits = hits.len(), "recall");
        if hits.is_empty() {
            return Ok(String::new());
        }
        if limit == 1 {
            return Ok(hits.into_iter().next().map(|h| h.metadata.text).unwrap_or_default());
        }
        let texts: Vec<String> = hits.into_iter().map(|h| h.metadata.text).collect();
        serde_json::to_string(&texts).map_err(|e| KernelError::invalid_argument(INPUT_ARG, e.to_string()))
    }

    async fn save(&self, args: &KernelArguments) -> Result<String, KernelError> {
        let text = required(args, INPUT_ARG)?;
        let key = required(args, KEY_ARG)?;
        self.memory.save_information(collection(args), key, text, None, None).await?;
        Ok(String::new())
    }

    async fn retrieve(&self, args: &KernelArguments) -> Result<String, KernelError> {
        let key = required(args, KEY_ARG)?;
        let hit = self.memory.get(collection(args), key, false).await?;
        Ok(hit.map(|h| h.metadata.text).unwrap_or_default())
    }

    async fn remove(&self, args: &KernelArguments) -> Result<String, KernelError> {
        let key = required(args, KEY_ARG)?;
        self.memory.remove(collection(args), key).await?;
        Ok(String::new())
    }
}

#[async_trait]
impl KernelFunction for MemoryFunction {
    fn name(&self) -> &str {
        match self.op {
            MemoryOp::Recall => "recall",
            MemoryOp::Save => "save",
            MemoryOp::Retrieve => "retrieve",
            MemoryOp::Remove => "remove",
        }
    }

    async fn invoke(
        &self,
        _kernel: &Kernel,
        args: &KernelArguments,
    ) -> Result<FunctionResult, KernelError> {
        let value = match self.op {
            MemoryOp::Recall => self.recall(args).await?,
            MemoryOp::Save => self.save(args).await?,
            MemoryOp::Retrieve => self.retrieve(args).await?,
            MemoryOp::Remove => self.remove(args).await?,
        };
        Ok(FunctionResult::text(value))
    }
}
