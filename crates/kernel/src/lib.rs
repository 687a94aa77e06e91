//! Prompt execution for vault-recall
//!
//! A [`Kernel`] holds chat services and plugin functions. Prompt templates
//! reference arguments as `{{$name}}` and call functions such as
//! `{{recall $query}}` while rendering.

mod arguments;
pub mod error;
mod function;
mod kernel;
pub mod memory_plugin;
mod prompt_function;
pub mod template;


pub use arguments::{INPUT_ARG, KernelArguments};
pub use error::KernelError;
pub use function::{FunctionResult, KernelFunction};
pub use kernel::Kernel;
pub use memory_plugin::TextMemoryPlugin;
pub use prompt_function::PromptFunction;
pub use template::PromptTemplate;
