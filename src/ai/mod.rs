//! All AI/LLM functionality

pub mod anthropic;
pub mod openai;
pub mod prompt_builder;
pub mod provider;
pub mod registry;

// Re-export main types for convenience
pub use prompt_builder::{Prompt, question_prompt, summary_prompt};
pub use provider::{LlmProvider, ProviderKind};
pub use registry::{ModelEntry, ModelRegistry};
