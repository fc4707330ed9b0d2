use std::fmt;

use async_trait::async_trait;

use super::prompt_builder::Prompt;
use crate::errors::BotError;

/// Output cap shared by every backend.
pub const MAX_OUTPUT_TOKENS: u32 = 2500;

/// Sampling temperature used for summaries and answers.
pub const TEMPERATURE: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAi => f.write_str("OpenAI"),
            Self::Anthropic => f.write_str("Anthropic"),
        }
    }
}

/// A text-generation backend.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Run one completion of `prompt` on `model_id` and return the text.
    async fn generate(&self, model_id: &str, prompt: &Prompt) -> Result<String, BotError>;
}
