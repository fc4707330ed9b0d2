//! `OpenAI` chat completions through `openai-api-rs`.

use async_trait::async_trait;
use openai_api_rs::v1::api::OpenAIClient;
use openai_api_rs::v1::chat_completion::{
    ChatCompletionMessage, ChatCompletionRequest, Content, MessageRole,
};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::prompt_builder::Prompt;
use super::provider::{LlmProvider, MAX_OUTPUT_TOKENS, ProviderKind, TEMPERATURE};
use crate::errors::BotError;

pub struct OpenAiProvider {
    client: Mutex<OpenAIClient>,
}

impl OpenAiProvider {
    /// # Errors
    ///
    /// Returns `BotError::ConfigError` if the client cannot be built.
    pub fn new(api_key: &str, base_url: Option<&str>) -> Result<Self, BotError> {
        let mut builder = OpenAIClient::builder().with_api_key(api_key);
        if let Some(url) = base_url {
            builder = builder.with_endpoint(url);
        }
        let client = builder
            .build()
            .map_err(|e| BotError::ConfigError(format!("Failed to create OpenAI client: {e}")))?;

        Ok(Self {
            client: Mutex::new(client),
        })
    }
}

fn build_messages(prompt: &Prompt) -> Vec<ChatCompletionMessage> {
    vec![
        ChatCompletionMessage {
            role: MessageRole::system,
            content: Content::Text(prompt.system.clone()),
            name: None,
            tool_calls: None,
            tool_call_id: None,
        },
        ChatCompletionMessage {
            role: MessageRole::user,
            content: Content::Text(prompt.user.clone()),
            name: None,
            tool_calls: None,
            tool_call_id: None,
        },
    ]
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    async fn generate(&self, model_id: &str, prompt: &Prompt) -> Result<String, BotError> {
        #[cfg(feature = "debug-logs")]
        debug!("Using OpenAI prompt:\n{:?}", prompt);

        info!(
            "Requesting OpenAI completion with model {} ({} prompt chars)",
            model_id,
            prompt.char_count()
        );

        let request = ChatCompletionRequest::new(model_id.to_string(), build_messages(prompt))
            .temperature(TEMPERATURE)
            .max_tokens(i64::from(MAX_OUTPUT_TOKENS));

        let result = self.client.lock().await.chat_completion(request).await?;

        let text = result
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| BotError::LlmError("OpenAI returned an empty completion".to_string()))?;

        debug!("OpenAI returned {} characters", text.chars().count());
        Ok(text)
    }
}
