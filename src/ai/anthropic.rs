//! Anthropic Messages API over `reqwest`.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::prompt_builder::Prompt;
use super::provider::{LlmProvider, MAX_OUTPUT_TOKENS, ProviderKind, TEMPERATURE};
use crate::errors::BotError;

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

static HTTP_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(300))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_else(|_| Client::new())
});

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<RequestMessage<'a>>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl MessagesResponse {
    fn into_text(self) -> Option<String> {
        let text: Vec<String> = self
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();
        let joined = text.join("\n");
        (!joined.trim().is_empty()).then_some(joined)
    }
}

pub struct AnthropicProvider {
    api_key: String,
}

impl AnthropicProvider {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    async fn generate(&self, model_id: &str, prompt: &Prompt) -> Result<String, BotError> {
        #[cfg(feature = "debug-logs")]
        debug!("Using Anthropic prompt:\n{:?}", prompt);

        info!(
            "Requesting Anthropic completion with model {} ({} prompt chars)",
            model_id,
            prompt.char_count()
        );

        let request = MessagesRequest {
            model: model_id,
            max_tokens: MAX_OUTPUT_TOKENS,
            system: &prompt.system,
            messages: vec![RequestMessage {
                role: "user",
                content: &prompt.user,
            }],
            temperature: TEMPERATURE,
        };

        let response = HTTP_CLIENT
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|e| {
                format!("Failed to read error response body (status {status}): {e}")
            });
            return Err(BotError::LlmError(format!(
                "Anthropic API error (status {status}): {error_text}"
            )));
        }

        let body: MessagesResponse = response.json().await.map_err(|e| {
            BotError::LlmError(format!("Failed to parse Anthropic response: {e}"))
        })?;

        let text = body
            .into_text()
            .ok_or_else(|| BotError::LlmError("Anthropic returned no text".to_string()))?;

        debug!("Anthropic returned {} characters", text.chars().count());
        Ok(text)
    }
}
