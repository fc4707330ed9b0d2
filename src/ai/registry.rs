//! Model aliases and the providers that serve them.

use std::fmt::Write as _;
use std::sync::Arc;

use tracing::info;

use super::anthropic::AnthropicProvider;
use super::openai::OpenAiProvider;
use super::provider::{LlmProvider, ProviderKind};
use crate::core::config::AppConfig;
use crate::errors::BotError;

/// Built-in catalogue: alias, backend, backend model id, short description.
const BUILTIN_MODELS: &[(&str, ProviderKind, &str, &str)] = &[
    ("gpt-4o", ProviderKind::OpenAi, "gpt-4o", "OpenAI GPT-4o"),
    (
        "gpt-4o-mini",
        ProviderKind::OpenAi,
        "gpt-4o-mini",
        "OpenAI GPT-4o mini, faster and cheaper",
    ),
    (
        "claude-sonnet",
        ProviderKind::Anthropic,
        "claude-sonnet-4-5",
        "Anthropic Claude Sonnet",
    ),
    (
        "claude-haiku",
        ProviderKind::Anthropic,
        "claude-haiku-4-5",
        "Anthropic Claude Haiku, faster and cheaper",
    ),
];

#[derive(Clone)]
pub struct ModelEntry {
    pub alias: String,
    pub model_id: String,
    pub description: String,
    pub provider: Arc<dyn LlmProvider>,
}

impl std::fmt::Debug for ModelEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelEntry")
            .field("alias", &self.alias)
            .field("model_id", &self.model_id)
            .field("provider", &self.provider.kind())
            .finish()
    }
}

/// Read-only after construction.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    entries: Vec<ModelEntry>,
    default_alias: String,
}

impl ModelRegistry {
    /// Register every built-in model whose backend is available.
    ///
    /// The default is `default_alias` when given, otherwise the first
    /// registered model.
    ///
    /// # Errors
    ///
    /// Returns `BotError::ConfigError` when no provider is available and
    /// `BotError::UnknownModel` when `default_alias` is not registered.
    pub fn new(
        providers: &[Arc<dyn LlmProvider>],
        default_alias: Option<&str>,
    ) -> Result<Self, BotError> {
        let entries: Vec<ModelEntry> = BUILTIN_MODELS
            .iter()
            .filter_map(|(alias, kind, model_id, description)| {
                providers
                    .iter()
                    .find(|p| p.kind() == *kind)
                    .map(|provider| ModelEntry {
                        alias: (*alias).to_string(),
                        model_id: (*model_id).to_string(),
                        description: (*description).to_string(),
                        provider: Arc::clone(provider),
                    })
            })
            .collect();

        let Some(first) = entries.first() else {
            return Err(BotError::ConfigError(
                "no models available for the configured providers".to_string(),
            ));
        };

        let default_alias = match default_alias {
            Some(alias) if entries.iter().any(|e| e.alias.eq_ignore_ascii_case(alias)) => {
                alias.to_ascii_lowercase()
            }
            Some(alias) => return Err(BotError::UnknownModel(alias.to_string())),
            None => first.alias.clone(),
        };

        info!(
            "Model registry ready with {} models, default {}",
            entries.len(),
            default_alias
        );

        Ok(Self {
            entries,
            default_alias,
        })
    }

    /// Build providers from the configured API keys.
    ///
    /// # Errors
    ///
    /// Propagates provider construction and registry errors.
    pub fn from_config(config: &AppConfig) -> Result<Self, BotError> {
        let mut providers: Vec<Arc<dyn LlmProvider>> = Vec::new();
        if let Some(key) = &config.openai_api_key {
            providers.push(Arc::new(OpenAiProvider::new(
                key,
                config.openai_base_url.as_deref(),
            )?));
        }
        if let Some(key) = &config.anthropic_api_key {
            providers.push(Arc::new(AnthropicProvider::new(key.clone())));
        }
        Self::new(&providers, config.default_model.as_deref())
    }

    /// Look up `alias`, or the default model when `None`.
    ///
    /// # Errors
    ///
    /// Returns `BotError::UnknownModel` for an alias that is not registered.
    pub fn resolve(&self, alias: Option<&str>) -> Result<&ModelEntry, BotError> {
        let wanted = alias.unwrap_or(&self.default_alias);
        self.entries
            .iter()
            .find(|e| e.alias.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| BotError::UnknownModel(wanted.to_string()))
    }

    #[must_use]
    pub fn default_alias(&self) -> &str {
        &self.default_alias
    }

    #[must_use]
    pub fn aliases(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.alias.as_str()).collect()
    }

    /// Catalogue text for the `models` command.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut out = String::from("*Available models*\n");
        for entry in &self.entries {
            let marker = if entry.alias == self.default_alias {
                " (default)"
            } else {
                ""
            };
            let _ = writeln!(
                out,
                "• `{}`{}: {} via {}",
                entry.alias,
                marker,
                entry.description,
                entry.provider.kind()
            );
        }
        out.push_str("Pick one with `model=<name>`.");
        out
    }
}
