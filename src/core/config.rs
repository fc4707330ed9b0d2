use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::delivery::{DESCRIPTION_LIMIT, DeliveryLimits, MESSAGE_SIZE_LIMIT};

const DEFAULT_LLM_TIMEOUT_SECS: u64 = 120;

/// Minimum severity written to the log. Ordered `Debug < Info < Warn < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub processing_queue_url: String,
    pub slack_bot_token: String,
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub default_model: Option<String>,
    pub log_level: LogLevel,
    pub llm_timeout_secs: u64,
    pub description_limit: usize,
    pub message_size_limit: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| format!("{key}: environment variable not found"))
        };
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Self {
            processing_queue_url: required("PROCESSING_QUEUE_URL")?,
            slack_bot_token: required("SLACK_BOT_TOKEN")?,
            openai_api_key: optional("OPENAI_API_KEY"),
            openai_base_url: optional("OPENAI_BASE_URL"),
            anthropic_api_key: optional("ANTHROPIC_API_KEY"),
            default_model: optional("DEFAULT_MODEL"),
            log_level: optional("LOG_LEVEL")
                .map(|v| v.parse::<LogLevel>())
                .transpose()
                .map_err(|e| format!("LOG_LEVEL: {e}"))?
                .unwrap_or_default(),
            llm_timeout_secs: parse_number(optional("LLM_TIMEOUT_SECS"), "LLM_TIMEOUT_SECS")?
                .unwrap_or(DEFAULT_LLM_TIMEOUT_SECS),
            description_limit: parse_number(optional("DESCRIPTION_LIMIT"), "DESCRIPTION_LIMIT")?
                .unwrap_or(DESCRIPTION_LIMIT),
            message_size_limit: parse_number(
                optional("MESSAGE_SIZE_LIMIT"),
                "MESSAGE_SIZE_LIMIT",
            )?
            .unwrap_or(MESSAGE_SIZE_LIMIT),
        };

        if config.openai_api_key.is_none() && config.anthropic_api_key.is_none() {
            return Err(
                "no LLM provider configured: set OPENAI_API_KEY or ANTHROPIC_API_KEY".to_string(),
            );
        }

        Ok(config)
    }

    #[must_use]
    pub fn delivery_limits(&self) -> DeliveryLimits {
        DeliveryLimits {
            description_limit: self.description_limit,
            message_limit: self.message_size_limit,
        }
    }

    #[must_use]
    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }
}

fn parse_number<T>(raw: Option<String>, key: &str) -> Result<Option<T>, String>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.map(|v| {
        v.trim()
            .parse::<T>()
            .map_err(|e| format!("{key}: invalid number '{v}': {e}"))
    })
    .transpose()
}
