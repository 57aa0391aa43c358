//! Environment configuration

use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "mistralai/mistral-7b-instruct";
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not set")]
    Missing { var: &'static str },
    #[error("{var} has invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings for the model collaborator
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// HTTP timeout for a single completion request
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            timeout: Duration::from_secs(120),
        }
    }
}

impl LlmConfig {
    /// The API key, or an error naming the variable to set
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::Missing {
                var: "OPENROUTER_API_KEY",
            })
    }
}

/// Whole-process configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = LlmConfig::default();
        let timeout_secs = parse_var(&lookup, "THREADLINE_TIMEOUT_SECS", defaults.timeout.as_secs())?;

        let llm = LlmConfig {
            api_key: lookup("OPENROUTER_API_KEY"),
            model: lookup("THREADLINE_MODEL").unwrap_or(defaults.model),
            base_url: lookup("THREADLINE_BASE_URL").unwrap_or(defaults.base_url),
            temperature: parse_var(&lookup, "THREADLINE_TEMPERATURE", defaults.temperature)?,
            max_tokens: parse_var(&lookup, "THREADLINE_MAX_TOKENS", defaults.max_tokens)?,
            timeout: Duration::from_secs(timeout_secs),
        };

        Ok(Self {
            llm,
            port: parse_var(&lookup, "THREADLINE_PORT", DEFAULT_PORT)?,
        })
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
            value,
        }),
    }
}
