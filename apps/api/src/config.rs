use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// The supported LLM providers. Anything outside this set is rejected at
/// parse time — no partial or best-guess matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    Openai,
    Anthropic,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Google, Provider::Openai, Provider::Anthropic];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::Openai => "openai",
            Provider::Anthropic => "anthropic",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, AppError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(Provider::Google),
            "openai" => Ok(Provider::Openai),
            "anthropic" => Ok(Provider::Anthropic),
            other => Err(AppError::Configuration(format!(
                "Unsupported provider: '{other}'. Supported: google, openai, anthropic"
            ))),
        }
    }
}

/// Static binding of a provider to its model, key source, and sampling
/// temperature. Loaded nowhere — the table is compiled in and immutable.
#[derive(Debug, Clone, Copy)]
pub struct ProviderConfig {
    pub provider: Provider,
    pub model_id: &'static str,
    /// Environment variable the key is resolved from when the caller does
    /// not supply one.
    pub api_key_env: &'static str,
    pub temperature: f32,
}

/// Sampling temperature shared by all providers. Low on purpose — the
/// output must stay grounded in the input resume.
pub const LLM_TEMPERATURE: f32 = 0.2;

/// Tailoring calls permitted per session without a caller-supplied key.
pub const FREE_TIER_MAX_REQUESTS: u32 = 3;

pub fn provider_config(provider: Provider) -> ProviderConfig {
    match provider {
        Provider::Google => ProviderConfig {
            provider,
            model_id: "gemini-2.0-flash",
            api_key_env: "GEMINI_API_KEY",
            temperature: LLM_TEMPERATURE,
        },
        Provider::Openai => ProviderConfig {
            provider,
            model_id: "gpt-4o",
            api_key_env: "OPENAI_API_KEY",
            temperature: LLM_TEMPERATURE,
        },
        Provider::Anthropic => ProviderConfig {
            provider,
            model_id: "claude-3-5-sonnet-latest",
            api_key_env: "ANTHROPIC_API_KEY",
            temperature: LLM_TEMPERATURE,
        },
    }
}

/// Application configuration loaded from environment variables.
///
/// Provider API keys are intentionally NOT loaded here: a missing key is
/// non-fatal at startup and only surfaces when that provider is selected
/// for a request without a caller-supplied key.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub free_tier_max_requests: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            free_tier_max_requests: env_or(
                "FREE_TIER_MAX_REQUESTS",
                &FREE_TIER_MAX_REQUESTS.to_string(),
            )
            .parse::<u32>()
            .context("FREE_TIER_MAX_REQUESTS must be a non-negative integer")?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_str_accepts_enumerated_set() {
        assert_eq!("google".parse::<Provider>().unwrap(), Provider::Google);
        assert_eq!("openai".parse::<Provider>().unwrap(), Provider::Openai);
        assert_eq!(
            "anthropic".parse::<Provider>().unwrap(),
            Provider::Anthropic
        );
    }

    #[test]
    fn test_provider_from_str_is_case_and_whitespace_tolerant() {
        assert_eq!("  Google ".parse::<Provider>().unwrap(), Provider::Google);
        assert_eq!("ANTHROPIC".parse::<Provider>().unwrap(), Provider::Anthropic);
    }

    #[test]
    fn test_provider_from_str_rejects_unknown_names() {
        for name in ["", "mistral", "azure", "goog le", "gpt-4o"] {
            let err = name.parse::<Provider>().unwrap_err();
            assert!(
                matches!(err, AppError::Configuration(_)),
                "expected ConfigurationError for {name:?}"
            );
        }
    }

    #[test]
    fn test_provider_config_table() {
        let google = provider_config(Provider::Google);
        assert_eq!(google.model_id, "gemini-2.0-flash");
        assert_eq!(google.api_key_env, "GEMINI_API_KEY");

        let openai = provider_config(Provider::Openai);
        assert_eq!(openai.model_id, "gpt-4o");
        assert_eq!(openai.api_key_env, "OPENAI_API_KEY");

        let anthropic = provider_config(Provider::Anthropic);
        assert_eq!(anthropic.model_id, "claude-3-5-sonnet-latest");
        assert_eq!(anthropic.api_key_env, "ANTHROPIC_API_KEY");

        for provider in Provider::ALL {
            assert!((provider_config(provider).temperature - LLM_TEMPERATURE).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn test_provider_serde_roundtrip_is_lowercase() {
        let json = serde_json::to_string(&Provider::Anthropic).unwrap();
        assert_eq!(json, r#""anthropic""#);
        let back: Provider = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Provider::Anthropic);
    }
}
