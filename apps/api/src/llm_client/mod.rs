//! LLM client — the single point of entry for all model-backend calls.
//!
//! ARCHITECTURAL RULE: no other module may talk to a vendor API directly.
//! One `LlmBackend` implementation per provider; selection happens in
//! `create_backend`, never at call sites.

mod anthropic;
mod google;
mod openai;

pub use anthropic::AnthropicBackend;
pub use google::GoogleBackend;
pub use openai::OpenAiBackend;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::config::{provider_config, Provider, ProviderConfig};
use crate::errors::AppError;

/// Completion budget shared by all backends.
pub(crate) const MAX_TOKENS: u32 = 4096;
const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Backend unavailable after {retries} attempts")]
    RetriesExhausted { retries: u32 },

    #[error("Backend returned empty content")]
    EmptyContent,
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        AppError::Llm(err.to_string())
    }
}

/// The provider capability: one system prompt and one user prompt in,
/// free-form completion text out. Implementations are bound to a model and
/// temperature at construction and perform no I/O until `complete`.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError>;

    /// Provider name for logging.
    fn name(&self) -> &'static str;

    /// Model identifier currently bound.
    fn model(&self) -> &str;
}

/// Factory: binds a provider to a ready-to-invoke backend handle.
///
/// Key resolution: a caller-supplied key wins; otherwise the environment
/// variable named in the provider table; otherwise `MissingCredential`.
/// An *invalid* key is not detected here — it surfaces later as the
/// backend's own authentication failure.
pub fn create_backend(
    provider: Provider,
    caller_key: Option<String>,
) -> Result<Box<dyn LlmBackend>, AppError> {
    let config = provider_config(provider);
    let api_key = resolve_api_key(&config, caller_key)?;

    let backend: Box<dyn LlmBackend> = match provider {
        Provider::Google => Box::new(GoogleBackend::new(config, api_key)),
        Provider::Openai => Box::new(OpenAiBackend::new(config, api_key)),
        Provider::Anthropic => Box::new(AnthropicBackend::new(config, api_key)),
    };
    Ok(backend)
}

fn resolve_api_key(
    config: &ProviderConfig,
    caller_key: Option<String>,
) -> Result<String, AppError> {
    if let Some(key) = caller_key {
        let key = key.trim();
        if !key.is_empty() {
            return Ok(key.to_string());
        }
    }

    match std::env::var(config.api_key_env) {
        Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(AppError::MissingCredential(format!(
            "No API key for provider '{}'. Enter your own key or set {}.",
            config.provider, config.api_key_env
        ))),
    }
}

pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .expect("Failed to build HTTP client")
}

/// Sends a request, retrying 429 and 5xx responses with exponential backoff
/// (1s, 2s). Non-retryable statuses are returned to the caller untouched so
/// each backend can decode its own error body.
pub(crate) async fn send_with_retry(
    request: reqwest::RequestBuilder,
) -> Result<reqwest::Response, LlmError> {
    let mut last_error: Option<LlmError> = None;

    for attempt in 0..MAX_RETRIES {
        if attempt > 0 {
            let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
            warn!(
                "Backend call attempt {} failed, retrying after {}ms...",
                attempt,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }

        // JSON-bodied requests are always cloneable.
        let Some(req) = request.try_clone() else {
            return Err(last_error.unwrap_or(LlmError::RetriesExhausted { retries: attempt }));
        };

        let response = match req.send().await {
            Ok(r) => r,
            Err(e) => {
                last_error = Some(LlmError::Http(e));
                continue;
            }
        };

        let status = response.status();
        if status.as_u16() == 429 || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            warn!("Backend returned {status}: {body}");
            last_error = Some(LlmError::Api {
                status: status.as_u16(),
                message: body,
            });
            continue;
        }

        return Ok(response);
    }

    Err(last_error.unwrap_or(LlmError::RetriesExhausted {
        retries: MAX_RETRIES,
    }))
}
