//! Anthropic Messages API backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{http_client, send_with_retry, LlmBackend, LlmError, MAX_TOKENS};
use crate::config::ProviderConfig;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

pub struct AnthropicBackend {
    client: reqwest::Client,
    config: ProviderConfig,
    api_key: String,
}

impl AnthropicBackend {
    pub fn new(config: ProviderConfig, api_key: String) -> Self {
        Self {
            client: http_client(),
            config,
            api_key,
        }
    }
}

#[async_trait]
impl LlmBackend for AnthropicBackend {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let body = MessagesRequest {
            model: self.config.model_id,
            max_tokens: MAX_TOKENS,
            temperature: self.config.temperature,
            system,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let request = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body);

        let response = send_with_retry(request).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: MessagesResponse = response.json().await?;

        debug!(
            "Anthropic call succeeded: input_tokens={}, output_tokens={}",
            parsed.usage.input_tokens, parsed.usage.output_tokens
        );

        parsed
            .content
            .into_iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text)
            .ok_or(LlmError::EmptyContent)
    }

    fn name(&self) -> &'static str {
        "anthropic"
    }

    fn model(&self) -> &str {
        self.config.model_id
    }
}
