//! OpenAI Chat Completions API backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{http_client, send_with_retry, LlmBackend, LlmError, MAX_TOKENS};
use crate::config::ProviderConfig;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Forces JSON-mode output. The prompt already demands JSON; this makes the
/// API enforce it too.
#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

pub struct OpenAiBackend {
    client: reqwest::Client,
    config: ProviderConfig,
    api_key: String,
}

impl OpenAiBackend {
    pub fn new(config: ProviderConfig, api_key: String) -> Self {
        Self {
            client: http_client(),
            config,
            api_key,
        }
    }
}

#[async_trait]
impl LlmBackend for OpenAiBackend {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let body = ChatRequest {
            model: self.config.model_id,
            temperature: self.config.temperature,
            max_tokens: MAX_TOKENS,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        let request = self
            .client
            .post(OPENAI_API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body);

        let response = send_with_retry(request).await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response.json().await?;

        if let Some(usage) = &parsed.usage {
            debug!(
                "OpenAI call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(LlmError::EmptyContent)
    }

    fn name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        self.config.model_id
    }
}
