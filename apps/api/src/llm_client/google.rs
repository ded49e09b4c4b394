//! Google Gemini (generateContent) API backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{http_client, send_with_retry, LlmBackend, LlmError, MAX_TOKENS};
use crate::config::ProviderConfig;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: RequestContent<'a>,
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

pub struct GoogleBackend {
    client: reqwest::Client,
    config: ProviderConfig,
    api_key: String,
}

impl GoogleBackend {
    pub fn new(config: ProviderConfig, api_key: String) -> Self {
        Self {
            client: http_client(),
            config,
            api_key,
        }
    }
}

#[async_trait]
impl LlmBackend for GoogleBackend {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let body = GenerateRequest {
            system_instruction: RequestContent {
                parts: vec![RequestPart { text: system }],
            },
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: MAX_TOKENS,
            },
        };

        let url = format!("{GEMINI_API_BASE}/{}:generateContent", self.config.model_id);
        let request = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
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

        let parsed: GenerateResponse = response.json().await?;

        debug!(
            "Gemini call succeeded: candidates={}",
            parsed.candidates.len()
        );

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|content| content.parts.into_iter().find_map(|p| p.text))
            .filter(|text| !text.is_empty())
            .ok_or(LlmError::EmptyContent)
    }

    fn name(&self) -> &'static str {
        "google"
    }

    fn model(&self) -> &str {
        self.config.model_id
    }
}
