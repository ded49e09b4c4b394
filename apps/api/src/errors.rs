use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Field-level problems in the model's structured output are deliberately
/// NOT represented here — the validator absorbs them and reports the
/// affected field names alongside the result. Every variant below aborts
/// exactly one request; nothing is fatal to the process.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Free-tier limit reached ({used}/{max})")]
    RateLimitExceeded { used: u32, max: u32 },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Job description fetch failed: {0}")]
    Fetch(String),

    #[error("Resume ingest failed: {0}")]
    Ingest(String),

    #[error("Backend response is not parseable JSON: {0}")]
    MalformedResponse(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Configuration(msg) => {
                (StatusCode::BAD_REQUEST, "CONFIGURATION_ERROR", msg.clone())
            }
            AppError::MissingCredential(msg) => {
                (StatusCode::UNAUTHORIZED, "MISSING_CREDENTIAL", msg.clone())
            }
            AppError::RateLimitExceeded { used, max } => (
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMIT_EXCEEDED",
                format!(
                    "Free-tier limit reached ({used}/{max}). \
                     Supply your own API key to continue."
                ),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Fetch(msg) => (StatusCode::BAD_GATEWAY, "FETCH_ERROR", msg.clone()),
            AppError::Ingest(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INGEST_ERROR",
                msg.clone(),
            ),
            AppError::MalformedResponse(msg) => {
                tracing::error!("Malformed backend response: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "MALFORMED_RESPONSE",
                    "The AI backend returned unparseable output. Retry or switch provider."
                        .to_string(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_maps_to_429() {
        let resp = AppError::RateLimitExceeded { used: 3, max: 3 }.into_response();
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_configuration_maps_to_400() {
        let resp = AppError::Configuration("bad provider".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_missing_credential_maps_to_401() {
        let resp = AppError::MissingCredential("no key".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_fetch_and_malformed_map_to_502() {
        let fetch = AppError::Fetch("blocked".to_string()).into_response();
        assert_eq!(fetch.status(), StatusCode::BAD_GATEWAY);

        let malformed = AppError::MalformedResponse("prose".to_string()).into_response();
        assert_eq!(malformed.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_ingest_maps_to_422() {
        let resp = AppError::Ingest("unreadable".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
