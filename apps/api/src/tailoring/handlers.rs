//! Axum route handlers for the tailoring API.

use axum::extract::multipart::Field;
use axum::extract::{Multipart, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Provider;
use crate::errors::AppError;
use crate::fetch::fetch_job_description;
use crate::ingest::extract_resume_text;
use crate::llm_client::create_backend;
use crate::models::resume::TailoredResume;
use crate::session::FreeTierUsage;
use crate::state::AppState;
use crate::tailoring::engine::tailor_resume;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct TailorResponse {
    /// Echoed (or freshly minted) session id; send it back on the next call
    /// to stay on the same free-tier meter.
    pub session_id: Uuid,
    pub resume: TailoredResume,
    /// Top-level fields the validator had to default because the backend
    /// omitted or malformed them. Empty means fully valid.
    pub defaulted_fields: Vec<String>,
    /// Present for metered (free-tier) calls; `null` when the caller
    /// supplied their own API key.
    pub free_tier: Option<FreeTierUsage>,
}

#[derive(Debug, Deserialize)]
pub struct JobPreviewRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct JobPreviewResponse {
    pub text: String,
}

/// Collected multipart fields for POST /api/v1/tailor.
#[derive(Debug, Default)]
struct TailorForm {
    resume: Option<bytes::Bytes>,
    job_url: Option<String>,
    job_text: Option<String>,
    provider: Option<String>,
    api_key: Option<String>,
    session_id: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/tailor
///
/// Full pipeline: provider select → gate → ingest → fetch → backend →
/// validate. The free-tier credit is consumed after gating and before any
/// backend invocation; a caller-supplied key bypasses the meter entirely.
pub async fn handle_tailor(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<TailorResponse>, AppError> {
    let form = read_form(multipart).await?;

    let provider_name = form
        .provider
        .ok_or_else(|| AppError::Validation("Missing 'provider' field".to_string()))?;
    let provider: Provider = provider_name.parse()?;

    let api_key = form
        .api_key
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());
    let has_own_key = api_key.is_some();

    let session_id = match form.session_id.as_deref() {
        Some(raw) => Uuid::parse_str(raw.trim())
            .map_err(|_| AppError::Validation(format!("Invalid session_id: '{raw}'")))?,
        None => Uuid::new_v4(),
    };

    // Credential resolution happens before the gate so a missing key never
    // burns a free-tier credit.
    let backend = create_backend(provider, api_key)?;

    let outcome = state.sessions.gate(session_id, has_own_key)?;

    let resume_bytes = form
        .resume
        .ok_or_else(|| AppError::Validation("Missing 'resume' PDF upload".to_string()))?;
    let resume_text = extract_resume_text(&resume_bytes)?;

    let job_text = match (form.job_text, form.job_url) {
        (Some(text), _) if !text.trim().is_empty() => text,
        (_, Some(url)) if !url.trim().is_empty() => {
            fetch_job_description(&state.http, url.trim()).await?
        }
        _ => {
            return Err(AppError::Validation(
                "Provide either 'job_url' or 'job_text'".to_string(),
            ))
        }
    };

    let validated = tailor_resume(backend.as_ref(), &resume_text, &job_text).await?;

    Ok(Json(TailorResponse {
        session_id,
        resume: validated.resume,
        defaulted_fields: validated.defaulted_fields,
        free_tier: outcome.usage(),
    }))
}

/// POST /api/v1/job/preview
///
/// Fetches a job posting URL and returns the extracted visible text, so the
/// caller can inspect (or hand-correct) what the engine will see.
pub async fn handle_job_preview(
    State(state): State<AppState>,
    Json(request): Json<JobPreviewRequest>,
) -> Result<Json<JobPreviewResponse>, AppError> {
    if request.url.trim().is_empty() {
        return Err(AppError::Validation("url cannot be empty".to_string()));
    }

    let text = fetch_job_description(&state.http, request.url.trim()).await?;
    Ok(Json(JobPreviewResponse { text }))
}

// ────────────────────────────────────────────────────────────────────────────
// Multipart plumbing
// ────────────────────────────────────────────────────────────────────────────

async fn read_form(mut multipart: Multipart) -> Result<TailorForm, AppError> {
    let mut form = TailorForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        match field.name().unwrap_or_default().to_string().as_str() {
            "resume" => {
                form.resume = Some(field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read resume upload: {e}"))
                })?)
            }
            "job_url" => form.job_url = Some(text_field(field).await?),
            "job_text" => form.job_text = Some(text_field(field).await?),
            "provider" => form.provider = Some(text_field(field).await?),
            "api_key" => form.api_key = Some(text_field(field).await?),
            "session_id" => form.session_id = Some(text_field(field).await?),
            _ => {} // unknown fields ignored
        }
    }

    Ok(form)
}

async fn text_field(field: Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart field: {e}")))
}
