//! Axum route handler for the Export API.

use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::errors::AppError;
use crate::export::render_pdf;
use crate::models::resume::TailoredResume;

/// POST /api/v1/export
///
/// Renders a (possibly hand-edited) resume back to PDF. Rendering is
/// CPU-bound, so it runs inside `spawn_blocking`.
pub async fn handle_export(Json(resume): Json<TailoredResume>) -> Result<Response, AppError> {
    let bytes = tokio::task::spawn_blocking(move || render_pdf(&resume))
        .await
        .map_err(|e| anyhow::anyhow!("PDF render task failed: {e}"))??;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"tailored_resume.pdf\"",
            ),
        ],
        bytes,
    )
        .into_response())
}
