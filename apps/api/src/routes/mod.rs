pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::export::handlers::handle_export;
use crate::ingest::MAX_RESUME_BYTES;
use crate::state::AppState;
use crate::tailoring::handlers::{handle_job_preview, handle_tailor};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/job/preview", post(handle_job_preview))
        .route("/api/v1/tailor", post(handle_tailor))
        .route("/api/v1/export", post(handle_export))
        // Multipart bodies carry the resume PDF; leave headroom above the
        // ingest limit for the other form fields.
        .layer(DefaultBodyLimit::max(MAX_RESUME_BYTES + 64 * 1024))
        .with_state(state)
}
