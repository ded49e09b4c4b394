use crate::config::Config;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum
/// extractors.
#[derive(Clone)]
pub struct AppState {
    /// Shared HTTP client for job-description fetches. Backend clients are
    /// built per request instead, bound to the resolved credential.
    pub http: reqwest::Client,
    /// Process configuration. The free-tier cap is snapshotted into
    /// `sessions` at startup; kept here for handlers that grow config needs.
    #[allow(dead_code)]
    pub config: Config,
    /// Per-session free-tier counters.
    pub sessions: SessionStore,
}
