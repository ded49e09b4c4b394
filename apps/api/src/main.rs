mod config;
mod errors;
mod export;
mod fetch;
mod ingest;
mod llm_client;
mod models;
mod routes;
mod session;
mod state;
mod tailoring;

use std::net::SocketAddr;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{provider_config, Config, Provider};
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting tailor-api v{}", env!("CARGO_PKG_VERSION"));

    // A provider key missing at startup is non-fatal: the caller can still
    // supply their own key per request. Warn so operators notice.
    for provider in Provider::ALL {
        let pc = provider_config(provider);
        if std::env::var(pc.api_key_env).is_err() {
            warn!(
                "{} is not set; provider '{}' will require a caller-supplied key",
                pc.api_key_env, provider
            );
        }
    }

    // Shared client for job-description fetches only; LLM backends build
    // their own clients with a longer timeout.
    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;

    let state = AppState {
        http,
        sessions: SessionStore::new(config.free_tier_max_requests),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
