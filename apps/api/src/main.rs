mod config;
mod documents;
mod errors;
mod llm_client;
mod routes;
mod screening;
mod sentiment;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::extractor::JsonExtractor;
use crate::llm_client::{GeminiClient, TextModel};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing GOOGLE_API_KEY)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting HR Suite API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize model session
    let model: Arc<dyn TextModel> = Arc::new(GeminiClient::new(&config)?);
    info!("LLM client initialized (model: {})", model.model_name());

    let policy = config.retry_policy();
    info!(
        "Retry policy: {} attempts, {:?} base backoff, {:?} call timeout",
        policy.max_attempts, policy.base_delay, policy.call_timeout
    );
    let extractor = JsonExtractor::new(model.clone(), policy);

    let shutdown = CancellationToken::new();

    // Build app state
    let state = AppState {
        extractor,
        model,
        config: config.clone(),
        shutdown: shutdown.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the HR frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    Ok(())
}

/// Resolves on Ctrl-C and cancels in-flight analyses so they stop at the
/// next stage boundary.
async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        return;
    }
    info!("Shutdown requested; cancelling in-flight analyses");
    shutdown.cancel();
}
