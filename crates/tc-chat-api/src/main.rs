//! Topology Chat API — chat relay server.
//!
//! Usage: `tc-chat-api [config.toml]`. Without a config file, settings come
//! from `TC_*` / `RASA_*` environment variables.

use std::time::Duration;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use tc_chat_api::config::ApiConfig;
use tc_chat_api::routes;
use tc_chat_api::session;
use tc_chat_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "tc-chat-api starting");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!(path = %path, "loading config file");
            ApiConfig::from_file(&path)?
        }
        None => ApiConfig::from_env()?,
    };

    let state = AppState::from_config(&config)?;
    let engine = state.chat.engine();
    tracing::info!(
        backend = engine.backend_name(),
        url = %config.dialogue.url,
        timeout_secs = config.dialogue.timeout_secs,
        "dialogue engine configured"
    );
    if !engine.healthy().await {
        tracing::warn!("dialogue engine not ready, replies fall back to text extraction");
    }

    tokio::spawn(session::run_reaper(
        state.sessions().clone(),
        Duration::from_secs(config.reap_interval_secs.max(1)),
        Duration::from_secs(config.session_ttl_secs),
    ));

    let app = routes::build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await?;

    tracing::info!("tc-chat-api stopped");
    Ok(())
}
