mod config;
mod errors;
mod interview;
mod llm_client;
mod research;
mod routes;
mod session;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::research::fetcher::ReaderProxyFetcher;
use crate::routes::build_router;
use crate::session::store::{RedisKvStore, SessionStore};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interviewer API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize Redis session store
    let redis = redis::Client::open(config.redis_url.clone())?;
    let kv = RedisKvStore::connect(redis).await?;
    info!("Redis session store connected");

    // Initialize LLM client
    let llm = LlmClient::new(
        config.inference_base_url.clone(),
        config.cloudflare_account_id.clone(),
        config.cloudflare_api_token.clone(),
        config.default_model.clone(),
    )?;
    info!("LLM client initialized (model: {})", llm.model());

    let fetcher = ReaderProxyFetcher::new(config.reader_proxy_url.clone())?;
    info!("Page fetcher initialized (proxy: {})", config.reader_proxy_url);

    // Build app state
    let state = AppState {
        llm: Arc::new(llm),
        fetcher: Arc::new(fetcher),
        sessions: SessionStore::new(Arc::new(kv)),
    };

    // Front-end is served from its own origin.
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
