mod aggregation;
mod config;
mod curation;
mod db;
mod errors;
mod llm_client;
mod models;
mod paths;
mod routes;
mod search;
mod state;

use anyhow::Result;
use axum::http::{HeaderValue, Method};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::aggregation::Aggregator;
use crate::config::Config;
use crate::curation::{Curator, FailureGate};
use crate::db::create_pool;
use crate::llm_client::{LlmClient, TextGenerator};
use crate::paths::memory::InMemoryPathStore;
use crate::paths::postgres::PgPathStore;
use crate::paths::store::PathStore;
use crate::routes::build_router;
use crate::search::{GithubSearch, StackOverflowSearch};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; invalid values abort startup
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Mentor Mind API v{}", env!("CARGO_PKG_VERSION"));

    // Persistence: PostgreSQL when configured, otherwise process memory
    let store: Arc<dyn PathStore> = match &config.database_url {
        Some(url) => Arc::new(PgPathStore::new(create_pool(url).await?)),
        None => {
            warn!("DATABASE_URL not set; learning paths are kept in memory only");
            Arc::new(InMemoryPathStore::new())
        }
    };

    let curator = build_curator(&config)?;

    let state = AppState::new(curator, store, config.clone());

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.allowed_origins));

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_curator(config: &Config) -> Result<Curator> {
    let generator: Option<Arc<dyn TextGenerator>> = match &config.llm_api_key {
        Some(key) => {
            let llm = LlmClient::new(
                key.clone(),
                config.llm_api_base.clone(),
                config.llm_model.clone(),
                config.llm_timeout,
            )?;
            info!("LLM client initialized (model: {})", llm.model());
            Some(Arc::new(llm))
        }
        None => {
            warn!("No LLM API key configured; AI curation disabled");
            None
        }
    };

    let curator = Curator::new(
        generator,
        FailureGate::new(config.max_ai_failures),
        config.llm_timeout,
    );

    if !config.enable_search_fallback {
        return Ok(curator);
    }

    let github = Arc::new(GithubSearch::new(
        config.github_token.clone(),
        config.search_timeout,
    )?);
    let stackoverflow = Arc::new(StackOverflowSearch::new(config.search_timeout)?);
    info!(
        "Search fallback enabled (timeout {:?} per category)",
        config.search_timeout
    );

    Ok(curator.with_aggregator(Aggregator::with_search_clients(
        config.search_timeout,
        github,
        stackoverflow,
    )))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{origin}'");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}
