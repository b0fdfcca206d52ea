mod config;
mod db;
mod errors;
mod interview;
mod llm_client;
mod models;
mod routes;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::interview::cache::AskedQuestionCache;
use crate::interview::engine::InterviewEngine;
use crate::interview::fallback::StaticBank;
use crate::interview::questions::QuestionGenerator;
use crate::interview::scoring::HeuristicScorer;
use crate::llm_client::{GenerativeBackend, LlmClient};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::postgres::{PgCandidateDirectory, PgSessionStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting interviewer v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url).await?;

    let backend = build_backend(&config);
    let questions = QuestionGenerator::new(
        backend,
        StaticBank::new(config.question_seed),
        AskedQuestionCache::new(config.question_cache_capacity),
    );

    let engine = InterviewEngine::new(
        Arc::new(PgSessionStore::new(db.clone())),
        Arc::new(PgCandidateDirectory::new(db)),
        questions,
        Arc::new(HeuristicScorer),
    );

    let state = AppState {
        engine: Arc::new(engine),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the candidate frontend has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// The Ollama client, or `None` to run on the static question bank alone.
fn build_backend(config: &Config) -> Option<Arc<dyn GenerativeBackend>> {
    if !config.llm_enabled {
        info!("LLM disabled, questions come from the static bank");
        return None;
    }

    match LlmClient::new(
        &config.ollama_url,
        config.ollama_model.clone(),
        Duration::from_secs(config.llm_timeout_secs),
    ) {
        Ok(client) => {
            info!(
                "LLM client initialized (model: {}, url: {})",
                client.model(),
                config.ollama_url
            );
            Some(Arc::new(client))
        }
        Err(e) => {
            warn!("LLM client unavailable, using static bank only: {e}");
            None
        }
    }
}
