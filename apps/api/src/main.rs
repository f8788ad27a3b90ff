mod config;
mod errors;
mod jobs;
mod llm_client;
mod matching;
mod routes;
mod sourcing;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::jobs::analyzer::LlmJobAnalyzer;
use crate::jobs::store::JobStore;
use crate::llm_client::LlmClient;
use crate::matching::normalizer::{table_sizes, verify_tables, SYNONYM_TABLE_VERSION};
use crate::matching::scorer::WeightedScorer;
use crate::matching::weights::ScoringConfig;
use crate::routes::build_router;
use crate::sourcing::cache::CandidateCache;
use crate::sourcing::github::GitHubClient;
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

    info!("Starting Talentsonar API v{}", env!("CARGO_PKG_VERSION"));

    // Refuse to start with an ambiguous synonym table
    verify_tables()?;
    let (framework_entries, language_entries) = table_sizes();
    info!(
        version = SYNONYM_TABLE_VERSION,
        framework_entries, language_entries, "Synonym tables verified"
    );

    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let github = GitHubClient::new(
        config.github_api_url.clone(),
        config.github_token.clone(),
        config.github_max_repos,
    )?;
    if github.is_authenticated() {
        info!("GitHub client initialized ({})", config.github_api_url);
    } else {
        warn!("GITHUB_TOKEN not set; GitHub requests are unauthenticated and heavily rate limited");
    }

    let state = AppState {
        config: config.clone(),
        analyzer: Arc::new(LlmJobAnalyzer::new(llm)),
        profiles: Arc::new(github),
        scorer: Arc::new(WeightedScorer {
            config: ScoringConfig::checked()?,
        }),
        jobs: JobStore::new(),
        candidates: CandidateCache::new(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the dashboard has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
