use std::sync::Arc;

use crate::config::Config;
use crate::jobs::analyzer::JobAnalyzer;
use crate::jobs::store::JobStore;
use crate::matching::scorer::CandidateScorer;
use crate::sourcing::cache::CandidateCache;
use crate::sourcing::ProfileSource;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable job analyzer. Default: LlmJobAnalyzer.
    pub analyzer: Arc<dyn JobAnalyzer>,
    /// Pluggable profile source. Default: GitHubClient.
    pub profiles: Arc<dyn ProfileSource>,
    /// Pluggable scorer. Default: WeightedScorer.
    pub scorer: Arc<dyn CandidateScorer>,
    pub jobs: JobStore,
    pub candidates: CandidateCache,
}
