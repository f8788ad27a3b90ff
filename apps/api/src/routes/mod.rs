pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::jobs::handlers as jobs;
use crate::matching::handlers as matching;
use crate::sourcing::handlers as sourcing;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Matching over supplied records
        .route("/api/v1/match", post(matching::handle_match))
        // Jobs API
        .route("/api/v1/jobs/analyze", post(jobs::handle_analyze))
        .route(
            "/api/v1/jobs",
            post(jobs::handle_create_job).get(jobs::handle_list_jobs),
        )
        .route(
            "/api/v1/jobs/:id",
            get(jobs::handle_get_job).delete(jobs::handle_delete_job),
        )
        .route("/api/v1/jobs/:id/match", post(jobs::handle_run_match))
        // Candidates API
        .route(
            "/api/v1/candidates/search",
            post(sourcing::handle_search_candidates),
        )
        .route(
            "/api/v1/candidates/cache",
            get(sourcing::handle_cache_status).delete(sourcing::handle_clear_cache),
        )
        .route(
            "/api/v1/candidates/:username",
            get(sourcing::handle_get_candidate),
        )
        .route("/api/v1/github/rate-limit", get(sourcing::handle_rate_limit))
        .with_state(state)
}
