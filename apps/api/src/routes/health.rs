use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::matching::normalizer::SYNONYM_TABLE_VERSION;
use crate::state::AppState;

/// GET /health
/// Returns service status, version, the synonym table version scores were computed with,
/// and how much in-memory state the service is holding.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": env!("CARGO_PKG_NAME"),
        "synonym_table_version": SYNONYM_TABLE_VERSION,
        "jobs_stored": state.jobs.len().await,
        "candidates_cached": state.candidates.len().await
    }))
}
