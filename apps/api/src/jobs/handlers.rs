//! Axum route handlers for the Jobs API.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::analyzer::JobAnalysis;
use crate::jobs::pipeline::{run_match, MatchRun, MatchRunRequest};
use crate::jobs::store::JobPosting;
use crate::sourcing::query::build_search_query;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis: JobAnalysis,
    pub search_query: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    #[serde(default)]
    pub title: Option<String>,
    pub description: String,
}

fn require_description(description: &str) -> Result<(), AppError> {
    if description.trim().is_empty() {
        return Err(AppError::Validation("description cannot be empty".to_string()));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs/analyze
///
/// Analyzes a job description without storing it. Useful for previewing extraction.
pub async fn handle_analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let Json(request) = payload?;
    require_description(&request.description)?;

    let analysis = state.analyzer.analyze(&request.description).await?;
    let search_query = build_search_query(&analysis);

    Ok(Json(AnalyzeResponse {
        analysis,
        search_query,
    }))
}

/// POST /api/v1/jobs
///
/// Analyzes and stores a job posting.
pub async fn handle_create_job(
    State(state): State<AppState>,
    payload: Result<Json<CreateJobRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<JobPosting>), AppError> {
    let Json(request) = payload?;
    require_description(&request.description)?;

    let analysis = state.analyzer.analyze(&request.description).await?;
    let posting = state
        .jobs
        .insert(request.title, request.description, analysis)
        .await;

    Ok((StatusCode::CREATED, Json(posting)))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(State(state): State<AppState>) -> Json<Vec<JobPosting>> {
    Json(state.jobs.list().await)
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobPosting>, AppError> {
    state
        .jobs
        .get(job_id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .jobs
        .remove(job_id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
}

/// POST /api/v1/jobs/:id/match
///
/// Finds candidates for a stored job, scores and ranks them. A GitHub rate limit aborts
/// the run with 429; other per-candidate fetch failures are reported and skipped.
pub async fn handle_run_match(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    payload: Result<Json<MatchRunRequest>, JsonRejection>,
) -> Result<Json<MatchRun>, AppError> {
    let Json(request) = payload?;

    let posting = state
        .jobs
        .get(job_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    let run = run_match(
        &posting,
        request,
        state.profiles.as_ref(),
        &state.candidates,
        state.scorer.as_ref(),
        state.config.default_top,
    )
    .await?;

    Ok(Json(run))
}
