//! Axum route handlers for scoring supplied records. No external calls.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::matching::match_candidates;
use crate::matching::models::{CandidateProfile, JobRequirement};
use crate::matching::ranker::RankedList;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub candidates: Vec<CandidateProfile>,
    pub requirements: Vec<JobRequirement>,
    #[serde(default)]
    pub min_score: Option<f64>,
    /// Keep only the best `top` entries after filtering.
    #[serde(default)]
    pub top: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub candidates_scored: usize,
    pub average_score: Option<f64>,
    pub results: RankedList,
}

/// POST /api/v1/match
///
/// Scores the supplied candidates against the supplied requirements and ranks them.
pub async fn handle_match(
    State(state): State<AppState>,
    payload: Result<Json<MatchRequest>, JsonRejection>,
) -> Result<Json<MatchResponse>, AppError> {
    let Json(request) = payload?;

    if request.top == Some(0) {
        return Err(AppError::Validation("top must be at least 1".to_string()));
    }

    let mut results = match_candidates(
        state.scorer.as_ref(),
        &request.candidates,
        &request.requirements,
        request.min_score,
    )?;
    if let Some(top) = request.top {
        results.truncate(top);
    }

    Ok(Json(MatchResponse {
        candidates_scored: request.candidates.len(),
        average_score: results.average_score(),
        results,
    }))
}
