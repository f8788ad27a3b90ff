//! Axum route handlers for candidate lookup, search, and the candidate cache.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::matching::models::CandidateProfile;
use crate::sourcing::cached_profile;
use crate::sourcing::github::{is_valid_login, RateLimitStatus};
use crate::state::AppState;

const MAX_SEARCH_RESULTS: usize = 100;

#[derive(Debug, Serialize)]
pub struct CandidateResponse {
    pub profile: CandidateProfile,
    pub cached: bool,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub max_results: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub usernames: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CacheStatusResponse {
    pub count: usize,
    pub usernames: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CacheClearedResponse {
    pub cleared: usize,
}

/// GET /api/v1/candidates/:username
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<CandidateResponse>, AppError> {
    if !is_valid_login(&username) {
        return Err(AppError::Validation(format!(
            "'{username}' is not a valid GitHub username"
        )));
    }

    let (profile, cached) =
        cached_profile(state.profiles.as_ref(), &state.candidates, &username).await?;
    Ok(Json(CandidateResponse { profile, cached }))
}

/// POST /api/v1/candidates/search
pub async fn handle_search_candidates(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, AppError> {
    let Json(request) = payload?;
    let query = request.query.trim().to_string();
    if query.is_empty() {
        return Err(AppError::Validation("query cannot be empty".to_string()));
    }
    let max_results = request
        .max_results
        .unwrap_or(state.config.default_top)
        .clamp(1, MAX_SEARCH_RESULTS);

    let usernames = state.profiles.search_users(&query, max_results).await?;
    Ok(Json(SearchResponse { query, usernames }))
}

/// GET /api/v1/candidates/cache
pub async fn handle_cache_status(State(state): State<AppState>) -> Json<CacheStatusResponse> {
    let usernames = state.candidates.usernames().await;
    Json(CacheStatusResponse {
        count: usernames.len(),
        usernames,
    })
}

/// DELETE /api/v1/candidates/cache
pub async fn handle_clear_cache(State(state): State<AppState>) -> Json<CacheClearedResponse> {
    Json(CacheClearedResponse {
        cleared: state.candidates.clear().await,
    })
}

/// GET /api/v1/github/rate-limit
pub async fn handle_rate_limit(
    State(state): State<AppState>,
) -> Result<Json<RateLimitStatus>, AppError> {
    Ok(Json(state.profiles.rate_limit().await?))
}
