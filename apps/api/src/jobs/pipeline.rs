//! Match run: finds candidates for a stored job posting, then scores and ranks them.
//!
//! Candidates come from, in order of precedence: explicit usernames, an explicit search
//! query, or a query built from the posting's analysis. Profiles are fetched one at a time
//! to stay gentle on the GitHub quota.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::store::JobPosting;
use crate::matching::match_candidates;
use crate::matching::ranker::RankedList;
use crate::matching::scorer::CandidateScorer;
use crate::sourcing::cache::CandidateCache;
use crate::sourcing::github::{is_valid_login, GitHubError};
use crate::sourcing::query::build_search_query;
use crate::sourcing::{cached_profile, ProfileSource};

/// Hard ceiling on candidates per run, whatever the request asks for.
pub const MAX_TOP: usize = 100;

#[derive(Debug, Default, Deserialize)]
pub struct MatchRunRequest {
    #[serde(default)]
    pub usernames: Option<Vec<String>>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub top: Option<usize>,
    #[serde(default)]
    pub min_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FetchFailure {
    pub username: String,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct MatchRun {
    pub job_id: Uuid,
    /// The search query used, when candidates were found by search.
    pub query: Option<String>,
    pub candidates_analyzed: usize,
    pub served_from_cache: usize,
    pub failures: Vec<FetchFailure>,
    pub average_score: Option<f64>,
    pub results: RankedList,
}

/// Trims, drops blanks, and removes case-insensitive duplicates, keeping first spellings.
fn clean_usernames(usernames: &[String]) -> Result<Vec<String>, AppError> {
    let mut seen = std::collections::HashSet::new();
    let mut cleaned = Vec::new();
    for username in usernames.iter().map(|u| u.trim()).filter(|u| !u.is_empty()) {
        if !is_valid_login(username) {
            return Err(AppError::Validation(format!(
                "'{username}' is not a valid GitHub username"
            )));
        }
        if seen.insert(username.to_lowercase()) {
            cleaned.push(username.to_string());
        }
    }
    if cleaned.is_empty() {
        return Err(AppError::Validation(
            "usernames must contain at least one username".to_string(),
        ));
    }
    Ok(cleaned)
}

pub async fn run_match(
    posting: &JobPosting,
    request: MatchRunRequest,
    profiles: &dyn ProfileSource,
    cache: &CandidateCache,
    scorer: &dyn CandidateScorer,
    default_top: usize,
) -> Result<MatchRun, AppError> {
    let top = request.top.unwrap_or(default_top);
    if top == 0 {
        return Err(AppError::Validation("top must be at least 1".to_string()));
    }
    let top = top.min(MAX_TOP);

    let (usernames, query) = match (&request.usernames, &request.query) {
        (Some(usernames), _) => {
            let mut usernames = clean_usernames(usernames)?;
            usernames.truncate(top);
            (usernames, None)
        }
        (None, query) => {
            let query = query
                .as_deref()
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| build_search_query(&posting.analysis));
            info!(job_id = %posting.id, query = %query, "Searching GitHub for candidates");
            (profiles.search_users(&query, top).await?, Some(query))
        }
    };

    let mut candidates = Vec::with_capacity(usernames.len());
    let mut failures = Vec::new();
    let mut served_from_cache = 0;

    for username in &usernames {
        match cached_profile(profiles, cache, username).await {
            Ok((profile, cached)) => {
                if cached {
                    served_from_cache += 1;
                }
                candidates.push(profile);
            }
            Err(GitHubError::RateLimited { reset_at }) => {
                return Err(AppError::RateLimited { reset_at });
            }
            Err(e) => {
                warn!(username = %username, error = %e, "Skipping candidate");
                failures.push(FetchFailure {
                    username: username.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    let results = match_candidates(
        scorer,
        &candidates,
        &posting.analysis.requirements,
        request.min_score,
    )?;

    info!(
        job_id = %posting.id,
        analyzed = candidates.len(),
        failed = failures.len(),
        ranked = results.len(),
        "Match run completed"
    );

    Ok(MatchRun {
        job_id: posting.id,
        query,
        candidates_analyzed: candidates.len(),
        served_from_cache,
        failures,
        average_score: results.average_score(),
        results,
    })
}
