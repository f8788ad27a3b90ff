//! GitHub REST client — the single point of entry for GitHub API calls.
//!
//! No retries: a rate-limited call fails fast with the reset time so the caller can tell the
//! user when to try again.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::{header, Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::matching::models::CandidateProfile;
use crate::matching::MatchError;
use crate::sourcing::profile::{build_profile, RepoSnapshot};
use crate::sourcing::ProfileSource;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const MAX_PAGE_SIZE: usize = 100;
/// Paging stops once the remaining quota drops below this.
const LOW_QUOTA_THRESHOLD: u32 = 10;
const MAX_LOGIN_LEN: usize = 39;

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub resource not found: {0}")]
    NotFound(String),

    #[error("GitHub rate limit exceeded, resets at {reset_at}")]
    RateLimited { reset_at: DateTime<Utc> },

    #[error("GitHub API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid profile: {0}")]
    InvalidProfile(#[from] MatchError),
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubUser {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub blog: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub followers: u32,
    #[serde(default)]
    pub public_repos: u32,
    #[serde(default)]
    pub hireable: Option<bool>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRepo {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub topics: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    total_count: u64,
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    login: String,
}

#[derive(Debug, Deserialize)]
struct RateLimitResponse {
    resources: RateLimitResources,
}

#[derive(Debug, Deserialize)]
struct RateLimitResources {
    core: RateLimitBucket,
}

#[derive(Debug, Deserialize)]
struct RateLimitBucket {
    limit: u32,
    remaining: u32,
    reset: i64,
}

#[derive(Debug, Deserialize)]
struct GitHubErrorBody {
    message: String,
}

/// Core API quota as reported by `/rate_limit`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RateLimitStatus {
    pub limit: u32,
    pub remaining: u32,
    pub reset_at: DateTime<Utc>,
}

/// GitHub logins: 1–39 ASCII alphanumerics or single hyphens, not at either end.
pub fn is_valid_login(login: &str) -> bool {
    !login.is_empty()
        && login.len() <= MAX_LOGIN_LEN
        && login.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        && !login.starts_with('-')
        && !login.ends_with('-')
        && !login.contains("--")
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    max_repos: usize,
}

impl GitHubClient {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        max_repos: usize,
    ) -> Result<Self, GitHubError> {
        Ok(Self {
            client: Client::builder().timeout(Duration::from_secs(30)).build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            max_repos,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// GET `path` and decode the body. Returns the remaining quota alongside the body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<(T, Option<u32>), GitHubError> {
        let mut request = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .header(header::ACCEPT, "application/vnd.github+json")
            .header(header::USER_AGENT, USER_AGENT);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let remaining = header_number::<u32>(&response, "x-ratelimit-remaining");
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(GitHubError::NotFound(path.to_string()));
        }
        if (status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS)
            && remaining == Some(0)
        {
            let reset_at = header_number::<i64>(&response, "x-ratelimit-reset")
                .and_then(|epoch| Utc.timestamp_opt(epoch, 0).single())
                .unwrap_or_else(Utc::now);
            warn!(%reset_at, path, "GitHub rate limit exceeded");
            return Err(GitHubError::RateLimited { reset_at });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GitHubErrorBody>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(GitHubError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str(&body)?;
        debug!(path, remaining = ?remaining, "GitHub call succeeded");
        Ok((parsed, remaining))
    }

    pub async fn user(&self, username: &str) -> Result<GitHubUser, GitHubError> {
        let (user, _) = self.get_json(&format!("/users/{username}"), &[]).await?;
        Ok(user)
    }

    /// Most recently updated repositories first, up to `max_repos`.
    pub async fn repositories(&self, username: &str) -> Result<Vec<GitHubRepo>, GitHubError> {
        let per_page = self.max_repos.clamp(1, MAX_PAGE_SIZE);
        let mut repos: Vec<GitHubRepo> = Vec::new();
        let mut page = 1;

        while repos.len() < self.max_repos {
            let (batch, remaining): (Vec<GitHubRepo>, _) = self
                .get_json(
                    &format!("/users/{username}/repos"),
                    &[
                        ("sort", "updated".to_string()),
                        ("per_page", per_page.to_string()),
                        ("page", page.to_string()),
                    ],
                )
                .await?;

            let exhausted = batch.len() < per_page;
            repos.extend(batch);
            if exhausted {
                break;
            }
            if remaining.is_some_and(|r| r < LOW_QUOTA_THRESHOLD) {
                warn!(username, remaining = ?remaining, "Approaching GitHub rate limit, stopping repository fetch");
                break;
            }
            page += 1;
        }

        repos.truncate(self.max_repos);
        Ok(repos)
    }

    /// Byte counts per language for one repository.
    pub async fn languages(&self, full_name: &str) -> Result<BTreeMap<String, u64>, GitHubError> {
        let (languages, _) = self
            .get_json(&format!("/repos/{full_name}/languages"), &[])
            .await?;
        Ok(languages)
    }
}

#[async_trait]
impl ProfileSource for GitHubClient {
    async fn fetch_profile(&self, username: &str) -> Result<CandidateProfile, GitHubError> {
        if !is_valid_login(username) {
            return Err(MatchError::InvalidInput(format!(
                "'{username}' is not a valid GitHub username"
            ))
            .into());
        }

        let user = self.user(username).await?;
        let repos = self.repositories(username).await?;

        let mut snapshots = Vec::with_capacity(repos.len());
        for repo in repos {
            // Forks say little about the candidate's own code.
            let languages = if repo.fork {
                BTreeMap::new()
            } else {
                self.languages(&repo.full_name).await?
            };
            snapshots.push(RepoSnapshot { repo, languages });
        }

        let profile = build_profile(&user, &snapshots, Utc::now())?;
        info!(
            username = %profile.username,
            repositories = profile.repositories.len(),
            languages = profile.languages.len(),
            "Fetched GitHub profile"
        );
        Ok(profile)
    }

    async fn search_users(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<String>, GitHubError> {
        let per_page = max_results.clamp(1, MAX_PAGE_SIZE);
        let mut logins: Vec<String> = Vec::new();
        let mut page = 1;

        while logins.len() < max_results {
            let (response, remaining): (SearchResponse, _) = self
                .get_json(
                    "/search/users",
                    &[
                        ("q", query.to_string()),
                        ("per_page", per_page.to_string()),
                        ("page", page.to_string()),
                    ],
                )
                .await?;

            let exhausted = response.items.len() < per_page
                || (logins.len() + response.items.len()) as u64 >= response.total_count;
            logins.extend(response.items.into_iter().map(|item| item.login));
            if exhausted {
                break;
            }
            if remaining.is_some_and(|r| r < LOW_QUOTA_THRESHOLD) {
                warn!(query, remaining = ?remaining, "Approaching GitHub rate limit, stopping user search");
                break;
            }
            page += 1;
        }

        logins.truncate(max_results);
        info!(query, found = logins.len(), "GitHub user search completed");
        Ok(logins)
    }

    async fn rate_limit(&self) -> Result<RateLimitStatus, GitHubError> {
        let (response, _): (RateLimitResponse, _) = self.get_json("/rate_limit", &[]).await?;
        let core = response.resources.core;
        Ok(RateLimitStatus {
            limit: core.limit,
            remaining: core.remaining,
            reset_at: Utc
                .timestamp_opt(core.reset, 0)
                .single()
                .unwrap_or_else(Utc::now),
        })
    }
}

fn header_number<T: std::str::FromStr>(response: &Response, name: &str) -> Option<T> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}
