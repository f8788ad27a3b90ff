// Candidate sourcing: fetching GitHub profiles, building search queries, caching results.

pub mod cache;
pub mod github;
pub mod handlers;
pub mod profile;
pub mod query;

use async_trait::async_trait;
use tracing::debug;

use crate::matching::models::CandidateProfile;
use crate::sourcing::cache::CandidateCache;
use crate::sourcing::github::{GitHubError, RateLimitStatus};

/// Where candidate profiles come from. `AppState` holds an `Arc<dyn ProfileSource>`.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch_profile(&self, username: &str) -> Result<CandidateProfile, GitHubError>;

    /// Usernames matching a GitHub user-search query, at most `max_results`.
    async fn search_users(&self, query: &str, max_results: usize)
        -> Result<Vec<String>, GitHubError>;

    async fn rate_limit(&self) -> Result<RateLimitStatus, GitHubError>;
}

/// Serves `username` from the cache, fetching and caching it on a miss.
/// The flag is true when the profile came from the cache.
pub async fn cached_profile(
    source: &dyn ProfileSource,
    cache: &CandidateCache,
    username: &str,
) -> Result<(CandidateProfile, bool), GitHubError> {
    if let Some(profile) = cache.get(username).await {
        debug!(username, "Candidate cache hit");
        return Ok((profile, true));
    }

    let profile = source.fetch_profile(username).await?;
    cache.insert(profile.clone()).await;
    Ok((profile, false))
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::{TimeZone, Utc};

    use super::*;

    /// In-memory `ProfileSource` for handler and pipeline tests.
    #[derive(Default)]
    pub struct FakeProfileSource {
        pub profiles: HashMap<String, CandidateProfile>,
        pub search_results: Vec<String>,
        pub rate_limited: bool,
        pub fetches: AtomicUsize,
    }

    impl FakeProfileSource {
        pub fn with_profiles(profiles: Vec<CandidateProfile>) -> Self {
            Self {
                profiles: profiles
                    .into_iter()
                    .map(|p| (p.username.to_lowercase(), p))
                    .collect(),
                ..Self::default()
            }
        }

        pub fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    fn reset_at() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()
    }

    #[async_trait]
    impl ProfileSource for FakeProfileSource {
        async fn fetch_profile(&self, username: &str) -> Result<CandidateProfile, GitHubError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.rate_limited {
                return Err(GitHubError::RateLimited {
                    reset_at: reset_at(),
                });
            }
            self.profiles
                .get(&username.to_lowercase())
                .cloned()
                .ok_or_else(|| GitHubError::NotFound(format!("/users/{username}")))
        }

        async fn search_users(
            &self,
            _query: &str,
            max_results: usize,
        ) -> Result<Vec<String>, GitHubError> {
            if self.rate_limited {
                return Err(GitHubError::RateLimited {
                    reset_at: reset_at(),
                });
            }
            Ok(self.search_results.iter().take(max_results).cloned().collect())
        }

        async fn rate_limit(&self) -> Result<RateLimitStatus, GitHubError> {
            Ok(RateLimitStatus {
                limit: 5000,
                remaining: if self.rate_limited { 0 } else { 4999 },
                reset_at: reset_at(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeProfileSource;
    use super::*;

    #[tokio::test]
    async fn test_cached_profile_fetches_once() {
        let source = FakeProfileSource::with_profiles(vec![CandidateProfile::new("ada").unwrap()]);
        let cache = CandidateCache::new();

        let (_, first_cached) = cached_profile(&source, &cache, "ada").await.unwrap();
        let (profile, second_cached) = cached_profile(&source, &cache, "ADA").await.unwrap();

        assert!(!first_cached);
        assert!(second_cached);
        assert_eq!(profile.username, "ada");
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let source = FakeProfileSource::default();
        let cache = CandidateCache::new();

        let err = cached_profile(&source, &cache, "ghost").await.unwrap_err();
        assert!(matches!(err, GitHubError::NotFound(_)));
        assert_eq!(cache.len().await, 0);
    }
}
