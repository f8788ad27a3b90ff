use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::matching::models::CandidateProfile;

/// Fetched profiles keyed by lower-cased username. Cloning shares the same map.
///
/// Entries never expire on their own; `clear` is the only eviction.
#[derive(Clone, Default)]
pub struct CandidateCache {
    inner: Arc<RwLock<HashMap<String, CandidateProfile>>>,
}

fn key(username: &str) -> String {
    username.trim().to_lowercase()
}

impl CandidateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, username: &str) -> Option<CandidateProfile> {
        self.inner.read().await.get(&key(username)).cloned()
    }

    pub async fn insert(&self, profile: CandidateProfile) {
        self.inner
            .write()
            .await
            .insert(key(&profile.username), profile);
    }

    /// Drops every entry and returns how many there were.
    pub async fn clear(&self) -> usize {
        let mut map = self.inner.write().await;
        let evicted = map.len();
        map.clear();
        info!(evicted, "Candidate cache cleared");
        evicted
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn usernames(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .inner
            .read()
            .await
            .values()
            .map(|p| p.username.clone())
            .collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_is_case_insensitive() {
        let cache = CandidateCache::new();
        cache
            .insert(CandidateProfile::new("OctoCat").unwrap())
            .await;

        let hit = cache.get("octocat").await.unwrap();
        assert_eq!(hit.username, "OctoCat");
        assert!(cache.get(" OCTOCAT ").await.is_some());
        assert!(cache.get("someone").await.is_none());
    }

    #[tokio::test]
    async fn test_insert_replaces_existing_entry() {
        let cache = CandidateCache::new();
        cache.insert(CandidateProfile::new("ada").unwrap()).await;
        let mut newer = CandidateProfile::new("Ada").unwrap();
        newer.followers = 7;
        cache.insert(newer).await;

        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get("ada").await.unwrap().followers, 7);
    }

    #[tokio::test]
    async fn test_clear_returns_evicted_count() {
        let cache = CandidateCache::new();
        cache.insert(CandidateProfile::new("a").unwrap()).await;
        cache.insert(CandidateProfile::new("b").unwrap()).await;
        let shared = cache.clone();

        assert_eq!(shared.clear().await, 2);
        assert_eq!(cache.len().await, 0);
        assert_eq!(cache.clear().await, 0);
    }

    #[tokio::test]
    async fn test_usernames_sorted() {
        let cache = CandidateCache::new();
        cache.insert(CandidateProfile::new("zed").unwrap()).await;
        cache.insert(CandidateProfile::new("amy").unwrap()).await;
        assert_eq!(cache.usernames().await, vec!["amy", "zed"]);
    }
}
