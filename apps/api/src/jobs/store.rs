use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::jobs::analyzer::JobAnalysis;

/// An analyzed job description, as stored.
#[derive(Debug, Clone, Serialize)]
pub struct JobPosting {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub analysis: JobAnalysis,
    pub created_at: DateTime<Utc>,
}

/// In-memory posting store. Cloning shares the same map.
#[derive(Clone, Default)]
pub struct JobStore {
    inner: Arc<RwLock<HashMap<Uuid, JobPosting>>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a posting. The title falls back to the analyzed job title.
    pub async fn insert(
        &self,
        title: Option<String>,
        description: String,
        analysis: JobAnalysis,
    ) -> JobPosting {
        let title = title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| analysis.job_title.clone());

        let posting = JobPosting {
            id: Uuid::new_v4(),
            title,
            description,
            analysis,
            created_at: Utc::now(),
        };
        self.inner
            .write()
            .await
            .insert(posting.id, posting.clone());
        posting
    }

    pub async fn get(&self, id: Uuid) -> Option<JobPosting> {
        self.inner.read().await.get(&id).cloned()
    }

    /// All postings, oldest first.
    pub async fn list(&self) -> Vec<JobPosting> {
        let mut postings: Vec<JobPosting> = self.inner.read().await.values().cloned().collect();
        postings.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        postings
    }

    pub async fn remove(&self, id: Uuid) -> Option<JobPosting> {
        self.inner.write().await.remove(&id)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
