use std::cmp::Ordering;

use serde::Serialize;
use tracing::info;

use crate::matching::models::{CandidateProfile, ScoreBreakdown};
use crate::matching::MatchError;

#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate {
    /// 1-based position in the list.
    pub rank: usize,
    pub profile: CandidateProfile,
    pub score: ScoreBreakdown,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedList {
    pub entries: Vec<RankedCandidate>,
    pub min_score: Option<f64>,
}

impl RankedList {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top(&self) -> Option<&RankedCandidate> {
        self.entries.first()
    }

    pub fn average_score(&self) -> Option<f64> {
        if self.entries.is_empty() {
            return None;
        }
        let total: f64 = self.entries.iter().map(|e| e.score.overall_score()).sum();
        Some(total / self.entries.len() as f64)
    }

    /// Keeps the first `n` entries. Ranks are already 1-based positions, so they stay valid.
    pub fn truncate(&mut self, n: usize) {
        self.entries.truncate(n);
    }
}

/// Orders scored candidates best-first.
///
/// Entries below `min_score` are dropped (a score equal to the threshold is kept). Equal
/// overall scores are broken by username, ascending, so the output never depends on input
/// order.
pub fn rank(
    scored: &[(CandidateProfile, ScoreBreakdown)],
    min_score: Option<f64>,
) -> Result<RankedList, MatchError> {
    if let Some(threshold) = min_score {
        if !threshold.is_finite() {
            return Err(MatchError::invalid(format!(
                "min_score must be a finite number, got {threshold}"
            )));
        }
    }
    if let Some((profile, _)) = scored
        .iter()
        .find(|(_, score)| !score.overall_score().is_finite())
    {
        return Err(MatchError::invalid(format!(
            "overall score for '{}' is not a finite number",
            profile.username
        )));
    }

    let mut kept: Vec<&(CandidateProfile, ScoreBreakdown)> = scored
        .iter()
        .filter(|(_, score)| min_score.map_or(true, |t| score.overall_score() >= t))
        .collect();

    kept.sort_by(|(a_profile, a), (b_profile, b)| {
        match b.overall_score().total_cmp(&a.overall_score()) {
            Ordering::Equal => a_profile.username.cmp(&b_profile.username),
            other => other,
        }
    });

    let entries: Vec<RankedCandidate> = kept
        .into_iter()
        .enumerate()
        .map(|(i, (profile, score))| RankedCandidate {
            rank: i + 1,
            profile: profile.clone(),
            score: score.clone(),
        })
        .collect();

    info!(
        scored = scored.len(),
        kept = entries.len(),
        min_score = ?min_score,
        "Ranked candidates"
    );

    Ok(RankedList { entries, min_score })
}
