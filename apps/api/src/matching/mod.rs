// Candidate–job matching core.
// Pure, synchronous functions over value types: normalize -> score -> rank.
// Nothing in here performs I/O or holds state between calls.

pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod ranker;
pub mod scorer;
pub mod weights;

use thiserror::Error;

use crate::matching::models::{CandidateProfile, JobRequirement};
use crate::matching::ranker::{rank, RankedList};
use crate::matching::scorer::CandidateScorer;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Synonym table '{table}' maps '{alias}' to both '{first}' and '{second}'")]
    SynonymCollision {
        table: &'static str,
        alias: String,
        first: &'static str,
        second: &'static str,
    },
}

impl MatchError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        MatchError::InvalidInput(message.into())
    }
}

/// Scores every candidate against one job and ranks the results.
///
/// Any invalid record aborts the whole run before a ranking is produced.
pub fn match_candidates(
    scorer: &dyn CandidateScorer,
    candidates: &[CandidateProfile],
    job: &[JobRequirement],
    min_score: Option<f64>,
) -> Result<RankedList, MatchError> {
    let pairs = candidates
        .iter()
        .map(|candidate| {
            scorer
                .score(candidate, job)
                .map(|breakdown| (candidate.clone(), breakdown))
        })
        .collect::<Result<Vec<_>, _>>()?;

    rank(&pairs, min_score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::models::{Importance, RequirementCategory};
    use crate::matching::scorer::WeightedScorer;

    fn requirement(text: &str, importance: Importance) -> JobRequirement {
        JobRequirement::new(RequirementCategory::TechnicalSkill, text, importance, None).unwrap()
    }

    #[test]
    fn test_match_candidates_orders_by_overall_score() {
        let mut strong = CandidateProfile::new("strong").unwrap();
        strong.languages.insert("Rust".to_string(), 0.8);
        strong.account_age_days = 3650;
        let weak = CandidateProfile::new("weak").unwrap();

        let job = vec![requirement("rust", Importance::Required)];
        let ranked =
            match_candidates(&WeightedScorer::default(), &[weak, strong], &job, None).unwrap();

        assert_eq!(ranked.entries.len(), 2);
        assert_eq!(ranked.entries[0].profile.username, "strong");
        assert_eq!(ranked.entries[0].rank, 1);
        assert_eq!(ranked.entries[1].rank, 2);
    }

    #[test]
    fn test_match_candidates_rejects_invalid_candidate() {
        let mut bad = CandidateProfile::new("bad").unwrap();
        bad.languages.insert("python".to_string(), 1.7);

        let result = match_candidates(&WeightedScorer::default(), &[bad], &[], None);
        assert!(matches!(result, Err(MatchError::InvalidInput(_))));
    }
}
