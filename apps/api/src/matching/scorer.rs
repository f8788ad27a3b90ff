//! Measures one candidate profile against one job's requirement list.
//!
//! `CandidateScorer` is the seam `AppState` carries (`Arc<dyn CandidateScorer>`);
//! `WeightedScorer` is the only backend. Five components are computed independently and
//! combined with `ComponentWeights`:
//!
//! 1. technical: tiered skill overlap, required tier dominates
//! 2. experience: account age against required years, blended with repository quality, floored at 5
//! 3. activity: recency of the latest push, blended with repository and follower counts
//! 4. education: degree/institution keywords in bio or company, floored at 40
//! 5. soft skills: bio, documented repositories, collaboration, a third each
//!
//! Missing optional data lowers a component; it never produces an error.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::matching::models::{
    CandidateProfile, Importance, JobRequirement, RequirementCategory, ScoreBreakdown,
};
use crate::matching::normalizer::{contains_term, normalize, word_haystack};
use crate::matching::weights::{ComponentScores, ScoringConfig, TierWeights};
use crate::matching::MatchError;

/// Account age counted as experience is capped here, whatever the job asks for.
pub const MAX_EXPERIENCE_YEARS: f64 = 10.0;
const DAYS_PER_YEAR: f64 = 365.0;
const EXPERIENCE_YEARS_SHARE: f64 = 0.7;
const EXPERIENCE_REPO_SHARE: f64 = 0.3;
pub const EXPERIENCE_FLOOR: f64 = 5.0;

/// Pushed within this many days → full recency credit.
pub const FRESH_ACTIVITY_DAYS: i64 = 7;
/// Pushed this many days ago or earlier → no recency credit.
pub const STALE_ACTIVITY_DAYS: i64 = 365;
const ACTIVITY_RECENCY_SHARE: f64 = 0.7;
const ACTIVITY_ENGAGEMENT_SHARE: f64 = 0.3;
pub const ACTIVITY_FLOOR: f64 = 5.0;

pub const EDUCATION_FLOOR: f64 = 40.0;
const EDUCATION_KEYWORD_POINTS: f64 = 20.0;
const EDUCATION_MAX_KEYWORDS: usize = 3;
const EDUCATION_STAR_THRESHOLD: u64 = 100;
const EDUCATION_STAR_POINTS: f64 = 20.0;
const EDUCATION_KEYWORDS: &[&str] = &[
    "phd",
    "doctorate",
    "master",
    "masters",
    "msc",
    "bachelor",
    "bsc",
    "degree",
    "university",
    "college",
    "institute",
    "student",
    "graduate",
    "computer science",
    "engineering",
    "mathematics",
    "statistics",
];

pub const SOFT_SKILLS_FLOOR: f64 = 5.0;
const DOCUMENTED_DESCRIPTION_CHARS: usize = 20;
const DOCUMENTED_REPO_TARGET: f64 = 3.0;

// Saturation points for log scaling: a count at or above these scores 100.
const REPO_SATURATION: f64 = 50.0;
const STAR_SATURATION: f64 = 1000.0;
const FOLLOWER_SATURATION: f64 = 500.0;
const COLLABORATION_SATURATION: f64 = 20.0;

/// The scorer trait. Implement this to swap scoring backends without touching handlers.
pub trait CandidateScorer: Send + Sync {
    fn score(
        &self,
        candidate: &CandidateProfile,
        job: &[JobRequirement],
    ) -> Result<ScoreBreakdown, MatchError>;
}

/// Weighted five-component scorer.
#[derive(Debug, Clone, Default)]
pub struct WeightedScorer {
    pub config: ScoringConfig,
}

impl CandidateScorer for WeightedScorer {
    fn score(
        &self,
        candidate: &CandidateProfile,
        job: &[JobRequirement],
    ) -> Result<ScoreBreakdown, MatchError> {
        score_at(candidate, job, &self.config, Utc::now())
    }
}

/// Scores with the default weights at the current time.
pub fn score(
    candidate: &CandidateProfile,
    job: &[JobRequirement],
) -> Result<ScoreBreakdown, MatchError> {
    score_at(candidate, job, &ScoringConfig::default(), Utc::now())
}

/// Scores as of `now`. Inputs are validated before any component is computed.
pub fn score_at(
    candidate: &CandidateProfile,
    job: &[JobRequirement],
    config: &ScoringConfig,
    now: DateTime<Utc>,
) -> Result<ScoreBreakdown, MatchError> {
    candidate.validate()?;
    for requirement in job {
        requirement.validate()?;
    }

    let technical = technical_component(candidate, job, &config.tiers);
    let components = ComponentScores {
        technical: technical.score,
        experience: experience_component(candidate, job),
        activity: activity_component(candidate, now),
        education: education_component(candidate),
        soft_skills: soft_skills_component(candidate),
    };
    let overall_score = round_one(config.components.combine(&components));

    debug!(
        username = %candidate.username,
        overall_score,
        technical = components.technical,
        experience = components.experience,
        activity = components.activity,
        education = components.education,
        soft_skills = components.soft_skills,
        "Scored candidate"
    );

    Ok(ScoreBreakdown::new(
        candidate.username.clone(),
        ComponentScores {
            technical: round_one(components.technical),
            experience: round_one(components.experience),
            activity: round_one(components.activity),
            education: round_one(components.education),
            soft_skills: round_one(components.soft_skills),
        },
        overall_score,
        technical.matched,
        technical.missing,
        technical.bonus,
        now,
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Technical skills
// ────────────────────────────────────────────────────────────────────────────

struct TechnicalMatch {
    score: f64,
    matched: BTreeSet<String>,
    missing: BTreeSet<String>,
    bonus: BTreeSet<String>,
}

#[derive(Default)]
struct TierTally {
    matched: usize,
    total: usize,
}

impl TierTally {
    /// An empty tier earns full credit.
    fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.matched as f64 / self.total as f64
        }
    }
}

/// Canonical tokens for everything the candidate is known to use.
fn candidate_skills(candidate: &CandidateProfile) -> BTreeSet<String> {
    candidate
        .languages
        .keys()
        .chain(candidate.technologies.iter())
        .map(|skill| normalize(skill))
        .filter(|token| !token.is_empty())
        .collect()
}

fn technical_component(
    candidate: &CandidateProfile,
    job: &[JobRequirement],
    tiers: &TierWeights,
) -> TechnicalMatch {
    let skills = candidate_skills(candidate);

    // A token requested more than once counts once, in its most important tier.
    let mut wanted: BTreeMap<String, Importance> = BTreeMap::new();
    for requirement in job
        .iter()
        .filter(|r| r.category == RequirementCategory::TechnicalSkill)
    {
        let token = normalize(&requirement.requirement);
        if token.is_empty() {
            continue;
        }
        wanted
            .entry(token)
            .and_modify(|importance| *importance = (*importance).min(requirement.importance))
            .or_insert(requirement.importance);
    }

    let mut required = TierTally::default();
    let mut preferred = TierTally::default();
    let mut nice_to_have = TierTally::default();
    let mut matched = BTreeSet::new();
    let mut missing = BTreeSet::new();

    for (token, importance) in &wanted {
        let tally = match importance {
            Importance::Required => &mut required,
            Importance::Preferred => &mut preferred,
            Importance::NiceToHave => &mut nice_to_have,
        };
        tally.total += 1;

        if skills.contains(token) {
            tally.matched += 1;
            matched.insert(token.clone());
        } else if *importance != Importance::NiceToHave {
            missing.insert(token.clone());
        }
    }

    let bonus = skills
        .into_iter()
        .filter(|skill| !wanted.contains_key(skill))
        .collect();

    let mut score = 100.0
        * tiers.blend(
            required.fraction(),
            preferred.fraction(),
            nice_to_have.fraction(),
        );
    if required.total > 0 && required.matched == 0 {
        score = score.min(100.0 * tiers.required_miss_ceiling());
    }

    TechnicalMatch {
        score: score.clamp(0.0, 100.0),
        matched,
        missing,
        bonus,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Experience
// ────────────────────────────────────────────────────────────────────────────

fn experience_component(candidate: &CandidateProfile, job: &[JobRequirement]) -> f64 {
    let candidate_years =
        (f64::from(candidate.account_age_days) / DAYS_PER_YEAR).min(MAX_EXPERIENCE_YEARS);

    let required_years = job
        .iter()
        .filter(|r| r.category == RequirementCategory::Experience)
        .filter_map(|r| r.years_experience)
        .max()
        .unwrap_or(0);

    let years_score = 100.0 * (candidate_years / f64::from(required_years.max(1))).min(1.0);

    (years_score * EXPERIENCE_YEARS_SHARE + repository_quality(candidate) * EXPERIENCE_REPO_SHARE)
        .clamp(EXPERIENCE_FLOOR, 100.0)
}

/// Original-repository count and aggregate stars, each log-scaled to 0–100, averaged.
fn repository_quality(candidate: &CandidateProfile) -> f64 {
    let original_repos = candidate
        .repositories
        .iter()
        .filter(|repo| !repo.is_fork)
        .count();

    (log_scaled(original_repos as f64, REPO_SATURATION)
        + log_scaled(total_stars(candidate) as f64, STAR_SATURATION))
        / 2.0
}

// ────────────────────────────────────────────────────────────────────────────
// Activity
// ────────────────────────────────────────────────────────────────────────────

fn activity_component(candidate: &CandidateProfile, now: DateTime<Utc>) -> f64 {
    let recency = candidate
        .repositories
        .iter()
        .filter_map(|repo| repo.last_activity)
        .max()
        .map(|latest| recency_score((now - latest).num_days()))
        .unwrap_or(0.0);

    let engagement = (log_scaled(candidate.repositories.len() as f64, REPO_SATURATION)
        + log_scaled(f64::from(candidate.followers), FOLLOWER_SATURATION))
        / 2.0;

    (recency * ACTIVITY_RECENCY_SHARE + engagement * ACTIVITY_ENGAGEMENT_SHARE)
        .clamp(ACTIVITY_FLOOR, 100.0)
}

/// 100 within a week of the last push, 0 after a year, linear in between.
/// Timestamps in the future count as fresh.
pub fn recency_score(days_since: i64) -> f64 {
    if days_since <= FRESH_ACTIVITY_DAYS {
        100.0
    } else if days_since >= STALE_ACTIVITY_DAYS {
        0.0
    } else {
        100.0 * (STALE_ACTIVITY_DAYS - days_since) as f64
            / (STALE_ACTIVITY_DAYS - FRESH_ACTIVITY_DAYS) as f64
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Education (proxy)
// ────────────────────────────────────────────────────────────────────────────

fn education_component(candidate: &CandidateProfile) -> f64 {
    let haystack = word_haystack(&format!(
        "{} {}",
        candidate.bio.as_deref().unwrap_or_default(),
        candidate.company.as_deref().unwrap_or_default()
    ));

    let hits = EDUCATION_KEYWORDS
        .iter()
        .filter(|keyword| contains_term(&haystack, keyword))
        .count()
        .min(EDUCATION_MAX_KEYWORDS);

    let mut score = EDUCATION_FLOOR + hits as f64 * EDUCATION_KEYWORD_POINTS;
    // Widely starred work stands in for a stated degree.
    if total_stars(candidate) > EDUCATION_STAR_THRESHOLD {
        score += EDUCATION_STAR_POINTS;
    }
    score.clamp(EDUCATION_FLOOR, 100.0)
}

// ────────────────────────────────────────────────────────────────────────────
// Soft skills (proxy)
// ────────────────────────────────────────────────────────────────────────────

fn soft_skills_component(candidate: &CandidateProfile) -> f64 {
    let has_bio = candidate
        .bio
        .as_deref()
        .is_some_and(|bio| !bio.trim().is_empty());
    let communication = if has_bio { 1.0 } else { 0.0 };

    let documented = candidate
        .repositories
        .iter()
        .filter(|repo| {
            repo.description
                .as_deref()
                .is_some_and(|d| d.trim().chars().count() > DOCUMENTED_DESCRIPTION_CHARS)
        })
        .count();
    let documentation = (documented as f64 / DOCUMENTED_REPO_TARGET).min(1.0);

    let forks: u64 = candidate
        .repositories
        .iter()
        .map(|repo| u64::from(repo.forks))
        .sum();
    let collaboration_events = forks + u64::from(candidate.external_contributions.unwrap_or(0));
    let collaboration = log_scaled(collaboration_events as f64, COLLABORATION_SATURATION) / 100.0;

    (100.0 / 3.0 * (communication + documentation + collaboration)).clamp(SOFT_SKILLS_FLOOR, 100.0)
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn total_stars(candidate: &CandidateProfile) -> u64 {
    candidate
        .repositories
        .iter()
        .map(|repo| u64::from(repo.stars))
        .sum()
}

/// `100 × ln(1+x) / ln(1+saturation)`, capped at 100, so one outlier cannot dominate.
fn log_scaled(value: f64, saturation: f64) -> f64 {
    if value <= 0.0 {
        return 0.0;
    }
    (100.0 * value.ln_1p() / saturation.ln_1p()).min(100.0)
}

fn round_one(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
