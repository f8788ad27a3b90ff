//! Value types consumed and produced by the matching core.
//!
//! Records coming from collaborators or request bodies deserialize through a raw shape and
//! `TryFrom`, so a malformed record fails as `InvalidInput` at the boundary instead of
//! halfway through a scoring run.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::matching::weights::ComponentScores;
use crate::matching::MatchError;

/// Category the job analyzer files a requirement under.
///
/// The plural aliases are what the analyzer prompt historically produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementCategory {
    #[serde(alias = "technical_skills")]
    TechnicalSkill,
    #[serde(alias = "soft_skills")]
    SoftSkill,
    Education,
    Experience,
    #[serde(alias = "certifications")]
    Certification,
}

/// Importance tier. Declaration order is priority order: `Required` sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    Required,
    Preferred,
    #[serde(alias = "nice-to-have")]
    NiceToHave,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawJobRequirement")]
pub struct JobRequirement {
    pub category: RequirementCategory,
    pub requirement: String,
    pub importance: Importance,
    pub years_experience: Option<u32>,
}

/// A requirement as it arrives on the wire, before validation.
#[derive(Debug, Deserialize)]
pub struct RawJobRequirement {
    pub category: RequirementCategory,
    pub requirement: String,
    pub importance: Importance,
    #[serde(default)]
    pub years_experience: Option<i64>,
}

impl TryFrom<RawJobRequirement> for JobRequirement {
    type Error = MatchError;

    fn try_from(raw: RawJobRequirement) -> Result<Self, Self::Error> {
        JobRequirement::new(
            raw.category,
            raw.requirement,
            raw.importance,
            raw.years_experience,
        )
    }
}

impl JobRequirement {
    pub fn new(
        category: RequirementCategory,
        requirement: impl Into<String>,
        importance: Importance,
        years_experience: Option<i64>,
    ) -> Result<Self, MatchError> {
        let years_experience = years_experience
            .map(|years| {
                u32::try_from(years).map_err(|_| {
                    MatchError::invalid(format!(
                        "years_experience must be a non-negative integer, got {years}"
                    ))
                })
            })
            .transpose()?;

        let requirement = Self {
            category,
            requirement: requirement.into(),
            importance,
            years_experience,
        };
        requirement.validate()?;
        Ok(requirement)
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        if self.requirement.trim().is_empty() {
            return Err(MatchError::invalid("requirement text cannot be empty"));
        }
        Ok(())
    }
}

/// A repository as seen by the scorer. Counts are non-negative by type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stars: u32,
    #[serde(default)]
    pub forks: u32,
    #[serde(default)]
    pub last_activity: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_fork: bool,
    #[serde(default)]
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCandidateProfile")]
pub struct CandidateProfile {
    pub username: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub blog: Option<String>,
    pub profile_url: Option<String>,
    /// Language name -> share of code (0.0–1.0). Small shares may have been dropped.
    pub languages: BTreeMap<String, f64>,
    pub technologies: BTreeSet<String>,
    pub repositories: Vec<Repository>,
    pub account_age_days: u32,
    pub followers: u32,
    pub hireable: bool,
    /// Contributions to repositories the candidate does not own, when the source knows it.
    pub external_contributions: Option<u32>,
}

#[derive(Deserialize)]
struct RawCandidateProfile {
    username: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    bio: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    blog: Option<String>,
    #[serde(default)]
    profile_url: Option<String>,
    #[serde(default)]
    languages: BTreeMap<String, f64>,
    #[serde(default)]
    technologies: BTreeSet<String>,
    #[serde(default)]
    repositories: Vec<Repository>,
    #[serde(default)]
    account_age_days: u32,
    #[serde(default)]
    followers: u32,
    #[serde(default)]
    hireable: Option<bool>,
    #[serde(default)]
    external_contributions: Option<u32>,
}

impl TryFrom<RawCandidateProfile> for CandidateProfile {
    type Error = MatchError;

    fn try_from(raw: RawCandidateProfile) -> Result<Self, Self::Error> {
        let profile = Self {
            username: raw.username,
            name: raw.name,
            bio: raw.bio,
            company: raw.company,
            location: raw.location,
            blog: raw.blog,
            profile_url: raw.profile_url,
            languages: raw.languages,
            technologies: raw.technologies,
            repositories: raw.repositories,
            account_age_days: raw.account_age_days,
            followers: raw.followers,
            hireable: raw.hireable.unwrap_or(false),
            external_contributions: raw.external_contributions,
        };
        profile.validate()?;
        Ok(profile)
    }
}

impl CandidateProfile {
    /// An otherwise empty profile for `username`.
    pub fn new(username: impl Into<String>) -> Result<Self, MatchError> {
        let profile = Self {
            username: username.into(),
            name: None,
            bio: None,
            company: None,
            location: None,
            blog: None,
            profile_url: None,
            languages: BTreeMap::new(),
            technologies: BTreeSet::new(),
            repositories: Vec::new(),
            account_age_days: 0,
            followers: 0,
            hireable: false,
            external_contributions: None,
        };
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        if self.username.trim().is_empty() {
            return Err(MatchError::invalid("username cannot be empty"));
        }
        for (language, share) in &self.languages {
            if language.trim().is_empty() {
                return Err(MatchError::invalid(format!(
                    "candidate '{}' has an unnamed language entry",
                    self.username
                )));
            }
            if !share.is_finite() || !(0.0..=1.0).contains(share) {
                return Err(MatchError::invalid(format!(
                    "language share for '{language}' must be within 0.0–1.0, got {share}"
                )));
            }
        }
        Ok(())
    }
}

/// Result of scoring one candidate against one job. Built once by the scorer; read-only
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    username: String,
    technical_score: f64,
    experience_score: f64,
    activity_score: f64,
    education_score: f64,
    soft_skills_score: f64,
    overall_score: f64,
    matched_skills: BTreeSet<String>,
    missing_skills: BTreeSet<String>,
    bonus_skills: BTreeSet<String>,
    scored_at: DateTime<Utc>,
}

impl ScoreBreakdown {
    pub fn new(
        username: String,
        components: ComponentScores,
        overall_score: f64,
        matched_skills: BTreeSet<String>,
        missing_skills: BTreeSet<String>,
        bonus_skills: BTreeSet<String>,
        scored_at: DateTime<Utc>,
    ) -> Self {
        Self {
            username,
            technical_score: components.technical,
            experience_score: components.experience,
            activity_score: components.activity,
            education_score: components.education,
            soft_skills_score: components.soft_skills,
            overall_score,
            matched_skills,
            missing_skills,
            bonus_skills,
            scored_at,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn technical_score(&self) -> f64 {
        self.technical_score
    }

    pub fn experience_score(&self) -> f64 {
        self.experience_score
    }

    pub fn activity_score(&self) -> f64 {
        self.activity_score
    }

    pub fn education_score(&self) -> f64 {
        self.education_score
    }

    pub fn soft_skills_score(&self) -> f64 {
        self.soft_skills_score
    }

    pub fn overall_score(&self) -> f64 {
        self.overall_score
    }

    pub fn matched_skills(&self) -> &BTreeSet<String> {
        &self.matched_skills
    }

    pub fn missing_skills(&self) -> &BTreeSet<String> {
        &self.missing_skills
    }

    pub fn bonus_skills(&self) -> &BTreeSet<String> {
        &self.bonus_skills
    }

    pub fn scored_at(&self) -> DateTime<Utc> {
        self.scored_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirement_accepts_plural_category_alias() {
        let json = r#"{
            "category": "technical_skills",
            "requirement": "Python",
            "importance": "required",
            "years_experience": null
        }"#;
        let req: JobRequirement = serde_json::from_str(json).unwrap();
        assert_eq!(req.category, RequirementCategory::TechnicalSkill);
        assert_eq!(req.importance, Importance::Required);
        assert_eq!(req.years_experience, None);
    }

    #[test]
    fn test_requirement_rejects_negative_years() {
        let json = r#"{
            "category": "experience",
            "requirement": "Backend development",
            "importance": "required",
            "years_experience": -2
        }"#;
        let err = serde_json::from_str::<JobRequirement>(json).unwrap_err();
        assert!(err.to_string().contains("non-negative"), "got: {err}");
    }

    #[test]
    fn test_requirement_rejects_blank_text() {
        let result = JobRequirement::new(
            RequirementCategory::TechnicalSkill,
            "   ",
            Importance::Preferred,
            None,
        );
        assert!(matches!(result, Err(MatchError::InvalidInput(_))));
    }

    #[test]
    fn test_importance_orders_required_first() {
        assert!(Importance::Required < Importance::Preferred);
        assert!(Importance::Preferred < Importance::NiceToHave);
    }

    #[test]
    fn test_profile_defaults_optional_fields() {
        let profile: CandidateProfile = serde_json::from_str(r#"{"username": "octocat"}"#).unwrap();
        assert_eq!(profile.username, "octocat");
        assert!(profile.repositories.is_empty());
        assert!(!profile.hireable);
        assert_eq!(profile.account_age_days, 0);
    }

    #[test]
    fn test_profile_rejects_malformed_share() {
        let json = r#"{"username": "octocat", "languages": {"Rust": 1.5}}"#;
        let err = serde_json::from_str::<CandidateProfile>(json).unwrap_err();
        assert!(err.to_string().contains("0.0–1.0"), "got: {err}");
    }

    #[test]
    fn test_profile_rejects_negative_followers() {
        let json = r#"{"username": "octocat", "followers": -1}"#;
        assert!(serde_json::from_str::<CandidateProfile>(json).is_err());
    }

    #[test]
    fn test_profile_rejects_empty_username() {
        assert!(CandidateProfile::new(" ").is_err());
    }
}
