//! Job analyzer: turns a raw job description into structured requirements.
//!
//! Default backend: `LlmJobAnalyzer`. `AppState` holds an `Arc<dyn JobAnalyzer>` so tests and
//! alternative backends plug in without touching handlers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::jobs::prompts::{build_job_analysis_prompt, job_analysis_system};
use crate::llm_client::LlmClient;
use crate::matching::models::{
    Importance, JobRequirement, RawJobRequirement, RequirementCategory,
};
use crate::matching::MatchError;

/// Structured view of one job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobAnalysis {
    pub job_title: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub salary_range: Option<String>,
    #[serde(default)]
    pub remote_work_option: Option<bool>,
    #[serde(default)]
    pub confidence_score: Option<f64>,
    #[serde(default)]
    pub requirements: Vec<JobRequirement>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub company_culture: Vec<String>,
}

impl JobAnalysis {
    pub fn requirements_in(
        &self,
        category: RequirementCategory,
    ) -> impl Iterator<Item = &JobRequirement> {
        self.requirements
            .iter()
            .filter(move |r| r.category == category)
    }

    /// Required technical skills, in the order the description lists them.
    pub fn required_skills(&self) -> impl Iterator<Item = &str> {
        self.requirements_in(RequirementCategory::TechnicalSkill)
            .filter(|r| r.importance == Importance::Required)
            .map(|r| r.requirement.as_str())
    }
}

/// The grouped shape the model is asked to produce. Flattened into `JobAnalysis`.
#[derive(Debug, Deserialize)]
struct LlmJobAnalysis {
    job_title: String,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    employment_type: Option<String>,
    #[serde(default)]
    salary_range: Option<String>,
    #[serde(default)]
    remote_work_option: Option<bool>,
    #[serde(default)]
    confidence_score: Option<f64>,
    #[serde(default)]
    technical_skills: Vec<RawJobRequirement>,
    #[serde(default)]
    soft_skills: Vec<RawJobRequirement>,
    #[serde(default)]
    education: Vec<RawJobRequirement>,
    #[serde(default)]
    experience: Vec<RawJobRequirement>,
    #[serde(default)]
    certifications: Vec<RawJobRequirement>,
    #[serde(default)]
    responsibilities: Vec<String>,
    #[serde(default)]
    benefits: Vec<String>,
    #[serde(default)]
    company_culture: Vec<String>,
}

impl TryFrom<LlmJobAnalysis> for JobAnalysis {
    type Error = MatchError;

    fn try_from(raw: LlmJobAnalysis) -> Result<Self, Self::Error> {
        let requirements = raw
            .technical_skills
            .into_iter()
            .chain(raw.soft_skills)
            .chain(raw.education)
            .chain(raw.experience)
            .chain(raw.certifications)
            .map(JobRequirement::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            job_title: raw.job_title.trim().to_string(),
            company: non_blank(raw.company),
            location: non_blank(raw.location),
            employment_type: non_blank(raw.employment_type),
            salary_range: non_blank(raw.salary_range),
            remote_work_option: raw.remote_work_option,
            confidence_score: raw
                .confidence_score
                .filter(|c| c.is_finite())
                .map(|c| c.clamp(0.0, 1.0)),
            requirements,
            responsibilities: raw.responsibilities,
            benefits: raw.benefits,
            company_culture: raw.company_culture,
        })
    }
}

/// Turns the model's JSON into a `JobAnalysis`.
///
/// Output that does not fit the expected shape is an upstream failure (`Llm`). Output that
/// fits but carries an invalid requirement (blank text, negative years) is `InvalidInput`.
pub fn analysis_from_model_output(output: Value) -> Result<JobAnalysis, AppError> {
    let raw: LlmJobAnalysis = serde_json::from_value(output)
        .map_err(|e| AppError::Llm(format!("Job analysis has an unexpected shape: {e}")))?;
    Ok(JobAnalysis::try_from(raw)?)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("null"))
}

#[async_trait]
pub trait JobAnalyzer: Send + Sync {
    async fn analyze(&self, description: &str) -> Result<JobAnalysis, AppError>;
}

pub struct LlmJobAnalyzer {
    llm: LlmClient,
}

impl LlmJobAnalyzer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl JobAnalyzer for LlmJobAnalyzer {
    async fn analyze(&self, description: &str) -> Result<JobAnalysis, AppError> {
        let prompt = build_job_analysis_prompt(description);
        let output: Value = self
            .llm
            .call_json(&prompt, &job_analysis_system())
            .await
            .map_err(|e| AppError::Llm(format!("Job analysis failed: {e}")))?;

        let analysis = analysis_from_model_output(output)?;
        info!(
            job_title = %analysis.job_title,
            requirements = analysis.requirements.len(),
            "Job description analyzed"
        );
        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<JobAnalysis, AppError> {
        analysis_from_model_output(serde_json::from_str(json).unwrap())
    }

    const GROUPED: &str = r#"{
        "job_title": "  Senior Backend Engineer ",
        "company": "Acme",
        "location": "Berlin, Germany",
        "employment_type": "null",
        "salary_range": null,
        "technical_skills": [
            {"category": "technical_skills", "requirement": "Python", "importance": "required", "years_experience": 3},
            {"category": "technical_skills", "requirement": "Docker", "importance": "preferred", "years_experience": null}
        ],
        "soft_skills": [
            {"category": "soft_skills", "requirement": "Communication", "importance": "required", "years_experience": null}
        ],
        "experience": [
            {"category": "experience", "requirement": "Backend services", "importance": "required", "years_experience": 5}
        ],
        "certifications": [],
        "responsibilities": ["Own the payments API"],
        "remote_work_option": true,
        "benefits": [],
        "confidence_score": 1.4
    }"#;

    #[test]
    fn test_grouped_output_is_flattened() {
        let analysis = parse(GROUPED).unwrap();

        assert_eq!(analysis.job_title, "Senior Backend Engineer");
        assert_eq!(analysis.requirements.len(), 4);
        assert_eq!(analysis.employment_type, None);
        assert_eq!(analysis.confidence_score, Some(1.0));
        assert_eq!(
            analysis
                .requirements_in(RequirementCategory::Experience)
                .next()
                .and_then(|r| r.years_experience),
            Some(5)
        );
    }

    #[test]
    fn test_required_skills_keeps_listing_order() {
        let analysis = parse(GROUPED).unwrap();
        assert_eq!(analysis.required_skills().collect::<Vec<_>>(), vec!["Python"]);
    }

    #[test]
    fn test_negative_years_from_model_is_invalid_input() {
        let err = parse(
            r#"{
            "job_title": "Engineer",
            "experience": [
                {"category": "experience", "requirement": "Ops", "importance": "required", "years_experience": -1}
            ]
        }"#,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Match(MatchError::InvalidInput(_))));
    }

    #[test]
    fn test_blank_requirement_from_model_is_invalid_input() {
        let err = parse(
            r#"{
            "job_title": "Engineer",
            "technical_skills": [
                {"category": "technical_skills", "requirement": "  ", "importance": "required"}
            ]
        }"#,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Match(MatchError::InvalidInput(_))));
    }

    #[test]
    fn test_misshapen_model_output_is_llm_error() {
        let err = parse(r#"{"technical_skills": "Python"}"#).unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
    }

    #[test]
    fn test_flat_analysis_round_trips_through_api_shape() {
        let analysis = parse(GROUPED).unwrap();
        let json = serde_json::to_string(&analysis).unwrap();
        let back: JobAnalysis = serde_json::from_str(&json).unwrap();
        assert_eq!(back, analysis);
    }
}
