// LLM prompt constants for job-description analysis.
// The JSON-only fragment is shared with other callers via llm_client::prompts.

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

/// Role framing prepended to the shared JSON-only instruction.
const ANALYZER_ROLE: &str = "You are an expert HR analyst and technical recruiter. \
    Read a job description and extract structured hiring requirements.";

pub fn job_analysis_system() -> String {
    format!("{ANALYZER_ROLE} {JSON_ONLY_SYSTEM}")
}

/// Job analysis prompt template. Replace `{job_description}` before sending.
pub const JOB_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze the following job description and extract structured information.

Return a JSON object with this EXACT schema (no extra fields):
{
  "job_title": "Senior Backend Engineer",
  "company": "Acme Corp or null",
  "location": "Berlin, Germany or null",
  "employment_type": "full-time | part-time | contract | internship or null",
  "salary_range": "string or null",
  "technical_skills": [
    {"category": "technical_skill", "requirement": "Python", "importance": "required", "years_experience": 3}
  ],
  "soft_skills": [
    {"category": "soft_skill", "requirement": "Clear written communication", "importance": "preferred", "years_experience": null}
  ],
  "education": [
    {"category": "education", "requirement": "BSc in Computer Science or equivalent", "importance": "preferred", "years_experience": null}
  ],
  "experience": [
    {"category": "experience", "requirement": "Backend development", "importance": "required", "years_experience": 5}
  ],
  "certifications": [
    {"category": "certification", "requirement": "AWS Solutions Architect", "importance": "nice_to_have", "years_experience": null}
  ],
  "responsibilities": ["Design and operate the payments API"],
  "remote_work_option": true,
  "benefits": ["Learning budget"],
  "company_culture": ["Small autonomous teams"],
  "confidence_score": 0.85
}

Rules:
- importance is exactly one of "required", "preferred", "nice_to_have".
  "must have", "required", "you will need" → required.
  "preferred", "ideally", "strong plus" → preferred.
  "bonus", "nice to have", "a plus" → nice_to_have.
- One technology per technical_skills entry. Split "Python/Django" into two entries.
  Use the common name of the technology ("PostgreSQL", not "Postgres database experience").
- years_experience is a non-negative integer when the text states one, else null.
- Leave a list empty rather than inventing entries the description does not support.
- confidence_score reflects how complete and unambiguous the description is (0.0–1.0).

Job description:
{job_description}"#;

pub fn build_job_analysis_prompt(job_description: &str) -> String {
    JOB_ANALYSIS_PROMPT_TEMPLATE.replace("{job_description}", job_description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_description() {
        let prompt = build_job_analysis_prompt("We need a Rust engineer.");
        assert!(prompt.ends_with("We need a Rust engineer."));
        assert!(!prompt.contains("{job_description}"));
    }

    #[test]
    fn test_system_prompt_demands_json() {
        let system = job_analysis_system();
        assert!(system.starts_with("You are an expert HR analyst"));
        assert!(system.contains("valid JSON only"));
    }
}
