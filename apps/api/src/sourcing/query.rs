use crate::jobs::analyzer::JobAnalysis;
use crate::matching::normalizer::{normalize_in, Namespace};

/// Only the first few required skills become language filters; GitHub ANDs qualifiers, so
/// more would starve the search.
pub const MAX_LANGUAGE_QUALIFIERS: usize = 3;

/// Baseline filter that keeps throwaway accounts out of results.
pub const BASELINE_QUALIFIERS: &str = "followers:>=10 repos:>=5";

/// Canonical language token → GitHub `language:` qualifier value.
const GITHUB_LANGUAGES: &[(&str, &str)] = &[
    ("python", "python"),
    ("javascript", "javascript"),
    ("typescript", "typescript"),
    ("java", "java"),
    ("go", "go"),
    ("rust", "rust"),
    ("ruby", "ruby"),
    ("php", "php"),
    ("c++", "cpp"),
    ("c#", "csharp"),
    ("kotlin", "kotlin"),
    ("swift", "swift"),
];

/// GitHub user-search query for candidates matching a job.
///
/// Frameworks are folded onto their language first, so "Django" searches `language:python`.
pub fn build_search_query(analysis: &JobAnalysis) -> String {
    let mut parts: Vec<String> = Vec::new();

    for skill in analysis.required_skills().take(MAX_LANGUAGE_QUALIFIERS) {
        let language = normalize_in(Namespace::Language, skill);
        let Some(&(_, github)) = GITHUB_LANGUAGES.iter().find(|(name, _)| *name == language)
        else {
            continue;
        };
        let qualifier = format!("language:{github}");
        if !parts.contains(&qualifier) {
            parts.push(qualifier);
        }
    }

    if let Some(location) = analysis.location.as_deref() {
        let city: String = location
            .split(',')
            .next()
            .unwrap_or_default()
            .split_whitespace()
            .collect();
        if !city.is_empty() {
            parts.push(format!("location:{city}"));
        }
    }

    parts.push(BASELINE_QUALIFIERS.to_string());
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn analysis(skills: &[(&str, &str)], location: Option<&str>) -> JobAnalysis {
        let requirements: Vec<_> = skills
            .iter()
            .map(|(text, importance)| {
                json!({
                    "category": "technical_skill",
                    "requirement": text,
                    "importance": importance,
                })
            })
            .collect();
        serde_json::from_value(json!({
            "job_title": "Engineer",
            "location": location,
            "requirements": requirements,
        }))
        .unwrap()
    }

    #[test]
    fn test_languages_and_location() {
        let a = analysis(
            &[("Python", "required"), ("C++", "required")],
            Some("San Francisco, CA"),
        );
        assert_eq!(
            build_search_query(&a),
            "language:python language:cpp location:SanFrancisco followers:>=10 repos:>=5"
        );
    }

    #[test]
    fn test_frameworks_fold_to_language_and_dedupe() {
        let a = analysis(&[("Django", "required"), ("Flask", "required")], None);
        assert_eq!(
            build_search_query(&a),
            "language:python followers:>=10 repos:>=5"
        );
    }

    #[test]
    fn test_only_first_three_required_skills_considered() {
        let a = analysis(
            &[
                ("Docker", "required"),
                ("Go", "preferred"),
                ("Kubernetes", "required"),
                ("Terraform", "required"),
                ("Rust", "required"),
            ],
            None,
        );
        // Rust is the fourth required skill; Go is only preferred.
        assert_eq!(build_search_query(&a), BASELINE_QUALIFIERS);
    }

    #[test]
    fn test_csharp_and_blank_location() {
        let a = analysis(&[(".NET", "required")], Some("  , Remote"));
        assert_eq!(
            build_search_query(&a),
            "language:csharp followers:>=10 repos:>=5"
        );
    }
}
