//! Builds a `CandidateProfile` from raw GitHub payloads. Pure: no I/O, `now` is passed in.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

use crate::matching::models::{CandidateProfile, Repository};
use crate::matching::normalizer::{contains_term, word_haystack};
use crate::matching::MatchError;
use crate::sourcing::github::{GitHubRepo, GitHubUser};

/// Languages below this share of total bytes are treated as noise and dropped.
pub const MIN_LANGUAGE_SHARE: f64 = 0.01;

/// Technology keywords recognised in repository descriptions.
const DESCRIPTION_KEYWORDS: &[&str] = &[
    "react",
    "vue",
    "angular",
    "node",
    "django",
    "flask",
    "fastapi",
    "docker",
    "kubernetes",
    "aws",
    "azure",
    "gcp",
    "tensorflow",
    "pytorch",
    "machine learning",
    "blockchain",
];

/// One repository plus its language byte counts (empty for forks).
#[derive(Debug, Clone)]
pub struct RepoSnapshot {
    pub repo: GitHubRepo,
    pub languages: BTreeMap<String, u64>,
}

pub fn build_profile(
    user: &GitHubUser,
    snapshots: &[RepoSnapshot],
    now: DateTime<Utc>,
) -> Result<CandidateProfile, MatchError> {
    let mut profile = CandidateProfile::new(user.login.clone())?;

    profile.name = user.name.clone();
    profile.bio = user.bio.clone();
    profile.company = user.company.clone();
    profile.location = user.location.clone();
    profile.blog = user.blog.clone().filter(|b| !b.trim().is_empty());
    profile.profile_url = user.html_url.clone();
    profile.followers = user.followers;
    profile.hireable = user.hireable.unwrap_or(false);
    profile.account_age_days = u32::try_from((now - user.created_at).num_days().max(0))
        .unwrap_or(u32::MAX);

    profile.languages = language_shares(snapshots);
    profile.technologies = technologies(snapshots);
    profile.repositories = snapshots
        .iter()
        .map(|snapshot| {
            let repo = &snapshot.repo;
            Repository {
                name: repo.name.clone(),
                description: repo.description.clone(),
                stars: repo.stargazers_count,
                forks: repo.forks_count,
                last_activity: repo.pushed_at,
                is_fork: repo.fork,
                topics: repo.topics.clone(),
            }
        })
        .collect();

    profile.validate()?;
    Ok(profile)
}

/// Share of code per language over the candidate's own repositories.
fn language_shares(snapshots: &[RepoSnapshot]) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<&str, u64> = BTreeMap::new();
    for snapshot in snapshots.iter().filter(|s| !s.repo.fork) {
        for (language, bytes) in &snapshot.languages {
            *totals.entry(language.as_str()).or_default() += bytes;
        }
    }

    let total: u64 = totals.values().sum();
    if total == 0 {
        return BTreeMap::new();
    }

    totals
        .into_iter()
        .map(|(language, bytes)| (language.to_string(), bytes as f64 / total as f64))
        .filter(|(_, share)| *share >= MIN_LANGUAGE_SHARE)
        .collect()
}

/// Topics from every repository plus known keywords in their descriptions.
fn technologies(snapshots: &[RepoSnapshot]) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    for snapshot in snapshots {
        found.extend(
            snapshot
                .repo
                .topics
                .iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty()),
        );

        if let Some(description) = &snapshot.repo.description {
            let haystack = word_haystack(description);
            found.extend(
                DESCRIPTION_KEYWORDS
                    .iter()
                    .filter(|keyword| contains_term(&haystack, keyword))
                    .map(|keyword| keyword.to_string()),
            );
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn user(login: &str) -> GitHubUser {
        GitHubUser {
            login: login.to_string(),
            name: Some("Ada".to_string()),
            bio: Some("Systems programmer".to_string()),
            company: None,
            location: Some("London".to_string()),
            blog: Some("".to_string()),
            html_url: Some(format!("https://github.com/{login}")),
            followers: 120,
            public_repos: 3,
            hireable: Some(true),
            created_at: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn snapshot(name: &str, fork: bool, languages: &[(&str, u64)]) -> RepoSnapshot {
        RepoSnapshot {
            repo: GitHubRepo {
                name: name.to_string(),
                full_name: format!("ada/{name}"),
                description: None,
                stargazers_count: 10,
                forks_count: 2,
                pushed_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()),
                fork,
                topics: vec![],
            },
            languages: languages
                .iter()
                .map(|(l, b)| (l.to_string(), *b))
                .collect(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_language_shares_skip_forks_and_noise() {
        let snapshots = vec![
            snapshot("engine", false, &[("Rust", 9_000), ("Shell", 50)]),
            snapshot("site", false, &[("TypeScript", 950)]),
            snapshot("forked", true, &[("Go", 1_000_000)]),
        ];
        let profile = build_profile(&user("ada"), &snapshots, now()).unwrap();

        assert!(!profile.languages.contains_key("Go"));
        assert!(!profile.languages.contains_key("Shell"));
        assert!((profile.languages["Rust"] - 0.9).abs() < 1e-9);
        assert!((profile.languages["TypeScript"] - 0.095).abs() < 1e-9);
    }

    #[test]
    fn test_no_code_means_no_languages() {
        let profile = build_profile(&user("ada"), &[snapshot("empty", false, &[])], now()).unwrap();
        assert!(profile.languages.is_empty());
    }

    #[test]
    fn test_technologies_from_topics_and_descriptions() {
        let mut tagged = snapshot("infra", false, &[]);
        tagged.repo.topics = vec!["Terraform".to_string(), "k8s".to_string()];
        let mut described = snapshot("ml", false, &[]);
        described.repo.description =
            Some("Machine learning pipelines on AWS with PyTorch and Docker".to_string());
        let mut noisy = snapshot("blog", false, &[]);
        noisy.repo.description = Some("Notes about nodemon and reactivity".to_string());

        let profile = build_profile(&user("ada"), &[tagged, described, noisy], now()).unwrap();
        let expected: BTreeSet<String> = [
            "aws",
            "docker",
            "k8s",
            "machine learning",
            "pytorch",
            "terraform",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        assert_eq!(profile.technologies, expected);
    }

    #[test]
    fn test_profile_fields_carried_over() {
        let profile = build_profile(&user("ada"), &[snapshot("a", true, &[])], now()).unwrap();

        assert_eq!(profile.username, "ada");
        assert_eq!(profile.account_age_days, 366);
        assert_eq!(profile.followers, 120);
        assert!(profile.hireable);
        assert_eq!(profile.blog, None);
        assert_eq!(profile.repositories.len(), 1);
        assert!(profile.repositories[0].is_fork);
        assert_eq!(profile.repositories[0].stars, 10);
    }

    #[test]
    fn test_creation_date_in_future_clamps_age_to_zero() {
        let mut future = user("ada");
        future.created_at = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let profile = build_profile(&future, &[], now()).unwrap();
        assert_eq!(profile.account_age_days, 0);
    }

    #[test]
    fn test_empty_login_is_invalid() {
        assert!(build_profile(&user(""), &[], now()).is_err());
    }
}
