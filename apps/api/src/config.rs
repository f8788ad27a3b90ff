use anyhow::{Context, Result};

use crate::sourcing::github::DEFAULT_API_URL;

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or a numeric one does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    /// Unauthenticated GitHub access works, at a much lower rate limit.
    pub github_token: Option<String>,
    pub github_api_url: String,
    /// Repositories inspected per candidate.
    pub github_max_repos: usize,
    /// Candidates analysed per match run when the request does not say.
    pub default_top: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            github_token: optional_env("GITHUB_TOKEN"),
            github_api_url: optional_env("GITHUB_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            github_max_repos: parse_env("GITHUB_MAX_REPOS", 30)?,
            default_top: parse_env("DEFAULT_TOP", 10)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank are the same thing.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_default_when_unset() {
        let value: usize = parse_env("TALENTSONAR_TEST_UNSET_VARIABLE", 30).unwrap();
        assert_eq!(value, 30);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("TALENTSONAR_TEST_BAD_PORT", "eighty");
        let result: Result<u16> = parse_env("TALENTSONAR_TEST_BAD_PORT", 8080);
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_optional_is_none() {
        std::env::set_var("TALENTSONAR_TEST_BLANK", "   ");
        assert_eq!(optional_env("TALENTSONAR_TEST_BLANK"), None);
    }
}
