use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde_json::json;
use thiserror::Error;

use crate::matching::MatchError;
use crate::sourcing::github::GitHubError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error("GitHub rate limit exceeded, resets at {reset_at}")]
    RateLimited { reset_at: DateTime<Utc> },

    #[error("GitHub error: {0}")]
    GitHub(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<GitHubError> for AppError {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::NotFound(what) => AppError::NotFound(format!("GitHub {what}")),
            GitHubError::RateLimited { reset_at } => AppError::RateLimited { reset_at },
            GitHubError::InvalidProfile(e) => AppError::Match(e),
            other => AppError::GitHub(other.to_string()),
        }
    }
}

/// Body-shape failures become `Validation`; well-formed JSON whose records fail their own
/// checks (bad share, negative years) becomes `InvalidInput`.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => {
                AppError::Match(MatchError::InvalidInput(e.body_text()))
            }
            other => AppError::Validation(other.body_text()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Match(MatchError::InvalidInput(msg)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_INPUT",
                msg.clone(),
            ),
            AppError::Match(e @ MatchError::SynonymCollision { .. }) => {
                tracing::error!("Synonym table error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
            AppError::RateLimited { reset_at } => (
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMITED",
                format!(
                    "GitHub rate limit exceeded. Please retry after {}",
                    reset_at.format("%Y-%m-%d %H:%M:%S UTC")
                ),
            ),
            AppError::GitHub(msg) => {
                tracing::error!("GitHub error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "GITHUB_ERROR",
                    "The GitHub API request failed".to_string(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::NotFound("job".into()), StatusCode::NOT_FOUND),
            (AppError::Validation("empty".into()), StatusCode::BAD_REQUEST),
            (
                AppError::Match(MatchError::InvalidInput("bad".into())),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::RateLimited {
                    reset_at: Utc::now(),
                },
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (AppError::GitHub("boom".into()), StatusCode::BAD_GATEWAY),
            (AppError::Llm("boom".into()), StatusCode::BAD_GATEWAY),
            (
                AppError::Internal(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_github_errors_convert() {
        let reset_at = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        assert!(matches!(
            AppError::from(GitHubError::RateLimited { reset_at }),
            AppError::RateLimited { .. }
        ));
        assert!(matches!(
            AppError::from(GitHubError::NotFound("/users/ghost".into())),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from(GitHubError::InvalidProfile(MatchError::InvalidInput("x".into()))),
            AppError::Match(_)
        ));
        assert!(matches!(
            AppError::from(GitHubError::Api {
                status: 500,
                message: "oops".into()
            }),
            AppError::GitHub(_)
        ));
    }
}
