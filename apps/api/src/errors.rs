use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::ProviderError;
use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Variants that reach the user carry their already-localized message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    ResumeNotFound(String),

    #[error("{0}")]
    JobNotFound(String),

    /// The resume exists but has no processed record yet.
    #[error("{0}")]
    ResumeParsingFailed(String),

    #[error("{0}")]
    JobParsingFailed(String),

    #[error("{0}")]
    ResumeKeywordExtractionFailed(String),

    #[error("{0}")]
    JobKeywordExtractionFailed(String),

    /// Structured resume extraction did not validate.
    #[error("{0}")]
    ResumeValidation(String),

    #[error("{0}")]
    InvalidToken(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ResumeNotFound(_) | AppError::JobNotFound(_) => StatusCode::NOT_FOUND,
            AppError::ResumeParsingFailed(_) | AppError::JobParsingFailed(_) => {
                StatusCode::CONFLICT
            }
            AppError::ResumeKeywordExtractionFailed(_)
            | AppError::JobKeywordExtractionFailed(_)
            | AppError::ResumeValidation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Provider(_) => StatusCode::BAD_GATEWAY,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ResumeNotFound(_) => "RESUME_NOT_FOUND",
            AppError::JobNotFound(_) => "JOB_NOT_FOUND",
            AppError::ResumeParsingFailed(_) => "RESUME_PARSING_FAILED",
            AppError::JobParsingFailed(_) => "JOB_PARSING_FAILED",
            AppError::ResumeKeywordExtractionFailed(_) => "RESUME_KEYWORDS_MISSING",
            AppError::JobKeywordExtractionFailed(_) => "JOB_KEYWORDS_MISSING",
            AppError::ResumeValidation(_) => "RESUME_VALIDATION_FAILED",
            AppError::InvalidToken(_) => "INVALID_TOKEN",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Provider(_) => "PROVIDER_ERROR",
            AppError::Store(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Text shown to the caller. Provider, store and internal details stay
    /// in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Provider(_) => "The language model provider failed to respond".to_string(),
            AppError::Store(_) => "A database error occurred".to_string(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Provider(e) => tracing::error!("Provider error: {e}"),
            AppError::Store(e) => tracing::error!("Store error: {e}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
            _ => {}
        }

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.public_message()
            }
        }));

        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::ResumeNotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::JobParsingFailed("x".into()), StatusCode::CONFLICT),
            (
                AppError::JobKeywordExtractionFailed("x".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::ResumeValidation("x".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (AppError::InvalidToken("x".into()), StatusCode::UNAUTHORIZED),
            (
                AppError::Provider(ProviderError::EmptyContent),
                StatusCode::BAD_GATEWAY,
            ),
            (
                AppError::Internal(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.status(), status, "{err:?}");
        }
    }

    #[test]
    fn test_internal_details_are_not_public() {
        let err = AppError::Internal(anyhow::anyhow!("connection string leaked"));
        assert_eq!(err.public_message(), "An internal server error occurred");
    }

    #[test]
    fn test_user_facing_message_is_the_localized_text() {
        let err = AppError::JobNotFound("Job with ID 42 was not found.".into());
        assert_eq!(err.to_string(), "Job with ID 42 was not found.");
    }
}
