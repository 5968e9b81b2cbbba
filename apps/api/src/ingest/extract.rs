//! LLM-backed structured extraction for resumes and jobs.
//!
//! A resume that fails validation is fatal for its upload. A job that fails
//! is stored without a processed record, which later surfaces as
//! `JobParsingFailed` when scoring.

use tracing::{debug, error, warn};

use super::prompts::{STRUCTURED_JOB_PROMPT_TEMPLATE, STRUCTURED_RESUME_PROMPT_TEMPLATE};
use crate::errors::AppError;
use crate::extraction::{schema_of, validate_as, SchemaKind, StructuredJob, StructuredResume};
use crate::i18n::{messages, Locale};
use crate::llm_client::{LlmProvider, ProviderError};

pub async fn extract_structured_resume(
    llm: &dyn LlmProvider,
    model: &str,
    resume_text: &str,
    locale: Locale,
) -> Result<StructuredResume, AppError> {
    let prompt = STRUCTURED_RESUME_PROMPT_TEMPLATE.replace("{resume}", resume_text);
    debug!(prompt_len = prompt.len(), "requesting structured resume");

    let raw = llm
        .generate_structured(&prompt, model, &schema_of::<StructuredResume>())
        .await?;

    validate_as::<StructuredResume>(&raw, SchemaKind::Resume).map_err(|e| {
        error!(error = %e, "structured resume failed validation");
        AppError::ResumeValidation(messages::resume_validation_failed(locale, &e.details()))
    })
}

/// `Ok(None)` when the model's answer is unusable; transport and API
/// failures still propagate.
pub async fn extract_structured_job(
    llm: &dyn LlmProvider,
    model: &str,
    job_text: &str,
) -> Result<Option<StructuredJob>, AppError> {
    let prompt = STRUCTURED_JOB_PROMPT_TEMPLATE.replace("{job}", job_text);

    let raw = match llm
        .generate_structured(&prompt, model, &schema_of::<StructuredJob>())
        .await
    {
        Ok(raw) => raw,
        Err(e @ (ProviderError::Parse(_) | ProviderError::EmptyContent)) => {
            warn!(error = %e, "structured job output was not JSON");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    match validate_as::<StructuredJob>(&raw, SchemaKind::Job) {
        Ok(job) => Ok(Some(job)),
        Err(e) => {
            warn!(error = %e, "structured job failed validation");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::improvement::tests::ScriptedLlm;

    #[tokio::test]
    async fn test_invalid_resume_is_fatal_with_localized_details() {
        let llm = ScriptedLlm::new(vec![Ok(r#"{"Personal Data": {}}"#.into())]);

        let err = extract_structured_resume(&llm, "m", "resume", Locale::EnUs)
            .await
            .unwrap_err();

        match err {
            AppError::ResumeValidation(message) => {
                assert!(message.starts_with("Resume validation failed: "));
                assert!(message.contains("Personal Data -> firstName: field required"));
                assert!(message.contains("Experiences: field required"));
            }
            other => panic!("expected ResumeValidation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resume_prompt_embeds_text_and_schema() {
        let llm = ScriptedLlm::new(vec![Ok("{}".into())]);
        let _ = extract_structured_resume(&llm, "m", "Ada Lovelace, engineer", Locale::EnUs).await;

        let prompt = llm.prompts.lock().unwrap()[0].clone();
        assert!(prompt.contains("Ada Lovelace, engineer"));
        assert!(prompt.contains("Personal Data"));
    }

    #[tokio::test]
    async fn test_invalid_job_is_absorbed() {
        let llm = ScriptedLlm::new(vec![Ok(r#"{"companyProfile": "Acme"}"#.into())]);
        let job = extract_structured_job(&llm, "m", "job").await.unwrap();
        assert!(job.is_none());
    }

    #[tokio::test]
    async fn test_prose_job_answer_is_absorbed() {
        let llm = ScriptedLlm::new(vec![Ok("I could not parse that.".into())]);
        assert!(extract_structured_job(&llm, "m", "job").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_job_provider_failure_propagates() {
        let llm = ScriptedLlm::new(vec![Err(ProviderError::RateLimited { retries: 3 })]);
        let err = extract_structured_job(&llm, "m", "job").await.unwrap_err();
        assert!(matches!(err, AppError::Provider(_)));
    }

    #[tokio::test]
    async fn test_valid_job_is_returned() {
        let llm = ScriptedLlm::new(vec![Ok(
            r#"{"jobTitle": "Rust Engineer", "extractedKeywords": ["Rust"]}"#.into(),
        )]);
        let job = extract_structured_job(&llm, "m", "job").await.unwrap().unwrap();
        assert_eq!(job.job_title.as_deref(), Some("Rust Engineer"));
    }
}
