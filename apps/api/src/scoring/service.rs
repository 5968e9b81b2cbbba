//! Score-improvement orchestrator.
//!
//! Validates that both records are processed and carry keywords, scores the
//! original resume, runs the improvement loop, then builds the preview and
//! the analysis concurrently. Read-only with respect to the store.

use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use super::analysis::{analyze, AnalysisInput, AnalysisReport, Improvement};
use super::improvement::{ImprovementLoop, ImprovementRequest, ScoreRecord};
use super::keywords::KeywordSet;
use super::prompts::PREVIEW_PROMPT_TEMPLATE;
use super::similarity::cosine_similarity;
use crate::errors::AppError;
use crate::extraction::{schema_of, validate_as, ResumePreview, SchemaKind};
use crate::i18n::{messages, Locale};
use crate::llm_client::{EmbeddingProvider, GenerationOptions, LlmProvider, Providers};
use crate::models::job::JobRow;
use crate::models::resume::ResumeRow;
use crate::premium::ensure_model_access;
use crate::store::RecordStore;

/// Final result of one scoring run, serialized flat.
#[derive(Debug, Clone, Serialize)]
pub struct ImprovementReport {
    pub resume_id: Uuid,
    pub job_id: Uuid,
    pub original_score: f64,
    pub new_score: f64,
    pub resume_preview: Option<ResumePreview>,
    pub details: String,
    pub commentary: String,
    pub improvements: Vec<Improvement>,
}

pub struct ScoreImprovementService<'a> {
    store: &'a dyn RecordStore,
    llm: &'a dyn LlmProvider,
    embedder: &'a dyn EmbeddingProvider,
    premium_models: &'a [String],
    improvement: ImprovementLoop,
    locale: Locale,
}

impl<'a> ScoreImprovementService<'a> {
    pub fn new(
        store: &'a dyn RecordStore,
        providers: &'a Providers,
        premium_models: &'a [String],
        max_retries: u32,
        locale: Locale,
    ) -> Self {
        Self {
            store,
            llm: providers.llm.as_ref(),
            embedder: providers.embedder.as_ref(),
            premium_models,
            improvement: ImprovementLoop::new(max_retries),
            locale,
        }
    }

    pub async fn run(
        &self,
        resume_id: Uuid,
        job_id: Uuid,
        model: &str,
        token: Option<&str>,
    ) -> Result<ImprovementReport, AppError> {
        ensure_model_access(self.store, self.premium_models, model, token, self.locale).await?;

        let (resume, resume_keywords) = self.load_resume(resume_id).await?;
        let (job, job_keywords) = self.load_job(job_id).await?;

        let job_keywords_text = job_keywords.joined();
        let resume_keywords_text = resume_keywords.joined();

        let (resume_embedding, job_keywords_embedding) = tokio::try_join!(
            self.embedder.embed(&resume.content),
            self.embedder.embed(&job_keywords_text),
        )?;
        let original_score = cosine_similarity(
            Some(job_keywords_embedding.as_slice()),
            Some(resume_embedding.as_slice()),
        );
        info!(%resume_id, %job_id, original_score, "computed baseline score");

        let options = GenerationOptions::default();
        let outcome = self
            .improvement
            .run(
                self.llm,
                self.embedder,
                ImprovementRequest {
                    job: &job.content,
                    job_keywords: &job_keywords_text,
                    resume_keywords: &resume_keywords_text,
                    baseline: ScoreRecord {
                        score: original_score,
                        resume: resume.content.clone(),
                    },
                    job_keywords_embedding: &job_keywords_embedding,
                    model,
                    options: &options,
                    target_language: self.locale.target_language(),
                },
            )
            .await?;
        let improved = outcome.best;

        let (resume_preview, analysis) = tokio::join!(
            self.preview(&improved.resume, model),
            analyze(
                self.llm,
                model,
                self.locale,
                AnalysisInput {
                    original_resume: &resume.content,
                    improved_resume: &improved.resume,
                    job_description: &job.content,
                    original_score,
                    new_score: improved.score,
                },
            ),
        );

        info!(
            %resume_id,
            %job_id,
            original_score,
            new_score = improved.score,
            attempts = outcome.attempts,
            termination = ?outcome.termination,
            preview = resume_preview.is_some(),
            "score improvement complete"
        );

        let AnalysisReport {
            details,
            commentary,
            improvements,
        } = analysis;

        Ok(ImprovementReport {
            resume_id,
            job_id,
            original_score,
            new_score: improved.score,
            resume_preview,
            details,
            commentary,
            improvements,
        })
    }

    async fn load_resume(&self, resume_id: Uuid) -> Result<(ResumeRow, KeywordSet), AppError> {
        let id = resume_id.to_string();
        let resume = self
            .store
            .fetch_resume(resume_id)
            .await?
            .ok_or_else(|| AppError::ResumeNotFound(messages::resume_not_found(self.locale, &id)))?;
        let processed = self
            .store
            .fetch_processed_resume(resume_id)
            .await?
            .ok_or_else(|| {
                AppError::ResumeParsingFailed(messages::resume_parsing_failed(self.locale, &id))
            })?;

        let keywords = KeywordSet::from_blob(processed.extracted_keywords.as_deref(), "resume");
        if keywords.is_empty() {
            return Err(AppError::ResumeKeywordExtractionFailed(
                messages::resume_keywords_missing(self.locale),
            ));
        }
        Ok((resume, keywords))
    }

    async fn load_job(&self, job_id: Uuid) -> Result<(JobRow, KeywordSet), AppError> {
        let id = job_id.to_string();
        let job = self
            .store
            .fetch_job(job_id)
            .await?
            .ok_or_else(|| AppError::JobNotFound(messages::job_not_found(self.locale, &id)))?;
        let processed = self
            .store
            .fetch_processed_job(job_id)
            .await?
            .ok_or_else(|| AppError::JobParsingFailed(messages::job_parsing_failed(self.locale, &id)))?;

        let keywords = KeywordSet::from_blob(processed.extracted_keywords.as_deref(), "job");
        if keywords.is_empty() {
            return Err(AppError::JobKeywordExtractionFailed(
                messages::job_keywords_missing(self.locale),
            ));
        }
        Ok((job, keywords))
    }

    /// Any provider or validation failure leaves the report without a preview.
    async fn preview(&self, improved_resume: &str, model: &str) -> Option<ResumePreview> {
        let prompt = PREVIEW_PROMPT_TEMPLATE.replace("{resume}", improved_resume);
        let raw = match self
            .llm
            .generate_structured(&prompt, model, &schema_of::<ResumePreview>())
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                error!(error = %e, "failed to generate resume preview");
                return None;
            }
        };

        match validate_as::<ResumePreview>(&raw, SchemaKind::ResumePreview) {
            Ok(preview) => Some(preview),
            Err(e) => {
                error!(error = %e, "validation error for resume preview");
                None
            }
        }
    }
}
