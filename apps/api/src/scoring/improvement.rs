//! Bounded LLM rewrite loop.
//!
//! Each attempt asks the model for a rewritten resume, embeds it and scores it
//! against the job-keyword embedding. The first candidate that strictly beats
//! the baseline is accepted. A candidate identical to the current best ends
//! the loop early, since the model has converged.

use serde::Serialize;
use tracing::{debug, info};

use super::prompts::{format_score, IMPROVEMENT_PROMPT_TEMPLATE};
use super::similarity::cosine_similarity;
use crate::llm_client::{
    strip_markdown_fences, EmbeddingProvider, GenerationOptions, LlmProvider, ProviderError,
};

pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// A resume text together with its similarity to the job keywords.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRecord {
    pub score: f64,
    pub resume: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// A candidate scored strictly higher than the baseline.
    Improved,
    /// The model returned the current resume unchanged.
    Unchanged,
    /// Every attempt scored at or below the baseline.
    Exhausted,
}

#[derive(Debug, Clone)]
pub struct ImprovementOutcome {
    pub best: ScoreRecord,
    pub attempts: u32,
    pub termination: Termination,
}

/// Inputs for one run. The job-keyword embedding is computed once by the
/// caller and reused for every candidate.
pub struct ImprovementRequest<'a> {
    pub job: &'a str,
    pub job_keywords: &'a str,
    pub resume_keywords: &'a str,
    pub baseline: ScoreRecord,
    pub job_keywords_embedding: &'a [f32],
    pub model: &'a str,
    pub options: &'a GenerationOptions,
    pub target_language: &'a str,
}

#[derive(Debug, Clone, Copy)]
pub struct ImprovementLoop {
    pub max_retries: u32,
}

impl Default for ImprovementLoop {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl ImprovementLoop {
    pub fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }

    /// Generation or embedding failures abort the run.
    pub async fn run(
        &self,
        llm: &dyn LlmProvider,
        embedder: &dyn EmbeddingProvider,
        request: ImprovementRequest<'_>,
    ) -> Result<ImprovementOutcome, ProviderError> {
        let best = request.baseline.clone();

        for attempt in 1..=self.max_retries {
            let prompt = render_prompt(&request, &best);
            let raw = llm
                .generate(&prompt, request.model, request.options)
                .await?;
            let candidate = strip_markdown_fences(&raw).trim();

            if candidate == best.resume.trim() {
                debug!(attempt, "candidate identical to current resume");
                return Ok(ImprovementOutcome {
                    best,
                    attempts: attempt,
                    termination: Termination::Unchanged,
                });
            }

            let embedding = embedder.embed(candidate).await?;
            let score = cosine_similarity(
                Some(embedding.as_slice()),
                Some(request.job_keywords_embedding),
            );
            info!(
                attempt,
                score,
                best_score = best.score,
                "scored improvement candidate"
            );

            if score > best.score {
                return Ok(ImprovementOutcome {
                    best: ScoreRecord {
                        score,
                        resume: candidate.to_string(),
                    },
                    attempts: attempt,
                    termination: Termination::Improved,
                });
            }
        }

        Ok(ImprovementOutcome {
            best,
            attempts: self.max_retries,
            termination: Termination::Exhausted,
        })
    }
}

fn render_prompt(request: &ImprovementRequest<'_>, best: &ScoreRecord) -> String {
    IMPROVEMENT_PROMPT_TEMPLATE
        .replace("{current_score}", &format_score(best.score))
        .replace("{target_language}", request.target_language)
        .replace("{job_keywords}", request.job_keywords)
        .replace("{resume_keywords}", request.resume_keywords)
        .replace("{job}", request.job)
        .replace("{resume}", &best.resume)
}
