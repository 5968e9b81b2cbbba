//! Axum route handlers for resume and job ingestion.

use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use super::pdf::text_from_pdf;
use super::service::{JobIngestService, ResumeIngestService};
use crate::errors::AppError;
use crate::i18n::messages;
use crate::routes::locale::RequestLocale;
use crate::state::AppState;

const PDF_CONTENT_TYPE: &str = "application/pdf";

// ────────────────────────────────────────────────────────────────────────────
// Request / response shapes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ResumeUploadRequest {
    pub content: String,
    #[serde(default = "default_content_type")]
    pub content_type: String,
    pub model: Option<String>,
    pub token: Option<String>,
}

fn default_content_type() -> String {
    "md".to_string()
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub model: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResumeUploadResponse {
    pub request_id: Uuid,
    pub resume_id: Uuid,
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct JobUploadRequest {
    pub job_descriptions: Vec<String>,
    pub resume_id: Uuid,
    pub model: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JobUploadResponse {
    pub request_id: Uuid,
    pub job_id: Vec<Uuid>,
    pub message: &'static str,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes
///
/// Stores a markdown or plain-text resume together with its structured
/// extraction.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Json(request): Json<ResumeUploadRequest>,
) -> Result<Json<ResumeUploadResponse>, AppError> {
    let request_id = Uuid::new_v4();
    let model = request.model.as_deref().unwrap_or(&state.config.default_model);
    info!(%request_id, model, content_type = %request.content_type, "resume upload");

    let service = ResumeIngestService::new(
        state.store.as_ref(),
        state.providers.llm.as_ref(),
        &state.config.premium_models,
        locale,
    );
    let resume_id = service
        .ingest(
            &request.content,
            &request.content_type,
            model,
            request.token.as_deref(),
        )
        .await?;

    Ok(Json(ResumeUploadResponse {
        request_id,
        resume_id,
        message: messages::resume_uploaded(locale),
    }))
}

/// POST /api/v1/resumes/upload
///
/// Multipart upload of a PDF resume in the `file` field.
pub async fn handle_upload_resume_pdf(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> Result<Json<ResumeUploadResponse>, AppError> {
    let request_id = Uuid::new_v4();
    let model = query.model.as_deref().unwrap_or(&state.config.default_model);

    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        if field.content_type() != Some(PDF_CONTENT_TYPE) {
            return Err(AppError::BadRequest(messages::invalid_file_type(locale)));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        file = Some(bytes);
        break;
    }
    let Some(bytes) = file else {
        return Err(AppError::BadRequest(messages::empty_file(locale)));
    };
    info!(%request_id, model, size = bytes.len(), "PDF resume upload");

    let text = tokio::task::spawn_blocking(move || text_from_pdf(&bytes, locale))
        .await
        .map_err(|e| {
            error!(error = %e, "PDF extraction task failed");
            AppError::Internal(e.into())
        })??;

    let service = ResumeIngestService::new(
        state.store.as_ref(),
        state.providers.llm.as_ref(),
        &state.config.premium_models,
        locale,
    );
    let resume_id = service
        .ingest(&text, "pdf", model, query.token.as_deref())
        .await?;

    Ok(Json(ResumeUploadResponse {
        request_id,
        resume_id,
        message: messages::resume_uploaded(locale),
    }))
}

/// POST /api/v1/jobs
///
/// Stores one job per description, each linked to an existing resume.
pub async fn handle_upload_jobs(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Json(request): Json<JobUploadRequest>,
) -> Result<Json<JobUploadResponse>, AppError> {
    let request_id = Uuid::new_v4();
    let model = request.model.as_deref().unwrap_or(&state.config.default_model);
    info!(
        %request_id,
        resume_id = %request.resume_id,
        count = request.job_descriptions.len(),
        model,
        "job upload"
    );

    let service = JobIngestService::new(
        state.store.as_ref(),
        state.providers.llm.as_ref(),
        &state.config.premium_models,
        locale,
    );
    let job_id = service
        .ingest(
            request.resume_id,
            &request.job_descriptions,
            model,
            request.token.as_deref(),
        )
        .await?;

    Ok(Json(JobUploadResponse {
        request_id,
        job_id,
        message: messages::jobs_uploaded(locale),
    }))
}
