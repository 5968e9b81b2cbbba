//! Axum route handlers for the score-improvement API.

use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures_util::Stream;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;
use uuid::Uuid;

use super::service::{ImprovementReport, ScoreImprovementService};
use crate::errors::AppError;
use crate::i18n::messages;
use crate::routes::locale::RequestLocale;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ImproveRequest {
    pub resume_id: Uuid,
    pub job_id: Uuid,
    pub model: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ImproveResponse {
    pub request_id: Uuid,
    pub data: ImprovementReport,
}

/// POST /api/v1/resumes/improve
///
/// Scores the resume against the job, rewrites it and returns the
/// before/after report.
pub async fn handle_improve(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Json(request): Json<ImproveRequest>,
) -> Result<Json<ImproveResponse>, AppError> {
    let request_id = Uuid::new_v4();
    let model = request
        .model
        .as_deref()
        .unwrap_or(&state.config.default_model);
    tracing::info!(
        %request_id,
        resume_id = %request.resume_id,
        job_id = %request.job_id,
        model,
        "improve requested"
    );

    let service = ScoreImprovementService::new(
        state.store.as_ref(),
        &state.providers,
        &state.config.premium_models,
        state.config.max_improvement_retries,
        locale,
    );
    let data = service
        .run(request.resume_id, request.job_id, model, request.token.as_deref())
        .await?;

    Ok(Json(ImproveResponse { request_id, data }))
}

fn status_event(payload: Value) -> Result<Event, Infallible> {
    Ok(Event::default().data(payload.to_string()))
}

/// POST /api/v1/resumes/improve/stream
///
/// Same run as `handle_improve`, reported as Server-Sent Events: a
/// `starting` frame, then one `completed` frame carrying the report or an
/// `error` frame carrying the error code and message.
pub async fn handle_improve_stream(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Json(request): Json<ImproveRequest>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let request_id = Uuid::new_v4();
    tracing::info!(
        %request_id,
        resume_id = %request.resume_id,
        job_id = %request.job_id,
        "streamed improve requested"
    );

    let stream = async_stream::stream! {
        yield status_event(json!({
            "status": "starting",
            "request_id": request_id,
            "message": messages::stream_start(locale),
        }));

        let model = request
            .model
            .as_deref()
            .unwrap_or(&state.config.default_model);
        let service = ScoreImprovementService::new(
            state.store.as_ref(),
            &state.providers,
            &state.config.premium_models,
            state.config.max_improvement_retries,
            locale,
        );
        let outcome = service
            .run(request.resume_id, request.job_id, model, request.token.as_deref())
            .await;

        yield status_event(match outcome {
            Ok(report) => json!({
                "status": "completed",
                "request_id": request_id,
                "result": report,
                "message": messages::stream_complete(locale),
            }),
            Err(e) => {
                warn!(%request_id, error = %e, "streamed improve failed");
                json!({
                    "status": "error",
                    "request_id": request_id,
                    "error": { "code": e.code(), "message": e.public_message() },
                })
            }
        });
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
