pub mod health;
pub mod locale;

use axum::{routing::get, routing::post, Router};

use crate::admin;
use crate::ingest::handlers as ingest;
use crate::scoring::handlers as scoring;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Ingestion
        .route("/api/v1/resumes", post(ingest::handle_upload_resume))
        .route(
            "/api/v1/resumes/upload",
            post(ingest::handle_upload_resume_pdf),
        )
        .route("/api/v1/jobs", post(ingest::handle_upload_jobs))
        // Scoring
        .route("/api/v1/resumes/improve", post(scoring::handle_improve))
        .route(
            "/api/v1/resumes/improve/stream",
            post(scoring::handle_improve_stream),
        )
        // Admin
        .route("/api/v1/admin/tokens", post(admin::handle_create_token))
        .with_state(state)
}
