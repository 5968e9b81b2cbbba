//! Record store: the relational persistence the services read from and,
//! for ingestion, write to. Carried in `AppState` as `Arc<dyn RecordStore>`
//! so services stay testable without a database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::job::{JobRow, ProcessedJobRow};
use crate::models::resume::{ProcessedResumeRow, ResumeRow};
use crate::models::token::TokenRow;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use self::postgres::PgRecordStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Lookups return `Ok(None)` for "not found" so callers can tell a missing
/// record apart from one that exists but was never processed.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn fetch_resume(&self, resume_id: Uuid) -> Result<Option<ResumeRow>, StoreError>;

    async fn fetch_processed_resume(
        &self,
        resume_id: Uuid,
    ) -> Result<Option<ProcessedResumeRow>, StoreError>;

    async fn fetch_job(&self, job_id: Uuid) -> Result<Option<JobRow>, StoreError>;

    async fn fetch_processed_job(
        &self,
        job_id: Uuid,
    ) -> Result<Option<ProcessedJobRow>, StoreError>;

    async fn resume_exists(&self, resume_id: Uuid) -> Result<bool, StoreError> {
        Ok(self.fetch_resume(resume_id).await?.is_some())
    }

    /// Inserts the resume and its processed record atomically.
    async fn insert_resume(
        &self,
        resume: &ResumeRow,
        processed: &ProcessedResumeRow,
    ) -> Result<(), StoreError>;

    /// Inserts a job and, when extraction succeeded, its processed record.
    async fn insert_job(
        &self,
        job: &JobRow,
        processed: Option<&ProcessedJobRow>,
    ) -> Result<(), StoreError>;

    async fn fetch_token(&self, token: &str) -> Result<Option<TokenRow>, StoreError>;

    async fn insert_token(&self, token: &TokenRow) -> Result<(), StoreError>;

    /// The premium-model gate: token exists, is flagged valid and unexpired.
    async fn is_token_valid(&self, token: &str, now: DateTime<Utc>) -> Result<bool, StoreError> {
        Ok(self
            .fetch_token(token)
            .await?
            .is_some_and(|t| t.is_usable_at(now)))
    }
}
