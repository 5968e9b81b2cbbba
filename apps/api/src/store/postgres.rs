use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{RecordStore, StoreError};
use crate::models::job::{JobRow, ProcessedJobRow};
use crate::models::resume::{ProcessedResumeRow, ResumeRow};
use crate::models::token::TokenRow;

/// PostgreSQL-backed record store. Schema: `migrations/0001_init.sql`.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn fetch_resume(&self, resume_id: Uuid) -> Result<Option<ResumeRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE resume_id = $1")
                .bind(resume_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn fetch_processed_resume(
        &self,
        resume_id: Uuid,
    ) -> Result<Option<ProcessedResumeRow>, StoreError> {
        Ok(sqlx::query_as::<_, ProcessedResumeRow>(
            "SELECT * FROM processed_resumes WHERE resume_id = $1",
        )
        .bind(resume_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn fetch_job(&self, job_id: Uuid) -> Result<Option<JobRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE job_id = $1")
                .bind(job_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn fetch_processed_job(
        &self,
        job_id: Uuid,
    ) -> Result<Option<ProcessedJobRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, ProcessedJobRow>("SELECT * FROM processed_jobs WHERE job_id = $1")
                .bind(job_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn resume_exists(&self, resume_id: Uuid) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM resumes WHERE resume_id = $1)")
                .bind(resume_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn insert_resume(
        &self,
        resume: &ResumeRow,
        processed: &ProcessedResumeRow,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO resumes (resume_id, content, content_type, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(resume.resume_id)
        .bind(&resume.content)
        .bind(&resume.content_type)
        .bind(resume.created_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO processed_resumes (resume_id, structured, extracted_keywords, processed_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(processed.resume_id)
        .bind(&processed.structured)
        .bind(&processed.extracted_keywords)
        .bind(processed.processed_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn insert_job(
        &self,
        job: &JobRow,
        processed: Option<&ProcessedJobRow>,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO jobs (job_id, resume_id, content, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(job.job_id)
        .bind(job.resume_id)
        .bind(&job.content)
        .bind(job.created_at)
        .execute(&mut *tx)
        .await?;

        if let Some(processed) = processed {
            sqlx::query(
                r#"
                INSERT INTO processed_jobs (job_id, structured, extracted_keywords, processed_at)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(processed.job_id)
            .bind(&processed.structured)
            .bind(&processed.extracted_keywords)
            .bind(processed.processed_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn fetch_token(&self, token: &str) -> Result<Option<TokenRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, TokenRow>("SELECT * FROM tokens WHERE token = $1")
                .bind(token)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn insert_token(&self, token: &TokenRow) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO tokens (token, is_valid, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&token.token)
        .bind(token.is_valid)
        .bind(token.created_at)
        .bind(token.expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
