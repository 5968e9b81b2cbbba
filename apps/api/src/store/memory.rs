//! In-memory `RecordStore` for service tests. Counts lookups so tests can
//! assert which records a flow touched.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{RecordStore, StoreError};
use crate::models::job::{JobRow, ProcessedJobRow};
use crate::models::resume::{ProcessedResumeRow, ResumeRow};
use crate::models::token::TokenRow;

#[derive(Default)]
pub struct InMemoryStore {
    pub resumes: Mutex<HashMap<Uuid, ResumeRow>>,
    pub processed_resumes: Mutex<HashMap<Uuid, ProcessedResumeRow>>,
    pub jobs: Mutex<HashMap<Uuid, JobRow>>,
    pub processed_jobs: Mutex<HashMap<Uuid, ProcessedJobRow>>,
    pub tokens: Mutex<HashMap<String, TokenRow>>,
    pub job_lookups: AtomicUsize,
}

impl InMemoryStore {
    pub fn with_resume(self, content: &str, keywords: Option<&str>) -> (Self, Uuid) {
        let resume_id = Uuid::new_v4();
        self.resumes.lock().unwrap().insert(
            resume_id,
            ResumeRow {
                resume_id,
                content: content.to_string(),
                content_type: "md".to_string(),
                created_at: Utc::now(),
            },
        );
        if let Some(keywords) = keywords {
            self.processed_resumes.lock().unwrap().insert(
                resume_id,
                ProcessedResumeRow {
                    resume_id,
                    structured: serde_json::json!({}),
                    extracted_keywords: Some(keywords.to_string()),
                    processed_at: Utc::now(),
                },
            );
        }
        (self, resume_id)
    }

    pub fn with_job(self, resume_id: Uuid, content: &str, keywords: Option<&str>) -> (Self, Uuid) {
        let job_id = Uuid::new_v4();
        self.jobs.lock().unwrap().insert(
            job_id,
            JobRow {
                job_id,
                resume_id,
                content: content.to_string(),
                created_at: Utc::now(),
            },
        );
        if let Some(keywords) = keywords {
            self.processed_jobs.lock().unwrap().insert(
                job_id,
                ProcessedJobRow {
                    job_id,
                    structured: serde_json::json!({}),
                    extracted_keywords: Some(keywords.to_string()),
                    processed_at: Utc::now(),
                },
            );
        }
        (self, job_id)
    }

    pub fn with_token(self, token: TokenRow) -> Self {
        self.tokens
            .lock()
            .unwrap()
            .insert(token.token.clone(), token);
        self
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn fetch_resume(&self, resume_id: Uuid) -> Result<Option<ResumeRow>, StoreError> {
        Ok(self.resumes.lock().unwrap().get(&resume_id).cloned())
    }

    async fn fetch_processed_resume(
        &self,
        resume_id: Uuid,
    ) -> Result<Option<ProcessedResumeRow>, StoreError> {
        Ok(self.processed_resumes.lock().unwrap().get(&resume_id).cloned())
    }

    async fn fetch_job(&self, job_id: Uuid) -> Result<Option<JobRow>, StoreError> {
        self.job_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.jobs.lock().unwrap().get(&job_id).cloned())
    }

    async fn fetch_processed_job(
        &self,
        job_id: Uuid,
    ) -> Result<Option<ProcessedJobRow>, StoreError> {
        Ok(self.processed_jobs.lock().unwrap().get(&job_id).cloned())
    }

    async fn insert_resume(
        &self,
        resume: &ResumeRow,
        processed: &ProcessedResumeRow,
    ) -> Result<(), StoreError> {
        self.resumes
            .lock()
            .unwrap()
            .insert(resume.resume_id, resume.clone());
        self.processed_resumes
            .lock()
            .unwrap()
            .insert(processed.resume_id, processed.clone());
        Ok(())
    }

    async fn insert_job(
        &self,
        job: &JobRow,
        processed: Option<&ProcessedJobRow>,
    ) -> Result<(), StoreError> {
        self.jobs.lock().unwrap().insert(job.job_id, job.clone());
        if let Some(processed) = processed {
            self.processed_jobs
                .lock()
                .unwrap()
                .insert(processed.job_id, processed.clone());
        }
        Ok(())
    }

    async fn fetch_token(&self, token: &str) -> Result<Option<TokenRow>, StoreError> {
        Ok(self.tokens.lock().unwrap().get(token).cloned())
    }

    async fn insert_token(&self, token: &TokenRow) -> Result<(), StoreError> {
        self.tokens
            .lock()
            .unwrap()
            .insert(token.token.clone(), token.clone());
        Ok(())
    }
}
