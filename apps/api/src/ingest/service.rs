use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::extract::{extract_structured_job, extract_structured_resume};
use crate::errors::AppError;
use crate::i18n::{messages, Locale};
use crate::llm_client::LlmProvider;
use crate::models::job::{JobRow, ProcessedJobRow};
use crate::models::resume::{ProcessedResumeRow, ResumeRow};
use crate::premium::ensure_model_access;
use crate::store::RecordStore;

/// Keyword blob in the shape `KeywordSet::from_blob` reads first.
fn keyword_blob(keywords: &[String]) -> String {
    json!({ "extracted_keywords": keywords }).to_string()
}

fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value, AppError> {
    serde_json::to_value(value).map_err(|e| AppError::Internal(e.into()))
}

pub struct ResumeIngestService<'a> {
    store: &'a dyn RecordStore,
    llm: &'a dyn LlmProvider,
    premium_models: &'a [String],
    locale: Locale,
}

impl<'a> ResumeIngestService<'a> {
    pub fn new(
        store: &'a dyn RecordStore,
        llm: &'a dyn LlmProvider,
        premium_models: &'a [String],
        locale: Locale,
    ) -> Self {
        Self {
            store,
            llm,
            premium_models,
            locale,
        }
    }

    /// Extracts the structured resume and stores both records. Nothing is
    /// persisted when extraction fails.
    pub async fn ingest(
        &self,
        content: &str,
        content_type: &str,
        model: &str,
        token: Option<&str>,
    ) -> Result<Uuid, AppError> {
        ensure_model_access(self.store, self.premium_models, model, token, self.locale).await?;

        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::BadRequest(messages::resume_no_text(self.locale)));
        }

        let structured = extract_structured_resume(self.llm, model, content, self.locale).await?;

        let resume_id = Uuid::new_v4();
        let now = Utc::now();
        let resume = ResumeRow {
            resume_id,
            content: content.to_string(),
            content_type: content_type.to_string(),
            created_at: now,
        };
        let processed = ProcessedResumeRow {
            resume_id,
            structured: to_json(&structured)?,
            extracted_keywords: Some(keyword_blob(&structured.extracted_keywords)),
            processed_at: now,
        };
        self.store.insert_resume(&resume, &processed).await?;

        info!(
            %resume_id,
            keywords = structured.extracted_keywords.len(),
            "resume stored"
        );
        Ok(resume_id)
    }
}

pub struct JobIngestService<'a> {
    store: &'a dyn RecordStore,
    llm: &'a dyn LlmProvider,
    premium_models: &'a [String],
    locale: Locale,
}

impl<'a> JobIngestService<'a> {
    pub fn new(
        store: &'a dyn RecordStore,
        llm: &'a dyn LlmProvider,
        premium_models: &'a [String],
        locale: Locale,
    ) -> Self {
        Self {
            store,
            llm,
            premium_models,
            locale,
        }
    }

    /// Stores each description as a job linked to `resume_id`. A job whose
    /// extraction fails is still stored, without a processed record.
    pub async fn ingest(
        &self,
        resume_id: Uuid,
        descriptions: &[String],
        model: &str,
        token: Option<&str>,
    ) -> Result<Vec<Uuid>, AppError> {
        if !self.store.resume_exists(resume_id).await? {
            return Err(AppError::ResumeNotFound(messages::resume_not_found(
                self.locale,
                &resume_id.to_string(),
            )));
        }
        ensure_model_access(self.store, self.premium_models, model, token, self.locale).await?;

        let mut job_ids = Vec::with_capacity(descriptions.len());
        for description in descriptions {
            let job_id = Uuid::new_v4();
            let now = Utc::now();
            let job = JobRow {
                job_id,
                resume_id,
                content: description.clone(),
                created_at: now,
            };

            let processed = match extract_structured_job(self.llm, model, description).await? {
                Some(structured) => Some(ProcessedJobRow {
                    job_id,
                    structured: to_json(&structured)?,
                    extracted_keywords: structured
                        .extracted_keywords
                        .as_deref()
                        .filter(|k| !k.is_empty())
                        .map(keyword_blob),
                    processed_at: now,
                }),
                None => {
                    info!(%job_id, "structured job extraction failed; storing raw job only");
                    None
                }
            };

            self.store.insert_job(&job, processed.as_ref()).await?;
            info!(%job_id, %resume_id, processed = processed.is_some(), "job stored");
            job_ids.push(job_id);
        }

        Ok(job_ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::ProviderError;
    use crate::scoring::improvement::tests::ScriptedLlm;
    use crate::scoring::keywords::KeywordSet;
    use crate::store::memory::InMemoryStore;

    fn resume_json() -> String {
        serde_json::json!({
            "Personal Data": {
                "firstName": "Ada", "lastName": "Lovelace",
                "email": "ada@example.com", "phone": "123",
                "location": {"city": "London", "country": "UK"}
            },
            "Experiences": [],
            "Projects": [],
            "Skills": [{"category": "Languages", "skillName": "Rust"}],
            "Education": [],
            "Extracted Keywords": ["Rust", "Mathematics"]
        })
        .to_string()
    }

    fn premium() -> Vec<String> {
        vec!["gpt-4o".to_string()]
    }

    #[tokio::test]
    async fn test_resume_is_stored_with_keywords() {
        let store = InMemoryStore::default();
        let llm = ScriptedLlm::new(vec![Ok(resume_json())]);
        let premium = premium();
        let service = ResumeIngestService::new(&store, &llm, &premium, Locale::EnUs);

        let resume_id = service
            .ingest("# Ada Lovelace", "md", "gpt-4.1-mini", None)
            .await
            .unwrap();

        let processed = store.processed_resumes.lock().unwrap()[&resume_id].clone();
        let keywords = KeywordSet::from_blob(processed.extracted_keywords.as_deref(), "resume");
        assert_eq!(keywords.joined(), "Rust, Mathematics");
        assert_eq!(processed.structured["Personal Data"]["firstName"], "Ada");
        assert!(store.resumes.lock().unwrap().contains_key(&resume_id));
    }

    #[tokio::test]
    async fn test_invalid_resume_persists_nothing() {
        let store = InMemoryStore::default();
        let llm = ScriptedLlm::new(vec![Ok(r#"{"Skills": []}"#.into())]);
        let premium = premium();
        let service = ResumeIngestService::new(&store, &llm, &premium, Locale::EnUs);

        let err = service
            .ingest("resume text", "md", "gpt-4.1-mini", None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ResumeValidation(_)));
        assert!(store.resumes.lock().unwrap().is_empty());
        assert!(store.processed_resumes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_resume_is_rejected_before_extraction() {
        let store = InMemoryStore::default();
        let llm = ScriptedLlm::new(vec![]);
        let premium = premium();
        let service = ResumeIngestService::new(&store, &llm, &premium, Locale::EnUs);

        let err = service.ingest("   ", "md", "gpt-4.1-mini", None).await.unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(llm.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_jobs_require_an_existing_resume() {
        let store = InMemoryStore::default();
        let llm = ScriptedLlm::new(vec![]);
        let premium = premium();
        let service = JobIngestService::new(&store, &llm, &premium, Locale::EnUs);

        let err = service
            .ingest(Uuid::new_v4(), &["job".to_string()], "gpt-4.1-mini", None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ResumeNotFound(_)));
    }

    #[tokio::test]
    async fn test_failed_job_extraction_stores_raw_job_only() {
        let (store, resume_id) = InMemoryStore::default().with_resume("resume", Some("[]"));
        let llm = ScriptedLlm::new(vec![
            Ok(r#"{"jobTitle": "Rust Engineer", "extractedKeywords": ["Rust", "Tokio"]}"#.into()),
            Ok(r#"{"location": "Berlin"}"#.into()),
        ]);
        let premium = premium();
        let service = JobIngestService::new(&store, &llm, &premium, Locale::EnUs);

        let ids = service
            .ingest(
                resume_id,
                &["Rust role".to_string(), "Broken role".to_string()],
                "gpt-4.1-mini",
                None,
            )
            .await
            .unwrap();

        assert_eq!(ids.len(), 2);
        let processed = store.processed_jobs.lock().unwrap();
        let first = &processed[&ids[0]];
        assert_eq!(
            KeywordSet::from_blob(first.extracted_keywords.as_deref(), "job").joined(),
            "Rust, Tokio"
        );
        assert!(!processed.contains_key(&ids[1]));
        assert!(store.jobs.lock().unwrap().contains_key(&ids[1]));
    }

    #[tokio::test]
    async fn test_job_provider_failure_aborts() {
        let (store, resume_id) = InMemoryStore::default().with_resume("resume", Some("[]"));
        let llm = ScriptedLlm::new(vec![Err(ProviderError::RateLimited { retries: 3 })]);
        let premium = premium();
        let service = JobIngestService::new(&store, &llm, &premium, Locale::EnUs);

        let err = service
            .ingest(resume_id, &["role".to_string()], "gpt-4.1-mini", None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Provider(_)));
        assert!(store.jobs.lock().unwrap().is_empty());
    }
}
