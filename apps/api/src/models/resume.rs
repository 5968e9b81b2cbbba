use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Raw resume text as uploaded (markdown or extracted PDF text).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub resume_id: Uuid,
    pub content: String,
    pub content_type: String,
    pub created_at: DateTime<Utc>,
}

/// Structured extraction of a resume. `extracted_keywords` is the raw JSON
/// blob; parse it with `KeywordSet::from_blob`, never trust its shape.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProcessedResumeRow {
    pub resume_id: Uuid,
    pub structured: Value,
    pub extracted_keywords: Option<String>,
    pub processed_at: DateTime<Utc>,
}
