use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub job_id: Uuid,
    pub resume_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Present only when structured job extraction succeeded.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProcessedJobRow {
    pub job_id: Uuid,
    pub structured: Value,
    pub extracted_keywords: Option<String>,
    pub processed_at: DateTime<Utc>,
}
