use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Premium-model access token.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TokenRow {
    pub token: String,
    pub is_valid: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenRow {
    /// Valid flag set and not yet expired. A token without expiry never expires.
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        self.is_valid && self.expires_at.map_or(true, |exp| exp > now)
    }
}
