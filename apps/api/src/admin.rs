//! Premium token issuance.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::i18n::messages;
use crate::models::token::TokenRow;
use crate::routes::locale::RequestLocale;
use crate::state::AppState;

const DEFAULT_VALID_DAYS: u32 = 30;
const MAX_VALID_DAYS: u32 = 3650;

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub days: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub valid_for_days: u32,
    pub message: &'static str,
}

/// A fresh token valid for `days` from `now`.
pub fn new_token(days: u32, now: DateTime<Utc>) -> TokenRow {
    TokenRow {
        token: Uuid::new_v4().simple().to_string(),
        is_valid: true,
        created_at: now,
        expires_at: Some(now + Duration::days(i64::from(days))),
    }
}

/// POST /api/v1/admin/tokens?days=30
pub async fn handle_create_token(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Query(query): Query<TokenQuery>,
) -> Result<Json<TokenResponse>, AppError> {
    let days = query.days.unwrap_or(DEFAULT_VALID_DAYS);
    if days == 0 || days > MAX_VALID_DAYS {
        return Err(AppError::BadRequest(format!(
            "days must be between 1 and {MAX_VALID_DAYS}"
        )));
    }

    let token = new_token(days, Utc::now());
    state.store.insert_token(&token).await?;
    info!(valid_for_days = days, "premium token issued");

    Ok(Json(TokenResponse {
        expires_at: token.expires_at.unwrap_or(token.created_at),
        token: token.token,
        valid_for_days: days,
        message: messages::token_generated(locale),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_token_expires_after_requested_days() {
        let now = Utc::now();
        let token = new_token(7, now);
        assert!(token.is_valid);
        assert_eq!(token.expires_at, Some(now + Duration::days(7)));
        assert!(token.is_usable_at(now + Duration::days(6)));
        assert!(!token.is_usable_at(now + Duration::days(8)));
    }

    #[test]
    fn test_tokens_are_unique() {
        let now = Utc::now();
        assert_ne!(new_token(1, now).token, new_token(1, now).token);
    }
}
