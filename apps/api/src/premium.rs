//! Premium-model gate shared by ingestion and scoring.

use chrono::Utc;

use crate::errors::AppError;
use crate::i18n::{messages, Locale};
use crate::store::RecordStore;

/// Models outside `premium_models` always pass. Premium models need a token
/// that exists, is flagged valid and has not expired.
pub async fn ensure_model_access(
    store: &dyn RecordStore,
    premium_models: &[String],
    model: &str,
    token: Option<&str>,
    locale: Locale,
) -> Result<(), AppError> {
    if !premium_models.iter().any(|m| m == model) {
        return Ok(());
    }

    let valid = match token.map(str::trim).filter(|t| !t.is_empty()) {
        Some(token) => store.is_token_valid(token, Utc::now()).await?,
        None => false,
    };

    if valid {
        Ok(())
    } else {
        tracing::warn!(model, "premium model requested without a valid token");
        Err(AppError::InvalidToken(messages::invalid_token(locale)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::token::TokenRow;
    use crate::store::memory::InMemoryStore;
    use chrono::Duration;

    fn premium() -> Vec<String> {
        vec!["gpt-4o".to_string()]
    }

    fn token(expires_in_days: i64, is_valid: bool) -> TokenRow {
        TokenRow {
            token: "tok".into(),
            is_valid,
            created_at: Utc::now(),
            expires_at: Some(Utc::now() + Duration::days(expires_in_days)),
        }
    }

    #[tokio::test]
    async fn test_regular_model_needs_no_token() {
        let store = InMemoryStore::default();
        ensure_model_access(&store, &premium(), "gpt-4.1-mini", None, Locale::EnUs)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_premium_model_with_valid_token_passes() {
        let store = InMemoryStore::default().with_token(token(30, true));
        ensure_model_access(&store, &premium(), "gpt-4o", Some("tok"), Locale::EnUs)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_premium_model_rejects_missing_expired_or_revoked_tokens() {
        let cases = [
            (InMemoryStore::default(), Some("tok")),
            (InMemoryStore::default(), None),
            (InMemoryStore::default().with_token(token(-1, true)), Some("tok")),
            (InMemoryStore::default().with_token(token(30, false)), Some("tok")),
        ];
        for (store, tok) in cases {
            let err = ensure_model_access(&store, &premium(), "gpt-4o", tok, Locale::EnUs)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::InvalidToken(_)));
        }
    }
}
