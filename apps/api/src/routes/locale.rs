use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::{header::ACCEPT_LANGUAGE, request::Parts},
};
use serde::Deserialize;

use crate::i18n::Locale;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct LocaleQuery {
    locale: Option<String>,
}

/// Locale for user-facing messages: `?locale=` wins over `Accept-Language`,
/// then the configured default.
#[derive(Debug, Clone, Copy)]
pub struct RequestLocale(pub Locale);

#[async_trait]
impl FromRequestParts<AppState> for RequestLocale {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let from_query = Query::<LocaleQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(q)| q.locale)
            .filter(|tag| !tag.trim().is_empty());

        let locale = match from_query {
            Some(tag) => Locale::normalize(Some(&tag)),
            None => parts
                .headers
                .get(ACCEPT_LANGUAGE)
                .and_then(|value| value.to_str().ok())
                .and_then(Locale::from_accept_language)
                .unwrap_or(state.config.default_locale),
        };
        Ok(RequestLocale(locale))
    }
}
