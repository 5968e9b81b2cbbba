use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::Providers;
use crate::store::RecordStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Record store. `PgRecordStore` in production.
    pub store: Arc<dyn RecordStore>,
    /// Generation and embedding clients, built once from `config.providers`.
    pub providers: Providers,
    pub config: Config,
}
