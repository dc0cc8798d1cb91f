use std::time::Duration;

use serde::Deserialize;

use crate::error::AppError;

/// Runtime configuration.
///
/// Built-in defaults are overlaid with `SITESEARCH_*` environment variables,
/// e.g. `SITESEARCH_MONGODB_URI` or `SITESEARCH_PROVIDER_TIMEOUT_MS`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub listen_addr: String,
    pub mongodb_uri: String,
    pub mongodb_database: String,
    pub meilisearch_url: String,
    #[serde(default)]
    pub meilisearch_api_key: Option<String>,
    /// Prepended to every search index name.
    #[serde(default)]
    pub index_prefix: String,
    /// Token required by the content ingest API.
    pub service_token: String,
    /// Per-provider cap on full-text hits.
    pub search_limit: usize,
    /// Per-provider cap on suggestion matches.
    pub suggestion_limit: usize,
    pub default_per_page: usize,
    /// Budget for a single provider call before it is skipped.
    pub provider_timeout_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:3000".to_string(),
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            mongodb_database: "sitesearch".to_string(),
            meilisearch_url: "http://localhost:7700".to_string(),
            meilisearch_api_key: None,
            index_prefix: String::new(),
            service_token: "dev-token".to_string(),
            search_limit: 20,
            suggestion_limit: 50,
            default_per_page: 10,
            provider_timeout_ms: 2000,
        }
    }
}

impl AppConfig {
    /// Load the configuration from defaults and the environment.
    pub fn load() -> Result<Self, AppError> {
        Self::from_source(config::Environment::with_prefix("SITESEARCH"))
    }

    fn from_source<S>(source: S) -> Result<Self, AppError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let defaults = Self::default();

        config::Config::builder()
            .set_default("listen_addr", defaults.listen_addr)
            .and_then(|b| b.set_default("mongodb_uri", defaults.mongodb_uri))
            .and_then(|b| b.set_default("mongodb_database", defaults.mongodb_database))
            .and_then(|b| b.set_default("meilisearch_url", defaults.meilisearch_url))
            .and_then(|b| b.set_default("index_prefix", defaults.index_prefix))
            .and_then(|b| b.set_default("service_token", defaults.service_token))
            .and_then(|b| b.set_default("search_limit", defaults.search_limit as i64))
            .and_then(|b| b.set_default("suggestion_limit", defaults.suggestion_limit as i64))
            .and_then(|b| b.set_default("default_per_page", defaults.default_per_page as i64))
            .and_then(|b| b.set_default("provider_timeout_ms", defaults.provider_timeout_ms as i64))
            .map_err(|e| AppError::Internal(format!("Invalid configuration defaults: {e}")))?
            .add_source(source)
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| AppError::Internal(format!("Failed to load configuration: {e}")))
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }
}
