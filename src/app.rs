use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::config::AppConfig;
use crate::db::content_repository::ContentRepository;
use crate::db::query_log_repository::QueryLogRepository;
use crate::search::client::SearchIndex;
use crate::search::engine::SearchEngine;
use crate::search::provider::providers_for;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SearchEngine>,
    pub content_repo: Arc<dyn ContentRepository>,
    pub search_index: Arc<dyn SearchIndex>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wire one provider per content kind into a search engine.
    pub fn new(
        config: AppConfig,
        content_repo: Arc<dyn ContentRepository>,
        query_log: Arc<dyn QueryLogRepository>,
        search_index: Arc<dyn SearchIndex>,
    ) -> Self {
        let providers = providers_for(
            content_repo.clone(),
            search_index.clone(),
            config.search_limit,
            config.suggestion_limit,
        );
        let engine = SearchEngine::new(providers, query_log, config.provider_timeout());

        Self {
            engine: Arc::new(engine),
            content_repo,
            search_index,
            config: Arc::new(config),
        }
    }
}

/// Build the Axum router with every API route.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/search", get(api::search::search_handler))
        .route("/search/suggestions", get(api::search::suggestions_handler))
        .route("/search/logs", get(api::search::logs_handler))
        .route("/search/reindex", post(api::search::reindex_handler))
        .route("/content", post(api::ingest::ingest_handler))
        .route("/health", get(health_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn health_handler() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}
