use axum::extract::State;

use crate::api::params::{ClientAddress, SearchParams};
use crate::api::response::CamelJson;
use crate::app::AppState;
use crate::error::AppError;
use crate::models::search::Paginated;
use crate::search::engine::ReindexReport;

fn envelope<T: serde::Serialize>(
    page: &Paginated<T>,
    items_key: &str,
) -> Result<CamelJson<serde_json::Value>, AppError> {
    page.envelope(items_key)
        .map(CamelJson)
        .map_err(|e| AppError::Internal(format!("Failed to serialize response: {e}")))
}

/// Axum handler for `GET /search`.
///
/// Responds 400 with an empty `data` list when `q` is missing or blank.
pub async fn search_handler(
    State(state): State<AppState>,
    ClientAddress(client_address): ClientAddress,
    params: SearchParams,
) -> Result<CamelJson<serde_json::Value>, AppError> {
    let page = params.page_request(&state.config);

    let results = state
        .engine
        .unified_search(params.query(), page, client_address)
        .await?;

    envelope(&results, "data")
}

/// Axum handler for `GET /search/suggestions`.
pub async fn suggestions_handler(
    State(state): State<AppState>,
    params: SearchParams,
) -> Result<CamelJson<serde_json::Value>, AppError> {
    let page = params.page_request(&state.config);
    let suggestions = state.engine.suggestions(params.query(), page).await;

    envelope(&suggestions, "suggestions")
}

/// Axum handler for `GET /search/logs`.
pub async fn logs_handler(
    State(state): State<AppState>,
    params: SearchParams,
) -> Result<CamelJson<serde_json::Value>, AppError> {
    let page = params.page_request(&state.config);
    let logs = state.engine.logs(page).await?;

    envelope(&logs, "logs")
}

/// Axum handler for `POST /search/reindex`.
pub async fn reindex_handler(State(state): State<AppState>) -> CamelJson<ReindexReport> {
    tracing::info!("Reindex requested");
    let report = state.engine.reindex_all().await;
    if !report.is_complete() {
        tracing::warn!(message = %report.message, "Reindex finished with failures");
    }

    CamelJson(report)
}
