use chrono::Utc;

use crate::api::response::CamelJson;
use crate::db::content_repository::ContentRepository;
use crate::db::models::{IngestRequest, IngestResponse};
use crate::error::AppError;
use crate::search::client::SearchIndex;
use crate::search::normalizer::link;

/// Core ingestion logic, separated from the HTTP layer for testability.
///
/// Validates the request, stores the record in MongoDB and indexes it in
/// Meilisearch. An indexing failure is only logged: the record is already
/// stored and the next reindex picks it up.
pub async fn process_ingest(
    repo: &dyn ContentRepository,
    search: &dyn SearchIndex,
    request: IngestRequest,
    expected_token: &str,
) -> Result<IngestResponse, AppError> {
    // 1. Validate the service token
    if request.service_token != expected_token {
        return Err(AppError::Auth("Invalid service token".into()));
    }

    // 2. Build the record with a fresh identifier
    let id = uuid::Uuid::new_v4().simple().to_string();
    let record = request.content.into_record(id, Utc::now());
    let kind = record.kind();

    // 3. Label and body must carry text
    if record.label().trim().is_empty() {
        return Err(AppError::BadRequest(format!(
            "Field '{}' cannot be empty",
            kind.label_field()
        )));
    }
    if record.body().trim().is_empty() {
        return Err(AppError::BadRequest(format!(
            "Field '{}' cannot be empty",
            kind.body_field()
        )));
    }

    // 4. Persist
    repo.insert(&record).await?;

    // 5. Index (best-effort)
    if let Err(e) = search.index_record(&record).await {
        tracing::warn!(%kind, id = record.id(), "Failed to index record in search: {e}");
    }

    Ok(IngestResponse {
        message: "Content ingested successfully".to_string(),
        kind,
        link: link(kind, record.id()),
        id: record.id().to_string(),
    })
}

/// Axum handler for `POST /content`.
pub async fn ingest_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    axum::Json(request): axum::Json<IngestRequest>,
) -> Result<CamelJson<IngestResponse>, AppError> {
    let response = process_ingest(
        state.content_repo.as_ref(),
        state.search_index.as_ref(),
        request,
        &state.config.service_token,
    )
    .await?;

    Ok(CamelJson(response))
}
