use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use serde::Serialize;

use crate::db::query_log_repository::QueryLogRepository;
use crate::error::AppError;
use crate::models::content::ContentKind;
use crate::models::search::{Paginated, QueryLogEntry, SearchResult};
use crate::search::normalizer::normalize;
use crate::search::pagination::{meta, order_by_recency, paginate, PageRequest};
use crate::search::provider::ContentProvider;

/// Outcome of reindexing one content kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReindexStatus {
    Ok,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KindReindex {
    pub kind: ContentKind,
    pub status: ReindexStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indexed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of [`SearchEngine::reindex_all`]. Kinds are not reindexed
/// atomically: each entry reports its own outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReindexReport {
    pub message: String,
    pub kinds: Vec<KindReindex>,
}

impl ReindexReport {
    /// `true` when every kind was reindexed.
    pub fn is_complete(&self) -> bool {
        self.kinds.iter().all(|k| k.status == ReindexStatus::Ok)
    }
}

/// Fans queries out to every content provider and merges the answers.
///
/// Providers are called concurrently, each bounded by `provider_timeout`.
/// A provider that fails or times out contributes nothing; the others
/// still answer.
pub struct SearchEngine {
    providers: Vec<Arc<dyn ContentProvider>>,
    query_log: Arc<dyn QueryLogRepository>,
    provider_timeout: Duration,
}

impl SearchEngine {
    pub fn new(
        providers: Vec<Arc<dyn ContentProvider>>,
        query_log: Arc<dyn QueryLogRepository>,
        provider_timeout: Duration,
    ) -> Self {
        Self {
            providers,
            query_log,
            provider_timeout,
        }
    }

    /// Search every content kind and return one recency-ordered page.
    ///
    /// A blank query is rejected before anything is logged.
    pub async fn unified_search(
        &self,
        query: &str,
        page: PageRequest,
        client_address: Option<String>,
    ) -> Result<Paginated<SearchResult>, AppError> {
        if query.trim().is_empty() {
            return Err(AppError::EmptyQuery);
        }

        self.record_query(query, client_address);

        let batches = self
            .fan_out("search", |provider| provider.search(query))
            .await;

        let mut results: Vec<SearchResult> =
            batches.into_iter().flatten().map(normalize).collect();
        order_by_recency(&mut results);

        tracing::debug!(query, total = results.len(), "Unified search complete");

        Ok(paginate(results, page, Some(query.to_string())))
    }

    /// Typeahead labels containing `query`, deduplicated in first-seen order.
    ///
    /// A blank query yields an empty page rather than an error.
    pub async fn suggestions(&self, query: &str, page: PageRequest) -> Paginated<String> {
        if query.trim().is_empty() {
            return paginate(Vec::new(), page, None);
        }

        let batches = self
            .fan_out("field_match", |provider| provider.field_match(query))
            .await;

        let mut seen = HashSet::new();
        let labels: Vec<String> = batches
            .into_iter()
            .flatten()
            .filter(|label| seen.insert(label.clone()))
            .collect();

        paginate(labels, page, Some(query.to_string()))
    }

    /// One page of the query log, newest first.
    pub async fn logs(&self, page: PageRequest) -> Result<Paginated<QueryLogEntry>, AppError> {
        let (items, total) = self.query_log.list(page.per_page, page.page).await?;
        let total = usize::try_from(total).unwrap_or(usize::MAX);

        Ok(Paginated {
            items,
            meta: meta(total, page, None),
        })
    }

    /// Rebuild the index of every content kind from the store.
    pub async fn reindex_all(&self) -> ReindexReport {
        let outcomes = join_all(self.providers.iter().map(|provider| async move {
            let kind = provider.kind();
            match provider.reindex().await {
                Ok(indexed) => KindReindex {
                    kind,
                    status: ReindexStatus::Ok,
                    indexed: Some(indexed),
                    error: None,
                },
                Err(e) => {
                    tracing::warn!(%kind, error = %e, "Reindex failed");
                    KindReindex {
                        kind,
                        status: ReindexStatus::Failed,
                        indexed: None,
                        error: Some(e.to_string()),
                    }
                }
            }
        }))
        .await;

        let names: Vec<&str> = outcomes.iter().map(|o| o.kind.collection()).collect();
        let failed: Vec<&str> = outcomes
            .iter()
            .filter(|o| o.status == ReindexStatus::Failed)
            .map(|o| o.kind.collection())
            .collect();

        let mut message = format!("Reindex triggered for {}", names.join(", "));
        if !failed.is_empty() {
            message.push_str(&format!(" (failed: {})", failed.join(", ")));
        }

        tracing::info!(kinds = names.len(), failed = failed.len(), "Reindex finished");

        ReindexReport {
            message,
            kinds: outcomes,
        }
    }

    /// Append to the query log without waiting for the write.
    fn record_query(&self, query: &str, client_address: Option<String>) {
        let query_log = Arc::clone(&self.query_log);
        let entry = QueryLogEntry {
            query: query.to_string(),
            client_address,
            created_at: Utc::now(),
        };

        tokio::spawn(async move {
            if let Err(e) = query_log.record(entry).await {
                tracing::warn!(error = %e, "Failed to record search query");
            }
        });
    }

    /// Call every provider concurrently and collect the answers in provider
    /// order. Failed or timed-out providers yield an empty batch.
    async fn fan_out<'a, T, F, Fut>(&'a self, operation: &'static str, call: F) -> Vec<Vec<T>>
    where
        F: Fn(&'a dyn ContentProvider) -> Fut,
        Fut: Future<Output = Result<Vec<T>, AppError>>,
    {
        let timeout = self.provider_timeout;

        let calls = self.providers.iter().map(|provider| {
            let provider: &'a dyn ContentProvider = &**provider;
            let pending = call(provider);
            async move {
                match tokio::time::timeout(timeout, pending).await {
                    Ok(Ok(items)) => items,
                    Ok(Err(e)) => {
                        tracing::warn!(
                            kind = %provider.kind(),
                            operation,
                            error = %e,
                            "Content provider failed, skipping"
                        );
                        Vec::new()
                    }
                    Err(_) => {
                        tracing::warn!(
                            kind = %provider.kind(),
                            operation,
                            timeout_ms = timeout.as_millis() as u64,
                            "Content provider timed out, skipping"
                        );
                        Vec::new()
                    }
                }
            }
        });

        join_all(calls).await
    }
}
