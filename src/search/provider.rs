use std::sync::Arc;

use async_trait::async_trait;

use crate::db::content_repository::ContentRepository;
use crate::db::models::ContentRecord;
use crate::error::AppError;
use crate::models::content::ContentKind;
use crate::search::client::SearchIndex;

/// One searchable content kind.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// The kind this provider serves.
    fn kind(&self) -> ContentKind;

    /// Ranked records matching `query`, capped at the provider's search limit.
    async fn search(&self, query: &str) -> Result<Vec<ContentRecord>, AppError>;

    /// Label values containing `query`, capped at the provider's match limit.
    async fn field_match(&self, query: &str) -> Result<Vec<String>, AppError>;

    /// Rebuild this kind's index from the store. Returns the indexed count.
    async fn reindex(&self) -> Result<usize, AppError>;
}

/// Provider backed by the full-text index for search and by the store for
/// label matching and reindexing.
pub struct IndexedContentProvider {
    kind: ContentKind,
    repo: Arc<dyn ContentRepository>,
    index: Arc<dyn SearchIndex>,
    search_limit: usize,
    match_limit: usize,
}

impl IndexedContentProvider {
    pub fn new(
        kind: ContentKind,
        repo: Arc<dyn ContentRepository>,
        index: Arc<dyn SearchIndex>,
        search_limit: usize,
        match_limit: usize,
    ) -> Self {
        Self {
            kind,
            repo,
            index,
            search_limit,
            match_limit,
        }
    }
}

#[async_trait]
impl ContentProvider for IndexedContentProvider {
    fn kind(&self) -> ContentKind {
        self.kind
    }

    async fn search(&self, query: &str) -> Result<Vec<ContentRecord>, AppError> {
        let mut records = self
            .index
            .search(self.kind, query, self.search_limit)
            .await?;
        records.retain(|r| r.kind() == self.kind);
        records.truncate(self.search_limit);
        Ok(records)
    }

    async fn field_match(&self, query: &str) -> Result<Vec<String>, AppError> {
        self.repo
            .label_matches(self.kind, query, self.match_limit)
            .await
    }

    async fn reindex(&self) -> Result<usize, AppError> {
        let records = self.repo.list_all(self.kind).await?;
        self.index.rebuild(self.kind, &records).await
    }
}

/// One provider per content kind, in aggregation order.
pub fn providers_for(
    repo: Arc<dyn ContentRepository>,
    index: Arc<dyn SearchIndex>,
    search_limit: usize,
    match_limit: usize,
) -> Vec<Arc<dyn ContentProvider>> {
    ContentKind::ALL
        .into_iter()
        .map(|kind| {
            Arc::new(IndexedContentProvider::new(
                kind,
                repo.clone(),
                index.clone(),
                search_limit,
                match_limit,
            )) as Arc<dyn ContentProvider>
        })
        .collect()
}
