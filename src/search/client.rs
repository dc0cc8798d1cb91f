use async_trait::async_trait;

use crate::db::models::ContentRecord;
use crate::error::AppError;
use crate::models::content::ContentKind;

/// Trait for full-text index operations, enabling mock testing.
///
/// Each content kind lives in its own index.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Add or update a single record in its kind's index.
    async fn index_record(&self, record: &ContentRecord) -> Result<(), AppError>;

    /// Ranked records of one kind matching `query`, at most `limit`.
    async fn search(
        &self,
        kind: ContentKind,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ContentRecord>, AppError>;

    /// Replace the whole index of `kind` with `records`.
    ///
    /// Returns the number of records indexed.
    async fn rebuild(&self, kind: ContentKind, records: &[ContentRecord])
        -> Result<usize, AppError>;

    /// Configure searchable/sortable attributes for every kind.
    /// Should be called once on startup.
    async fn configure_indexes(&self) -> Result<(), AppError>;
}

/// Meilisearch implementation of the SearchIndex.
pub struct MeilisearchIndex {
    client: meilisearch_sdk::client::Client,
    prefix: String,
}

impl MeilisearchIndex {
    /// Create with explicit values.
    ///
    /// `prefix` is prepended to every index name so several deployments can
    /// share one Meilisearch instance.
    pub fn new(
        url: &str,
        api_key: Option<String>,
        prefix: impl Into<String>,
    ) -> Result<Self, AppError> {
        let client = meilisearch_sdk::client::Client::new(url, api_key)
            .map_err(|e| AppError::Internal(format!("Failed to create Meilisearch client: {e}")))?;

        Ok(Self {
            client,
            prefix: prefix.into(),
        })
    }

    fn index_uid(&self, kind: ContentKind) -> String {
        format!("{}{}", self.prefix, kind.collection())
    }

    fn index(&self, kind: ContentKind) -> meilisearch_sdk::indexes::Index {
        self.client.index(self.index_uid(kind))
    }

    fn staging_uid(&self, kind: ContentKind) -> String {
        format!("{}_rebuild", self.index_uid(kind))
    }

    /// Wait for `task` and fail when Meilisearch reports it failed.
    async fn wait_for(
        &self,
        task: meilisearch_sdk::task_info::TaskInfo,
        uid: &str,
    ) -> Result<(), AppError> {
        let task = task.wait_for_completion(&self.client, None, None).await?;
        if task.is_failure() {
            return Err(AppError::Search(format!("Indexing task for '{uid}' failed")));
        }
        Ok(())
    }

    /// Wait for `task` whose failure is expected at times, e.g. creating an
    /// index that already exists.
    async fn settle(&self, task: meilisearch_sdk::task_info::TaskInfo) -> Result<(), AppError> {
        task.wait_for_completion(&self.client, None, None).await?;
        Ok(())
    }

    async fn apply_settings(
        &self,
        index: &meilisearch_sdk::indexes::Index,
        kind: ContentKind,
    ) -> Result<Vec<meilisearch_sdk::task_info::TaskInfo>, AppError> {
        let searchable = index
            .set_searchable_attributes(searchable_attributes(kind))
            .await
            .map_err(|e| AppError::Search(format!("Meilisearch config error: {e}")))?;
        let sortable = index
            .set_sortable_attributes(sortable_attributes(kind))
            .await
            .map_err(|e| AppError::Search(format!("Meilisearch config error: {e}")))?;

        Ok(vec![searchable, sortable])
    }
}

fn searchable_attributes(kind: ContentKind) -> Vec<&'static str> {
    let mut attributes = vec![kind.label_field(), kind.body_field()];
    match kind {
        ContentKind::Article => attributes.push("tags"),
        ContentKind::Product => attributes.push("category"),
        ContentKind::Page | ContentKind::Faq => {}
    }
    attributes
}

fn sortable_attributes(kind: ContentKind) -> Vec<&'static str> {
    match kind {
        ContentKind::Article => vec!["created_at", "published_at"],
        _ => vec!["created_at"],
    }
}

#[async_trait]
impl SearchIndex for MeilisearchIndex {
    async fn index_record(&self, record: &ContentRecord) -> Result<(), AppError> {
        let _task: meilisearch_sdk::task_info::TaskInfo = self
            .index(record.kind())
            .add_documents(std::slice::from_ref(record), Some("id"))
            .await
            .map_err(|e| AppError::Search(format!("Meilisearch index error: {e}")))?;

        Ok(())
    }

    async fn search(
        &self,
        kind: ContentKind,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ContentRecord>, AppError> {
        let results: meilisearch_sdk::search::SearchResults<ContentRecord> = self
            .index(kind)
            .search()
            .with_query(query)
            .with_limit(limit)
            .execute()
            .await
            .map_err(|e| AppError::Search(format!("Meilisearch search error: {e}")))?;

        Ok(results.hits.into_iter().map(|hit| hit.result).collect())
    }

    /// Fill a staging index and swap it with the live one, so a failed
    /// rebuild leaves the live index untouched.
    async fn rebuild(
        &self,
        kind: ContentKind,
        records: &[ContentRecord],
    ) -> Result<usize, AppError> {
        let live_uid = self.index_uid(kind);
        let staging_uid = self.staging_uid(kind);

        // Leftover from an interrupted rebuild
        self.settle(self.client.delete_index(&staging_uid).await?).await?;
        // Swapping needs both sides to exist
        self.settle(self.client.create_index(&live_uid, Some("id")).await?).await?;
        self.wait_for(
            self.client.create_index(&staging_uid, Some("id")).await?,
            &staging_uid,
        )
        .await?;

        let staging = self.client.index(&staging_uid);
        for task in self.apply_settings(&staging, kind).await? {
            self.wait_for(task, &staging_uid).await?;
        }

        if !records.is_empty() {
            let added = staging
                .add_documents(records, Some("id"))
                .await
                .map_err(|e| AppError::Search(format!("Meilisearch index error: {e}")))?;
            self.wait_for(added, &staging_uid).await?;
        }

        let swap = meilisearch_sdk::client::SwapIndexes {
            indexes: (live_uid.clone(), staging_uid.clone()),
            rename: None,
        };
        self.wait_for(self.client.swap_indexes([&swap]).await?, &live_uid).await?;

        // The staging uid now holds the previous documents
        if let Err(e) = self.client.delete_index(&staging_uid).await {
            tracing::warn!(index = %staging_uid, "Failed to drop replaced index: {e}");
        }

        tracing::info!(index = %live_uid, count = records.len(), "Rebuilt search index");
        Ok(records.len())
    }

    async fn configure_indexes(&self) -> Result<(), AppError> {
        for kind in ContentKind::ALL {
            self.apply_settings(&self.index(kind), kind).await?;
        }

        Ok(())
    }
}
