use async_trait::async_trait;

use crate::db::models::QueryLogDocument;
use crate::error::AppError;
use crate::models::search::QueryLogEntry;

/// Repository trait for the append-only search query log.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueryLogRepository: Send + Sync {
    /// Append one entry.
    async fn record(&self, entry: QueryLogEntry) -> Result<(), AppError>;

    /// One page of entries, newest first, plus the total entry count.
    ///
    /// `page` is 1-based. Entries with the same `created_at` are returned
    /// newest-inserted first.
    async fn list(
        &self,
        per_page: usize,
        page: usize,
    ) -> Result<(Vec<QueryLogEntry>, u64), AppError>;
}

/// MongoDB implementation of the QueryLogRepository.
pub struct MongoQueryLogRepository {
    collection: mongodb::Collection<QueryLogDocument>,
}

impl MongoQueryLogRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("search_logs"),
        }
    }
}

#[async_trait]
impl QueryLogRepository for MongoQueryLogRepository {
    async fn record(&self, entry: QueryLogEntry) -> Result<(), AppError> {
        self.collection
            .insert_one(QueryLogDocument::from(entry))
            .await?;

        Ok(())
    }

    async fn list(
        &self,
        per_page: usize,
        page: usize,
    ) -> Result<(Vec<QueryLogEntry>, u64), AppError> {
        use futures::TryStreamExt;
        use mongodb::bson::doc;
        use mongodb::options::FindOptions;

        let total = self.collection.count_documents(doc! {}).await?;

        let skip = page.saturating_sub(1).saturating_mul(per_page);
        // ObjectIds grow with insertion, so `_id` breaks created_at ties.
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1, "_id": -1 })
            .skip(u64::try_from(skip).unwrap_or(u64::MAX))
            .limit(i64::try_from(per_page).unwrap_or(i64::MAX))
            .build();

        let cursor = self
            .collection
            .find(doc! {})
            .with_options(options)
            .await?;

        let documents: Vec<QueryLogDocument> = cursor.try_collect().await?;

        Ok((documents.into_iter().map(QueryLogEntry::from).collect(), total))
    }
}
