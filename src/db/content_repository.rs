use async_trait::async_trait;

use crate::db::models::ContentRecord;
use crate::error::AppError;
use crate::models::content::ContentKind;

/// Repository trait for the content collections.
///
/// This trait allows mocking the database layer in tests.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Store a new record in its kind's collection.
    async fn insert(&self, record: &ContentRecord) -> Result<(), AppError>;

    /// All records of one kind, in insertion order.
    async fn list_all(&self, kind: ContentKind) -> Result<Vec<ContentRecord>, AppError>;

    /// Label-field values of `kind` containing `query` as a substring.
    ///
    /// Matching is case-insensitive; at most `limit` values are returned.
    async fn label_matches(
        &self,
        kind: ContentKind,
        query: &str,
        limit: usize,
    ) -> Result<Vec<String>, AppError>;
}

/// MongoDB implementation of the ContentRepository.
pub struct MongoContentRepository {
    db: mongodb::Database,
}

impl MongoContentRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self { db: db.clone() }
    }

    fn collection(&self, kind: ContentKind) -> mongodb::Collection<ContentRecord> {
        self.db.collection(kind.collection())
    }
}

#[async_trait]
impl ContentRepository for MongoContentRepository {
    async fn insert(&self, record: &ContentRecord) -> Result<(), AppError> {
        self.collection(record.kind()).insert_one(record).await?;

        Ok(())
    }

    async fn list_all(&self, kind: ContentKind) -> Result<Vec<ContentRecord>, AppError> {
        use futures::TryStreamExt;
        use mongodb::bson::doc;
        use mongodb::options::FindOptions;

        let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();

        let cursor = self
            .collection(kind)
            .find(doc! {})
            .with_options(options)
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn label_matches(
        &self,
        kind: ContentKind,
        query: &str,
        limit: usize,
    ) -> Result<Vec<String>, AppError> {
        use futures::TryStreamExt;
        use mongodb::bson::{doc, Document};
        use mongodb::options::FindOptions;

        let field = kind.label_field();
        let filter = doc! {
            field: { "$regex": regex::escape(query), "$options": "i" }
        };
        let options = FindOptions::builder()
            .projection(doc! { field: 1, "_id": 0 })
            .sort(doc! { "_id": 1 })
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .build();

        let mut cursor = self
            .db
            .collection::<Document>(kind.collection())
            .find(filter)
            .with_options(options)
            .await?;

        let mut labels = Vec::new();
        while let Some(doc) = cursor.try_next().await? {
            if let Ok(label) = doc.get_str(field) {
                labels.push(label.to_string());
            }
        }

        Ok(labels)
    }
}
