use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::content::ContentKind;
use crate::models::search::QueryLogEntry;

/// A blog article stored in the `articles` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Stable identifier, also the search index primary key.
    pub id: String,
    pub title: String,
    pub body: String,
    /// Tags for categorization.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Publication date; unpublished drafts have none.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A catalogue product stored in the `products` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// A static page stored in the `pages` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A question/answer pair stored in the `faqs` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faq {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub created_at: DateTime<Utc>,
}

/// Any native content record, tagged by kind.
///
/// The same tagged shape is stored in MongoDB and pushed to the search
/// index, so a hit can be decoded without knowing which index it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentRecord {
    Article(Article),
    Product(Product),
    Page(Page),
    Faq(Faq),
}

impl ContentRecord {
    pub fn kind(&self) -> ContentKind {
        match self {
            ContentRecord::Article(_) => ContentKind::Article,
            ContentRecord::Product(_) => ContentKind::Product,
            ContentRecord::Page(_) => ContentKind::Page,
            ContentRecord::Faq(_) => ContentKind::Faq,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ContentRecord::Article(a) => &a.id,
            ContentRecord::Product(p) => &p.id,
            ContentRecord::Page(p) => &p.id,
            ContentRecord::Faq(f) => &f.id,
        }
    }

    /// Value of the kind's label field (title, name or question).
    pub fn label(&self) -> &str {
        match self {
            ContentRecord::Article(a) => &a.title,
            ContentRecord::Product(p) => &p.name,
            ContentRecord::Page(p) => &p.title,
            ContentRecord::Faq(f) => &f.question,
        }
    }

    /// Value of the kind's primary body field.
    pub fn body(&self) -> &str {
        match self {
            ContentRecord::Article(a) => &a.body,
            ContentRecord::Product(p) => &p.description,
            ContentRecord::Page(p) => &p.content,
            ContentRecord::Faq(f) => &f.answer,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            ContentRecord::Article(a) => a.created_at,
            ContentRecord::Product(p) => p.created_at,
            ContentRecord::Page(p) => p.created_at,
            ContentRecord::Faq(f) => f.created_at,
        }
    }
}

/// A query log row as stored in the `search_logs` collection.
///
/// `created_at` is stored as a native BSON date so the collection can be
/// sorted server-side; `_id` is the insertion-order tie-breaker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryLogDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub query: String,
    #[serde(default)]
    pub client_address: Option<String>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl From<QueryLogEntry> for QueryLogDocument {
    fn from(entry: QueryLogEntry) -> Self {
        Self {
            id: None,
            query: entry.query,
            client_address: entry.client_address,
            created_at: entry.created_at,
        }
    }
}

impl From<QueryLogDocument> for QueryLogEntry {
    fn from(doc: QueryLogDocument) -> Self {
        Self {
            query: doc.query,
            client_address: doc.client_address,
            created_at: doc.created_at,
        }
    }
}

/// The request payload for the content ingest API.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestRequest {
    /// Service authentication token.
    pub service_token: String,
    /// The record to store, tagged by `kind`.
    #[serde(flatten)]
    pub content: NewContent,
}

/// Kind-specific fields of a record submitted for ingestion.
///
/// Identifiers are assigned by the server; timestamps default to now.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NewContent {
    Article {
        title: String,
        body: String,
        #[serde(default)]
        tags: Vec<String>,
        #[serde(default)]
        published_at: Option<DateTime<Utc>>,
        #[serde(default)]
        created_at: Option<DateTime<Utc>>,
    },
    Product {
        name: String,
        description: String,
        #[serde(default)]
        category: Option<String>,
        #[serde(default)]
        price: Option<f64>,
        #[serde(default)]
        created_at: Option<DateTime<Utc>>,
    },
    Page {
        title: String,
        content: String,
        #[serde(default)]
        created_at: Option<DateTime<Utc>>,
    },
    Faq {
        question: String,
        answer: String,
        #[serde(default)]
        created_at: Option<DateTime<Utc>>,
    },
}

impl NewContent {
    /// Build the stored record with the given identifier.
    pub fn into_record(self, id: String, now: DateTime<Utc>) -> ContentRecord {
        match self {
            NewContent::Article {
                title,
                body,
                tags,
                published_at,
                created_at,
            } => ContentRecord::Article(Article {
                id,
                title,
                body,
                tags,
                published_at,
                created_at: created_at.unwrap_or(now),
            }),
            NewContent::Product {
                name,
                description,
                category,
                price,
                created_at,
            } => ContentRecord::Product(Product {
                id,
                name,
                description,
                category,
                price,
                created_at: created_at.unwrap_or(now),
            }),
            NewContent::Page {
                title,
                content,
                created_at,
            } => ContentRecord::Page(Page {
                id,
                title,
                content,
                created_at: created_at.unwrap_or(now),
            }),
            NewContent::Faq {
                question,
                answer,
                created_at,
            } => ContentRecord::Faq(Faq {
                id,
                question,
                answer,
                created_at: created_at.unwrap_or(now),
            }),
        }
    }
}

/// Response from a successful ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    pub message: String,
    pub kind: ContentKind,
    pub id: String,
    pub link: String,
}
