use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::content::ContentKind;

/// A normalized search hit, shared by all content kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub kind: ContentKind,
    pub title: String,
    /// Leading part of the record body, see [`crate::search::normalizer::snippet`].
    pub snippet: String,
    pub link: String,
    pub created_at: DateTime<Utc>,
    /// Only set for articles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    /// Only set for products.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

/// One recorded unified-search invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryLogEntry {
    pub query: String,
    #[serde(default)]
    pub client_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Pagination metadata returned alongside every page of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMeta {
    pub total: usize,
    pub per_page: usize,
    pub current_page: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

/// A page of items plus its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T: Serialize> Paginated<T> {
    /// Serialize as `{ <items_key>: [...], meta: {...} }`.
    pub fn envelope(&self, items_key: &str) -> Result<serde_json::Value, serde_json::Error> {
        let mut body = serde_json::Map::new();
        body.insert(items_key.to_string(), serde_json::to_value(&self.items)?);
        body.insert("meta".to_string(), serde_json::to_value(&self.meta)?);
        Ok(serde_json::Value::Object(body))
    }
}
