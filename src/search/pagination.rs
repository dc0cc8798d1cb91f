use std::cmp::Reverse;

use chrono::{DateTime, Utc};

use crate::models::search::{PageMeta, Paginated, SearchResult};

/// Items that can be ordered newest-first.
pub trait Recency {
    /// The timestamp used as sort key; `None` sorts after every `Some`.
    fn effective_timestamp(&self) -> Option<DateTime<Utc>>;
}

impl Recency for SearchResult {
    fn effective_timestamp(&self) -> Option<DateTime<Utc>> {
        self.published_at.or(Some(self.created_at))
    }
}

/// Sort newest-first by effective timestamp.
///
/// The sort is stable: equal keys keep their input order, which keeps
/// repeated pagination over the same input deterministic.
pub fn order_by_recency<T: Recency>(items: &mut [T]) {
    // `None < Some(_)`, so reversing puts absent timestamps last.
    items.sort_by_key(|item| Reverse(item.effective_timestamp()));
}

/// A validated page request. Both fields are always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub per_page: usize,
    pub page: usize,
}

impl PageRequest {
    /// Build a request from raw client input.
    ///
    /// Missing `per_page` falls back to `default_per_page`; values below 1
    /// are clamped to 1. There is no upper bound.
    pub fn clamped(per_page: Option<i64>, page: Option<i64>, default_per_page: usize) -> Self {
        let per_page = match per_page {
            Some(n) if n >= 1 => usize::try_from(n).unwrap_or(usize::MAX),
            Some(_) => 1,
            None => default_per_page.max(1),
        };
        let page = match page {
            Some(n) if n >= 1 => usize::try_from(n).unwrap_or(usize::MAX),
            _ => 1,
        };

        Self { per_page, page }
    }

    /// Zero-based offset of the first item on this page.
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            per_page: 10,
            page: 1,
        }
    }
}

/// Slice one page out of an already ordered sequence.
///
/// Out-of-range pages yield an empty slice, never an error.
pub fn paginate<T>(items: Vec<T>, request: PageRequest, query: Option<String>) -> Paginated<T> {
    let total = items.len();
    let items = items
        .into_iter()
        .skip(request.offset())
        .take(request.per_page)
        .collect();

    Paginated {
        items,
        meta: meta(total, request, query),
    }
}

/// Metadata for a page whose slicing happened elsewhere (e.g. in the store).
pub fn meta(total: usize, request: PageRequest, query: Option<String>) -> PageMeta {
    PageMeta {
        total,
        per_page: request.per_page,
        current_page: request.page,
        query,
    }
}
