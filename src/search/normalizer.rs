use crate::db::models::ContentRecord;
use crate::models::content::ContentKind;
use crate::models::search::SearchResult;

/// Maximum number of visible characters kept in a snippet.
pub const SNIPPET_LENGTH: usize = 100;

/// Marker appended to truncated snippets.
pub const ELLIPSIS: &str = "...";

/// Map a native record to the shared result shape.
pub fn normalize(record: ContentRecord) -> SearchResult {
    let kind = record.kind();
    let link = link(kind, record.id());
    let snippet = snippet(record.body(), SNIPPET_LENGTH);
    let title = record.label().to_string();
    let created_at = record.created_at();

    let (published_at, price) = match &record {
        ContentRecord::Article(a) => (a.published_at, None),
        ContentRecord::Product(p) => (None, p.price),
        ContentRecord::Page(_) | ContentRecord::Faq(_) => (None, None),
    };

    SearchResult {
        kind,
        title,
        snippet,
        link,
        created_at,
        published_at,
        price,
    }
}

/// Relative link to a record, e.g. `/blog/42`.
pub fn link(kind: ContentKind, id: &str) -> String {
    format!("/{}/{}", kind.path(), id)
}

/// Keep the first `limit` characters of `text`.
///
/// Text that fits is returned unchanged; otherwise [`ELLIPSIS`] is appended
/// to the kept prefix. Counts `char`s, so multi-byte text is never split.
pub fn snippet(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{Article, Faq, Page, Product};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_snippet_short_text_is_unchanged() {
        assert_eq!(snippet("Short body", 100), "Short body");
        assert_eq!(snippet("", 100), "");
    }

    #[test]
    fn test_snippet_exact_length_has_no_marker() {
        let text = "a".repeat(100);
        assert_eq!(snippet(&text, 100), text);
    }

    #[test]
    fn test_snippet_truncates_long_text() {
        let text = "b".repeat(101);
        let result = snippet(&text, 100);
        assert!(result.ends_with(ELLIPSIS));
        assert_eq!(result.trim_end_matches(ELLIPSIS).chars().count(), 100);
    }

    #[test]
    fn test_snippet_counts_characters_not_bytes() {
        let text = "é".repeat(150);
        let result = snippet(&text, 100);
        assert_eq!(result, format!("{}...", "é".repeat(100)));
    }

    #[test]
    fn test_link_paths() {
        assert_eq!(link(ContentKind::Article, "7"), "/blog/7");
        assert_eq!(link(ContentKind::Product, "7"), "/products/7");
        assert_eq!(link(ContentKind::Page, "7"), "/pages/7");
        assert_eq!(link(ContentKind::Faq, "7"), "/faqs/7");
    }

    #[test]
    fn test_normalize_article_keeps_published_at() {
        let published = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let created = Utc.with_ymd_and_hms(2023, 12, 1, 0, 0, 0).unwrap();
        let result = normalize(ContentRecord::Article(Article {
            id: "a1".to_string(),
            title: "Hello World".to_string(),
            body: "First post".to_string(),
            tags: vec!["intro".to_string()],
            published_at: Some(published),
            created_at: created,
        }));

        assert_eq!(result.kind, ContentKind::Article);
        assert_eq!(result.title, "Hello World");
        assert_eq!(result.snippet, "First post");
        assert_eq!(result.link, "/blog/a1");
        assert_eq!(result.created_at, created);
        assert_eq!(result.published_at, Some(published));
        assert_eq!(result.price, None);
    }

    #[test]
    fn test_normalize_product_keeps_price() {
        let result = normalize(ContentRecord::Product(Product {
            id: "p1".to_string(),
            name: "Hello Gadget".to_string(),
            description: "x".repeat(120),
            category: Some("Electronics".to_string()),
            price: Some(49.5),
            created_at: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
        }));

        assert_eq!(result.title, "Hello Gadget");
        assert_eq!(result.price, Some(49.5));
        assert_eq!(result.published_at, None);
        assert_eq!(result.snippet.len(), 100 + ELLIPSIS.len());
    }

    #[test]
    fn test_normalize_page_and_faq_labels() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let page = normalize(ContentRecord::Page(Page {
            id: "pg".to_string(),
            title: "Shipping".to_string(),
            content: "We ship worldwide.".to_string(),
            created_at: created,
        }));
        let faq = normalize(ContentRecord::Faq(Faq {
            id: "fq".to_string(),
            question: "Do you ship abroad?".to_string(),
            answer: "Yes.".to_string(),
            created_at: created,
        }));

        assert_eq!(page.title, "Shipping");
        assert_eq!(page.link, "/pages/pg");
        assert_eq!(faq.title, "Do you ship abroad?");
        assert_eq!(faq.snippet, "Yes.");
        assert_eq!(faq.link, "/faqs/fq");
        assert!(faq.price.is_none() && faq.published_at.is_none());
    }
}
