use serde::{Deserialize, Serialize};
use std::fmt;

/// The searchable content kinds.
///
/// Variant order is the order in which kinds are aggregated, so it also
/// decides tie-breaks between results with equal timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// Blog articles.
    Article,
    /// Catalogue products.
    Product,
    /// Static pages.
    Page,
    /// Frequently asked questions.
    Faq,
}

impl ContentKind {
    pub const ALL: [ContentKind; 4] = [
        ContentKind::Article,
        ContentKind::Product,
        ContentKind::Page,
        ContentKind::Faq,
    ];

    /// URL path segment used when building result links.
    pub fn path(&self) -> &'static str {
        match self {
            ContentKind::Article => "blog",
            ContentKind::Product => "products",
            ContentKind::Page => "pages",
            ContentKind::Faq => "faqs",
        }
    }

    /// Collection name in the store, also the base name of the search index.
    pub fn collection(&self) -> &'static str {
        match self {
            ContentKind::Article => "articles",
            ContentKind::Product => "products",
            ContentKind::Page => "pages",
            ContentKind::Faq => "faqs",
        }
    }

    /// The human-readable field used as result title and for suggestions.
    pub fn label_field(&self) -> &'static str {
        match self {
            ContentKind::Article | ContentKind::Page => "title",
            ContentKind::Product => "name",
            ContentKind::Faq => "question",
        }
    }

    /// The primary body field used for snippets.
    pub fn body_field(&self) -> &'static str {
        match self {
            ContentKind::Article => "body",
            ContentKind::Product => "description",
            ContentKind::Page => "content",
            ContentKind::Faq => "answer",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Article => write!(f, "article"),
            ContentKind::Product => write!(f, "product"),
            ContentKind::Page => write!(f, "page"),
            ContentKind::Faq => write!(f, "faq"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_as_snake_case() {
        let json = serde_json::to_string(&ContentKind::Faq).unwrap();
        assert_eq!(json, "\"faq\"");
    }

    #[test]
    fn test_label_fields() {
        let labels: Vec<&str> = ContentKind::ALL.iter().map(|k| k.label_field()).collect();
        assert_eq!(labels, vec!["title", "name", "title", "question"]);
    }
}
