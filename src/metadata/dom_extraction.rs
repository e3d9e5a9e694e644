//! Metadata from the document body when `<head>` has nothing better.

use dom_query::{Document, Selection};

use crate::dom;

use super::PageMetadata;

/// Fill a missing title from `<title>`, then the first non-empty `<h1>`.
#[must_use]
pub fn extract_dom_title(doc: &Document, original: PageMetadata) -> PageMetadata {
    let mut result = original;
    if result.title.is_some() {
        return result;
    }

    result.title = title_element(doc).or_else(|| {
        doc.select("h1")
            .nodes()
            .iter()
            .map(|h1| dom::normalized_text(&Selection::from(*h1)))
            .find(|t| !t.is_empty())
    });
    result
}

/// Text of the `<title>` element, whitespace collapsed.
#[must_use]
pub fn title_element(doc: &Document) -> Option<String> {
    let title = doc.select("title").first();
    if title.is_empty() {
        return None;
    }
    let text = dom::text_content(&title)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    (!text.is_empty()).then_some(text)
}
