//! Aggressive Fallback
//!
//! Last resort once the retry budget is spent. Tries, in order:
//!
//! 1. the largest block container, if it validates after cleaning;
//! 2. every heading and substantial paragraph of the document, assembled
//!    into a synthetic container;
//! 3. the cleaned body, and failing that the body with only non-content
//!    tags and explicit selectors removed.
//!
//! The result is accepted unconditionally.

use crate::dom::{self, Document, NodeRef, Selection};
use crate::link_density;
use crate::selector::{ExcludedAncestors, BLOCK_CONTAINER_QUERY};

use super::cleaner::{self, Cleaned, CleaningRules};
use super::validator;

/// Which step of the fallback produced the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackSource {
    LargestBlock,
    HeadingsAndParagraphs,
    Body,
}

/// Run the aggressive fallback over the whole document.
#[must_use]
pub fn aggressive_fallback(
    doc: &Document,
    rules: &CleaningRules,
    excluded: &ExcludedAncestors,
    min_text_length: usize,
) -> (Cleaned, FallbackSource) {
    if let Some(block) = largest_block(doc, excluded) {
        let cleaned = cleaner::clean(&Selection::from(block), rules);
        if validator::validate(&cleaned.root(), min_text_length).is_valid() {
            tracing::debug!(removed = cleaned.removed, "fallback: largest block validated");
            return (cleaned, FallbackSource::LargestBlock);
        }
    }

    if let Some(cleaned) = headings_and_paragraphs(doc, rules, excluded) {
        tracing::debug!("fallback: assembled headings and paragraphs");
        return (cleaned, FallbackSource::HeadingsAndParagraphs);
    }

    let body = document_body(doc);
    let cleaned = cleaner::clean(&body, rules);
    if dom::has_text(&cleaned.root()) {
        tracing::debug!("fallback: cleaned body");
        return (cleaned, FallbackSource::Body);
    }

    tracing::debug!("fallback: body with boilerplate kept");
    let minimal = CleaningRules::minimal(rules.custom, rules.strategy);
    (cleaner::clean(&body, &minimal), FallbackSource::Body)
}

/// `<body>`, or the root element for documents without one.
#[must_use]
pub fn document_body(doc: &Document) -> Selection<'_> {
    let body = doc.select("body");
    if body.is_empty() {
        doc.select("html")
    } else {
        body
    }
}

/// The block container with the most text, first in document order on ties.
fn largest_block<'a>(doc: &'a Document, excluded: &ExcludedAncestors) -> Option<NodeRef<'a>> {
    let mut best: Option<(NodeRef<'a>, usize)> = None;
    for node in doc.select(BLOCK_CONTAINER_QUERY).nodes() {
        if excluded.covers(node) {
            continue;
        }
        let len = dom::text_length(&Selection::from(*node));
        if len > 0 && best.as_ref().is_none_or(|(_, best_len)| len > *best_len) {
            best = Some((*node, len));
        }
    }
    best.map(|(node, _)| node)
}

/// Headings and non-link paragraphs outside boilerplate, in document
/// order, wrapped in one `<div>` and cleaned.
fn headings_and_paragraphs(
    doc: &Document,
    rules: &CleaningRules,
    excluded: &ExcludedAncestors,
) -> Option<Cleaned> {
    let mut html = String::from("<div>");
    let mut kept = 0;

    for node in doc.select("h1, h2, h3, h4, h5, h6, p").nodes() {
        let sel = Selection::from(*node);
        if excluded.covers(node)
            || !dom::has_text(&sel)
            || dom::has_ancestor(&sel, |a| {
                !dom::is_one_of(a, &["body", "html"]) && rules.is_boilerplate(a)
            })
        {
            continue;
        }
        if dom::is_one_of(&sel, &["p"]) && link_density::is_link_dominated(&sel) {
            continue;
        }
        html.push_str(&sel.html());
        kept += 1;
    }

    if kept == 0 {
        return None;
    }
    html.push_str("</div>");

    let synthetic = dom::parse(&html);
    let cleaned = cleaner::clean(&dom::clone_root(&synthetic), rules);
    dom::has_text(&cleaned.root()).then_some(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::CustomSelectors;
    use crate::strategy::CleaningProfile;

    fn run(html: &str) -> (String, FallbackSource) {
        let doc = dom::parse(html);
        let none = CustomSelectors::default();
        let rules = CleaningRules {
            remove_ads: true,
            remove_navigation: true,
            profile: CleaningProfile::Standard,
            custom: &none,
            strategy: &none,
        };
        let excluded = ExcludedAncestors::collect(&doc, &none);
        let (cleaned, source) = aggressive_fallback(&doc, &rules, &excluded, 50);
        (dom::normalized_text(&cleaned.root()), source)
    }

    #[test]
    fn test_short_article_assembles_headings_and_paragraphs() {
        let (text, source) =
            run("<article><h1>T</h1><p>hello <b>world</b></p><nav>skip</nav></article>");
        assert_eq!(source, FallbackSource::HeadingsAndParagraphs);
        assert_eq!(text, "T hello world");
    }

    #[test]
    fn test_largest_valid_block_wins() {
        let para = "<p>Enough words in this paragraph to pass the minimum length.</p>";
        let html = format!(
            "<body><div id='small'><p>tiny</p></div><div id='big'><h2>Title</h2>{para}{para}</div></body>"
        );
        let (text, source) = run(&html);
        assert_eq!(source, FallbackSource::LargestBlock);
        assert!(text.starts_with("Title Enough words"));
        assert!(!text.contains("tiny"));
    }

    #[test]
    fn test_link_paragraphs_and_boilerplate_skipped() {
        let (text, _) = run(
            r#"<body><p><a href="/a">Home</a> <a href="/b">About</a></p>
               <div class="newsletter"><p>Subscribe today</p></div>
               <footer><p>Copyright</p></footer>
               <p>Real content</p></body>"#,
        );
        assert_eq!(text, "Real content");
    }

    #[test]
    fn test_body_text_without_blocks() {
        let (text, source) = run("<body>Just some loose text</body>");
        assert_eq!(source, FallbackSource::Body);
        assert_eq!(text, "Just some loose text");
    }

    #[test]
    fn test_navigation_only_page_still_produces_output() {
        let (text, source) = run(r#"<body><nav><a href="/">Home</a></nav></body>"#);
        assert_eq!(source, FallbackSource::Body);
        assert_eq!(text, "Home");
    }
}
