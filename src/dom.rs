//! DOM Operations Adapter
//!
//! Thin helpers over the `dom_query` crate used by every stage of the
//! pipeline. The host's document is only ever read through these; all
//! mutation happens on detached clones produced by [`clone_subtree`].

// Re-export core types for external use
pub use dom_query::{Document, NodeId, NodeRef, Selection};

// Re-export StrTendril for external use
pub use tendril::StrTendril;

use crate::patterns::WHITESPACE_NORMALIZE;

/// Tags rendered as blocks: separated from their siblings by a blank line.
pub const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "center", "dd", "details", "dialog",
    "dir", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2",
    "h3", "h4", "h5", "h6", "header", "hgroup", "hr", "html", "li", "main", "menu", "nav", "ol",
    "p", "pre", "section", "summary", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

/// Tags that never carry readable content.
pub const NON_CONTENT_TAGS: &[&str] = &[
    "script", "style", "meta", "noscript", "link", "template", "head", "title",
];

/// Elements that are meaningful even without text.
pub const SELF_CONTAINED_TAGS: &[&str] = &[
    "img", "br", "hr", "picture", "source", "video", "audio", "iframe", "embed", "object",
    "svg", "canvas", "input", "td", "th", "col", "colgroup", "math",
];

// === Attribute Operations ===

/// Get element ID attribute
#[inline]
#[must_use]
pub fn id(sel: &Selection) -> Option<String> {
    sel.attr("id").map(|s| s.to_string())
}

/// Get element class attribute
#[inline]
#[must_use]
pub fn class_name(sel: &Selection) -> Option<String> {
    sel.attr("class").map(|s| s.to_string())
}

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Get a non-empty, trimmed attribute value.
#[must_use]
pub fn non_empty_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `id` and `class` joined by a space, for keyword matching.
#[must_use]
pub fn id_and_class(sel: &Selection) -> String {
    let id = id(sel).unwrap_or_default();
    let class = class_name(sel).unwrap_or_default();
    if id.is_empty() {
        class
    } else if class.is_empty() {
        id
    } else {
        format!("{id} {class}")
    }
}

// === Tag/Node Information ===

/// Get tag name (lowercase)
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes().first().and_then(node_tag)
}

/// Tag name of a raw node (lowercase), `None` for non-elements.
#[must_use]
pub fn node_tag(node: &NodeRef) -> Option<String> {
    if !node.is_element() {
        return None;
    }
    node.node_name().map(|t| t.to_ascii_lowercase())
}

/// Check whether the selection's first node has one of the given tags.
#[must_use]
pub fn is_one_of(sel: &Selection, tags: &[&str]) -> bool {
    tag_name(sel).is_some_and(|t| tags.contains(&t.as_str()))
}

/// Whether a tag renders as a block.
#[inline]
#[must_use]
pub fn is_block_tag(tag: &str) -> bool {
    BLOCK_TAGS.contains(&tag)
}

// === Text Content ===

/// Get all text content of node and descendants
///
/// Returns `StrTendril` for zero-copy passing.
#[inline]
#[must_use]
pub fn text_content(sel: &Selection) -> StrTendril {
    sel.text()
}

/// Readable text: block boundaries become spaces, non-content tags are
/// skipped, whitespace runs collapse to one space.
#[must_use]
pub fn normalized_text(sel: &Selection) -> String {
    let mut raw = String::new();
    if let Some(node) = sel.nodes().first() {
        collect_text(node, &mut raw);
    }
    WHITESPACE_NORMALIZE.replace_all(raw.trim(), " ").into_owned()
}

fn collect_text(node: &NodeRef, out: &mut String) {
    if node.is_text() {
        out.push_str(&node.text());
        return;
    }
    let tag = node_tag(node);
    if tag.as_deref().is_some_and(|t| NON_CONTENT_TAGS.contains(&t)) {
        return;
    }
    let block = tag.as_deref().is_some_and(|t| is_block_tag(t) || t == "br");
    if block {
        out.push(' ');
    }
    for child in node.children() {
        collect_text(&child, out);
    }
    if block {
        out.push(' ');
    }
}

/// Character count of [`normalized_text`].
#[must_use]
pub fn text_length(sel: &Selection) -> usize {
    normalized_text(sel).chars().count()
}

/// Count descendants matching a CSS selector.
#[inline]
#[must_use]
pub fn count(sel: &Selection, selector: &str) -> usize {
    sel.select(selector).length()
}

/// Number of `<p>` descendants carrying non-whitespace text.
#[must_use]
pub fn paragraph_count(sel: &Selection) -> usize {
    sel.select("p")
        .iter()
        .filter(|p| !p.text().trim().is_empty())
        .count()
}

/// Number of `<h1>`..`<h6>` descendants carrying non-whitespace text.
#[must_use]
pub fn heading_count(sel: &Selection) -> usize {
    sel.select("h1, h2, h3, h4, h5, h6")
        .iter()
        .filter(|h| !h.text().trim().is_empty())
        .count()
}

/// Whether the selection's subtree has any non-whitespace text node.
#[must_use]
pub fn has_text(sel: &Selection) -> bool {
    sel.nodes().first().is_some_and(|root| {
        root.descendants().into_iter().any(|n| {
            n.is_text()
                && !n.text().trim().is_empty()
                && !n
                    .parent()
                    .as_ref()
                    .and_then(node_tag)
                    .is_some_and(|t| NON_CONTENT_TAGS.contains(&t.as_str()))
        })
    })
}

// === Tree Navigation ===

/// Get direct element children of the first node.
#[must_use]
pub fn element_children<'a>(sel: &Selection<'a>) -> Vec<NodeRef<'a>> {
    sel.nodes()
        .first()
        .map(|n| n.children().into_iter().filter(NodeRef::is_element).collect())
        .unwrap_or_default()
}

/// Walk up from the node (excluding itself) and test each element ancestor.
#[must_use]
pub fn has_ancestor(sel: &Selection, pred: impl Fn(&Selection) -> bool) -> bool {
    let Some(node) = sel.nodes().first() else {
        return false;
    };
    let mut current = node.parent();
    while let Some(parent) = current {
        if parent.is_element() && pred(&Selection::from(parent)) {
            return true;
        }
        current = parent.parent();
    }
    false
}

/// Whether the node has an ancestor with one of the given tags.
#[must_use]
pub fn has_ancestor_tag(sel: &Selection, tags: &[&str]) -> bool {
    has_ancestor(sel, |a| is_one_of(a, tags))
}

/// Position of this element among its element siblings with the same tag.
#[must_use]
pub fn same_tag_index(sel: &Selection) -> usize {
    let Some(node) = sel.nodes().first() else {
        return 0;
    };
    let tag = node_tag(node);
    let mut index = 0;
    let mut sibling = node.prev_sibling();
    while let Some(s) = sibling {
        if s.is_element() && node_tag(&s) == tag {
            index += 1;
        }
        sibling = s.prev_sibling();
    }
    index
}

// === Cloning ===

/// Deep-clone a subtree into a detached document.
///
/// The host's document is never touched. Returns the new document; use
/// [`clone_root`] to get at the cloned element inside it.
#[must_use]
pub fn clone_subtree(sel: &Selection) -> Document {
    let tag = tag_name(sel).unwrap_or_default();
    match tag.as_str() {
        // The document roots and table parts cannot be reparsed on their own.
        "html" | "body" | "td" | "th" | "tr" | "thead" | "tbody" | "tfoot" | "caption" => {
            Document::from(format!("<div>{}</div>", sel.inner_html()))
        }
        _ => Document::from(sel.html().to_string()),
    }
}

/// The cloned element of a document built by [`clone_subtree`] or by
/// parsing a single fragment.
#[must_use]
pub fn clone_root(doc: &Document) -> Selection<'_> {
    let body = doc.select("body");
    let first = doc.select("body > *");
    let loose_text = body.nodes().first().is_some_and(|b| {
        b.children()
            .into_iter()
            .any(|c| c.is_text() && !c.text().trim().is_empty())
    });
    if first.length() == 1 && !loose_text {
        return first;
    }
    body
}

// === Parsing ===

/// Parse HTML string into document
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_select() {
        let doc = parse(r#"<div id="main" class="container">content</div>"#);
        let div = doc.select("div");

        assert_eq!(id(&div), Some("main".to_string()));
        assert_eq!(class_name(&div), Some("container".to_string()));
        assert_eq!(id_and_class(&div), "main container");
    }

    #[test]
    fn test_missing_attributes_return_none() {
        let doc = parse(r#"<div>no attributes</div>"#);
        let div = doc.select("div");

        assert_eq!(id(&div), None);
        assert_eq!(class_name(&div), None);
        assert_eq!(non_empty_attribute(&div, "href"), None);
        assert_eq!(id_and_class(&div), "");
    }

    #[test]
    fn test_tag_name_lowercase() {
        let doc = parse(r#"<ARTICLE><Section>content</Section></ARTICLE>"#);

        assert_eq!(tag_name(&doc.select("article")), Some("article".to_string()));
        assert_eq!(tag_name(&doc.select("section")), Some("section".to_string()));
        assert!(is_one_of(&doc.select("section"), &["main", "section"]));
    }

    #[test]
    fn test_normalized_text() {
        let doc = parse("<div>\n  hello \n\n <b>world</b>  </div>");
        let div = doc.select("div");

        assert_eq!(normalized_text(&div), "hello world");
        assert_eq!(text_length(&div), 11);
    }

    #[test]
    fn test_paragraph_and_heading_counts_skip_empty() {
        let doc = parse("<div><h2>A</h2><h3> </h3><p>one</p><p></p><p>two</p></div>");
        let div = doc.select("div");

        assert_eq!(paragraph_count(&div), 2);
        assert_eq!(heading_count(&div), 1);
    }

    #[test]
    fn test_has_text_ignores_scripts() {
        let doc = parse("<div><script>var x = 1;</script>  </div>");
        assert!(!has_text(&doc.select("div")));

        let doc = parse("<div><span>x</span></div>");
        assert!(has_text(&doc.select("div")));
    }

    #[test]
    fn test_has_ancestor_tag() {
        let doc = parse("<nav><ul><li><a id='x'>Home</a></li></ul></nav><p id='y'>t</p>");

        assert!(has_ancestor_tag(&doc.select("#x"), &["nav"]));
        assert!(!has_ancestor_tag(&doc.select("#y"), &["nav"]));
    }

    #[test]
    fn test_same_tag_index() {
        let doc = parse("<ol><li>a</li> <li>b</li> <li id='c'>c</li></ol>");
        assert_eq!(same_tag_index(&doc.select("#c")), 2);
    }

    #[test]
    fn test_clone_subtree_is_detached() {
        let doc = parse(r#"<body><article id="a"><p>text</p></article></body>"#);
        let article = doc.select("#a");

        let cloned = clone_subtree(&article);
        let root = clone_root(&cloned);
        assert_eq!(tag_name(&root), Some("article".to_string()));

        root.select("p").remove();
        assert!(cloned.select("p").is_empty());
        assert_eq!(doc.select("p").length(), 1);
    }

    #[test]
    fn test_clone_subtree_of_table_cell() {
        let doc = parse("<table><tr><td id='c'><p>cell text</p></td></tr></table>");
        let cloned = clone_subtree(&doc.select("#c"));
        let root = clone_root(&cloned);

        assert_eq!(tag_name(&root), Some("div".to_string()));
        assert_eq!(normalized_text(&root), "cell text");
    }

    #[test]
    fn test_element_children_skip_text() {
        let doc = parse("<ul> <li>1</li> text <li>2</li></ul>");
        assert_eq!(element_children(&doc.select("ul")).len(), 2);
    }
}
