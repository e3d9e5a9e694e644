//! Markdown Conversion
//!
//! Rule-based HTML to Markdown conversion. The tree is walked post-order:
//! children are converted first, then the highest-priority rule matching
//! the element renders it from its children's output. Text inside `<pre>`
//! and inline code is emitted raw; everywhere else it is whitespace-
//! collapsed and escaped exactly once.
//!
//! # Example
//!
//! ```
//! use rs_markclip::dom;
//! use rs_markclip::markdown::{convert, ConvertOptions};
//!
//! let doc = dom::parse("<div><h1>T</h1><p>hello <b>world</b></p></div>");
//! let md = convert(&doc.select("div"), &ConvertOptions::default());
//! assert_eq!(md, "# T\n\nhello **world**");
//! ```

pub mod code;
pub mod rules;
pub mod table;
pub mod text;

use url::Url;

use crate::dom::{self, NodeRef, Selection};

pub use rules::{image_source, ConversionRule, RuleSet};

/// Inline tags that do not interrupt the start of a block.
const TRANSPARENT_INLINE: &[&str] = &[
    "span", "font", "small", "big", "abbr", "cite", "dfn", "time", "mark", "u", "ins", "sub",
    "sup", "label", "bdi", "bdo", "data", "var", "q",
];

/// Containers whose whitespace-only text nodes are layout, not content.
const STRUCTURAL_TAGS: &[&str] = &["table", "thead", "tbody", "tfoot", "tr", "ul", "ol", "dl"];

/// Options for a single conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Keep line breaks inside text nodes instead of folding them into spaces.
    pub preserve_formatting: bool,

    /// Base for resolving relative link and image URLs.
    pub base_url: Option<Url>,
}

/// How text is treated in the current subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Collapsed and escaped.
    Normal,
    /// Inside `<pre>`: verbatim.
    Preformatted,
    /// Inside inline code: verbatim but on one line.
    Literal,
}

/// State passed to every rule.
#[derive(Debug, Clone, Copy)]
pub struct ConvertContext<'o> {
    pub options: &'o ConvertOptions,
    pub mode: Mode,
}

impl ConvertContext<'_> {
    /// Context for the children of an element with `tag`.
    fn enter(self, tag: &str) -> Self {
        let mode = match (self.mode, tag) {
            (_, "pre") => Mode::Preformatted,
            (Mode::Normal, t) if rules::CODE_TAGS.contains(&t) => Mode::Literal,
            (mode, _) => mode,
        };
        Self { mode, ..self }
    }
}

/// Converts HTML subtrees with a fixed rule set.
#[derive(Debug)]
pub struct MarkdownConverter<'r> {
    rules: &'r RuleSet,
    options: ConvertOptions,
}

impl MarkdownConverter<'static> {
    /// Converter with the built-in rules.
    #[must_use]
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            rules: RuleSet::builtin(),
            options,
        }
    }
}

impl<'r> MarkdownConverter<'r> {
    /// Converter with a caller-built rule set.
    #[must_use]
    pub fn with_rules(rules: &'r RuleSet, options: ConvertOptions) -> Self {
        Self { rules, options }
    }

    /// Convert the first node of `root` and normalize the result.
    #[must_use]
    pub fn convert(&self, root: &Selection) -> String {
        let Some(node) = root.nodes().first() else {
            return String::new();
        };
        let ctx = ConvertContext {
            options: &self.options,
            mode: Mode::Normal,
        };
        text::normalize_output(&self.convert_node(node, ctx))
    }

    fn convert_node(&self, node: &NodeRef, ctx: ConvertContext) -> String {
        if node.is_text() {
            return render_text(node, &ctx);
        }
        let Some(tag) = dom::node_tag(node) else {
            return self.convert_children(node, ctx);
        };

        let sel = Selection::from(*node);
        let rule = self.rules.find(&sel, &ctx);
        if rule.name == "skip" {
            return String::new();
        }
        let children = self.convert_children(node, ctx.enter(&tag));
        tracing::trace!(tag = %tag, rule = rule.name, "convert");
        (rule.handler)(&sel, &children, &ctx)
    }

    fn convert_children(&self, node: &NodeRef, ctx: ConvertContext) -> String {
        let mut out = String::new();
        for child in node.children() {
            let piece = self.convert_node(&child, ctx);
            join(&mut out, &piece, ctx.mode);
        }
        out
    }
}

/// Convert `root` with the built-in rules.
#[must_use]
pub fn convert(root: &Selection, options: &ConvertOptions) -> String {
    MarkdownConverter::new(options.clone()).convert(root)
}

/// Append a converted child, keeping spacing sane at block boundaries.
fn join(out: &mut String, piece: &str, mode: Mode) {
    if piece.is_empty() {
        return;
    }
    if mode == Mode::Preformatted {
        out.push_str(piece);
        return;
    }

    let mut piece = piece;
    if out.ends_with('\n') {
        piece = piece.trim_start_matches([' ', '\t']);
    } else if out.ends_with(' ') && piece.starts_with(' ') {
        piece = piece.trim_start_matches(' ');
    }
    if piece.starts_with('\n') {
        let kept = out.trim_end_matches([' ', '\t']).len();
        out.truncate(kept);
    }
    out.push_str(piece);
}

fn render_text(node: &NodeRef, ctx: &ConvertContext) -> String {
    let raw = node.text();
    match ctx.mode {
        Mode::Preformatted => return raw.to_string(),
        Mode::Literal => return text::collapse_whitespace(&raw, false),
        Mode::Normal => {}
    }

    if raw.trim().is_empty() {
        let structural = node
            .parent()
            .as_ref()
            .and_then(dom::node_tag)
            .is_some_and(|t| STRUCTURAL_TAGS.contains(&t.as_str()));
        if structural {
            return String::new();
        }
    }

    let preserve = ctx.options.preserve_formatting;
    let escaped = text::escape_markdown(&text::collapse_whitespace(&raw, preserve));
    let at_block_start = starts_block(node);

    if !preserve {
        return if at_block_start {
            text::escape_block_start(&escaped)
        } else {
            escaped
        };
    }

    escaped
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            if i > 0 || at_block_start {
                text::escape_block_start(line)
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Whether the text node is the first visible content of its block.
fn starts_block(node: &NodeRef) -> bool {
    let mut current = *node;
    loop {
        let mut sibling = current.prev_sibling();
        while let Some(prev) = sibling {
            if dom::node_tag(&prev).as_deref() == Some("br") {
                return true;
            }
            if renders_content(&prev) {
                return false;
            }
            sibling = prev.prev_sibling();
        }

        let Some(parent) = current.parent() else {
            return true;
        };
        match dom::node_tag(&parent) {
            None => return true,
            Some(tag) if dom::is_block_tag(&tag) => return true,
            Some(tag) if TRANSPARENT_INLINE.contains(&tag.as_str()) => current = parent,
            Some(_) => return false,
        }
    }
}

fn renders_content(node: &NodeRef) -> bool {
    if node.is_text() {
        return !node.text().trim().is_empty();
    }
    match dom::node_tag(node) {
        Some(tag) if matches!(tag.as_str(), "img" | "br" | "hr") => true,
        Some(tag) if rules::SKIPPED_TAGS.contains(&tag.as_str()) => false,
        Some(_) => !node.text().trim().is_empty(),
        None => false,
    }
}
