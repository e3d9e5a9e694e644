//! Conversion rules.
//!
//! A rule pairs a predicate with a handler. Rules are tried by descending
//! priority and the first match renders the node; the default rule matches
//! everything else. The built-in table is assembled once. A caller who
//! wants different behavior builds its own [`RuleSet`] up front; nothing
//! changes a rule set after it is built.

use std::sync::LazyLock;

use url::Url;

use crate::dom::{self, Selection};
use crate::patterns::{BLOCK_MARKER, ORDERED_MARKER};
use crate::url_utils;

use super::{code, table, text, ConvertContext, Mode};

/// Decides whether a rule applies. Must be total and side-effect free.
pub type Predicate = fn(&Selection, &ConvertContext) -> bool;

/// Renders a node from its already converted children.
pub type Handler = fn(&Selection, &str, &ConvertContext) -> String;

/// A named, prioritized conversion rule.
#[derive(Clone, Copy)]
pub struct ConversionRule {
    pub name: &'static str,
    pub priority: i32,
    pub predicate: Predicate,
    pub handler: Handler,
}

impl std::fmt::Debug for ConversionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversionRule")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

/// Tags whose content never reaches the output.
pub const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "head", "title", "meta", "link", "svg", "canvas",
    "button", "input", "select", "textarea", "iframe", "object", "embed",
];

/// Tags rendered as inline code.
pub const CODE_TAGS: &[&str] = &["code", "kbd", "samp", "tt"];

/// The rule that matches when nothing else does.
pub const DEFAULT_RULE: ConversionRule = ConversionRule {
    name: "default",
    priority: i32::MIN,
    predicate: |_, _| true,
    handler: default_handler,
};

/// Prioritized rule list with the default rule last.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<ConversionRule>,
}

static BUILTIN: LazyLock<RuleSet> = LazyLock::new(|| RuleSet::new(builtin_rules()));

impl RuleSet {
    /// Build a rule set. Rules are ordered by descending priority, ties keep
    /// the given order, and the default rule is appended.
    #[must_use]
    pub fn new(mut rules: Vec<ConversionRule>) -> Self {
        rules.retain(|r| r.name != DEFAULT_RULE.name);
        rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        Self { rules }
    }

    /// The built-in rules.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// A copy of this set with `rule` added, replacing any rule of the same name.
    #[must_use]
    pub fn with_rule(&self, rule: ConversionRule) -> Self {
        let mut rules: Vec<ConversionRule> =
            self.rules.iter().filter(|r| r.name != rule.name).copied().collect();
        rules.push(rule);
        Self::new(rules)
    }

    /// The first rule whose predicate accepts the node.
    #[must_use]
    pub fn find(&self, sel: &Selection, ctx: &ConvertContext) -> &ConversionRule {
        self.rules
            .iter()
            .find(|r| (r.predicate)(sel, ctx))
            .unwrap_or(&DEFAULT_RULE)
    }

    /// Rule names in evaluation order, `default` last.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.rules
            .iter()
            .map(|r| r.name)
            .chain(std::iter::once(DEFAULT_RULE.name))
            .collect()
    }
}

fn is(sel: &Selection, tags: &[&str]) -> bool {
    dom::is_one_of(sel, tags)
}

fn builtin_rules() -> Vec<ConversionRule> {
    vec![
        ConversionRule {
            name: "skip",
            priority: 1000,
            predicate: |sel, _| is(sel, SKIPPED_TAGS),
            handler: |_, _, _| String::new(),
        },
        ConversionRule {
            name: "raw-content",
            priority: 900,
            predicate: |_, ctx| ctx.mode != Mode::Normal,
            handler: raw_content,
        },
        ConversionRule {
            name: "heading",
            priority: 800,
            predicate: |sel, _| is(sel, &["h1", "h2", "h3", "h4", "h5", "h6"]),
            handler: heading,
        },
        ConversionRule {
            name: "code-block",
            priority: 790,
            predicate: |sel, _| is(sel, &["pre"]),
            handler: code_block,
        },
        ConversionRule {
            name: "inline-code",
            priority: 780,
            predicate: |sel, _| is(sel, CODE_TAGS),
            handler: inline_code,
        },
        ConversionRule {
            name: "list",
            priority: 700,
            predicate: |sel, _| is(sel, &["ul", "ol"]),
            handler: list,
        },
        ConversionRule {
            name: "list-item",
            priority: 690,
            predicate: |sel, _| is(sel, &["li"]),
            handler: list_item,
        },
        ConversionRule {
            name: "blockquote",
            priority: 680,
            predicate: |sel, _| is(sel, &["blockquote"]),
            handler: blockquote,
        },
        ConversionRule {
            name: "table",
            priority: 670,
            predicate: |sel, _| is(sel, &["table"]),
            handler: |sel, children, _| table::table(sel, children),
        },
        ConversionRule {
            name: "table-row",
            priority: 665,
            predicate: |sel, _| is(sel, &["tr"]),
            handler: |_, children, _| table::row(children),
        },
        ConversionRule {
            name: "table-cell",
            priority: 660,
            predicate: |sel, _| is(sel, &["td", "th"]),
            handler: |_, children, _| table::cell(children),
        },
        ConversionRule {
            name: "table-caption",
            priority: 655,
            predicate: |sel, _| is(sel, &["caption"]),
            handler: |_, children, _| {
                let caption = children.split_whitespace().collect::<Vec<_>>().join(" ");
                format!("{caption}\n")
            },
        },
        ConversionRule {
            name: "image",
            priority: 600,
            predicate: |sel, _| is(sel, &["img"]),
            handler: image,
        },
        ConversionRule {
            name: "link",
            priority: 590,
            predicate: |sel, _| is(sel, &["a"]),
            handler: link,
        },
        ConversionRule {
            name: "strong",
            priority: 500,
            predicate: |sel, _| is(sel, &["strong", "b"]),
            handler: |sel, children, _| nested_or_wrap(sel, children, &["strong", "b"], "**"),
        },
        ConversionRule {
            name: "emphasis",
            priority: 490,
            predicate: |sel, _| is(sel, &["em", "i"]),
            handler: |sel, children, _| nested_or_wrap(sel, children, &["em", "i"], "*"),
        },
        ConversionRule {
            name: "strikethrough",
            priority: 480,
            predicate: |sel, _| is(sel, &["del", "s", "strike"]),
            handler: |sel, children, _| {
                nested_or_wrap(sel, children, &["del", "s", "strike"], "~~")
            },
        },
        ConversionRule {
            name: "line-break",
            priority: 400,
            predicate: |sel, _| is(sel, &["br"]),
            handler: |_, _, _| "  \n".to_string(),
        },
        ConversionRule {
            name: "horizontal-rule",
            priority: 390,
            predicate: |sel, _| is(sel, &["hr"]),
            handler: |_, _, _| "\n\n---\n\n".to_string(),
        },
        ConversionRule {
            name: "paragraph",
            priority: 300,
            predicate: |sel, _| is(sel, &["p"]),
            handler: |_, children, _| block(children.trim()),
        },
    ]
}

fn block(content: &str) -> String {
    if content.trim().is_empty() {
        return String::new();
    }
    format!("\n\n{content}\n\n")
}

fn single_line(content: &str) -> String {
    content.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Inside `<pre>` or inline code everything is emitted as-is.
fn raw_content(sel: &Selection, children: &str, ctx: &ConvertContext) -> String {
    let tag = dom::tag_name(sel).unwrap_or_default();
    match (ctx.mode, tag.as_str()) {
        (Mode::Preformatted, "br") => "\n".to_string(),
        (_, "br") => " ".to_string(),
        (Mode::Preformatted, t) if dom::is_block_tag(t) && !children.ends_with('\n') => {
            format!("{children}\n")
        }
        _ => children.to_string(),
    }
}

fn heading(sel: &Selection, children: &str, _: &ConvertContext) -> String {
    let level = dom::tag_name(sel)
        .and_then(|t| t.strip_prefix('h').and_then(|n| n.parse::<usize>().ok()))
        .unwrap_or(1)
        .clamp(1, 6);
    let content = single_line(children);
    if content.is_empty() {
        return String::new();
    }
    format!("\n\n{} {content}\n\n", "#".repeat(level))
}

fn code_block(sel: &Selection, children: &str, _: &ConvertContext) -> String {
    let normalized = children.replace("\r\n", "\n");
    let raw = normalized.trim_start_matches('\n').trim_end();
    if raw.trim().is_empty() {
        return String::new();
    }
    let code = code::reconstruct_tree(raw).unwrap_or_else(|| raw.to_string());
    let language = code::detect_language(sel);
    format!("\n\n{}\n\n", code::fence(&code, language.as_deref()))
}

fn inline_code(_: &Selection, children: &str, _: &ConvertContext) -> String {
    let content = children.trim();
    if content.is_empty() {
        return String::new();
    }
    code::inline_code(content)
}

fn list(sel: &Selection, children: &str, _: &ConvertContext) -> String {
    let items = children.trim_matches('\n').trim_end();
    if items.trim().is_empty() {
        return String::new();
    }
    if dom::has_ancestor_tag(sel, &["li"]) {
        format!("\n{items}\n")
    } else {
        format!("\n\n{items}\n\n")
    }
}

fn list_item(sel: &Selection, children: &str, _: &ConvertContext) -> String {
    let parent = sel.parent();
    let marker = if dom::is_one_of(&parent, &["ol"]) {
        let start = dom::non_empty_attribute(&parent, "start")
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(1);
        let index = i64::try_from(dom::same_tag_index(sel)).unwrap_or(0);
        format!("{}. ", start.saturating_add(index))
    } else {
        "- ".to_string()
    };

    let content = children.trim();
    let body = text::indent_continuation(content, marker.len());
    format!("{}{body}\n", if content.is_empty() { marker.trim_end() } else { &marker })
}

fn blockquote(_: &Selection, children: &str, _: &ConvertContext) -> String {
    let content = children.trim();
    if content.is_empty() {
        return String::new();
    }
    format!("\n\n{}\n\n", text::quote_lines(content))
}

/// Resolved image URL from `src`, then the lazy-loading attributes.
#[must_use]
pub fn image_source(sel: &Selection, base: Option<&Url>) -> Option<String> {
    ["src", "data-src", "data-original"]
        .iter()
        .filter_map(|attr| dom::non_empty_attribute(sel, attr))
        .find_map(|value| url_utils::normalize_href(&value, base))
}

fn image(sel: &Selection, _: &str, ctx: &ConvertContext) -> String {
    let Some(src) = image_source(sel, ctx.options.base_url.as_ref()) else {
        return String::new();
    };
    let alt = single_line(&dom::get_attribute(sel, "alt").unwrap_or_default())
        .replace('[', "\\[")
        .replace(']', "\\]");
    format!("![{alt}]({})", escape_destination(&src))
}

fn link(sel: &Selection, children: &str, ctx: &ConvertContext) -> String {
    let href = dom::non_empty_attribute(sel, "href")
        .and_then(|href| url_utils::normalize_href(&href, ctx.options.base_url.as_ref()))
        .map(|href| escape_destination(&href));
    if children.contains("\n\n") {
        return block_link(children.trim(), href.as_deref());
    }

    let label = single_line(children);
    if label.is_empty() {
        return String::new();
    }
    let lead = if children.starts_with(char::is_whitespace) { " " } else { "" };
    let trail = if children.ends_with(char::is_whitespace) { " " } else { "" };

    match href {
        Some(href) => format!("{lead}[{label}]({href}){trail}"),
        None => format!("{lead}{label}{trail}"),
    }
}

/// A link wrapping whole blocks, as in card layouts. Only the first block
/// carries the link; a heading keeps its `#` prefix outside the label.
fn block_link(content: &str, href: Option<&str>) -> String {
    let Some(href) = href else {
        return block(content);
    };
    let (first, rest) = content.split_once("\n\n").unwrap_or((content, ""));

    let level = first.chars().take_while(|c| *c == '#').count();
    let linked = if (1..=6).contains(&level) && first[level..].starts_with(' ') {
        format!("{} [{}]({href})", &first[..level], single_line(&first[level..]))
    } else if first.contains('\n')
        || first.starts_with("```")
        || first.starts_with('|')
        || ORDERED_MARKER.is_match(first)
        || BLOCK_MARKER.is_match(first)
    {
        first.to_string()
    } else {
        format!("[{first}]({href})")
    };

    let rest = rest.trim_start_matches('\n');
    if rest.is_empty() {
        block(&linked)
    } else {
        block(&format!("{linked}\n\n{rest}"))
    }
}

fn escape_destination(url: &str) -> String {
    url.replace('(', "%28").replace(')', "%29").replace(' ', "%20")
}

fn nested_or_wrap(sel: &Selection, children: &str, tags: &[&str], delimiter: &str) -> String {
    if dom::has_ancestor_tag(sel, tags) {
        return children.to_string();
    }
    text::wrap_inline(children, delimiter)
}

fn default_handler(sel: &Selection, children: &str, _: &ConvertContext) -> String {
    let is_block = dom::tag_name(sel).is_some_and(|t| dom::is_block_tag(&t));
    if is_block {
        block(children.trim())
    } else {
        children.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order_is_by_priority() {
        let names = RuleSet::builtin().names();
        assert_eq!(names.first(), Some(&"skip"));
        assert_eq!(names.last(), Some(&"default"));
        let heading = names.iter().position(|n| *n == "heading");
        let paragraph = names.iter().position(|n| *n == "paragraph");
        assert!(heading < paragraph);
    }

    #[test]
    fn test_with_rule_replaces_by_name() {
        let custom = RuleSet::builtin().with_rule(ConversionRule {
            name: "horizontal-rule",
            priority: 390,
            predicate: |sel, _| is(sel, &["hr"]),
            handler: |_, _, _| "\n\n***\n\n".to_string(),
        });
        assert_eq!(custom.names().len(), RuleSet::builtin().names().len());
    }

    #[test]
    fn test_default_rule_cannot_be_displaced() {
        let set = RuleSet::new(vec![DEFAULT_RULE]);
        assert_eq!(set.names(), vec!["default"]);
    }
}
