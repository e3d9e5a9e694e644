//! Content Cleaner
//!
//! Removes disqualified descendants from a detached clone of the winning
//! candidate, in three steps:
//!
//! 1. non-content tags (`script`, `style`, `meta`, `noscript`, ...);
//! 2. structural boilerplate matched by tag, role, class or id;
//! 3. empty leaves, repeated bottom-up until nothing changes.
//!
//! The candidate root itself is never removed, and a second run over
//! cleaned output removes nothing.

use crate::dom::{self, Document, NodeId, NodeRef, Selection};
use crate::patterns::{
    ADVERTISEMENT_CLASS, BOILERPLATE_CLASS, NAVIGATION_CLASS, SOCIAL_CLASS, SUBSCRIBE_CLASS,
};
use crate::selector::CustomSelectors;
use crate::strategy::CleaningProfile;

/// Paragraphs that make a keyword-matched block worth keeping under the
/// permissive profile.
const PERMISSIVE_MIN_PARAGRAPHS: usize = 2;

/// Characters of text that make a keyword-matched block worth keeping
/// under the permissive profile.
const PERMISSIVE_MIN_TEXT: usize = 200;

/// What the cleaner removes in step 2.
#[derive(Debug, Clone, Copy)]
pub struct CleaningRules<'c> {
    /// Ad, sponsor, social and subscribe blocks.
    pub remove_ads: bool,
    /// Navigation, site chrome and page furniture.
    pub remove_navigation: bool,
    pub profile: CleaningProfile,
    /// Caller selectors, always removed.
    pub custom: &'c CustomSelectors,
    /// Strategy selectors, always removed.
    pub strategy: &'c CustomSelectors,
}

impl<'c> CleaningRules<'c> {
    /// Rules that only strip non-content tags and explicit selectors.
    #[must_use]
    pub fn minimal(custom: &'c CustomSelectors, strategy: &'c CustomSelectors) -> Self {
        Self {
            remove_ads: false,
            remove_navigation: false,
            profile: CleaningProfile::Standard,
            custom,
            strategy,
        }
    }

    /// Whether an element is boilerplate under these rules.
    ///
    /// Used by the fallback to filter ancestors as well.
    #[must_use]
    pub fn is_boilerplate(&self, sel: &Selection) -> bool {
        let tag = dom::tag_name(sel).unwrap_or_default();
        let role = dom::get_attribute(sel, "role")
            .unwrap_or_default()
            .to_ascii_lowercase();

        if self.remove_navigation {
            if matches!(tag.as_str(), "nav" | "footer" | "aside")
                || matches!(
                    role.as_str(),
                    "navigation" | "contentinfo" | "complementary" | "banner"
                )
            {
                return true;
            }
            // A header carrying the page title belongs to the article.
            if tag == "header" && !sel.select("h1").iter().any(|h| dom::has_text(&h)) {
                return true;
            }
        }

        let keywords = dom::id_and_class(sel);
        if keywords.is_empty() || dom::has_ancestor_tag(sel, &["pre", "code"]) {
            return false;
        }

        let keyword_match = (self.remove_navigation
            && (NAVIGATION_CLASS.is_match(&keywords) || BOILERPLATE_CLASS.is_match(&keywords)))
            || (self.remove_ads
                && (ADVERTISEMENT_CLASS.is_match(&keywords)
                    || SOCIAL_CLASS.is_match(&keywords)
                    || SUBSCRIBE_CLASS.is_match(&keywords)));

        keyword_match && !(self.profile == CleaningProfile::Permissive && is_substantial(sel))
    }
}

/// A block with real prose in it.
fn is_substantial(sel: &Selection) -> bool {
    (dom::paragraph_count(sel) >= PERMISSIVE_MIN_PARAGRAPHS
        || dom::text_length(sel) >= PERMISSIVE_MIN_TEXT)
        && !crate::link_density::is_link_dominated(sel)
}

/// A cleaned, detached copy of a candidate.
pub struct Cleaned {
    pub doc: Document,
    /// Elements removed across all steps.
    pub removed: usize,
}

impl Cleaned {
    /// The cleaned candidate root.
    #[must_use]
    pub fn root(&self) -> Selection<'_> {
        dom::clone_root(&self.doc)
    }
}

/// Clone `candidate` and clean the copy. The source document is untouched.
#[must_use]
pub fn clean(candidate: &Selection, rules: &CleaningRules) -> Cleaned {
    let doc = dom::clone_subtree(candidate);
    let removed = clean_in_place(&dom::clone_root(&doc), rules);
    Cleaned { doc, removed }
}

/// Clean a detached subtree in place, returning the number of removals.
pub fn clean_in_place(root: &Selection, rules: &CleaningRules) -> usize {
    let Some(root_node) = root.nodes().first().copied() else {
        return 0;
    };

    let mut removed = remove_matching(root_node, |sel| {
        dom::is_one_of(sel, dom::NON_CONTENT_TAGS)
    });

    let explicit: Vec<NodeRef> = rules
        .custom
        .select_in(root)
        .into_iter()
        .chain(rules.strategy.select_in(root))
        .collect();
    for node in explicit {
        if node.id != root_node.id && is_attached(&node, root_node.id) {
            tracing::trace!(tag = ?dom::node_tag(&node), "removing excluded selector match");
            Selection::from(node).remove();
            removed += 1;
        }
    }

    removed += remove_matching(root_node, |sel| rules.is_boilerplate(sel));
    removed += remove_empty_leaves(root_node);
    removed
}

/// Remove every descendant matching `pred`, outermost first.
fn remove_matching(root: NodeRef, pred: impl Fn(&Selection) -> bool) -> usize {
    let mut removed = 0;
    for node in root.descendants() {
        if !node.is_element() || node.id == root.id || !is_attached(&node, root.id) {
            continue;
        }
        let sel = Selection::from(node);
        if pred(&sel) {
            tracing::trace!(
                tag = ?dom::node_tag(&node),
                keywords = %dom::id_and_class(&sel),
                "removing boilerplate"
            );
            sel.remove();
            removed += 1;
        }
    }
    removed
}

/// Remove elements with neither text nor element children until a pass
/// changes nothing. Self-contained elements (`img`, `br`, `td`, ...) stay.
fn remove_empty_leaves(root: NodeRef) -> usize {
    let mut removed = 0;
    loop {
        let empties: Vec<NodeRef> = root
            .descendants()
            .into_iter()
            .filter(|n| n.is_element() && n.id != root.id && is_empty_leaf(n))
            .collect();
        if empties.is_empty() {
            return removed;
        }
        for node in empties {
            let sel = Selection::from(node);
            let inline_space = !node.text().is_empty()
                && !dom::node_tag(&node).is_some_and(|t| dom::is_block_tag(&t));
            if inline_space {
                // Keep the word gap a whitespace-only inline element provided.
                sel.replace_with_html(" ");
            } else {
                sel.remove();
            }
            removed += 1;
        }
    }
}

fn is_empty_leaf(node: &NodeRef) -> bool {
    if node.children().into_iter().any(|c| c.is_element()) {
        return false;
    }
    if dom::node_tag(node).is_some_and(|t| dom::SELF_CONTAINED_TAGS.contains(&t.as_str())) {
        return false;
    }
    node.text().trim().is_empty()
}

/// Whether `node` is still connected to the root it was found under.
fn is_attached(node: &NodeRef, root: NodeId) -> bool {
    if node.id == root {
        return true;
    }
    let mut current = node.parent();
    while let Some(parent) = current {
        if parent.id == root {
            return true;
        }
        current = parent.parent();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse;

    fn standard<'c>(custom: &'c CustomSelectors, strategy: &'c CustomSelectors) -> CleaningRules<'c> {
        CleaningRules {
            remove_ads: true,
            remove_navigation: true,
            profile: CleaningProfile::Standard,
            custom,
            strategy,
        }
    }

    #[test]
    fn test_removes_scripts_nav_and_ads() {
        let doc = parse(
            r#"<article><h1>Title</h1><script>track()</script><nav>skip</nav>
               <div class="ad-slot">Buy now</div><p>Body text here.</p></article>"#,
        );
        let none = CustomSelectors::default();
        let cleaned = clean(&doc.select("article"), &standard(&none, &none));
        let text = dom::normalized_text(&cleaned.root());

        assert_eq!(text, "Title Body text here.");
        assert!(cleaned.removed >= 3);
        // Source document untouched.
        assert_eq!(doc.select("nav").length(), 1);
    }

    #[test]
    fn test_header_with_title_is_kept() {
        let doc = parse(
            r#"<article><header><h1>Kept</h1></header> <header><a href="/">Home</a></header> <p>x</p></article>"#,
        );
        let none = CustomSelectors::default();
        let cleaned = clean(&doc.select("article"), &standard(&none, &none));
        let root = cleaned.root();

        assert_eq!(root.select("header").length(), 1);
        assert_eq!(dom::normalized_text(&root), "Kept x");
    }

    #[test]
    fn test_toggles_disable_groups() {
        let doc = parse(
            r#"<div id="r"><nav>Menu</nav> <div class="sponsored">Ad copy</div> <p>Body</p></div>"#,
        );
        let none = CustomSelectors::default();
        let rules = CleaningRules {
            remove_ads: false,
            remove_navigation: false,
            ..standard(&none, &none)
        };
        let cleaned = clean(&doc.select("#r"), &rules);
        assert_eq!(dom::normalized_text(&cleaned.root()), "Menu Ad copy Body");
    }

    #[test]
    fn test_custom_selectors_always_apply() {
        let doc = parse(r#"<div id="r"><p class="byline">By someone</p><p>Body</p></div>"#);
        let custom = CustomSelectors::parse(&[".byline".to_string()]).unwrap_or_default();
        let none = CustomSelectors::default();
        let rules = CleaningRules::minimal(&custom, &none);
        let cleaned = clean(&doc.select("#r"), &rules);
        assert_eq!(dom::normalized_text(&cleaned.root()), "Body");
    }

    #[test]
    fn test_empty_leaves_removed_to_fixpoint() {
        let doc = parse(
            r#"<div id="r"><div><span></span><p> </p></div><p>Text<img src="a.png"></p><table><tr><td></td></tr></table></div>"#,
        );
        let none = CustomSelectors::default();
        let cleaned = clean(&doc.select("#r"), &standard(&none, &none));
        let root = cleaned.root();

        assert_eq!(dom::element_children(&root).len(), 2);
        assert_eq!(root.select("img").length(), 1);
        assert_eq!(root.select("td").length(), 1);
    }

    #[test]
    fn test_permissive_profile_keeps_substantial_keyword_blocks() {
        let prose = "<p>A long paragraph of research prose that explains the method in detail.</p>".repeat(3);
        let html = format!(
            r#"<article><div class="promo-figure-wrapper">{prose}</div><div class="promo">Try it</div></article>"#
        );
        let doc = parse(&html);
        let none = CustomSelectors::default();

        let strict = clean(&doc.select("article"), &standard(&none, &none));
        assert!(strict.root().select("p").is_empty());

        let permissive = CleaningRules {
            profile: CleaningProfile::Permissive,
            ..standard(&none, &none)
        };
        let cleaned = clean(&doc.select("article"), &permissive);
        assert_eq!(cleaned.root().select("p").length(), 3);
        assert!(!dom::normalized_text(&cleaned.root()).contains("Try it"));
    }

    #[test]
    fn test_second_run_removes_nothing() {
        let doc = parse(
            r#"<main><aside>Related</aside><div><div><em></em></div></div><h2>Heading</h2>
               <div class="share-buttons">Share</div><p>One <span> </span>two</p></main>"#,
        );
        let none = CustomSelectors::default();
        let rules = standard(&none, &none);
        let cleaned = clean(&doc.select("main"), &rules);
        assert!(cleaned.removed > 0);

        assert_eq!(clean_in_place(&cleaned.root(), &rules), 0);
    }

    #[test]
    fn test_root_is_never_removed() {
        let doc = parse(r#"<div class="sidebar" id="r"><span></span></div>"#);
        let none = CustomSelectors::default();
        let cleaned = clean(&doc.select("#r"), &standard(&none, &none));
        assert_eq!(dom::tag_name(&cleaned.root()), Some("div".to_string()));
    }
}
