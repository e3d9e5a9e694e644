//! Exclusion lists
//!
//! Caller-supplied selectors are parsed once per call; a selector that
//! does not parse is the only configuration error the pipeline reports.

use std::collections::HashSet;

use dom_query::Matcher;

use crate::dom::{Document, NodeId, NodeRef, Selection};
use crate::error::{Error, Result};

/// Tags and roles a candidate may never sit inside.
pub const EXCLUDED_CONTAINERS: &str = r#"nav, footer, aside, [role="navigation"], [role="contentinfo"], [role="complementary"]"#;

/// Parsed custom exclusion selectors.
#[derive(Default)]
pub struct CustomSelectors {
    matchers: Vec<Matcher>,
}

impl CustomSelectors {
    /// Parse every selector, failing on the first that is not valid CSS.
    pub fn parse(selectors: &[String]) -> Result<Self> {
        let matchers = selectors
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| Matcher::new(s).map_err(|_| Error::InvalidSelector(s.to_string())))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { matchers })
    }

    /// Parse strategy-provided selectors, skipping any that do not parse.
    #[must_use]
    pub fn parse_lenient(selectors: &[&str]) -> Self {
        Self {
            matchers: selectors.iter().filter_map(|s| Matcher::new(s).ok()).collect(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Matches of all selectors under `root`, in selector order.
    #[must_use]
    pub fn select_in<'a>(&self, root: &Selection<'a>) -> Vec<NodeRef<'a>> {
        self.matchers
            .iter()
            .flat_map(|m| root.select_matcher(m).nodes().to_vec())
            .collect()
    }
}

impl std::fmt::Debug for CustomSelectors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomSelectors")
            .field("count", &self.matchers.len())
            .finish()
    }
}

/// Node ids of every excluded container in a document.
#[derive(Debug, Default)]
pub struct ExcludedAncestors {
    ids: HashSet<NodeId>,
}

impl ExcludedAncestors {
    /// Collect structural exclusions plus matches of the custom selectors.
    #[must_use]
    pub fn collect(doc: &Document, custom: &CustomSelectors) -> Self {
        let mut ids: HashSet<NodeId> = doc
            .select(EXCLUDED_CONTAINERS)
            .nodes()
            .iter()
            .map(|n| n.id)
            .collect();
        ids.extend(custom.select_in(&doc.select("html")).iter().map(|n| n.id));
        Self { ids }
    }

    /// Whether the node or any of its ancestors is excluded.
    #[must_use]
    pub fn covers(&self, node: &NodeRef) -> bool {
        if self.ids.contains(&node.id) {
            return true;
        }
        let mut current = node.parent();
        while let Some(parent) = current {
            if self.ids.contains(&parent.id) {
                return true;
            }
            current = parent.parent();
        }
        false
    }
}
