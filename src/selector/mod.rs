//! Candidate Selector
//!
//! Runs the selector groups of the resolved strategies against the
//! document and yields candidate batches lazily:
//!
//! 1. every selector group of every strategy, in resolution order, as one
//!    batch so that scoring picks the winner across groups;
//! 2. document-wide semantic containers (`main`, `article`, `role=main`);
//! 3. every block container with enough text.
//!
//! Empty batches are skipped. Group order still matters for ties: each
//! candidate keeps the position of the group that first found it, and the
//! ranker prefers the earlier group when scores are equal. The two
//! fallback batches are only produced when nothing before them validated.

use std::collections::HashSet;

use crate::dom::{self, Document, NodeId, NodeRef, Selection};
use crate::strategy::{SelectorGroup, SiteStrategy};

pub mod exclusion;

pub use exclusion::{CustomSelectors, ExcludedAncestors};

/// Document-wide semantic containers.
pub const SEMANTIC_QUERY: &str = r#"main, article, [role="main"]"#;

/// Block containers considered as a last resort.
pub const BLOCK_CONTAINER_QUERY: &str = "article, main, section, div, td, blockquote";

/// A located, unscored candidate.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a, 'r> {
    /// Candidate root in the source document.
    pub node: NodeRef<'a>,
    /// Strategy whose query found it; its scoring config applies.
    pub strategy: &'r SiteStrategy,
    /// Name of the selector group, or of the fallback query, that found it.
    pub group: &'static str,
    /// Position of that group in the overall search order.
    pub group_index: usize,
}

/// Where a batch came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchSource {
    SelectorGroups,
    Semantic,
    BlockContainers,
}

/// Candidates produced by one search step.
#[derive(Debug, Clone)]
pub struct CandidateBatch<'a, 'r> {
    pub source: BatchSource,
    pub candidates: Vec<Candidate<'a, 'r>>,
}

const STEPS: [BatchSource; 3] = [
    BatchSource::SelectorGroups,
    BatchSource::Semantic,
    BatchSource::BlockContainers,
];

/// Lazy producer of candidate batches.
pub struct CandidateSelector<'a, 'r> {
    doc: &'a Document,
    groups: Vec<(&'r SiteStrategy, &'r SelectorGroup)>,
    next_step: usize,
    primary: &'r SiteStrategy,
    excluded: ExcludedAncestors,
    seen: HashSet<NodeId>,
    min_block_text_length: usize,
}

impl<'a, 'r> CandidateSelector<'a, 'r> {
    /// Prepare a search over `strategies` in resolution order. `primary` is
    /// the highest-priority strategy; the fallback batches are scored with it.
    #[must_use]
    pub fn new(
        doc: &'a Document,
        primary: &'r SiteStrategy,
        strategies: &[&'r SiteStrategy],
        custom: &CustomSelectors,
        min_block_text_length: usize,
    ) -> Self {
        let groups = strategies
            .iter()
            .copied()
            .flat_map(|s| s.selector_groups.iter().map(move |g| (s, g)))
            .collect();

        Self {
            doc,
            groups,
            next_step: 0,
            primary,
            excluded: ExcludedAncestors::collect(doc, custom),
            seen: HashSet::new(),
            min_block_text_length,
        }
    }

    /// A node is structurally valid when it has text and is not inside an
    /// excluded container.
    fn is_valid(&self, node: &NodeRef) -> bool {
        node.is_element() && !self.excluded.covers(node) && dom::has_text(&Selection::from(*node))
    }

    /// Keep `node` unless it is invalid or an earlier query already found it.
    fn admit(
        &mut self,
        node: NodeRef<'a>,
        strategy: &'r SiteStrategy,
        group: &'static str,
        group_index: usize,
        out: &mut Vec<Candidate<'a, 'r>>,
    ) {
        if self.is_valid(&node) && self.seen.insert(node.id) {
            out.push(Candidate {
                node,
                strategy,
                group,
                group_index,
            });
        }
    }

    fn run_step(&mut self, source: BatchSource) -> CandidateBatch<'a, 'r> {
        let mut candidates = Vec::new();
        let fallback_index = self.groups.len();

        match source {
            BatchSource::SelectorGroups => {
                let groups = self.groups.clone();
                for (index, (strategy, group)) in groups.into_iter().enumerate() {
                    for query in group.queries {
                        for node in self.doc.select(query).nodes().to_vec() {
                            self.admit(node, strategy, group.name, index, &mut candidates);
                        }
                    }
                }
            }
            BatchSource::Semantic => {
                let primary = self.primary;
                for node in self.doc.select(SEMANTIC_QUERY).nodes().to_vec() {
                    self.admit(node, primary, "semantic-fallback", fallback_index, &mut candidates);
                }
            }
            BatchSource::BlockContainers => {
                let (primary, min) = (self.primary, self.min_block_text_length);
                let nodes: Vec<NodeRef<'a>> = self
                    .doc
                    .select(BLOCK_CONTAINER_QUERY)
                    .nodes()
                    .iter()
                    .filter(|n| dom::text_length(&Selection::from(**n)) > min)
                    .copied()
                    .collect();
                for node in nodes {
                    self.admit(node, primary, "block-containers", fallback_index + 1, &mut candidates);
                }
            }
        }

        CandidateBatch { source, candidates }
    }
}

impl<'a, 'r> Iterator for CandidateSelector<'a, 'r> {
    type Item = CandidateBatch<'a, 'r>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(source) = STEPS.get(self.next_step).copied() {
            self.next_step += 1;
            let batch = self.run_step(source);
            if !batch.candidates.is_empty() {
                tracing::debug!(
                    source = ?batch.source,
                    candidates = batch.candidates.len(),
                    "candidate batch"
                );
                return Some(batch);
            }
            tracing::trace!(?source, "selector step found nothing");
        }
        None
    }
}

/// Locate the first non-empty batch of candidates, unscored.
///
/// Returns an empty list only when no query, semantic container or large
/// block matched anything valid.
#[must_use]
pub fn select_candidates<'a, 'r>(
    doc: &'a Document,
    primary: &'r SiteStrategy,
    strategies: &[&'r SiteStrategy],
    custom: &CustomSelectors,
    min_block_text_length: usize,
) -> Vec<Candidate<'a, 'r>> {
    CandidateSelector::new(doc, primary, strategies, custom, min_block_text_length)
        .next()
        .map(|batch| batch.candidates)
        .unwrap_or_default()
}
