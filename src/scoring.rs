//! Content Scoring
//!
//! Assigns each candidate a score from weighted bonus and penalty rules.
//! Features are measured once per candidate; rules are plain predicates
//! over those features, so a score is a pure function of node and config.

use std::cmp::Ordering;

use crate::dom::{self, NodeRef, Selection};
use crate::link_density;
use crate::patterns::{
    ADVERTISEMENT_CLASS, BOILERPLATE_CLASS, CONTENT_CLASS, NAVIGATION_CLASS, SOCIAL_CLASS,
    SUBSCRIBE_CLASS,
};

/// Characters of text worth one point of base score.
pub const BASE_DIVISOR: f64 = 100.0;

/// Upper bound of the base score, so huge wrappers cannot win on size alone.
pub const BASE_CAP: f64 = 50.0;

/// Link density above which the link penalty applies.
pub const LINK_DENSITY_THRESHOLD: f64 = 0.5;

/// Measurements of one candidate, taken once before any rule runs.
#[derive(Debug, Clone, Default, PartialEq)]
#[allow(clippy::struct_excessive_bools)]
pub struct CandidateFeatures {
    /// Lowercase tag name.
    pub tag: String,
    /// Lowercase `id` and `class`, space separated.
    pub id_class: String,
    /// Characters of normalized text.
    pub text_length: usize,
    /// Non-empty `<p>` descendants.
    pub paragraphs: usize,
    /// Non-empty heading descendants.
    pub headings: usize,
    /// Link text over total text.
    pub link_density: f64,
    /// `<article>`, `<main>`, `role="main"` or `itemprop="articleBody"`.
    pub is_semantic: bool,
    /// Class/id looks like a content container.
    pub content_class: bool,
    /// Class/id looks like navigation.
    pub navigation_class: bool,
    /// Class/id looks like ads, social widgets, subscribe prompts or page furniture.
    pub boilerplate_class: bool,
    /// `<nav>`, `<footer>`, `<aside>` or `<header>`.
    pub boilerplate_tag: bool,
}

impl CandidateFeatures {
    /// Measure a candidate element.
    #[must_use]
    pub fn measure(sel: &Selection) -> Self {
        let tag = dom::tag_name(sel).unwrap_or_default();
        let id_class = dom::id_and_class(sel).to_ascii_lowercase();
        let role = dom::get_attribute(sel, "role").unwrap_or_default();
        let itemprop = dom::get_attribute(sel, "itemprop").unwrap_or_default();

        let boilerplate_class = ADVERTISEMENT_CLASS.is_match(&id_class)
            || SOCIAL_CLASS.is_match(&id_class)
            || SUBSCRIBE_CLASS.is_match(&id_class)
            || BOILERPLATE_CLASS.is_match(&id_class);

        Self {
            is_semantic: matches!(tag.as_str(), "article" | "main")
                || role.eq_ignore_ascii_case("main")
                || itemprop == "articleBody",
            boilerplate_tag: matches!(tag.as_str(), "nav" | "footer" | "aside" | "header"),
            content_class: CONTENT_CLASS.is_match(&id_class),
            navigation_class: NAVIGATION_CLASS.is_match(&id_class),
            boilerplate_class,
            text_length: dom::text_length(sel),
            paragraphs: dom::paragraph_count(sel),
            headings: dom::heading_count(sel),
            link_density: link_density::link_density(sel),
            tag,
            id_class,
        }
    }
}

/// Multipliers applied to rule groups.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    /// Scales the base (text length) score.
    pub text_length: f64,
    /// Scales rules about tags, paragraphs and headings.
    pub semantic_structure: f64,
    /// Scales rules about class and id keywords.
    pub class_name_signal: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            text_length: 1.0,
            semantic_structure: 1.0,
            class_name_signal: 1.0,
        }
    }
}

/// Which weight scales a rule's points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Not scaled.
    Plain,
    /// Scaled by [`Weights::semantic_structure`].
    Structure,
    /// Scaled by [`Weights::class_name_signal`].
    ClassName,
}

/// Whether a rule adds to or subtracts from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Bonus,
    Penalty,
}

/// How many points a matching rule is worth.
#[derive(Debug, Clone, Copy)]
pub enum Points {
    /// A constant amount.
    Fixed(f64),
    /// `measure(features) * weight`, limited to `cap`.
    PerUnit {
        measure: fn(&CandidateFeatures) -> f64,
        weight: f64,
        cap: f64,
    },
}

impl Points {
    fn amount(&self, features: &CandidateFeatures) -> f64 {
        match *self {
            Self::Fixed(points) => points,
            Self::PerUnit {
                measure,
                weight,
                cap,
            } => (measure(features) * weight).min(cap),
        }
    }
}

/// A named bonus or penalty.
#[derive(Debug, Clone, Copy)]
pub struct ScoringRule {
    pub name: &'static str,
    pub kind: RuleKind,
    pub signal: Signal,
    pub predicate: fn(&CandidateFeatures) -> bool,
    pub points: Points,
}

impl ScoringRule {
    /// A fixed-point bonus.
    #[must_use]
    pub const fn bonus(
        name: &'static str,
        signal: Signal,
        predicate: fn(&CandidateFeatures) -> bool,
        points: f64,
    ) -> Self {
        Self {
            name,
            kind: RuleKind::Bonus,
            signal,
            predicate,
            points: Points::Fixed(points),
        }
    }

    /// A fixed-point penalty.
    #[must_use]
    pub const fn penalty(
        name: &'static str,
        signal: Signal,
        predicate: fn(&CandidateFeatures) -> bool,
        points: f64,
    ) -> Self {
        Self {
            name,
            kind: RuleKind::Penalty,
            signal,
            predicate,
            points: Points::Fixed(points),
        }
    }
}

/// Weights plus rule lists for one strategy. Immutable once built.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub weights: Weights,
    pub bonus_rules: Vec<ScoringRule>,
    pub penalty_rules: Vec<ScoringRule>,
}

fn count_paragraphs(f: &CandidateFeatures) -> f64 {
    f.paragraphs as f64
}

fn count_headings(f: &CandidateFeatures) -> f64 {
    f.headings as f64
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            bonus_rules: vec![
                ScoringRule::bonus("semantic-tag", Signal::Structure, |f| f.is_semantic, 25.0),
                ScoringRule::bonus(
                    "content-class",
                    Signal::ClassName,
                    |f| f.content_class && !f.boilerplate_class,
                    25.0,
                ),
                ScoringRule {
                    name: "paragraphs",
                    kind: RuleKind::Bonus,
                    signal: Signal::Structure,
                    predicate: |f| f.paragraphs > 0,
                    points: Points::PerUnit {
                        measure: count_paragraphs,
                        weight: 3.0,
                        cap: 30.0,
                    },
                },
                ScoringRule {
                    name: "headings",
                    kind: RuleKind::Bonus,
                    signal: Signal::Structure,
                    predicate: |f| f.headings > 0,
                    points: Points::PerUnit {
                        measure: count_headings,
                        weight: 2.0,
                        cap: 10.0,
                    },
                },
            ],
            penalty_rules: vec![
                ScoringRule::penalty(
                    "link-density",
                    Signal::Plain,
                    |f| f.link_density > LINK_DENSITY_THRESHOLD,
                    30.0,
                ),
                ScoringRule::penalty(
                    "navigation-class",
                    Signal::ClassName,
                    |f| f.navigation_class,
                    40.0,
                ),
                ScoringRule::penalty(
                    "boilerplate-class",
                    Signal::ClassName,
                    |f| f.boilerplate_class,
                    50.0,
                ),
                ScoringRule::penalty(
                    "boilerplate-tag",
                    Signal::Structure,
                    |f| f.boilerplate_tag,
                    50.0,
                ),
            ],
        }
    }
}

impl ScoringConfig {
    /// Apply strategy overrides: a rule replaces the default rule of the
    /// same name, otherwise it is appended to its kind's list.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &[ScoringRule]) -> Self {
        for rule in overrides {
            self.bonus_rules.retain(|r| r.name != rule.name);
            self.penalty_rules.retain(|r| r.name != rule.name);
            match rule.kind {
                RuleKind::Bonus => self.bonus_rules.push(*rule),
                RuleKind::Penalty => self.penalty_rules.push(*rule),
            }
        }
        self
    }

    fn signal_weight(&self, signal: Signal) -> f64 {
        match signal {
            Signal::Plain => 1.0,
            Signal::Structure => self.weights.semantic_structure,
            Signal::ClassName => self.weights.class_name_signal,
        }
    }

    /// Score measured features. Returns the floored score and the
    /// rationale, one `(rule, delta)` entry per rule that fired.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn evaluate(&self, features: &CandidateFeatures) -> (f64, Vec<(&'static str, f64)>) {
        let base = (features.text_length as f64 / BASE_DIVISOR).min(BASE_CAP)
            * self.weights.text_length;
        let mut rationale = vec![("base", base)];
        let mut total = base;

        for rule in &self.bonus_rules {
            if (rule.predicate)(features) {
                let delta = rule.points.amount(features).abs() * self.signal_weight(rule.signal);
                total += delta;
                rationale.push((rule.name, delta));
            }
        }
        for rule in &self.penalty_rules {
            if (rule.predicate)(features) {
                let delta = -rule.points.amount(features).abs() * self.signal_weight(rule.signal);
                total += delta;
                rationale.push((rule.name, delta));
            }
        }

        let score = if total.is_finite() { total.max(0.0) } else { 0.0 };
        (score, rationale)
    }
}

/// A candidate with its score. Borrows the node, never owns the tree.
#[derive(Debug, Clone)]
pub struct ScoredCandidate<'a> {
    /// Candidate root in the source document.
    pub node: NodeRef<'a>,
    /// Strategy whose selector group found it.
    pub strategy: &'static str,
    /// Position of that group in the overall search order.
    pub group_index: usize,
    /// Position of the node in a document-order traversal.
    pub document_order: usize,
    /// Final score, never negative.
    pub score: f64,
    /// Rule deltas that make up the score.
    pub rationale: Vec<(&'static str, f64)>,
}

/// Score one candidate.
#[must_use]
pub fn score<'a>(
    node: NodeRef<'a>,
    strategy: &'static str,
    group_index: usize,
    document_order: usize,
    config: &ScoringConfig,
) -> ScoredCandidate<'a> {
    let features = CandidateFeatures::measure(&Selection::from(node));
    let (score, rationale) = config.evaluate(&features);
    ScoredCandidate {
        node,
        strategy,
        group_index,
        document_order,
        score,
        rationale,
    }
}

/// Sort best first: higher score, then earlier selector group, then
/// earlier in the document.
pub fn rank(candidates: &mut [ScoredCandidate<'_>]) {
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then(a.group_index.cmp(&b.group_index))
            .then(a.document_order.cmp(&b.document_order))
    });
}
