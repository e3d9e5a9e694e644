//! Site Strategies
//!
//! A strategy is a named, prioritized bundle of selector groups, scoring
//! overrides and a cleaning profile for a class of sites. Strategies are
//! plain data: adding a site means adding a registry entry.
//!
//! The built-in registry is assembled once on first use and is read-only
//! afterwards, so it can be shared by concurrent extractions.

use std::sync::LazyLock;

use regex::Regex;

use crate::options::ExtractionContext;
use crate::scoring::{ScoringConfig, ScoringRule};

mod builtin;

/// Name of the strategy that always applies last.
pub const GENERIC: &str = "generic";

/// An ordered list of structural queries. Order encodes preference.
#[derive(Debug, Clone, Copy)]
pub struct SelectorGroup {
    pub name: &'static str,
    pub queries: &'static [&'static str],
}

/// How aggressively the cleaner deletes keyword-matched blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CleaningProfile {
    /// Class/id keyword matches are removed wherever they appear.
    #[default]
    Standard,
    /// Keyword matches on blocks carrying real prose are kept; only tag
    /// matches and short keyword-matched blocks go.
    Permissive,
}

/// A site strategy.
#[derive(Debug, Clone)]
pub struct SiteStrategy {
    pub name: &'static str,
    pub priority: i32,
    /// Matched against the normalized domain. Empty means any domain.
    pub domain_patterns: Vec<Regex>,
    /// Matched against the URL path. Empty means any path.
    pub path_patterns: Vec<Regex>,
    pub selector_groups: Vec<SelectorGroup>,
    pub scoring_overrides: Vec<ScoringRule>,
    pub cleaning: CleaningProfile,
    /// Extra selectors removed from the candidate during cleaning.
    pub exclusions: &'static [&'static str],
    scoring: ScoringConfig,
}

impl SiteStrategy {
    /// Build a strategy. Invalid patterns are dropped with a debug log, so a
    /// typo narrows applicability instead of failing every extraction.
    #[must_use]
    pub fn new(
        name: &'static str,
        priority: i32,
        domain_patterns: &[&str],
        path_patterns: &[&str],
        selector_groups: Vec<SelectorGroup>,
    ) -> Self {
        Self {
            name,
            priority,
            domain_patterns: compile(name, domain_patterns),
            path_patterns: compile(name, path_patterns),
            selector_groups,
            scoring_overrides: Vec::new(),
            cleaning: CleaningProfile::Standard,
            exclusions: &[],
            scoring: ScoringConfig::default(),
        }
    }

    /// Add scoring overrides on top of the default rule set.
    #[must_use]
    pub fn with_scoring(mut self, overrides: Vec<ScoringRule>) -> Self {
        self.scoring = ScoringConfig::default().with_overrides(&overrides);
        self.scoring_overrides = overrides;
        self
    }

    #[must_use]
    pub fn with_cleaning(mut self, cleaning: CleaningProfile) -> Self {
        self.cleaning = cleaning;
        self
    }

    #[must_use]
    pub fn with_exclusions(mut self, exclusions: &'static [&'static str]) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// The scoring config built from the defaults plus this strategy's overrides.
    #[must_use]
    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    /// Whether both the domain and the path patterns accept the context.
    ///
    /// A strategy without any pattern never matches; only the generic
    /// strategy applies everywhere, and it is appended separately.
    #[must_use]
    pub fn applies_to(&self, ctx: &ExtractionContext) -> bool {
        if self.domain_patterns.is_empty() && self.path_patterns.is_empty() {
            return false;
        }
        let domain_ok = self.domain_patterns.is_empty()
            || self.domain_patterns.iter().any(|p| p.is_match(&ctx.domain));
        let path_ok = self.path_patterns.is_empty()
            || self.path_patterns.iter().any(|p| p.is_match(&ctx.pathname));
        domain_ok && path_ok
    }
}

fn compile(strategy: &str, patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|p| match Regex::new(p) {
            Ok(re) => Some(re),
            Err(err) => {
                tracing::debug!(strategy, pattern = p, %err, "dropping invalid strategy pattern");
                None
            }
        })
        .collect()
}

/// An ordered set of site strategies plus the generic fallback.
#[derive(Debug, Clone)]
pub struct StrategyRegistry {
    strategies: Vec<SiteStrategy>,
    generic: SiteStrategy,
}

static BUILTIN: LazyLock<StrategyRegistry> =
    LazyLock::new(|| StrategyRegistry::new(builtin::site_strategies(), builtin::generic()));

impl StrategyRegistry {
    /// Assemble a registry. Meant to be called once at initialization.
    #[must_use]
    pub fn new(strategies: Vec<SiteStrategy>, generic: SiteStrategy) -> Self {
        Self {
            strategies,
            generic,
        }
    }

    /// The registry of built-in strategies.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Strategies applicable to the context, highest priority first, with
    /// the generic strategy always last. Equal priorities keep
    /// registration order.
    #[must_use]
    pub fn resolve(&self, ctx: &ExtractionContext) -> Vec<&SiteStrategy> {
        let mut matched: Vec<&SiteStrategy> =
            self.strategies.iter().filter(|s| s.applies_to(ctx)).collect();
        matched.sort_by(|a, b| b.priority.cmp(&a.priority));
        matched.push(&self.generic);
        matched
    }

    /// The catch-all strategy every resolution ends with.
    #[must_use]
    pub fn generic(&self) -> &SiteStrategy {
        &self.generic
    }

    /// Look a strategy up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SiteStrategy> {
        if name == self.generic.name {
            return Some(&self.generic);
        }
        self.strategies.iter().find(|s| s.name == name)
    }

    /// Names of all registered strategies, generic last.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.strategies
            .iter()
            .map(|s| s.name)
            .chain(std::iter::once(self.generic.name))
            .collect()
    }
}
