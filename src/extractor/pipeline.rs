//! Content extraction pipeline.
//!
//! Orchestrates one extraction call over a borrowed document:
//! strategy resolution, lazy candidate batches, scoring and ranking,
//! cleaning and validation with a bounded retry budget, the aggressive
//! fallback, then Markdown conversion and metadata assembly.
//!
//! The caller's deadline is checked between stages, never inside one.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::dom::{self, Document, NodeId, Selection};
use crate::error::{Error, Result, Stage};
use crate::markdown::{self, ConvertOptions};
use crate::metadata;
use crate::options::ExtractionContext;
use crate::result::{ExtractionMetadata, ExtractionResult, ImageRef, Outcome, AGGRESSIVE_FALLBACK};
use crate::scoring::{self, ScoredCandidate};
use crate::selector::{CandidateSelector, CustomSelectors, ExcludedAncestors};
use crate::strategy::{CleaningProfile, SiteStrategy, StrategyRegistry};

use super::cleaner::{self, Cleaned, CleaningRules};
use super::fallback;
use super::validator::{self, Verdict};

/// The accepted content and how it was found.
struct Accepted {
    cleaned: Cleaned,
    strategy: &'static str,
    score: f64,
    outcome: Outcome,
}

/// Elapsed-time guard for one call.
struct Deadline {
    started: Instant,
    limit: Option<Duration>,
}

impl Deadline {
    fn start(limit: Option<Duration>) -> Self {
        Self {
            started: Instant::now(),
            limit,
        }
    }

    /// Fail with [`Error::Timeout`] if the limit has passed.
    fn check(&self, stage: Stage, partial: impl FnOnce() -> Option<String>) -> Result<()> {
        match self.limit {
            Some(limit) if self.started.elapsed() >= limit => {
                debug!(%stage, ?limit, "deadline exceeded");
                Err(Error::Timeout {
                    stage,
                    limit,
                    partial: partial(),
                })
            }
            _ => Ok(()),
        }
    }
}

/// Run the full extraction over a materialized document.
///
/// The document is only read. Errors are limited to an empty document, an
/// invalid custom selector and the caller deadline.
pub fn extract_document(doc: &Document, ctx: &ExtractionContext) -> Result<ExtractionResult> {
    let deadline = Deadline::start(ctx.options.timeout);
    let options = &ctx.options;

    let body = fallback::document_body(doc);
    if !dom::has_text(&body) {
        return Err(Error::NoContent);
    }

    let custom = CustomSelectors::parse(&options.custom_selectors)?;
    let registry = StrategyRegistry::builtin();
    let strategies = registry.resolve(ctx);
    let primary = strategies.first().copied().unwrap_or(registry.generic());
    debug!(
        domain = %ctx.domain,
        path = %ctx.pathname,
        strategies = ?strategies.iter().map(|s| s.name).collect::<Vec<_>>(),
        "resolved strategies"
    );

    deadline.check(Stage::Selection, || None)?;
    let accepted = match select_and_validate(doc, ctx, primary, &strategies, &custom, &deadline)? {
        Some(accepted) => accepted,
        None => aggressive_fallback(doc, ctx, primary, &custom),
    };

    let root = accepted.cleaned.root();
    let plain_text = dom::normalized_text(&root);
    deadline.check(Stage::Conversion, || Some(plain_text.clone()))?;

    let convert_options = ConvertOptions {
        preserve_formatting: options.preserve_formatting,
        base_url: ctx.base_url.clone(),
    };
    let mut markdown = markdown::convert(&root, &convert_options);
    if markdown.is_empty() {
        // Text only reachable through elements the converter drops.
        markdown = markdown::text::escape_markdown(&plain_text);
    }

    let images = if options.include_images {
        collect_images(&root, &convert_options)
    } else {
        Vec::new()
    };

    let word_count = plain_text.split_whitespace().count();
    let estimated_reading_time = if word_count == 0 {
        0
    } else {
        word_count.div_ceil(options.words_per_minute.max(1))
    };

    debug!(
        strategy = accepted.strategy,
        score = accepted.score,
        outcome = ?accepted.outcome,
        words = word_count,
        "extraction finished"
    );

    Ok(ExtractionResult {
        markdown,
        front_matter: metadata::front_matter(doc, ctx),
        images,
        metadata: ExtractionMetadata {
            word_count,
            estimated_reading_time,
            strategy_used: accepted.strategy.to_string(),
            candidate_score: accepted.score,
            outcome: accepted.outcome,
        },
    })
}

/// Score batches in search order and validate ranked candidates until one
/// passes or `1 + retry_limit` attempts are spent.
///
/// The first batch holds the candidates of every selector group, so the
/// best-scoring one is tried first whichever group found it.
fn select_and_validate(
    doc: &Document,
    ctx: &ExtractionContext,
    primary: &SiteStrategy,
    strategies: &[&SiteStrategy],
    custom: &CustomSelectors,
    deadline: &Deadline,
) -> Result<Option<Accepted>> {
    let selector =
        CandidateSelector::new(doc, primary, strategies, custom, ctx.options.min_block_text_length);

    let order = document_order(doc);
    let budget = ctx.options.retry_limit.saturating_add(1);
    let mut attempts = 0;

    for batch in selector {
        deadline.check(Stage::Scoring, || None)?;

        let mut scored: Vec<ScoredCandidate> = batch
            .candidates
            .iter()
            .map(|c| {
                let position = order.get(&c.node.id).copied().unwrap_or(usize::MAX);
                scoring::score(c.node, c.strategy.name, c.group_index, position, c.strategy.scoring())
            })
            .collect();
        scoring::rank(&mut scored);

        if let Some(top) = scored.first() {
            debug!(
                source = ?batch.source,
                strategy = top.strategy,
                score = top.score,
                rationale = ?top.rationale,
                "top candidate of batch"
            );
        }

        for candidate in &scored {
            if attempts >= budget {
                debug!(attempts, "retry budget spent");
                return Ok(None);
            }
            attempts += 1;
            deadline.check(Stage::Cleaning, || None)?;

            let Some(strategy) = strategies.iter().copied().find(|s| s.name == candidate.strategy)
            else {
                continue;
            };
            let exclusions = CustomSelectors::parse_lenient(strategy.exclusions);
            let rules = cleaning_rules(ctx, strategy, custom, &exclusions);
            let cleaned = cleaner::clean(&Selection::from(candidate.node), &rules);

            match validator::validate(&cleaned.root(), ctx.options.min_text_length) {
                Verdict::Valid => {
                    debug!(
                        strategy = candidate.strategy,
                        score = candidate.score,
                        removed = cleaned.removed,
                        attempt = attempts,
                        "candidate accepted"
                    );
                    return Ok(Some(Accepted {
                        cleaned,
                        strategy: candidate.strategy,
                        score: candidate.score,
                        outcome: Outcome::Accepted,
                    }));
                }
                Verdict::Invalid(reason) => {
                    debug!(strategy = candidate.strategy, ?reason, attempt = attempts, "candidate rejected");
                }
            }
        }
    }

    Ok(None)
}

fn aggressive_fallback(
    doc: &Document,
    ctx: &ExtractionContext,
    primary: &SiteStrategy,
    custom: &CustomSelectors,
) -> Accepted {
    let exclusions = CustomSelectors::parse_lenient(primary.exclusions);
    let rules = cleaning_rules(ctx, primary, custom, &exclusions);
    let excluded = ExcludedAncestors::collect(doc, custom);
    let (cleaned, source) =
        fallback::aggressive_fallback(doc, &rules, &excluded, ctx.options.min_text_length);
    debug!(?source, "using aggressive fallback");

    Accepted {
        cleaned,
        strategy: AGGRESSIVE_FALLBACK,
        score: 0.0,
        outcome: Outcome::AggressiveFallback,
    }
}

fn cleaning_rules<'c>(
    ctx: &ExtractionContext,
    strategy: &SiteStrategy,
    custom: &'c CustomSelectors,
    exclusions: &'c CustomSelectors,
) -> CleaningRules<'c> {
    let profile = if ctx.wants_permissive_cleaning() {
        CleaningProfile::Permissive
    } else {
        strategy.cleaning
    };
    CleaningRules {
        remove_ads: ctx.options.remove_ads,
        remove_navigation: ctx.options.remove_navigation,
        profile,
        custom,
        strategy: exclusions,
    }
}

/// Position of every node in a depth-first walk of the document.
fn document_order(doc: &Document) -> HashMap<NodeId, usize> {
    doc.root()
        .descendants()
        .into_iter()
        .enumerate()
        .map(|(i, node)| (node.id, i))
        .collect()
}

/// Distinct image references of the content, in document order.
fn collect_images(root: &Selection, options: &ConvertOptions) -> Vec<ImageRef> {
    let mut seen = HashSet::new();
    let mut images = Vec::new();
    for img in root.select("img").iter() {
        if dom::has_ancestor_tag(&img, crate::markdown::rules::SKIPPED_TAGS) {
            continue;
        }
        let Some(src) = markdown::image_source(&img, options.base_url.as_ref()) else {
            continue;
        };
        if !seen.insert(src.clone()) {
            continue;
        }
        let alt = dom::get_attribute(&img, "alt")
            .unwrap_or_default()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        images.push(ImageRef { src, alt });
    }
    images
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Options;

    fn run(html: &str, options: &Options) -> Result<ExtractionResult> {
        let doc = dom::parse(html);
        extract_document(&doc, &ExtractionContext::new(options))
    }

    fn article(paragraphs: usize) -> String {
        let para = "<p>This paragraph carries enough words to count as real prose for the validator.</p>";
        format!(
            "<html><body><nav><a href='/'>Home</a></nav><article><h1>Title</h1>{}</article>\
             <footer>Copyright</footer></body></html>",
            para.repeat(paragraphs)
        )
    }

    #[test]
    fn test_accepts_generic_article() {
        let result = run(&article(3), &Options::default()).unwrap();
        assert_eq!(result.metadata.strategy_used, "generic");
        assert_eq!(result.metadata.outcome, Outcome::Accepted);
        assert!(result.metadata.candidate_score > 0.0);
        assert!(result.markdown.starts_with("# Title"));
        assert!(!result.markdown.contains("Copyright"));
        assert!(!result.markdown.contains("Home"));
    }

    #[test]
    fn test_unrenderable_content_falls_back_to_its_own_text() {
        let html = "<html><body><nav><a href='/'>SKIP_NAV</a></nav>\
                    <article><button>Only a button title, but long enough to pass validation.</button></article>\
                    </body></html>";
        let result = run(html, &Options::default()).unwrap();
        assert_eq!(
            result.markdown,
            "Only a button title, but long enough to pass validation."
        );
        assert!(!result.markdown.contains("SKIP"));
    }

    #[test]
    fn test_empty_document_is_an_error() {
        let err = run("<html><body>  <script>x()</script> </body></html>", &Options::default());
        assert!(matches!(err, Err(Error::NoContent)));
    }

    #[test]
    fn test_invalid_selector_is_reported() {
        let options = Options {
            custom_selectors: vec!["div[".to_string()],
            ..Options::default()
        };
        assert!(matches!(run(&article(3), &options), Err(Error::InvalidSelector(_))));
    }

    #[test]
    fn test_zero_timeout_reports_selection_stage() {
        let options = Options {
            timeout: Some(Duration::ZERO),
            ..Options::default()
        };
        match run(&article(3), &options) {
            Err(Error::Timeout { stage, partial, .. }) => {
                assert_eq!(stage, Stage::Selection);
                assert!(partial.is_none());
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[test]
    fn test_reading_time_rounds_up() {
        let options = Options {
            words_per_minute: 10,
            ..Options::default()
        };
        let result = run(&article(3), &options).unwrap();
        let words = result.metadata.word_count;
        assert!(words > 10);
        assert_eq!(result.metadata.estimated_reading_time, words.div_ceil(10));
    }
}
