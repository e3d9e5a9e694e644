//! Quality Validator
//!
//! Decides whether a cleaned candidate is good enough to convert.

use crate::dom::{self, Selection};
use crate::link_density;
use crate::patterns::NAVIGATION_CLASS;

/// Paragraphs required when the candidate has no heading.
pub const MIN_PARAGRAPHS: usize = 2;

/// Headings required when the candidate has fewer than two paragraphs.
pub const MIN_HEADINGS: usize = 1;

/// Link density that marks a paragraph-poor candidate as a link list.
pub const NAVIGATION_LINK_DENSITY: f64 = 0.6;

/// Why a candidate was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Less text than the configured minimum.
    TooShort { chars: usize, min: usize },
    /// Neither two paragraphs nor a heading.
    NoStructure,
    /// Looks like a menu or link list.
    PureNavigation,
}

/// Outcome of validating one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid(Rejection),
}

impl Verdict {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Validate a cleaned candidate root.
///
/// Valid iff the text is at least `min_text_length` characters, there are
/// two paragraphs or a heading, and the candidate is not pure navigation.
#[must_use]
pub fn validate(root: &Selection, min_text_length: usize) -> Verdict {
    let chars = dom::text_length(root);
    if chars < min_text_length {
        return Verdict::Invalid(Rejection::TooShort {
            chars,
            min: min_text_length,
        });
    }

    let paragraphs = dom::paragraph_count(root);
    if paragraphs < MIN_PARAGRAPHS && dom::heading_count(root) < MIN_HEADINGS {
        return Verdict::Invalid(Rejection::NoStructure);
    }

    if is_pure_navigation(root, paragraphs) {
        return Verdict::Invalid(Rejection::PureNavigation);
    }

    Verdict::Valid
}

fn is_pure_navigation(root: &Selection, paragraphs: usize) -> bool {
    if paragraphs >= MIN_PARAGRAPHS {
        return false;
    }
    let keywords = dom::id_and_class(root);
    dom::is_one_of(root, &["nav", "menu"])
        || NAVIGATION_CLASS.is_match(&keywords)
        || link_density::link_density(root) > NAVIGATION_LINK_DENSITY
}
