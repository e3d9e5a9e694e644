//! Error types for rs-markclip.
//!
//! Only conditions the caller must act on are errors. A missed selector, a
//! candidate that fails validation or a malformed attribute are all handled
//! inside the pipeline and never surface here.

use std::time::Duration;

/// Pipeline stage at which a caller deadline was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Strategy resolution and candidate search.
    Selection,
    /// Candidate scoring and ranking.
    Scoring,
    /// Cleaning and quality validation.
    Cleaning,
    /// Markdown conversion.
    Conversion,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Selection => "selection",
            Self::Scoring => "scoring",
            Self::Cleaning => "cleaning",
            Self::Conversion => "conversion",
        };
        f.write_str(name)
    }
}

/// Error type for extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The document has no reachable non-whitespace text at all.
    #[error("No extractable content found")]
    NoContent,

    /// The caller-imposed deadline passed before the pipeline finished.
    ///
    /// `partial` holds the raw text of the cleaned content when the deadline
    /// was noticed after cleaning, so callers can still keep something.
    #[error("Extraction exceeded {limit:?} before the {stage} stage")]
    Timeout {
        /// Stage that was about to start.
        stage: Stage,
        /// Configured limit.
        limit: Duration,
        /// Raw cleaned text, if cleaning had completed.
        partial: Option<String>,
    },

    /// A caller-supplied exclusion selector could not be parsed.
    #[error("Invalid custom selector: {0}")]
    InvalidSelector(String),
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
