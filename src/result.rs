//! Result types for extraction output.
//!
//! Everything here is produced once per extraction call and handed to the
//! caller as-is; nothing keeps a reference back into the document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Strategy name recorded when no candidate validated and the
/// document-wide fallback assembled the content.
pub const AGGRESSIVE_FALLBACK: &str = "aggressive-fallback";

/// Image referenced by the extracted content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Resolved image URL.
    pub src: String,

    /// Alt text from `<img alt="...">`, empty when missing.
    pub alt: String,
}

/// How the pipeline reached its result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    /// A ranked candidate passed quality validation.
    #[default]
    Accepted,
    /// Retries ran out and the document-wide fallback was used.
    AggressiveFallback,
}

/// Numbers describing the extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    /// Words in the accepted content.
    pub word_count: usize,

    /// Reading time in whole minutes, rounded up.
    pub estimated_reading_time: usize,

    /// Name of the strategy whose candidate won, or `aggressive-fallback`.
    pub strategy_used: String,

    /// Score of the accepted candidate (0 for the fallback).
    pub candidate_score: f64,

    /// Terminal state of the quality validator.
    pub outcome: Outcome,
}

/// Result of content extraction from a document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Main content as Markdown.
    pub markdown: String,

    /// Front matter fields (title, author, source, ...), sorted by key.
    pub front_matter: BTreeMap<String, String>,

    /// Images referenced by the content, in document order.
    pub images: Vec<ImageRef>,

    /// Extraction statistics.
    pub metadata: ExtractionMetadata,
}

impl ExtractionResult {
    /// Render the result as a Markdown document with a YAML front matter block.
    ///
    /// The front matter is omitted when no fields were found.
    ///
    /// ```rust
    /// use rs_markclip::ExtractionResult;
    ///
    /// let mut result = ExtractionResult {
    ///     markdown: "# Title".to_string(),
    ///     ..ExtractionResult::default()
    /// };
    /// result.front_matter.insert("title".into(), "Title".into());
    ///
    /// assert_eq!(result.to_markdown_document(), "---\ntitle: \"Title\"\n---\n\n# Title\n");
    /// ```
    #[must_use]
    pub fn to_markdown_document(&self) -> String {
        let mut out = String::with_capacity(self.markdown.len() + 256);

        if !self.front_matter.is_empty() {
            out.push_str("---\n");
            for (key, value) in &self.front_matter {
                out.push_str(key);
                out.push_str(": ");
                out.push_str(&yaml_quote(value));
                out.push('\n');
            }
            out.push_str("---\n\n");
        }

        out.push_str(&self.markdown);
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out
    }
}

/// Quote a scalar for YAML using JSON string escaping, which YAML accepts.
fn yaml_quote(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value.replace('"', "'")))
}
