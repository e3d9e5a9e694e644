//! # rs-markclip
//!
//! Main-content selection and rule-based Markdown conversion for captured
//! web pages.
//!
//! Given a parsed page, the library picks the element holding the main
//! content (site strategies, heuristic scoring, cleaning and quality
//! validation with retries), then converts that element to Markdown with a
//! prioritized rule set that keeps lists, code blocks, tables, links and
//! images faithful.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_markclip::{extract_with_options, Options};
//!
//! let html = r#"<html><head><title>My Article</title></head>
//! <body><nav><a href="/">Home</a></nav>
//! <article><h1>My Article</h1><p>Main content here, long enough to be kept.</p></article>
//! </body></html>"#;
//!
//! let options = Options {
//!     url: Some("https://example.com/post".to_string()),
//!     ..Options::default()
//! };
//! let result = extract_with_options(html, &options)?;
//! assert!(result.markdown.starts_with("# My Article"));
//! assert_eq!(result.front_matter["title"], "My Article");
//! # Ok::<(), rs_markclip::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Strategies**: per-site selector groups, scoring overrides and cleaning profiles
//! - **Scoring**: declarative bonus and penalty rules with a per-candidate rationale
//! - **Cleaning**: boilerplate removal on a detached copy; the input is never mutated
//! - **Conversion**: GitHub Flavored Markdown with fenced, language-tagged code

mod error;
mod options;
mod patterns;
mod result;

/// DOM operations over `dom_query`.
pub mod dom;

/// Site strategies and their registry.
pub mod strategy;

/// Candidate search and exclusion selectors.
pub mod selector;

/// Candidate scoring rules.
pub mod scoring;

/// Cleaning, validation, fallback and the extraction pipeline.
pub mod extractor;

/// HTML to Markdown conversion.
pub mod markdown;

/// Page metadata for the front matter.
pub mod metadata;

/// URL validation and resolution.
pub mod url_utils;

/// Character encoding detection and transcoding.
pub mod encoding;

/// Link density measurements.
pub mod link_density;

// Public API - re-exports
pub use error::{Error, Result, Stage};
pub use extractor::extract_document;
pub use options::{ExtractionContext, Options};
pub use result::{
    ExtractionMetadata, ExtractionResult, ImageRef, Outcome, AGGRESSIVE_FALLBACK,
};

/// Extracts main content from an HTML document using default options.
///
/// # Example
///
/// ```rust
/// use rs_markclip::extract;
///
/// let html = "<html><body><article><p>Content</p></article></body></html>";
/// let result = extract(html)?;
/// assert_eq!(result.markdown, "Content");
/// # Ok::<(), rs_markclip::Error>(())
/// ```
pub fn extract(html: &str) -> Result<ExtractionResult> {
    extract_with_options(html, &Options::default())
}

/// Extracts main content from an HTML document with custom options.
///
/// Parses the document, derives the per-call [`ExtractionContext`] and runs
/// [`extract_document`].
pub fn extract_with_options(html: &str, options: &Options) -> Result<ExtractionResult> {
    let doc = dom::parse(html);
    extract_document(&doc, &ExtractionContext::new(options))
}

/// Extracts main content from HTML bytes with automatic encoding detection.
///
/// The encoding comes from a byte order mark, `<meta charset="...">` or
/// `<meta http-equiv="Content-Type" content="...; charset=...">`, and
/// defaults to UTF-8. Invalid sequences become U+FFFD instead of errors.
///
/// # Example
///
/// ```rust
/// use rs_markclip::extract_bytes;
///
/// let html = b"<html><head><meta charset=\"ISO-8859-1\"></head><body><article>Caf\xE9</article></body></html>";
/// let result = extract_bytes(html)?;
/// assert!(result.markdown.contains("Café"));
/// # Ok::<(), rs_markclip::Error>(())
/// ```
pub fn extract_bytes(html: &[u8]) -> Result<ExtractionResult> {
    extract_bytes_with_options(html, &Options::default())
}

/// [`extract_bytes`] with custom options.
pub fn extract_bytes_with_options(html: &[u8], options: &Options) -> Result<ExtractionResult> {
    let html_str = encoding::transcode_to_utf8(html);
    extract_with_options(&html_str, options)
}
