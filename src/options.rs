//! Configuration options for content extraction.
//!
//! `Options` is what the host hands over; `ExtractionContext` is the
//! per-call view derived from it (parsed base URL, normalized domain and
//! path) and stays immutable for the whole extraction.

use std::time::Duration;

use chrono::{DateTime, Utc};
use url::Url;

use crate::url_utils;

/// Configuration options for content extraction.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use rs_markclip::Options;
///
/// let options = Options {
///     url: Some("https://example.com/blog/post".to_string()),
///     remove_ads: false,
///     ..Options::default()
/// };
/// assert!(options.remove_navigation);
/// ```
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct Options {
    /// Remove advertisement, sponsor, social-share and subscribe blocks.
    ///
    /// Default: `true`
    pub remove_ads: bool,

    /// Remove navigation, site headers, footers and asides.
    ///
    /// Default: `true`
    pub remove_navigation: bool,

    /// Extra CSS selectors whose matches are always removed from the content.
    ///
    /// Default: empty
    pub custom_selectors: Vec<String>,

    /// Keep line breaks found inside text nodes instead of collapsing them.
    ///
    /// Default: `false`
    pub preserve_formatting: bool,

    /// The host already knows this is a long-form research page.
    ///
    /// Selects the permissive cleaning profile, which does not delete
    /// content-bearing blocks just because a class name looks like boilerplate.
    ///
    /// Default: `false`
    pub is_research_page: bool,

    /// Domain of the captured page, overriding the host taken from `url`.
    ///
    /// Default: `None`
    pub domain: Option<String>,

    /// Source URL of the captured page. Used as base for relative links and
    /// images, for strategy matching and as the `source` front matter field.
    ///
    /// Default: `None`
    pub url: Option<String>,

    /// How many further candidates are tried after the best one fails validation.
    ///
    /// Default: `3`
    pub retry_limit: usize,

    /// Minimum characters of cleaned text for a candidate to be accepted.
    ///
    /// Default: `50`
    pub min_text_length: usize,

    /// Minimum characters for a plain block container to become a
    /// last-resort candidate.
    ///
    /// Default: `140`
    pub min_block_text_length: usize,

    /// Reading speed used for `estimated_reading_time`.
    ///
    /// Default: `200`
    pub words_per_minute: usize,

    /// Collect image references into `ExtractionResult.images`.
    ///
    /// Default: `true`
    pub include_images: bool,

    /// Capture timestamp written to the `captured` front matter field.
    ///
    /// Supplied by the caller so repeated extractions stay byte-identical.
    ///
    /// Default: `None`
    pub captured_at: Option<DateTime<Utc>>,

    /// Deadline for the whole call, checked between pipeline stages.
    ///
    /// Default: `None`
    pub timeout: Option<Duration>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            remove_ads: true,
            remove_navigation: true,
            custom_selectors: Vec::new(),
            preserve_formatting: false,
            is_research_page: false,
            domain: None,
            url: None,
            retry_limit: 3,
            min_text_length: 50,
            min_block_text_length: 140,
            words_per_minute: 200,
            include_images: true,
            captured_at: None,
            timeout: None,
        }
    }
}

/// Per-call extraction context.
///
/// Created once from `Options` at the start of an extraction and never
/// changed afterwards.
#[derive(Debug, Clone)]
pub struct ExtractionContext {
    /// Parsed source URL, when one was given and is absolute.
    pub base_url: Option<Url>,
    /// Lowercased host without a leading `www.`; empty when unknown.
    pub domain: String,
    /// URL path, `/` when unknown.
    pub pathname: String,
    /// The options this context was built from.
    pub options: Options,
}

impl ExtractionContext {
    /// Build the context for one extraction call.
    #[must_use]
    pub fn new(options: &Options) -> Self {
        let base_url = options.url.as_deref().and_then(url_utils::parse_url);

        let domain = options
            .domain
            .as_deref()
            .map(str::to_string)
            .or_else(|| base_url.as_ref().and_then(|u| u.host_str().map(str::to_string)))
            .map(|d| normalize_domain(&d))
            .unwrap_or_default();

        let pathname = base_url
            .as_ref()
            .map_or_else(|| "/".to_string(), |u| u.path().to_string());

        Self {
            base_url,
            domain,
            pathname,
            options: options.clone(),
        }
    }

    /// Whether the permissive cleaning profile was requested by the host.
    #[must_use]
    pub fn wants_permissive_cleaning(&self) -> bool {
        self.options.is_research_page && !self.domain.is_empty()
    }
}

impl Default for ExtractionContext {
    fn default() -> Self {
        Self::new(&Options::default())
    }
}

fn normalize_domain(domain: &str) -> String {
    let lower = domain.trim().trim_end_matches('.').to_ascii_lowercase();
    lower.strip_prefix("www.").map_or(lower.clone(), str::to_string)
}
