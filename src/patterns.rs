//! Compiled regex patterns for content extraction.
//!
//! All patterns are compiled once at startup using `LazyLock` for efficiency.
//! Patterns are organized by their purpose in the extraction pipeline.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Boilerplate Detection Patterns
// =============================================================================

/// Matches class/id names indicating navigation elements.
///
/// "nav" only matches as a whole token or at a token edge so layout
/// containers such as `in-page-nav-container` are left alone.
pub static NAVIGATION_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)((?:^|\s)nav(?:$|\s|[-_])|[-_]nav(?:$|\s)|navbar|navigation|top[-_]?nav|main[-_]?menu|site[-_]?nav|\bmenu\b|site[-_]?footer|site[-_]?header|page[-_]?footer|breadcrumbs?|\bcrumbs?\b|pagination|\bpager\b|skip[-_]?link|table[-_]?of[-_]?contents|\btoc\b)",
    )
    .expect("NAVIGATION_CLASS regex")
});

/// Matches class/id tokens indicating advertisement elements.
pub static ADVERTISEMENT_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(^|[\s_-])(ad|ads|advert|adverts|advertisement|adsbygoogle|ad[-_]?slot|ad[-_]?unit|ad[-_]?container|ad[-_]?wrapper|dfp|sponsor|sponsored|promo|promoted|taboola|outbrain)($|[\s_-])",
    )
    .expect("ADVERTISEMENT_CLASS regex")
});

/// Matches class/id names of social sharing widgets.
pub static SOCIAL_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(social|shar(?:e|ing)[-_]?(?:bar|buttons?|links?|tools?|widget)?\b|addtoany|sharethis|follow[-_]?us)")
        .expect("SOCIAL_CLASS regex")
});

/// Matches class/id names of subscription prompts and consent banners.
pub static SUBSCRIBE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\bsubscribe\b|subscription|newsletter|signup|sign[-_]up|paywall|cookie[-_]?(?:banner|consent|notice)|consent[-_]?banner|gdpr|modal|popup)",
    )
    .expect("SUBSCRIBE_CLASS regex")
});

/// Matches class/id names of general page furniture (comments, related posts).
pub static BOILERPLATE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\bcomments?\b|related|recommend(?:ed|ations)?|more[-_]?from|you[-_]?may[-_]?like|\bfooter\b|copyright|disclaimer|\bsidebar\b|\bwidget\b|tag[-_]?cloud|author[-_]?bio|\bmasthead\b)",
    )
    .expect("BOILERPLATE_CLASS regex")
});

// =============================================================================
// Content Identification Patterns
// =============================================================================

/// Matches class/id names likely to contain main content.
pub static CONTENT_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(article|content|post|entry|story|text|body|main|prose|markdown)")
        .expect("CONTENT_CLASS regex")
});

// =============================================================================
// Markdown Conversion Patterns
// =============================================================================

/// Text that starts like an ordered list item (`12. `).
pub static ORDERED_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,9})([.)])(\s|$)").expect("ORDERED_MARKER regex")
});

/// Text that starts like a bullet, heading, quote or rule marker.
pub static BLOCK_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#{1,6}|[-+*>]|={3,}|-{3,})(\s|$)").expect("BLOCK_MARKER regex")
});

/// `brush: js;` as written by SyntaxHighlighter.
pub static BRUSH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)brush:\s*([\w#+.-]+)").expect("BRUSH regex")
});

/// Characters allowed in a fence info string.
pub static INFO_STRING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9+#._-]*$").expect("INFO_STRING regex")
});

/// Box-drawing glyphs used by directory-tree listings.
pub static TREE_CONNECTOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[├└│]").expect("TREE_CONNECTOR regex")
});

// =============================================================================
// Text Cleaning Patterns
// =============================================================================

/// Matches multiple whitespace characters for normalization.
pub static WHITESPACE_NORMALIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").expect("WHITESPACE_NORMALIZE regex")
});

/// Matches runs of horizontal whitespace (spaces and tabs, no newlines).
pub static HORIZONTAL_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ \t\r\f\u{a0}]+").expect("HORIZONTAL_WHITESPACE regex")
});
