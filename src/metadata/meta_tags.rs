//! HTML Meta Tag Extraction
//!
//! Reads `<meta>` tags (standard names, Open Graph, Twitter cards) into a
//! lookup table, then picks each field from its candidate names in a fixed
//! priority order so the result does not depend on tag order in `<head>`.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use dom_query::{Document, Selection};

use crate::dom;

use super::PageMetadata;

const TITLE_KEYS: &[&str] = &["og:title", "twitter:title"];
const AUTHOR_KEYS: &[&str] = &["author", "article:author", "dc.creator", "parsely-author"];
const PUBLISHED_KEYS: &[&str] = &[
    "article:published_time",
    "og:article:published_time",
    "datepublished",
    "dc.date.issued",
    "pubdate",
];
const DESCRIPTION_KEYS: &[&str] = &["description", "og:description", "twitter:description"];
const SITE_NAME_KEYS: &[&str] = &["og:site_name", "application-name"];

/// Fill missing fields of `original` from the document's meta tags.
#[must_use]
pub fn examine_meta(doc: &Document, original: PageMetadata) -> PageMetadata {
    let tags = collect_meta(doc);
    let first = |keys: &[&str]| keys.iter().find_map(|k| tags.get(*k).cloned());

    let mut result = original;
    if result.title.is_none() {
        result.title = first(TITLE_KEYS);
    }
    if result.author.is_none() {
        result.author = AUTHOR_KEYS
            .iter()
            .filter_map(|k| tags.get(*k))
            .find(|v| validate_metadata_name(v))
            .cloned();
    }
    if result.published.is_none() {
        result.published = first(PUBLISHED_KEYS);
    }
    if result.description.is_none() {
        result.description = first(DESCRIPTION_KEYS);
    }
    if result.site_name.is_none() {
        result.site_name = first(SITE_NAME_KEYS);
    }
    result
}

/// Lowercased meta name (or property) to trimmed content, first occurrence wins.
fn collect_meta(doc: &Document) -> HashMap<String, String> {
    let mut tags = HashMap::new();
    for node in doc.select("meta").nodes() {
        let meta = Selection::from(*node);
        let Some(name) = dom::non_empty_attribute(&meta, "name")
            .or_else(|| dom::non_empty_attribute(&meta, "property"))
            .or_else(|| dom::non_empty_attribute(&meta, "itemprop"))
        else {
            continue;
        };
        let Some(content) = dom::non_empty_attribute(&meta, "content") else {
            continue;
        };
        tags.entry(name.trim().to_lowercase())
            .or_insert_with(|| content.trim().to_string());
    }
    tags
}

/// Validate that a metadata value looks like a person's name.
///
/// Rejects URLs, JSON blobs, IDs and values with too many symbols.
#[must_use]
pub fn validate_metadata_name(name: &str) -> bool {
    let name = name.trim();

    if name.chars().count() < 2 || name.len() > 120 {
        return false;
    }
    if name.len() > 20 && !name.contains(' ') {
        return false;
    }
    if name.starts_with("http://") || name.starts_with("https://") || name.starts_with("www.") {
        return false;
    }
    if name.starts_with('{') || name.starts_with('[') {
        return false;
    }
    if name.chars().filter(char::is_ascii_digit).count() > 3 {
        return false;
    }

    let special = name
        .chars()
        .filter(|c| !c.is_alphanumeric() && !c.is_whitespace() && !matches!(c, '-' | '\'' | '.'))
        .count();
    special <= 2
}

/// Parse a date string from meta tags or JSON-LD.
///
/// Supports RFC 3339, ISO 8601 without offset, and a few common date-only
/// formats.
#[must_use]
pub fn parse_meta_date(date_str: &str) -> Option<DateTime<Utc>> {
    let date_str = date_str.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, fmt) {
            return Some(dt.and_utc());
        }
    }

    let formats = ["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y"];
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_str, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(html: &str) -> PageMetadata {
        examine_meta(&Document::from(html), PageMetadata::default())
    }

    #[test]
    fn test_og_title_wins_over_twitter_regardless_of_order() {
        let m = meta(
            r#"<head><meta name="twitter:title" content="Tw"><meta property="og:title" content="OG"></head>"#,
        );
        assert_eq!(m.title.as_deref(), Some("OG"));
    }

    #[test]
    fn test_author_skips_profile_urls() {
        let m = meta(
            r#"<head><meta property="article:author" content="https://facebook.com/someone">
               <meta name="dc.creator" content="Jane Doe"></head>"#,
        );
        assert_eq!(m.author.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_published_description_site_name() {
        let m = meta(
            r#"<head><meta property="article:published_time" content="2024-03-01T10:00:00+02:00">
               <meta name="description" content="About things">
               <meta property="og:site_name" content="Example"></head>"#,
        );
        assert_eq!(m.published.as_deref(), Some("2024-03-01T10:00:00+02:00"));
        assert_eq!(m.description.as_deref(), Some("About things"));
        assert_eq!(m.site_name.as_deref(), Some("Example"));
    }

    #[test]
    fn test_preserves_existing_fields() {
        let original = PageMetadata {
            title: Some("Kept".to_string()),
            ..PageMetadata::default()
        };
        let m = examine_meta(
            &Document::from(r#"<meta property="og:title" content="Other">"#),
            original,
        );
        assert_eq!(m.title.as_deref(), Some("Kept"));
    }

    #[test]
    fn test_validate_metadata_name() {
        assert!(validate_metadata_name("John Smith"));
        assert!(validate_metadata_name("O'Brien"));
        assert!(!validate_metadata_name("x"));
        assert!(!validate_metadata_name("https://example.com/me"));
        assert!(!validate_metadata_name("{\"name\":\"x\"}"));
        assert!(!validate_metadata_name("user12345"));
    }

    #[test]
    fn test_parse_meta_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|d| d.and_utc());
        assert_eq!(parse_meta_date("2024-01-15"), expected);
        assert_eq!(parse_meta_date("January 15, 2024"), expected);
        assert_eq!(parse_meta_date("15 January 2024"), expected);
        assert!(parse_meta_date("2024-01-15T08:30:00Z").is_some());
        assert!(parse_meta_date("yesterday").is_none());
    }
}
