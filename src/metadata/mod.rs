//! Metadata extraction module.
//!
//! Collects the page-level facts written to the front matter: meta tags
//! first, then JSON-LD, then the title element and the first `<h1>`.
//! Every source only fills fields that are still empty.

pub mod dom_extraction;
pub mod json_ld;
pub mod meta_tags;

use std::collections::BTreeMap;

use chrono::SecondsFormat;
use dom_query::Document;

use crate::options::ExtractionContext;

pub use dom_extraction::{extract_dom_title, title_element};
pub use json_ld::extract_json_ld;
pub use meta_tags::{examine_meta, parse_meta_date, validate_metadata_name};

/// Page-level metadata found in the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    /// Raw publication date as found; normalized when written out.
    pub published: Option<String>,
    pub description: Option<String>,
    pub site_name: Option<String>,
}

/// Extract page metadata from the whole document.
#[must_use]
pub fn extract_metadata(doc: &Document) -> PageMetadata {
    let metadata = meta_tags::examine_meta(doc, PageMetadata::default());
    let metadata = json_ld::extract_json_ld(doc, metadata);
    dom_extraction::extract_dom_title(doc, metadata)
}

/// Front matter fields for the document, keyed and sorted for output.
///
/// `source` comes from the context URL and `captured` from the caller's
/// capture time, so repeated calls give identical maps.
#[must_use]
pub fn front_matter(doc: &Document, ctx: &ExtractionContext) -> BTreeMap<String, String> {
    let metadata = extract_metadata(doc);
    let mut fields = BTreeMap::new();

    let mut put = |key: &str, value: Option<String>| {
        if let Some(v) = value.map(|v| v.split_whitespace().collect::<Vec<_>>().join(" ")) {
            if !v.is_empty() {
                fields.insert(key.to_string(), v);
            }
        }
    };

    put("title", metadata.title);
    put("author", metadata.author);
    put("published", metadata.published.map(|raw| normalize_date(&raw)));
    put("description", metadata.description);
    put("site_name", metadata.site_name);
    put("source", ctx.base_url.as_ref().map(ToString::to_string));
    put(
        "captured",
        ctx.options
            .captured_at
            .map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true)),
    );

    fields
}

/// RFC 3339 in UTC when the date parses, the raw text otherwise.
fn normalize_date(raw: &str) -> String {
    meta_tags::parse_meta_date(raw).map_or_else(
        || raw.trim().to_string(),
        |dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}
