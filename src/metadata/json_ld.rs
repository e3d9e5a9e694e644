//! JSON-LD Metadata Parsing
//!
//! Schema.org objects embedded as `<script type="application/ld+json">`.
//! Article-like objects are collected from top-level values, arrays and
//! `@graph` lists (nested objects are searched too) and ranked so a
//! shallow `Article` beats a `WebPage` buried inside it.

use dom_query::{Document, Selection};
use serde_json::{Map, Value};

use crate::dom;

use super::PageMetadata;

/// A typed schema object and how relevant it is.
#[derive(Debug, Clone)]
struct SchemaObject {
    data: Map<String, Value>,
    importance: i32,
}

/// Fill missing fields of `original` from JSON-LD.
#[must_use]
pub fn extract_json_ld(doc: &Document, original: PageMetadata) -> PageMetadata {
    let mut result = original;
    let articles = decode_json_ld(doc);

    for article in &articles {
        if result.title.is_none() {
            result.title = string_value(&article.data, "headline")
                .or_else(|| string_value(&article.data, "name"));
        }
        if result.author.is_none() {
            result.author = article.data.get("author").and_then(author_name);
        }
        if result.published.is_none() {
            result.published = string_value(&article.data, "datePublished");
        }
        if result.description.is_none() {
            result.description = string_value(&article.data, "description");
        }
        if result.site_name.is_none() {
            result.site_name = article
                .data
                .get("publisher")
                .and_then(Value::as_object)
                .and_then(|p| string_value(p, "name"));
        }
    }

    result
}

/// Article-like objects of every JSON-LD script, most important first.
fn decode_json_ld(doc: &Document) -> Vec<SchemaObject> {
    let mut articles = Vec::new();

    for script in doc.select(r#"script[type="application/ld+json"]"#).nodes() {
        let text = dom::text_content(&Selection::from(*script)).trim().to_string();
        if text.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => collect_articles(&value, 0, &mut articles),
            Err(e) => tracing::debug!(error = %e, "skipping malformed JSON-LD"),
        }
    }

    // Stable: document order breaks ties.
    articles.sort_by(|a, b| b.importance.cmp(&a.importance));
    articles
}

fn collect_articles(value: &Value, depth: i32, out: &mut Vec<SchemaObject>) {
    match value {
        Value::Object(map) => {
            let types = schema_types(map);
            if types.iter().any(|t| is_article_type(t)) {
                let base = if types.iter().any(|t| t == "webpage") { 50 } else { 100 };
                out.push(SchemaObject {
                    data: map.clone(),
                    importance: base - depth * 10,
                });
            }
            for (key, val) in map {
                if key != "author" && key != "publisher" {
                    collect_articles(val, depth + 1, out);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_articles(item, depth, out);
            }
        }
        _ => {}
    }
}

/// Lowercased `@type` values.
fn schema_types(map: &Map<String, Value>) -> Vec<String> {
    match map.get("@type") {
        Some(Value::String(s)) => vec![s.to_lowercase()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_lowercase)
            .collect(),
        _ => Vec::new(),
    }
}

fn is_article_type(t: &str) -> bool {
    matches!(
        t,
        "article"
            | "newsarticle"
            | "blogposting"
            | "webpage"
            | "report"
            | "techarticle"
            | "scholarlyarticle"
            | "socialmediaposting"
    )
}

fn string_value(data: &Map<String, Value>, key: &str) -> Option<String> {
    let value = match data.get(key)? {
        Value::Array(items) => items.first()?,
        other => other,
    };
    let s = value.as_str()?.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Author as a string, a Person object (name or given + family name), or
/// the first of a list of either.
fn author_name(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Object(map) => string_value(map, "name").or_else(|| {
            let given = map.get("givenName").and_then(Value::as_str).unwrap_or("");
            let family = map.get("familyName").and_then(Value::as_str).unwrap_or("");
            let full = format!("{} {}", given.trim(), family.trim()).trim().to_string();
            (!full.is_empty()).then_some(full)
        }),
        Value::Array(items) => items.iter().find_map(author_name),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ld(json: &str) -> PageMetadata {
        let html = format!(r#"<script type="application/ld+json">{json}</script>"#);
        extract_json_ld(&Document::from(html.as_str()), PageMetadata::default())
    }

    #[test]
    fn test_simple_article() {
        let m = ld(r#"{"@type":"NewsArticle","headline":"Big News",
                      "author":{"@type":"Person","name":"Jane Doe"},
                      "datePublished":"2024-01-15",
                      "publisher":{"@type":"Organization","name":"Daily"}}"#);
        assert_eq!(m.title.as_deref(), Some("Big News"));
        assert_eq!(m.author.as_deref(), Some("Jane Doe"));
        assert_eq!(m.published.as_deref(), Some("2024-01-15"));
        assert_eq!(m.site_name.as_deref(), Some("Daily"));
    }

    #[test]
    fn test_graph_prefers_article_over_webpage() {
        let m = ld(r#"{"@graph":[
            {"@type":"WebPage","name":"Page Name"},
            {"@type":"BlogPosting","headline":"Post Title","author":[{"givenName":"Ada","familyName":"Lovelace"}]}
        ]}"#);
        assert_eq!(m.title.as_deref(), Some("Post Title"));
        assert_eq!(m.author.as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn test_invalid_json_is_skipped() {
        let m = ld("{not json");
        assert!(m.title.is_none());
    }
}
