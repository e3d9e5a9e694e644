use std::time::Duration;

use chrono::{TimeZone, Utc};
use rs_markclip::{extract, extract_with_options, Error, ImageRef, Options, Stage};

const PARA: &str = "Plenty of words in this paragraph so the article is accepted without any retries.";

fn article(body: &str) -> String {
    format!(
        r#"<html><head>
             <title>Fallback Title</title>
             <meta property="og:title" content="OG Title">
             <meta name="author" content="Jane Smith">
             <meta property="article:published_time" content="2024-03-01T10:00:00+02:00">
             <meta name="description" content="  A short
                 description.  ">
             <meta property="og:site_name" content="Example Site">
           </head><body><article><h1>Heading</h1><p>{PARA}</p><p>{PARA}</p>{body}</article></body></html>"#
    )
}

#[test]
fn front_matter_is_filled_from_meta_tags() {
    let options = Options {
        url: Some("https://example.com/post".to_string()),
        captured_at: Some(Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()),
        ..Options::default()
    };

    let result = extract_with_options(&article(""), &options).unwrap();
    let fm = &result.front_matter;
    assert_eq!(fm.get("title").map(String::as_str), Some("OG Title"));
    assert_eq!(fm.get("author").map(String::as_str), Some("Jane Smith"));
    assert_eq!(fm.get("published").map(String::as_str), Some("2024-03-01T08:00:00Z"));
    assert_eq!(fm.get("description").map(String::as_str), Some("A short description."));
    assert_eq!(fm.get("site_name").map(String::as_str), Some("Example Site"));
    assert_eq!(fm.get("source").map(String::as_str), Some("https://example.com/post"));
    assert_eq!(fm.get("captured").map(String::as_str), Some("2025-01-02T03:04:05Z"));

    let document = result.to_markdown_document();
    assert!(document.starts_with("---\nauthor: \"Jane Smith\"\n"));
    assert!(document.contains("---\n\n# Heading\n\n"));
}

#[test]
fn front_matter_omits_unknown_fields() {
    let result = extract(&format!(
        "<html><body><article><h1>Only Heading</h1><p>{PARA}</p><p>{PARA}</p></article></body></html>"
    ))
    .unwrap();

    assert_eq!(result.front_matter.len(), 1);
    assert_eq!(
        result.front_matter.get("title").map(String::as_str),
        Some("Only Heading")
    );
}

#[test]
fn images_are_resolved_and_deduplicated() {
    let html = article(
        r#"<p><img src="/a.png" alt="First"></p>
           <p><img data-src="lazy.png" alt="Lazy  image"></p>
           <p><img src="https://example.com/a.png" alt="Again"></p>
           <p><img src="javascript:alert(1)" alt="Bad"></p>"#,
    );
    let options = Options {
        url: Some("https://example.com/blog/post".to_string()),
        ..Options::default()
    };

    let result = extract_with_options(&html, &options).unwrap();
    assert_eq!(
        result.images,
        vec![
            ImageRef {
                src: "https://example.com/a.png".to_string(),
                alt: "First".to_string(),
            },
            ImageRef {
                src: "https://example.com/blog/lazy.png".to_string(),
                alt: "Lazy image".to_string(),
            },
        ]
    );
    assert!(result.markdown.contains("![Lazy image](https://example.com/blog/lazy.png)"));
    assert!(!result.markdown.contains("javascript:"));
}

#[test]
fn images_can_be_left_out_of_the_list() {
    let options = Options {
        include_images: false,
        ..Options::default()
    };
    let result = extract_with_options(&article(r#"<p><img src="/a.png" alt="A"></p>"#), &options).unwrap();
    assert!(result.images.is_empty());
    assert!(result.markdown.contains("![A](/a.png)"));
}

#[test]
fn preserve_formatting_keeps_line_breaks_in_text() {
    let html = article("<p>line one\nline two</p>");

    let collapsed = extract(&html).unwrap();
    assert!(collapsed.markdown.contains("line one line two"));

    let options = Options {
        preserve_formatting: true,
        ..Options::default()
    };
    let preserved = extract_with_options(&html, &options).unwrap();
    assert!(preserved.markdown.contains("line one\nline two"));
}

#[test]
fn reading_time_follows_words_per_minute() {
    let options = Options {
        words_per_minute: 10,
        ..Options::default()
    };
    let result = extract_with_options(&article(""), &options).unwrap();
    let words = result.metadata.word_count;
    assert!(words > 20);
    assert_eq!(result.metadata.estimated_reading_time, words.div_ceil(10));
}

#[test]
fn zero_timeout_stops_before_selection() {
    let options = Options {
        timeout: Some(Duration::ZERO),
        ..Options::default()
    };
    match extract_with_options(&article(""), &options) {
        Err(Error::Timeout { stage, partial, .. }) => {
            assert_eq!(stage, Stage::Selection);
            assert!(partial.is_none());
        }
        other => panic!("expected a timeout, got {other:?}"),
    }
}

#[test]
fn generous_timeout_does_not_interfere() {
    let options = Options {
        timeout: Some(Duration::from_secs(60)),
        ..Options::default()
    };
    let result = extract_with_options(&article(""), &options).unwrap();
    assert!(result.markdown.starts_with("# Heading"));
}

#[test]
fn result_serializes_to_json() {
    let result = extract(&article("")).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["metadata"]["strategy_used"], "generic");
    assert_eq!(json["metadata"]["outcome"], "accepted");
    assert!(json["markdown"].as_str().unwrap().starts_with("# Heading"));
}
