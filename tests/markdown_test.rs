use rs_markclip::dom;
use rs_markclip::markdown::{convert, ConvertOptions};
use rs_markclip::{extract_with_options, Options};

fn md(html: &str) -> String {
    let doc = dom::parse(html);
    convert(&dom::clone_root(&doc), &ConvertOptions::default())
}

const PARA: &str = "Enough surrounding prose so that the article passes the quality validator easily.";

#[test]
fn ordered_list_keeps_every_item_in_order() {
    let out = md("<ol><li>first</li><li>second</li><li>third</li></ol>");
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines, vec!["1. first", "2. second", "3. third"]);
}

#[test]
fn numbered_text_outside_a_list_stays_a_paragraph() {
    let out = md("<div><p>1. foo</p><p>Intro</p></div>");
    assert_eq!(out, "1\\. foo\n\nIntro");
    assert!(!out.starts_with("1. "));
}

#[test]
fn multi_paragraph_list_item_is_indented() {
    let out = md("<ul><li><p>one</p><p>more</p></li><li>two</li></ul>");
    assert_eq!(out, "- one\n\n  more\n- two");
}

#[test]
fn code_block_gets_language_and_decoded_entities() {
    let out = md(
        r#"<div><pre><code class="language-html">&lt;a href=&quot;x&quot;&gt;Tom &amp;amp; Jerry&lt;/a&gt;</code></pre></div>"#,
    );
    assert_eq!(out, "```html\n<a href=\"x\">Tom &amp; Jerry</a>\n```");
}

#[test]
fn code_block_language_alias_from_wrapper() {
    let out = md(r#"<div class="highlight highlight-source-js"><pre>let a = 1;</pre></div>"#);
    assert_eq!(out, "```javascript\nlet a = 1;\n```");
}

#[test]
fn collapsed_tree_listing_is_rebuilt() {
    let out = md("<pre>├── a ├── b └── c</pre>");
    assert_eq!(out, "```\n├── a\n├── b\n└── c\n```");
}

#[test]
fn multi_line_tree_listing_is_verbatim() {
    let out = md("<pre>src\n├── main.rs\n└── lib.rs</pre>");
    assert_eq!(out, "```\nsrc\n├── main.rs\n└── lib.rs\n```");
}

#[test]
fn code_containing_fences_gets_longer_fence() {
    let out = md("<pre>```\ninner\n```</pre>");
    assert_eq!(out, "````\n```\ninner\n```\n````");
}

#[test]
fn inline_formatting_and_escaping() {
    let out = md("<p>Use <code>*args</code> with <em>care</em>, not 2*3_4 [sic].</p>");
    assert_eq!(out, r"Use `*args` with *care*, not 2\*3\_4 \[sic\].");
}

#[test]
fn links_without_usable_href_become_text() {
    let out = md(r#"<p><a href="">empty</a> <a href="javascript:go()">script</a> <a href="mailto:a@b.c">mail</a></p>"#);
    assert_eq!(out, "empty script [mail](mailto:a@b.c)");
}

#[test]
fn table_with_header_and_alignment() {
    let out = md(
        r#"<table>
             <thead><tr><th>Name</th><th style="text-align: right">Count</th></tr></thead>
             <tbody><tr><td>apples</td><td>3</td></tr><tr><td>pears | plums</td></tr></tbody>
           </table>"#,
    );
    assert_eq!(
        out,
        "| Name | Count |\n| --- | ---: |\n| apples | 3 |\n| pears \\| plums |  |"
    );
}

#[test]
fn blockquote_with_nested_paragraphs() {
    assert_eq!(md("<blockquote><p>a</p><p>b</p></blockquote>"), "> a\n>\n> b");
}

#[test]
fn pipeline_resolves_relative_urls_and_converts_code() {
    let html = format!(
        r#"<html><body><main>
             <h1>Guide</h1>
             <p>{PARA}</p>
             <p>See <a href="../other">the other page</a>.</p>
             <pre><code class="lang-py">print("hi")</code></pre>
             <p><img src="img/diagram.png" alt="Diagram"></p>
           </main></body></html>"#
    );
    let options = Options {
        url: Some("https://example.com/docs/guide/".to_string()),
        ..Options::default()
    };

    let result = extract_with_options(&html, &options).unwrap();
    assert!(result.markdown.contains("[the other page](https://example.com/docs/other)"));
    assert!(result.markdown.contains("```python\nprint(\"hi\")\n```"));
    assert!(result
        .markdown
        .contains("![Diagram](https://example.com/docs/guide/img/diagram.png)"));
}
