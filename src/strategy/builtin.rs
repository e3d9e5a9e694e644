//! Built-in strategy table.

use super::{CleaningProfile, SelectorGroup, SiteStrategy, GENERIC};
use crate::scoring::{Points, RuleKind, ScoringRule, Signal};

pub(super) fn generic() -> SiteStrategy {
    SiteStrategy::new(
        GENERIC,
        0,
        &[],
        &[],
        vec![
            SelectorGroup {
                name: "article-body",
                queries: &[
                    r#"[itemprop="articleBody"]"#,
                    ".post-content",
                    ".entry-content",
                    ".article-content",
                    ".article-body",
                    ".post-body",
                    ".story-body",
                    "#article-body",
                    ".markdown-body",
                    ".prose",
                ],
            },
            SelectorGroup {
                name: "semantic",
                queries: &["article", "main", r#"[role="main"]"#],
            },
            SelectorGroup {
                name: "content-container",
                queries: &[
                    "#content",
                    "#main-content",
                    "#main",
                    ".main-content",
                    ".content",
                    ".post",
                    ".entry",
                ],
            },
        ],
    )
}

fn paragraph_units(f: &crate::scoring::CandidateFeatures) -> f64 {
    f.paragraphs as f64
}

pub(super) fn site_strategies() -> Vec<SiteStrategy> {
    vec![
        anthropic_research(),
        documentation(),
        github(),
        wikipedia(),
        blog_platform(),
    ]
}

/// Long-form research and engineering posts. Their layouts wrap prose in
/// containers whose class names trip the ad and navigation keywords, so
/// cleaning is permissive and long text is rewarded.
fn anthropic_research() -> SiteStrategy {
    SiteStrategy::new(
        "anthropic-research",
        100,
        &[r"(^|\.)anthropic\.com$"],
        &[r"^/(research|news|engineering|index)(/|$)"],
        vec![
            SelectorGroup {
                name: "research-article",
                queries: &[
                    "main article",
                    "article",
                    r#"[class*="PostDetail"]"#,
                    r#"[class*="post-detail"]"#,
                ],
            },
            SelectorGroup {
                name: "research-body",
                queries: &[r#"[class*="ArticleBody"]"#, ".prose", "main"],
            },
        ],
    )
    .with_cleaning(CleaningProfile::Permissive)
    .with_scoring(vec![
        ScoringRule::bonus("long-form", Signal::Structure, |f| f.text_length > 2000, 20.0),
        ScoringRule {
            name: "paragraphs",
            kind: RuleKind::Bonus,
            signal: Signal::Structure,
            predicate: |f| f.paragraphs > 0,
            points: Points::PerUnit {
                measure: paragraph_units,
                weight: 3.0,
                cap: 60.0,
            },
        },
    ])
}

fn documentation() -> SiteStrategy {
    SiteStrategy::new(
        "documentation",
        60,
        &[
            r"^docs\.",
            r"^developer\.",
            r"\.readthedocs\.io$",
            r"^docs\.rs$",
            r"^doc\.rust-lang\.org$",
        ],
        &[],
        vec![SelectorGroup {
            name: "doc-body",
            queries: &[
                ".theme-doc-markdown",
                ".rst-content .document",
                ".rst-content",
                ".markdown-section",
                "article.doc",
                ".docs-content",
                "main .content",
                "#main-content",
            ],
        }],
    )
    .with_exclusions(&[
        ".headerlink",
        ".edit-this-page",
        ".theme-doc-footer",
        ".pagination-nav",
        ".theme-doc-toc-mobile",
    ])
    // Layout wrappers on doc sites routinely carry "nav" in their class names.
    .with_scoring(vec![ScoringRule::penalty(
        "navigation-class",
        Signal::ClassName,
        |f| f.navigation_class,
        20.0,
    )])
}

fn github() -> SiteStrategy {
    SiteStrategy::new(
        "github",
        50,
        &[r"(^|\.)github\.com$"],
        &[],
        vec![
            SelectorGroup {
                name: "readme",
                queries: &["article.markdown-body", "#readme .markdown-body", ".markdown-body"],
            },
            SelectorGroup {
                name: "discussion",
                queries: &[".js-comment-body", ".comment-body"],
            },
        ],
    )
    .with_exclusions(&[".anchor", ".octicon", ".zeroclipboard-container", "clipboard-copy"])
    .with_scoring(vec![ScoringRule::bonus(
        "markdown-body",
        Signal::ClassName,
        |f| f.id_class.contains("markdown-body"),
        30.0,
    )])
}

fn wikipedia() -> SiteStrategy {
    SiteStrategy::new(
        "wikipedia",
        50,
        &[r"(^|\.)wikipedia\.org$"],
        &[r"^/wiki/"],
        vec![SelectorGroup {
            name: "wiki-body",
            queries: &["#mw-content-text .mw-parser-output", "#mw-content-text", "#bodyContent"],
        }],
    )
    .with_exclusions(&[
        ".mw-editsection",
        "sup.reference",
        ".navbox",
        ".mw-jump-link",
        "#toc",
        ".noprint",
    ])
}

fn blog_platform() -> SiteStrategy {
    SiteStrategy::new(
        "blog-platform",
        40,
        &[
            r"(^|\.)medium\.com$",
            r"(^|\.)substack\.com$",
            r"(^|\.)wordpress\.com$",
            r"(^|\.)blogspot\.com$",
            r"(^|\.)ghost\.io$",
            r"^dev\.to$",
            r"(^|\.)hashnode\.dev$",
        ],
        &[],
        vec![SelectorGroup {
            name: "post-body",
            queries: &[
                r#"section[data-field="body"]"#,
                ".available-content .body",
                ".crayons-article__body",
                ".post-content",
                ".entry-content",
                ".post-body",
                "article",
            ],
        }],
    )
    .with_exclusions(&[
        ".post-meta",
        ".subscribe-widget",
        ".subscription-widget-wrap",
        ".pw-multi-vote-count",
        ".crayons-article__actions",
        ".sharedaddy",
    ])
}
