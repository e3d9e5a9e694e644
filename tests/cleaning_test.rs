use rs_markclip::dom;
use rs_markclip::extractor::cleaner::{clean, clean_in_place, CleaningRules};
use rs_markclip::extractor::validator::{validate, Rejection, Verdict};
use rs_markclip::selector::CustomSelectors;
use rs_markclip::strategy::CleaningProfile;
use rs_markclip::{extract_with_options, Error, Options};

const PARA: &str = "A paragraph with enough ordinary prose in it to count as real content for validation.";

fn rules<'c>(custom: &'c CustomSelectors, strategy: &'c CustomSelectors) -> CleaningRules<'c> {
    CleaningRules {
        remove_ads: true,
        remove_navigation: true,
        profile: CleaningProfile::Standard,
        custom,
        strategy,
    }
}

#[test]
fn second_cleaning_pass_removes_nothing() {
    let doc = dom::parse(
        r#"<article>
             <header><span>Site name</span></header>
             <h1>Title</h1>
             <div class="share-buttons"><a href="/tw">Tweet</a></div>
             <p>Body <span> </span>text</p>
             <div><div><span></span></div></div>
             <script>track()</script>
             <ul><li></li></ul>
             <p><img src="a.png" alt=""></p>
           </article>"#,
    );
    let none = CustomSelectors::default();
    let rules = rules(&none, &none);

    let cleaned = clean(&doc.select("article"), &rules);
    assert!(cleaned.removed > 0);
    assert_eq!(dom::normalized_text(&cleaned.root()), "Title Body text");
    assert_eq!(cleaned.root().select("img").length(), 1);

    let again = clean_in_place(&cleaned.root(), &rules);
    assert_eq!(again, 0);
}

#[test]
fn custom_selectors_are_removed() {
    let html = format!(
        r#"<html><body><article><h1>Title</h1><p class="byline">BYLINE_TEXT</p>
           <p>{PARA}</p><p>{PARA}</p><div id="promo-box">PROMO_TEXT</div></article></body></html>"#
    );
    let options = Options {
        custom_selectors: vec![".byline".to_string(), "#promo-box".to_string()],
        ..Options::default()
    };

    let result = extract_with_options(&html, &options).unwrap();
    assert!(!result.markdown.contains("BYLINE_TEXT"));
    assert!(!result.markdown.contains("PROMO_TEXT"));
    assert!(result.markdown.contains("A paragraph with"));
}

#[test]
fn invalid_custom_selector_is_reported() {
    let options = Options {
        custom_selectors: vec!["div..broken[".to_string()],
        ..Options::default()
    };
    let result = extract_with_options("<article><p>text</p></article>", &options);
    assert!(matches!(result, Err(Error::InvalidSelector(_))));
}

#[test]
fn keeping_ads_and_navigation_when_disabled() {
    let html = format!(
        r#"<html><body><article><h1>Title</h1>
           <div class="ad-slot">AD_TEXT</div>
           <div class="breadcrumbs">CRUMB_TEXT</div>
           <p>{PARA}</p><p>{PARA}</p></article></body></html>"#
    );
    let options = Options {
        remove_ads: false,
        remove_navigation: false,
        ..Options::default()
    };

    let result = extract_with_options(&html, &options).unwrap();
    assert!(result.markdown.contains("AD_TEXT"));
    assert!(result.markdown.contains("CRUMB_TEXT"));

    let result = extract_with_options(&html, &Options::default()).unwrap();
    assert!(!result.markdown.contains("AD_TEXT"));
    assert!(!result.markdown.contains("CRUMB_TEXT"));
}

fn research_page() -> String {
    format!(
        r#"<html><body><article><h1>Research</h1><p>{PARA}</p>
           <div class="promo-section"><p>PROMO_PROSE {PARA}</p><p>{PARA}</p></div>
           <div class="promo-section">SHORT_PROMO</div>
           </article></body></html>"#
    )
}

#[test]
fn research_pages_keep_prose_in_keyword_matched_blocks() {
    let options = Options {
        url: Some("https://www.anthropic.com/research/some-paper".to_string()),
        ..Options::default()
    };
    let result = extract_with_options(&research_page(), &options).unwrap();
    assert_eq!(result.metadata.strategy_used, "anthropic-research");
    assert!(result.markdown.contains("PROMO_PROSE"));
    assert!(!result.markdown.contains("SHORT_PROMO"));
}

#[test]
fn research_flag_enables_permissive_cleaning_anywhere() {
    let options = Options {
        is_research_page: true,
        domain: Some("example.com".to_string()),
        ..Options::default()
    };
    let result = extract_with_options(&research_page(), &options).unwrap();
    assert_eq!(result.metadata.strategy_used, "generic");
    assert!(result.markdown.contains("PROMO_PROSE"));
}

#[test]
fn standard_pages_drop_keyword_matched_blocks() {
    let options = Options {
        url: Some("https://example.com/research/some-paper".to_string()),
        ..Options::default()
    };
    let result = extract_with_options(&research_page(), &options).unwrap();
    assert!(!result.markdown.contains("PROMO_PROSE"));
    assert!(result.markdown.contains("# Research"));
}

#[test]
fn validator_rejections() {
    let short = dom::parse("<div><h1>T</h1><p>tiny</p></div>");
    assert!(matches!(
        validate(&dom::clone_root(&short), 50),
        Verdict::Invalid(Rejection::TooShort { .. })
    ));

    let flat = dom::parse(&format!("<div>{PARA}</div>"));
    assert_eq!(
        validate(&dom::clone_root(&flat), 50),
        Verdict::Invalid(Rejection::NoStructure)
    );

    let menu = dom::parse(
        r#"<div><h2>Menu</h2><a href="/a">Products and services overview</a>
           <a href="/b">Company history and leadership</a><a href="/c">Careers at our company</a></div>"#,
    );
    assert_eq!(
        validate(&dom::clone_root(&menu), 50),
        Verdict::Invalid(Rejection::PureNavigation)
    );

    let good = dom::parse(&format!("<div><p>{PARA}</p><p>{PARA}</p></div>"));
    assert!(validate(&dom::clone_root(&good), 50).is_valid());
}
