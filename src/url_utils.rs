//! URL Utility Functions
//!
//! Validation and resolution of `href`/`src` values found in content.
//! Anything that is not an http(s) URL after resolution, or a relative
//! reference with no base to resolve against, is kept as written only if
//! it looks like a well-formed relative path.

use url::Url;

/// Schemes that never produce a usable link or image.
const REJECTED_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:"];

/// Schemes accepted verbatim for links.
const PASSTHROUGH_SCHEMES: &[&str] = &["mailto:", "tel:"];

/// Check if a string is a valid absolute http(s) URL.
///
/// # Returns
/// * `(is_absolute, parsed_url)` - Whether URL is absolute and the parsed URL if valid
#[must_use]
pub fn is_absolute_url(s: &str) -> (bool, Option<Url>) {
    let s = s.trim();

    if !s.starts_with("http://") && !s.starts_with("https://") {
        return (false, None);
    }

    match Url::parse(s) {
        Ok(url) if url.host().is_some() => (true, Some(url)),
        _ => (false, None),
    }
}

/// Parse a URL string into a Url object.
///
/// # Returns
/// * `Some(Url)` if valid absolute URL, `None` otherwise
#[must_use]
pub fn parse_url(url_str: &str) -> Option<Url> {
    is_absolute_url(url_str).1
}

/// Extract the hostname from an absolute URL.
#[must_use]
pub fn extract_hostname(url_str: &str) -> Option<String> {
    parse_url(url_str).and_then(|u| u.host_str().map(str::to_string))
}

/// Normalize an `href` or `src` attribute value for Markdown output.
///
/// Returns `None` when the value is empty, uses a rejected scheme, or is
/// not a well-formed absolute or relative reference. Relative references
/// are resolved against `base` when one is known.
///
/// ```rust
/// use rs_markclip::url_utils::normalize_href;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/blog/post").ok();
/// assert_eq!(
///     normalize_href("../img/a.png", base.as_ref()).as_deref(),
///     Some("https://example.com/img/a.png")
/// );
/// assert_eq!(normalize_href("javascript:void(0)", base.as_ref()), None);
/// assert_eq!(normalize_href("  ", None), None);
/// ```
#[must_use]
pub fn normalize_href(raw: &str, base: Option<&Url>) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() || value.chars().any(char::is_control) {
        return None;
    }

    let lower = value.to_ascii_lowercase();
    if REJECTED_SCHEMES.iter().any(|s| lower.starts_with(s)) {
        return None;
    }
    if PASSTHROUGH_SCHEMES.iter().any(|s| lower.starts_with(s)) {
        return Some(value.to_string());
    }

    if let (true, Some(url)) = is_absolute_url(value) {
        return Some(url.to_string());
    }

    // Some other scheme ("ftp:", "chrome-extension:"): keep only if it parses.
    if has_scheme(value) {
        return Url::parse(value).ok().map(|u| u.to_string());
    }

    match base {
        Some(base) => base.join(value).ok().map(|u| u.to_string()),
        None => is_relative_reference(value).then(|| value.to_string()),
    }
}

/// Whether the value begins with `scheme:` per RFC 3986.
fn has_scheme(value: &str) -> bool {
    let Some((scheme, _)) = value.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// A relative reference with no whitespace inside it.
fn is_relative_reference(value: &str) -> bool {
    !value.chars().any(char::is_whitespace)
        && Url::parse("http://relative.invalid/")
            .ok()
            .is_some_and(|dummy| dummy.join(value).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Option<Url> {
        Url::parse("https://example.com/docs/guide/").ok()
    }

    #[test]
    fn test_is_absolute_url() {
        assert!(is_absolute_url("https://example.com/path").0);
        assert!(is_absolute_url("http://example.com").0);
        assert!(!is_absolute_url("/relative/path").0);
        assert!(!is_absolute_url("example.com").0);
        assert!(!is_absolute_url("").0);
    }

    #[test]
    fn test_extract_hostname() {
        assert_eq!(
            extract_hostname("https://sub.example.com/a"),
            Some("sub.example.com".to_string())
        );
        assert_eq!(extract_hostname("/a/b"), None);
    }

    #[test]
    fn test_normalize_resolves_relative_against_base() {
        let base = base();
        assert_eq!(
            normalize_href("install", base.as_ref()).as_deref(),
            Some("https://example.com/docs/guide/install")
        );
        assert_eq!(
            normalize_href("/root", base.as_ref()).as_deref(),
            Some("https://example.com/root")
        );
        assert_eq!(
            normalize_href("#section", base.as_ref()).as_deref(),
            Some("https://example.com/docs/guide/#section")
        );
    }

    #[test]
    fn test_normalize_keeps_relative_without_base() {
        assert_eq!(normalize_href("/a/b.png", None).as_deref(), Some("/a/b.png"));
        assert_eq!(normalize_href("img.png", None).as_deref(), Some("img.png"));
        assert_eq!(normalize_href("not a url", None), None);
    }

    #[test]
    fn test_normalize_rejects_script_and_data_urls() {
        let base = base();
        assert_eq!(normalize_href("javascript:alert(1)", base.as_ref()), None);
        assert_eq!(normalize_href("JavaScript:alert(1)", None), None);
        assert_eq!(normalize_href("data:image/png;base64,AAAA", None), None);
    }

    #[test]
    fn test_normalize_passes_mailto_through() {
        assert_eq!(
            normalize_href("mailto:a@example.com", None).as_deref(),
            Some("mailto:a@example.com")
        );
    }
}
