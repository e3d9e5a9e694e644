//! Character encoding detection and transcoding.
//!
//! Captured pages sometimes arrive as raw bytes in a legacy charset. The
//! declared charset is read from a leading BOM or from the `<meta>` tags in
//! the first kilobyte; everything else is treated as UTF-8.

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;

/// `<meta charset="...">`
#[allow(clippy::expect_used)]
static CHARSET_META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>;/]+)"#).expect("valid regex")
});

/// How far into the document charset declarations are looked for.
const SNIFF_LIMIT: usize = 1024;

/// Detect character encoding from HTML bytes.
///
/// A byte order mark wins over any declaration. The `<meta>` pattern covers
/// both `<meta charset>` and the `http-equiv="Content-Type"` form, since the
/// latter also contains `charset=`.
#[must_use]
pub fn detect_encoding(html: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(html) {
        return encoding;
    }

    let head = String::from_utf8_lossy(&html[..html.len().min(SNIFF_LIMIT)]);
    CHARSET_META_RE
        .captures(&head)
        .and_then(|c| c.get(1))
        .and_then(|m| Encoding::for_label(m.as_str().as_bytes()))
        .unwrap_or(UTF_8)
}

/// Transcode HTML bytes to a UTF-8 string.
///
/// Invalid sequences are replaced with U+FFFD rather than rejected.
///
/// ```
/// use rs_markclip::encoding::transcode_to_utf8;
///
/// let html = b"<html><head><meta charset=\"ISO-8859-1\"></head><body>Caf\xE9</body></html>";
/// assert!(transcode_to_utf8(html).contains("Café"));
/// ```
#[must_use]
pub fn transcode_to_utf8(html: &[u8]) -> String {
    let encoding = detect_encoding(html);
    let (decoded, _, _) = encoding.decode(html);
    decoded.into_owned()
}
