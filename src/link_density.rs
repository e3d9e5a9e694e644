//! Link Density
//!
//! Ratio of link text to total text, used by the scorer's link penalty,
//! the validator's navigation check and the fallback's paragraph filter.

use crate::dom::{self, Selection};

/// Link text shorter than this counts as a "short" link (menu entry).
const SHORT_LINK_CHARS: usize = 10;

/// Heuristics on the links inside an element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkInfo {
    /// Characters of link text.
    pub link_chars: usize,
    /// Characters of all text.
    pub text_chars: usize,
    /// Links carrying some text.
    pub non_empty_links: usize,
    /// Non-empty links with fewer than ten characters.
    pub short_links: usize,
}

impl LinkInfo {
    /// Link characters over text characters, `0.0` for text-less elements.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn density(&self) -> f64 {
        if self.text_chars == 0 {
            return 0.0;
        }
        (self.link_chars as f64 / self.text_chars as f64).min(1.0)
    }

    /// Share of links that are short, `0.0` without links.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn short_link_ratio(&self) -> f64 {
        if self.non_empty_links == 0 {
            return 0.0;
        }
        self.short_links as f64 / self.non_empty_links as f64
    }
}

/// Collect heuristics on link text.
#[must_use]
pub fn collect_link_info(element: &Selection) -> LinkInfo {
    let mut info = LinkInfo {
        text_chars: dom::text_length(element),
        ..LinkInfo::default()
    };

    for link in element.select("a").iter() {
        let len = dom::text_length(&link);
        if len == 0 {
            continue;
        }
        info.link_chars += len;
        info.non_empty_links += 1;
        if len < SHORT_LINK_CHARS {
            info.short_links += 1;
        }
    }

    info
}

/// Ratio of link text to total text, in `0.0..=1.0`.
#[must_use]
pub fn link_density(element: &Selection) -> f64 {
    collect_link_info(element).density()
}

/// Whether a block reads like a link list rather than prose.
///
/// True when link text makes up more than 80% of the text, or when the
/// block is short and most of its several links are menu-sized.
#[must_use]
pub fn is_link_dominated(element: &Selection) -> bool {
    let info = collect_link_info(element);
    if info.non_empty_links == 0 {
        return false;
    }
    if info.density() > 0.8 {
        return true;
    }
    info.text_chars < 100 && info.non_empty_links > 1 && info.short_link_ratio() > 0.8
}
