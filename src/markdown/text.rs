//! Text escaping and whitespace handling.

use crate::patterns::{BLOCK_MARKER, HORIZONTAL_WHITESPACE, ORDERED_MARKER, WHITESPACE_NORMALIZE};

/// Characters that have special meaning in Markdown and need escaping.
const MARKDOWN_SPECIAL_CHARS: &[char] = &['\\', '*', '_', '[', ']', '<', '>', '`'];

/// Escape Markdown special characters in text content.
///
/// # Examples
///
/// ```
/// use rs_markclip::markdown::text::escape_markdown;
///
/// assert_eq!(escape_markdown("*not italic*"), r"\*not italic\*");
/// assert_eq!(escape_markdown("my_variable_name"), r"my\_variable\_name");
/// ```
#[must_use]
pub fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 4);
    for ch in text.chars() {
        if MARKDOWN_SPECIAL_CHARS.contains(&ch) {
            result.push('\\');
        }
        result.push(ch);
    }
    result
}

/// Escape a leading list, heading or rule marker so the line stays a
/// plain paragraph line: `1. foo` becomes `1\. foo`, `# x` becomes `\# x`.
#[must_use]
pub fn escape_block_start(line: &str) -> String {
    let body = line.trim_start();
    let indent = &line[..line.len() - body.len()];

    if let Some(caps) = ORDERED_MARKER.captures(body) {
        let digits = caps.get(1).map_or(0, |m| m.end());
        return format!("{indent}{}\\{}", &body[..digits], &body[digits..]);
    }
    if BLOCK_MARKER.is_match(body) {
        return format!("{indent}\\{body}");
    }
    line.to_string()
}

/// Collapse whitespace in a text node.
///
/// With `keep_newlines`, runs of spaces and tabs collapse but line breaks
/// survive, each followed by no indentation.
#[must_use]
pub fn collapse_whitespace(text: &str, keep_newlines: bool) -> String {
    if !keep_newlines {
        return WHITESPACE_NORMALIZE.replace_all(text, " ").into_owned();
    }
    let collapsed = HORIZONTAL_WHITESPACE.replace_all(text, " ");
    collapsed
        .split('\n')
        .enumerate()
        .map(|(i, line)| if i == 0 { line } else { line.trim_start() })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Indent every line after the first by `width` spaces. Blank lines stay blank.
#[must_use]
pub fn indent_continuation(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    let mut out = String::with_capacity(text.len() + width * 4);
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
            if !line.trim().is_empty() {
                out.push_str(&pad);
            }
        }
        out.push_str(line);
    }
    out
}

/// Prefix every line for a blockquote. Runs of blank lines become one `>`.
#[must_use]
pub fn quote_lines(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut previous_blank = false;
    for line in text.split('\n') {
        let blank = line.trim().is_empty();
        if blank && previous_blank {
            continue;
        }
        previous_blank = blank;
        lines.push(if blank { ">".to_string() } else { format!("> {line}") });
    }
    lines.join("\n")
}

/// Move leading and trailing whitespace outside a pair of delimiters.
#[must_use]
pub fn wrap_inline(content: &str, delimiter: &str) -> String {
    let inner = content.trim();
    if inner.is_empty() {
        return String::new();
    }
    let lead = if content.starts_with(char::is_whitespace) { " " } else { "" };
    let trail = if content.ends_with(char::is_whitespace) { " " } else { "" };
    format!("{lead}{delimiter}{inner}{delimiter}{trail}")
}

/// Final pass over the assembled document.
///
/// Outside fenced code: whitespace-only lines become empty, trailing
/// spaces are dropped except two-space hard breaks, and runs of blank
/// lines collapse to one. Fenced code is left exactly as emitted.
#[must_use]
pub fn normalize_output(markdown: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut fence: Option<String> = None;
    let mut blank_run = 0;

    for line in markdown.split('\n') {
        if let Some(open) = &fence {
            let closes = {
                let t = line.trim();
                t.starts_with(open.as_str()) && t.chars().all(|c| c == '`')
            };
            out.push(line.to_string());
            if closes {
                fence = None;
            }
            continue;
        }

        let trimmed_start = line.trim_start();
        if trimmed_start.starts_with("```") {
            let ticks: String = trimmed_start.chars().take_while(|c| *c == '`').collect();
            fence = Some(ticks);
            blank_run = 0;
            out.push(line.trim_end().to_string());
            continue;
        }

        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run == 1 {
                out.push(String::new());
            }
            continue;
        }
        blank_run = 0;

        let keep_break = line.ends_with("  ") && !line.ends_with("   ");
        let mut kept = line.trim_end().to_string();
        if keep_break {
            kept.push_str("  ");
        }
        out.push(kept);
    }

    let joined = out.join("\n");
    let trimmed = joined.trim_matches('\n');
    // A hard break at the very end of the document means nothing.
    trimmed.trim_end().to_string()
}
