//! Code blocks: language detection, tree-listing repair and fencing.

use crate::dom::{self, Selection};
use crate::patterns::{BRUSH, INFO_STRING, TREE_CONNECTOR};

/// Canonical language names accepted in a fence info string.
const KNOWN_LANGUAGES: &[&str] = &[
    "bash", "c", "clojure", "cpp", "csharp", "css", "dart", "diff", "dockerfile", "elixir",
    "erlang", "go", "graphql", "haskell", "html", "ini", "java", "javascript", "json", "jsx",
    "julia", "kotlin", "latex", "lua", "makefile", "markdown", "nginx", "objectivec", "ocaml",
    "perl", "php", "powershell", "protobuf", "python", "r", "ruby", "rust", "scala", "scss",
    "solidity", "sql", "swift", "text", "toml", "tsx", "typescript", "vim", "xml", "yaml", "zig",
];

/// Alternative spellings and their canonical name.
const LANGUAGE_ALIASES: &[(&str, &str)] = &[
    ("c#", "csharp"),
    ("c++", "cpp"),
    ("cc", "cpp"),
    ("cjs", "javascript"),
    ("clj", "clojure"),
    ("console", "bash"),
    ("cs", "csharp"),
    ("cxx", "cpp"),
    ("docker", "dockerfile"),
    ("erl", "erlang"),
    ("ex", "elixir"),
    ("exs", "elixir"),
    ("golang", "go"),
    ("hpp", "cpp"),
    ("hs", "haskell"),
    ("htm", "html"),
    ("js", "javascript"),
    ("json5", "json"),
    ("jsonc", "json"),
    ("kt", "kotlin"),
    ("make", "makefile"),
    ("md", "markdown"),
    ("mjs", "javascript"),
    ("mk", "makefile"),
    ("ml", "ocaml"),
    ("objc", "objectivec"),
    ("objective-c", "objectivec"),
    ("plain", "text"),
    ("plaintext", "text"),
    ("proto", "protobuf"),
    ("ps1", "powershell"),
    ("pwsh", "powershell"),
    ("py", "python"),
    ("py3", "python"),
    ("python3", "python"),
    ("rb", "ruby"),
    ("rs", "rust"),
    ("sh", "bash"),
    ("shell", "bash"),
    ("shell-session", "bash"),
    ("tex", "latex"),
    ("ts", "typescript"),
    ("txt", "text"),
    ("xhtml", "html"),
    ("yml", "yaml"),
    ("zsh", "bash"),
];

/// Names too generic to trust as a bare class token.
const BARE_TOKEN_EXCLUDED: &[&str] = &[
    "c", "r", "text", "plain", "plaintext", "txt", "ml", "ex", "make", "mk", "cs", "md", "tex",
    "cc", "console",
];

/// Class prefixes that name a language explicitly.
const CLASS_PREFIXES: &[&str] = &["language-", "lang-", "highlight-source-"];

/// Canonical language name for a spelling, `None` if unknown.
#[must_use]
pub fn canonical_language(name: &str) -> Option<&'static str> {
    let lower = name.trim().to_ascii_lowercase();
    if let Some(known) = KNOWN_LANGUAGES.iter().find(|l| **l == lower) {
        return Some(known);
    }
    LANGUAGE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map(|(_, canonical)| *canonical)
}

/// Normalize an explicitly declared language: known spellings map to their
/// canonical name, other well-formed names are kept lowercased.
fn normalize_declared(name: &str) -> Option<String> {
    let lower = name.trim().to_ascii_lowercase();
    if let Some(canonical) = canonical_language(&lower) {
        return Some(canonical.to_string());
    }
    INFO_STRING.is_match(&lower).then_some(lower)
}

/// Language declared on one element, by any supported convention.
fn declared_language(sel: &Selection) -> Option<String> {
    let class = dom::class_name(sel).unwrap_or_default();

    for token in class.split_whitespace() {
        let lower = token.to_ascii_lowercase();
        for prefix in CLASS_PREFIXES {
            if let Some(rest) = lower.strip_prefix(prefix) {
                if let Some(lang) = normalize_declared(rest) {
                    return Some(lang);
                }
            }
        }
    }

    if let Some(lang) = BRUSH
        .captures(&class)
        .and_then(|c| c.get(1))
        .and_then(|m| normalize_declared(m.as_str()))
    {
        return Some(lang);
    }

    for attr in ["data-lang", "data-language"] {
        if let Some(lang) = dom::non_empty_attribute(sel, attr).and_then(|v| normalize_declared(&v))
        {
            return Some(lang);
        }
    }

    class
        .split_whitespace()
        .map(str::to_ascii_lowercase)
        .filter(|t| !BARE_TOKEN_EXCLUDED.contains(&t.as_str()))
        .find_map(|t| canonical_language(&t))
        .map(str::to_string)
}

/// Detect the language of a `<pre>` block from the `pre` itself, its inner
/// `code` element, then its parent wrapper.
#[must_use]
pub fn detect_language(pre: &Selection) -> Option<String> {
    let code = pre.select("code").first();
    let parent = pre.parent();

    declared_language(pre)
        .or_else(|| (!code.is_empty()).then(|| declared_language(&code)).flatten())
        .or_else(|| (!parent.is_empty()).then(|| declared_language(&parent)).flatten())
}

/// Restore line breaks in a directory-tree listing whose newlines were lost.
///
/// Only applies when connector glyphs are present and the text has fewer
/// than three lines. A break is inserted before a connector whenever
/// something other than connector glyphs and whitespace appeared since the
/// previous break, so `│   └── x` stays on one line.
#[must_use]
pub fn reconstruct_tree(code: &str) -> Option<String> {
    if !TREE_CONNECTOR.is_match(code) || code.lines().count() >= 3 {
        return None;
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut has_content = false;

    for ch in code.chars() {
        if ch == '\n' {
            push_line(&mut lines, &current);
            current.clear();
            has_content = false;
            continue;
        }
        if matches!(ch, '├' | '└' | '│') && has_content {
            push_line(&mut lines, &current);
            current.clear();
            has_content = false;
        }
        if !ch.is_whitespace() && !matches!(ch, '├' | '└' | '│' | '─') {
            has_content = true;
        }
        current.push(ch);
    }
    push_line(&mut lines, &current);

    Some(lines.join("\n"))
}

fn push_line(lines: &mut Vec<String>, line: &str) {
    let trimmed = line.trim_end();
    if !trimmed.trim().is_empty() {
        lines.push(trimmed.to_string());
    }
}

/// Length of the longest run of `ch` in `text`.
#[must_use]
pub fn longest_run(text: &str, ch: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == ch {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Wrap code in a fence longer than any backtick run inside it.
#[must_use]
pub fn fence(code: &str, language: Option<&str>) -> String {
    let ticks = "`".repeat((longest_run(code, '`') + 1).max(3));
    format!("{ticks}{}\n{code}\n{ticks}", language.unwrap_or_default())
}

/// Render inline code, widening the delimiter when the code holds backticks.
#[must_use]
pub fn inline_code(code: &str) -> String {
    let run = longest_run(code, '`');
    if run == 0 {
        return format!("`{code}`");
    }
    let ticks = "`".repeat(run + 1);
    let pad = if code.starts_with('`') || code.ends_with('`') {
        " "
    } else {
        ""
    };
    format!("{ticks}{pad}{code}{pad}{ticks}")
}
