//! GitHub Flavored Markdown tables.
//!
//! Cells and rows are rendered bottom-up like every other node: a cell
//! becomes ` text |`, a row `|` plus its cells, and the table inserts the
//! separator row after the first row and pads short rows.

use crate::dom::{self, Selection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Alignment {
    None,
    Left,
    Center,
    Right,
}

impl Alignment {
    fn of(cell: &Selection) -> Self {
        let declared = dom::get_attribute(cell, "align").or_else(|| {
            dom::get_attribute(cell, "style").and_then(|style| {
                style
                    .split(';')
                    .filter_map(|decl| decl.split_once(':'))
                    .find(|(k, _)| k.trim().eq_ignore_ascii_case("text-align"))
                    .map(|(_, v)| v.trim().to_string())
            })
        });
        match declared.unwrap_or_default().to_ascii_lowercase().as_str() {
            "left" => Self::Left,
            "center" => Self::Center,
            "right" => Self::Right,
            _ => Self::None,
        }
    }

    fn separator(self) -> &'static str {
        match self {
            Self::None => " --- |",
            Self::Left => " :--- |",
            Self::Center => " :---: |",
            Self::Right => " ---: |",
        }
    }
}

/// Render one cell from its converted content.
#[must_use]
pub fn cell(content: &str) -> String {
    let flat = content.split_whitespace().collect::<Vec<_>>().join(" ");
    format!(" {} |", escape_pipes(&flat))
}

/// Render one row from its concatenated cells.
#[must_use]
pub fn row(cells: &str) -> String {
    if cells.trim().is_empty() {
        return String::new();
    }
    format!("|{}\n", cells.trim_end())
}

/// Assemble the table: separator after the first row, short rows padded.
#[must_use]
pub fn table(sel: &Selection, rows: &str) -> String {
    let (caption, body): (Vec<&str>, Vec<&str>) = rows
        .lines()
        .filter(|l| !l.trim().is_empty())
        .partition(|l| !l.trim_start().starts_with('|'));

    if body.is_empty() {
        return String::new();
    }

    let columns = body.iter().map(|l| count_cells(l)).max().unwrap_or(0);
    let alignments: Vec<Alignment> = sel
        .select("tr")
        .first()
        .select("th, td")
        .iter()
        .map(|c| Alignment::of(&c))
        .collect();

    let mut out = String::new();
    if !caption.is_empty() {
        out.push_str(caption.join(" ").trim());
        out.push_str("\n\n");
    }

    for (i, line) in body.iter().enumerate() {
        out.push_str(line.trim());
        for _ in count_cells(line)..columns {
            out.push_str("  |");
        }
        out.push('\n');

        if i == 0 {
            out.push('|');
            for col in 0..columns {
                let align = alignments.get(col).copied().unwrap_or(Alignment::None);
                out.push_str(align.separator());
            }
            out.push('\n');
        }
    }

    format!("\n\n{}\n\n", out.trim_end())
}

fn escape_pipes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev = '\0';
    for ch in text.chars() {
        if ch == '|' && prev != '\\' {
            out.push('\\');
        }
        out.push(ch);
        prev = ch;
    }
    out
}

/// Cells in a rendered row: unescaped pipes minus the leading one.
fn count_cells(line: &str) -> usize {
    let mut count: usize = 0;
    let mut prev = '\0';
    for ch in line.trim().chars() {
        if ch == '|' && prev != '\\' {
            count += 1;
        }
        prev = ch;
    }
    count.saturating_sub(1)
}
