//! Table block parsing and serialization
//!
//! A table block is a header line, a separator line and any number of data
//! lines. Parsing always yields a rectangular grid: short rows are padded
//! with empty cells and long rows are truncated to the header width.

use log::debug;
use serde::Serialize;

use crate::document::Document;
use crate::markdown::grammar::static_regex;

/// Source span of one line of a table block, without its line break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceLine {
    pub from: usize,
    pub to: usize,
}

/// Structural snapshot of one table block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Header, separator and data lines, in order
    pub source_lines: Vec<SourceLine>,
    pub block_from: usize,
    pub block_to: usize,
}

impl TableData {
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn grid(&self) -> TableGrid {
        TableGrid {
            headers: self.headers.clone(),
            rows: self.rows.clone(),
        }
    }
}

/// Headers and rows without source positions; the input and output of every
/// structural mutation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableGrid {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableGrid {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn to_markdown(&self) -> String {
        build_table_markdown(&self.headers, &self.rows)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Line Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Split a table line into trimmed cells.
///
/// One leading and one trailing `|` are stripped. Escaped pipes (`\|`) stay
/// inside their cell.
pub fn parse_cells(line: &str) -> Vec<String> {
    let mut s = line.trim();
    if let Some(rest) = s.strip_prefix('|') {
        s = rest;
    }
    if s.ends_with('|') && !s.ends_with("\\|") {
        s = &s[..s.len() - 1];
    }

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut escaped = false;
    for ch in s.chars() {
        match ch {
            '|' if !escaped => {
                cells.push(current.trim().to_string());
                current.clear();
            }
            _ => {
                escaped = ch == '\\' && !escaped;
                current.push(ch);
                continue;
            }
        }
        escaped = false;
    }
    cells.push(current.trim().to_string());
    cells
}

/// Whether `line` is a header separator such as `|---|:--:|`.
pub fn is_separator_line(line: &str) -> bool {
    let t = line.trim();
    !t.is_empty() && t.contains('-') && static_regex!(r"^\|?[\s|:\-]+\|?$").is_match(t)
}

fn fit_to_width(mut cells: Vec<String>, width: usize) -> Vec<String> {
    cells.resize(width, String::new());
    cells
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing
// ─────────────────────────────────────────────────────────────────────────────

/// Parse the table block covering `[from, to)`.
///
/// Returns `None` for blocks with fewer than two lines or without a
/// separator line; such blocks are shown as plain text.
pub fn parse_table(doc: &Document, from: usize, to: usize) -> Option<TableData> {
    let end = if to > from && doc.text().as_bytes().get(to - 1) == Some(&b'\n') {
        to - 1
    } else {
        to
    };
    let lines: Vec<_> = doc.lines_between(from, end).collect();
    if lines.len() < 2 {
        debug!("Table block at {} has fewer than 2 lines", from);
        return None;
    }
    if !is_separator_line(lines[1].text) {
        debug!("Table block at {} has no separator line", from);
        return None;
    }

    let headers = parse_cells(lines[0].text);
    let width = headers.len();
    let mut source_lines = vec![
        SourceLine {
            from: lines[0].from,
            to: lines[0].to,
        },
        SourceLine {
            from: lines[1].from,
            to: lines[1].to,
        },
    ];
    let mut rows = Vec::new();
    for line in &lines[2..] {
        if line.is_blank() {
            break;
        }
        source_lines.push(SourceLine {
            from: line.from,
            to: line.to,
        });
        if is_separator_line(line.text) {
            continue;
        }
        rows.push(fit_to_width(parse_cells(line.text), width));
    }

    let block_to = source_lines.last().map(|l| l.to).unwrap_or(lines[1].to);
    Some(TableData {
        headers,
        rows,
        source_lines,
        block_from: lines[0].from,
        block_to,
    })
}

/// Parse a standalone table.
pub fn parse_table_text(text: &str) -> Option<TableData> {
    let doc = Document::new(text);
    parse_table(&doc, 0, doc.len())
}

// ─────────────────────────────────────────────────────────────────────────────
// Serialization
// ─────────────────────────────────────────────────────────────────────────────

/// Build an aligned GFM table from a grid.
///
/// Column width is the widest cell in the column, at least 3. The result has
/// no trailing newline.
pub fn build_table_markdown(headers: &[String], rows: &[Vec<String>]) -> String {
    let columns = headers.len();
    if columns == 0 {
        return String::new();
    }
    fn cell(row: &[String], i: usize) -> &str {
        row.get(i).map(String::as_str).unwrap_or("")
    }
    let widths: Vec<usize> = (0..columns)
        .map(|i| {
            rows.iter()
                .map(|row| cell(row.as_slice(), i).chars().count())
                .chain(std::iter::once(headers[i].chars().count()))
                .max()
                .unwrap_or(0)
                .max(3)
        })
        .collect();

    let render_row = |row: &[String]| {
        let cells: Vec<String> = (0..columns)
            .map(|i| {
                let text = cell(row, i);
                let pad = widths[i].saturating_sub(text.chars().count());
                format!("{}{}", text, " ".repeat(pad))
            })
            .collect();
        format!("| {} |", cells.join(" | "))
    };

    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(render_row(headers));
    lines.push(format!("|{}|", separator.join("|")));
    lines.extend(rows.iter().map(|row| render_row(row.as_slice())));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_cells() {
        assert_eq!(parse_cells("| A | B |"), strings(&["A", "B"]));
        assert_eq!(parse_cells("A | B"), strings(&["A", "B"]));
        assert_eq!(parse_cells("|  | x |"), strings(&["", "x"]));
        assert_eq!(parse_cells("| a \\| b | c |"), strings(&["a \\| b", "c"]));
    }

    #[test]
    fn test_is_separator_line() {
        assert!(is_separator_line("|---|---|"));
        assert!(is_separator_line("| :-- | --: |"));
        assert!(is_separator_line("---|---"));
        assert!(!is_separator_line("| A | B |"));
        assert!(!is_separator_line("|   |"));
        assert!(!is_separator_line(""));
    }

    #[test]
    fn test_parse_scenario_table() {
        let data = parse_table_text("| A | B |\n|---|---|\n| 1 | 2 |").unwrap();
        assert_eq!(data.headers, strings(&["A", "B"]));
        assert_eq!(data.rows, vec![strings(&["1", "2"])]);
        assert_eq!(data.source_lines.len(), 3);
        assert_eq!((data.block_from, data.block_to), (0, 29));
    }

    #[test]
    fn test_parse_pads_and_truncates_rows() {
        let data = parse_table_text("| A | B | C |\n|---|---|---|\n| 1 |\n| 1 | 2 | 3 | 4 |").unwrap();
        assert_eq!(data.rows[0], strings(&["1", "", ""]));
        assert_eq!(data.rows[1], strings(&["1", "2", "3"]));
    }

    #[test]
    fn test_parse_rejects_degenerate_blocks() {
        assert!(parse_table_text("| A | B |").is_none());
        assert!(parse_table_text("| A | B |\n| 1 | 2 |").is_none());
    }

    #[test]
    fn test_parse_stops_at_blank_line() {
        let data = parse_table_text("| A |\n|---|\n| 1 |\n\n| 2 |").unwrap();
        assert_eq!(data.rows, vec![strings(&["1"])]);
        assert_eq!(data.block_to, 17);
    }

    #[test]
    fn test_header_only_table() {
        let data = parse_table_text("| A |\n|---|").unwrap();
        assert!(data.rows.is_empty());
    }

    #[test]
    fn test_build_table_markdown_alignment() {
        let md = build_table_markdown(
            &strings(&["A", "Longer"]),
            &[strings(&["1", "2"]), strings(&["three", ""])],
        );
        assert_eq!(
            md,
            "| A     | Longer |\n|-------|--------|\n| 1     | 2      |\n| three |        |"
        );
    }

    #[test]
    fn test_build_table_markdown_minimum_width() {
        let md = build_table_markdown(&strings(&["A", "B", "Column"]), &[strings(&["1", "2", ""])]);
        assert_eq!(
            md,
            "| A   | B   | Column |\n|-----|-----|--------|\n| 1   | 2   |        |"
        );
    }

    #[test]
    fn test_round_trip_and_idempotence() {
        let grids = vec![
            TableGrid::new(strings(&["A"]), vec![]),
            TableGrid::new(strings(&["A", "B"]), vec![strings(&["1", "2"])]),
            TableGrid::new(
                strings(&["Name", "", "Ünïcode"]),
                vec![strings(&["x", "", "ø"]), strings(&["", "long cell", ""])],
            ),
        ];
        for grid in grids {
            let md = grid.to_markdown();
            let parsed = parse_table_text(&md).unwrap();
            assert_eq!(parsed.grid(), grid);
            assert_eq!(parsed.grid().to_markdown(), md);
        }
    }
}
