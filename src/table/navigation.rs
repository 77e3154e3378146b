//! Tab and Shift-Tab between table cells
//!
//! Two flavours: structural (`step`, over `CellRef`s, used by the table
//! widget) and textual (`tab_in_table`, moving the source cursor between
//! cell contents when the table is shown raw). Both visit cells left to
//! right, top to bottom, wrap across rows, and stop at the first and last
//! cell.

use super::model::{is_separator_line, parse_table, TableData};
use super::ops::{CellRef, RowRef};
use crate::editor::{EditorHost, Selection, Transaction};
use crate::markdown::NodeKind;

// ─────────────────────────────────────────────────────────────────────────────
// Structural
// ─────────────────────────────────────────────────────────────────────────────

fn reading_index(cell: CellRef, columns: usize) -> usize {
    match cell.row {
        RowRef::Header => cell.col,
        RowRef::Body(r) => (r + 1) * columns + cell.col,
    }
}

fn cell_at_index(index: usize, columns: usize) -> CellRef {
    let (row, col) = (index / columns, index % columns);
    if row == 0 {
        CellRef::header(col)
    } else {
        CellRef::body(row - 1, col)
    }
}

/// The cell after (or before) `cell` in reading order, or `None` at the
/// table's edge.
pub fn step(cell: CellRef, columns: usize, rows: usize, forward: bool) -> Option<CellRef> {
    if columns == 0 {
        return None;
    }
    let total = columns * (rows + 1);
    let index = reading_index(cell, columns);
    let next = if forward {
        index.checked_add(1).filter(|&i| i < total)?
    } else {
        index.checked_sub(1)?
    };
    Some(cell_at_index(next, columns))
}

// ─────────────────────────────────────────────────────────────────────────────
// Textual
// ─────────────────────────────────────────────────────────────────────────────

/// Offsets where each cell's content starts, in reading order. The
/// separator line contributes nothing.
pub fn cell_start_positions(text: &str, data: &TableData) -> Vec<usize> {
    let mut starts = Vec::new();
    for line in &data.source_lines {
        let line_text = &text[line.from..line.to];
        if is_separator_line(line_text) {
            continue;
        }
        let mut segments = Vec::new();
        let mut cell_start = 0;
        let mut escaped = false;
        for (i, b) in line_text.bytes().enumerate() {
            if b == b'|' && !escaped {
                segments.push((cell_start, i));
                cell_start = i + 1;
            }
            escaped = b == b'\\' && !escaped;
        }
        segments.push((cell_start, line_text.len()));

        // Outer pipes are optional and leave empty edge segments
        let blank = |&(from, to): &(usize, usize)| line_text[from..to].trim().is_empty();
        if segments.len() > 1 && segments.last().is_some_and(blank) {
            segments.pop();
        }
        if segments.len() > 1 && segments.first().is_some_and(blank) {
            segments.remove(0);
        }

        for (from, to) in segments {
            let content = line_text[from..to]
                .find(|c: char| !c.is_whitespace())
                .map(|offset| from + offset)
                .unwrap_or_else(|| (from + 1).min(to));
            starts.push(line.from + content);
        }
    }
    starts
}

/// Move the cursor to the next or previous cell of the table it sits in.
///
/// Returns `false` when the cursor is outside any table. At the first or
/// last cell the cursor stays put and the key is still consumed.
pub fn tab_in_table(host: &mut dyn EditorHost, forward: bool) -> bool {
    if !host.settings().extensions.tables {
        return false;
    }
    let head = host.selection().main().head;
    let Some(table) = host
        .syntax_tree()
        .find_all(NodeKind::Table, head, head)
        .first()
        .map(|node| (node.from, node.to))
    else {
        return false;
    };
    let Some(data) = parse_table(host.document(), table.0, table.1) else {
        return false;
    };

    let starts = cell_start_positions(host.document().text(), &data);
    let current = starts.iter().rposition(|&start| start <= head).unwrap_or(0);
    let target = if forward {
        (current + 1 < starts.len()).then(|| starts[current + 1])
    } else if starts.get(current).is_some_and(|&start| start < head) {
        // Inside a cell: Shift-Tab first goes to this cell's start
        Some(starts[current])
    } else {
        current.checked_sub(1).map(|i| starts[i])
    };

    if let Some(pos) = target {
        host.dispatch(Transaction::select(Selection::cursor(pos)));
    }
    true
}
