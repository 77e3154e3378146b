//! Cursor-proximity tests shared by every decorator
//!
//! All of them look at the main selection range only.

use crate::document::Document;
use crate::editor::Selection;

/// 1-based first and last line touched by `[from, to]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan {
    pub start_line: usize,
    pub end_line: usize,
}

/// Whether the main selection touches `[from, to]`. Touching either edge
/// counts, so a cursor right after a closing delimiter still reveals it.
pub fn intersects(selection: &Selection, from: usize, to: usize) -> bool {
    let main = selection.main();
    main.from() <= to && main.to() >= from
}

pub fn line_span(doc: &Document, from: usize, to: usize) -> LineSpan {
    LineSpan {
        start_line: doc.line_at(from).number,
        end_line: doc.line_at(to.max(from)).number,
    }
}

/// Whether the cursor's line falls within the lines spanned by `[from, to]`.
///
/// Multi-line constructs reveal their syntax when the cursor is anywhere on
/// one of their lines, not only when it is inside the byte range.
pub fn cursor_within_lines(doc: &Document, selection: &Selection, from: usize, to: usize) -> bool {
    let span = line_span(doc, from, to);
    let cursor_line = doc.line_at(selection.main().head).number;
    (span.start_line..=span.end_line).contains(&cursor_line)
}

/// Whether the cursor head sits on (or directly at either end of) a marker.
pub fn cursor_on_marker(selection: &Selection, marker_from: usize, marker_to: usize) -> bool {
    let head = selection.main().head;
    head >= marker_from && head <= marker_to
}

/// Last line of a node ending at exclusive offset `to`.
///
/// A node that ends exactly at a line start (after its newline) does not
/// extend onto that line.
pub fn last_line_of(doc: &Document, from: usize, to: usize) -> usize {
    let end = if to > from && doc.text().as_bytes().get(to - 1) == Some(&b'\n') {
        to - 1
    } else {
        to
    };
    doc.line_at(end.max(from)).number
}
