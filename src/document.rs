//! Document snapshot with a line index
//!
//! Positions are UTF-8 byte offsets. A `Document` is immutable; every edit
//! produces a new snapshot. Line numbers are 1-based, matching what editors
//! show in their gutters.

use std::ops::Range;

// ─────────────────────────────────────────────────────────────────────────────
// UTF-8 Boundary Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Largest index `<= index` that falls on a char boundary of `s`.
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Smallest index `>= index` that falls on a char boundary of `s`.
pub fn ceil_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

/// Slice `s` without panicking on out-of-range or mid-character indices.
pub fn safe_slice(s: &str, start: usize, end: usize) -> &str {
    let start = floor_char_boundary(s, start);
    let end = ceil_char_boundary(s, end.max(start));
    &s[start..end]
}

// ─────────────────────────────────────────────────────────────────────────────
// Line
// ─────────────────────────────────────────────────────────────────────────────

/// One line of a document. `to` excludes the line break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-based line number
    pub number: usize,
    pub from: usize,
    pub to: usize,
    pub text: &'a str,
}

impl Line<'_> {
    pub fn len(&self) -> usize {
        self.to - self.from
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Document
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
    /// Byte offset of the first character of every line
    line_starts: Vec<usize>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new("")
    }
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { text, line_starts }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// The line containing `pos`. Positions past the end resolve to the
    /// last line.
    pub fn line_at(&self, pos: usize) -> Line<'_> {
        let pos = pos.min(self.text.len());
        let index = match self.line_starts.binary_search(&pos) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        self.line_by_index(index)
    }

    /// Line by 1-based number, clamped to the valid range.
    pub fn line(&self, number: usize) -> Line<'_> {
        let index = number.clamp(1, self.line_count()) - 1;
        self.line_by_index(index)
    }

    fn line_by_index(&self, index: usize) -> Line<'_> {
        let from = self.line_starts[index];
        let to = match self.line_starts.get(index + 1) {
            Some(next) => next - 1,
            None => self.text.len(),
        };
        Line {
            number: index + 1,
            from,
            to,
            text: &self.text[from..to],
        }
    }

    /// Lines whose span touches `[from, to]`.
    pub fn lines_between(&self, from: usize, to: usize) -> impl Iterator<Item = Line<'_>> {
        let first = self.line_at(from).number;
        let last = self.line_at(to.max(from)).number;
        (first..=last).map(move |n| self.line(n))
    }

    pub fn slice(&self, from: usize, to: usize) -> &str {
        safe_slice(&self.text, from, to)
    }

    pub fn slice_range(&self, range: Range<usize>) -> &str {
        self.slice(range.start, range.end)
    }

    /// Apply `(from, to, insert)` edits expressed against this snapshot.
    ///
    /// Edits must not overlap; they are applied back to front so earlier
    /// offsets stay valid.
    pub fn apply_edits(&self, edits: &[(usize, usize, &str)]) -> Document {
        let mut sorted: Vec<_> = edits.to_vec();
        sorted.sort_by_key(|(from, to, _)| (*from, *to));
        let mut text = self.text.clone();
        for (from, to, insert) in sorted.into_iter().rev() {
            let from = floor_char_boundary(&text, from);
            let to = ceil_char_boundary(&text, to.max(from));
            text.replace_range(from..to, insert);
        }
        Document::new(text)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
