//! Document edits submitted to the host
//!
//! A `Transaction` bundles text changes and an optional new selection. All
//! change positions refer to the document *before* the transaction and are
//! applied together, so multi-span edits (wrapping a selection, rewriting
//! every row of a table) land atomically.

use crate::document::Document;
use crate::editor::selection::Selection;

/// Replace `[from, to)` with `insert`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChange {
    pub from: usize,
    pub to: usize,
    pub insert: String,
}

impl TextChange {
    pub fn new(from: usize, to: usize, insert: impl Into<String>) -> Self {
        Self {
            from,
            to: to.max(from),
            insert: insert.into(),
        }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::new(at, at, text)
    }

    pub fn delete(from: usize, to: usize) -> Self {
        Self::new(from, to, "")
    }
}

/// Which side of an insertion a mapped position sticks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Before,
    After,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    pub changes: Vec<TextChange>,
    pub selection: Option<Selection>,
    /// Origin tag such as `input.format` or `table.sync`
    pub user_event: Option<&'static str>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single replacement.
    pub fn replace(from: usize, to: usize, insert: impl Into<String>) -> Self {
        Self::new().change(TextChange::new(from, to, insert))
    }

    /// Selection-only transaction.
    pub fn select(selection: Selection) -> Self {
        Self::new().with_selection(selection)
    }

    pub fn change(mut self, change: TextChange) -> Self {
        self.changes.push(change);
        self
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn with_user_event(mut self, event: &'static str) -> Self {
        self.user_event = Some(event);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.selection.is_none()
    }

    /// Whether applying the changes to `doc` would leave the text unchanged.
    pub fn is_noop_for(&self, doc: &Document) -> bool {
        self.changes
            .iter()
            .all(|c| doc.slice(c.from, c.to) == c.insert)
    }

    /// Apply the changes to `doc`, producing the next snapshot.
    pub fn apply(&self, doc: &Document) -> Document {
        let edits: Vec<(usize, usize, &str)> = self
            .changes
            .iter()
            .map(|c| (c.from, c.to, c.insert.as_str()))
            .collect();
        doc.apply_edits(&edits)
    }

    /// Map a pre-transaction position to its post-transaction location.
    pub fn map_pos(&self, pos: usize, assoc: Assoc) -> usize {
        let mut sorted: Vec<&TextChange> = self.changes.iter().collect();
        sorted.sort_by_key(|c| (c.from, c.to));

        let mut delta: isize = 0;
        for change in sorted {
            let inserted = change.insert.len() as isize;
            let removed = (change.to - change.from) as isize;
            let is_insertion = change.from == change.to;
            if pos < change.from || (pos == change.from && is_insertion && assoc == Assoc::Before)
            {
                break;
            }
            if pos > change.to || (pos == change.to && !is_insertion && assoc == Assoc::After) {
                delta += inserted - removed;
                continue;
            }
            // Inside (or at the edge of) the replaced span
            let base = change.from as isize + delta;
            return match assoc {
                Assoc::Before => base as usize,
                Assoc::After => (base + inserted) as usize,
            };
        }
        (pos as isize + delta).max(0) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_multiple_changes() {
        let doc = Document::new("a b c");
        let tx = Transaction::new()
            .change(TextChange::insert(0, "*"))
            .change(TextChange::insert(1, "*"))
            .change(TextChange::new(4, 5, "C"));
        assert_eq!(tx.apply(&doc).text(), "*a* b C");
    }

    #[test]
    fn test_is_noop_for() {
        let doc = Document::new("hello");
        assert!(Transaction::replace(0, 5, "hello").is_noop_for(&doc));
        assert!(!Transaction::replace(0, 1, "j").is_noop_for(&doc));
    }

    #[test]
    fn test_map_pos_insertions() {
        let tx = Transaction::new()
            .change(TextChange::insert(2, "**"))
            .change(TextChange::insert(6, "**"));
        assert_eq!(tx.map_pos(2, Assoc::After), 4);
        assert_eq!(tx.map_pos(2, Assoc::Before), 2);
        assert_eq!(tx.map_pos(6, Assoc::Before), 8);
        assert_eq!(tx.map_pos(6, Assoc::After), 10);
        assert_eq!(tx.map_pos(0, Assoc::After), 0);
        assert_eq!(tx.map_pos(9, Assoc::After), 13);
    }

    #[test]
    fn test_map_pos_replacement() {
        // "- item" -> "1. item"
        let tx = Transaction::replace(0, 2, "1. ");
        assert_eq!(tx.map_pos(4, Assoc::After), 5);
        assert_eq!(tx.map_pos(1, Assoc::After), 3);
        assert_eq!(tx.map_pos(0, Assoc::Before), 0);
    }

    #[test]
    fn test_map_pos_deletion() {
        let tx = Transaction::new()
            .change(TextChange::delete(0, 2))
            .change(TextChange::delete(6, 8));
        assert_eq!(tx.map_pos(2, Assoc::After), 0);
        assert_eq!(tx.map_pos(6, Assoc::Before), 4);
        assert_eq!(tx.map_pos(10, Assoc::After), 6);
    }
}
