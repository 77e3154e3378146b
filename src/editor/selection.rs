//! Cursor and selection ranges
//!
//! A selection is one or more `{anchor, head}` ranges. The main range is the
//! one every cursor-proximity decision looks at.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SelectionRange {
    pub anchor: usize,
    pub head: usize,
}

impl SelectionRange {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    pub fn cursor(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    pub fn from(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn to(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    fn clamped(self, len: usize) -> Self {
        Self::new(self.anchor.min(len), self.head.min(len))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    ranges: Vec<SelectionRange>,
    main: usize,
}

impl Default for Selection {
    fn default() -> Self {
        Self::cursor(0)
    }
}

impl Selection {
    /// Build a selection. An empty range list becomes a cursor at 0 and an
    /// out-of-bounds main index points at the last range.
    pub fn new(ranges: Vec<SelectionRange>, main: usize) -> Self {
        if ranges.is_empty() {
            return Self::cursor(0);
        }
        let main = main.min(ranges.len() - 1);
        Self { ranges, main }
    }

    pub fn single(anchor: usize, head: usize) -> Self {
        Self::new(vec![SelectionRange::new(anchor, head)], 0)
    }

    pub fn cursor(pos: usize) -> Self {
        Self::single(pos, pos)
    }

    pub fn main(&self) -> SelectionRange {
        self.ranges[self.main]
    }

    pub fn main_index(&self) -> usize {
        self.main
    }

    pub fn ranges(&self) -> &[SelectionRange] {
        &self.ranges
    }

    /// Clamp every range into a document of `len` bytes.
    pub fn clamped(&self, len: usize) -> Self {
        Self {
            ranges: self.ranges.iter().map(|r| r.clamped(len)).collect(),
            main: self.main,
        }
    }

    pub fn map_ranges<F>(&self, f: F) -> Self
    where
        F: FnMut(&SelectionRange) -> SelectionRange,
    {
        Self {
            ranges: self.ranges.iter().map(f).collect(),
            main: self.main,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_from_to_normalized() {
        let range = SelectionRange::new(9, 3);
        assert_eq!((range.from(), range.to()), (3, 9));
        assert!(!range.is_empty());
        assert!(SelectionRange::cursor(4).is_empty());
    }

    #[test]
    fn test_selection_new_guards() {
        assert_eq!(Selection::new(Vec::new(), 3), Selection::cursor(0));
        let sel = Selection::new(vec![SelectionRange::cursor(1), SelectionRange::cursor(5)], 7);
        assert_eq!(sel.main().head, 5);
    }

    #[test]
    fn test_selection_clamped() {
        let sel = Selection::single(2, 50).clamped(10);
        assert_eq!(sel.main(), SelectionRange::new(2, 10));
    }
}
