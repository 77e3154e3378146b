//! Live table widget state
//!
//! Each rendered table owns a `TableInstance` in the arena, keyed by the
//! offset where its block starts. Cell edits are buffered on the instance
//! and written back to the document only when the cell loses focus, as one
//! replacement of the whole block, and only if the rebuilt text differs
//! from the source.

use std::collections::{BTreeMap, HashMap};

use log::debug;

use super::model::{TableData, TableGrid};
use super::navigation;
use super::ops::{CellRef, RowRef, TableMutation};
use crate::editor::{EditorHost, Transaction};

/// Edit state of one rendered table.
#[derive(Debug, Clone)]
pub struct TableInstance {
    data: TableData,
    pending: HashMap<CellRef, String>,
    focus: Option<CellRef>,
}

impl TableInstance {
    fn new(data: TableData) -> Self {
        Self {
            data,
            pending: HashMap::new(),
            focus: None,
        }
    }

    pub fn data(&self) -> &TableData {
        &self.data
    }

    pub fn focus(&self) -> Option<CellRef> {
        self.focus
    }

    pub fn is_dirty(&self) -> bool {
        !self.pending.is_empty()
    }

    fn contains(&self, cell: CellRef) -> bool {
        let in_rows = match cell.row {
            RowRef::Header => true,
            RowRef::Body(r) => r < self.data.rows.len(),
        };
        in_rows && cell.col < self.data.headers.len()
    }

    /// Text shown in `cell`: the buffered edit if any, else the source.
    pub fn cell_text(&self, cell: CellRef) -> Option<&str> {
        if let Some(text) = self.pending.get(&cell) {
            return Some(text);
        }
        let source = match cell.row {
            RowRef::Header => self.data.headers.get(cell.col),
            RowRef::Body(r) => self.data.rows.get(r).and_then(|row| row.get(cell.col)),
        };
        source.map(String::as_str)
    }

    /// Current grid with buffered edits applied.
    pub fn grid(&self) -> TableGrid {
        let mut grid = self.data.grid();
        for (cell, text) in &self.pending {
            let slot = match cell.row {
                RowRef::Header => grid.headers.get_mut(cell.col),
                RowRef::Body(r) => grid.rows.get_mut(r).and_then(|row| row.get_mut(cell.col)),
            };
            if let Some(slot) = slot {
                *slot = text.clone();
            }
        }
        grid
    }
}

/// Cell text as typed, made safe for a single table cell.
fn sanitize_cell(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut escaped = false;
    for ch in text.trim().chars() {
        match ch {
            '\n' | '\r' => out.push(' '),
            '|' if !escaped => out.push_str("\\|"),
            _ => out.push(ch),
        }
        escaped = ch == '\\' && !escaped;
    }
    out
}

#[derive(Debug, Default)]
pub struct TableArena {
    tables: BTreeMap<usize, TableInstance>,
}

impl TableArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh from the tables of the latest document.
    ///
    /// Instances whose key still exists keep their focus and buffered edits
    /// (edits to cells that no longer exist are dropped); the rest are
    /// discarded.
    pub fn sync(&mut self, tables: Vec<TableData>) {
        let mut next = BTreeMap::new();
        for data in tables {
            let key = data.block_from;
            let instance = match self.tables.remove(&key) {
                Some(mut old) => {
                    old.data = data;
                    let stale: Vec<CellRef> =
                        old.pending.keys().copied().filter(|c| !old.contains(*c)).collect();
                    for cell in stale {
                        old.pending.remove(&cell);
                    }
                    if old.focus.is_some_and(|c| !old.contains(c)) {
                        old.focus = None;
                    }
                    old
                }
                None => TableInstance::new(data),
            };
            next.insert(key, instance);
        }
        if !self.tables.is_empty() {
            debug!("Dropping {} stale table instance(s)", self.tables.len());
        }
        self.tables = next;
    }

    pub fn get(&self, key: usize) -> Option<&TableInstance> {
        self.tables.get(&key)
    }

    pub fn keys(&self) -> impl Iterator<Item = usize> + '_ {
        self.tables.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn focused(&self) -> Option<(usize, CellRef)> {
        self.tables
            .iter()
            .find_map(|(key, t)| t.focus.map(|cell| (*key, cell)))
    }

    /// Focus `cell`; any other focused cell is blurred without committing.
    pub fn focus(&mut self, key: usize, cell: CellRef) -> bool {
        let valid = self.tables.get(&key).is_some_and(|t| t.contains(cell));
        if !valid {
            return false;
        }
        for instance in self.tables.values_mut() {
            instance.focus = None;
        }
        if let Some(instance) = self.tables.get_mut(&key) {
            instance.focus = Some(cell);
        }
        true
    }

    /// Buffer typed text for `cell`. Nothing touches the document yet.
    pub fn edit_cell(&mut self, key: usize, cell: CellRef, text: &str) -> bool {
        match self.tables.get_mut(&key) {
            Some(instance) if instance.contains(cell) => {
                instance.pending.insert(cell, sanitize_cell(text));
                true
            }
            _ => false,
        }
    }

    pub fn cell_text(&self, key: usize, cell: CellRef) -> Option<&str> {
        self.tables.get(&key)?.cell_text(cell)
    }

    /// Commit buffered edits of table `key` and drop its focus.
    ///
    /// Returns whether an edit was dispatched.
    pub fn blur(&mut self, host: &mut dyn EditorHost, key: usize) -> bool {
        let Some(instance) = self.tables.get_mut(&key) else {
            return false;
        };
        instance.focus = None;
        if instance.pending.is_empty() {
            return false;
        }
        let grid = instance.grid();
        instance.pending.clear();
        let (from, to) = (instance.data.block_from, instance.data.block_to);
        replace_block(host, from, to, &grid, "table.sync")
    }

    /// Commit, then move focus to the next or previous cell. At the edge of
    /// the table focus stays where it is.
    pub fn tab(&mut self, host: &mut dyn EditorHost, key: usize, forward: bool) -> Option<CellRef> {
        let (current, columns, rows) = {
            let instance = self.tables.get(&key)?;
            (
                instance.focus?,
                instance.data.column_count(),
                instance.data.row_count(),
            )
        };
        self.blur(host, key);
        let next = navigation::step(current, columns, rows, forward).unwrap_or(current);
        if let Some(instance) = self.tables.get_mut(&key) {
            instance.focus = Some(next);
        }
        Some(next)
    }

    /// Apply a structural mutation to table `key`, buffered edits included.
    ///
    /// Refused mutations and no-op results dispatch nothing.
    pub fn apply_mutation(
        &mut self,
        host: &mut dyn EditorHost,
        key: usize,
        mutation: TableMutation,
    ) -> bool {
        let Some(instance) = self.tables.get_mut(&key) else {
            return false;
        };
        let Some(grid) = mutation.apply(&instance.grid()) else {
            debug!("Table mutation {:?} refused at {}", mutation, key);
            return false;
        };
        instance.pending.clear();
        instance.focus = None;
        let (from, to) = (instance.data.block_from, instance.data.block_to);
        replace_block(host, from, to, &grid, "table.edit")
    }
}

/// Replace `[from, to)` with the serialized grid unless the text is equal.
fn replace_block(
    host: &mut dyn EditorHost,
    from: usize,
    to: usize,
    grid: &TableGrid,
    user_event: &'static str,
) -> bool {
    let markdown = grid.to_markdown();
    if host.document().slice(from, to) == markdown {
        debug!("Table at {} unchanged, skipping edit", from);
        return false;
    }
    host.dispatch(Transaction::replace(from, to, markdown).with_user_event(user_event));
    true
}
