//! Structural table mutations
//!
//! Every mutation maps a grid to a new grid; the caller serializes the
//! result and replaces the whole block. A mutation that cannot apply (moving
//! the first row up, deleting the last column, ...) returns `None` and no
//! edit is made.

use serde::Serialize;

use super::model::TableGrid;

/// Default header text for inserted columns
pub const NEW_COLUMN_HEADER: &str = "Column";

/// Which row of a table: the header or a body row by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RowRef {
    Header,
    Body(usize),
}

/// One cell of a table, addressed structurally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CellRef {
    pub row: RowRef,
    pub col: usize,
}

impl CellRef {
    pub fn header(col: usize) -> Self {
        Self {
            row: RowRef::Header,
            col,
        }
    }

    pub fn body(row: usize, col: usize) -> Self {
        Self {
            row: RowRef::Body(row),
            col,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TableMutation {
    InsertRowAbove(RowRef),
    InsertRowBelow(RowRef),
    MoveRowUp(RowRef),
    MoveRowDown(RowRef),
    DuplicateRow(RowRef),
    DeleteRow(RowRef),
    InsertColumnLeft(usize),
    InsertColumnRight(usize),
    MoveColumnLeft(usize),
    MoveColumnRight(usize),
    DeleteColumn(usize),
    SortByColumn { col: usize, descending: bool },
    /// Hover handle below the table
    AppendRow,
    /// Hover handle right of the table
    AppendColumn,
}

impl TableMutation {
    pub fn label(&self) -> &'static str {
        match self {
            TableMutation::InsertRowAbove(_) => "Insert row above",
            TableMutation::InsertRowBelow(_) => "Insert row below",
            TableMutation::MoveRowUp(_) => "Move row up",
            TableMutation::MoveRowDown(_) => "Move row down",
            TableMutation::DuplicateRow(_) => "Duplicate row",
            TableMutation::DeleteRow(_) => "Delete row",
            TableMutation::InsertColumnLeft(_) => "Insert column left",
            TableMutation::InsertColumnRight(_) => "Insert column right",
            TableMutation::MoveColumnLeft(_) => "Move column left",
            TableMutation::MoveColumnRight(_) => "Move column right",
            TableMutation::DeleteColumn(_) => "Delete column",
            TableMutation::SortByColumn {
                descending: false, ..
            } => "Sort ascending",
            TableMutation::SortByColumn {
                descending: true, ..
            } => "Sort descending",
            TableMutation::AppendRow => "Add row",
            TableMutation::AppendColumn => "Add column",
        }
    }

    /// Every mutation that targets `cell`, in menu order.
    pub fn all_for_cell(cell: CellRef) -> Vec<TableMutation> {
        vec![
            TableMutation::InsertRowAbove(cell.row),
            TableMutation::InsertRowBelow(cell.row),
            TableMutation::MoveRowUp(cell.row),
            TableMutation::MoveRowDown(cell.row),
            TableMutation::DuplicateRow(cell.row),
            TableMutation::DeleteRow(cell.row),
            TableMutation::InsertColumnLeft(cell.col),
            TableMutation::InsertColumnRight(cell.col),
            TableMutation::MoveColumnLeft(cell.col),
            TableMutation::MoveColumnRight(cell.col),
            TableMutation::DeleteColumn(cell.col),
            TableMutation::SortByColumn {
                col: cell.col,
                descending: false,
            },
            TableMutation::SortByColumn {
                col: cell.col,
                descending: true,
            },
        ]
    }

    /// Apply to `grid`. `None` when the mutation is refused or out of range.
    pub fn apply(&self, grid: &TableGrid) -> Option<TableGrid> {
        let rows = grid.rows.len();
        let cols = grid.headers.len();
        match *self {
            TableMutation::InsertRowAbove(RowRef::Header) => None,
            TableMutation::InsertRowAbove(RowRef::Body(r)) => {
                (r < rows).then(|| insert_row(grid, r))
            }
            TableMutation::InsertRowBelow(RowRef::Header) => Some(insert_row(grid, 0)),
            TableMutation::InsertRowBelow(RowRef::Body(r)) => {
                (r < rows).then(|| insert_row(grid, r + 1))
            }
            TableMutation::AppendRow => Some(insert_row(grid, rows)),

            TableMutation::MoveRowUp(RowRef::Body(r)) if r > 0 && r < rows => {
                Some(swap_rows(grid, r - 1, r))
            }
            TableMutation::MoveRowDown(RowRef::Body(r)) if r + 1 < rows => {
                Some(swap_rows(grid, r, r + 1))
            }
            TableMutation::MoveRowUp(_) | TableMutation::MoveRowDown(_) => None,

            TableMutation::DuplicateRow(RowRef::Body(r)) if r < rows => {
                let mut next = grid.clone();
                next.rows.insert(r + 1, grid.rows[r].clone());
                Some(next)
            }
            TableMutation::DuplicateRow(_) => None,

            TableMutation::DeleteRow(RowRef::Body(r)) if r < rows && rows > 1 => {
                let mut next = grid.clone();
                next.rows.remove(r);
                Some(next)
            }
            TableMutation::DeleteRow(_) => None,

            TableMutation::InsertColumnLeft(c) => (c < cols).then(|| insert_column(grid, c)),
            TableMutation::InsertColumnRight(c) => {
                (c < cols).then(|| insert_column(grid, c + 1))
            }
            TableMutation::AppendColumn => Some(insert_column(grid, cols)),

            TableMutation::MoveColumnLeft(c) if c > 0 && c < cols => {
                Some(swap_columns(grid, c - 1, c))
            }
            TableMutation::MoveColumnRight(c) if c + 1 < cols => {
                Some(swap_columns(grid, c, c + 1))
            }
            TableMutation::MoveColumnLeft(_) | TableMutation::MoveColumnRight(_) => None,

            TableMutation::DeleteColumn(c) if c < cols && cols > 1 => {
                let mut next = grid.clone();
                next.headers.remove(c);
                for row in &mut next.rows {
                    if c < row.len() {
                        row.remove(c);
                    }
                }
                Some(next)
            }
            TableMutation::DeleteColumn(_) => None,

            TableMutation::SortByColumn { col, descending } if col < cols => {
                let key = |row: &Vec<String>| {
                    row.get(col).map(|cell| cell.to_lowercase()).unwrap_or_default()
                };
                let mut next = grid.clone();
                // Stable: equal keys keep their order in both directions
                next.rows.sort_by(|a, b| {
                    let ordering = key(a).cmp(&key(b));
                    if descending {
                        ordering.reverse()
                    } else {
                        ordering
                    }
                });
                Some(next)
            }
            TableMutation::SortByColumn { .. } => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn blank_row(width: usize) -> Vec<String> {
    vec![String::new(); width]
}

fn insert_row(grid: &TableGrid, at: usize) -> TableGrid {
    let mut next = grid.clone();
    next.rows.insert(at.min(next.rows.len()), blank_row(grid.headers.len()));
    next
}

fn swap_rows(grid: &TableGrid, a: usize, b: usize) -> TableGrid {
    let mut next = grid.clone();
    next.rows.swap(a, b);
    next
}

fn insert_column(grid: &TableGrid, at: usize) -> TableGrid {
    let mut next = grid.clone();
    let at = at.min(next.headers.len());
    next.headers.insert(at, NEW_COLUMN_HEADER.to_string());
    for row in &mut next.rows {
        let at = at.min(row.len());
        row.insert(at, String::new());
    }
    next
}

fn swap_columns(grid: &TableGrid, a: usize, b: usize) -> TableGrid {
    let mut next = grid.clone();
    next.headers.swap(a, b);
    for row in &mut next.rows {
        if a < row.len() && b < row.len() {
            row.swap(a, b);
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::model::parse_table_text;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn scenario() -> TableGrid {
        parse_table_text("| A | B |\n|---|---|\n| 1 | 2 |").unwrap().grid()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Columns
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_insert_column_right_of_last() {
        let next = TableMutation::InsertColumnRight(1).apply(&scenario()).unwrap();
        assert_eq!(next.headers, strings(&["A", "B", "Column"]));
        assert_eq!(next.rows, vec![strings(&["1", "2", ""])]);
        assert_eq!(
            next.to_markdown(),
            "| A   | B   | Column |\n|-----|-----|--------|\n| 1   | 2   |        |"
        );
    }

    #[test]
    fn test_insert_column_left() {
        let next = TableMutation::InsertColumnLeft(0).apply(&scenario()).unwrap();
        assert_eq!(next.headers, strings(&["Column", "A", "B"]));
        assert_eq!(next.rows, vec![strings(&["", "1", "2"])]);
    }

    #[test]
    fn test_move_column() {
        let next = TableMutation::MoveColumnRight(0).apply(&scenario()).unwrap();
        assert_eq!(next.headers, strings(&["B", "A"]));
        assert_eq!(next.rows, vec![strings(&["2", "1"])]);
        assert!(TableMutation::MoveColumnLeft(0).apply(&scenario()).is_none());
        assert!(TableMutation::MoveColumnRight(1).apply(&scenario()).is_none());
    }

    #[test]
    fn test_delete_last_column_refused() {
        let grid = TableGrid::new(strings(&["A"]), vec![strings(&["1"])]);
        assert!(TableMutation::DeleteColumn(0).apply(&grid).is_none());
        let next = TableMutation::DeleteColumn(0).apply(&scenario()).unwrap();
        assert_eq!(next.headers, strings(&["B"]));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rows
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_insert_rows() {
        let grid = scenario();
        let below_header = TableMutation::InsertRowBelow(RowRef::Header).apply(&grid).unwrap();
        assert_eq!(below_header.rows, vec![strings(&["", ""]), strings(&["1", "2"])]);

        let above = TableMutation::InsertRowAbove(RowRef::Body(0)).apply(&grid).unwrap();
        assert_eq!(above.rows[0], strings(&["", ""]));

        let below = TableMutation::InsertRowBelow(RowRef::Body(0)).apply(&grid).unwrap();
        assert_eq!(below.rows[1], strings(&["", ""]));

        assert!(TableMutation::InsertRowAbove(RowRef::Header).apply(&grid).is_none());
    }

    #[test]
    fn test_move_and_duplicate_rows() {
        let grid = TableGrid::new(
            strings(&["A"]),
            vec![strings(&["1"]), strings(&["2"]), strings(&["3"])],
        );
        let up = TableMutation::MoveRowUp(RowRef::Body(2)).apply(&grid).unwrap();
        assert_eq!(up.rows, vec![strings(&["1"]), strings(&["3"]), strings(&["2"])]);
        let down = TableMutation::MoveRowDown(RowRef::Body(0)).apply(&grid).unwrap();
        assert_eq!(down.rows[0], strings(&["2"]));
        assert!(TableMutation::MoveRowUp(RowRef::Body(0)).apply(&grid).is_none());
        assert!(TableMutation::MoveRowDown(RowRef::Body(2)).apply(&grid).is_none());
        assert!(TableMutation::MoveRowUp(RowRef::Header).apply(&grid).is_none());

        let dup = TableMutation::DuplicateRow(RowRef::Body(1)).apply(&grid).unwrap();
        assert_eq!(dup.rows.len(), 4);
        assert_eq!(dup.rows[2], strings(&["2"]));
    }

    #[test]
    fn test_delete_last_row_refused() {
        assert!(TableMutation::DeleteRow(RowRef::Body(0)).apply(&scenario()).is_none());
        assert!(TableMutation::DeleteRow(RowRef::Header).apply(&scenario()).is_none());
    }

    #[test]
    fn test_append_handles() {
        let grid = scenario();
        let row = TableMutation::AppendRow.apply(&grid).unwrap();
        assert_eq!(row.rows.last().unwrap(), &strings(&["", ""]));
        let col = TableMutation::AppendColumn.apply(&grid).unwrap();
        assert_eq!(col.headers.last().unwrap(), NEW_COLUMN_HEADER);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sorting
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_sort_case_insensitive_and_stable() {
        let grid = TableGrid::new(
            strings(&["Name", "Id"]),
            vec![
                strings(&["beta", "1"]),
                strings(&["Alpha", "2"]),
                strings(&["alpha", "3"]),
                strings(&["Beta", "4"]),
            ],
        );
        let asc = TableMutation::SortByColumn {
            col: 0,
            descending: false,
        }
        .apply(&grid)
        .unwrap();
        let ids: Vec<&str> = asc.rows.iter().map(|r| r[1].as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "1", "4"]);

        let desc = TableMutation::SortByColumn {
            col: 0,
            descending: true,
        }
        .apply(&grid)
        .unwrap();
        let ids: Vec<&str> = desc.rows.iter().map(|r| r[1].as_str()).collect();
        assert_eq!(ids, vec!["1", "4", "2", "3"]);
    }
}
