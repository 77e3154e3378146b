//! GFM table sub-engine
//!
//! Tables are always rendered as a structural widget, whatever the cursor
//! position, and always from a whole-document scan:
//! - `model`: parsing a block into `TableData`, serializing a grid back
//! - `ops`: structural mutations (rows, columns, sorting)
//! - `navigation`: Tab/Shift-Tab order
//! - `arena`: live widget state, buffered cell edits, sync on blur

pub mod arena;
pub mod model;
pub mod navigation;
pub mod ops;

pub use arena::{TableArena, TableInstance};
pub use model::{build_table_markdown, parse_table, parse_table_text, TableData, TableGrid};
pub use navigation::tab_in_table;
pub use ops::{CellRef, RowRef, TableMutation};

use crate::document::Document;
use crate::live_preview::decoration::{Decoration, DecorationContext, TableWidget, Widget};
use crate::markdown::{NodeKind, SyntaxTree};

/// Every valid table block of the document, in order.
pub fn collect_tables(doc: &Document, tree: &SyntaxTree) -> Vec<TableData> {
    tree.find_all(NodeKind::Table, 0, doc.len())
        .into_iter()
        .filter_map(|node| parse_table(doc, node.from, node.to))
        .collect()
}

/// One block widget per table. Selection-independent.
pub fn decorate(ctx: &DecorationContext, out: &mut Vec<Decoration>) {
    if !ctx.extensions.tables {
        return;
    }
    for data in collect_tables(ctx.doc, ctx.tree) {
        out.push(Decoration::block_widget(
            data.block_from,
            data.block_to,
            Widget::Table(TableWidget {
                key: data.block_from,
                data,
            }),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtensionSettings;
    use crate::editor::Selection;
    use crate::live_preview::test_support::{context_for, parse};

    fn run(text: &str, cursor: usize) -> Vec<Decoration> {
        let (doc, tree) = parse(text);
        let ext = ExtensionSettings::default();
        let selection = Selection::cursor(cursor);
        let ctx = context_for(&doc, &tree, &selection, &ext);
        let mut out = Vec::new();
        decorate(&ctx, &mut out);
        out
    }

    #[test]
    fn test_table_is_block_widget_regardless_of_cursor() {
        let text = "Intro\n\n| A | B |\n|---|---|\n| 1 | 2 |\n\nAfter";
        let away = run(text, 0);
        let inside = run(text, 12);
        assert_eq!(away, inside);
        assert_eq!(away.len(), 1);
        assert!(away[0].is_block());
        assert_eq!((away[0].from(), away[0].to()), (7, 36));
        match away[0].widget_ref() {
            Some(Widget::Table(table)) => {
                assert_eq!(table.key, 7);
                assert_eq!(table.data.rows, vec![vec!["1".to_string(), "2".to_string()]]);
            }
            other => panic!("expected table widget, got {:?}", other),
        }
    }

    #[test]
    fn test_tables_disabled() {
        let (doc, tree) = parse("| A |\n|---|");
        let ext = ExtensionSettings {
            tables: false,
            ..ExtensionSettings::default()
        };
        let selection = Selection::cursor(0);
        let ctx = context_for(&doc, &tree, &selection, &ext);
        let mut out = Vec::new();
        decorate(&ctx, &mut out);
        assert!(out.is_empty());
    }
}
