//! Right-click menu
//!
//! Built fresh on every invocation from the current host state. When opened
//! over a table cell the menu starts with a Table sub-menu whose actions
//! carry the table key and the cell, so the chosen mutation targets exactly
//! that row or column.

use crate::commands::EditorCommand;
use crate::editor::EditorHost;
use crate::markdown::grammar::AlertKind;
use crate::table::{CellRef, TableArena, TableMutation};
use crate::ui::styles::{CONTEXT_MENU_CSS, CONTEXT_MENU_STYLE_ID};

/// Cell the menu was opened over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableTarget {
    /// Arena key of the table (its block start)
    pub table: usize,
    pub cell: CellRef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Command(EditorCommand),
    Table {
        table: usize,
        mutation: TableMutation,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    Action {
        label: &'static str,
        shortcut: Option<&'static str>,
        action: MenuAction,
        /// Drawn with a check mark
        is_active: bool,
    },
    Submenu {
        label: &'static str,
        items: Vec<MenuItem>,
    },
    Separator,
}

impl MenuItem {
    fn command(host: &dyn EditorHost, command: EditorCommand) -> Self {
        MenuItem::Action {
            label: command.label(),
            shortcut: command.shortcut(),
            action: MenuAction::Command(command),
            is_active: command.is_active(host),
        }
    }

    fn table(target: TableTarget, mutation: TableMutation) -> Self {
        MenuItem::Action {
            label: mutation.label(),
            shortcut: None,
            action: MenuAction::Table {
                table: target.table,
                mutation,
            },
            is_active: false,
        }
    }

    pub fn label(&self) -> Option<&'static str> {
        match self {
            MenuItem::Action { label, .. } | MenuItem::Submenu { label, .. } => Some(*label),
            MenuItem::Separator => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenu {
    pub x: f32,
    pub y: f32,
    pub target: Option<TableTarget>,
    pub items: Vec<MenuItem>,
}

impl ContextMenu {
    /// Find a submenu by label.
    pub fn submenu(&self, label: &str) -> Option<&[MenuItem]> {
        self.items.iter().find_map(|item| match item {
            MenuItem::Submenu { label: l, items } if *l == label => Some(items.as_slice()),
            _ => None,
        })
    }
}

/// Build the menu for a right-click at `(x, y)`. Returns `None` when the
/// context menu is disabled in settings.
pub fn show_context_menu(
    host: &dyn EditorHost,
    x: f32,
    y: f32,
    target: Option<TableTarget>,
) -> Option<ContextMenu> {
    if !host.settings().context_menu {
        return None;
    }
    host.services()
        .styles
        .inject(CONTEXT_MENU_STYLE_ID, CONTEXT_MENU_CSS);

    let mut items = Vec::new();

    if let Some(target) = target {
        items.push(MenuItem::Submenu {
            label: "Table",
            items: TableMutation::all_for_cell(target.cell)
                .into_iter()
                .map(|mutation| MenuItem::table(target, mutation))
                .collect(),
        });
        items.push(MenuItem::Separator);
    }

    let cmd = |command| MenuItem::command(host, command);

    items.push(MenuItem::Submenu {
        label: "Format",
        items: vec![
            cmd(EditorCommand::Bold),
            cmd(EditorCommand::Italic),
            cmd(EditorCommand::Strikethrough),
            cmd(EditorCommand::InlineCode),
            cmd(EditorCommand::Link),
        ],
    });
    items.push(MenuItem::Submenu {
        label: "Paragraph",
        items: vec![
            cmd(EditorCommand::Heading(1)),
            cmd(EditorCommand::Heading(2)),
            cmd(EditorCommand::Heading(3)),
            cmd(EditorCommand::Heading(4)),
            cmd(EditorCommand::Heading(5)),
            cmd(EditorCommand::Heading(6)),
            MenuItem::Separator,
            cmd(EditorCommand::BulletList),
            cmd(EditorCommand::OrderedList),
            cmd(EditorCommand::TaskList),
            cmd(EditorCommand::Blockquote),
        ],
    });
    items.push(MenuItem::Submenu {
        label: "Insert",
        items: vec![
            cmd(EditorCommand::InsertTable),
            cmd(EditorCommand::InsertCodeBlock),
            cmd(EditorCommand::InsertHorizontalRule),
            MenuItem::Submenu {
                label: "Callout",
                items: AlertKind::ALL
                    .into_iter()
                    .map(|kind| cmd(EditorCommand::InsertCallout(kind)))
                    .collect(),
            },
            cmd(EditorCommand::InsertFootnote),
        ],
    });
    items.push(MenuItem::Separator);
    items.push(cmd(EditorCommand::Cut));
    items.push(cmd(EditorCommand::Copy));
    items.push(cmd(EditorCommand::Paste));
    items.push(cmd(EditorCommand::SelectAll));

    Some(ContextMenu {
        x,
        y,
        target,
        items,
    })
}

/// Run a chosen menu action. Table actions go through `tables` so the
/// rewrite is serialized and diffed like any other table edit.
pub fn run_menu_action(host: &mut dyn EditorHost, tables: &mut TableArena, action: MenuAction) -> bool {
    match action {
        MenuAction::Command(command) => command.run(host),
        MenuAction::Table { table, mutation } => tables.apply_mutation(host, table, mutation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::editor::EditorState;
    use crate::table::RowRef;

    #[test]
    fn test_menu_sections_without_table() {
        let state = EditorState::new("text");
        let menu = show_context_menu(&state, 10.0, 20.0, None).unwrap();
        let labels: Vec<_> = menu.items.iter().map(MenuItem::label).collect();
        assert_eq!(
            labels,
            vec![
                Some("Format"),
                Some("Paragraph"),
                Some("Insert"),
                None,
                Some("Cut"),
                Some("Copy"),
                Some("Paste"),
                Some("Select All"),
            ]
        );
        let insert = menu.submenu("Insert").unwrap();
        assert!(insert
            .iter()
            .any(|item| matches!(item, MenuItem::Submenu { label: "Callout", items } if items.len() == 5)));
        assert!(state.services().styles.is_injected(CONTEXT_MENU_STYLE_ID));
    }

    #[test]
    fn test_table_submenu_targets_cell() {
        let state = EditorState::new("| A | B |\n|---|---|\n| 1 | 2 |");
        let target = TableTarget {
            table: 0,
            cell: CellRef::body(0, 1),
        };
        let menu = show_context_menu(&state, 0.0, 0.0, Some(target)).unwrap();
        assert_eq!(menu.items[0].label(), Some("Table"));
        let table = menu.submenu("Table").unwrap();
        assert!(table.contains(&MenuItem::Action {
            label: "Delete row",
            shortcut: None,
            action: MenuAction::Table {
                table: 0,
                mutation: TableMutation::DeleteRow(RowRef::Body(0)),
            },
            is_active: false,
        }));
        assert!(table.iter().any(|item| matches!(
            item,
            MenuItem::Action {
                action: MenuAction::Table {
                    mutation: TableMutation::InsertColumnRight(1),
                    ..
                },
                ..
            }
        )));
    }

    #[test]
    fn test_active_items_marked() {
        let mut state = EditorState::new("## Heading");
        state.set_cursor(5);
        let menu = show_context_menu(&state, 0.0, 0.0, None).unwrap();
        let paragraph = menu.submenu("Paragraph").unwrap();
        let active: Vec<_> = paragraph
            .iter()
            .filter(|item| matches!(item, MenuItem::Action { is_active: true, .. }))
            .filter_map(MenuItem::label)
            .collect();
        assert_eq!(active, vec!["Heading 2"]);
    }

    #[test]
    fn test_disabled_menu() {
        let settings = Settings {
            context_menu: false,
            ..Settings::default()
        };
        let state = EditorState::with_settings("x", settings);
        assert!(show_context_menu(&state, 0.0, 0.0, None).is_none());
    }

    #[test]
    fn test_run_table_action() {
        let mut state = EditorState::new("| A | B |\n|---|---|\n| 1 | 2 |");
        let mut tables = TableArena::new();
        tables.sync(crate::table::collect_tables(state.document(), state.syntax_tree()));
        let action = MenuAction::Table {
            table: 0,
            mutation: TableMutation::InsertColumnRight(1),
        };
        assert!(run_menu_action(&mut state, &mut tables, action));
        assert!(state.get_content().starts_with("| A   | B   | Column |"));
    }
}
