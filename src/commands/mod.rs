//! Structural editing commands
//!
//! Every command takes the host and returns whether it handled the request.
//! Commands edit text spans directly and never go through the decoration
//! path, but they share the delimiter and prefix grammar with it.
//!
//! # Example
//! ```ignore
//! use crate::commands::EditorCommand;
//!
//! let mut state = EditorState::new("make bold");
//! state.set_selection(Selection::single(5, 9));
//! EditorCommand::Bold.run(&mut state);
//! assert_eq!(state.get_content(), "make **bold**");
//! ```

pub mod active;
pub mod edit;
pub mod formatting;
pub mod insert;

use crate::editor::EditorHost;
use crate::markdown::grammar::{AlertKind, LinePrefix};

pub use formatting::{insert_link, set_line_prefix, toggle_wrap};

// ─────────────────────────────────────────────────────────────────────────────
// Command Enum
// ─────────────────────────────────────────────────────────────────────────────

/// Commands exposed to toolbars, menus and key bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorCommand {
    Bold,
    Italic,
    Strikethrough,
    InlineCode,
    Link,
    /// Heading level 1-6
    Heading(u8),
    BulletList,
    OrderedList,
    TaskList,
    Blockquote,
    InsertTable,
    InsertCodeBlock,
    InsertHorizontalRule,
    InsertCallout(AlertKind),
    InsertFootnote,
    Cut,
    Copy,
    Paste,
    SelectAll,
}

impl EditorCommand {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bold => "Bold",
            Self::Italic => "Italic",
            Self::Strikethrough => "Strikethrough",
            Self::InlineCode => "Inline Code",
            Self::Link => "Link",
            Self::Heading(1) => "Heading 1",
            Self::Heading(2) => "Heading 2",
            Self::Heading(3) => "Heading 3",
            Self::Heading(4) => "Heading 4",
            Self::Heading(5) => "Heading 5",
            Self::Heading(_) => "Heading 6",
            Self::BulletList => "Bullet List",
            Self::OrderedList => "Numbered List",
            Self::TaskList => "Task List",
            Self::Blockquote => "Blockquote",
            Self::InsertTable => "Table",
            Self::InsertCodeBlock => "Code Block",
            Self::InsertHorizontalRule => "Horizontal Rule",
            Self::InsertCallout(kind) => kind.label(),
            Self::InsertFootnote => "Footnote",
            Self::Cut => "Cut",
            Self::Copy => "Copy",
            Self::Paste => "Paste",
            Self::SelectAll => "Select All",
        }
    }

    /// Keyboard shortcut label, `Mod` being Ctrl or Cmd.
    pub fn shortcut(&self) -> Option<&'static str> {
        Some(match self {
            Self::Bold => "Mod+B",
            Self::Italic => "Mod+I",
            Self::InlineCode => "Mod+E",
            Self::Strikethrough => "Mod+Shift+K",
            Self::Link => "Mod+K",
            Self::Heading(1) => "Mod+1",
            Self::Heading(2) => "Mod+2",
            Self::Heading(3) => "Mod+3",
            Self::Heading(4) => "Mod+4",
            Self::Heading(5) => "Mod+5",
            Self::Heading(_) => "Mod+6",
            Self::BulletList => "Mod+Shift+8",
            Self::OrderedList => "Mod+Shift+7",
            Self::TaskList => "Mod+Shift+9",
            Self::Cut => "Mod+X",
            Self::Copy => "Mod+C",
            Self::Paste => "Mod+V",
            Self::SelectAll => "Mod+A",
            _ => return None,
        })
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Bold => "B",
            Self::Italic => "I",
            Self::Strikethrough => "S̶",
            Self::InlineCode => "</>",
            Self::Link => "🔗",
            Self::Heading(1) => "H1",
            Self::Heading(2) => "H2",
            Self::Heading(3) => "H3",
            Self::Heading(4) => "H4",
            Self::Heading(5) => "H5",
            Self::Heading(_) => "H6",
            Self::BulletList => "\u{2022}",
            Self::OrderedList => "1.",
            Self::TaskList => "\u{2611}",
            Self::Blockquote => "\u{275D}",
            Self::InsertTable => "\u{25A6}",
            Self::InsertCodeBlock => "{ }",
            Self::InsertHorizontalRule => "\u{2015}",
            Self::InsertCallout(kind) => kind.icon(),
            Self::InsertFootnote => "\u{00B9}",
            Self::Cut => "\u{2702}",
            Self::Copy => "\u{2398}",
            Self::Paste => "\u{1F4CB}",
            Self::SelectAll => "\u{2B1A}",
        }
    }

    pub fn tooltip(&self) -> String {
        match self.shortcut() {
            Some(shortcut) => format!("{} ({})", self.label(), shortcut),
            None => self.label().to_string(),
        }
    }

    /// Run the command against `host`.
    pub fn run(&self, host: &mut dyn EditorHost) -> bool {
        use formatting::{BOLD, CODE, ITALIC, STRIKETHROUGH};

        if host.settings().read_only && !matches!(self, Self::Copy | Self::SelectAll) {
            return false;
        }
        match self {
            Self::Bold => toggle_wrap(host, BOLD, BOLD),
            Self::Italic => toggle_wrap(host, ITALIC, ITALIC),
            Self::Strikethrough => toggle_wrap(host, STRIKETHROUGH, STRIKETHROUGH),
            Self::InlineCode => toggle_wrap(host, CODE, CODE),
            Self::Link => insert_link(host),
            Self::Heading(level) => set_line_prefix(host, LinePrefix::Heading((*level).clamp(1, 6))),
            Self::BulletList => set_line_prefix(host, LinePrefix::Bullet),
            Self::OrderedList => set_line_prefix(host, LinePrefix::Ordered),
            Self::TaskList => set_line_prefix(host, LinePrefix::Task),
            Self::Blockquote => set_line_prefix(host, LinePrefix::Quote),
            Self::InsertTable => insert::insert_table(host),
            Self::InsertCodeBlock => insert::insert_code_block(host),
            Self::InsertHorizontalRule => insert::insert_horizontal_rule(host),
            Self::InsertCallout(kind) => insert::insert_callout(host, *kind),
            Self::InsertFootnote => insert::insert_footnote(host),
            Self::Cut => edit::cut(host),
            Self::Copy => edit::copy(host),
            Self::Paste => edit::paste(host),
            Self::SelectAll => edit::select_all(host),
        }
    }

    /// Whether running the command now would remove formatting.
    pub fn is_active(&self, host: &dyn EditorHost) -> bool {
        match self {
            Self::Bold => active::is_bold(host),
            Self::Italic => active::is_italic(host),
            Self::Strikethrough => active::is_strikethrough(host),
            Self::InlineCode => active::is_code(host),
            Self::Link => active::is_link(host),
            Self::Heading(level) => active::heading_level(host) == Some(*level),
            Self::BulletList => active::is_bullet_list(host),
            Self::OrderedList => active::is_ordered_list(host),
            Self::TaskList => active::is_task_list(host),
            Self::Blockquote => active::is_blockquote(host),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::editor::{EditorState, Selection};

    #[test]
    fn test_run_dispatches_by_variant() {
        let mut state = EditorState::new("word");
        state.set_selection(Selection::single(0, 4));
        assert!(EditorCommand::Bold.run(&mut state));
        assert_eq!(state.get_content(), "**word**");
        assert!(EditorCommand::Bold.is_active(&state));

        assert!(EditorCommand::Heading(2).run(&mut state));
        assert_eq!(state.get_content(), "## **word**");
        assert!(EditorCommand::Heading(2).is_active(&state));
        assert!(!EditorCommand::Heading(1).is_active(&state));
    }

    #[test]
    fn test_read_only_refuses_edits() {
        let settings = Settings {
            read_only: true,
            ..Settings::default()
        };
        let mut state = EditorState::with_settings("word", settings);
        state.set_selection(Selection::single(0, 4));
        assert!(!EditorCommand::Italic.run(&mut state));
        assert_eq!(state.get_content(), "word");
        assert!(EditorCommand::SelectAll.run(&mut state));
    }

    #[test]
    fn test_tooltip_includes_shortcut() {
        assert_eq!(EditorCommand::Bold.tooltip(), "Bold (Mod+B)");
        assert_eq!(EditorCommand::InsertTable.tooltip(), "Table");
        assert_eq!(
            EditorCommand::InsertCallout(AlertKind::Tip).label(),
            "Tip"
        );
    }
}
