//! Formatting toolbar descriptors
//!
//! The toolbar is a flat list of item ids from settings. Items are plain
//! descriptors built fresh on every query; the host renders them and calls
//! back into `run`/`is_active`.

use serde::Serialize;

use crate::commands::EditorCommand;
use crate::editor::EditorHost;
use crate::markdown::grammar::AlertKind;

/// Layout used when settings do not provide one.
pub const DEFAULT_TOOLBAR_ITEMS: &[&str] = &[
    "bold",
    "italic",
    "strikethrough",
    "code",
    "link",
    "separator",
    "heading1",
    "heading2",
    "heading3",
    "separator",
    "bullet-list",
    "ordered-list",
    "task-list",
    "blockquote",
    "separator",
    "table",
    "code-block",
    "horizontal-rule",
    "callout",
    "footnote",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolbarItem {
    Bold,
    Italic,
    Strikethrough,
    Code,
    Link,
    Heading1,
    Heading2,
    Heading3,
    BulletList,
    OrderedList,
    TaskList,
    Blockquote,
    Table,
    CodeBlock,
    HorizontalRule,
    Callout,
    Footnote,
    Separator,
}

impl ToolbarItem {
    pub fn from_id(id: &str) -> Option<Self> {
        Some(match id {
            "bold" => Self::Bold,
            "italic" => Self::Italic,
            "strikethrough" => Self::Strikethrough,
            "code" => Self::Code,
            "link" => Self::Link,
            "heading1" => Self::Heading1,
            "heading2" => Self::Heading2,
            "heading3" => Self::Heading3,
            "bullet-list" => Self::BulletList,
            "ordered-list" => Self::OrderedList,
            "task-list" => Self::TaskList,
            "blockquote" => Self::Blockquote,
            "table" => Self::Table,
            "code-block" => Self::CodeBlock,
            "horizontal-rule" => Self::HorizontalRule,
            "callout" => Self::Callout,
            "footnote" => Self::Footnote,
            "separator" => Self::Separator,
            _ => return None,
        })
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Strikethrough => "strikethrough",
            Self::Code => "code",
            Self::Link => "link",
            Self::Heading1 => "heading1",
            Self::Heading2 => "heading2",
            Self::Heading3 => "heading3",
            Self::BulletList => "bullet-list",
            Self::OrderedList => "ordered-list",
            Self::TaskList => "task-list",
            Self::Blockquote => "blockquote",
            Self::Table => "table",
            Self::CodeBlock => "code-block",
            Self::HorizontalRule => "horizontal-rule",
            Self::Callout => "callout",
            Self::Footnote => "footnote",
            Self::Separator => "separator",
        }
    }

    /// The command behind this button. Separators have none; the callout
    /// button inserts a note (the other kinds live in the context menu).
    pub fn command(&self) -> Option<EditorCommand> {
        Some(match self {
            Self::Bold => EditorCommand::Bold,
            Self::Italic => EditorCommand::Italic,
            Self::Strikethrough => EditorCommand::Strikethrough,
            Self::Code => EditorCommand::InlineCode,
            Self::Link => EditorCommand::Link,
            Self::Heading1 => EditorCommand::Heading(1),
            Self::Heading2 => EditorCommand::Heading(2),
            Self::Heading3 => EditorCommand::Heading(3),
            Self::BulletList => EditorCommand::BulletList,
            Self::OrderedList => EditorCommand::OrderedList,
            Self::TaskList => EditorCommand::TaskList,
            Self::Blockquote => EditorCommand::Blockquote,
            Self::Table => EditorCommand::InsertTable,
            Self::CodeBlock => EditorCommand::InsertCodeBlock,
            Self::HorizontalRule => EditorCommand::InsertHorizontalRule,
            Self::Callout => EditorCommand::InsertCallout(AlertKind::Note),
            Self::Footnote => EditorCommand::InsertFootnote,
            Self::Separator => return None,
        })
    }

    pub fn run(&self, host: &mut dyn EditorHost) -> bool {
        self.command().is_some_and(|command| command.run(host))
    }

    pub fn is_active(&self, host: &dyn EditorHost) -> bool {
        self.command().is_some_and(|command| command.is_active(host))
    }
}

/// A toolbar button as the host draws it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolbarButton {
    pub id: &'static str,
    pub icon: &'static str,
    pub tooltip: String,
    pub active: bool,
}

/// Buttons for the configured layout, with active state for the current
/// selection. Separators come through with an empty icon.
pub fn toolbar_buttons(host: &dyn EditorHost) -> Vec<ToolbarButton> {
    host.settings()
        .toolbar_layout()
        .into_iter()
        .map(|item| match item.command() {
            Some(command) => ToolbarButton {
                id: item.id(),
                icon: command.icon(),
                tooltip: command.tooltip(),
                active: command.is_active(host),
            },
            None => ToolbarButton {
                id: item.id(),
                icon: "",
                tooltip: String::new(),
                active: false,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::EditorState;

    #[test]
    fn test_default_ids_all_known() {
        for id in DEFAULT_TOOLBAR_ITEMS {
            let item = ToolbarItem::from_id(id).unwrap();
            assert_eq!(item.id(), *id);
        }
        assert_eq!(ToolbarItem::from_id("sparkles"), None);
    }

    #[test]
    fn test_buttons_report_active_state() {
        let mut state = EditorState::new("# Title");
        state.set_cursor(4);
        let buttons = toolbar_buttons(&state);
        assert_eq!(buttons.len(), DEFAULT_TOOLBAR_ITEMS.len());
        let h1 = buttons.iter().find(|b| b.id == "heading1").unwrap();
        assert!(h1.active);
        let h2 = buttons.iter().find(|b| b.id == "heading2").unwrap();
        assert!(!h2.active);
        assert_eq!(buttons[0].tooltip, "Bold (Mod+B)");
    }

    #[test]
    fn test_item_runs_command() {
        let mut state = EditorState::new("line");
        assert!(ToolbarItem::Blockquote.run(&mut state));
        assert_eq!(state.get_content(), "> line");
        assert!(!ToolbarItem::Separator.run(&mut state));
    }
}
