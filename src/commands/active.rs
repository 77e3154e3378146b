//! Active-state predicates for toolbar and menu highlighting
//!
//! Each answers "would running this command now remove formatting". Inline
//! checks look at the syntax tree around the main selection; line checks use
//! the same grammar the decorators use.

use crate::editor::EditorHost;
use crate::markdown::grammar::{self, ListKind};
use crate::markdown::NodeKind;

/// How far around the selection inline nodes are searched.
const INLINE_SLACK: usize = 20;

fn node_active(host: &dyn EditorHost, kind: NodeKind) -> bool {
    let range = host.selection().main();
    let (from, to) = (range.from(), range.to());
    let len = host.document().len();
    host.syntax_tree()
        .find_all(kind, from.saturating_sub(INLINE_SLACK), (to + INLINE_SLACK).min(len))
        .iter()
        .any(|node| node.from <= to && node.to >= from)
}

fn head_line(host: &dyn EditorHost) -> &str {
    host.document().line_at(host.selection().main().head).text
}

pub fn is_bold(host: &dyn EditorHost) -> bool {
    node_active(host, NodeKind::StrongEmphasis)
}

pub fn is_italic(host: &dyn EditorHost) -> bool {
    node_active(host, NodeKind::Emphasis)
}

pub fn is_code(host: &dyn EditorHost) -> bool {
    node_active(host, NodeKind::InlineCode)
}

pub fn is_strikethrough(host: &dyn EditorHost) -> bool {
    node_active(host, NodeKind::Strikethrough)
}

pub fn is_link(host: &dyn EditorHost) -> bool {
    node_active(host, NodeKind::Link)
}

pub fn heading_level(host: &dyn EditorHost) -> Option<u8> {
    grammar::heading_level(head_line(host))
}

pub fn is_bullet_list(host: &dyn EditorHost) -> bool {
    grammar::is_bullet_line(head_line(host))
}

pub fn is_ordered_list(host: &dyn EditorHost) -> bool {
    grammar::is_ordered_line(head_line(host))
}

pub fn is_task_list(host: &dyn EditorHost) -> bool {
    grammar::is_task_line(head_line(host))
}

pub fn is_blockquote(host: &dyn EditorHost) -> bool {
    grammar::is_quote_line(head_line(host))
}

/// Whether the task item on the cursor line is checked.
pub fn is_task_checked(host: &dyn EditorHost) -> bool {
    matches!(
        grammar::list_marker(head_line(host)).map(|m| m.kind),
        Some(ListKind::Task { checked: true, .. })
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::EditorState;

    fn at(text: &str, cursor: usize) -> EditorState {
        let mut state = EditorState::new(text);
        state.set_cursor(cursor);
        state
    }

    #[test]
    fn test_inline_predicates() {
        let state = at("Some **bold** and *italic* text.", 8);
        assert!(is_bold(&state));
        assert!(!is_italic(&state));

        let state = at("Some **bold** and *italic* text.", 21);
        assert!(is_italic(&state));
        assert!(!is_code(&state));
    }

    #[test]
    fn test_inline_predicate_far_away() {
        let text = format!("**bold**{}tail", " ".repeat(60));
        let state = at(&text, text.len());
        assert!(!is_bold(&state));
    }

    #[test]
    fn test_line_predicates_share_grammar() {
        assert!(is_bullet_list(&at("- item", 3)));
        assert!(!is_bullet_list(&at("- [ ] task", 3)));
        assert!(is_task_list(&at("- [ ] task", 3)));
        assert!(is_ordered_list(&at("12. item", 5)));
        assert!(is_blockquote(&at("> quoted", 4)));
        assert_eq!(heading_level(&at("### Three", 5)), Some(3));
        assert_eq!(heading_level(&at("plain", 2)), None);
    }

    #[test]
    fn test_task_checked() {
        assert!(is_task_checked(&at("- [x] done", 7)));
        assert!(!is_task_checked(&at("- [ ] open", 7)));
    }
}
