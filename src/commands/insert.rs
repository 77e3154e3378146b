//! Block templates inserted after the current line

use crate::editor::{EditorHost, Selection, Transaction};
use crate::markdown::grammar::{static_regex, AlertKind};

pub const TABLE_TEMPLATE: &str = "\n\n| Column 1 | Column 2 |\n|---|---|\n| Cell 1 | Cell 2 |\n";
pub const CODE_BLOCK_TEMPLATE: &str = "\n\n```\n\n```\n";
pub const HORIZONTAL_RULE_TEMPLATE: &str = "\n\n---\n\n";

/// Insert `template` at the end of the cursor's line and select
/// `[anchor, head)` measured from the insertion point.
fn insert_after_line(host: &mut dyn EditorHost, template: &str, anchor: usize, head: usize) -> bool {
    let doc = host.document();
    let at = doc.line_at(host.selection().main().head).to;
    host.dispatch(
        Transaction::replace(at, at, template)
            .with_selection(Selection::single(at + anchor, at + head))
            .with_user_event("input"),
    );
    true
}

/// Table skeleton with the first header selected.
pub fn insert_table(host: &mut dyn EditorHost) -> bool {
    // "\n\n| " precedes the header text
    insert_after_line(host, TABLE_TEMPLATE, 4, 4 + "Column 1".len())
}

/// Empty fenced block; the cursor lands on the info-string position.
pub fn insert_code_block(host: &mut dyn EditorHost) -> bool {
    insert_after_line(host, CODE_BLOCK_TEMPLATE, 5, 5)
}

pub fn insert_horizontal_rule(host: &mut dyn EditorHost) -> bool {
    let end = HORIZONTAL_RULE_TEMPLATE.len();
    insert_after_line(host, HORIZONTAL_RULE_TEMPLATE, end, end)
}

/// `> [!TYPE]` header plus an empty quote line holding the cursor.
pub fn insert_callout(host: &mut dyn EditorHost, kind: AlertKind) -> bool {
    let template = format!("\n\n> [!{}]\n> \n", kind.tag());
    let cursor = template.len() - 1;
    insert_after_line(host, &template, cursor, cursor)
}

/// Smallest positive footnote number not yet used in `text`.
pub fn next_footnote_label(text: &str) -> u64 {
    let used: Vec<u64> = static_regex!(r"\[\^(\d+)\]")
        .captures_iter(text)
        .filter_map(|caps| caps.get(1)?.as_str().parse().ok())
        .collect();
    (1..).find(|n| !used.contains(n)).unwrap_or(1)
}

/// Footnote reference at the selection. The selected text becomes the
/// label; otherwise the next free number is used.
pub fn insert_footnote(host: &mut dyn EditorHost) -> bool {
    let range = host.selection().main();
    let (from, to) = (range.from(), range.to());
    let selected = host.document().slice(from, to).trim();
    let label = if selected.is_empty() || selected.contains(char::is_whitespace) {
        next_footnote_label(host.document().text()).to_string()
    } else {
        selected.to_string()
    };
    let insert = format!("[^{}]", label);
    let cursor = from + insert.len();
    host.dispatch(
        Transaction::replace(from, to, insert)
            .with_selection(Selection::cursor(cursor))
            .with_user_event("input"),
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::EditorState;

    #[test]
    fn test_insert_table_after_current_line() {
        let mut state = EditorState::new("Intro\nmore");
        state.set_cursor(2);
        assert!(insert_table(&mut state));
        assert_eq!(
            state.get_content(),
            "Intro\n\n| Column 1 | Column 2 |\n|---|---|\n| Cell 1 | Cell 2 |\n\nmore"
        );
        assert_eq!(state.get_selection(), "Column 1");
    }

    #[test]
    fn test_insert_code_block_cursor_on_info_string() {
        let mut state = EditorState::new("x");
        insert_code_block(&mut state);
        assert_eq!(state.get_content(), "x\n\n```\n\n```\n");
        assert_eq!(state.cursor_position(), 6);
    }

    #[test]
    fn test_insert_horizontal_rule() {
        let mut state = EditorState::new("above");
        insert_horizontal_rule(&mut state);
        assert_eq!(state.get_content(), "above\n\n---\n\n");
        assert_eq!(state.cursor_position(), state.get_content().len());
    }

    #[test]
    fn test_insert_callout() {
        let mut state = EditorState::new("text");
        insert_callout(&mut state, AlertKind::Warning);
        assert_eq!(state.get_content(), "text\n\n> [!WARNING]\n> \n");
        // Cursor after "> " on the body line
        assert_eq!(state.cursor_position(), state.get_content().len() - 1);
    }

    #[test]
    fn test_footnote_label_from_selection_or_next_number() {
        let mut state = EditorState::new("See note[^1] and here");
        state.set_cursor(21);
        insert_footnote(&mut state);
        assert_eq!(state.get_content(), "See note[^1] and here[^2]");
        assert_eq!(state.cursor_position(), 25);

        let mut state = EditorState::new("term");
        state.set_selection(Selection::single(0, 4));
        insert_footnote(&mut state);
        assert_eq!(state.get_content(), "[^term]");
    }

    #[test]
    fn test_next_footnote_label_fills_gaps() {
        assert_eq!(next_footnote_label(""), 1);
        assert_eq!(next_footnote_label("[^1] [^3]"), 2);
    }
}
