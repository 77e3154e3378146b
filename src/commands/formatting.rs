//! Inline and line-prefix formatting
//!
//! Inline toggles wrap the main selection in a delimiter pair, or remove the
//! pair when it is already there (right outside the selection or as the
//! selection's own first and last characters). Line-prefix commands rewrite
//! the start of every line the selection touches.

use log::debug;

use crate::editor::{Assoc, EditorHost, Selection, SelectionRange, TextChange, Transaction};
use crate::markdown::grammar::LinePrefix;

// ─────────────────────────────────────────────────────────────────────────────
// Inline Delimiters
// ─────────────────────────────────────────────────────────────────────────────

pub const BOLD: &str = "**";
pub const ITALIC: &str = "*";
pub const CODE: &str = "`";
pub const STRIKETHROUGH: &str = "~~";

fn run_len(text: &str, ch: char) -> usize {
    text.chars().take_while(|c| *c == ch).count()
}

/// Whether a run of `run` delimiter characters carries a `delim`.
///
/// `*` and `_` stack: a run of three is both bold and italic, while a run
/// of two is bold only and so does not count as italic.
fn run_carries(run: usize, delim: &str) -> bool {
    let Some(ch) = delim.chars().next() else {
        return false;
    };
    let len = delim.chars().count();
    if ch == '*' || ch == '_' {
        run == len || run == 3
    } else {
        run >= len
    }
}

fn delimiter_char(delim: &str) -> Option<char> {
    let mut chars = delim.chars();
    let first = chars.next()?;
    chars.all(|c| c == first).then_some(first)
}

/// The delimiter sits right outside `[from, to)`.
fn wrapped_outside(text: &str, from: usize, to: usize, open: &str, close: &str) -> bool {
    if from < open.len() || to + close.len() > text.len() {
        return false;
    }
    if !text[..from].ends_with(open) || !text[to..].starts_with(close) {
        return false;
    }
    match (delimiter_char(open), delimiter_char(close)) {
        (Some(a), Some(b)) => {
            let before: String = text[..from].chars().rev().collect();
            run_carries(run_len(&before, a), open) && run_carries(run_len(&text[to..], b), close)
        }
        _ => true,
    }
}

/// The selection itself starts with `open` and ends with `close`.
fn wrapped_inside(selected: &str, open: &str, close: &str) -> bool {
    if selected.len() <= open.len() + close.len()
        || !selected.starts_with(open)
        || !selected.ends_with(close)
    {
        return false;
    }
    match (delimiter_char(open), delimiter_char(close)) {
        (Some(a), Some(b)) => {
            let tail: String = selected.chars().rev().collect();
            run_carries(run_len(selected, a), open) && run_carries(run_len(&tail, b), close)
        }
        _ => true,
    }
}

/// Toggle `open`/`close` around the main selection.
///
/// An empty selection gets an empty pair with the cursor between the
/// delimiters; running the command again there removes the pair.
pub fn toggle_wrap(host: &mut dyn EditorHost, open: &str, close: &str) -> bool {
    let range = host.selection().main();
    let (from, to) = (range.from(), range.to());
    let text = host.document().text();
    let selected = &text[from..to];

    let tx = if wrapped_outside(text, from, to, open, close) {
        Transaction::new()
            .change(TextChange::delete(from - open.len(), from))
            .change(TextChange::delete(to, to + close.len()))
            .with_selection(Selection::single(from - open.len(), to - open.len()))
    } else if wrapped_inside(selected, open, close) {
        let inner = &selected[open.len()..selected.len() - close.len()];
        Transaction::replace(from, to, inner)
            .with_selection(Selection::single(from, from + inner.len()))
    } else {
        let wrapped = format!("{}{}{}", open, selected, close);
        Transaction::replace(from, to, wrapped).with_selection(Selection::single(
            from + open.len(),
            from + open.len() + selected.len(),
        ))
    };
    host.dispatch(tx.with_user_event("input.format"));
    true
}

/// `[selection](url)` with `url` selected; an empty selection becomes
/// `[link text](url)`.
pub fn insert_link(host: &mut dyn EditorHost) -> bool {
    let range = host.selection().main();
    let (from, to) = (range.from(), range.to());
    let selected = host.document().slice(from, to);
    let label = if selected.is_empty() { "link text" } else { selected };
    let insert = format!("[{}](url)", label);
    let url_start = from + label.len() + 3;
    let url_end = from + insert.len() - 1;
    host.dispatch(
        Transaction::replace(from, to, insert)
            .with_selection(Selection::single(url_start, url_end))
            .with_user_event("input.format"),
    );
    true
}

// ─────────────────────────────────────────────────────────────────────────────
// Line Prefixes
// ─────────────────────────────────────────────────────────────────────────────

impl LinePrefix {
    /// Prefixes that applying `self` replaces.
    fn replaces(&self) -> &'static [LinePrefix] {
        match self {
            LinePrefix::Heading(_) => &[LinePrefix::Heading(1)],
            LinePrefix::Bullet | LinePrefix::Ordered | LinePrefix::Task => {
                &[LinePrefix::Task, LinePrefix::Bullet, LinePrefix::Ordered]
            }
            LinePrefix::Quote => &[LinePrefix::Quote],
        }
    }

    fn same_kind(&self, other: &LinePrefix) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Text of this prefix for the `index`-th line it is applied to.
    fn render(&self, index: usize) -> String {
        match self {
            LinePrefix::Heading(level) => format!("{} ", "#".repeat(*level as usize)),
            LinePrefix::Bullet => "- ".to_string(),
            LinePrefix::Ordered => format!("{}. ", index + 1),
            LinePrefix::Task => "- [ ] ".to_string(),
            LinePrefix::Quote => "> ".to_string(),
        }
    }
}

/// Existing replaceable prefix on `body` (indent already removed).
fn existing_prefix(body: &str, target: LinePrefix) -> Option<(LinePrefix, usize)> {
    let (found, len) = LinePrefix::detect(body)?;
    target
        .replaces()
        .iter()
        .any(|p| p.same_kind(&found))
        .then_some((found, len))
}

/// Set `target` as the prefix of every line the main selection touches.
///
/// Lines that already carry exactly `target` toggle it off (when all of them
/// do). Other list/heading prefixes of the same family are replaced.
/// Indentation is preserved and blank lines in a multi-line selection are
/// left alone.
pub fn set_line_prefix(host: &mut dyn EditorHost, target: LinePrefix) -> bool {
    let doc = host.document();
    let range = host.selection().main();
    let first = doc.line_at(range.from()).number;
    let last = doc.line_at(range.to()).number;

    let lines: Vec<_> = (first..=last)
        .map(|n| doc.line(n))
        .filter(|line| first == last || !line.is_blank())
        .collect();
    if lines.is_empty() {
        return false;
    }

    let has_target = |text: &str| {
        let body = text.trim_start();
        matches!(existing_prefix(body, target), Some((found, _)) if found == target)
    };
    let toggle_off = lines.iter().all(|line| has_target(line.text));

    let mut tx = Transaction::new();
    for (index, line) in lines.iter().enumerate() {
        let indent = line.text.len() - line.text.trim_start().len();
        let body = &line.text[indent..];
        let strip = existing_prefix(body, target).map_or(0, |(_, len)| len);
        let insert = if toggle_off {
            String::new()
        } else {
            target.render(index)
        };
        let from = line.from + indent;
        if doc.slice(from, from + strip) != insert {
            tx = tx.change(TextChange::new(from, from + strip, insert));
        }
    }

    if tx.changes.is_empty() {
        debug!("Line prefix {:?} already applied, nothing to do", target);
        return true;
    }

    let selection = host
        .selection()
        .map_ranges(|r| SelectionRange::new(tx.map_pos(r.anchor, Assoc::After), tx.map_pos(r.head, Assoc::After)));
    host.dispatch(tx.with_selection(selection).with_user_event("input.format"));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::EditorState;

    fn state_with(text: &str, anchor: usize, head: usize) -> EditorState {
        let mut state = EditorState::new(text);
        state.set_selection(Selection::single(anchor, head));
        state
    }

    // ─────────────────────────────────────────────────────────────────────────
    // toggle_wrap
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_wrap_selection() {
        let mut state = state_with("make bold here", 5, 9);
        assert!(toggle_wrap(&mut state, BOLD, BOLD));
        assert_eq!(state.get_content(), "make **bold** here");
        assert_eq!(state.get_selection(), "bold");
    }

    #[test]
    fn test_unwrap_adjacent_delimiters() {
        let mut state = state_with("make **bold** here", 7, 11);
        assert!(toggle_wrap(&mut state, BOLD, BOLD));
        assert_eq!(state.get_content(), "make bold here");
        assert_eq!(state.get_selection(), "bold");
    }

    #[test]
    fn test_unwrap_contained_delimiters() {
        let mut state = state_with("make **bold** here", 5, 13);
        assert!(toggle_wrap(&mut state, BOLD, BOLD));
        assert_eq!(state.get_content(), "make bold here");
        assert_eq!(state.get_selection(), "bold");
    }

    #[test]
    fn test_toggle_twice_restores_text() {
        for delim in [BOLD, ITALIC, CODE, STRIKETHROUGH] {
            let original = "one two three";
            let mut state = state_with(original, 4, 7);
            toggle_wrap(&mut state, delim, delim);
            assert_ne!(state.get_content(), original);
            toggle_wrap(&mut state, delim, delim);
            assert_eq!(state.get_content(), original, "delimiter {}", delim);
        }
    }

    #[test]
    fn test_italic_inside_bold_wraps_instead_of_stealing_a_star() {
        let mut state = state_with("**bold**", 2, 6);
        toggle_wrap(&mut state, ITALIC, ITALIC);
        assert_eq!(state.get_content(), "***bold***");
        toggle_wrap(&mut state, ITALIC, ITALIC);
        assert_eq!(state.get_content(), "**bold**");
    }

    #[test]
    fn test_empty_selection_inserts_pair() {
        let mut state = EditorState::new("ab");
        state.set_cursor(1);
        toggle_wrap(&mut state, CODE, CODE);
        assert_eq!(state.get_content(), "a``b");
        assert_eq!(state.cursor_position(), 2);
        toggle_wrap(&mut state, CODE, CODE);
        assert_eq!(state.get_content(), "ab");
    }

    #[test]
    fn test_link_selects_url() {
        let mut state = state_with("see docs", 4, 8);
        assert!(insert_link(&mut state));
        assert_eq!(state.get_content(), "see [docs](url)");
        assert_eq!(state.get_selection(), "url");

        let mut state = EditorState::new("");
        insert_link(&mut state);
        assert_eq!(state.get_content(), "[link text](url)");
        assert_eq!(state.get_selection(), "url");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // set_line_prefix
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_heading_set_replace_and_toggle_off() {
        let mut state = EditorState::new("Title");
        state.set_cursor(2);
        set_line_prefix(&mut state, LinePrefix::Heading(2));
        assert_eq!(state.get_content(), "## Title");
        assert_eq!(state.cursor_position(), 5);

        set_line_prefix(&mut state, LinePrefix::Heading(1));
        assert_eq!(state.get_content(), "# Title");

        set_line_prefix(&mut state, LinePrefix::Heading(1));
        assert_eq!(state.get_content(), "Title");
    }

    #[test]
    fn test_bullet_replaces_task_and_keeps_indent() {
        let mut state = EditorState::new("  - [ ] item");
        state.set_cursor(10);
        set_line_prefix(&mut state, LinePrefix::Bullet);
        assert_eq!(state.get_content(), "  - item");
    }

    #[test]
    fn test_ordered_numbers_selected_lines() {
        let mut state = state_with("a\nb\n\nc", 0, 6);
        set_line_prefix(&mut state, LinePrefix::Ordered);
        assert_eq!(state.get_content(), "1. a\n2. b\n\n3. c");
        set_line_prefix(&mut state, LinePrefix::Ordered);
        assert_eq!(state.get_content(), "a\nb\n\nc");
    }

    #[test]
    fn test_task_on_blank_line() {
        let mut state = EditorState::new("");
        set_line_prefix(&mut state, LinePrefix::Task);
        assert_eq!(state.get_content(), "- [ ] ");
        assert_eq!(state.cursor_position(), 6);
    }

    #[test]
    fn test_quote_does_not_touch_list_marker() {
        let mut state = EditorState::new("- item");
        set_line_prefix(&mut state, LinePrefix::Quote);
        assert_eq!(state.get_content(), "> - item");
        set_line_prefix(&mut state, LinePrefix::Quote);
        assert_eq!(state.get_content(), "- item");
    }
}
