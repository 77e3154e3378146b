//! Keyboard bindings
//!
//! Keys use `Mod-Shift-k` style names, `Mod` standing for Ctrl or Cmd
//! (`Ctrl-` and `Cmd-` are accepted as aliases). Typed characters go through
//! `handle_char` for selection wrapping.

use log::debug;

use crate::commands::EditorCommand;
use crate::editor::{Assoc, EditorEvent, EditorHost, Selection, SelectionRange, TextChange, Transaction};
use crate::markdown::grammar::{list_marker, quote_prefix, ListKind, ListMarker};
use crate::table::tab_in_table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Command(EditorCommand),
    /// Emit a save event with the current content
    Save,
    /// Continue the list item or quote on Enter
    ContinueMarkup,
    /// Continue the quote prefix, never exiting the quote
    ContinueQuote,
    NextCell,
    PreviousCell,
}

pub const KEY_BINDINGS: &[(&str, KeyAction)] = &[
    ("Mod-b", KeyAction::Command(EditorCommand::Bold)),
    ("Mod-i", KeyAction::Command(EditorCommand::Italic)),
    ("Mod-e", KeyAction::Command(EditorCommand::InlineCode)),
    ("Mod-Shift-k", KeyAction::Command(EditorCommand::Strikethrough)),
    ("Mod-k", KeyAction::Command(EditorCommand::Link)),
    ("Mod-1", KeyAction::Command(EditorCommand::Heading(1))),
    ("Mod-2", KeyAction::Command(EditorCommand::Heading(2))),
    ("Mod-3", KeyAction::Command(EditorCommand::Heading(3))),
    ("Mod-4", KeyAction::Command(EditorCommand::Heading(4))),
    ("Mod-5", KeyAction::Command(EditorCommand::Heading(5))),
    ("Mod-6", KeyAction::Command(EditorCommand::Heading(6))),
    ("Mod-Shift-8", KeyAction::Command(EditorCommand::BulletList)),
    ("Mod-Shift-7", KeyAction::Command(EditorCommand::OrderedList)),
    ("Mod-Shift-9", KeyAction::Command(EditorCommand::TaskList)),
    ("Mod-s", KeyAction::Save),
    ("Enter", KeyAction::ContinueMarkup),
    ("Shift-Enter", KeyAction::ContinueQuote),
    ("Tab", KeyAction::NextCell),
    ("Shift-Tab", KeyAction::PreviousCell),
];

fn normalize(key: &str) -> String {
    key.replace("Ctrl-", "Mod-").replace("Cmd-", "Mod-")
}

/// The action bound to `key`, if any.
pub fn lookup(key: &str) -> Option<KeyAction> {
    let key = normalize(key);
    KEY_BINDINGS
        .iter()
        .find(|(binding, _)| binding.eq_ignore_ascii_case(&key))
        .map(|(_, action)| *action)
}

/// Run the binding for `key`. Returns whether the key was handled; unhandled
/// keys fall through to the host's default behaviour.
pub fn handle_key(host: &mut dyn EditorHost, key: &str) -> bool {
    let Some(action) = lookup(key) else {
        return false;
    };
    debug!("Key {} -> {:?}", key, action);
    match action {
        KeyAction::Command(command) => command.run(host),
        KeyAction::Save => {
            let content = host.document().text().to_string();
            host.emit(EditorEvent::Save { content });
            true
        }
        KeyAction::ContinueMarkup => {
            !host.settings().read_only && (continue_list(host) || continue_quote(host))
        }
        KeyAction::ContinueQuote => !host.settings().read_only && force_continue_quote(host),
        KeyAction::NextCell => tab_in_table(host, true),
        KeyAction::PreviousCell => tab_in_table(host, false),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Enter Continuation
// ─────────────────────────────────────────────────────────────────────────────

/// Marker text for the item after `marker`.
fn next_marker(line: &str, marker: &ListMarker) -> String {
    let indent = &line[..marker.indent];
    match marker.kind {
        ListKind::Bullet(bullet) => format!("{}{} ", indent, bullet),
        ListKind::Ordered(n) => format!("{}{}. ", indent, n + 1),
        ListKind::Task { bullet, .. } => format!("{}{} [ ] ", indent, bullet),
    }
}

fn insert_at_head(host: &mut dyn EditorHost, insert: String) {
    let head = host.selection().main().head;
    let cursor = head + insert.len();
    host.dispatch(
        Transaction::replace(head, head, insert)
            .with_selection(Selection::cursor(cursor))
            .with_user_event("input"),
    );
}

fn replace_line(host: &mut dyn EditorHost, from: usize, to: usize, insert: String) {
    let cursor = from + insert.len();
    host.dispatch(
        Transaction::replace(from, to, insert)
            .with_selection(Selection::cursor(cursor))
            .with_user_event("input"),
    );
}

/// Enter on a list line: next item, or leave the list on an empty item.
pub fn continue_list(host: &mut dyn EditorHost) -> bool {
    let line = host.document().line_at(host.selection().main().head);
    let Some(marker) = list_marker(line.text) else {
        return false;
    };
    let (from, to) = (line.from, line.to);
    if line.text[marker.content_start..].trim().is_empty() {
        replace_line(host, from, to, String::new());
    } else {
        let insert = format!("\n{}", next_marker(line.text, &marker));
        insert_at_head(host, insert);
    }
    true
}

/// Full quote prefix of `line`, always ending in a space.
fn continued_prefix(raw: &str) -> String {
    if raw.ends_with(' ') {
        raw.to_string()
    } else {
        format!("{} ", raw)
    }
}

/// Enter on a quote line. A list inside the quote continues like a list; an
/// empty item leaves the list but stays in the quote, and an empty quote
/// line leaves the quote.
pub fn continue_quote(host: &mut dyn EditorHost) -> bool {
    let line = host.document().line_at(host.selection().main().head);
    let Some(raw) = quote_prefix(line.text) else {
        return false;
    };
    let prefix = continued_prefix(raw);
    let after = &line.text[raw.len()..];
    let (from, to) = (line.from, line.to);

    if let Some(marker) = list_marker(after) {
        if after[marker.content_start..].trim().is_empty() {
            replace_line(host, from, to, prefix);
        } else {
            let insert = format!("\n{}{}", prefix, next_marker(after, &marker));
            insert_at_head(host, insert);
        }
    } else if after.trim().is_empty() {
        replace_line(host, from, to, String::new());
    } else {
        insert_at_head(host, format!("\n{}", prefix));
    }
    true
}

/// Shift-Enter on a quote line: always continue the prefix.
pub fn force_continue_quote(host: &mut dyn EditorHost) -> bool {
    let line = host.document().line_at(host.selection().main().head);
    let Some(raw) = quote_prefix(line.text) else {
        return false;
    };
    let insert = format!("\n{}", continued_prefix(raw));
    insert_at_head(host, insert);
    true
}

// ─────────────────────────────────────────────────────────────────────────────
// Selection Wrapping
// ─────────────────────────────────────────────────────────────────────────────

/// Characters that wrap a selection instead of replacing it.
pub const WRAP_PAIRS: &[(char, char)] = &[
    ('*', '*'),
    ('_', '_'),
    ('`', '`'),
    ('~', '~'),
    ('"', '"'),
    ('\'', '\''),
    ('(', ')'),
    ('[', ']'),
    ('{', '}'),
];

/// Wrap every non-empty range with the pair for `ch`, keeping the inner
/// text selected. Not handled when no range is non-empty.
pub fn wrap_selection(host: &mut dyn EditorHost, ch: char) -> bool {
    let Some(&(open, close)) = WRAP_PAIRS.iter().find(|(o, _)| *o == ch) else {
        return false;
    };
    if host.settings().read_only {
        return false;
    }
    let selection = host.selection().clone();
    if selection.ranges().iter().all(SelectionRange::is_empty) {
        return false;
    }

    let mut tx = Transaction::new();
    for range in selection.ranges().iter().filter(|r| !r.is_empty()) {
        tx = tx
            .change(TextChange::insert(range.from(), open.to_string()))
            .change(TextChange::insert(range.to(), close.to_string()));
    }
    let mapped = selection.map_ranges(|r| {
        if r.is_empty() {
            let pos = tx.map_pos(r.head, Assoc::After);
            return SelectionRange::cursor(pos);
        }
        let from = tx.map_pos(r.from(), Assoc::After);
        let to = tx.map_pos(r.to(), Assoc::Before);
        if r.anchor <= r.head {
            SelectionRange::new(from, to)
        } else {
            SelectionRange::new(to, from)
        }
    });
    host.dispatch(tx.with_selection(mapped).with_user_event("input.wrap"));
    true
}

/// A typed character. Only selection wrapping is handled here; plain typing
/// is the host's job.
pub fn handle_char(host: &mut dyn EditorHost, ch: char) -> bool {
    wrap_selection(host, ch)
}
