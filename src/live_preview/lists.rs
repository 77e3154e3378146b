//! Bullet, ordered and task list markers
//!
//! Unlike most constructs, list markers only reveal their raw text when the
//! cursor head is on the marker itself. Moving elsewhere on the line keeps
//! the rendered bullet or checkbox.

use log::debug;

use super::cursor::cursor_on_marker;
use super::decoration::{Decoration, DecorationContext, Widget};
use crate::editor::{EditorHost, Transaction};
use crate::markdown::grammar::{list_marker, ListKind};
use crate::markdown::{NodeKind, Walk};

pub fn decorate(ctx: &DecorationContext, from: usize, to: usize, out: &mut Vec<Decoration>) {
    ctx.tree.walk(from, to, |node| {
        if node.kind.is_code() {
            return Walk::Skip;
        }
        if node.kind != NodeKind::ListItem {
            return Walk::Descend;
        }

        // Items nested in a quote start after the `>` prefix, so read the
        // line from the item's own start.
        let line = ctx.doc.line_at(node.from);
        let base = node.from;
        let Some(marker) = list_marker(ctx.doc.slice(base, line.to)) else {
            return Walk::Descend;
        };
        let marker_from = base + marker.indent;
        let marker_to = base + marker.marker_end;

        match marker.kind {
            ListKind::Task { checked, .. } if ctx.extensions.task_lists => {
                let (cb_from, cb_to) = match marker.checkbox() {
                    Some((start, end)) => (base + start, base + end),
                    None => return Walk::Descend,
                };
                if cursor_on_marker(ctx.selection, marker_from, cb_to) {
                    out.push(Decoration::mark(marker_from, cb_to, "idz-marker"));
                } else {
                    out.push(Decoration::widget(marker_from, cb_from, Widget::Bullet));
                    out.push(Decoration::widget(
                        cb_from,
                        cb_to,
                        Widget::Checkbox {
                            checked,
                            toggle_at: cb_from + 1,
                        },
                    ));
                }
            }
            ListKind::Bullet(_) | ListKind::Task { .. } => {
                if cursor_on_marker(ctx.selection, marker_from, marker_to) {
                    out.push(Decoration::mark(marker_from, marker_to, "idz-marker"));
                } else {
                    out.push(Decoration::widget(marker_from, marker_to, Widget::Bullet));
                }
            }
            ListKind::Ordered(_) => {
                let class = if cursor_on_marker(ctx.selection, marker_from, marker_to) {
                    "idz-marker"
                } else {
                    "idz-ordered-marker"
                };
                out.push(Decoration::mark(marker_from, marker_to, class));
            }
        }
        // Nested lists live inside this item
        Walk::Descend
    });
}

/// Flip the task checkbox whose inner character sits at `toggle_at`.
///
/// Only that one character changes: `[ ]` becomes `[x]` and `[x]`/`[X]`
/// becomes `[ ]`. Returns `false` when `toggle_at` is not inside a checkbox.
pub fn toggle_checkbox(host: &mut dyn EditorHost, toggle_at: usize) -> bool {
    let doc = host.document();
    if toggle_at == 0 || toggle_at + 2 > doc.len() {
        return false;
    }
    let replacement = match doc.slice(toggle_at - 1, toggle_at + 2) {
        "[ ]" => "x",
        "[x]" | "[X]" => " ",
        other => {
            debug!("No checkbox at {} (found {:?})", toggle_at, other);
            return false;
        }
    };
    host.dispatch(
        Transaction::replace(toggle_at, toggle_at + 1, replacement).with_user_event("input.toggle"),
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtensionSettings;
    use crate::editor::EditorState;
    use crate::live_preview::test_support::{decorate_with, decorate_with_ext};

    #[test]
    fn test_bullet_rendered_when_cursor_elsewhere_on_line() {
        let decos = decorate_with("- item", 5, decorate);
        assert_eq!(decos, vec![Decoration::widget(0, 2, Widget::Bullet)]);
    }

    #[test]
    fn test_bullet_revealed_when_cursor_on_marker() {
        let decos = decorate_with("- item", 1, decorate);
        assert_eq!(decos, vec![Decoration::mark(0, 2, "idz-marker")]);
    }

    #[test]
    fn test_task_item_widgets() {
        let decos = decorate_with("- [ ] Task", 9, decorate);
        assert_eq!(
            decos,
            vec![
                Decoration::widget(0, 2, Widget::Bullet),
                Decoration::widget(
                    2,
                    5,
                    Widget::Checkbox {
                        checked: false,
                        toggle_at: 3
                    }
                ),
            ]
        );
    }

    #[test]
    fn test_task_item_revealed_on_checkbox() {
        let decos = decorate_with("- [x] Done", 4, decorate);
        assert_eq!(decos, vec![Decoration::mark(0, 5, "idz-marker")]);
    }

    #[test]
    fn test_task_lists_disabled_falls_back_to_bullet() {
        let extensions = ExtensionSettings {
            task_lists: false,
            ..ExtensionSettings::default()
        };
        let decos = decorate_with_ext("- [ ] Task", 9, &extensions, decorate);
        assert_eq!(decos, vec![Decoration::widget(0, 2, Widget::Bullet)]);
    }

    #[test]
    fn test_ordered_marker() {
        let decos = decorate_with("1. one\n2. two", 12, decorate);
        assert_eq!(
            decos,
            vec![
                Decoration::mark(0, 3, "idz-ordered-marker"),
                Decoration::mark(7, 10, "idz-ordered-marker"),
            ]
        );
    }

    #[test]
    fn test_nested_items_each_get_a_bullet() {
        let decos = decorate_with("- a\n  - b", 3, decorate);
        assert_eq!(
            decos,
            vec![
                Decoration::widget(0, 2, Widget::Bullet),
                Decoration::widget(6, 8, Widget::Bullet),
            ]
        );
    }

    #[test]
    fn test_toggle_checkbox_changes_only_the_box() {
        let mut state = EditorState::new("- [ ] Task");
        assert!(toggle_checkbox(&mut state, 3));
        assert_eq!(state.get_content(), "- [x] Task");
        assert!(toggle_checkbox(&mut state, 3));
        assert_eq!(state.get_content(), "- [ ] Task");
    }

    #[test]
    fn test_toggle_checkbox_rejects_non_checkbox() {
        let mut state = EditorState::new("- plain");
        assert!(!toggle_checkbox(&mut state, 3));
        assert_eq!(state.dispatch_count(), 0);
    }
}
