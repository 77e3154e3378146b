//! GitHub-style alerts (`> [!NOTE]`, `> [!WARNING]`, ...)
//!
//! An alert is a block quote whose first line carries a type marker. The
//! whole block takes the type's accent class. With the cursor away, the
//! marker line becomes a header widget and the `>` prefixes are hidden.

use super::cursor::{cursor_within_lines, last_line_of};
use super::decoration::{Decoration, DecorationContext, Widget};
use crate::markdown::grammar::{alert_marker, quote_marker, quote_prefix};
use crate::markdown::{NodeKind, Walk};

pub fn decorate(ctx: &DecorationContext, from: usize, to: usize, out: &mut Vec<Decoration>) {
    ctx.tree.walk(from, to, |node| {
        if node.kind.is_code() {
            return Walk::Skip;
        }
        if node.kind != NodeKind::Blockquote {
            return Walk::Descend;
        }
        let first = ctx.doc.line_at(node.from);
        let Some((kind, _)) = alert_marker(first.text) else {
            return Walk::Descend;
        };

        let revealed = cursor_within_lines(ctx.doc, ctx.selection, node.from, node.to);
        let line_class = format!("idz-alert-line {}", kind.class());
        let last = last_line_of(ctx.doc, node.from, node.to);

        for number in first.number..=last {
            let line = ctx.doc.line(number);
            if line.to < from || line.from > to {
                continue;
            }
            out.push(Decoration::line(line.from, line_class.clone()));

            if number == first.number {
                if revealed {
                    let marker_to = line.from + quote_marker(line.text).unwrap_or(0);
                    if marker_to > line.from {
                        out.push(Decoration::mark(line.from, marker_to, "idz-marker"));
                    }
                    out.push(Decoration::mark(marker_to, line.to, "idz-alert-type-syntax"));
                } else {
                    out.push(Decoration::widget(
                        line.from,
                        line.to,
                        Widget::AlertHeader { kind },
                    ));
                }
                continue;
            }

            let Some(prefix) = quote_prefix(line.text) else {
                continue;
            };
            let marker_to = line.from + prefix.len();
            if revealed {
                out.push(Decoration::mark(line.from, marker_to, "idz-marker"));
            } else {
                out.push(Decoration::hide(line.from, marker_to));
            }
        }
        Walk::Skip
    });
}
