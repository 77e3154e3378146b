//! Block quotes
//!
//! Every quoted line gets a line style. The `>` prefix is hidden unless the
//! cursor is on one of the block's lines. Quotes whose first line is an
//! alert marker belong to the alerts decorator.

use super::cursor::{cursor_within_lines, last_line_of};
use super::decoration::{Decoration, DecorationContext};
use crate::markdown::grammar::{alert_marker, quote_prefix};
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
        if ctx.extensions.alerts && alert_marker(first.text).is_some() {
            return Walk::Skip;
        }

        let revealed = cursor_within_lines(ctx.doc, ctx.selection, node.from, node.to);
        let last = last_line_of(ctx.doc, node.from, node.to);
        for number in first.number..=last {
            let line = ctx.doc.line(number);
            if line.to < from || line.from > to {
                continue;
            }
            // Lazy continuation lines have no prefix and no quote styling
            let Some(prefix) = quote_prefix(line.text) else {
                continue;
            };
            let marker_to = line.from + prefix.len();
            out.push(Decoration::line(line.from, "idz-blockquote-line"));
            if revealed {
                out.push(Decoration::mark(line.from, marker_to, "idz-marker"));
            } else {
                out.push(Decoration::hide(line.from, marker_to));
            }
        }
        Walk::Skip
    });
}
