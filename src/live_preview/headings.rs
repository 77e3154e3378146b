//! ATX headings (`#` through `######`)
//!
//! The heading span always carries its level class. The `# ` marker is
//! hidden unless the cursor is on the heading's line.

use super::cursor::cursor_within_lines;
use super::decoration::{Decoration, DecorationContext};
use crate::markdown::grammar::heading_marker;
use crate::markdown::{NodeKind, Walk};

pub fn decorate(ctx: &DecorationContext, from: usize, to: usize, out: &mut Vec<Decoration>) {
    ctx.tree.walk(from, to, |node| {
        let NodeKind::Heading(level) = node.kind else {
            return Walk::Descend;
        };

        let line = ctx.doc.line_at(node.from);
        let Some((_, marker_len)) = heading_marker(line.text) else {
            return Walk::Skip;
        };
        let marker_to = (line.from + marker_len).min(node.to);

        out.push(Decoration::mark(node.from, node.to, format!("idz-h{}", level)));
        if cursor_within_lines(ctx.doc, ctx.selection, node.from, node.to) {
            out.push(Decoration::mark(line.from, marker_to, "idz-heading-marker"));
        } else {
            out.push(Decoration::hide(line.from, marker_to));
        }
        Walk::Skip
    });
}
