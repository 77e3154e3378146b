//! Bold, italic, bold-italic and strikethrough spans
//!
//! Content is always styled. Delimiters are hidden while the selection is
//! away from the span and shown as markers when it touches it.

use super::cursor::intersects;
use super::decoration::{Decoration, DecorationContext};
use crate::markdown::{NodeKind, SyntaxNode, Walk};

/// Delimiter length and style class for an emphasis-like node.
fn delimiter_of(node: &SyntaxNode, text: &str) -> Option<(usize, &'static str)> {
    let both_ends = |run: &str| text.starts_with(run) && text.ends_with(run);
    match node.kind {
        NodeKind::Emphasis | NodeKind::StrongEmphasis if both_ends("***") || both_ends("___") => {
            Some((3, "idz-bold-italic"))
        }
        NodeKind::StrongEmphasis => Some((2, "idz-bold")),
        NodeKind::Emphasis => Some((1, "idz-italic")),
        NodeKind::Strikethrough => {
            let open = text.chars().take_while(|c| *c == '~').count();
            let close = text.chars().rev().take_while(|c| *c == '~').count();
            Some((open.min(close), "idz-strikethrough"))
        }
        _ => None,
    }
}

pub fn decorate(ctx: &DecorationContext, from: usize, to: usize, out: &mut Vec<Decoration>) {
    ctx.tree.walk(from, to, |node| {
        if node.kind.is_code() || node.kind == NodeKind::Math {
            return Walk::Skip;
        }
        let text = ctx.doc.slice(node.from, node.to);
        let Some((delim, class)) = delimiter_of(node, text) else {
            return Walk::Descend;
        };
        if delim == 0 || text.len() < delim * 2 {
            // Not a well-formed span; leave the raw text alone
            return Walk::Descend;
        }

        let open_to = node.from + delim;
        let close_from = node.to - delim;

        out.push(Decoration::mark(node.from, node.to, class));
        if intersects(ctx.selection, node.from, node.to) {
            out.push(Decoration::mark(node.from, open_to, "idz-marker"));
            if close_from > open_to {
                out.push(Decoration::mark(close_from, node.to, "idz-marker"));
            }
        } else {
            out.push(Decoration::hide(node.from, open_to));
            if close_from > open_to {
                out.push(Decoration::hide(close_from, node.to));
            }
        }

        // `***x***` nests a strong node inside the emphasis; its delimiters
        // are already covered.
        if delim == 3 {
            Walk::Skip
        } else {
            Walk::Descend
        }
    });
}
