//! Thematic breaks (`---`, `***`, `___`)
//!
//! The rule is drawn by the line style, so nothing is replaced.

use super::cursor::cursor_within_lines;
use super::decoration::{Decoration, DecorationContext};
use crate::markdown::{NodeKind, Walk};

pub fn decorate(ctx: &DecorationContext, from: usize, to: usize, out: &mut Vec<Decoration>) {
    ctx.tree.walk(from, to, |node| {
        if node.kind != NodeKind::HorizontalRule {
            return if node.kind.is_code() {
                Walk::Skip
            } else {
                Walk::Descend
            };
        }
        let line = ctx.doc.line_at(node.from);
        if cursor_within_lines(ctx.doc, ctx.selection, node.from, node.to) {
            out.push(Decoration::mark(node.from, node.to.min(line.to), "idz-hr-syntax"));
        } else {
            out.push(Decoration::line(line.from, "idz-hr-line"));
        }
        Walk::Skip
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live_preview::test_support::decorate_with;

    #[test]
    fn test_rule_collapsed() {
        let decos = decorate_with("a\n\n---\n\nb", 0, decorate);
        assert_eq!(decos, vec![Decoration::line(3, "idz-hr-line")]);
    }

    #[test]
    fn test_rule_revealed() {
        let decos = decorate_with("a\n\n***\n\nb", 4, decorate);
        assert_eq!(decos, vec![Decoration::mark(3, 6, "idz-hr-syntax")]);
    }

    #[test]
    fn test_setext_underline_is_not_a_rule() {
        assert!(decorate_with("Title\n---\n", 0, decorate).is_empty());
    }
}
