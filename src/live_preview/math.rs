//! Inline `$...$` and display `$$...$$` math
//!
//! Math spans come from the parser's math nodes, so markdown inside them is
//! never styled. Collapsed math becomes a `Widget::Math`, which the host
//! renders through the math service. Display math that spans several lines
//! needs a block replacement, so it is only produced by `decorate_blocks`,
//! which always runs over the whole document.

use log::debug;

use super::cursor::intersects;
use super::decoration::{Decoration, DecorationContext, Widget};
use crate::document::Document;
use crate::markdown::{NodeKind, SyntaxNode, SyntaxTree, Walk};

/// One delimited math expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathSpan {
    pub from: usize,
    pub to: usize,
    pub latex: String,
    /// `$$` delimiters
    pub display: bool,
}

impl MathSpan {
    /// Read a math node's delimiters and content. Blank math yields `None`.
    pub fn from_node(doc: &Document, node: &SyntaxNode) -> Option<Self> {
        let text = doc.slice(node.from, node.to);
        let display = text.len() >= 4 && text.starts_with("$$") && text.ends_with("$$");
        let delim = if display { 2 } else { 1 };
        if text.len() < delim * 2 || !text.starts_with('$') || !text.ends_with('$') {
            debug!("Ignoring math node at {} with span {:?}", node.from, text);
            return None;
        }
        let latex = text[delim..text.len() - delim].trim();
        if latex.is_empty() {
            return None;
        }
        Some(Self {
            from: node.from,
            to: node.to,
            latex: latex.to_string(),
            display,
        })
    }

    fn delimiter_len(&self) -> usize {
        if self.display {
            2
        } else {
            1
        }
    }

    fn is_multiline(&self, doc: &Document) -> bool {
        doc.slice(self.from, self.to).contains('\n')
    }

    fn widget(&self) -> Widget {
        Widget::Math {
            latex: self.latex.clone(),
            display: self.display,
        }
    }
}

/// Math spans of every math node touching `[from, to]`, in document order.
pub fn find_math(doc: &Document, tree: &SyntaxTree, from: usize, to: usize) -> Vec<MathSpan> {
    let mut spans = Vec::new();
    tree.walk(from, to, |node| {
        if node.kind.is_code() {
            return Walk::Skip;
        }
        if node.kind != NodeKind::Math {
            return Walk::Descend;
        }
        spans.extend(MathSpan::from_node(doc, node));
        Walk::Skip
    });
    spans.sort_by_key(|span| span.from);
    spans
}

// ─────────────────────────────────────────────────────────────────────────────
// Decorating
// ─────────────────────────────────────────────────────────────────────────────

fn push_revealed(span: &MathSpan, out: &mut Vec<Decoration>) {
    let delim = span.delimiter_len();
    out.push(Decoration::mark(span.from, span.from + delim, "idz-math-syntax"));
    out.push(Decoration::mark(span.to - delim, span.to, "idz-math-syntax"));
}

/// Inline math and single-line display math within `[from, to]`.
pub fn decorate_inline(ctx: &DecorationContext, from: usize, to: usize, out: &mut Vec<Decoration>) {
    for span in find_math(ctx.doc, ctx.tree, from, to) {
        if span.is_multiline(ctx.doc) {
            continue;
        }
        if intersects(ctx.selection, span.from, span.to) {
            push_revealed(&span, out);
        } else {
            out.push(Decoration::widget(span.from, span.to, span.widget()));
        }
    }
}

/// Multi-line display math. Must only be fed from the whole-document path.
pub fn decorate_blocks(ctx: &DecorationContext, out: &mut Vec<Decoration>) {
    for span in find_math(ctx.doc, ctx.tree, 0, ctx.doc.len()) {
        if !span.is_multiline(ctx.doc) {
            continue;
        }
        let line_aligned = ctx.doc.line_at(span.from).from == span.from
            && ctx.doc.line_at(span.to).to == span.to;
        if intersects(ctx.selection, span.from, span.to) || !line_aligned {
            push_revealed(&span, out);
        } else {
            out.push(Decoration::block_widget(span.from, span.to, span.widget()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtensionSettings;
    use crate::live_preview::test_support::{context_for, decorate_with_ext, parse_with};

    fn math_on() -> ExtensionSettings {
        ExtensionSettings {
            math: true,
            ..ExtensionSettings::default()
        }
    }

    fn spans(text: &str) -> Vec<(usize, usize)> {
        let (doc, tree) = parse_with(text, &math_on());
        find_math(&doc, &tree, 0, doc.len())
            .iter()
            .map(|span| (span.from, span.to))
            .collect()
    }

    #[test]
    fn test_find_math_rules() {
        assert_eq!(spans("a $x^2$ b"), vec![(2, 7)]);
        assert_eq!(spans("cost \\$5 and $y$"), vec![(13, 16)]);
        assert!(spans("unclosed $x").is_empty());
        assert!(spans("plain text").is_empty());
    }

    #[test]
    fn test_math_content_is_not_markdown() {
        let (doc, tree) = parse_with("$a*b*c$ and $x$", &math_on());
        let found = find_math(&doc, &tree, 0, doc.len());
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].latex, "a*b*c");
        assert!(!found[0].display);
        assert_eq!(found[1].latex, "x");
    }

    #[test]
    fn test_math_disabled_finds_nothing() {
        let (doc, tree) = parse_with("a $x^2$ b", &ExtensionSettings::default());
        assert!(find_math(&doc, &tree, 0, doc.len()).is_empty());
    }

    #[test]
    fn test_inline_math_collapsed_and_revealed() {
        let text = "Euler $e^{i\\pi}$ here";
        let decos = decorate_with_ext(text, 0, &math_on(), decorate_inline);
        assert_eq!(
            decos,
            vec![Decoration::widget(
                6,
                16,
                Widget::Math {
                    latex: "e^{i\\pi}".into(),
                    display: false
                }
            )]
        );

        let decos = decorate_with_ext(text, 8, &math_on(), decorate_inline);
        assert_eq!(
            decos,
            vec![
                Decoration::mark(6, 7, "idz-math-syntax"),
                Decoration::mark(15, 16, "idz-math-syntax"),
            ]
        );
    }

    #[test]
    fn test_single_line_display_math_is_inline_replace() {
        let decos = decorate_with_ext("$$a + b$$", 20, &math_on(), decorate_inline);
        // Cursor clamps to the end, which touches the span
        assert_eq!(decos.len(), 2);

        let text = "$$a + b$$\n\nafter";
        let decos = decorate_with_ext(text, text.len(), &math_on(), decorate_inline);
        assert_eq!(
            decos,
            vec![Decoration::widget(
                0,
                9,
                Widget::Math {
                    latex: "a + b".into(),
                    display: true
                }
            )]
        );
    }

    #[test]
    fn test_multiline_block_math_only_from_block_path() {
        let text = "$$\n\\sum x\n$$\n\nafter";
        let decos = decorate_with_ext(text, text.len(), &math_on(), decorate_inline);
        assert!(decos.is_empty());

        let (doc, tree) = parse_with(text, &math_on());
        let ext = math_on();
        let selection = crate::editor::Selection::cursor(text.len());
        let ctx = context_for(&doc, &tree, &selection, &ext);
        let mut out = Vec::new();
        decorate_blocks(&ctx, &mut out);
        assert_eq!(
            out,
            vec![Decoration::block_widget(
                0,
                12,
                Widget::Math {
                    latex: "\\sum x".into(),
                    display: true
                }
            )]
        );
    }

    #[test]
    fn test_math_in_code_ignored() {
        let decos = decorate_with_ext("`$x$` and\n\n```\n$$y$$\n```", 0, &math_on(), decorate_inline);
        assert!(decos.is_empty());
    }

    #[test]
    fn test_tagged_math_node() {
        let doc = Document::new("see $$y$$");
        let tree = SyntaxTree::new(vec![SyntaxNode::new(NodeKind::Math, 4, 9)]);
        let found = find_math(&doc, &tree, 0, doc.len());
        assert_eq!(found.len(), 1);
        assert!(found[0].display);
        assert_eq!(found[0].latex, "y");
    }
}
