//! Inline code spans and fenced code blocks
//!
//! Fenced blocks are styled with line decorations only, so nothing ever
//! spans a line break. `idz-code-first/middle/last` stitch the lines into
//! one visual block.

use super::cursor::{cursor_within_lines, intersects, last_line_of};
use super::decoration::{Decoration, DecorationContext};
use crate::document::Line;
use crate::markdown::grammar::{closes_fence, fence_open, quote_prefix};
use crate::markdown::highlight::highlight_lines;
use crate::markdown::{NodeKind, SyntaxNode, Walk};

const FENCE_HIDDEN: &str = "idz-fence-hidden";
const FENCE_OPEN: &str = "idz-fence-marker-line idz-code-first";
const FENCE_CLOSE: &str = "idz-fence-marker-line idz-code-last";
const CODE_MIDDLE: &str = "idz-code-line idz-code-middle";

pub fn decorate(ctx: &DecorationContext, from: usize, to: usize, out: &mut Vec<Decoration>) {
    ctx.tree.walk(from, to, |node| match node.kind {
        NodeKind::InlineCode => {
            decorate_inline(ctx, node, out);
            Walk::Skip
        }
        NodeKind::FencedCode => {
            decorate_fence(ctx, node, from, to, out);
            Walk::Skip
        }
        _ => Walk::Descend,
    });
}

// ─────────────────────────────────────────────────────────────────────────────
// Inline Code
// ─────────────────────────────────────────────────────────────────────────────

fn decorate_inline(ctx: &DecorationContext, node: &SyntaxNode, out: &mut Vec<Decoration>) {
    let text = ctx.doc.slice(node.from, node.to);
    let delim = text.bytes().take_while(|b| *b == b'`').count();
    if delim == 0 || text.len() < delim * 2 {
        return;
    }
    let open_to = node.from + delim;
    let close_from = node.to - delim;

    out.push(Decoration::mark(node.from, node.to, "idz-inline-code"));
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
}

// ─────────────────────────────────────────────────────────────────────────────
// Fenced Code
// ─────────────────────────────────────────────────────────────────────────────

fn decorate_fence(
    ctx: &DecorationContext,
    node: &SyntaxNode,
    from: usize,
    to: usize,
    out: &mut Vec<Decoration>,
) {
    let open = ctx.doc.line_at(node.from);
    // Fences inside quotes or list items start past the container prefix
    let column = node.from - open.from;
    let Some(fence) = open.text.get(column..).and_then(fence_open) else {
        return;
    };
    let quoted = column > 0 && quote_prefix(open.text).is_some();

    let last = last_line_of(ctx.doc, node.from, node.to);
    let (_, closing) = content_of(&ctx.doc.line(last), column, quoted);
    let closed = last > open.number && closes_fence(closing, &fence);
    let revealed = cursor_within_lines(ctx.doc, ctx.selection, node.from, node.to);

    let visible = |line: &Line| !(line.to < from || line.from > to);

    if !closed {
        // Never collapse a block that is still being typed. With the cursor
        // inside, the cursor's line acts as the closing line.
        let effective_last = if revealed {
            ctx.doc.line_at(ctx.selection.main().head).number.min(last)
        } else {
            last
        };
        for number in open.number..=effective_last {
            let line = ctx.doc.line(number);
            if !visible(&line) {
                continue;
            }
            let mut class = if number == open.number {
                FENCE_OPEN.to_string()
            } else {
                CODE_MIDDLE.to_string()
            };
            if number == effective_last {
                class.push_str(" idz-code-last");
            }
            out.push(Decoration::line(line.from, class));
        }
        return;
    }

    let first_content = open.number + 1;
    let last_content = last - 1;
    for number in open.number..=last {
        let line = ctx.doc.line(number);
        if !visible(&line) {
            continue;
        }
        let is_fence_line = number == open.number || number == last;
        let class = match (is_fence_line, revealed) {
            (true, false) => FENCE_HIDDEN.to_string(),
            (true, true) if number == open.number => FENCE_OPEN.to_string(),
            (true, true) => FENCE_CLOSE.to_string(),
            (false, true) => CODE_MIDDLE.to_string(),
            (false, false) => {
                let mut class = String::from("idz-code-line");
                if number == first_content {
                    class.push_str(" idz-code-first");
                }
                if number == last_content {
                    class.push_str(" idz-code-last");
                }
                if number != first_content && number != last_content {
                    class.push_str(" idz-code-middle");
                }
                class
            }
        };
        out.push(Decoration::line(line.from, class));
    }

    if ctx.extensions.syntax_highlighting && last_content >= first_content {
        if let Some(language) = fence.language.as_deref() {
            let lines: Vec<Line> = (first_content..=last_content)
                .map(|n| ctx.doc.line(n))
                .filter(|line| visible(line))
                .collect();
            if let Some(spans) = highlight_lines(language, lines.iter().map(|l| content_of(l, column, quoted))) {
                out.extend(
                    spans
                        .into_iter()
                        .map(|span| Decoration::mark(span.from, span.to, span.class)),
                );
            }
        }
    }
}

/// Byte offset of block content in `line`: past the quote markers for a
/// quoted fence, otherwise past at most `column` spaces of container indent.
fn content_offset(line: &str, column: usize, quoted: bool) -> usize {
    if quoted {
        return quote_prefix(line).map_or(0, str::len);
    }
    line.bytes().take(column).take_while(|b| *b == b' ').count()
}

/// A line's block content with its absolute start.
fn content_of<'a>(line: &Line<'a>, column: usize, quoted: bool) -> (usize, &'a str) {
    let offset = content_offset(line.text, column, quoted);
    (line.from + offset, &line.text[offset..])
}
