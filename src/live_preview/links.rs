//! Inline links `[text](url)` and images `![alt](src)`

use super::cursor::intersects;
use super::decoration::{Decoration, DecorationContext, Widget};
use crate::document::Document;
use crate::markdown::grammar::static_regex;
use crate::markdown::{NodeKind, SyntaxTree, Walk};

/// Link text span (relative) and destination of a raw `[text](url)`.
fn parse_link(raw: &str) -> Option<(usize, usize, &str)> {
    let caps = static_regex!(r"^\[([^\]]*)\]\(([^)]+)\)$").captures(raw)?;
    let text = caps.get(1)?;
    let url = caps.get(2)?.as_str().split_whitespace().next()?;
    Some((text.start(), text.end(), url))
}

/// Alt text and source of a raw `![alt](src "title")`.
fn parse_image(raw: &str) -> Option<(&str, &str)> {
    let caps = static_regex!(r"^!\[([^\]]*)\]\(([^)]+)\)$").captures(raw)?;
    let alt = caps.get(1)?.as_str();
    let src = caps.get(2)?.as_str().split_whitespace().next()?;
    Some((alt, src))
}

pub fn decorate(ctx: &DecorationContext, from: usize, to: usize, out: &mut Vec<Decoration>) {
    ctx.tree.walk(from, to, |node| {
        match node.kind {
            NodeKind::Image => {
                let raw = ctx.doc.slice(node.from, node.to);
                if intersects(ctx.selection, node.from, node.to) {
                    out.push(Decoration::mark(node.from, node.to, "idz-image-syntax"));
                } else if let Some((alt, src)) = parse_image(raw).filter(|_| !raw.contains('\n')) {
                    let widget = Widget::Image {
                        src: src.to_string(),
                        alt: alt.to_string(),
                    };
                    out.push(Decoration::widget(node.from, node.to, widget));
                }
                Walk::Skip
            }
            NodeKind::Link => {
                let raw = ctx.doc.slice(node.from, node.to);
                let Some((text_from, text_to, _)) = parse_link(raw) else {
                    // Reference links and autolinks keep their raw text
                    return Walk::Descend;
                };
                if intersects(ctx.selection, node.from, node.to) {
                    out.push(Decoration::mark(node.from, node.to, "idz-link-syntax"));
                } else if !raw.contains('\n') {
                    out.push(Decoration::hide(node.from, node.from + 1));
                    out.push(Decoration::mark(
                        node.from + text_from,
                        node.from + text_to,
                        "idz-link",
                    ));
                    out.push(Decoration::hide(node.from + text_to, node.to));
                }
                Walk::Skip
            }
            NodeKind::InlineCode | NodeKind::FencedCode | NodeKind::CodeBlock => Walk::Skip,
            _ => Walk::Descend,
        }
    });
}

/// Destination of the link under `pos`, for click-to-open.
pub fn link_target_at(doc: &Document, tree: &SyntaxTree, pos: usize) -> Option<String> {
    tree.find_all(NodeKind::Link, pos, pos)
        .into_iter()
        .rev()
        .filter(|node| node.from <= pos && pos <= node.to)
        .find_map(|node| parse_link(doc.slice(node.from, node.to)).map(|(_, _, url)| url.to_string()))
}
