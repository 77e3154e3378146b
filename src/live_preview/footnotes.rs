//! Footnote references `[^id]` and definitions `[^id]: text`
//!
//! Footnotes are found with line patterns rather than tree nodes, since
//! external parsers disagree on whether they expose them. Matches inside
//! code are ignored.

use super::cursor::intersects;
use super::decoration::{Decoration, DecorationContext, Widget};
use crate::markdown::grammar::static_regex;

pub fn decorate(ctx: &DecorationContext, from: usize, to: usize, out: &mut Vec<Decoration>) {
    let code = ctx.tree.code_ranges();
    let in_code = |start: usize, end: usize| code.iter().any(|&(f, t)| start < t && end > f);

    for line in ctx.doc.lines_between(from, to) {
        if let Some(def) = static_regex!(r"^\[\^([^\]]+)\]:").find(line.text) {
            let (start, end) = (line.from + def.start(), line.from + def.end());
            if !in_code(start, end) {
                out.push(Decoration::mark(start, end, "idz-footnote-def"));
            }
        }

        for caps in static_regex!(r"\[\^([^\]]+)\]").captures_iter(line.text) {
            let (Some(whole), Some(label)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            // A trailing colon makes it a definition
            if line.text[whole.end()..].starts_with(':') {
                continue;
            }
            let (start, end) = (line.from + whole.start(), line.from + whole.end());
            if in_code(start, end) {
                continue;
            }
            if intersects(ctx.selection, start, end) {
                out.push(Decoration::mark(start, end, "idz-footnote-ref-syntax"));
            } else {
                out.push(Decoration::widget(
                    start,
                    end,
                    Widget::FootnoteRef {
                        label: label.as_str().to_string(),
                    },
                ));
            }
        }
    }
}
