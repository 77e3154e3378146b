//! Decoration composer
//!
//! Runs every enabled construct against one snapshot, merges the results,
//! sorts them by `(from, side)` and enforces that no two `Replace`
//! instructions overlap. Tables are cached per document revision since the
//! selection never changes how they render.

use std::ops::Range;

use log::{trace, warn};

use super::decoration::{find_replace_overlap, sort_decorations, Decoration, DecorationContext};
use super::{
    alerts, blockquotes, code, emphasis, footnotes, headings, horizontal_rules, links, lists, math,
};
use crate::config::{DecorationSettings, ExtensionSettings};
use crate::table;

// ─────────────────────────────────────────────────────────────────────────────
// Constructs
// ─────────────────────────────────────────────────────────────────────────────

/// Every decorated markdown construct, in the order the composer runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construct {
    Headings,
    Emphasis,
    Code,
    Links,
    Lists,
    Blockquotes,
    Alerts,
    HorizontalRules,
    Footnotes,
    Math,
    Tables,
}

impl Construct {
    pub const ALL: [Construct; 11] = [
        Construct::Headings,
        Construct::Emphasis,
        Construct::Code,
        Construct::Links,
        Construct::Lists,
        Construct::Blockquotes,
        Construct::Alerts,
        Construct::HorizontalRules,
        Construct::Footnotes,
        Construct::Math,
        Construct::Tables,
    ];

    pub fn enabled(self, extensions: &ExtensionSettings) -> bool {
        match self {
            Construct::Alerts => extensions.alerts,
            Construct::Footnotes => extensions.footnotes,
            Construct::Math => extensions.math,
            Construct::Tables => extensions.tables,
            Construct::Headings
            | Construct::Emphasis
            | Construct::Code
            | Construct::Links
            | Construct::Lists
            | Construct::Blockquotes
            | Construct::HorizontalRules => true,
        }
    }

    /// Whether scanning only the visible range gives the same result on
    /// screen. Tables need the whole document for their block widgets.
    pub fn viewport_safe(self) -> bool {
        !matches!(self, Construct::Tables)
    }

    /// Decorate `[from, to]`. Block-level output (tables, multi-line math)
    /// always comes from a whole-document scan regardless of the range.
    fn run(self, ctx: &DecorationContext, from: usize, to: usize, out: &mut Vec<Decoration>) {
        match self {
            Construct::Headings => headings::decorate(ctx, from, to, out),
            Construct::Emphasis => emphasis::decorate(ctx, from, to, out),
            Construct::Code => code::decorate(ctx, from, to, out),
            Construct::Links => links::decorate(ctx, from, to, out),
            Construct::Lists => lists::decorate(ctx, from, to, out),
            Construct::Blockquotes => blockquotes::decorate(ctx, from, to, out),
            Construct::Alerts => alerts::decorate(ctx, from, to, out),
            Construct::HorizontalRules => horizontal_rules::decorate(ctx, from, to, out),
            Construct::Footnotes => footnotes::decorate(ctx, from, to, out),
            Construct::Math => {
                math::decorate_inline(ctx, from, to, out);
                math::decorate_blocks(ctx, out);
            }
            Construct::Tables => table::decorate(ctx, out),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Composition
// ─────────────────────────────────────────────────────────────────────────────

fn scan_range(
    construct: Construct,
    ctx: &DecorationContext,
    visible: &Range<usize>,
    policy: &DecorationSettings,
) -> (usize, usize) {
    if policy.viewport_limited && construct.viewport_safe() {
        let len = ctx.doc.len();
        (visible.start.min(len), visible.end.min(len))
    } else {
        (0, ctx.doc.len())
    }
}

/// Drop everything a widget already renders, then drop any `Replace` that
/// still overlaps an earlier one. Input must be sorted.
///
/// A block widget owns every decoration inside it, line styles included.
/// An inline widget owns the marks and replacements inside its range but
/// not the line styles of the line it sits on.
fn finalize(mut decorations: Vec<Decoration>) -> Vec<Decoration> {
    let hosts: Vec<(usize, usize, usize, bool)> = decorations
        .iter()
        .enumerate()
        .filter(|(_, d)| d.widget_ref().is_some() && d.to() > d.from())
        .map(|(i, d)| (i, d.from(), d.to(), d.is_block()))
        .collect();
    if !hosts.is_empty() {
        let mut index = 0;
        decorations.retain(|d| {
            let i = index;
            index += 1;
            let owner = hosts.iter().find(|&&(host, from, to, block)| {
                let contained = d.from() >= from && d.to() <= to && d.from() < to;
                // Two widgets on the same range: the earlier one wins
                let same = d.from() == from && d.to() == to;
                host != i
                    && contained
                    && (!same || d.widget_ref().is_none() || host < i)
                    && (block || (!matches!(d, Decoration::Line { .. }) && d.to() > from))
            });
            match owner {
                Some(&(_, _, _, true)) => false,
                Some(_) => {
                    trace!("Dropping {} inside an inline widget", d);
                    false
                }
                None => true,
            }
        });
    }

    while let Some((kept, dropped)) = find_replace_overlap(&decorations) {
        warn!(
            "Dropping overlapping replacement {} (overlaps {})",
            decorations[dropped], decorations[kept]
        );
        decorations.remove(dropped);
    }
    decorations
}

fn summarize(decorations: &[Decoration]) {
    let replaces = decorations.iter().filter(|d| d.is_replace()).count();
    let lines = decorations
        .iter()
        .filter(|d| matches!(d, Decoration::Line { .. }))
        .count();
    trace!(
        "Composed {} decorations ({} replace, {} line, {} mark)",
        decorations.len(),
        replaces,
        lines,
        decorations.len() - replaces - lines
    );
}

/// One full decoration pass. A pure function of its inputs.
pub fn compose(
    ctx: &DecorationContext,
    visible: Range<usize>,
    policy: &DecorationSettings,
) -> Vec<Decoration> {
    let mut out = Vec::new();
    for construct in Construct::ALL {
        if !construct.enabled(ctx.extensions) {
            continue;
        }
        let (from, to) = scan_range(construct, ctx, &visible, policy);
        construct.run(ctx, from, to, &mut out);
    }
    sort_decorations(&mut out);
    let out = finalize(out);
    summarize(&out);
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Cached Composer
// ─────────────────────────────────────────────────────────────────────────────

/// Composer that reuses table widgets while the document is unchanged.
///
/// Selection and viewport changes rebuild everything else; only a new
/// document revision rebuilds tables.
#[derive(Debug, Default)]
pub struct LivePreview {
    tables: Option<(u64, Vec<Decoration>)>,
}

impl LivePreview {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget cached tables, e.g. after the extension settings changed.
    pub fn invalidate(&mut self) {
        self.tables = None;
    }

    pub fn decorations(
        &mut self,
        ctx: &DecorationContext,
        revision: u64,
        visible: Range<usize>,
        policy: &DecorationSettings,
    ) -> Vec<Decoration> {
        let mut out = Vec::new();
        for construct in Construct::ALL {
            if !construct.enabled(ctx.extensions) {
                continue;
            }
            if construct == Construct::Tables {
                out.extend(self.tables_for(ctx, revision).iter().cloned());
                continue;
            }
            let (from, to) = scan_range(construct, ctx, &visible, policy);
            construct.run(ctx, from, to, &mut out);
        }
        sort_decorations(&mut out);
        let out = finalize(out);
        summarize(&out);
        out
    }

    fn tables_for(&mut self, ctx: &DecorationContext, revision: u64) -> &[Decoration] {
        let fresh = matches!(&self.tables, Some((cached, _)) if *cached == revision);
        if !fresh {
            let mut tables = Vec::new();
            Construct::Tables.run(ctx, 0, ctx.doc.len(), &mut tables);
            trace!("Rebuilt {} table widget(s) for revision {}", tables.len(), revision);
            self.tables = Some((revision, tables));
        }
        self.tables.as_ref().map(|(_, t)| t.as_slice()).unwrap_or(&[])
    }
}
