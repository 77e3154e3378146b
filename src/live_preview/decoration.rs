//! Decoration instructions handed to the host view
//!
//! Three kinds exist: `Mark` styles a span, `Replace` hides a span (with an
//! optional widget in its place), and `Line` styles a whole line. A pass
//! produces them in any order; `sort_decorations` puts them in the order the
//! host expects.

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

use crate::config::ExtensionSettings;
use crate::document::Document;
use crate::editor::Selection;
use crate::markdown::grammar::AlertKind;
use crate::markdown::SyntaxTree;
use crate::table::TableData;

/// Snapshot every decorator reads from. Decorators are pure functions of it.
#[derive(Clone, Copy)]
pub struct DecorationContext<'a> {
    pub doc: &'a Document,
    pub tree: &'a SyntaxTree,
    pub selection: &'a Selection,
    pub extensions: &'a ExtensionSettings,
}

// ─────────────────────────────────────────────────────────────────────────────
// Widgets
// ─────────────────────────────────────────────────────────────────────────────

/// Rendered element substituted for collapsed markdown source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Widget {
    Image { src: String, alt: String },
    Bullet,
    /// Task checkbox; `toggle_at` is the offset of the character between
    /// the brackets.
    Checkbox { checked: bool, toggle_at: usize },
    AlertHeader { kind: AlertKind },
    FootnoteRef { label: String },
    /// Math expression, rendered asynchronously by the math service
    Math { latex: String, display: bool },
    /// Structural table editor, keyed by the block's start offset
    Table(TableWidget),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableWidget {
    pub key: usize,
    pub data: TableData,
}

impl Widget {
    /// CSS class of the widget's root element.
    pub fn class(&self) -> String {
        match self {
            Widget::Image { .. } => "idz-image".to_string(),
            Widget::Bullet => "idz-bullet".to_string(),
            Widget::Checkbox { checked: true, .. } => "idz-checkbox idz-checkbox-checked".to_string(),
            Widget::Checkbox { checked: false, .. } => "idz-checkbox".to_string(),
            Widget::AlertHeader { kind } => {
                format!("idz-alert-header idz-alert-header-{}", kind.tag().to_lowercase())
            }
            Widget::FootnoteRef { .. } => "idz-footnote-ref".to_string(),
            Widget::Math { display: true, .. } => "idz-math-block".to_string(),
            Widget::Math { display: false, .. } => "idz-math-inline".to_string(),
            Widget::Table(_) => "idz-table-widget".to_string(),
        }
    }

    /// Visible text of simple widgets, used by text-mode renderers.
    pub fn text(&self) -> String {
        match self {
            Widget::Image { alt, .. } => alt.clone(),
            Widget::Bullet => "\u{2022}".to_string(),
            Widget::Checkbox { checked, .. } => {
                if *checked { "\u{2611}" } else { "\u{2610}" }.to_string()
            }
            Widget::AlertHeader { kind } => format!("{} {}", kind.icon(), kind.label()),
            Widget::FootnoteRef { label } => label.clone(),
            Widget::Math { latex, .. } => latex.clone(),
            Widget::Table(table) => format!(
                "table {}x{}",
                table.data.headers.len(),
                table.data.rows.len() + 1
            ),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Decoration
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Decoration {
    Mark {
        from: usize,
        to: usize,
        class: String,
    },
    Replace {
        from: usize,
        to: usize,
        widget: Option<Widget>,
        /// May span line breaks; only produced by whole-document passes
        block: bool,
    },
    Line {
        line_start: usize,
        class: String,
    },
}

impl Decoration {
    pub fn mark(from: usize, to: usize, class: impl Into<String>) -> Self {
        Decoration::Mark {
            from,
            to,
            class: class.into(),
        }
    }

    /// Hide `[from, to)` without a replacement element.
    pub fn hide(from: usize, to: usize) -> Self {
        Decoration::Replace {
            from,
            to,
            widget: None,
            block: false,
        }
    }

    pub fn widget(from: usize, to: usize, widget: Widget) -> Self {
        Decoration::Replace {
            from,
            to,
            widget: Some(widget),
            block: false,
        }
    }

    pub fn block_widget(from: usize, to: usize, widget: Widget) -> Self {
        Decoration::Replace {
            from,
            to,
            widget: Some(widget),
            block: true,
        }
    }

    pub fn line(line_start: usize, class: impl Into<String>) -> Self {
        Decoration::Line {
            line_start,
            class: class.into(),
        }
    }

    pub fn from(&self) -> usize {
        match self {
            Decoration::Mark { from, .. } | Decoration::Replace { from, .. } => *from,
            Decoration::Line { line_start, .. } => *line_start,
        }
    }

    pub fn to(&self) -> usize {
        match self {
            Decoration::Mark { to, .. } | Decoration::Replace { to, .. } => *to,
            Decoration::Line { line_start, .. } => *line_start,
        }
    }

    /// Tie-break at equal `from`: line styles first, then block widgets,
    /// then inline replacements, then marks.
    pub fn side(&self) -> i8 {
        match self {
            Decoration::Line { .. } => -3,
            Decoration::Replace { block: true, .. } => -2,
            Decoration::Replace { .. } => -1,
            Decoration::Mark { .. } => 0,
        }
    }

    pub fn is_replace(&self) -> bool {
        matches!(self, Decoration::Replace { .. })
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Decoration::Replace { block: true, .. })
    }

    pub fn class(&self) -> Option<&str> {
        match self {
            Decoration::Mark { class, .. } | Decoration::Line { class, .. } => Some(class),
            Decoration::Replace { .. } => None,
        }
    }

    pub fn widget_ref(&self) -> Option<&Widget> {
        match self {
            Decoration::Replace { widget, .. } => widget.as_ref(),
            _ => None,
        }
    }
}

impl fmt::Display for Decoration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decoration::Mark { from, to, class } => write!(f, "mark    {}..{} {}", from, to, class),
            Decoration::Replace {
                from,
                to,
                widget,
                block,
            } => {
                let kind = if *block { "block  " } else { "replace" };
                match widget {
                    Some(w) => write!(f, "{} {}..{} <{}> {}", kind, from, to, w.class(), w.text()),
                    None => write!(f, "{} {}..{}", kind, from, to),
                }
            }
            Decoration::Line { line_start, class } => {
                write!(f, "line    {} {}", line_start, class)
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Ordering and Validation
// ─────────────────────────────────────────────────────────────────────────────

/// Stable sort by `(from, side)`. Equal keys keep their production order,
/// which keeps repeated passes byte-identical.
pub fn sort_decorations(decorations: &mut [Decoration]) {
    decorations.sort_by(|a, b| match a.from().cmp(&b.from()) {
        Ordering::Equal => a.side().cmp(&b.side()),
        other => other,
    });
}

/// First pair of overlapping `Replace` instructions in a sorted list, as
/// indices into `decorations`.
pub fn find_replace_overlap(decorations: &[Decoration]) -> Option<(usize, usize)> {
    let mut last: Option<(usize, usize)> = None; // (index, to)
    for (i, deco) in decorations.iter().enumerate() {
        if !deco.is_replace() {
            continue;
        }
        if let Some((prev, prev_to)) = last {
            if deco.from() < prev_to {
                return Some((prev, i));
            }
        }
        if last.map(|(_, to)| deco.to() > to).unwrap_or(true) {
            last = Some((i, deco.to()));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_by_from_then_side() {
        let mut decos = vec![
            Decoration::mark(4, 8, "idz-bold"),
            Decoration::hide(4, 6),
            Decoration::line(0, "idz-blockquote-line"),
            Decoration::mark(0, 2, "idz-marker"),
        ];
        sort_decorations(&mut decos);
        assert!(matches!(decos[0], Decoration::Line { .. }));
        assert!(matches!(decos[1], Decoration::Mark { from: 0, .. }));
        assert!(matches!(decos[2], Decoration::Replace { from: 4, .. }));
        assert!(matches!(decos[3], Decoration::Mark { from: 4, .. }));
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let mut decos = vec![
            Decoration::mark(3, 5, "first"),
            Decoration::mark(3, 9, "second"),
        ];
        sort_decorations(&mut decos);
        assert_eq!(decos[0].class(), Some("first"));
        assert_eq!(decos[1].class(), Some("second"));
    }

    #[test]
    fn test_find_replace_overlap() {
        let ok = vec![Decoration::hide(0, 2), Decoration::hide(2, 4), Decoration::mark(1, 3, "x")];
        assert_eq!(find_replace_overlap(&ok), None);

        let bad = vec![Decoration::hide(0, 3), Decoration::mark(1, 2, "x"), Decoration::hide(2, 4)];
        assert_eq!(find_replace_overlap(&bad), Some((0, 2)));
    }

    #[test]
    fn test_widget_classes() {
        assert_eq!(
            Widget::AlertHeader {
                kind: AlertKind::Warning
            }
            .class(),
            "idz-alert-header idz-alert-header-warning"
        );
        assert_eq!(
            Widget::Math {
                latex: "x".into(),
                display: false
            }
            .class(),
            "idz-math-inline"
        );
    }

    #[test]
    fn test_display_format() {
        assert_eq!(Decoration::hide(1, 3).to_string(), "replace 1..3");
        assert_eq!(
            Decoration::mark(0, 4, "idz-bold").to_string(),
            "mark    0..4 idz-bold"
        );
    }
}
