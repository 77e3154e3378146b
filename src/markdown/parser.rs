//! Markdown parser adapter using comrak
//!
//! Turns comrak's AST into the engine's `SyntaxTree`, converting comrak's
//! 1-based line/column source positions into byte offsets. Inline nodes whose
//! reported span does not start with the expected delimiter are demoted to
//! `NodeKind::Other` so a bad position never hides the wrong text.

use comrak::{
    nodes::{AstNode, ListType as ComrakListType, NodeValue},
    parse_document, Arena, Options,
};
use log::debug;

use super::syntax_tree::{NodeKind, SyntaxNode, SyntaxTree};
use crate::config::ExtensionSettings;
use crate::document::Document;

// ─────────────────────────────────────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────────────────────────────────────

/// Comrak options matching the enabled markdown extensions.
fn to_comrak_options(extensions: &ExtensionSettings) -> Options {
    let mut options = Options::default();
    options.extension.table = extensions.tables;
    options.extension.tasklist = extensions.task_lists;
    options.extension.strikethrough = extensions.strikethrough;
    options.extension.footnotes = extensions.footnotes;
    options.extension.math_dollars = extensions.math;
    options.extension.autolink = false;
    options.extension.front_matter_delimiter = None;
    options
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing
// ─────────────────────────────────────────────────────────────────────────────

/// Parse `doc` into a syntax tree.
///
/// # Example
/// ```ignore
/// let doc = Document::new("# Title\n\nSome **bold** text");
/// let tree = parse_markdown(&doc, &ExtensionSettings::default());
/// assert!(!tree.find_all(NodeKind::StrongEmphasis, 0, doc.len()).is_empty());
/// ```
pub fn parse_markdown(doc: &Document, extensions: &ExtensionSettings) -> SyntaxTree {
    let arena = Arena::new();
    let options = to_comrak_options(extensions);
    let root = parse_document(&arena, doc.text(), &options);

    let roots = root
        .children()
        .flat_map(|child| convert_node(child, doc))
        .collect();
    SyntaxTree::new(roots)
}

/// Byte offset of a 1-based (line, column) position.
fn offset_of(doc: &Document, line: usize, column: usize) -> usize {
    let line = doc.line(line);
    (line.from + column.saturating_sub(1)).min(doc.len())
}

/// Convert one comrak node. Text runs and breaks are dropped; their parents
/// already cover their span.
fn convert_node<'a>(node: &'a AstNode<'a>, doc: &Document) -> Vec<SyntaxNode> {
    let ast = node.data.borrow();
    let pos = ast.sourcepos;

    let kind = match &ast.value {
        NodeValue::Text(_)
        | NodeValue::SoftBreak
        | NodeValue::LineBreak
        | NodeValue::FrontMatter(_) => return Vec::new(),
        value => kind_of(value),
    };

    let children: Vec<SyntaxNode> = node
        .children()
        .flat_map(|child| convert_node(child, doc))
        .collect();

    if pos.start.line == 0 {
        // No usable position: keep the children, drop the wrapper
        return children;
    }

    let from = offset_of(doc, pos.start.line, pos.start.column);
    let end = if pos.end.column == 0 {
        doc.line(pos.end.line).from
    } else {
        offset_of(doc, pos.end.line, pos.end.column) + 1
    };
    let to = end.clamp(from, doc.len());

    let kind = validate_inline_span(kind, doc.slice(from, to), from);
    vec![SyntaxNode::new(kind, from, to).with_children(children)]
}

fn kind_of(value: &NodeValue) -> NodeKind {
    match value {
        NodeValue::Heading(heading) if heading.setext => NodeKind::SetextHeading(heading.level),
        NodeValue::Heading(heading) => NodeKind::Heading(heading.level),
        NodeValue::Paragraph => NodeKind::Paragraph,
        NodeValue::Emph => NodeKind::Emphasis,
        NodeValue::Strong => NodeKind::StrongEmphasis,
        NodeValue::Strikethrough => NodeKind::Strikethrough,
        NodeValue::Code(_) => NodeKind::InlineCode,
        NodeValue::CodeBlock(block) if block.fenced => NodeKind::FencedCode,
        NodeValue::CodeBlock(_) => NodeKind::CodeBlock,
        NodeValue::Link(_) => NodeKind::Link,
        NodeValue::Image(_) => NodeKind::Image,
        NodeValue::List(list) => match list.list_type {
            ComrakListType::Bullet => NodeKind::BulletList,
            ComrakListType::Ordered => NodeKind::OrderedList,
        },
        NodeValue::Item(_) | NodeValue::TaskItem(_) => NodeKind::ListItem,
        NodeValue::BlockQuote => NodeKind::Blockquote,
        NodeValue::ThematicBreak => NodeKind::HorizontalRule,
        NodeValue::Table(_) => NodeKind::Table,
        NodeValue::TableRow(_) => NodeKind::TableRow,
        NodeValue::TableCell => NodeKind::TableCell,
        NodeValue::FootnoteReference(_) => NodeKind::FootnoteReference,
        NodeValue::FootnoteDefinition(_) => NodeKind::FootnoteDefinition,
        NodeValue::HtmlBlock(_) | NodeValue::HtmlInline(_) => NodeKind::Html,
        NodeValue::Math(_) => NodeKind::Math,
        _ => NodeKind::Other,
    }
}

/// Demote inline nodes whose span does not look like the construct.
fn validate_inline_span(kind: NodeKind, slice: &str, from: usize) -> NodeKind {
    let valid = match kind {
        NodeKind::Emphasis => slice.starts_with(['*', '_']) && slice.ends_with(['*', '_']),
        NodeKind::StrongEmphasis => {
            (slice.starts_with("**") && slice.ends_with("**"))
                || (slice.starts_with("__") && slice.ends_with("__"))
        }
        NodeKind::Strikethrough => slice.starts_with('~') && slice.ends_with('~'),
        NodeKind::InlineCode => slice.starts_with('`') && slice.ends_with('`'),
        NodeKind::Link => slice.starts_with('['),
        NodeKind::Image => slice.starts_with("!["),
        NodeKind::Math => slice.len() >= 2 && slice.starts_with('$') && slice.ends_with('$'),
        _ => true,
    };
    if valid {
        kind
    } else {
        debug!("Ignoring {:?} at {} with unexpected span {:?}", kind, from, slice);
        NodeKind::Other
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
