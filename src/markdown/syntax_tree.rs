//! Read-only syntax tree consumed by the decorators and commands
//!
//! Hosts either hand us comrak output (see `parser`) or a tree of string
//! tagged nodes from their own incremental parser. String tags are translated
//! into `NodeKind` once, at ingestion; nothing downstream looks at names.

use serde::Deserialize;

// ─────────────────────────────────────────────────────────────────────────────
// Node Kind
// ─────────────────────────────────────────────────────────────────────────────

/// Markdown construct kinds the engine cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// ATX heading with its level (1-6)
    Heading(u8),
    /// Setext heading (underlined with `===` or `---`)
    SetextHeading(u8),
    Paragraph,
    Emphasis,
    StrongEmphasis,
    Strikethrough,
    InlineCode,
    FencedCode,
    /// Indented code block
    CodeBlock,
    Link,
    Image,
    BulletList,
    OrderedList,
    ListItem,
    Blockquote,
    HorizontalRule,
    Table,
    TableRow,
    TableCell,
    FootnoteReference,
    FootnoteDefinition,
    Html,
    /// `$...$` or `$$...$$` math; the delimiter tells which
    Math,
    /// Anything else (text runs, breaks, unknown tags)
    Other,
}

impl NodeKind {
    /// Translate a wire-format tag from an external parser.
    pub fn from_tag(tag: &str) -> Self {
        if let Some(level) = tag
            .strip_prefix("ATXHeading")
            .or_else(|| tag.strip_prefix("Heading"))
            .and_then(parse_level)
        {
            return NodeKind::Heading(level);
        }
        if let Some(level) = tag.strip_prefix("SetextHeading").and_then(parse_level) {
            return NodeKind::SetextHeading(level);
        }
        match tag {
            "Paragraph" => NodeKind::Paragraph,
            "Emphasis" => NodeKind::Emphasis,
            "StrongEmphasis" => NodeKind::StrongEmphasis,
            "Strikethrough" => NodeKind::Strikethrough,
            "InlineCode" => NodeKind::InlineCode,
            "FencedCode" => NodeKind::FencedCode,
            "CodeBlock" => NodeKind::CodeBlock,
            "Link" => NodeKind::Link,
            "Image" => NodeKind::Image,
            "BulletList" => NodeKind::BulletList,
            "OrderedList" => NodeKind::OrderedList,
            "ListItem" => NodeKind::ListItem,
            "Blockquote" => NodeKind::Blockquote,
            "HorizontalRule" => NodeKind::HorizontalRule,
            "Table" => NodeKind::Table,
            "TableRow" | "TableHeader" => NodeKind::TableRow,
            "TableCell" => NodeKind::TableCell,
            "FootnoteReference" => NodeKind::FootnoteReference,
            "FootnoteDefinition" => NodeKind::FootnoteDefinition,
            "HTMLBlock" | "HTMLTag" | "HtmlBlock" | "HtmlInline" => NodeKind::Html,
            "InlineMath" | "BlockMath" | "DisplayMath" | "Math" => NodeKind::Math,
            _ => NodeKind::Other,
        }
    }

    /// Code regions never host other inline constructs.
    pub fn is_code(&self) -> bool {
        matches!(
            self,
            NodeKind::InlineCode | NodeKind::FencedCode | NodeKind::CodeBlock
        )
    }
}

fn parse_level(digits: &str) -> Option<u8> {
    match digits.parse::<u8>() {
        Ok(level @ 1..=6) => Some(level),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Nodes and Tree
// ─────────────────────────────────────────────────────────────────────────────

/// One parsed node covering `[from, to)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub from: usize,
    pub to: usize,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, from: usize, to: usize) -> Self {
        Self {
            kind,
            from,
            to,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<SyntaxNode>) -> Self {
        self.children = children;
        self
    }
}

/// Node as delivered by an external parser, before kind translation.
#[derive(Debug, Clone, Deserialize)]
pub struct TaggedNode {
    pub name: String,
    pub from: usize,
    pub to: usize,
    #[serde(default)]
    pub children: Vec<TaggedNode>,
}

impl TaggedNode {
    fn into_node(self) -> SyntaxNode {
        SyntaxNode {
            kind: NodeKind::from_tag(&self.name),
            from: self.from,
            to: self.to.max(self.from),
            children: self.children.into_iter().map(TaggedNode::into_node).collect(),
        }
    }
}

/// What a tree walk should do after visiting a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    Descend,
    Skip,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyntaxTree {
    roots: Vec<SyntaxNode>,
}

impl SyntaxTree {
    pub fn new(roots: Vec<SyntaxNode>) -> Self {
        Self { roots }
    }

    /// Build a tree from string-tagged nodes.
    pub fn from_tagged(nodes: Vec<TaggedNode>) -> Self {
        Self::new(nodes.into_iter().map(TaggedNode::into_node).collect())
    }

    pub fn roots(&self) -> &[SyntaxNode] {
        &self.roots
    }

    /// Pre-order walk over nodes touching `[from, to]`.
    ///
    /// Returning `Walk::Skip` from the visitor leaves that node's children
    /// unvisited.
    pub fn walk<F>(&self, from: usize, to: usize, mut visit: F)
    where
        F: FnMut(&SyntaxNode) -> Walk,
    {
        fn go<F: FnMut(&SyntaxNode) -> Walk>(
            nodes: &[SyntaxNode],
            from: usize,
            to: usize,
            visit: &mut F,
        ) {
            for node in nodes {
                if node.to < from || node.from > to {
                    continue;
                }
                if visit(node) == Walk::Descend {
                    go(&node.children, from, to, visit);
                }
            }
        }
        go(&self.roots, from, to, &mut visit);
    }

    /// All nodes of `kind` touching `[from, to]`, outermost first.
    pub fn find_all(&self, kind: NodeKind, from: usize, to: usize) -> Vec<&SyntaxNode> {
        let mut found = Vec::new();
        fn go<'a>(
            nodes: &'a [SyntaxNode],
            kind: NodeKind,
            from: usize,
            to: usize,
            found: &mut Vec<&'a SyntaxNode>,
        ) {
            for node in nodes {
                if node.to < from || node.from > to {
                    continue;
                }
                if node.kind == kind {
                    found.push(node);
                }
                go(&node.children, kind, from, to, found);
            }
        }
        go(&self.roots, kind, from, to, &mut found);
        found
    }

    /// Byte ranges of every code node (inline code, fences, indented blocks).
    pub fn code_ranges(&self) -> Vec<(usize, usize)> {
        let mut ranges = Vec::new();
        self.walk(0, usize::MAX, |node| {
            if node.kind.is_code() {
                ranges.push((node.from, node.to));
                Walk::Skip
            } else {
                Walk::Descend
            }
        });
        ranges
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
