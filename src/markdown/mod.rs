//! Markdown parsing and syntax detection module
//!
//! This module provides everything the live preview reads about markdown
//! source, backed by comrak (a CommonMark + GFM compatible parser) and
//! syntect.
//!
//! # Features
//! - Parse markdown into a byte-offset `SyntaxTree`
//! - Ingest trees from external parsers through string tags
//! - Line-level grammar shared by decorators and commands
//! - Token highlighting for fenced code blocks
//!
//! # Example
//! ```ignore
//! use crate::markdown::{parse_markdown, NodeKind};
//!
//! let doc = Document::new("# Hello\n\nThis is **bold** text.");
//! let tree = parse_markdown(&doc, &ExtensionSettings::default());
//! let bold = tree.find_all(NodeKind::StrongEmphasis, 0, doc.len());
//! ```

pub mod grammar;
pub mod highlight;
mod parser;
mod syntax_tree;

pub use highlight::{get_highlighter, SyntaxHighlighter, TokenSpan};
pub use parser::parse_markdown;
pub use syntax_tree::{NodeKind, SyntaxNode, SyntaxTree, TaggedNode, Walk};
