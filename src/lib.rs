//! livemark - live-preview decorations for markdown editors
//!
//! Given a document, its syntax tree and the current selection, the engine
//! produces the marks, replacements and line classes that make raw markdown
//! look rendered, while revealing the source of whatever the cursor touches.
//! Structural commands (formatting, inserts, table edits) act on the same
//! host through transactions.

pub mod commands;
pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod live_preview;
pub mod markdown;
pub mod table;
pub mod ui;

pub use config::Settings;
pub use document::Document;
pub use editor::{EditorEvent, EditorHost, EditorState, Selection, SelectionRange, Transaction};
pub use error::{Error, Result};
pub use live_preview::{Decoration, Widget};
