//! Editor module for livemark
//!
//! The host contract the engine runs against (`EditorHost`), the reference
//! in-memory host (`EditorState`), and the editing behaviours that sit on
//! top of it: key bindings, drag and drop, and text statistics.

pub mod drop;
mod events;
pub mod keymap;
mod selection;
mod state;
mod stats;
mod transaction;

pub use events::EditorEvent;
pub use selection::{Selection, SelectionRange};
pub use state::EditorState;
pub use stats::{char_count, word_count, TextStats};
pub use transaction::{Assoc, TextChange, Transaction};

use std::ops::Range;

use crate::config::Settings;
use crate::document::Document;
use crate::markdown::SyntaxTree;
use crate::ui::UiServices;

// ─────────────────────────────────────────────────────────────────────────────
// Host Contract
// ─────────────────────────────────────────────────────────────────────────────

/// What the engine needs from the text-editing surface it is embedded in.
///
/// The host owns the document, re-parses it after every change, and applies
/// submitted transactions atomically. Commands receive a `&mut` host and
/// report whether they handled the request.
pub trait EditorHost {
    fn document(&self) -> &Document;

    /// Syntax tree for the current document revision.
    fn syntax_tree(&self) -> &SyntaxTree;

    fn selection(&self) -> &Selection;

    /// Byte range currently on screen. Defaults to the whole document.
    fn visible_range(&self) -> Range<usize> {
        0..self.document().len()
    }

    fn settings(&self) -> &Settings;

    fn services(&self) -> &UiServices;

    /// Apply a transaction. Positions refer to the current document.
    fn dispatch(&mut self, tx: Transaction);

    /// Forward a notification to whoever embeds the editor.
    fn emit(&mut self, _event: EditorEvent) {}
}
