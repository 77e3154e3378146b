//! Editor events queued for the embedding application.

use serde::Serialize;

/// Notifications an `EditorState` records while handling transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum EditorEvent {
    /// Document text changed; carries the full new content
    Change { content: String },
    /// Main selection moved
    SelectionChange { from: usize, to: usize, text: String },
    /// Save requested (Mod-s)
    Save { content: String },
    Focus,
    Blur,
}
