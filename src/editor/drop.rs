//! Drag and drop
//!
//! Dropped markdown and text files are inserted verbatim; dropped images are
//! embedded as `![name](data:<mime>;base64,...)`. Anything else is ignored.

use std::fs;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use log::{debug, warn};

use crate::editor::{EditorHost, Selection, Transaction};
use crate::error::{Error, Result};

/// How a dropped file is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropKind {
    Text,
    Image { mime: &'static str },
    Unsupported,
}

impl DropKind {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "md" | "markdown" | "txt" => DropKind::Text,
            "png" => DropKind::Image { mime: "image/png" },
            "jpg" | "jpeg" => DropKind::Image { mime: "image/jpeg" },
            "gif" => DropKind::Image { mime: "image/gif" },
            "webp" => DropKind::Image { mime: "image/webp" },
            "svg" => DropKind::Image {
                mime: "image/svg+xml",
            },
            _ => DropKind::Unsupported,
        }
    }
}

/// Markdown to insert for one dropped file. `Ok(None)` for unsupported
/// files.
pub fn insertion_for(path: &Path) -> Result<Option<String>> {
    let read_err = |source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    };
    match DropKind::from_path(path) {
        DropKind::Text => fs::read_to_string(path).map(Some).map_err(read_err),
        DropKind::Image { mime } => {
            let bytes = fs::read(path).map_err(read_err)?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok(Some(format!(
                "![{}](data:{};base64,{})",
                name,
                mime,
                BASE64.encode(bytes)
            )))
        }
        DropKind::Unsupported => {
            debug!("Ignoring dropped file {}", path.display());
            Ok(None)
        }
    }
}

/// Insert every supported file of `paths` at `pos`, separated by newlines.
///
/// Files that fail to read are reported with an error toast and skipped.
/// Returns whether anything was inserted.
pub fn handle_drop(host: &mut dyn EditorHost, pos: usize, paths: &[PathBuf]) -> bool {
    if host.settings().read_only {
        return false;
    }
    let mut pieces = Vec::new();
    for path in paths {
        match insertion_for(path) {
            Ok(Some(text)) => pieces.push(text),
            Ok(None) => {}
            Err(err) => {
                warn!("Drop failed: {}", err);
                let services = host.services();
                services.toasts.error(err.to_string(), services.now());
            }
        }
    }
    if pieces.is_empty() {
        return false;
    }

    let pos = pos.min(host.document().len());
    let insert = pieces.join("\n");
    let cursor = pos + insert.len();
    host.dispatch(
        Transaction::replace(pos, pos, insert)
            .with_selection(Selection::cursor(cursor))
            .with_user_event("input.drop"),
    );
    true
}
