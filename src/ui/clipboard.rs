//! Clipboard access
//!
//! The system clipboard comes from arboard. Opening it can fail on headless
//! machines or without permission, so every call returns a `Result` and the
//! command layer turns failures into an error toast.

use std::sync::Mutex;

use arboard::Clipboard;
use log::warn;

use crate::error::{Error, Result};

pub trait ClipboardBackend: Send {
    fn get_text(&self) -> Result<String>;
    fn set_text(&self, text: &str) -> Result<()>;
}

/// The platform clipboard. A fresh handle is opened per call.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardBackend for SystemClipboard {
    fn get_text(&self) -> Result<String> {
        let mut clipboard = Clipboard::new().map_err(|e| {
            warn!("Failed to open clipboard: {}", e);
            Error::from(e)
        })?;
        Ok(clipboard.get_text()?)
    }

    fn set_text(&self, text: &str) -> Result<()> {
        let mut clipboard = Clipboard::new().map_err(|e| {
            warn!("Failed to open clipboard: {}", e);
            Error::from(e)
        })?;
        clipboard.set_text(text)?;
        Ok(())
    }
}

/// In-process clipboard, used by tests and headless hosts.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
    /// When set, every access fails with this message
    failure: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(Some(text.into())),
            failure: None,
        }
    }

    /// A clipboard that refuses every access.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(None),
            failure: Some(message.into()),
        }
    }

    fn check(&self) -> Result<()> {
        match &self.failure {
            Some(message) => Err(Error::Clipboard(message.clone())),
            None => Ok(()),
        }
    }
}

impl ClipboardBackend for MemoryClipboard {
    fn get_text(&self) -> Result<String> {
        self.check()?;
        self.contents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
            .ok_or_else(|| Error::Clipboard("clipboard is empty".to_string()))
    }

    fn set_text(&self, text: &str) -> Result<()> {
        self.check()?;
        *self
            .contents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(text.to_string());
        Ok(())
    }
}
