//! Editor settings for livemark
//!
//! This module defines the `Settings` struct that holds every user-facing
//! option: which markdown extensions are decorated, editor chrome toggles,
//! the toolbar layout, and the decoration scan policy.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::ui::toolbar::{ToolbarItem, DEFAULT_TOOLBAR_ITEMS};

// ─────────────────────────────────────────────────────────────────────────────
// Markdown Extensions
// ─────────────────────────────────────────────────────────────────────────────

/// Optional markdown extensions. A disabled extension is neither parsed
/// specially nor decorated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionSettings {
    /// GFM pipe tables
    pub tables: bool,
    /// `- [ ]` task items with clickable checkboxes
    pub task_lists: bool,
    /// `$...$` and `$$...$$` math
    pub math: bool,
    /// `> [!NOTE]` style callouts
    pub alerts: bool,
    /// `[^id]` references and definitions
    pub footnotes: bool,
    /// Token colouring inside fenced code blocks
    pub syntax_highlighting: bool,
    /// `~~text~~`
    pub strikethrough: bool,
}

impl Default for ExtensionSettings {
    fn default() -> Self {
        Self {
            tables: true,
            task_lists: true,
            math: false,
            alerts: true,
            footnotes: true,
            syntax_highlighting: true,
            strikethrough: true,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Decoration Policy
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorationSettings {
    /// Scan only the visible range for inline constructs. Tables and
    /// multi-line block math always use the whole document.
    pub viewport_limited: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// User preferences for the live-preview editor.
///
/// Serialized to JSON (or read from TOML) and persisted to the user's config
/// directory. All fields have defaults via `#[serde(default)]`, so partial
/// files are fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Markdown
    // ─────────────────────────────────────────────────────────────────────────
    pub extensions: ExtensionSettings,

    pub decoration: DecorationSettings,

    /// Syntect theme name for fenced code blocks
    pub syntax_theme: String,

    // ─────────────────────────────────────────────────────────────────────────
    // Editor
    // ─────────────────────────────────────────────────────────────────────────
    /// Text shown while the document is empty
    pub placeholder: String,

    pub read_only: bool,

    pub line_numbers: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Chrome
    // ─────────────────────────────────────────────────────────────────────────
    /// Whether the formatting toolbar is shown
    pub toolbar: bool,

    /// Toolbar item ids in display order; `separator` inserts a divider
    pub toolbar_items: Vec<String>,

    pub context_menu: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Notifications
    // ─────────────────────────────────────────────────────────────────────────
    pub toast_duration_ms: u64,

    pub error_toast_duration_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            extensions: ExtensionSettings::default(),
            decoration: DecorationSettings::default(),
            syntax_theme: String::from("base16-ocean.dark"),

            placeholder: String::from("Start writing..."),
            read_only: false,
            line_numbers: false,

            toolbar: false,
            toolbar_items: DEFAULT_TOOLBAR_ITEMS
                .iter()
                .map(|id| id.to_string())
                .collect(),
            context_menu: true,

            toast_duration_ms: 2500,
            error_toast_duration_ms: 4000,
        }
    }
}

impl Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Shortest allowed toast duration.
    pub const MIN_TOAST_MS: u64 = 500;
    /// Longest allowed toast duration.
    pub const MAX_TOAST_MS: u64 = 30_000;

    /// Clamp durations and drop toolbar ids nobody knows how to render.
    pub fn sanitize(&mut self) {
        self.toast_duration_ms = self
            .toast_duration_ms
            .clamp(Self::MIN_TOAST_MS, Self::MAX_TOAST_MS);
        self.error_toast_duration_ms = self
            .error_toast_duration_ms
            .clamp(Self::MIN_TOAST_MS, Self::MAX_TOAST_MS);

        self.toolbar_items.retain(|id| {
            let known = ToolbarItem::from_id(id).is_some();
            if !known {
                warn!("Ignoring unknown toolbar item '{}'", id);
            }
            known
        });

        if self.syntax_theme.trim().is_empty() {
            self.syntax_theme = Settings::default().syntax_theme;
        }
    }

    /// Deserialize JSON and sanitize the result.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Deserialize TOML and sanitize the result.
    pub fn from_toml_sanitized(source: &str) -> Result<Self, toml::de::Error> {
        let mut settings: Self = toml::from_str(source)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Parsed toolbar layout.
    pub fn toolbar_layout(&self) -> Vec<ToolbarItem> {
        self.toolbar_items
            .iter()
            .filter_map(|id| ToolbarItem::from_id(id))
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.extensions.tables);
        assert!(settings.extensions.task_lists);
        assert!(!settings.extensions.math);
        assert!(settings.context_menu);
        assert!(!settings.toolbar);
        assert!(!settings.read_only);
        assert_eq!(settings.placeholder, "Start writing...");
        assert!(!settings.decoration.viewport_limited);
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let json = r#"{"extensions": {"math": true}, "read_only": true}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert!(settings.extensions.math);
        assert!(settings.extensions.tables);
        assert!(settings.read_only);
        assert_eq!(settings.toast_duration_ms, 2500);
    }

    #[test]
    fn test_settings_deserialize_empty_json() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_settings_serialization_roundtrip() {
        let settings = Settings {
            toolbar: true,
            line_numbers: true,
            ..Settings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let loaded: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, loaded);
    }

    #[test]
    fn test_sanitize_toast_durations() {
        let mut settings = Settings {
            toast_duration_ms: 10,
            error_toast_duration_ms: 1_000_000,
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.toast_duration_ms, Settings::MIN_TOAST_MS);
        assert_eq!(settings.error_toast_duration_ms, Settings::MAX_TOAST_MS);
    }

    #[test]
    fn test_sanitize_drops_unknown_toolbar_items() {
        let mut settings = Settings {
            toolbar_items: vec!["bold".into(), "sparkles".into(), "separator".into()],
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.toolbar_items, vec!["bold", "separator"]);
    }

    #[test]
    fn test_from_toml_sanitized() {
        let source = r#"
            toolbar = true
            toast_duration_ms = 100

            [extensions]
            math = true
            footnotes = false
        "#;
        let settings = Settings::from_toml_sanitized(source).unwrap();
        assert!(settings.toolbar);
        assert!(settings.extensions.math);
        assert!(!settings.extensions.footnotes);
        assert_eq!(settings.toast_duration_ms, Settings::MIN_TOAST_MS);
    }

    #[test]
    fn test_toolbar_layout_default() {
        let layout = Settings::default().toolbar_layout();
        assert_eq!(layout.first(), Some(&ToolbarItem::Bold));
        assert!(layout.contains(&ToolbarItem::Separator));
    }
}
