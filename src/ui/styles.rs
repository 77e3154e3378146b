//! Stylesheet registration
//!
//! Decorations only carry class names; the CSS behind them is registered
//! here once per id and drained by the host, which injects it into its view.
//! Registering an id twice is a no-op.

use std::collections::HashSet;
use std::sync::Mutex;

use log::debug;

pub const BASE_STYLE_ID: &str = "livemark-base";
pub const CONTEXT_MENU_STYLE_ID: &str = "livemark-context-menu";
pub const MATH_STYLE_ID: &str = "livemark-math";
pub const SYNTAX_STYLE_ID: &str = "livemark-syntax";

pub const BASE_CSS: &str = r#"
.idz-h1 { font-size: 2em; font-weight: 700; }
.idz-h2 { font-size: 1.6em; font-weight: 700; }
.idz-h3 { font-size: 1.35em; font-weight: 600; }
.idz-h4 { font-size: 1.15em; font-weight: 600; }
.idz-h5 { font-size: 1em; font-weight: 600; }
.idz-h6 { font-size: 0.9em; font-weight: 600; opacity: 0.8; }
.idz-heading-marker, .idz-marker { opacity: 0.5; }
.idz-bold { font-weight: 700; }
.idz-italic { font-style: italic; }
.idz-bold-italic { font-weight: 700; font-style: italic; }
.idz-strikethrough { text-decoration: line-through; }
.idz-inline-code { font-family: monospace; background: rgba(127, 127, 127, 0.15); border-radius: 3px; }
.idz-code-line, .idz-fence-marker-line { font-family: monospace; background: rgba(127, 127, 127, 0.1); }
.idz-code-first { border-top-left-radius: 4px; border-top-right-radius: 4px; }
.idz-code-last { border-bottom-left-radius: 4px; border-bottom-right-radius: 4px; }
.idz-fence-hidden { font-size: 0; line-height: 0.5; }
.idz-link { color: #4a90d9; text-decoration: underline; cursor: pointer; }
.idz-link-syntax, .idz-image-syntax { color: #4a90d9; }
.idz-image { max-width: 100%; }
.idz-bullet { padding-right: 0.4em; }
.idz-ordered-marker { opacity: 0.8; }
.idz-checkbox { cursor: pointer; }
.idz-checkbox-checked + * { text-decoration: line-through; opacity: 0.6; }
.idz-blockquote-line { border-left: 3px solid rgba(127, 127, 127, 0.5); padding-left: 0.8em; }
.idz-alert-line { border-left: 3px solid; padding-left: 0.8em; }
.idz-alert-note { border-color: #4a90d9; }
.idz-alert-tip { border-color: #3fb950; }
.idz-alert-important { border-color: #a371f7; }
.idz-alert-warning { border-color: #d29922; }
.idz-alert-caution { border-color: #f85149; }
.idz-alert-header { font-weight: 600; }
.idz-alert-type-syntax { opacity: 0.7; }
.idz-hr-line { border-bottom: 1px solid rgba(127, 127, 127, 0.5); }
.idz-hr-syntax { opacity: 0.6; }
.idz-footnote-ref { vertical-align: super; font-size: 0.75em; }
.idz-footnote-def { opacity: 0.7; }
.idz-table-widget { border-collapse: collapse; }
.idz-toast { position: absolute; bottom: 1em; right: 1em; }
.idz-toast-error { color: #f85149; }
"#;

pub const CONTEXT_MENU_CSS: &str = r#"
.idz-context-menu { position: fixed; z-index: 1000; min-width: 180px; padding: 4px 0; }
.idz-context-menu-item { padding: 4px 12px; cursor: pointer; }
.idz-context-menu-item-active::before { content: "\2713"; margin-right: 6px; }
.idz-context-menu-separator { height: 1px; margin: 4px 0; background: rgba(127, 127, 127, 0.3); }
"#;

pub const MATH_CSS: &str = r#"
.idz-math-inline { font-family: serif; }
.idz-math-block { display: block; text-align: center; margin: 0.5em 0; font-family: serif; }
.idz-math-pending { opacity: 0.6; font-family: monospace; }
.idz-math-error { color: #f85149; font-family: monospace; }
.idz-math-syntax { opacity: 0.5; }
"#;

#[derive(Debug, Default)]
struct Registry {
    seen: HashSet<String>,
    pending: Vec<(String, String)>,
}

#[derive(Debug, Default)]
pub struct StyleInjector {
    registry: Mutex<Registry>,
}

impl StyleInjector {
    pub fn new() -> Self {
        Self::default()
    }

    fn registry(&self) -> std::sync::MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queue `css` under `id` unless that id was registered before.
    /// Returns whether it was queued.
    pub fn inject(&self, id: &str, css: &str) -> bool {
        let mut registry = self.registry();
        if !registry.seen.insert(id.to_string()) {
            return false;
        }
        debug!("Registered stylesheet '{}'", id);
        registry.pending.push((id.to_string(), css.to_string()));
        true
    }

    /// The stylesheets every live-preview view needs.
    pub fn inject_defaults(&self) {
        self.inject(BASE_STYLE_ID, BASE_CSS);
        self.inject(CONTEXT_MENU_STYLE_ID, CONTEXT_MENU_CSS);
        self.inject(MATH_STYLE_ID, MATH_CSS);
    }

    pub fn is_injected(&self, id: &str) -> bool {
        self.registry().seen.contains(id)
    }

    /// Stylesheets registered since the last drain, in registration order.
    pub fn drain(&self) -> Vec<(String, String)> {
        std::mem::take(&mut self.registry().pending)
    }
}
