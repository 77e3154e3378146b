//! Token classes for fenced code blocks using syntect
//!
//! The view never receives colours directly. Each token span is tagged with
//! an `idz-tok-<scope>` class, and `theme_css` turns the configured syntect
//! theme into a stylesheet for those classes.
//!
//! # Example
//! ```ignore
//! let spans = highlight_lines("rust", [(0, "fn main() {}")]);
//! assert!(spans.iter().any(|s| s.class == "idz-tok-storage"));
//! ```

use std::sync::OnceLock;

use log::{debug, warn};
use syntect::easy::ScopeRegionIterator;
use syntect::highlighting::{Highlighter, Theme, ThemeSet};
use syntect::parsing::{ParseState, Scope, ScopeStack, SyntaxReference, SyntaxSet};

/// Fallback theme name from syntect's built-in themes
const FALLBACK_THEME: &str = "base16-ocean.dark";

/// Scope roots that say nothing about how a token should look.
const NEUTRAL_ATOMS: &[&str] = &["source", "text", "meta", "punctuation"];

/// Scope roots a stylesheet is generated for.
const STYLED_ATOMS: &[&str] = &[
    "comment",
    "constant",
    "entity",
    "invalid",
    "keyword",
    "markup",
    "storage",
    "string",
    "support",
    "variable",
];

/// One classed token span, in document offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpan {
    pub from: usize,
    pub to: usize,
    pub class: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Syntax Highlighter
// ─────────────────────────────────────────────────────────────────────────────

/// Cached syntect syntax and theme sets. Loading them is expensive, so one
/// instance is shared for the whole process.
pub struct SyntaxHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxHighlighter {
    pub fn new() -> Self {
        debug!("Loading syntect syntax and theme sets");
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let theme_set = ThemeSet::load_defaults();
        debug!(
            "Loaded {} syntaxes and {} themes",
            syntax_set.syntaxes().len(),
            theme_set.themes.len()
        );
        Self {
            syntax_set,
            theme_set,
        }
    }

    pub fn available_themes(&self) -> Vec<&str> {
        self.theme_set.themes.keys().map(|s| s.as_str()).collect()
    }

    /// Theme by name, falling back to the default theme.
    pub fn theme(&self, name: &str) -> Option<&Theme> {
        self.theme_set
            .themes
            .get(name)
            .or_else(|| self.theme_set.themes.get(FALLBACK_THEME))
    }

    /// Syntax for a fence info string such as `js`, `rust` or `Python`.
    pub fn find_syntax(&self, language: &str) -> Option<&SyntaxReference> {
        if language.is_empty() {
            return None;
        }
        let lang_lower = language.to_lowercase();
        let extension = match lang_lower.as_str() {
            "rust" => "rs",
            "python" => "py",
            "javascript" => "js",
            "typescript" => "ts",
            "cpp" | "c++" | "cxx" => "cpp",
            "csharp" | "c#" => "cs",
            "golang" => "go",
            "ruby" => "rb",
            "yml" => "yaml",
            "markdown" => "md",
            "shell" | "bash" | "zsh" => "sh",
            "haskell" => "hs",
            other => other,
        };

        self.syntax_set
            .find_syntax_by_extension(extension)
            .or_else(|| self.syntax_set.find_syntax_by_token(language))
            .or_else(|| {
                self.syntax_set
                    .syntaxes()
                    .iter()
                    .find(|syntax| syntax.name.to_lowercase() == lang_lower)
            })
    }

    /// Classed token spans for `lines`, each given as `(line_start, text)`
    /// without its line break. `None` when the language is unknown.
    pub fn highlight_lines<'t, I>(&self, language: &str, lines: I) -> Option<Vec<TokenSpan>>
    where
        I: IntoIterator<Item = (usize, &'t str)>,
    {
        let Some(syntax) = self.find_syntax(language) else {
            debug!("No syntax found for language: {}", language);
            return None;
        };

        let mut state = ParseState::new(syntax);
        let mut stack = ScopeStack::new();
        let mut spans: Vec<TokenSpan> = Vec::new();

        for (line_start, text) in lines {
            let line = format!("{}\n", text);
            let ops = match state.parse_line(&line, &self.syntax_set) {
                Ok(ops) => ops,
                Err(e) => {
                    warn!("Failed to highlight line at {}: {}", line_start, e);
                    return Some(spans);
                }
            };

            let mut offset = 0;
            for (region, op) in ScopeRegionIterator::new(&ops, &line) {
                if let Err(e) = stack.apply(op) {
                    warn!("Scope stack error at {}: {:?}", line_start, e);
                    return Some(spans);
                }
                let end = (offset + region.len()).min(text.len());
                if end > offset && !region.trim().is_empty() {
                    if let Some(class) = class_for(&stack) {
                        push_span(&mut spans, line_start + offset, line_start + end, class);
                    }
                }
                offset += region.len();
            }
        }

        Some(spans)
    }

    /// Stylesheet colouring every `idz-tok-*` class from a syntect theme.
    pub fn theme_css(&self, theme_name: &str) -> String {
        let Some(theme) = self.theme(theme_name) else {
            return String::new();
        };
        let highlighter = Highlighter::new(theme);
        let mut css = String::new();
        for atom in STYLED_ATOMS {
            let Ok(scope) = Scope::new(atom) else {
                continue;
            };
            let style = highlighter.style_for_stack(&[scope]);
            let c = style.foreground;
            css.push_str(&format!(
                ".idz-tok-{} {{ color: #{:02x}{:02x}{:02x}; }}\n",
                atom, c.r, c.g, c.b
            ));
        }
        css
    }
}

/// Class of the innermost scope that carries styling meaning.
fn class_for(stack: &ScopeStack) -> Option<String> {
    stack.as_slice().iter().rev().find_map(|scope| {
        let name = scope.build_string();
        let atom = name.split('.').next()?.to_string();
        if NEUTRAL_ATOMS.contains(&atom.as_str()) {
            None
        } else {
            Some(format!("idz-tok-{}", atom))
        }
    })
}

/// Append a span, merging it into the previous one when they touch and share
/// a class.
fn push_span(spans: &mut Vec<TokenSpan>, from: usize, to: usize, class: String) {
    if let Some(last) = spans.last_mut() {
        if last.to == from && last.class == class {
            last.to = to;
            return;
        }
    }
    spans.push(TokenSpan { from, to, class });
}

// ─────────────────────────────────────────────────────────────────────────────
// Global Highlighter Instance
// ─────────────────────────────────────────────────────────────────────────────

static HIGHLIGHTER: OnceLock<SyntaxHighlighter> = OnceLock::new();

/// Get or create the global syntax highlighter.
pub fn get_highlighter() -> &'static SyntaxHighlighter {
    HIGHLIGHTER.get_or_init(SyntaxHighlighter::new)
}

/// Token spans for `lines` using the global highlighter.
pub fn highlight_lines<'t, I>(language: &str, lines: I) -> Option<Vec<TokenSpan>>
where
    I: IntoIterator<Item = (usize, &'t str)>,
{
    get_highlighter().highlight_lines(language, lines)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
