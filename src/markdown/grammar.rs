//! Line-level markdown grammar shared by the decorators and the commands
//!
//! Every "is this line a bullet item / heading / quote / alert" question is
//! answered here so the live preview and the toolbar state can never
//! disagree about what a line is.

/// Compile a pattern once and reuse it for the lifetime of the process.
macro_rules! static_regex {
    ($pattern:expr) => {{
        static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
        RE.get_or_init(|| regex::Regex::new($pattern).expect("static regex pattern is valid"))
    }};
}
pub(crate) use static_regex;

use serde::Serialize;

// ─────────────────────────────────────────────────────────────────────────────
// Headings
// ─────────────────────────────────────────────────────────────────────────────

/// ATX heading level and the length of its marker (`#` run plus one space).
pub fn heading_marker(line: &str) -> Option<(u8, usize)> {
    let caps = static_regex!(r"^(#{1,6})(?:\s|$)").captures(line)?;
    let level = caps.get(1)?.as_str().len() as u8;
    Some((level, caps.get(0)?.end()))
}

/// Heading level of a line, used by the toolbar state.
pub fn heading_level(line: &str) -> Option<u8> {
    let caps = static_regex!(r"^(#{1,6})\s").captures(line)?;
    Some(caps.get(1)?.as_str().len() as u8)
}

// ─────────────────────────────────────────────────────────────────────────────
// List Markers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bullet(char),
    Ordered(u64),
    Task { bullet: char, checked: bool },
}

/// A list marker found at the start of a line. Offsets are relative to the
/// line start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMarker {
    pub kind: ListKind,
    /// Leading whitespace length
    pub indent: usize,
    /// End of the bullet or number plus one space. For tasks this is where
    /// the `[ ]` checkbox starts.
    pub marker_end: usize,
    /// Where the item's own text begins
    pub content_start: usize,
}

impl ListMarker {
    /// The `[ ]` box of a task item.
    pub fn checkbox(&self) -> Option<(usize, usize)> {
        match self.kind {
            ListKind::Task { .. } => Some((self.marker_end, self.marker_end + 3)),
            _ => None,
        }
    }

    pub fn is_task(&self) -> bool {
        matches!(self.kind, ListKind::Task { .. })
    }
}

pub fn list_marker(line: &str) -> Option<ListMarker> {
    if let Some(caps) = static_regex!(r"^(\s*)([-*+])(\s+)\[([ xX])\](?:\s|$)").captures(line) {
        let indent = caps.get(1)?.len();
        let bullet = caps.get(2)?.as_str().chars().next()?;
        let marker_end = caps.get(3)?.end();
        let checked = caps.get(4)?.as_str() != " ";
        return Some(ListMarker {
            kind: ListKind::Task { bullet, checked },
            indent,
            marker_end,
            content_start: caps.get(0)?.end(),
        });
    }
    if let Some(caps) = static_regex!(r"^(\s*)([-*+])(\s|$)").captures(line) {
        let indent = caps.get(1)?.len();
        let bullet = caps.get(2)?.as_str().chars().next()?;
        let marker_end = caps.get(0)?.end();
        return Some(ListMarker {
            kind: ListKind::Bullet(bullet),
            indent,
            marker_end,
            content_start: marker_end,
        });
    }
    if let Some(caps) = static_regex!(r"^(\s*)(\d{1,9})\.(\s|$)").captures(line) {
        let indent = caps.get(1)?.len();
        let number = caps.get(2)?.as_str().parse().ok()?;
        let marker_end = caps.get(0)?.end();
        return Some(ListMarker {
            kind: ListKind::Ordered(number),
            indent,
            marker_end,
            content_start: marker_end,
        });
    }
    None
}

pub fn is_bullet_line(line: &str) -> bool {
    matches!(list_marker(line), Some(m) if matches!(m.kind, ListKind::Bullet(_)))
}

pub fn is_ordered_line(line: &str) -> bool {
    matches!(list_marker(line), Some(m) if matches!(m.kind, ListKind::Ordered(_)))
}

pub fn is_task_line(line: &str) -> bool {
    matches!(list_marker(line), Some(m) if m.is_task())
}

// ─────────────────────────────────────────────────────────────────────────────
// Block Quotes and Alerts
// ─────────────────────────────────────────────────────────────────────────────

/// Length of a leading `>` marker (with one optional following space).
pub fn quote_marker(line: &str) -> Option<usize> {
    static_regex!(r"^(\s*>+\s?)").find(line).map(|m| m.end())
}

/// The full (possibly nested) quote prefix, e.g. `> > `.
pub fn quote_prefix(line: &str) -> Option<&str> {
    static_regex!(r"^(?:\s*>\s?)+").find(line).map(|m| m.as_str())
}

pub fn is_quote_line(line: &str) -> bool {
    line.starts_with('>')
}

/// GitHub alert types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Note,
    Tip,
    Important,
    Warning,
    Caution,
}

impl AlertKind {
    pub const ALL: [AlertKind; 5] = [
        AlertKind::Note,
        AlertKind::Tip,
        AlertKind::Important,
        AlertKind::Warning,
        AlertKind::Caution,
    ];

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_uppercase().as_str() {
            "NOTE" => Some(AlertKind::Note),
            "TIP" => Some(AlertKind::Tip),
            "IMPORTANT" => Some(AlertKind::Important),
            "WARNING" => Some(AlertKind::Warning),
            "CAUTION" => Some(AlertKind::Caution),
            _ => None,
        }
    }

    /// Tag as written in source, e.g. `WARNING`.
    pub fn tag(&self) -> &'static str {
        match self {
            AlertKind::Note => "NOTE",
            AlertKind::Tip => "TIP",
            AlertKind::Important => "IMPORTANT",
            AlertKind::Warning => "WARNING",
            AlertKind::Caution => "CAUTION",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AlertKind::Note => "Note",
            AlertKind::Tip => "Tip",
            AlertKind::Important => "Important",
            AlertKind::Warning => "Warning",
            AlertKind::Caution => "Caution",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            AlertKind::Note => "\u{2139}",       // ℹ
            AlertKind::Tip => "\u{1F4A1}",       // 💡
            AlertKind::Important => "\u{2757}",  // ❗
            AlertKind::Warning => "\u{26A0}",    // ⚠
            AlertKind::Caution => "\u{1F525}",   // 🔥
        }
    }

    /// Accent class carried by every line of the alert.
    pub fn class(&self) -> &'static str {
        match self {
            AlertKind::Note => "idz-alert-note",
            AlertKind::Tip => "idz-alert-tip",
            AlertKind::Important => "idz-alert-important",
            AlertKind::Warning => "idz-alert-warning",
            AlertKind::Caution => "idz-alert-caution",
        }
    }
}

/// Alert kind and the end of the `> [!TYPE]` marker on an alert's first line.
pub fn alert_marker(line: &str) -> Option<(AlertKind, usize)> {
    let caps =
        static_regex!(r"(?i)^\s*>\s*\[!(NOTE|TIP|IMPORTANT|WARNING|CAUTION)\]").captures(line)?;
    let kind = AlertKind::from_tag(caps.get(1)?.as_str())?;
    Some((kind, caps.get(0)?.end()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Code Fences
// ─────────────────────────────────────────────────────────────────────────────

/// Opening fence of a fenced code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fence {
    pub ch: char,
    pub len: usize,
    /// Language name from the info string, if any
    pub language: Option<String>,
}

pub fn fence_open(line: &str) -> Option<Fence> {
    let caps = static_regex!(r"^ {0,3}(`{3,}|~{3,})\s*([^`\s]*)").captures(line)?;
    let run = caps.get(1)?.as_str();
    let language = caps
        .get(2)
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    Some(Fence {
        ch: run.chars().next()?,
        len: run.len(),
        language,
    })
}

/// Whether `line` closes a block opened by `fence`.
pub fn closes_fence(line: &str, fence: &Fence) -> bool {
    let trimmed = line.trim_start_matches(' ');
    if line.len() - trimmed.len() > 3 {
        return false;
    }
    let run = trimmed.chars().take_while(|c| *c == fence.ch).count();
    run >= fence.len && trimmed[run * fence.ch.len_utf8()..].trim().is_empty()
}

// ─────────────────────────────────────────────────────────────────────────────
// Line Prefixes (command layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Block-level prefixes the paragraph commands add or remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinePrefix {
    Heading(u8),
    Bullet,
    Ordered,
    Task,
    Quote,
}

impl LinePrefix {
    /// Length of this prefix at the start of `line`, if present.
    pub fn match_len(&self, line: &str) -> Option<usize> {
        let re = match self {
            LinePrefix::Heading(_) => static_regex!(r"^#{1,6}\s"),
            LinePrefix::Bullet => static_regex!(r"^[-*+]\s"),
            LinePrefix::Ordered => static_regex!(r"^\d+\.\s"),
            LinePrefix::Task => static_regex!(r"^[-*+]\s+\[[ xX]\]\s?"),
            LinePrefix::Quote => static_regex!(r"^>\s?"),
        };
        re.find(line).map(|m| m.end())
    }

    /// The prefix currently on `line`, most specific first.
    pub fn detect(line: &str) -> Option<(LinePrefix, usize)> {
        if let Some(len) = LinePrefix::Task.match_len(line) {
            return Some((LinePrefix::Task, len));
        }
        if let Some(level) = heading_level(line) {
            return Some((LinePrefix::Heading(level), level as usize + 1));
        }
        [LinePrefix::Bullet, LinePrefix::Ordered, LinePrefix::Quote]
            .into_iter()
            .find_map(|prefix| prefix.match_len(line).map(|len| (prefix, len)))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_marker() {
        assert_eq!(heading_marker("### Title"), Some((3, 4)));
        assert_eq!(heading_marker("##"), Some((2, 2)));
        assert_eq!(heading_marker("####### Seven"), None);
        assert_eq!(heading_marker("#hashtag"), None);
        assert_eq!(heading_level("## Two"), Some(2));
    }

    #[test]
    fn test_list_marker_bullet() {
        let m = list_marker("  - item").unwrap();
        assert_eq!(m.kind, ListKind::Bullet('-'));
        assert_eq!(m.indent, 2);
        assert_eq!(m.marker_end, 4);
        assert_eq!(m.content_start, 4);
    }

    #[test]
    fn test_list_marker_task() {
        let m = list_marker("- [x] Done").unwrap();
        assert_eq!(
            m.kind,
            ListKind::Task {
                bullet: '-',
                checked: true
            }
        );
        assert_eq!(m.checkbox(), Some((2, 5)));
        assert_eq!(m.content_start, 6);

        let empty = list_marker("- [ ]").unwrap();
        assert!(empty.is_task());
    }

    #[test]
    fn test_list_marker_ordered() {
        let m = list_marker("12. twelve").unwrap();
        assert_eq!(m.kind, ListKind::Ordered(12));
        assert_eq!(m.marker_end, 4);
    }

    #[test]
    fn test_list_marker_rejects_rules_and_text() {
        assert!(list_marker("---").is_none());
        assert!(list_marker("plain text").is_none());
        assert!(list_marker("-not a list").is_none());
    }

    #[test]
    fn test_bullet_and_task_predicates_disagree() {
        assert!(is_task_line("- [ ] task"));
        assert!(!is_bullet_line("- [ ] task"));
        assert!(is_bullet_line("- item"));
        assert!(is_ordered_line("1. first"));
        assert!(!is_ordered_line("- item"));
    }

    #[test]
    fn test_quote_marker_and_prefix() {
        assert_eq!(quote_marker("> text"), Some(2));
        assert_eq!(quote_marker(">> nested"), Some(3));
        assert_eq!(quote_prefix("> > deep"), Some("> > "));
        assert_eq!(quote_marker("text"), None);
    }

    #[test]
    fn test_alert_marker_case_insensitive() {
        let (kind, end) = alert_marker("> [!warning]").unwrap();
        assert_eq!(kind, AlertKind::Warning);
        assert_eq!(end, 12);
        assert_eq!(kind.label(), "Warning");
        assert!(alert_marker("> [!UNKNOWN]").is_none());
        assert!(alert_marker("> plain quote").is_none());
    }

    #[test]
    fn test_fence_open_and_close() {
        let fence = fence_open("```js").unwrap();
        assert_eq!(fence.ch, '`');
        assert_eq!(fence.len, 3);
        assert_eq!(fence.language.as_deref(), Some("js"));

        assert!(closes_fence("```", &fence));
        assert!(closes_fence("````  ", &fence));
        assert!(!closes_fence("``", &fence));
        assert!(!closes_fence("~~~", &fence));
        assert!(!closes_fence("```js", &fence));
    }

    #[test]
    fn test_line_prefix_detect() {
        assert_eq!(LinePrefix::detect("## Title"), Some((LinePrefix::Heading(2), 3)));
        assert_eq!(LinePrefix::detect("- [ ] task"), Some((LinePrefix::Task, 6)));
        assert_eq!(LinePrefix::detect("* item"), Some((LinePrefix::Bullet, 2)));
        assert_eq!(LinePrefix::detect("3. third"), Some((LinePrefix::Ordered, 3)));
        assert_eq!(LinePrefix::detect("> quote"), Some((LinePrefix::Quote, 2)));
        assert_eq!(LinePrefix::detect("plain"), None);
    }
}
