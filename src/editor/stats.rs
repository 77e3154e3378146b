//! Word and character counts for the status bar

// ─────────────────────────────────────────────────────────────────────────────
// Quick Counts
// ─────────────────────────────────────────────────────────────────────────────

/// Words in `text`: whitespace-separated runs after trimming.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Characters in `text`, not counting line breaks.
pub fn char_count(text: &str) -> usize {
    text.chars().filter(|&c| c != '\n').count()
}

// ─────────────────────────────────────────────────────────────────────────────
// TextStats
// ─────────────────────────────────────────────────────────────────────────────

/// Full statistics for a document, gathered in one pass.
///
/// # Example
///
/// ```ignore
/// let stats = TextStats::from_text("Hello, World!\n\nNew paragraph.");
/// assert_eq!(stats.words, 4);
/// assert_eq!(stats.paragraphs, 2);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextStats {
    pub words: usize,
    /// Every character, whitespace included
    pub characters: usize,
    pub characters_no_spaces: usize,
    /// Line count; an empty document has one line
    pub lines: usize,
    /// Runs of non-blank lines separated by blank lines
    pub paragraphs: usize,
}

impl TextStats {
    pub fn from_text(text: &str) -> Self {
        let mut stats = Self {
            lines: 1,
            ..Self::default()
        };

        let mut in_word = false;
        let mut line_has_content = false;
        let mut in_paragraph = false;

        for ch in text.chars() {
            stats.characters += 1;

            if ch == '\n' {
                stats.lines += 1;
                if !line_has_content {
                    // A blank line closes the running paragraph
                    in_paragraph = false;
                }
                line_has_content = false;
                in_word = false;
                continue;
            }

            if ch.is_whitespace() {
                in_word = false;
                continue;
            }

            stats.characters_no_spaces += 1;
            if !in_word {
                in_word = true;
                stats.words += 1;
            }
            if !line_has_content {
                line_has_content = true;
                if !in_paragraph {
                    in_paragraph = true;
                    stats.paragraphs += 1;
                }
            }
        }

        stats
    }

    /// Compact status-bar form, e.g. `"150 words | 892 chars | 25 lines"`.
    pub fn format_compact(&self) -> String {
        format!(
            "{} words | {} chars | {} lines",
            self.words, self.characters, self.lines
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count_trims_and_splits() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   "), 0);
        assert_eq!(word_count("  one two\tthree\nfour  "), 4);
    }

    #[test]
    fn test_char_count_ignores_newlines() {
        assert_eq!(char_count("ab\ncd"), 4);
        assert_eq!(char_count("på"), 2);
        assert_eq!(char_count("\n\n"), 0);
    }

    #[test]
    fn test_stats_empty_text() {
        let stats = TextStats::from_text("");
        assert_eq!(stats.words, 0);
        assert_eq!(stats.characters, 0);
        assert_eq!(stats.lines, 1);
        assert_eq!(stats.paragraphs, 0);
    }

    #[test]
    fn test_stats_simple_sentence() {
        let stats = TextStats::from_text("Hello, World!");
        assert_eq!(stats.words, 2);
        assert_eq!(stats.characters, 13);
        assert_eq!(stats.characters_no_spaces, 12);
        assert_eq!(stats.paragraphs, 1);
    }

    #[test]
    fn test_stats_paragraphs() {
        let text = "Paragraph one.\n\nParagraph two.\nStill two.\n\n\nThree.";
        let stats = TextStats::from_text(text);
        assert_eq!(stats.paragraphs, 3);
        assert_eq!(stats.lines, 7);
    }

    #[test]
    fn test_stats_whitespace_only_lines_split_paragraphs() {
        let stats = TextStats::from_text("one\n   \ntwo");
        assert_eq!(stats.paragraphs, 2);
    }

    #[test]
    fn test_stats_trailing_newline() {
        let stats = TextStats::from_text("Hello\n");
        assert_eq!(stats.lines, 2);
        assert_eq!(stats.words, 1);
        assert_eq!(stats.paragraphs, 1);
    }

    #[test]
    fn test_stats_unicode() {
        let stats = TextStats::from_text("Привет мир! 你好世界");
        assert_eq!(stats.words, 3);
        assert_eq!(stats.characters, 16);
        assert_eq!(stats.characters_no_spaces, 14);
    }

    #[test]
    fn test_stats_format_compact() {
        let stats = TextStats {
            words: 150,
            characters: 892,
            characters_no_spaces: 743,
            lines: 25,
            paragraphs: 5,
        };
        assert_eq!(stats.format_compact(), "150 words | 892 chars | 25 lines");
    }
}
