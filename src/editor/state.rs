//! In-memory editor host
//!
//! `EditorState` owns the document, its syntax tree and selection, and wires
//! the live-preview composer, the table arena and the UI services together.
//! It is what the CLI and the test suite drive; a GUI embedding would
//! implement `EditorHost` over its own text widget instead.

use std::collections::HashMap;
use std::mem;
use std::ops::Range;
use std::path::PathBuf;

use log::{debug, trace};

use crate::config::Settings;
use crate::document::Document;
use crate::editor::{
    drop, keymap, Assoc, EditorEvent, EditorHost, Selection, SelectionRange, TextStats,
    Transaction,
};
use crate::live_preview::{toggle_checkbox, Decoration, DecorationContext, LivePreview, Widget};
use crate::markdown::{parse_markdown, SyntaxTree};
use crate::table::{collect_tables, CellRef, TableArena, TableMutation};
use crate::ui::math::SlotId;
use crate::ui::{self, ContextMenu, MathView, MenuAction, TableTarget, UiServices};

/// Math widget bookkeeping: slot plus what it was requested with.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MathSlot {
    slot: SlotId,
    latex: String,
    display: bool,
}

#[derive(Debug)]
pub struct EditorState {
    doc: Document,
    tree: SyntaxTree,
    selection: Selection,
    settings: Settings,
    services: UiServices,
    /// Viewport reported by the host; `None` means the whole document
    visible: Option<Range<usize>>,
    /// Bumped on every text change
    revision: u64,
    dispatches: usize,
    focused: bool,
    events: Vec<EditorEvent>,
    preview: LivePreview,
    tables: TableArena,
    /// Math widgets keyed by their start offset
    math: HashMap<usize, MathSlot>,
}

impl EditorState {
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_settings(text, Settings::default())
    }

    pub fn with_settings(text: impl Into<String>, settings: Settings) -> Self {
        let doc = Document::new(text);
        let tree = parse_markdown(&doc, &settings.extensions);
        let mut tables = TableArena::new();
        tables.sync(collect_tables(&doc, &tree));
        Self {
            services: UiServices::from_settings(&settings),
            doc,
            tree,
            selection: Selection::cursor(0),
            settings,
            visible: None,
            revision: 0,
            dispatches: 0,
            focused: false,
            events: Vec::new(),
            preview: LivePreview::new(),
            tables,
            math: HashMap::new(),
        }
    }

    /// Replace the UI services, e.g. to inject a clipboard.
    pub fn with_services(mut self, services: UiServices) -> Self {
        self.services = services;
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Content
    // ─────────────────────────────────────────────────────────────────────────

    pub fn get_content(&self) -> &str {
        self.doc.text()
    }

    /// Replace the whole document as one undoable change.
    pub fn set_content(&mut self, text: impl Into<String>) {
        let len = self.doc.len();
        self.dispatch(Transaction::replace(0, len, text.into()).with_user_event("set"));
    }

    pub fn insert_at(&mut self, pos: usize, text: &str) {
        let pos = pos.min(self.doc.len());
        self.dispatch(Transaction::replace(pos, pos, text).with_user_event("input"));
    }

    /// Replace the main selection with `text`, leaving the cursor after it.
    pub fn replace_selection(&mut self, text: &str) {
        let main = self.selection.main();
        let cursor = main.from() + text.len();
        self.dispatch(
            Transaction::replace(main.from(), main.to(), text)
                .with_selection(Selection::cursor(cursor))
                .with_user_event("input"),
        );
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Transactions submitted so far, refused ones included.
    pub fn dispatch_count(&self) -> usize {
        self.dispatches
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────────

    pub fn set_cursor(&mut self, pos: usize) {
        self.set_selection(Selection::cursor(pos));
    }

    /// Move the selection without counting as a dispatch.
    pub fn set_selection(&mut self, selection: Selection) {
        self.update_selection(selection.clamped(self.doc.len()));
    }

    pub fn cursor_position(&self) -> usize {
        self.selection.main().head
    }

    /// Text of the main selection.
    pub fn get_selection(&self) -> String {
        let main = self.selection.main();
        self.doc.slice(main.from(), main.to()).to_string()
    }

    fn update_selection(&mut self, selection: Selection) {
        let moved = selection.main() != self.selection.main();
        self.selection = selection;
        if moved {
            let main = self.selection.main();
            let text = self.get_selection();
            self.events.push(EditorEvent::SelectionChange {
                from: main.from(),
                to: main.to(),
                text,
            });
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Settings
    // ─────────────────────────────────────────────────────────────────────────

    pub fn set_read_only(&mut self, read_only: bool) {
        self.settings.read_only = read_only;
    }

    /// Swap settings; the document is re-parsed under the new extensions.
    pub fn update_settings(&mut self, settings: Settings) {
        let reparse = settings.extensions != self.settings.extensions;
        self.settings = settings;
        if reparse {
            self.reparse();
            self.preview.invalidate();
        }
    }

    pub fn set_visible_range(&mut self, range: Option<Range<usize>>) {
        self.visible = range;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Events and Statistics
    // ─────────────────────────────────────────────────────────────────────────

    /// Take the queued notifications.
    pub fn poll_events(&mut self) -> Vec<EditorEvent> {
        mem::take(&mut self.events)
    }

    pub fn set_focused(&mut self, focused: bool) {
        if focused == self.focused {
            return;
        }
        self.focused = focused;
        if focused {
            self.events.push(EditorEvent::Focus);
        } else {
            // Leaving the editor commits any half-edited table cell
            if let Some((key, _)) = self.tables.focused() {
                self.blur_table(key);
            }
            self.events.push(EditorEvent::Blur);
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn stats(&self) -> TextStats {
        TextStats::from_text(self.doc.text())
    }

    pub fn word_count(&self) -> usize {
        crate::editor::word_count(self.doc.text())
    }

    pub fn char_count(&self) -> usize {
        crate::editor::char_count(self.doc.text())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Decorations
    // ─────────────────────────────────────────────────────────────────────────

    /// Decorations for the current document, selection and viewport.
    ///
    /// Math widgets get a render slot each; slots whose expression changed or
    /// disappeared are released so late renders for them are dropped.
    pub fn decorations(&mut self) -> Vec<Decoration> {
        let ctx = DecorationContext {
            doc: &self.doc,
            tree: &self.tree,
            selection: &self.selection,
            extensions: &self.settings.extensions,
        };
        let visible = self.visible_range();
        let decorations =
            self.preview
                .decorations(&ctx, self.revision, visible, &self.settings.decoration);
        self.sync_math(&decorations);
        decorations
    }

    fn sync_math(&mut self, decorations: &[Decoration]) {
        let mut live = HashMap::new();
        for decoration in decorations {
            if let Decoration::Replace {
                from,
                widget: Some(Widget::Math { latex, display }),
                ..
            } = decoration
            {
                live.insert(*from, (latex.as_str(), *display));
            }
        }

        let math = &self.services.math;
        self.math.retain(|pos, entry| {
            let keep = live
                .get(pos)
                .is_some_and(|(latex, display)| entry.latex == *latex && entry.display == *display);
            if !keep {
                math.release(entry.slot);
            }
            keep
        });
        for (pos, (latex, display)) in live {
            if self.math.contains_key(&pos) {
                continue;
            }
            let slot = math.allocate_slot();
            math.request(slot, latex, display);
            trace!("Requested math render for slot {} at {}", slot, pos);
            self.math.insert(
                pos,
                MathSlot {
                    slot,
                    latex: latex.to_string(),
                    display,
                },
            );
        }
    }

    /// Current view of the math widget starting at `pos`.
    pub fn math_view(&self, pos: usize) -> Option<MathView> {
        self.services.math.poll();
        let entry = self.math.get(&pos)?;
        self.services.math.view(entry.slot)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tables
    // ─────────────────────────────────────────────────────────────────────────

    pub fn tables(&self) -> &TableArena {
        &self.tables
    }

    pub fn focus_table_cell(&mut self, key: usize, cell: CellRef) -> bool {
        self.tables.focus(key, cell)
    }

    /// Buffer a cell edit; nothing reaches the document until blur.
    pub fn edit_table_cell(&mut self, key: usize, cell: CellRef, text: &str) -> bool {
        self.tables.edit_cell(key, cell, text)
    }

    pub fn blur_table(&mut self, key: usize) -> bool {
        self.with_tables(|tables, host| tables.blur(host, key))
    }

    pub fn tab_table(&mut self, key: usize, forward: bool) -> Option<CellRef> {
        self.with_tables(|tables, host| tables.tab(host, key, forward))
    }

    pub fn apply_table_mutation(&mut self, key: usize, mutation: TableMutation) -> bool {
        self.with_tables(|tables, host| tables.apply_mutation(host, key, mutation))
    }

    /// Run `f` with the arena detached so it can dispatch through `self`,
    /// then resync it with whatever the dispatch produced.
    fn with_tables<T>(&mut self, f: impl FnOnce(&mut TableArena, &mut Self) -> T) -> T {
        let mut tables = mem::take(&mut self.tables);
        let result = f(&mut tables, self);
        tables.sync(collect_tables(&self.doc, &self.tree));
        self.tables = tables;
        result
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Input
    // ─────────────────────────────────────────────────────────────────────────

    pub fn context_menu(&self, x: f32, y: f32, target: Option<TableTarget>) -> Option<ContextMenu> {
        ui::show_context_menu(self, x, y, target)
    }

    pub fn run_menu_action(&mut self, action: MenuAction) -> bool {
        self.with_tables(|tables, host| ui::run_menu_action(host, tables, action))
    }

    pub fn handle_key(&mut self, key: &str) -> bool {
        keymap::handle_key(self, key)
    }

    /// A typed character: wraps the selection for pair characters,
    /// otherwise replaces the selection.
    pub fn handle_text_input(&mut self, ch: char) -> bool {
        if keymap::handle_char(self, ch) {
            return true;
        }
        if self.settings.read_only {
            return false;
        }
        self.replace_selection(ch.encode_utf8(&mut [0; 4]));
        true
    }

    pub fn toggle_checkbox(&mut self, toggle_at: usize) -> bool {
        !self.settings.read_only && toggle_checkbox(self, toggle_at)
    }

    pub fn drop_files(&mut self, pos: usize, paths: &[PathBuf]) -> bool {
        drop::handle_drop(self, pos, paths)
    }

    fn reparse(&mut self) {
        self.tree = parse_markdown(&self.doc, &self.settings.extensions);
        self.tables.sync(collect_tables(&self.doc, &self.tree));
    }
}

impl EditorHost for EditorState {
    fn document(&self) -> &Document {
        &self.doc
    }

    fn syntax_tree(&self) -> &SyntaxTree {
        &self.tree
    }

    fn selection(&self) -> &Selection {
        &self.selection
    }

    fn visible_range(&self) -> Range<usize> {
        let len = self.doc.len();
        match &self.visible {
            Some(range) => range.start.min(len)..range.end.min(len),
            None => 0..len,
        }
    }

    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn services(&self) -> &UiServices {
        &self.services
    }

    fn dispatch(&mut self, tx: Transaction) {
        self.dispatches += 1;
        if tx.changes.is_empty() {
            if let Some(selection) = tx.selection {
                self.set_selection(selection);
            }
            return;
        }
        if tx.is_noop_for(&self.doc) {
            debug!("Skipping no-op transaction {:?}", tx.user_event);
            if let Some(selection) = tx.selection {
                self.set_selection(selection);
            }
            return;
        }
        if self.settings.read_only {
            debug!("Read-only: refusing {:?}", tx.user_event);
            return;
        }

        self.doc = tx.apply(&self.doc);
        let selection = match &tx.selection {
            Some(selection) => selection.clone(),
            None => self.selection.map_ranges(|range| {
                SelectionRange::new(
                    tx.map_pos(range.anchor, Assoc::After),
                    tx.map_pos(range.head, Assoc::After),
                )
            }),
        };
        self.revision += 1;
        self.reparse();
        trace!(
            "Applied {:?} ({} change(s)), revision {}",
            tx.user_event,
            tx.changes.len(),
            self.revision
        );
        self.events.push(EditorEvent::Change {
            content: self.doc.text().to_string(),
        });
        self.set_selection(selection);
    }

    fn emit(&mut self, event: EditorEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtensionSettings;
    use std::time::Duration;

    // ─────────────────────────────────────────────────────────────────────────
    // Dispatch
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_new_state_has_no_dispatches() {
        let mut state = EditorState::new("hello");
        state.set_cursor(3);
        state.set_selection(Selection::single(0, 5));
        assert_eq!(state.dispatch_count(), 0);
        assert_eq!(state.get_selection(), "hello");
    }

    #[test]
    fn test_dispatch_maps_selection_and_emits_change() {
        let mut state = EditorState::new("world");
        state.set_cursor(5);
        state.poll_events();
        state.insert_at(0, "hello ");
        assert_eq!(state.get_content(), "hello world");
        assert_eq!(state.cursor_position(), 11);
        assert_eq!(state.revision(), 1);
        let events = state.poll_events();
        assert_eq!(
            events[0],
            EditorEvent::Change {
                content: "hello world".to_string()
            }
        );
    }

    #[test]
    fn test_read_only_refuses_changes_but_counts_dispatch() {
        let mut state = EditorState::new("text");
        state.set_read_only(true);
        state.insert_at(0, "x");
        assert_eq!(state.get_content(), "text");
        assert_eq!(state.dispatch_count(), 1);
        assert_eq!(state.revision(), 0);
        assert!(!state.handle_text_input('a'));
    }

    #[test]
    fn test_reparse_after_change() {
        let mut state = EditorState::new("plain");
        state.set_content("# Heading");
        let headings = state
            .syntax_tree()
            .find_all(crate::markdown::NodeKind::Heading(1), 0, state.get_content().len());
        assert_eq!(headings.len(), 1);
    }

    #[test]
    fn test_text_input_replaces_or_wraps() {
        let mut state = EditorState::new("ab");
        state.set_cursor(1);
        assert!(state.handle_text_input('x'));
        assert_eq!(state.get_content(), "axb");
        state.set_selection(Selection::single(0, 1));
        assert!(state.handle_text_input('['));
        assert_eq!(state.get_content(), "[a]xb");
        assert_eq!(state.get_selection(), "a");
    }

    #[test]
    fn test_focus_and_blur_events() {
        let mut state = EditorState::new("");
        state.set_focused(true);
        state.set_focused(true);
        state.set_focused(false);
        assert_eq!(state.poll_events(), vec![EditorEvent::Focus, EditorEvent::Blur]);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tables
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_table_cell_commits_on_blur() {
        let mut state = EditorState::new("| A | B |\n|---|---|\n| 1 | 2 |");
        assert_eq!(state.tables().len(), 1);
        assert!(state.focus_table_cell(0, CellRef::body(0, 0)));
        assert!(state.edit_table_cell(0, CellRef::body(0, 0), "one"));
        assert_eq!(state.dispatch_count(), 0);
        assert!(state.blur_table(0));
        assert!(state.get_content().contains("| one |"));
        assert_eq!(state.revision(), 1);
        assert_eq!(state.tables().len(), 1);
    }

    #[test]
    fn test_table_mutation_through_state() {
        let mut state = EditorState::new("| A | B |\n|---|---|\n| 1 | 2 |");
        assert!(state.apply_table_mutation(0, TableMutation::InsertColumnRight(1)));
        assert!(state.get_content().starts_with("| A   | B   | Column |"));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Decorations
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_math_widget_renders_through_service() {
        let settings = Settings {
            extensions: ExtensionSettings {
                math: true,
                ..ExtensionSettings::default()
            },
            ..Settings::default()
        };
        let mut state = EditorState::with_settings("Area $x^2$ here", settings);
        state.set_cursor(0);
        let decorations = state.decorations();
        assert!(decorations.iter().any(|d| matches!(
            d.widget_ref(),
            Some(Widget::Math { latex, .. }) if latex == "x^2"
        )));

        state.services().math.wait(Duration::from_secs(5));
        match state.math_view(5) {
            Some(MathView::Rendered { output }) => assert!(output.contains("<msup")),
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[test]
    fn test_visible_range_clamped() {
        let mut state = EditorState::new("short");
        state.set_visible_range(Some(2..100));
        assert_eq!(state.visible_range(), 2..5);
        state.set_visible_range(None);
        assert_eq!(state.visible_range(), 0..5);
    }
}
