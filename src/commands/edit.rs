//! Clipboard and selection commands
//!
//! Clipboard failures never interrupt editing: they become an error toast
//! and the command still reports itself as handled.

use log::warn;

use crate::editor::{EditorHost, Selection, Transaction};
use crate::error::Error;

fn report(host: &dyn EditorHost, action: &str, err: &Error) {
    warn!("{} failed: {}", action, err);
    let services = host.services();
    services
        .toasts
        .error(format!("{} failed: {}", action, err), services.now());
}

pub fn copy(host: &mut dyn EditorHost) -> bool {
    let range = host.selection().main();
    if range.is_empty() {
        return false;
    }
    let text = host.document().slice(range.from(), range.to());
    if let Err(err) = host.services().clipboard.set_text(text) {
        report(host, "Copy", &err);
    }
    true
}

/// Copy the selection, then delete it. The text is only removed when the
/// copy succeeded.
pub fn cut(host: &mut dyn EditorHost) -> bool {
    let range = host.selection().main();
    if range.is_empty() {
        return false;
    }
    let text = host.document().slice(range.from(), range.to());
    match host.services().clipboard.set_text(text) {
        Ok(()) => host.dispatch(
            Transaction::replace(range.from(), range.to(), "")
                .with_selection(Selection::cursor(range.from()))
                .with_user_event("delete.cut"),
        ),
        Err(err) => report(host, "Cut", &err),
    }
    true
}

/// Insert clipboard text as plain text over the selection.
pub fn paste(host: &mut dyn EditorHost) -> bool {
    let range = host.selection().main();
    let text = match host.services().clipboard.get_text() {
        Ok(text) => text,
        Err(err) => {
            report(host, "Paste", &err);
            return true;
        }
    };
    let cursor = range.from() + text.len();
    host.dispatch(
        Transaction::replace(range.from(), range.to(), text)
            .with_selection(Selection::cursor(cursor))
            .with_user_event("input.paste"),
    );
    true
}

pub fn select_all(host: &mut dyn EditorHost) -> bool {
    let len = host.document().len();
    host.dispatch(Transaction::select(Selection::single(0, len)));
    true
}
