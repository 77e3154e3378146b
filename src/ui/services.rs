//! The UI-services handle
//!
//! Toasts, stylesheet registration, math rendering and the clipboard are
//! shared by commands and widgets. The host creates one handle at startup
//! and hands it to the editor instead of each component reaching for a
//! global.

use std::time::Instant;

use crate::config::Settings;
use crate::ui::clipboard::{ClipboardBackend, SystemClipboard};
use crate::ui::math::MathService;
use crate::ui::styles::StyleInjector;
use crate::ui::toast::ToastService;

pub struct UiServices {
    pub toasts: ToastService,
    pub styles: StyleInjector,
    pub math: MathService,
    pub clipboard: Box<dyn ClipboardBackend>,
    /// Start time for toast timing
    started: Instant,
}

impl std::fmt::Debug for UiServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiServices")
            .field("toasts", &self.toasts)
            .field("styles", &self.styles)
            .field("math", &self.math)
            .finish_non_exhaustive()
    }
}

impl Default for UiServices {
    fn default() -> Self {
        Self::new()
    }
}

impl UiServices {
    pub fn new() -> Self {
        Self::from_settings(&Settings::default())
    }

    /// Services sized by `settings`, with the default stylesheets queued.
    pub fn from_settings(settings: &Settings) -> Self {
        let styles = StyleInjector::new();
        styles.inject_defaults();
        Self {
            toasts: ToastService::from_settings(settings),
            styles,
            math: MathService::default(),
            clipboard: Box::new(SystemClipboard),
            started: Instant::now(),
        }
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn ClipboardBackend>) -> Self {
        self.clipboard = clipboard;
        self
    }

    /// Seconds since the services were created.
    pub fn now(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Expire toasts and apply finished math renders. Call once per frame;
    /// returns how many math widgets changed.
    pub fn tick(&self) -> usize {
        self.toasts.update(self.now());
        self.math.poll()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::clipboard::MemoryClipboard;
    use crate::ui::styles::BASE_STYLE_ID;

    #[test]
    fn test_defaults_queue_stylesheets() {
        let services = UiServices::new();
        assert!(services.styles.is_injected(BASE_STYLE_ID));
        assert_eq!(services.styles.drain().len(), 3);
    }

    #[test]
    fn test_toast_durations_follow_settings() {
        let settings = Settings {
            error_toast_duration_ms: 1000,
            ..Settings::default()
        };
        let services = UiServices::from_settings(&settings);
        services.toasts.error("oops", 5.0);
        assert_eq!(services.toasts.current().unwrap().expires_at, 6.0);
    }

    #[test]
    fn test_with_clipboard() {
        let services = UiServices::new().with_clipboard(Box::new(MemoryClipboard::with_text("hi")));
        assert_eq!(services.clipboard.get_text().unwrap(), "hi");
        assert!(services.now() >= 0.0);
    }
}
