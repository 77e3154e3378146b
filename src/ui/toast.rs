//! Transient notifications
//!
//! One toast at a time: showing a new one replaces whatever is on screen.
//! Times are seconds since the host started, supplied by the host, so the
//! service never reads a clock itself.

use std::sync::Mutex;

use serde::Serialize;

use crate::config::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Info,
    Error,
}

impl ToastKind {
    pub fn class(&self) -> &'static str {
        match self {
            ToastKind::Info => "idz-toast",
            ToastKind::Error => "idz-toast idz-toast-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    /// Host time (seconds) at which the toast disappears
    pub expires_at: f64,
}

#[derive(Debug)]
pub struct ToastService {
    current: Mutex<Option<Toast>>,
    /// Seconds an info toast stays visible
    info_duration: f64,
    /// Seconds an error toast stays visible
    error_duration: f64,
}

impl Default for ToastService {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl ToastService {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            current: Mutex::new(None),
            info_duration: settings.toast_duration_ms as f64 / 1000.0,
            error_duration: settings.error_toast_duration_ms as f64 / 1000.0,
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Toast>> {
        self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Show a message, replacing any visible toast.
    pub fn show(&self, message: impl Into<String>, kind: ToastKind, current_time: f64) {
        let duration = match kind {
            ToastKind::Info => self.info_duration,
            ToastKind::Error => self.error_duration,
        };
        *self.slot() = Some(Toast {
            message: message.into(),
            kind,
            expires_at: current_time + duration,
        });
    }

    pub fn info(&self, message: impl Into<String>, current_time: f64) {
        self.show(message, ToastKind::Info, current_time);
    }

    pub fn error(&self, message: impl Into<String>, current_time: f64) {
        self.show(message, ToastKind::Error, current_time);
    }

    /// Clear the toast if it has expired. Call once per frame.
    pub fn update(&self, current_time: f64) {
        let mut slot = self.slot();
        if slot.as_ref().is_some_and(|t| current_time >= t.expires_at) {
            *slot = None;
        }
    }

    /// The visible toast, if any.
    pub fn current(&self) -> Option<Toast> {
        self.slot().clone()
    }

    pub fn clear(&self) {
        *self.slot() = None;
    }
}
