//! Math rendering
//!
//! Math widgets show their raw source immediately and ask the service for a
//! render, which runs on a worker thread. Every request bumps the slot's
//! generation; a completion is applied only if its generation is still the
//! slot's current one, so a render that finishes after the widget moved on
//! (or was released) is silently dropped.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use log::{debug, warn};
use pulldown_latex::config::{DisplayMode, RenderConfig};
use pulldown_latex::mathml::push_mathml;
use pulldown_latex::{Parser, Storage};
use serde::Serialize;

use crate::error::{Error, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Renderer
// ─────────────────────────────────────────────────────────────────────────────

/// Turns LaTeX source into displayable output.
pub trait MathRenderer: Send + 'static {
    fn render(&self, latex: &str, display: bool) -> Result<String>;
}

/// Renders LaTeX to MathML with `pulldown-latex`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LatexRenderer;

impl MathRenderer for LatexRenderer {
    fn render(&self, latex: &str, display: bool) -> Result<String> {
        let fail = |message: String| Error::MathRender {
            latex: latex.to_string(),
            message,
        };

        let storage = Storage::new();
        let events: Vec<_> = Parser::new(latex, &storage).collect();
        let errors: Vec<String> = events
            .iter()
            .filter_map(|event| event.as_ref().err().map(|err| err.to_string()))
            .collect();
        if !errors.is_empty() {
            return Err(fail(errors.join("; ")));
        }

        let config = RenderConfig {
            display_mode: if display {
                DisplayMode::Block
            } else {
                DisplayMode::Inline
            },
            ..Default::default()
        };
        let mut mathml = String::new();
        push_mathml(&mut mathml, events.into_iter(), config).map_err(|e| fail(e.to_string()))?;
        Ok(mathml)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Widget State
// ─────────────────────────────────────────────────────────────────────────────

pub type SlotId = u64;

/// What a math widget currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum MathView {
    /// Render in flight; the raw source is shown
    Pending { source: String },
    Rendered { output: String },
    Failed { source: String, message: String },
}

impl MathView {
    pub fn class(&self) -> &'static str {
        match self {
            MathView::Pending { .. } => "idz-math-pending",
            MathView::Rendered { .. } => "idz-math-rendered",
            MathView::Failed { .. } => "idz-math-error",
        }
    }

    pub fn text(&self) -> &str {
        match self {
            MathView::Pending { source } | MathView::Failed { source, .. } => source,
            MathView::Rendered { output } => output,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Service
// ─────────────────────────────────────────────────────────────────────────────

struct RenderJob {
    slot: SlotId,
    generation: u64,
    latex: String,
    display: bool,
}

struct RenderDone {
    slot: SlotId,
    generation: u64,
    result: Result<String>,
}

/// Asynchronous math rendering with generation-checked completions.
pub struct MathService {
    jobs: Sender<RenderJob>,
    done: Receiver<RenderDone>,
    slots: Mutex<HashMap<SlotId, (u64, MathView)>>,
    next_slot: AtomicU64,
    next_generation: AtomicU64,
    _worker: thread::JoinHandle<()>,
}

impl std::fmt::Debug for MathService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MathService")
            .field("slots", &self.slots().len())
            .finish()
    }
}

impl Default for MathService {
    fn default() -> Self {
        Self::spawn(LatexRenderer)
    }
}

impl MathService {
    /// Start the worker thread with `renderer`.
    pub fn spawn<R: MathRenderer>(renderer: R) -> Self {
        let (jobs, job_rx) = crossbeam_channel::unbounded::<RenderJob>();
        let (done_tx, done) = crossbeam_channel::unbounded();

        let worker = thread::spawn(move || {
            for job in job_rx.iter() {
                let result = renderer.render(&job.latex, job.display);
                let sent = done_tx.send(RenderDone {
                    slot: job.slot,
                    generation: job.generation,
                    result,
                });
                if sent.is_err() {
                    break;
                }
            }
        });

        Self {
            jobs,
            done,
            slots: Mutex::new(HashMap::new()),
            next_slot: AtomicU64::new(1),
            next_generation: AtomicU64::new(1),
            _worker: worker,
        }
    }

    fn slots(&self) -> std::sync::MutexGuard<'_, HashMap<SlotId, (u64, MathView)>> {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// A fresh slot id for a newly created widget.
    pub fn allocate_slot(&self) -> SlotId {
        self.next_slot.fetch_add(1, Ordering::Relaxed)
    }

    /// Show `latex` raw in `slot` and schedule its render. Returns the
    /// request's generation.
    pub fn request(&self, slot: SlotId, latex: &str, display: bool) -> u64 {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        self.slots().insert(
            slot,
            (
                generation,
                MathView::Pending {
                    source: latex.to_string(),
                },
            ),
        );
        let job = RenderJob {
            slot,
            generation,
            latex: latex.to_string(),
            display,
        };
        if self.jobs.send(job).is_err() {
            warn!("Math worker is gone; leaving slot {} unrendered", slot);
            self.slots().insert(
                slot,
                (
                    generation,
                    MathView::Failed {
                        source: latex.to_string(),
                        message: "renderer unavailable".to_string(),
                    },
                ),
            );
        }
        generation
    }

    /// Forget `slot`; an in-flight render for it becomes a no-op.
    pub fn release(&self, slot: SlotId) {
        self.slots().remove(&slot);
    }

    pub fn view(&self, slot: SlotId) -> Option<MathView> {
        self.slots().get(&slot).map(|(_, view)| view.clone())
    }

    fn apply(&self, done: RenderDone) -> bool {
        let mut slots = self.slots();
        match slots.get_mut(&done.slot) {
            Some((generation, view)) if *generation == done.generation => {
                *view = match done.result {
                    Ok(output) => MathView::Rendered { output },
                    Err(Error::MathRender { latex, message }) => MathView::Failed {
                        source: latex,
                        message,
                    },
                    Err(other) => MathView::Failed {
                        source: view.text().to_string(),
                        message: other.to_string(),
                    },
                };
                true
            }
            _ => {
                debug!(
                    "Discarding stale math render for slot {} (generation {})",
                    done.slot, done.generation
                );
                false
            }
        }
    }

    /// Apply finished renders without blocking. Returns how many updated a
    /// live slot.
    pub fn poll(&self) -> usize {
        let mut applied = 0;
        while let Ok(done) = self.done.try_recv() {
            if self.apply(done) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait up to `timeout` for at least one completion, then poll.
    pub fn wait(&self, timeout: Duration) -> usize {
        match self.done.recv_timeout(timeout) {
            Ok(done) => usize::from(self.apply(done)) + self.poll(),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(latex: &str, display: bool) -> Result<String> {
        LatexRenderer.render(latex, display)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // LaTeX rendering
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_render_inline_mathml() {
        let mathml = render("x^2", false).unwrap();
        assert!(mathml.contains("<math"));
        assert!(mathml.contains("<msup"));
        assert!(mathml.contains("</math>"));
    }

    #[test]
    fn test_render_display_mode() {
        let inline = render(r"\frac{a}{b}", false).unwrap();
        let block = render(r"\frac{a}{b}", true).unwrap();
        assert!(block.contains("<mfrac"));
        assert!(block.contains("display=\"block\""));
        assert_ne!(inline, block);
    }

    #[test]
    fn test_render_symbols() {
        let mathml = render(r"\alpha \leq \beta", false).unwrap();
        assert!(mathml.contains('α'));
        assert!(mathml.contains('≤'));
        assert!(render(r"\sum_{i=0}^{n} x_i", true).is_ok());
    }

    #[test]
    fn test_render_errors_keep_source() {
        match render(r"\frac{a", false) {
            Err(Error::MathRender { latex, message }) => {
                assert_eq!(latex, r"\frac{a");
                assert!(!message.is_empty());
            }
            other => panic!("expected a render error, got {:?}", other),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Service
    // ─────────────────────────────────────────────────────────────────────────

    fn settle(service: &MathService, expected: usize) -> usize {
        let mut applied = 0;
        for _ in 0..50 {
            applied += service.wait(Duration::from_millis(100));
            if applied >= expected {
                break;
            }
        }
        applied
    }

    #[test]
    fn test_request_shows_source_then_rendered() {
        let service = MathService::default();
        let slot = service.allocate_slot();
        service.request(slot, "x^2", false);
        // Nothing is applied until the host polls
        assert!(matches!(service.view(slot), Some(MathView::Pending { .. })));
        settle(&service, 1);
        match service.view(slot) {
            Some(MathView::Rendered { output }) => assert!(output.contains("<msup")),
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[test]
    fn test_render_failure_is_local() {
        let service = MathService::default();
        let slot = service.allocate_slot();
        service.request(slot, "\\frac{1", false);
        settle(&service, 1);
        let view = service.view(slot).unwrap();
        assert_eq!(view.class(), "idz-math-error");
        assert_eq!(view.text(), "\\frac{1");
    }

    #[test]
    fn test_stale_completion_ignored() {
        let service = MathService::default();
        let slot = service.allocate_slot();
        service.request(slot, "\\alpha", false);
        service.request(slot, "\\beta", false);
        // Two completions arrive; only the second matches the slot
        assert_eq!(settle(&service, 1), 1);
        let text = service.view(slot).unwrap().text().to_string();
        assert!(text.contains('β'));
        assert!(!text.contains('α'));
    }

    #[test]
    fn test_released_slot_ignores_completion() {
        let service = MathService::default();
        let slot = service.allocate_slot();
        service.request(slot, "x", false);
        service.release(slot);
        settle(&service, 1);
        assert_eq!(service.view(slot), None);
    }
}
