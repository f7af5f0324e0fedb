//! Thread-safe diagnostic accumulator shared by all analysis passes.

use crate::code::DiagnosticCode;
use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Collects the diagnostics of one analysis run.
///
/// Passes that fan out over rayon emit through a shared reference. Counts
/// per severity are kept in atomics so that summary queries never take the
/// lock. Each diagnostic is mirrored to `tracing` at the matching level.
pub struct DiagnosticSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
    counts: [AtomicUsize; Severity::COUNT],
}

impl DiagnosticSink {
    /// Creates a new empty diagnostic sink.
    pub fn new() -> Self {
        Self {
            diagnostics: Mutex::new(Vec::new()),
            counts: std::array::from_fn(|_| AtomicUsize::new(0)),
        }
    }

    // A panic in another emitter cannot leave the vector half-written.
    fn lock(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Records a diagnostic.
    pub fn emit(&self, diag: Diagnostic) {
        let code = diag.code;
        let subject = diag.subject.as_deref().unwrap_or("-");
        match diag.severity {
            Severity::Error => tracing::error!(%code, subject, "{}", diag.message),
            Severity::Warning => tracing::warn!(%code, subject, "{}", diag.message),
            Severity::Note => tracing::info!(%code, subject, "{}", diag.message),
        }
        self.counts[diag.severity.index()].fetch_add(1, Ordering::Relaxed);
        self.lock().push(diag);
    }

    /// Number of diagnostics of the given severity emitted so far.
    pub fn count(&self, severity: Severity) -> usize {
        self.counts[severity.index()].load(Ordering::Relaxed)
    }

    /// Returns `true` if any error-severity diagnostics have been emitted.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Number of errors emitted so far.
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Number of warnings emitted so far.
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// Number of retained diagnostics carrying `code`.
    pub fn count_code(&self, code: DiagnosticCode) -> usize {
        self.lock().iter().filter(|d| d.code == code).count()
    }

    /// Drains the accumulated diagnostics. Counters keep their totals.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.lock())
    }

    /// A copy of the accumulated diagnostics.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DiagnosticSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosticSink")
            .field("notes", &self.count(Severity::Note))
            .field("warnings", &self.warning_count())
            .field("errors", &self.error_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Category;

    const UNRESOLVED: DiagnosticCode = DiagnosticCode::new(Category::Graph, 101);
    const REVISIT: DiagnosticCode = DiagnosticCode::new(Category::BufferTree, 301);

    fn dropped_rows(table: &str) -> Diagnostic {
        Diagnostic::warning(UNRESOLVED, "edge rows with unresolved endpoints dropped")
            .with_subject(table)
    }

    #[test]
    fn fresh_sink_is_empty() {
        let sink = DiagnosticSink::new();
        assert!(!sink.has_errors());
        assert_eq!(sink.warning_count(), 0);
        assert_eq!(sink.count(Severity::Note), 0);
        assert!(sink.take_all().is_empty());
    }

    #[test]
    fn counts_by_severity_and_code() {
        let sink = DiagnosticSink::new();
        sink.emit(dropped_rows("pin_pin_edge"));
        sink.emit(dropped_rows("cell_pin_edge"));
        sink.emit(Diagnostic::note(
            DiagnosticCode::new(Category::Input, 101),
            "unconstrained pins and their cells dropped",
        ));
        sink.emit(Diagnostic::error(REVISIT, "corrupt tree"));

        assert_eq!(sink.warning_count(), 2);
        assert_eq!(sink.count(Severity::Note), 1);
        assert!(sink.has_errors());
        assert_eq!(sink.count_code(UNRESOLVED), 2);
        assert_eq!(sink.count_code(REVISIT), 1);
    }

    #[test]
    fn take_all_keeps_totals() {
        let sink = DiagnosticSink::new();
        sink.emit(dropped_rows("net_pin_edge"));
        let drained = sink.take_all();
        assert_eq!(drained[0].subject.as_deref(), Some("net_pin_edge"));
        assert!(sink.diagnostics().is_empty());
        assert_eq!(sink.count_code(UNRESOLVED), 0);
        assert_eq!(sink.warning_count(), 1);
    }

    #[test]
    fn concurrent_emitters() {
        let sink = DiagnosticSink::new();
        std::thread::scope(|scope| {
            for t in 0..4 {
                let sink = &sink;
                scope.spawn(move || {
                    for _ in 0..25 {
                        sink.emit(dropped_rows(&format!("table{t}")));
                    }
                });
            }
        });
        assert_eq!(sink.warning_count(), 100);
        assert_eq!(sink.diagnostics().len(), 100);
    }
}
