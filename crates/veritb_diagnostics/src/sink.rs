//! Thread-safe record accumulator shared by the components of a run.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A thread-safe accumulator for records emitted during a run.
///
/// Components emit records concurrently via [`emit`](Self::emit). The error
/// and warning counts are tracked atomically so they can be read without
/// locking the record vector.
#[derive(Debug)]
pub struct DiagnosticSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
    error_count: AtomicUsize,
    warning_count: AtomicUsize,
}

impl DiagnosticSink {
    /// Creates a new empty sink.
    pub fn new() -> Self {
        Self {
            diagnostics: Mutex::new(Vec::new()),
            error_count: AtomicUsize::new(0),
            warning_count: AtomicUsize::new(0),
        }
    }

    /// Emits a record into the sink.
    pub fn emit(&self, diag: Diagnostic) {
        match diag.severity {
            Severity::Error => {
                self.error_count.fetch_add(1, Ordering::Relaxed);
            }
            Severity::Warning => {
                self.warning_count.fetch_add(1, Ordering::Relaxed);
            }
            Severity::Info => {}
        }
        let mut diagnostics = self.diagnostics.lock().unwrap();
        diagnostics.push(diag);
    }

    /// Returns the number of error-severity records emitted so far.
    pub fn error_count(&self) -> usize {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Returns the number of warning-severity records emitted so far.
    pub fn warning_count(&self) -> usize {
        self.warning_count.load(Ordering::Relaxed)
    }

    /// Returns a snapshot of all accumulated records without draining.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let diagnostics = self.diagnostics.lock().unwrap();
        diagnostics.clone()
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::DiagnosticCode;

    fn make_error() -> Diagnostic {
        Diagnostic::error(DiagnosticCode::CHECK_MISMATCH, "env.scoreboard", "mismatch")
    }

    fn make_info() -> Diagnostic {
        Diagnostic::info(DiagnosticCode::CHECK_PASSED, "env.scoreboard", "match")
    }

    #[test]
    fn empty_sink() {
        let sink = DiagnosticSink::new();
        assert_eq!(sink.error_count(), 0);
        assert_eq!(sink.warning_count(), 0);
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn emit_error() {
        let sink = DiagnosticSink::new();
        sink.emit(make_error());
        assert_eq!(sink.error_count(), 1);
    }

    #[test]
    fn emit_info_not_error() {
        let sink = DiagnosticSink::new();
        sink.emit(make_info());
        assert_eq!(sink.error_count(), 0);
        assert_eq!(sink.warning_count(), 0);
        assert_eq!(sink.diagnostics().len(), 1);
    }

    #[test]
    fn counts_warnings_separately() {
        let sink = DiagnosticSink::new();
        sink.emit(make_error());
        sink.emit(Diagnostic::warning(
            DiagnosticCode::SETTING_IGNORED,
            "adder",
            "stimulus.seed is ignored",
        ));
        sink.emit(make_info());
        assert_eq!(sink.error_count(), 1);
        assert_eq!(sink.warning_count(), 1);
        assert_eq!(sink.diagnostics().len(), 3);
    }

    #[test]
    fn preserves_emission_order() {
        let sink = DiagnosticSink::new();
        for i in 0..5 {
            sink.emit(Diagnostic::info(
                DiagnosticCode::CHECK_PASSED,
                "env.scoreboard",
                format!("check {i}"),
            ));
        }
        let messages: Vec<_> = sink.diagnostics().into_iter().map(|d| d.message).collect();
        assert_eq!(messages, ["check 0", "check 1", "check 2", "check 3", "check 4"]);
    }

    #[test]
    fn thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let sink = Arc::new(DiagnosticSink::new());
        let mut handles = Vec::new();

        for _ in 0..8 {
            let sink = Arc::clone(&sink);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    sink.emit(make_error());
                }
            }));
        }

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(sink.error_count(), 800);
        assert_eq!(sink.diagnostics().len(), 800);
    }
}
