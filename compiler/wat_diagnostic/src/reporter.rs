//! The Error Handler external collaborator (spec §6) and the parser-side
//! bookkeeping built on top of it.

use crate::{Diagnostic, ErrorGuaranteed, Severity};

/// Spec §6's consumed "Error Handler" interface: `on_error(location,
/// severity, message)`, generalized here to take a full `Diagnostic` so
/// callers don't have to re-derive severity/location/message from
/// scratch at every call site. The handler "returns nothing; the parser
/// continues" (spec §6) — reporting never short-circuits by itself.
pub trait Reporter {
    fn on_error(&mut self, diagnostic: Diagnostic);
}

/// The grammar engine's per-parse error tally (spec §4.1, §7): "every
/// lexer error and every semantic action failure reported through the
/// Reporter counts toward a per-parse error tally. The parse returns Err
/// iff the tally is non-zero or a fatal stack-growth error occurred."
///
/// Wraps any `Reporter` and is itself one, so it composes with a
/// terminal/JSON emitter underneath while still being the thing
/// `wat_parse` consults to decide `Ok`/`Err`.
pub struct DiagnosticQueue<R> {
    inner: R,
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    fatal: bool,
}

impl<R: Reporter> DiagnosticQueue<R> {
    pub fn new(inner: R) -> Self {
        DiagnosticQueue {
            inner,
            diagnostics: Vec::new(),
            error_count: 0,
            fatal: false,
        }
    }

    /// Report a diagnostic and, if it is an error, return the proof
    /// token. Warnings/notes still forward to the handler but do not
    /// produce an `ErrorGuaranteed` (only an `Error`-severity report
    /// counts toward the tally, per spec §7).
    pub fn report(&mut self, diagnostic: Diagnostic) -> Option<ErrorGuaranteed> {
        let is_error = diagnostic.is_error();
        if is_error {
            self.error_count += 1;
        }
        self.diagnostics.push(diagnostic.clone());
        self.inner.on_error(diagnostic);
        if is_error {
            Some(ErrorGuaranteed::new())
        } else {
            None
        }
    }

    /// Record a memory-exhaustion failure (spec §4.1 step 3, §7): this
    /// aborts the current parse regardless of the error tally.
    pub fn report_fatal(&mut self, diagnostic: Diagnostic) -> ErrorGuaranteed {
        self.fatal = true;
        self.report(diagnostic)
            .unwrap_or_else(ErrorGuaranteed::new)
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn is_fatal(&self) -> bool {
        self.fatal
    }

    /// Whether the overall parse must return `Err` (spec §7: "iff any
    /// error was reported").
    pub fn has_errors(&self) -> bool {
        self.fatal || self.error_count > 0
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

/// A `Reporter` that only collects diagnostics (no I/O), for tests and
/// for callers that want to render output themselves.
#[derive(Default)]
pub struct CollectingReporter {
    pub diagnostics: Vec<Diagnostic>,
}

impl Reporter for CollectingReporter {
    fn on_error(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

/// A `Reporter` that discards everything. Useful when a caller only
/// cares about the `DiagnosticQueue`'s own collected copy.
#[derive(Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn on_error(&mut self, _diagnostic: Diagnostic) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use wat_ir::Span;

    #[test]
    fn reporting_error_increments_tally_and_yields_guarantee() {
        let mut queue = DiagnosticQueue::new(NullReporter);
        assert!(!queue.has_errors());
        let guarantee = queue.report(Diagnostic::error(ErrorKind::Syntactic, "boom", Span::DUMMY));
        assert!(guarantee.is_some());
        assert_eq!(queue.error_count(), 1);
        assert!(queue.has_errors());
    }

    #[test]
    fn reporting_warning_does_not_increment_tally() {
        let mut queue = DiagnosticQueue::new(NullReporter);
        let diag = Diagnostic::new(ErrorKind::Syntactic, Severity::Warning, "heads up", Span::DUMMY);
        let guarantee = queue.report(diag);
        assert!(guarantee.is_none());
        assert_eq!(queue.error_count(), 0);
        assert!(!queue.has_errors());
    }

    #[test]
    fn fatal_report_marks_has_errors_even_with_zero_tally() {
        let mut queue = DiagnosticQueue::new(NullReporter);
        queue.report_fatal(Diagnostic::error(ErrorKind::MemoryExhaustion, "oom", Span::DUMMY));
        assert!(queue.has_errors());
    }

    #[test]
    fn collecting_reporter_forwards_is_error() {
        let mut reporter = CollectingReporter::default();
        reporter.on_error(Diagnostic::error(ErrorKind::Lexical, "bad byte", Span::DUMMY));
        assert_eq!(reporter.diagnostics.len(), 1);
    }
}
