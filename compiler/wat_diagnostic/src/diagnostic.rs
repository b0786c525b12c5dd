//! Structured diagnostics (spec §6 Error Handler payload, §7 taxonomy).

use crate::ErrorKind;
use wat_ir::Span;

/// Severity level. This core only ever emits `Error` (spec §6: "Severity
/// is 'error' for this core"); `Warning`/`Note` are carried because the
/// spec explicitly reserves them for future extensions and the emitter
/// needs to already know how to render them.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
        };
        f.write_str(s)
    }
}

/// A labeled span with a message, attached to a `Diagnostic` for extra
/// context (e.g. "begin label here" alongside a label-mismatch error).
#[derive(Clone, Debug)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

impl Label {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
        }
    }
}

/// One reported problem. Carries enough structure for a terminal emitter
/// to render source context, and enough identity (`kind`, primary
/// `span`) for tests to assert on without string-matching the message.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub severity: Severity,
    pub message: String,
    pub span: Span,
    pub labels: Vec<Label>,
    /// Which source this diagnostic came from — a filename, or `None`
    /// for the top-level script buffer. Lets a multi-module script
    /// (spec §4.7) attribute diagnostics to the right module when
    /// several are parsed in one run (`SPEC_FULL.md` ambient-stack
    /// supplement).
    pub source_name: Option<String>,
}

impl Diagnostic {
    pub fn new(kind: ErrorKind, severity: Severity, message: impl Into<String>, span: Span) -> Self {
        Diagnostic {
            kind,
            severity,
            message: message.into(),
            span,
            labels: Vec::new(),
            source_name: None,
        }
    }

    pub fn error(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Diagnostic::new(kind, Severity::Error, message, span)
    }

    #[must_use]
    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    #[must_use]
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Syntactic diagnostic helper: "unexpected token, expected one of …"
/// (spec §7 "message lists the unexpected token and up to four expected
/// kinds").
pub fn unexpected_token(found: &str, expected: &[&str], span: Span) -> Diagnostic {
    let expected_list = if expected.is_empty() {
        String::new()
    } else {
        let shown: Vec<&str> = expected.iter().take(4).copied().collect();
        format!(", expected one of: {}", shown.join(", "))
    };
    Diagnostic::error(
        ErrorKind::Syntactic,
        format!("unexpected token `{found}`{expected_list}"),
        span,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use wat_ir::Position;

    #[test]
    fn unexpected_token_caps_expected_list_at_four() {
        let span = Span::point(Position::START);
        let diag = unexpected_token("foo", &["a", "b", "c", "d", "e"], span);
        assert!(diag.message.contains("a, b, c, d"));
        assert!(!diag.message.contains(", e"));
    }
}
