//! Diagnostic builders for the error kinds beyond the generic
//! "unexpected token" helper `wat_diagnostic` already provides (spec §7).

use wat_diagnostic::{Diagnostic, ErrorKind, Label};
use wat_ir::Span;

pub fn out_of_range_literal(lexeme: &str, type_name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(
        ErrorKind::OutOfRangeLiteral,
        format!("literal `{lexeme}` does not fit in `{type_name}`"),
        span,
    )
}

pub fn malformed_literal(lexeme: &str, span: Span) -> Diagnostic {
    Diagnostic::error(
        ErrorKind::OutOfRangeLiteral,
        format!("malformed numeric literal `{lexeme}`"),
        span,
    )
}

pub fn label_mismatch(begin: &str, end: &str, begin_span: Span, end_span: Span) -> Diagnostic {
    Diagnostic::error(
        ErrorKind::LabelMismatch,
        format!("mismatched label: expected `${begin}`, found `${end}`"),
        end_span,
    )
    .with_label(Label::new(begin_span, "begin label here"))
}

pub fn unexpected_label(end: &str, span: Span) -> Diagnostic {
    Diagnostic::error(
        ErrorKind::UnexpectedLabel,
        format!("end label `${end}` has no matching begin label"),
        span,
    )
}

pub fn import_ordering(kind: &str, span: Span, definition_span: Span) -> Diagnostic {
    Diagnostic::error(
        ErrorKind::ImportOrdering,
        format!("import of kind `{kind}` follows a non-import definition of the same kind"),
        span,
    )
    .with_label(Label::new(definition_span, "earlier definition here"))
}

pub fn binary_submodule_read(reason: &str, span: Span) -> Diagnostic {
    Diagnostic::error(
        ErrorKind::BinarySubmoduleRead,
        format!("failed to read binary module: {reason}"),
        span,
    )
}

pub fn memory_exhaustion(span: Span) -> Diagnostic {
    Diagnostic::error(
        ErrorKind::MemoryExhaustion,
        "parser exceeded the available stack while parsing a deeply nested expression",
        span,
    )
}
