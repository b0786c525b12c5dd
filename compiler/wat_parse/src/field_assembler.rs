//! Field Assembler (spec §4.4 C7): appends parsed fields to a `Module`'s
//! declaration-order field list and per-kind vectors, and enforces the
//! "imports precede all non-import definitions of the same kind"
//! invariant (spec §8 invariant 2).

use wat_diagnostic::{DiagnosticQueue, Reporter};
use wat_ir::{ExternalKind, Module, ModuleField, ModuleFieldKind, Span};

use crate::error::import_ordering;

/// Per-kind "first non-import definition" spans, used only to attach a
/// helpful label to a later out-of-order import; the module's own
/// `num_*_imports` counters are the source of truth for the check
/// itself.
#[derive(Default)]
pub struct FieldAssembler {
    first_definition_span: [Option<Span>; 4],
}

fn kind_slot(kind: ExternalKind) -> usize {
    match kind {
        ExternalKind::Func => 0,
        ExternalKind::Table => 1,
        ExternalKind::Memory => 2,
        ExternalKind::Global => 3,
    }
}

fn kind_name(kind: ExternalKind) -> &'static str {
    match kind {
        ExternalKind::Func => "func",
        ExternalKind::Table => "table",
        ExternalKind::Memory => "memory",
        ExternalKind::Global => "global",
    }
}

impl FieldAssembler {
    pub fn new() -> Self {
        FieldAssembler::default()
    }

    pub fn push_field(&self, module: &mut Module, kind: ModuleFieldKind, span: Span) {
        module.fields.push(ModuleField { kind, span });
    }

    /// Call before recording an import of `kind`. Reports and returns
    /// `false` if a non-import definition of that kind already exists;
    /// the caller still records the import (best-effort recovery).
    pub fn check_import<R: Reporter>(
        &mut self,
        kind: ExternalKind,
        span: Span,
        diagnostics: &mut DiagnosticQueue<R>,
    ) -> bool {
        if let Some(definition_span) = self.first_definition_span[kind_slot(kind)] {
            diagnostics.report(import_ordering(kind_name(kind), span, definition_span));
            return false;
        }
        true
    }

    /// Call after recording a non-import definition of `kind`, so a
    /// later out-of-order import can point back at it.
    pub fn record_definition(&mut self, kind: ExternalKind, span: Span) {
        let slot = kind_slot(kind);
        if self.first_definition_span[slot].is_none() {
            self.first_definition_span[slot] = Some(span);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wat_diagnostic::NullReporter;
    use wat_ir::Position;

    #[test]
    fn import_after_definition_is_rejected() {
        let mut assembler = FieldAssembler::new();
        let def_span = Span::point(Position::new(1, 1));
        assembler.record_definition(ExternalKind::Func, def_span);

        let mut queue = DiagnosticQueue::new(NullReporter);
        let ok = assembler.check_import(
            ExternalKind::Func,
            Span::point(Position::new(2, 1)),
            &mut queue,
        );
        assert!(!ok);
        assert!(queue.has_errors());
    }

    #[test]
    fn import_before_any_definition_is_accepted() {
        let mut assembler = FieldAssembler::new();
        let mut queue = DiagnosticQueue::new(NullReporter);
        let ok = assembler.check_import(ExternalKind::Func, Span::DUMMY, &mut queue);
        assert!(ok);
        assert!(!queue.has_errors());
    }

    #[test]
    fn different_kinds_are_independent() {
        let mut assembler = FieldAssembler::new();
        assembler.record_definition(ExternalKind::Func, Span::DUMMY);
        let mut queue = DiagnosticQueue::new(NullReporter);
        let ok = assembler.check_import(ExternalKind::Table, Span::DUMMY, &mut queue);
        assert!(ok);
    }
}
