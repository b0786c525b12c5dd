//! Inline Expander (spec §4.4 C8): the surface sugar shared by every
//! module-field kind — `(export "x")` clauses attached directly to a
//! func/table/memory/global declaration, and the optional `(import "m"
//! "n")` clause that turns the same declaration into an import instead
//! of a definition.
//!
//! Kept separate from `fields.rs`/`func.rs` because every one of the
//! four declarable kinds repeats the identical "zero or more inline
//! exports, then an optional inline import" prefix (spec §4.4: "Symmetric
//! expansions apply to Table, Memory, Global inline exports").

use wat_diagnostic::Reporter;
use wat_ir::{ExternalKind, Module, Span, StringInterner, Var};
use wat_lexer_core::TokenKind;

use super::Parser;
use crate::literal;

/// Parse zero or more leading `(export "name")` clauses, returning their
/// unescaped text in source order. The field's own index (known only
/// once the definition/import itself has been appended) is patched in
/// by the caller via [`append_inline_exports`].
pub fn parse_inline_exports<R: Reporter>(p: &mut Parser<'_, R>) -> Vec<String> {
    let mut names = Vec::new();
    while p.cursor.check(&TokenKind::ParenOpen)
        && matches!(p.cursor.peek_kind_at(1), TokenKind::Export)
    {
        p.cursor.advance();
        p.cursor.advance();
        names.push(parse_export_name(p));
        if !p.expect_rparen() {
            p.recover_to_matching_rparen();
        }
    }
    names
}

pub fn parse_export_name<R: Reporter>(p: &mut Parser<'_, R>) -> String {
    let span = p.cursor.current_span();
    if !p.cursor.check(&TokenKind::Text) {
        p.report_unexpected(&["string literal"]);
        return String::new();
    }
    let lexeme = p.cursor.advance().lexeme.clone();
    match literal::parse_text_bytes(&lexeme) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => {
            p.diagnostics.report(crate::error::malformed_literal(&lexeme, span));
            String::new()
        }
    }
}

/// Parse an optional leading `(import "module" "field")` clause.
pub fn parse_inline_import<R: Reporter>(p: &mut Parser<'_, R>) -> Option<(String, String)> {
    if !(p.cursor.check(&TokenKind::ParenOpen)
        && matches!(p.cursor.peek_kind_at(1), TokenKind::Import))
    {
        return None;
    }
    p.cursor.advance();
    p.cursor.advance();
    let module = parse_export_name(p);
    let field = parse_export_name(p);
    if !p.expect_rparen() {
        p.recover_to_matching_rparen();
    }
    Some((module, field))
}

/// Append one `Export` module field pointing at `index` for each name
/// collected by [`parse_inline_exports`] — the export's `Var` is resolved
/// to the field's own index immediately (spec §8 invariant 6: "with the
/// export's Var resolved to the function's index"), since inline sugar
/// never needs the two-phase resolution a standalone `(export ...)`
/// field would (its target might not exist yet).
pub fn append_inline_exports(
    module: &mut Module,
    interner: &mut StringInterner,
    names: Vec<String>,
    kind: ExternalKind,
    index: u32,
    span: Span,
) {
    for name in names {
        let export_index = u32::try_from(module.exports.len()).unwrap_or(u32::MAX);
        let name_interned = interner.intern(&name);
        module.exports.push(wat_ir::Export {
            name: name.clone(),
            kind,
            var: Var::Index(u64::from(index)),
        });
        module.export_bindings.bind(name_interned, export_index);
        module.fields.push(wat_ir::ModuleField {
            kind: wat_ir::ModuleFieldKind::Export(export_index as usize),
            span,
        });
    }
}
