//! `wat_parse` — the Grammar Engine and IR Builder for the WebAssembly
//! text format (spec §1 OVERVIEW): turns a token stream into a
//! structurally valid `wat_ir::Module` (a single `.wat` file) or
//! `wat_ir::Script` (a `.wast` test script), ready for a downstream
//! phase to perform name resolution against the numeric index space,
//! validation, and binary encoding.
//!
//! The crate is organized around the pipeline spec §4 names each stage
//! after: a [`cursor::Cursor`] feeds the [`grammar`] recursive-descent
//! reader, which builds a [`wat_ir::Module`] via the Field Assembler
//! ([`field_assembler`]) and Name Binder ([`binder`]); [`type_use`]
//! resolves function signatures once the whole module is in hand;
//! [`script_composer`] resolves a script's implicit module references;
//! and [`binary_reader`] is the external-collaborator boundary a
//! `binary`/`quote` raw module crosses to become text IR.

mod binder;
pub mod binary_reader;
mod cursor;
mod error;
mod field_assembler;
pub mod grammar;
mod literal;
mod script_composer;
mod type_use;

pub use binary_reader::{BinaryReadError, BinaryReadOptions, BinaryReader, Relexer, UnsupportedBinaryReader};
pub use cursor::Cursor;
pub use grammar::{ParserOptions, TypeUse};
pub use literal::LiteralError;
pub use script_composer::resolve_module_refs;
pub use type_use::resolve_type_uses;

use wat_diagnostic::{DiagnosticQueue, Reporter};
use wat_ir::{Module, Script, StringInterner};
use wat_lexer_core::{Token, TokenKind};

/// Parse a single `.wat` file's tokens into a structurally valid
/// `Module` (spec §4.1 step 1: "parse a standalone module"). Returns
/// `Err` iff the diagnostic queue recorded at least one error (spec §7).
pub fn parse_module<R: Reporter>(
    tokens: &[Token],
    interner: &mut StringInterner,
    diagnostics: &mut DiagnosticQueue<R>,
    options: ParserOptions,
) -> Result<Module, ()> {
    let cursor = Cursor::new(tokens);
    let mut parser = grammar::Parser::new(cursor, interner, diagnostics, options);
    if !(parser.expect_lparen() && parser.expect_kind(&TokenKind::Module)) {
        return Err(());
    }
    let name = binder::eat_optional_name(&mut parser.cursor, parser.interner);
    let mut module = grammar::parse_module_fields(&mut parser);
    module.name = name;
    if !parser.expect_rparen() {
        parser.recover_to_matching_rparen();
    }
    resolve_type_uses(&mut module);
    if diagnostics.has_errors() {
        Err(())
    } else {
        Ok(module)
    }
}

/// Parse a `.wast` test script's tokens into a `Script` (spec §4.7): a
/// sequence of top-level commands, each with its implicit module
/// reference resolved (spec §4.7 C11). Raw `binary`/`quote` modules are
/// left undispatched — call [`binary_reader::dispatch_raw_modules`]
/// afterward with the embedder's external readers if the script
/// contains any (spec §6).
pub fn parse_script<R: Reporter>(
    tokens: &[Token],
    interner: &mut StringInterner,
    diagnostics: &mut DiagnosticQueue<R>,
    options: ParserOptions,
) -> Result<Script, ()> {
    let cursor = Cursor::new(tokens);
    let mut parser = grammar::Parser::new(cursor, interner, diagnostics, options);
    let mut script = grammar::parse_commands(&mut parser);
    for command in &mut script.commands {
        if let wat_ir::Command::Module(wat_ir::RawModule::Text(module)) = command {
            resolve_type_uses(module);
        }
    }
    resolve_module_refs(&mut script);
    if diagnostics.has_errors() {
        Err(())
    } else {
        Ok(script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wat_diagnostic::{CollectingReporter, DiagnosticQueue};
    use wat_lexer::lex;

    fn parse_ok(source: &str) -> Module {
        let tokens = lex(source);
        let mut interner = StringInterner::new();
        let mut diagnostics = DiagnosticQueue::new(CollectingReporter::default());
        parse_module(&tokens, &mut interner, &mut diagnostics, ParserOptions::default())
            .unwrap_or_else(|()| panic!("unexpected parse errors: {:?}", diagnostics.diagnostics()))
    }

    #[test]
    fn parses_empty_module() {
        let module = parse_ok("(module)");
        assert_eq!(module.funcs.len(), 0);
    }

    #[test]
    fn parses_function_with_params_and_body() {
        let module = parse_ok(
            "(module (func $add (param $a i32) (param $b i32) (result i32) get_local 0 get_local 1 i32.add))",
        );
        assert_eq!(module.funcs.len(), 1);
        let function = &module.funcs[0];
        assert_eq!(function.decl.sig.params.len(), 2);
        assert_eq!(function.decl.sig.results.len(), 1);
        assert!(function.first_expr.is_some());
    }

    #[test]
    fn inline_export_resolves_to_fresh_index() {
        let module = parse_ok(r#"(module (func $f (export "run") (result i32) i32.const 0))"#);
        assert_eq!(module.exports.len(), 1);
        assert_eq!(module.exports[0].name, "run");
        assert_eq!(module.exports[0].var, wat_ir::Var::Index(0));
    }

    #[test]
    fn inline_import_registers_as_import_not_definition() {
        let module = parse_ok(r#"(module (func $f (import "env" "f") (param i32)))"#);
        assert_eq!(module.funcs.len(), 1);
        assert_eq!(module.imports.len(), 1);
        assert_eq!(module.num_func_imports, 1);
    }

    #[test]
    fn memory_with_inline_data_computes_page_count() {
        let module = parse_ok(r#"(module (memory (data "abc")))"#);
        assert_eq!(module.memories.len(), 1);
        assert_eq!(module.memories[0].limits.initial, 1);
        assert_eq!(module.datas.len(), 1);
        assert_eq!(module.datas[0].bytes, b"abc");
    }

    #[test]
    fn anonymous_type_use_is_synthesized_and_deduped() {
        let module = parse_ok("(module (func (param i32)) (func (param i32)))");
        assert_eq!(module.func_types.len(), 1);
    }

    #[test]
    fn script_resolves_implicit_module_reference() {
        let tokens = lex(r#"(module (func (export "f") (result i32) i32.const 1)) (assert_return (invoke "f") (i32.const 1))"#);
        let mut interner = StringInterner::new();
        let mut diagnostics = DiagnosticQueue::new(CollectingReporter::default());
        let script = parse_script(&tokens, &mut interner, &mut diagnostics, ParserOptions::default())
            .unwrap_or_else(|()| panic!("unexpected parse errors: {:?}", diagnostics.diagnostics()));
        assert_eq!(script.commands.len(), 2);
        match &script.commands[1] {
            wat_ir::Command::AssertReturn { action, .. } => {
                assert_eq!(action.module_var(), Some(wat_ir::Var::Index(0)));
            }
            _ => panic!("expected AssertReturn"),
        }
    }
}
