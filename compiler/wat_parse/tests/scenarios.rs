//! Scenario-level integration tests: each case exercises the Grammar
//! Engine end to end, from raw source text through `wat_lexer::lex`
//! into a structurally resolved `Module`/`Script`, the way an embedder
//! actually calls this crate rather than unit-testing one stage at a
//! time.

use pretty_assertions::assert_eq;
use wat_diagnostic::{CollectingReporter, DiagnosticQueue};
use wat_ir::{BinaryOp, ConstValue, ExprKind, StringInterner, Var};
use wat_parse::{parse_module, parse_script, ParserOptions};

fn parse_module_ok(source: &str) -> (wat_ir::Module, StringInterner) {
    let tokens = wat_lexer::lex(source);
    let mut interner = StringInterner::new();
    let mut diagnostics = DiagnosticQueue::new(CollectingReporter::default());
    let module = parse_module(&tokens, &mut interner, &mut diagnostics, ParserOptions::default())
        .unwrap_or_else(|()| panic!("unexpected parse errors: {:?}", diagnostics.diagnostics()));
    (module, interner)
}

fn parse_module_err(source: &str) -> Vec<wat_diagnostic::Diagnostic> {
    let tokens = wat_lexer::lex(source);
    let mut interner = StringInterner::new();
    let mut diagnostics = DiagnosticQueue::new(CollectingReporter::default());
    let result = parse_module(&tokens, &mut interner, &mut diagnostics, ParserOptions::default());
    assert!(result.is_err(), "expected parse to fail");
    diagnostics.into_diagnostics()
}

fn parse_script_ok(source: &str) -> (wat_ir::Script, StringInterner) {
    let tokens = wat_lexer::lex(source);
    let mut interner = StringInterner::new();
    let mut diagnostics = DiagnosticQueue::new(CollectingReporter::default());
    let script = parse_script(&tokens, &mut interner, &mut diagnostics, ParserOptions::default())
        .unwrap_or_else(|()| panic!("unexpected parse errors: {:?}", diagnostics.diagnostics()));
    (script, interner)
}

/// S1: a function with two params, one result, and a stack-form body
/// lowers to a flat `[GetLocal, GetLocal, Binary]` expression list with
/// the params left unnamed in the arena (the names only live in
/// `local_bindings`).
#[test]
fn s1_stack_form_function_body() {
    let (module, _interner) = parse_module_ok(
        "(module (func $add (param i32 i32) (result i32) (i32.add (get_local 0) (get_local 1))))",
    );
    assert_eq!(module.funcs.len(), 1);
    let function = &module.funcs[0];
    assert_eq!(function.decl.sig.params.len(), 2);
    assert_eq!(function.decl.sig.results.len(), 1);

    let first = function.first_expr.expect("function body is non-empty");
    let first_node = module.exprs.get(first);
    let kinds: Vec<&ExprKind> = std::iter::successors(Some(first_node), |expr| {
        expr.next.map(|id| module.exprs.get(id))
    })
    .map(|expr| &expr.kind)
    .collect();
    assert_eq!(kinds.len(), 3);
    assert!(matches!(kinds[0], ExprKind::GetLocal(Var::Index(0))));
    assert!(matches!(kinds[1], ExprKind::GetLocal(Var::Index(1))));
    assert!(matches!(kinds[2], ExprKind::Binary(BinaryOp::I32Add)));
}

/// S2: inline memory data sizes the memory to the minimum whole-page
/// count covering the data's byte length, and the synthesized segment's
/// offset is `(i32.const 0)`.
#[test]
fn s2_inline_memory_data_computes_pages_and_offset() {
    let (module, _interner) = parse_module_ok(r#"(module (memory (data "hi")))"#);
    assert_eq!(module.memories.len(), 1);
    assert_eq!(module.memories[0].limits.initial, 1);
    assert_eq!(module.memories[0].limits.max, Some(1));

    assert_eq!(module.datas.len(), 1);
    let segment = &module.datas[0];
    assert_eq!(segment.memory, Var::Index(0));
    assert_eq!(segment.bytes, b"hi");
    let offset_expr = module.exprs.get(segment.offset.first().expect("offset present"));
    assert!(matches!(offset_expr.kind, ExprKind::Const(ConstValue::I32(0))));
}

/// S3: a standalone global import precedes a locally defined global;
/// both land in `globals` in declaration order, but only the first
/// counts toward `num_global_imports`.
#[test]
fn s3_global_import_then_definition() {
    let (module, _interner) = parse_module_ok(
        "(module (import \"env\" \"g\" (global i32)) (global i32 (i32.const 7)))",
    );
    assert_eq!(module.globals.len(), 2);
    assert_eq!(module.num_global_imports, 1);

    let defined = &module.globals[1];
    let init_expr = module.exprs.get(defined.init.first().expect("init present"));
    assert!(matches!(init_expr.kind, ExprKind::Const(ConstValue::I32(7))));
}

/// S4: a table declared with an inline `elem` clause gets sized to the
/// element count, and the synthesized segment's vars stay as unresolved
/// names for a later index-resolution pass.
#[test]
fn s4_inline_table_elem_sizes_table_and_keeps_names() {
    let (module, interner) = parse_module_ok(
        "(module (table funcref (elem $a $b)) (func $a) (func $b))",
    );
    assert_eq!(module.tables.len(), 1);
    assert_eq!(module.tables[0].limits.initial, 2);
    assert_eq!(module.tables[0].limits.max, Some(2));

    assert_eq!(module.elems.len(), 1);
    let segment = &module.elems[0];
    assert_eq!(segment.table, Var::Index(0));
    assert_eq!(segment.elems.len(), 2);
    let names: Vec<&str> = segment
        .elems
        .iter()
        .map(|var| match var {
            Var::Name(name) => interner.resolve(*name),
            Var::Index(_) => panic!("expected unresolved name var"),
        })
        .collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(module.funcs.len(), 2);
}

/// S5: a script's bare `invoke` with no explicit module name binds to
/// the most recently parsed `(module ...)` command's index.
#[test]
fn s5_script_implicit_module_binds_to_latest_module() {
    let (script, _interner) = parse_script_ok(
        r#"(module $m (func (export "two") (result i32) i32.const 1 i32.const 1 i32.add)) (invoke "two")"#,
    );
    assert_eq!(script.commands.len(), 2);
    match &script.commands[1] {
        wat_ir::Command::Action(action) => {
            assert_eq!(action.module_var(), Some(Var::Index(0)));
        }
        _ => panic!("expected a bare Action command"),
    }
}

/// S6: a stack-form `end` carrying a label that does not match the
/// innermost open block's label is a single `LabelMismatch` diagnostic,
/// not one per mismatched token.
#[test]
fn s6_mismatched_end_label_is_one_diagnostic() {
    let diagnostics = parse_module_err(
        "(module (func (result i32) block $l (result i32) br $l end $l2))",
    );
    assert_eq!(diagnostics.len(), 1, "diagnostics: {diagnostics:?}");
}

/// S7: the same expression written in stack form and in folded form
/// lower to identical `ExprKind` sequences (spec §4.2's "N operands then
/// operator" equivalence).
#[test]
fn s7_stack_and_folded_forms_are_equivalent() {
    let (stack_module, _i1) = parse_module_ok(
        "(module (func (param i32 i32) (result i32) get_local 0 get_local 1 i32.add))",
    );
    let (folded_module, _i2) = parse_module_ok(
        "(module (func (param i32 i32) (result i32) (i32.add (get_local 0) (get_local 1))))",
    );

    let kinds_of = |module: &wat_ir::Module| -> Vec<String> {
        let first = module.funcs[0].first_expr.expect("body present");
        let mut out = Vec::new();
        let mut cursor = Some(first);
        while let Some(id) = cursor {
            let expr = module.exprs.get(id);
            out.push(format!("{:?}", expr.kind));
            cursor = expr.next;
        }
        out
    };
    assert_eq!(kinds_of(&stack_module), kinds_of(&folded_module));
}

/// S8: a text data segment's byte escapes decode to the exact raw bytes,
/// including a control byte, a high byte, and an escaped backslash and
/// quote.
#[test]
fn s8_data_segment_escape_round_trip() {
    let (module, _interner) = parse_module_ok(r#"(module (memory 1) (data (i32.const 0) "\00\ff\\\""))"#);
    assert_eq!(module.datas.len(), 1);
    assert_eq!(module.datas[0].bytes, vec![0x00, 0xff, b'\\', b'"']);
}

/// S9: explicit `(memory 1 2)` limits are taken literally; omitting the
/// max leaves it `None` rather than defaulting to the initial value.
#[test]
fn s9_explicit_memory_limits_preserve_optional_max() {
    let (bounded, _i1) = parse_module_ok("(module (memory 1 2))");
    assert_eq!(bounded.memories[0].limits.initial, 1);
    assert_eq!(bounded.memories[0].limits.max, Some(2));

    let (unbounded, _i2) = parse_module_ok("(module (memory 1))");
    assert_eq!(unbounded.memories[0].limits.initial, 1);
    assert_eq!(unbounded.memories[0].limits.max, None);
}

/// S10: an `assert_return` wrapping an action with an explicit module
/// name is left untouched by the Script Composer; only the implicit
/// (unnamed) references get rewritten to an index.
#[test]
fn s10_explicit_module_name_reference_is_untouched() {
    let (script, _interner) = parse_script_ok(
        r#"(module $named (func (export "one") (result i32) i32.const 1))
           (assert_return (invoke $named "one") (i32.const 1))"#,
    );
    assert_eq!(script.commands.len(), 2);
    match &script.commands[1] {
        wat_ir::Command::AssertReturn { action, .. } => {
            assert!(matches!(action.module_var(), Some(Var::Name(_))));
        }
        _ => panic!("expected AssertReturn"),
    }
}

/// Boundary: the widest unsigned 64-bit natural number literal is
/// accepted rather than rejected as out of range.
#[test]
fn boundary_max_u64_nat_literal_accepted() {
    let (module, _interner) = parse_module_ok("(module (memory 0xFFFFFFFFFFFFFFFF))");
    assert_eq!(module.memories[0].limits.initial, u64::MAX);
}

/// Boundary: a memory access alignment must be a power of two; `align=3`
/// is rejected, `align=4` is accepted.
#[test]
fn boundary_non_power_of_two_align_is_rejected() {
    let diagnostics = parse_module_err(
        "(module (memory 1) (func (drop (i32.load align=3 (i32.const 0)))))",
    );
    assert!(!diagnostics.is_empty());
}

#[test]
fn boundary_power_of_two_align_is_accepted() {
    let (module, _interner) = parse_module_ok(
        "(module (memory 1) (func (drop (i32.load align=4 (i32.const 0)))))",
    );
    assert_eq!(module.funcs.len(), 1);
}

/// Invariant: imports of a kind must all precede that kind's locally
/// defined entries; a definition followed by an import of the same kind
/// is rejected.
#[test]
fn invariant_import_after_definition_is_rejected() {
    let diagnostics = parse_module_err(
        r#"(module (global i32 (i32.const 0)) (import "env" "g" (global i32)))"#,
    );
    assert!(!diagnostics.is_empty());
}

/// Invariant: an anonymous type-use signature shared by two functions is
/// synthesized exactly once and both functions reference the same type
/// index.
#[test]
fn invariant_anonymous_type_use_is_deduped_across_functions() {
    let (module, _interner) =
        parse_module_ok("(module (func (param i32) (result i32) (unreachable)) (func (param i32) (result i32) (unreachable)))");
    assert_eq!(module.func_types.len(), 1);
}
