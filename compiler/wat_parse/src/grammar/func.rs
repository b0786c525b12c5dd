//! Function field grammar (spec §4.5 C9, §4.6 C10): `(func $id? export*
//! import? type-use local* instr*)`. Kept apart from `fields.rs` because
//! a function body is the only place the Expression Builder's local
//! namespace (`params ⧺ locals`) comes into play.

use rustc_hash::FxHashMap;
use wat_diagnostic::Reporter;
use wat_ir::{
    ExprList, ExternalKind, FuncDecl, FuncSig, Function, Import, ImportDesc, Module, ModuleField,
    ModuleFieldKind, Name, Span, ValType, Var,
};
use wat_lexer_core::TokenKind;

use super::inline;
use super::instr;
use super::types;
use super::Parser;
use crate::binder::{bind_if_named, eat_optional_name};
use crate::field_assembler::FieldAssembler;

/// Parse `(type $id)? (param ...)* (result ...)*`, the way `func`
/// specifically needs it: unlike a bare type-use (spec §4.6), a
/// function's own inline params carry per-param names that must be
/// recorded into the local namespace (spec §4.5), so this keeps its own
/// param loop instead of delegating to `types::parse_type_use`, which
/// discards names.
fn parse_func_type_use<R: Reporter>(
    p: &mut Parser<'_, R>,
) -> (bool, Option<Var>, FuncSig, Vec<Option<Name>>) {
    let mut has_func_type = false;
    let mut type_use = None;
    if p.cursor.check(&TokenKind::ParenOpen) && matches!(p.cursor.peek_kind_at(1), TokenKind::TypeKw) {
        p.cursor.advance();
        p.cursor.advance();
        has_func_type = true;
        type_use = Some(instr::parse_var(p));
        if !p.expect_rparen() {
            p.recover_to_matching_rparen();
        }
    }

    let mut param_names = Vec::new();
    let mut params = Vec::new();
    while p.cursor.check(&TokenKind::ParenOpen) && matches!(p.cursor.peek_kind_at(1), TokenKind::Param) {
        p.cursor.advance();
        p.cursor.advance();
        let name = eat_optional_name(&mut p.cursor, p.interner);
        if let Some(name) = name {
            let ty = match p.cursor.current_kind().clone() {
                TokenKind::ValueType(ty) => {
                    p.cursor.advance();
                    ty
                }
                _ => {
                    p.report_unexpected(&["value type"]);
                    ValType::I32
                }
            };
            param_names.push(Some(name));
            params.push(ty);
        } else {
            while let TokenKind::ValueType(ty) = p.cursor.current_kind().clone() {
                p.cursor.advance();
                param_names.push(None);
                params.push(ty);
            }
        }
        if !p.expect_rparen() {
            p.recover_to_matching_rparen();
        }
    }

    let results = types::parse_result_list(p);
    (has_func_type, type_use, FuncSig::new(params, results), param_names)
}

/// Parse zero or more `(local $id? ty)` clauses, binding each named one
/// into `local_bindings` at its `params ⧺ locals`-relative index.
fn parse_locals<R: Reporter>(
    p: &mut Parser<'_, R>,
    num_params: u32,
    local_bindings: &mut FxHashMap<Name, u32>,
) -> Vec<(Option<Name>, ValType)> {
    let mut locals = Vec::new();
    while p.cursor.check(&TokenKind::ParenOpen) && matches!(p.cursor.peek_kind_at(1), TokenKind::Local) {
        p.cursor.advance();
        p.cursor.advance();
        let name = eat_optional_name(&mut p.cursor, p.interner);
        if let Some(name) = name {
            let ty = match p.cursor.current_kind().clone() {
                TokenKind::ValueType(ty) => {
                    p.cursor.advance();
                    ty
                }
                _ => {
                    p.report_unexpected(&["value type"]);
                    ValType::I32
                }
            };
            let index = num_params + locals.len() as u32;
            local_bindings.insert(name, index);
            locals.push((Some(name), ty));
        } else {
            while let TokenKind::ValueType(ty) = p.cursor.current_kind().clone() {
                p.cursor.advance();
                locals.push((None, ty));
            }
        }
        if !p.expect_rparen() {
            p.recover_to_matching_rparen();
        }
    }
    locals
}

fn bind_params(local_bindings: &mut FxHashMap<Name, u32>, param_names: &[Option<Name>]) {
    for (index, name) in param_names.iter().enumerate() {
        if let Some(name) = name {
            local_bindings.insert(*name, index as u32);
        }
    }
}

/// `(func $id? export* import? type-use local* instr*)` (spec §3
/// "Function").
pub fn parse_func_field<R: Reporter>(
    p: &mut Parser<'_, R>,
    module: &mut Module,
    assembler: &mut FieldAssembler,
    lparen: Span,
) {
    let name = eat_optional_name(&mut p.cursor, p.interner);
    let export_names = inline::parse_inline_exports(p);

    if let Some((import_module, import_field)) = inline::parse_inline_import(p) {
        assembler.check_import(ExternalKind::Func, lparen, p.diagnostics);
        let (has_func_type, type_use, sig, param_names) = parse_func_type_use(p);
        let decl = FuncDecl { has_func_type, type_use, sig };
        let index = u32::try_from(module.funcs.len()).unwrap_or(u32::MAX);
        module.funcs.push(Function {
            name,
            decl: decl.clone(),
            params: param_names,
            locals: Vec::new(),
            first_expr: None,
            local_bindings: FxHashMap::default(),
        });
        module.num_func_imports += 1;
        bind_if_named(&mut module.func_bindings, name, index);
        module.imports.push(Import {
            module: import_module,
            field: import_field,
            desc: ImportDesc::Func(decl),
        });
        let import_index = module.imports.len() - 1;
        module.fields.push(ModuleField {
            kind: ModuleFieldKind::Import(import_index),
            span: lparen,
        });
        inline::append_inline_exports(module, p.interner, export_names, ExternalKind::Func, index, lparen);
        if !p.expect_rparen() {
            p.recover_to_matching_rparen();
        }
        return;
    }

    let (has_func_type, type_use, sig, param_names) = parse_func_type_use(p);
    let num_params = sig.params.len() as u32;
    let decl = FuncDecl { has_func_type, type_use, sig };

    let index = u32::try_from(module.funcs.len()).unwrap_or(u32::MAX);
    assembler.record_definition(ExternalKind::Func, lparen);
    bind_if_named(&mut module.func_bindings, name, index);

    let mut local_bindings = FxHashMap::default();
    bind_params(&mut local_bindings, &param_names);
    let locals = parse_locals(p, num_params, &mut local_bindings);

    let mut body = ExprList::EMPTY;
    instr::parse_instr_sequence_folded_body(p, &mut module.exprs, &mut body);

    module.funcs.push(Function {
        name,
        decl,
        params: param_names,
        locals,
        first_expr: body.first(),
        local_bindings,
    });
    module.fields.push(ModuleField {
        kind: ModuleFieldKind::Func(index as usize),
        span: lparen,
    });
    inline::append_inline_exports(module, p.interner, export_names, ExternalKind::Func, index, lparen);
    if !p.expect_rparen() {
        p.recover_to_matching_rparen();
    }
}
