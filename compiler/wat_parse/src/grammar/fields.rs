//! Field Assembler's per-kind grammar (spec §4.4 C7): everything that can
//! appear as a top-level `Module Field` except `func`, which gets its own
//! module (`func.rs`) because its body shares the Expression Builder's
//! local-binding bookkeeping.

use rustc_hash::FxHashMap;
use wat_diagnostic::Reporter;
use wat_ir::{
    ConstValue, DataSegment, ElemSegment, ElemType, ExprKind, ExprList, Export, ExternalKind,
    FuncDecl, FuncTypeDecl, Global, Import, ImportDesc, Limits, Memory, Module, ModuleField,
    ModuleFieldKind, Span, Table, ValType, Var,
};
use wat_lexer_core::TokenKind;

use super::inline;
use super::types;
use super::Parser;
use crate::binder::{bind_if_named, eat_optional_name};
use crate::field_assembler::FieldAssembler;
use crate::literal;

const WASM_PAGE_SIZE: u64 = 65536;

fn parse_required_nat<R: Reporter>(p: &mut Parser<'_, R>) -> u64 {
    let span = p.cursor.current_span();
    if !matches!(p.cursor.current_kind(), TokenKind::Nat | TokenKind::Int) {
        p.report_unexpected(&["integer literal"]);
        return 0;
    }
    let lexeme = p.cursor.advance().lexeme.clone();
    match literal::parse_nat(&lexeme) {
        Ok(v) => v,
        Err(_) => {
            p.diagnostics.report(crate::error::malformed_literal(&lexeme, span));
            0
        }
    }
}

fn parse_limits<R: Reporter>(p: &mut Parser<'_, R>) -> Limits {
    let initial = parse_required_nat(p);
    let max = if matches!(p.cursor.current_kind(), TokenKind::Nat | TokenKind::Int) {
        Some(parse_required_nat(p))
    } else {
        None
    };
    Limits::new(initial, max)
}

fn parse_table_type<R: Reporter>(p: &mut Parser<'_, R>) -> (Limits, ElemType) {
    let limits = parse_limits(p);
    let _ = p.expect_kind(&TokenKind::AnyFunc);
    (limits, ElemType::FuncRef)
}

fn parse_global_type<R: Reporter>(p: &mut Parser<'_, R>) -> (ValType, bool) {
    if p.cursor.check(&TokenKind::ParenOpen) && matches!(p.cursor.peek_kind_at(1), TokenKind::Mut) {
        p.cursor.advance();
        p.cursor.advance();
        let ty = expect_value_type(p);
        if !p.expect_rparen() {
            p.recover_to_matching_rparen();
        }
        (ty, true)
    } else {
        (expect_value_type(p), false)
    }
}

fn expect_value_type<R: Reporter>(p: &mut Parser<'_, R>) -> ValType {
    match p.cursor.current_kind().clone() {
        TokenKind::ValueType(ty) => {
            p.cursor.advance();
            ty
        }
        _ => {
            p.report_unexpected(&["value type"]);
            ValType::I32
        }
    }
}

fn parse_offset_expr<R: Reporter>(p: &mut Parser<'_, R>, module: &mut Module, list: &mut ExprList) {
    if p.cursor.check(&TokenKind::ParenOpen) && matches!(p.cursor.peek_kind_at(1), TokenKind::Offset) {
        p.cursor.advance();
        p.cursor.advance();
        super::instr::parse_instr_sequence_folded_body(p, &mut module.exprs, list);
        if !p.expect_rparen() {
            p.recover_to_matching_rparen();
        }
    } else if p.cursor.check(&TokenKind::ParenOpen) {
        super::instr::parse_folded_instr(p, &mut module.exprs, list);
    } else {
        p.report_unexpected(&["`(`"]);
    }
}

fn parse_text_bytes_sequence<R: Reporter>(p: &mut Parser<'_, R>) -> Vec<u8> {
    let mut bytes = Vec::new();
    while p.cursor.check(&TokenKind::Text) {
        let span = p.cursor.current_span();
        let lexeme = p.cursor.advance().lexeme.clone();
        match literal::parse_text_bytes(&lexeme) {
            Ok(mut chunk) => bytes.append(&mut chunk),
            Err(_) => p.diagnostics.report(crate::error::malformed_literal(&lexeme, span)),
        }
    }
    bytes
}

/// `(type $id? (func (param ...) (result ...)))` (spec §3 "Function Type
/// Declaration").
pub fn parse_type_field<R: Reporter>(p: &mut Parser<'_, R>, module: &mut Module, lparen: Span) {
    let name = eat_optional_name(&mut p.cursor, p.interner);
    let sig = if p.expect_lparen() {
        if p.expect_kind(&TokenKind::Func) {
            let sig = types::parse_func_type_sig(p);
            if !p.expect_rparen() {
                p.recover_to_matching_rparen();
            }
            sig
        } else {
            p.recover_to_matching_rparen();
            wat_ir::FuncSig::default()
        }
    } else {
        wat_ir::FuncSig::default()
    };
    let index = module.func_types.len();
    module.func_types.push(FuncTypeDecl { name, sig });
    bind_if_named(&mut module.func_type_bindings, name, index as u32);
    module.fields.push(ModuleField {
        kind: ModuleFieldKind::FuncType(index),
        span: lparen,
    });
    if !p.expect_rparen() {
        p.recover_to_matching_rparen();
    }
}

/// `(table $id? export* import? limits funcref)`, plus the inline-elem
/// abbreviation `(table $id? export* funcref (elem var*))` (spec §4.4:
/// symmetric inline expansion applies to Table).
pub fn parse_table_field<R: Reporter>(
    p: &mut Parser<'_, R>,
    module: &mut Module,
    assembler: &mut FieldAssembler,
    lparen: Span,
) {
    let name = eat_optional_name(&mut p.cursor, p.interner);
    let export_names = inline::parse_inline_exports(p);

    if let Some((import_module, import_field)) = inline::parse_inline_import(p) {
        assembler.check_import(ExternalKind::Table, lparen, p.diagnostics);
        let (limits, elem_type) = parse_table_type(p);
        let table = Table { name, elem_type, limits };
        let index = u32::try_from(module.tables.len()).unwrap_or(u32::MAX);
        module.tables.push(table.clone());
        module.num_table_imports += 1;
        bind_if_named(&mut module.table_bindings, name, index);
        module.imports.push(Import {
            module: import_module,
            field: import_field,
            desc: ImportDesc::Table(table),
        });
        let import_index = module.imports.len() - 1;
        module.fields.push(ModuleField {
            kind: ModuleFieldKind::Import(import_index),
            span: lparen,
        });
        inline::append_inline_exports(module, p.interner, export_names, ExternalKind::Table, index, lparen);
        if !p.expect_rparen() {
            p.recover_to_matching_rparen();
        }
        return;
    }

    if matches!(p.cursor.current_kind(), TokenKind::AnyFunc)
        && matches!(p.cursor.peek_kind_at(1), TokenKind::ParenOpen)
        && matches!(p.cursor.peek_kind_at(2), TokenKind::Elem)
    {
        p.cursor.advance();
        p.cursor.advance();
        p.cursor.advance();
        let mut elems = Vec::new();
        while matches!(p.cursor.current_kind(), TokenKind::Nat | TokenKind::Int | TokenKind::Var) {
            elems.push(super::instr::parse_var(p));
        }
        if !p.expect_rparen() {
            p.recover_to_matching_rparen();
        }
        let index = u32::try_from(module.tables.len()).unwrap_or(u32::MAX);
        let limits = Limits::exact(elems.len() as u64);
        module.tables.push(Table {
            name,
            elem_type: ElemType::FuncRef,
            limits,
        });
        assembler.record_definition(ExternalKind::Table, lparen);
        bind_if_named(&mut module.table_bindings, name, index);
        module.fields.push(ModuleField {
            kind: ModuleFieldKind::Table(index as usize),
            span: lparen,
        });
        inline::append_inline_exports(module, p.interner, export_names, ExternalKind::Table, index, lparen);
        let mut offset = ExprList::EMPTY;
        module.exprs.push(&mut offset, ExprKind::Const(ConstValue::I32(0)), lparen);
        let elem_index = module.elems.len();
        module.elems.push(ElemSegment {
            table: Var::Index(u64::from(index)),
            offset,
            elems,
        });
        module.fields.push(ModuleField {
            kind: ModuleFieldKind::Elem(elem_index),
            span: lparen,
        });
        if !p.expect_rparen() {
            p.recover_to_matching_rparen();
        }
        return;
    }

    let (limits, elem_type) = parse_table_type(p);
    let index = u32::try_from(module.tables.len()).unwrap_or(u32::MAX);
    module.tables.push(Table { name, elem_type, limits });
    assembler.record_definition(ExternalKind::Table, lparen);
    bind_if_named(&mut module.table_bindings, name, index);
    module.fields.push(ModuleField {
        kind: ModuleFieldKind::Table(index as usize),
        span: lparen,
    });
    inline::append_inline_exports(module, p.interner, export_names, ExternalKind::Table, index, lparen);
    if !p.expect_rparen() {
        p.recover_to_matching_rparen();
    }
}

/// `(memory $id? export* import? limits)`, plus the inline-data
/// abbreviation `(memory $id? export* (data "..."))` (spec §4.4).
pub fn parse_memory_field<R: Reporter>(
    p: &mut Parser<'_, R>,
    module: &mut Module,
    assembler: &mut FieldAssembler,
    lparen: Span,
) {
    let name = eat_optional_name(&mut p.cursor, p.interner);
    let export_names = inline::parse_inline_exports(p);

    if let Some((import_module, import_field)) = inline::parse_inline_import(p) {
        assembler.check_import(ExternalKind::Memory, lparen, p.diagnostics);
        let limits = parse_limits(p);
        let memory = Memory { name, limits };
        let index = u32::try_from(module.memories.len()).unwrap_or(u32::MAX);
        module.memories.push(memory.clone());
        module.num_memory_imports += 1;
        bind_if_named(&mut module.memory_bindings, name, index);
        module.imports.push(Import {
            module: import_module,
            field: import_field,
            desc: ImportDesc::Memory(memory),
        });
        let import_index = module.imports.len() - 1;
        module.fields.push(ModuleField {
            kind: ModuleFieldKind::Import(import_index),
            span: lparen,
        });
        inline::append_inline_exports(module, p.interner, export_names, ExternalKind::Memory, index, lparen);
        if !p.expect_rparen() {
            p.recover_to_matching_rparen();
        }
        return;
    }

    if p.cursor.check(&TokenKind::ParenOpen) && matches!(p.cursor.peek_kind_at(1), TokenKind::Data) {
        p.cursor.advance();
        p.cursor.advance();
        let bytes = parse_text_bytes_sequence(p);
        if !p.expect_rparen() {
            p.recover_to_matching_rparen();
        }
        let len = bytes.len() as u64;
        let pages = if len == 0 { 0 } else { (len + WASM_PAGE_SIZE - 1) / WASM_PAGE_SIZE };
        let index = u32::try_from(module.memories.len()).unwrap_or(u32::MAX);
        module.memories.push(Memory {
            name,
            limits: Limits::exact(pages),
        });
        assembler.record_definition(ExternalKind::Memory, lparen);
        bind_if_named(&mut module.memory_bindings, name, index);
        module.fields.push(ModuleField {
            kind: ModuleFieldKind::Memory(index as usize),
            span: lparen,
        });
        inline::append_inline_exports(module, p.interner, export_names, ExternalKind::Memory, index, lparen);
        let mut offset = ExprList::EMPTY;
        module.exprs.push(&mut offset, ExprKind::Const(ConstValue::I32(0)), lparen);
        let data_index = module.datas.len();
        module.datas.push(DataSegment {
            memory: Var::Index(u64::from(index)),
            offset,
            bytes,
        });
        module.fields.push(ModuleField {
            kind: ModuleFieldKind::Data(data_index),
            span: lparen,
        });
        if !p.expect_rparen() {
            p.recover_to_matching_rparen();
        }
        return;
    }

    let limits = parse_limits(p);
    let index = u32::try_from(module.memories.len()).unwrap_or(u32::MAX);
    module.memories.push(Memory { name, limits });
    assembler.record_definition(ExternalKind::Memory, lparen);
    bind_if_named(&mut module.memory_bindings, name, index);
    module.fields.push(ModuleField {
        kind: ModuleFieldKind::Memory(index as usize),
        span: lparen,
    });
    inline::append_inline_exports(module, p.interner, export_names, ExternalKind::Memory, index, lparen);
    if !p.expect_rparen() {
        p.recover_to_matching_rparen();
    }
}

/// `(global $id? export* import? globaltype init-expr?)`.
pub fn parse_global_field<R: Reporter>(
    p: &mut Parser<'_, R>,
    module: &mut Module,
    assembler: &mut FieldAssembler,
    lparen: Span,
) {
    let name = eat_optional_name(&mut p.cursor, p.interner);
    let export_names = inline::parse_inline_exports(p);

    if let Some((import_module, import_field)) = inline::parse_inline_import(p) {
        assembler.check_import(ExternalKind::Global, lparen, p.diagnostics);
        let (value_type, mutable) = parse_global_type(p);
        let global = Global {
            name,
            value_type,
            mutable,
            init: ExprList::EMPTY,
        };
        let index = u32::try_from(module.globals.len()).unwrap_or(u32::MAX);
        module.globals.push(global.clone());
        module.num_global_imports += 1;
        bind_if_named(&mut module.global_bindings, name, index);
        module.imports.push(Import {
            module: import_module,
            field: import_field,
            desc: ImportDesc::Global(global),
        });
        let import_index = module.imports.len() - 1;
        module.fields.push(ModuleField {
            kind: ModuleFieldKind::Import(import_index),
            span: lparen,
        });
        inline::append_inline_exports(module, p.interner, export_names, ExternalKind::Global, index, lparen);
        if !p.expect_rparen() {
            p.recover_to_matching_rparen();
        }
        return;
    }

    let (value_type, mutable) = parse_global_type(p);
    let mut init = ExprList::EMPTY;
    super::instr::parse_instr_sequence_folded_body(p, &mut module.exprs, &mut init);
    let index = u32::try_from(module.globals.len()).unwrap_or(u32::MAX);
    module.globals.push(Global {
        name,
        value_type,
        mutable,
        init,
    });
    assembler.record_definition(ExternalKind::Global, lparen);
    bind_if_named(&mut module.global_bindings, name, index);
    module.fields.push(ModuleField {
        kind: ModuleFieldKind::Global(index as usize),
        span: lparen,
    });
    inline::append_inline_exports(module, p.interner, export_names, ExternalKind::Global, index, lparen);
    if !p.expect_rparen() {
        p.recover_to_matching_rparen();
    }
}

/// Standalone `(import "module" "field" (func|table|memory|global ...))`.
pub fn parse_import_field<R: Reporter>(
    p: &mut Parser<'_, R>,
    module: &mut Module,
    assembler: &mut FieldAssembler,
    lparen: Span,
) {
    let import_module = inline::parse_export_name(p);
    let import_field = inline::parse_export_name(p);
    if !p.expect_lparen() {
        p.recover_to_matching_rparen();
        return;
    }
    match p.cursor.current_kind().clone() {
        TokenKind::Func => {
            p.cursor.advance();
            let name = eat_optional_name(&mut p.cursor, p.interner);
            let type_use = types::parse_type_use(p);
            if !p.expect_rparen() {
                p.recover_to_matching_rparen();
            }
            assembler.check_import(ExternalKind::Func, lparen, p.diagnostics);
            let decl = FuncDecl {
                has_func_type: type_use.has_func_type,
                type_use: type_use.type_use,
                sig: type_use.sig,
            };
            let params = vec![None; decl.sig.params.len()];
            let index = u32::try_from(module.funcs.len()).unwrap_or(u32::MAX);
            module.funcs.push(wat_ir::Function {
                name,
                decl: decl.clone(),
                params,
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
        }
        TokenKind::Table => {
            p.cursor.advance();
            let name = eat_optional_name(&mut p.cursor, p.interner);
            let (limits, elem_type) = parse_table_type(p);
            if !p.expect_rparen() {
                p.recover_to_matching_rparen();
            }
            assembler.check_import(ExternalKind::Table, lparen, p.diagnostics);
            let table = Table { name, elem_type, limits };
            let index = u32::try_from(module.tables.len()).unwrap_or(u32::MAX);
            module.tables.push(table.clone());
            module.num_table_imports += 1;
            bind_if_named(&mut module.table_bindings, name, index);
            module.imports.push(Import {
                module: import_module,
                field: import_field,
                desc: ImportDesc::Table(table),
            });
            let import_index = module.imports.len() - 1;
            module.fields.push(ModuleField {
                kind: ModuleFieldKind::Import(import_index),
                span: lparen,
            });
        }
        TokenKind::Memory => {
            p.cursor.advance();
            let name = eat_optional_name(&mut p.cursor, p.interner);
            let limits = parse_limits(p);
            if !p.expect_rparen() {
                p.recover_to_matching_rparen();
            }
            assembler.check_import(ExternalKind::Memory, lparen, p.diagnostics);
            let memory = Memory { name, limits };
            let index = u32::try_from(module.memories.len()).unwrap_or(u32::MAX);
            module.memories.push(memory.clone());
            module.num_memory_imports += 1;
            bind_if_named(&mut module.memory_bindings, name, index);
            module.imports.push(Import {
                module: import_module,
                field: import_field,
                desc: ImportDesc::Memory(memory),
            });
            let import_index = module.imports.len() - 1;
            module.fields.push(ModuleField {
                kind: ModuleFieldKind::Import(import_index),
                span: lparen,
            });
        }
        TokenKind::Global => {
            p.cursor.advance();
            let name = eat_optional_name(&mut p.cursor, p.interner);
            let (value_type, mutable) = parse_global_type(p);
            if !p.expect_rparen() {
                p.recover_to_matching_rparen();
            }
            assembler.check_import(ExternalKind::Global, lparen, p.diagnostics);
            let global = Global {
                name,
                value_type,
                mutable,
                init: ExprList::EMPTY,
            };
            let index = u32::try_from(module.globals.len()).unwrap_or(u32::MAX);
            module.globals.push(global.clone());
            module.num_global_imports += 1;
            bind_if_named(&mut module.global_bindings, name, index);
            module.imports.push(Import {
                module: import_module,
                field: import_field,
                desc: ImportDesc::Global(global),
            });
            let import_index = module.imports.len() - 1;
            module.fields.push(ModuleField {
                kind: ModuleFieldKind::Import(import_index),
                span: lparen,
            });
        }
        _ => {
            p.report_unexpected(&["`func`", "`table`", "`memory`", "`global`"]);
            p.recover_to_matching_rparen();
        }
    }
    if !p.expect_rparen() {
        p.recover_to_matching_rparen();
    }
}

/// Standalone `(export "name" (func|table|memory|global var))`.
pub fn parse_export_field<R: Reporter>(p: &mut Parser<'_, R>, module: &mut Module, lparen: Span) {
    let name = inline::parse_export_name(p);
    let mut result = None;
    if p.expect_lparen() {
        let kind = match p.cursor.current_kind().clone() {
            TokenKind::Func => {
                p.cursor.advance();
                Some(ExternalKind::Func)
            }
            TokenKind::Table => {
                p.cursor.advance();
                Some(ExternalKind::Table)
            }
            TokenKind::Memory => {
                p.cursor.advance();
                Some(ExternalKind::Memory)
            }
            TokenKind::Global => {
                p.cursor.advance();
                Some(ExternalKind::Global)
            }
            _ => {
                p.report_unexpected(&["`func`", "`table`", "`memory`", "`global`"]);
                None
            }
        };
        if let Some(kind) = kind {
            let var = super::instr::parse_var(p);
            result = Some((kind, var));
        }
        if !p.expect_rparen() {
            p.recover_to_matching_rparen();
        }
    }
    if let Some((kind, var)) = result {
        let index = module.exports.len();
        let name_interned = p.interner.intern(&name);
        module.exports.push(Export { name, kind, var });
        module.export_bindings.bind(name_interned, index as u32);
        module.fields.push(ModuleField {
            kind: ModuleFieldKind::Export(index),
            span: lparen,
        });
    }
    if !p.expect_rparen() {
        p.recover_to_matching_rparen();
    }
}

/// `(elem var? offset var*)` (spec §3 "Element Segment").
pub fn parse_elem_field<R: Reporter>(p: &mut Parser<'_, R>, module: &mut Module, lparen: Span) {
    let table = if matches!(p.cursor.current_kind(), TokenKind::Nat | TokenKind::Int | TokenKind::Var) {
        super::instr::parse_var(p)
    } else {
        Var::Index(0)
    };
    let mut offset = ExprList::EMPTY;
    parse_offset_expr(p, module, &mut offset);
    let mut elems = Vec::new();
    while matches!(p.cursor.current_kind(), TokenKind::Nat | TokenKind::Int | TokenKind::Var) {
        elems.push(super::instr::parse_var(p));
    }
    let index = module.elems.len();
    module.elems.push(ElemSegment { table, offset, elems });
    module.fields.push(ModuleField {
        kind: ModuleFieldKind::Elem(index),
        span: lparen,
    });
    if !p.expect_rparen() {
        p.recover_to_matching_rparen();
    }
}

/// `(data var? offset string*)` (spec §3 "Data Segment").
pub fn parse_data_field<R: Reporter>(p: &mut Parser<'_, R>, module: &mut Module, lparen: Span) {
    let memory = if matches!(p.cursor.current_kind(), TokenKind::Nat | TokenKind::Int | TokenKind::Var) {
        super::instr::parse_var(p)
    } else {
        Var::Index(0)
    };
    let mut offset = ExprList::EMPTY;
    parse_offset_expr(p, module, &mut offset);
    let bytes = parse_text_bytes_sequence(p);
    let index = module.datas.len();
    module.datas.push(DataSegment { memory, offset, bytes });
    module.fields.push(ModuleField {
        kind: ModuleFieldKind::Data(index),
        span: lparen,
    });
    if !p.expect_rparen() {
        p.recover_to_matching_rparen();
    }
}

/// `(start var)` (spec §3 "Module").
pub fn parse_start_field<R: Reporter>(p: &mut Parser<'_, R>, module: &mut Module, lparen: Span) {
    let var = super::instr::parse_var(p);
    module.start = Some(var);
    module.fields.push(ModuleField {
        kind: ModuleFieldKind::Start,
        span: lparen,
    });
    if !p.expect_rparen() {
        p.recover_to_matching_rparen();
    }
}
