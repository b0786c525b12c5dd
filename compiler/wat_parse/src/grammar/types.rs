//! Value types, function signatures, and type-use resolution (spec §4.6
//! C10 Type-Use Resolver).

use wat_diagnostic::Reporter;
use wat_ir::{FuncSig, TypeVector, ValType, Var};
use wat_lexer_core::TokenKind;

use super::Parser;
use crate::binder::eat_optional_name;

/// Parse zero or more `(param ...)` clauses into a flat type vector,
/// discarding per-param names here: only a function's *own* `(param
/// $x i32)` names are bound (spec §4.5), and those are collected
/// separately by `func::parse_func_field` because they also populate the
/// function's local-binding table.
pub fn parse_param_list<R: Reporter>(p: &mut Parser<'_, R>) -> TypeVector {
    let mut types = TypeVector::new();
    while p.cursor.check(&TokenKind::ParenOpen)
        && matches!(p.cursor.peek_kind_at(1), TokenKind::Param)
    {
        p.cursor.advance();
        p.cursor.advance();
        // A named single param (`(param $x i32)`) has exactly one type;
        // an anonymous param clause (`(param i32 i32)`) may list several.
        loop {
            match p.cursor.current_kind().clone() {
                TokenKind::ValueType(ty) => {
                    types.push(ty);
                    p.cursor.advance();
                }
                _ => break,
            }
        }
        if !p.expect_rparen() {
            p.recover_to_matching_rparen();
        }
    }
    types
}

/// Parse zero or more `(result ...)` clauses into a flat type vector.
pub fn parse_result_list<R: Reporter>(p: &mut Parser<'_, R>) -> TypeVector {
    let mut types = TypeVector::new();
    while p.cursor.check(&TokenKind::ParenOpen)
        && matches!(p.cursor.peek_kind_at(1), TokenKind::Result)
    {
        p.cursor.advance();
        p.cursor.advance();
        loop {
            match p.cursor.current_kind().clone() {
                TokenKind::ValueType(ty) => {
                    types.push(ty);
                    p.cursor.advance();
                }
                _ => break,
            }
        }
        if !p.expect_rparen() {
            p.recover_to_matching_rparen();
        }
    }
    types
}

/// Parse a named `(param $x i32)` clause, returning the bound name (if
/// any) alongside its value type. Returns `None` once the current
/// position is no longer a `(param ...)` clause.
pub fn parse_named_param<R: Reporter>(
    p: &mut Parser<'_, R>,
) -> Option<(Option<wat_ir::Name>, ValType)> {
    if !(p.cursor.check(&TokenKind::ParenOpen) && matches!(p.cursor.peek_kind_at(1), TokenKind::Param)) {
        return None;
    }
    p.cursor.advance();
    p.cursor.advance();
    let name = eat_optional_name(&mut p.cursor, p.interner);
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
    if !p.expect_rparen() {
        p.recover_to_matching_rparen();
    }
    Some((name, ty))
}

/// A declared function signature plus the optional `(type $id)` it was
/// written against (spec §4.6): "a function can declare a signature
/// via `(type $id)`, inline `(param)`/`(result)`, both, or neither (the
/// empty signature). Resolution occurs after the whole module is
/// parsed" — so this records both forms verbatim and leaves
/// cross-checking/defaulting to a later pass, matching `FuncDecl`'s own
/// doc comment in `wat_ir`.
pub struct TypeUse {
    pub has_func_type: bool,
    pub type_use: Option<Var>,
    pub sig: FuncSig,
}

/// Parse an optional `(type $id)` clause followed by optional inline
/// `(param ...)*(result ...)*` clauses.
pub fn parse_type_use<R: Reporter>(p: &mut Parser<'_, R>) -> TypeUse {
    let mut has_func_type = false;
    let mut type_use = None;
    if p.cursor.check(&TokenKind::ParenOpen) && matches!(p.cursor.peek_kind_at(1), TokenKind::TypeKw) {
        p.cursor.advance();
        p.cursor.advance();
        has_func_type = true;
        type_use = Some(super::instr::parse_var(p));
        if !p.expect_rparen() {
            p.recover_to_matching_rparen();
        }
    }
    let params = parse_param_list(p);
    let results = parse_result_list(p);
    TypeUse {
        has_func_type,
        type_use,
        sig: FuncSig::new(params, results),
    }
}

/// Parse a standalone `(func (param ...) (result ...))` type signature,
/// as written inside a top-level `(type $id (func ...))` declaration.
pub fn parse_func_type_sig<R: Reporter>(p: &mut Parser<'_, R>) -> FuncSig {
    let params = parse_param_list(p);
    let results = parse_result_list(p);
    FuncSig::new(params, results)
}
