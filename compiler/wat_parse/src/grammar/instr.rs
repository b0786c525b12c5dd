//! Expression Builder (spec §4.2 C5) and Block/Label Resolver (spec §4.3
//! C6): converts the token stream into `wat_ir::Expr` nodes, in both the
//! stack form (a flat sequence ended by `end`/`else`) and the folded
//! form (`(op operand*)`, which linearizes to operands-then-op). Deep
//! nesting in either form recurses through `stacker::maybe_grow` plus a
//! depth counter, so a pathological input reports `MemoryExhaustion`
//! instead of overflowing the real stack (spec §7, §4.1 step 3).

use wat_diagnostic::Reporter;
use wat_ir::{
    Align, Block, ConstValue, ExprArena, ExprKind, ExprList, Name, Span, ValType, Var,
};
use wat_lexer_core::TokenKind;

use super::types;
use super::Parser;
use crate::binder::eat_optional_name;
use crate::literal;

const STACK_GUARD_HEADROOM: usize = 32 * 1024;
const STACK_GUARD_CHUNK: usize = 1024 * 1024;

/// Parse an index-or-name reference (spec §3 "Var").
pub fn parse_var<R: Reporter>(p: &mut Parser<'_, R>) -> Var {
    let span = p.cursor.current_span();
    match p.cursor.current_kind().clone() {
        TokenKind::Nat | TokenKind::Int => {
            let lexeme = p.cursor.advance().lexeme.clone();
            match literal::parse_nat(&lexeme) {
                Ok(v) => Var::Index(v),
                Err(_) => {
                    p.diagnostics.report(crate::error::malformed_literal(&lexeme, span));
                    Var::Index(0)
                }
            }
        }
        TokenKind::Var => {
            let lexeme = p.cursor.advance().lexeme.clone();
            let text = lexeme.strip_prefix('$').unwrap_or(&lexeme);
            Var::Name(p.interner.intern(text))
        }
        _ => {
            p.report_unexpected(&["index", "identifier"]);
            Var::Index(0)
        }
    }
}

fn parse_memarg<R: Reporter>(p: &mut Parser<'_, R>) -> (Align, u64) {
    let mut align = Align::Natural;
    let mut offset = 0u64;
    loop {
        match p.cursor.current_kind().clone() {
            TokenKind::MemArgOffset => {
                let span = p.cursor.current_span();
                let lexeme = p.cursor.advance().lexeme.clone();
                match literal::parse_memarg_offset(&lexeme) {
                    Ok(v) => offset = v,
                    Err(_) => {
                        p.diagnostics.report(crate::error::malformed_literal(&lexeme, span));
                    }
                }
            }
            TokenKind::MemArgAlign => {
                let span = p.cursor.current_span();
                let lexeme = p.cursor.advance().lexeme.clone();
                match literal::parse_memarg_align(&lexeme) {
                    Ok(v) => match Align::from_value(v) {
                        Some(a) => align = a,
                        None => {
                            p.diagnostics.report(crate::error::malformed_literal(&lexeme, span));
                        }
                    },
                    Err(_) => {
                        p.diagnostics.report(crate::error::malformed_literal(&lexeme, span));
                    }
                }
            }
            _ => return (align, offset),
        }
    }
}

pub(crate) fn parse_const_literal<R: Reporter>(p: &mut Parser<'_, R>, ty: ValType) -> ConstValue {
    let span = p.cursor.current_span();
    if !matches!(
        p.cursor.current_kind(),
        TokenKind::Nat | TokenKind::Int | TokenKind::Float
    ) {
        p.report_unexpected(&["numeric literal"]);
        return ConstValue::I32(0);
    }
    let lexeme = p.cursor.advance().lexeme.clone();
    let report_bad = |p: &mut Parser<'_, R>, type_name: &str| {
        p.diagnostics
            .report(crate::error::out_of_range_literal(&lexeme, type_name, span));
    };
    match ty {
        ValType::I32 => match literal::parse_i32(&lexeme) {
            Ok(v) => ConstValue::I32(v),
            Err(_) => {
                report_bad(p, "i32");
                ConstValue::I32(0)
            }
        },
        ValType::I64 => match literal::parse_i64(&lexeme) {
            Ok(v) => ConstValue::I64(v),
            Err(_) => {
                report_bad(p, "i64");
                ConstValue::I64(0)
            }
        },
        ValType::F32 => match literal::narrow_to_f32_bits(&lexeme) {
            Ok(bits) => ConstValue::F32(bits),
            Err(_) => {
                report_bad(p, "f32");
                ConstValue::F32(0)
            }
        },
        ValType::F64 => match literal::parse_float_bits_f64(&lexeme) {
            Ok(bits) => ConstValue::F64(bits),
            Err(_) => {
                report_bad(p, "f64");
                ConstValue::F64(0)
            }
        },
    }
}

/// Build the `ExprKind` for a non-control-flow instruction, consuming
/// whatever immediates it carries (var, memarg, literal, type-use).
/// `Block`/`Loop`/`If` are handled by their own callers since they carry
/// nested bodies rather than flat immediates; exception instructions
/// report as unsupported and never reach here with a real payload.
fn parse_instr_kind<R: Reporter>(
    p: &mut Parser<'_, R>,
    kind_tok: TokenKind,
    span: Span,
) -> Option<ExprKind> {
    match kind_tok {
        TokenKind::Unreachable => Some(ExprKind::Unreachable),
        TokenKind::NopKw => Some(ExprKind::Nop),
        TokenKind::DropKw => Some(ExprKind::Drop),
        TokenKind::SelectKw => Some(ExprKind::Select),
        TokenKind::ReturnKw => Some(ExprKind::Return),
        TokenKind::CurrentMemory => Some(ExprKind::CurrentMemory),
        TokenKind::GrowMemory => Some(ExprKind::GrowMemory),
        TokenKind::Br => Some(ExprKind::Br(parse_var(p))),
        TokenKind::BrIf => Some(ExprKind::BrIf(parse_var(p))),
        TokenKind::BrTable => {
            let mut vars = Vec::new();
            while matches!(
                p.cursor.current_kind(),
                TokenKind::Nat | TokenKind::Int | TokenKind::Var
            ) {
                vars.push(parse_var(p));
            }
            if vars.is_empty() {
                p.report_unexpected(&["index", "identifier"]);
                vars.push(Var::Index(0));
            }
            let default = vars.pop().unwrap_or(Var::Index(0));
            Some(ExprKind::BrTable {
                targets: vars,
                default,
            })
        }
        TokenKind::Call => Some(ExprKind::Call(parse_var(p))),
        TokenKind::CallIndirect => {
            let type_use = types::parse_type_use(p);
            let type_var = if type_use.has_func_type {
                type_use.type_use.unwrap_or(Var::unresolved())
            } else {
                Var::unresolved()
            };
            Some(ExprKind::CallIndirect {
                table: Var::Index(0),
                type_use: type_var,
            })
        }
        TokenKind::GetLocal => Some(ExprKind::GetLocal(parse_var(p))),
        TokenKind::SetLocal => Some(ExprKind::SetLocal(parse_var(p))),
        TokenKind::TeeLocal => Some(ExprKind::TeeLocal(parse_var(p))),
        TokenKind::GetGlobal => Some(ExprKind::GetGlobal(parse_var(p))),
        TokenKind::SetGlobal => Some(ExprKind::SetGlobal(parse_var(p))),
        TokenKind::Load(op) => {
            let (align, offset) = parse_memarg(p);
            Some(ExprKind::Load { op, align, offset })
        }
        TokenKind::Store(op) => {
            let (align, offset) = parse_memarg(p);
            Some(ExprKind::Store { op, align, offset })
        }
        TokenKind::ConstOp(ty) => Some(ExprKind::Const(parse_const_literal(p, ty))),
        TokenKind::UnaryOp(op) => Some(ExprKind::Unary(op)),
        TokenKind::BinaryOp(op) => Some(ExprKind::Binary(op)),
        TokenKind::CompareOp(op) => Some(ExprKind::Compare(op)),
        TokenKind::ConvertOp(op) => Some(ExprKind::Convert(op)),
        _ => {
            let found = kind_tok.describe();
            p.diagnostics.report(wat_diagnostic::unexpected_token(
                found,
                &["an instruction"],
                span,
            ));
            None
        }
    }
}

fn report_exception_unsupported<R: Reporter>(p: &mut Parser<'_, R>, kind_tok: &TokenKind, span: Span) {
    p.diagnostics.report(wat_diagnostic::unexpected_token(
        kind_tok.describe(),
        &["an instruction"],
        span,
    ));
}

/// Skip a `try` body that this core recognizes but does not lower,
/// tracking nested `block`/`loop`/`if`/`try` constructs so an inner
/// `end` does not terminate the skip early.
fn skip_try_body<R: Reporter>(p: &mut Parser<'_, R>) {
    let mut depth = 1i32;
    loop {
        match p.cursor.current_kind() {
            TokenKind::Eof => return,
            TokenKind::Block | TokenKind::Loop | TokenKind::If | TokenKind::Try => {
                depth += 1;
                p.cursor.advance();
            }
            TokenKind::End => {
                depth -= 1;
                p.cursor.advance();
                if depth == 0 {
                    return;
                }
            }
            _ => {
                p.cursor.advance();
            }
        }
    }
}

fn consume_optional_end_label<R: Reporter>(
    p: &mut Parser<'_, R>,
    begin: Option<Name>,
    begin_span: Span,
) {
    if !matches!(p.cursor.current_kind(), TokenKind::Var) {
        return;
    }
    let span = p.cursor.current_span();
    let Some(end_name) = eat_optional_name(&mut p.cursor, p.interner) else {
        return;
    };
    match begin {
        Some(begin_name) if begin_name == end_name => {}
        Some(begin_name) => {
            let begin_text = p.interner.resolve(begin_name).to_string();
            let end_text = p.interner.resolve(end_name).to_string();
            p.diagnostics
                .report(crate::error::label_mismatch(&begin_text, &end_text, begin_span, span));
        }
        None => {
            let end_text = p.interner.resolve(end_name).to_string();
            p.diagnostics.report(crate::error::unexpected_label(&end_text, span));
        }
    }
}

fn enter_nesting<R: Reporter>(p: &mut Parser<'_, R>, span: Span) -> bool {
    if p.depth >= super::MAX_EXPR_DEPTH {
        p.diagnostics.report_fatal(crate::error::memory_exhaustion(span));
        false
    } else {
        p.depth += 1;
        true
    }
}

fn exit_nesting<R: Reporter>(p: &mut Parser<'_, R>) {
    p.depth = p.depth.saturating_sub(1);
}

fn parse_block_stack<R: Reporter>(
    p: &mut Parser<'_, R>,
    arena: &mut ExprArena,
    list: &mut ExprList,
    is_loop: bool,
    op_span: Span,
) {
    let label = eat_optional_name(&mut p.cursor, p.interner);
    let signature = types::parse_result_list(p);
    let mut body = ExprList::EMPTY;
    if enter_nesting(p, op_span) {
        stacker::maybe_grow(STACK_GUARD_HEADROOM, STACK_GUARD_CHUNK, || {
            parse_instr_sequence_stack(p, arena, &mut body, &[TokenKind::End]);
        });
        exit_nesting(p);
    }
    let end_span = p.cursor.current_span();
    p.expect_kind(&TokenKind::End);
    consume_optional_end_label(p, label, op_span);
    let block = Block {
        label,
        signature,
        first: body.first(),
    };
    let span = op_span.merge(end_span);
    let kind = if is_loop {
        ExprKind::Loop(block)
    } else {
        ExprKind::Block(block)
    };
    arena.push(list, kind, span);
}

fn parse_if_stack<R: Reporter>(
    p: &mut Parser<'_, R>,
    arena: &mut ExprArena,
    list: &mut ExprList,
    op_span: Span,
) {
    let label = eat_optional_name(&mut p.cursor, p.interner);
    let signature = types::parse_result_list(p);
    let mut true_body = ExprList::EMPTY;
    if enter_nesting(p, op_span) {
        stacker::maybe_grow(STACK_GUARD_HEADROOM, STACK_GUARD_CHUNK, || {
            parse_instr_sequence_stack(p, arena, &mut true_body, &[TokenKind::Else, TokenKind::End]);
        });
        exit_nesting(p);
    }
    let mut false_block = None;
    if p.cursor.check(&TokenKind::Else) {
        p.cursor.advance();
        consume_optional_end_label(p, label, op_span);
        let mut else_body = ExprList::EMPTY;
        if enter_nesting(p, op_span) {
            stacker::maybe_grow(STACK_GUARD_HEADROOM, STACK_GUARD_CHUNK, || {
                parse_instr_sequence_stack(p, arena, &mut else_body, &[TokenKind::End]);
            });
            exit_nesting(p);
        }
        false_block = Some(Block {
            label,
            signature: signature.clone(),
            first: else_body.first(),
        });
    }
    let end_span = p.cursor.current_span();
    p.expect_kind(&TokenKind::End);
    consume_optional_end_label(p, label, op_span);
    let true_block = Block {
        label,
        signature,
        first: true_body.first(),
    };
    let span = op_span.merge(end_span);
    arena.push(
        list,
        ExprKind::If {
            true_block,
            false_block,
        },
        span,
    );
}

fn parse_plain_instr<R: Reporter>(p: &mut Parser<'_, R>, arena: &mut ExprArena, list: &mut ExprList) {
    let span = p.cursor.current_span();
    let kind_tok = p.cursor.current_kind().clone();
    match kind_tok {
        TokenKind::Block | TokenKind::Loop => {
            p.cursor.advance();
            parse_block_stack(p, arena, list, matches!(kind_tok, TokenKind::Loop), span);
        }
        TokenKind::If => {
            p.cursor.advance();
            parse_if_stack(p, arena, list, span);
        }
        TokenKind::Try => {
            p.cursor.advance();
            report_exception_unsupported(p, &kind_tok, span);
            skip_try_body(p);
        }
        TokenKind::Throw | TokenKind::Rethrow | TokenKind::Catch | TokenKind::CatchAll => {
            p.cursor.advance();
            report_exception_unsupported(p, &kind_tok, span);
        }
        _ => {
            p.cursor.advance();
            if let Some(kind) = parse_instr_kind(p, kind_tok, span) {
                arena.push(list, kind, span);
            }
        }
    }
}

fn parse_folded_instr_inner<R: Reporter>(p: &mut Parser<'_, R>, arena: &mut ExprArena, list: &mut ExprList) {
    let lparen_span = p.cursor.current_span();
    p.cursor.advance();
    let kind_tok = p.cursor.current_kind().clone();
    match kind_tok {
        TokenKind::Block | TokenKind::Loop => {
            p.cursor.advance();
            let label = eat_optional_name(&mut p.cursor, p.interner);
            let signature = types::parse_result_list(p);
            let mut body = ExprList::EMPTY;
            parse_instr_sequence_folded_body(p, arena, &mut body);
            let end_span = p.cursor.current_span();
            if !p.expect_rparen() {
                p.recover_to_matching_rparen();
                return;
            }
            let block = Block {
                label,
                signature,
                first: body.first(),
            };
            let kind = if matches!(kind_tok, TokenKind::Loop) {
                ExprKind::Loop(block)
            } else {
                ExprKind::Block(block)
            };
            arena.push(list, kind, lparen_span.merge(end_span));
        }
        TokenKind::If => {
            p.cursor.advance();
            let label = eat_optional_name(&mut p.cursor, p.interner);
            let signature = types::parse_result_list(p);
            while p.cursor.check(&TokenKind::ParenOpen)
                && !matches!(p.cursor.peek_kind_at(1), TokenKind::Then)
            {
                parse_folded_instr(p, arena, list);
            }
            let mut true_body = ExprList::EMPTY;
            if p.expect_lparen() {
                if p.expect_kind(&TokenKind::Then) {
                    parse_instr_sequence_folded_body(p, arena, &mut true_body);
                    let _ = p.expect_rparen();
                } else {
                    p.recover_to_matching_rparen();
                }
            }
            let mut false_block = None;
            if p.cursor.check(&TokenKind::ParenOpen)
                && matches!(p.cursor.peek_kind_at(1), TokenKind::Else)
            {
                p.cursor.advance();
                p.cursor.advance();
                let mut else_body = ExprList::EMPTY;
                parse_instr_sequence_folded_body(p, arena, &mut else_body);
                let _ = p.expect_rparen();
                false_block = Some(Block {
                    label,
                    signature: signature.clone(),
                    first: else_body.first(),
                });
            }
            let end_span = p.cursor.current_span();
            if !p.expect_rparen() {
                p.recover_to_matching_rparen();
                return;
            }
            let true_block = Block {
                label,
                signature,
                first: true_body.first(),
            };
            arena.push(
                list,
                ExprKind::If {
                    true_block,
                    false_block,
                },
                lparen_span.merge(end_span),
            );
        }
        TokenKind::Try | TokenKind::Throw | TokenKind::Rethrow | TokenKind::Catch | TokenKind::CatchAll => {
            let span = p.cursor.current_span();
            report_exception_unsupported(p, &kind_tok, span);
            p.recover_to_matching_rparen();
        }
        _ => {
            p.cursor.advance();
            let built = parse_instr_kind(p, kind_tok, lparen_span);
            while p.cursor.check(&TokenKind::ParenOpen) {
                parse_folded_instr(p, arena, list);
            }
            if let Some(kind) = built {
                arena.push(list, kind, lparen_span);
            }
            if !p.expect_rparen() {
                p.recover_to_matching_rparen();
            }
        }
    }
}

pub(crate) fn parse_folded_instr<R: Reporter>(p: &mut Parser<'_, R>, arena: &mut ExprArena, list: &mut ExprList) {
    let span = p.cursor.current_span();
    if !enter_nesting(p, span) {
        p.recover_to_matching_rparen();
        return;
    }
    stacker::maybe_grow(STACK_GUARD_HEADROOM, STACK_GUARD_CHUNK, || {
        parse_folded_instr_inner(p, arena, list);
    });
    exit_nesting(p);
}

fn parse_one_instr<R: Reporter>(p: &mut Parser<'_, R>, arena: &mut ExprArena, list: &mut ExprList) {
    if p.cursor.check(&TokenKind::ParenOpen) {
        parse_folded_instr(p, arena, list);
    } else {
        parse_plain_instr(p, arena, list);
    }
}

fn at_stop<R: Reporter>(p: &Parser<'_, R>, stop: &[TokenKind]) -> bool {
    p.cursor.is_at_end() || stop.iter().any(|k| p.cursor.check(k))
}

/// Parse a stack-form instruction sequence until one of `stop` (or EOF).
pub fn parse_instr_sequence_stack<R: Reporter>(
    p: &mut Parser<'_, R>,
    arena: &mut ExprArena,
    list: &mut ExprList,
    stop: &[TokenKind],
) {
    while !at_stop(p, stop) {
        parse_one_instr(p, arena, list);
    }
}

/// Parse a folded-form body: a sequence of instructions ending at the
/// enclosing `)` rather than an explicit stop keyword.
pub fn parse_instr_sequence_folded_body<R: Reporter>(
    p: &mut Parser<'_, R>,
    arena: &mut ExprArena,
    list: &mut ExprList,
) {
    while !p.cursor.check(&TokenKind::ParenClose) && !p.cursor.is_at_end() {
        parse_one_instr(p, arena, list);
    }
}
