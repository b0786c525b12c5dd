//! Script grammar (spec §4.7 C11): the embedded test-script layer built
//! on top of the module grammar — `module`/`register`/`invoke`/`get` and
//! the `assert_*` family, plus the `binary`/`quote` raw-module forms
//! (spec §6 "Raw Module").

use wat_diagnostic::Reporter;
use wat_ir::{Action, Command, ConstExpectation, ConstValue, RawModule, Script, Span, ValType};
use wat_lexer_core::TokenKind;

use super::instr;
use super::Parser;
use crate::binder::eat_optional_name;
use crate::literal;

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

fn parse_quoted_field<R: Reporter>(p: &mut Parser<'_, R>) -> String {
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

/// Parse an optional leading module reference (a bare `$name`/index
/// immediately after the `invoke`/`get`/`register` keyword).
fn parse_optional_module_var<R: Reporter>(p: &mut Parser<'_, R>) -> Option<wat_ir::Var> {
    if matches!(p.cursor.current_kind(), TokenKind::Var) {
        Some(instr::parse_var(p))
    } else {
        None
    }
}

/// `(invoke $mod? "name" (const)*)` or `(get $mod? "name")` (spec §3
/// "Action"), assuming the caller already consumed the enclosing `(` and
/// the `invoke`/`get` keyword.
fn parse_action_invoke<R: Reporter>(p: &mut Parser<'_, R>, span: Span) -> Action {
    let module = parse_optional_module_var(p);
    let field = parse_quoted_field(p);
    let mut args = Vec::new();
    while p.cursor.check(&TokenKind::ParenOpen) {
        args.push(parse_const_arg(p));
    }
    Action::Invoke { module, field, args, span }
}

fn parse_action_get<R: Reporter>(p: &mut Parser<'_, R>, span: Span) -> Action {
    let module = parse_optional_module_var(p);
    let field = parse_quoted_field(p);
    Action::Get { module, field, span }
}

/// Dispatch on whichever of `invoke`/`get` is current, assuming the
/// caller already consumed the enclosing `(`.
fn parse_action<R: Reporter>(p: &mut Parser<'_, R>) -> Action {
    let span = p.cursor.current_span();
    match p.cursor.current_kind().clone() {
        TokenKind::Invoke => {
            p.cursor.advance();
            parse_action_invoke(p, span)
        }
        TokenKind::Get => {
            p.cursor.advance();
            parse_action_get(p, span)
        }
        _ => {
            p.report_unexpected(&["`invoke`", "`get`"]);
            Action::Get { module: None, field: String::new(), span }
        }
    }
}

/// Parse a `(invoke ...)`/`(get ...)` action wrapped in its own
/// parentheses, as it appears as an assert's first operand.
fn parse_wrapped_action<R: Reporter>(p: &mut Parser<'_, R>) -> Action {
    if !p.expect_lparen() {
        return Action::Get { module: None, field: String::new(), span: p.cursor.current_span() };
    }
    let action = parse_action(p);
    if !p.expect_rparen() {
        p.recover_to_matching_rparen();
    }
    action
}

/// `(TYPE.const VALUE)`, used for an invocation's argument list.
fn parse_const_arg<R: Reporter>(p: &mut Parser<'_, R>) -> ConstValue {
    if !p.expect_lparen() {
        return ConstValue::I32(0);
    }
    let value = match p.cursor.current_kind().clone() {
        TokenKind::ConstOp(ty) => {
            p.cursor.advance();
            instr::parse_const_literal(p, ty)
        }
        _ => {
            p.report_unexpected(&["const instruction"]);
            ConstValue::I32(0)
        }
    };
    if !p.expect_rparen() {
        p.recover_to_matching_rparen();
    }
    value
}

fn nan_wildcard_kind(lexeme: &str) -> Option<bool> {
    let bare = lexeme.strip_prefix(['+', '-']).unwrap_or(lexeme);
    match bare {
        "nan:canonical" => Some(true),
        "nan:arithmetic" => Some(false),
        _ => None,
    }
}

/// `(TYPE.const VALUE)`, used for an `assert_return` expected-result
/// entry: `VALUE` may be an ordinary literal or the `nan:canonical`/
/// `nan:arithmetic` wildcard (spec §4.7 SPEC_FULL supplement unifying
/// the legacy `assert_return_canonical_nan`/`assert_return_arithmetic_nan`
/// commands into a single expected-result shape).
fn parse_const_expectation<R: Reporter>(p: &mut Parser<'_, R>) -> ConstExpectation {
    if !p.expect_lparen() {
        return ConstExpectation::Exact(ConstValue::I32(0));
    }
    let result = match p.cursor.current_kind().clone() {
        TokenKind::ConstOp(ty) => {
            p.cursor.advance();
            if matches!(ty, ValType::F32 | ValType::F64) && p.cursor.check(&TokenKind::Float) {
                if let Some(is_canonical) = nan_wildcard_kind(&p.cursor.current().lexeme.clone()) {
                    p.cursor.advance();
                    if is_canonical {
                        ConstExpectation::CanonicalNan
                    } else {
                        ConstExpectation::ArithmeticNan
                    }
                } else {
                    ConstExpectation::Exact(instr::parse_const_literal(p, ty))
                }
            } else {
                ConstExpectation::Exact(instr::parse_const_literal(p, ty))
            }
        }
        _ => {
            p.report_unexpected(&["const instruction"]);
            ConstExpectation::Exact(ConstValue::I32(0))
        }
    };
    if !p.expect_rparen() {
        p.recover_to_matching_rparen();
    }
    result
}

/// `(module $id? field*)`, `(module $id? binary "..."*)`, or `(module
/// $id? quote "..."*)` (spec §3 "Raw Module", §6), assuming the caller
/// already consumed the enclosing `(` and the `module` keyword.
fn parse_raw_module<R: Reporter>(p: &mut Parser<'_, R>, span: Span) -> RawModule {
    let name = eat_optional_name(&mut p.cursor, p.interner);
    if p.cursor.check(&TokenKind::BinaryKw) {
        p.cursor.advance();
        let bytes = parse_text_bytes_sequence(p);
        RawModule::Binary { name, bytes, span }
    } else if p.cursor.check(&TokenKind::Quote) {
        p.cursor.advance();
        let bytes = parse_text_bytes_sequence(p);
        let source = String::from_utf8_lossy(&bytes).into_owned();
        RawModule::Quote { name, source, span }
    } else {
        let mut module = super::parse_module_fields(p);
        module.name = name;
        RawModule::Text(module)
    }
}

/// Parse a `(module ...)` wrapped in its own parentheses, as it appears
/// as an `assert_malformed`/`assert_invalid`/`assert_unlinkable`/
/// `assert_uninstantiable` operand.
fn parse_wrapped_raw_module<R: Reporter>(p: &mut Parser<'_, R>) -> RawModule {
    let span = p.cursor.current_span();
    if !p.expect_lparen() {
        return RawModule::Text(wat_ir::Module::new());
    }
    if !p.expect_kind(&TokenKind::Module) {
        p.recover_to_matching_rparen();
        return RawModule::Text(wat_ir::Module::new());
    }
    let raw = parse_raw_module(p, span);
    if !p.expect_rparen() {
        p.recover_to_matching_rparen();
    }
    raw
}

/// Parse one top-level script command, assuming the caller already
/// consumed the enclosing `(`.
fn parse_command<R: Reporter>(p: &mut Parser<'_, R>) -> Option<Command> {
    let span = p.cursor.current_span();
    match p.cursor.current_kind().clone() {
        TokenKind::Module => {
            p.cursor.advance();
            let raw = parse_raw_module(p, span);
            if !p.expect_rparen() {
                p.recover_to_matching_rparen();
            }
            Some(Command::Module(raw))
        }
        TokenKind::Register => {
            p.cursor.advance();
            let name = parse_quoted_field(p);
            let module = parse_optional_module_var(p);
            if !p.expect_rparen() {
                p.recover_to_matching_rparen();
            }
            Some(Command::Register { name, module, span })
        }
        TokenKind::Invoke | TokenKind::Get => {
            let action = parse_action(p);
            if !p.expect_rparen() {
                p.recover_to_matching_rparen();
            }
            Some(Command::Action(action))
        }
        TokenKind::AssertReturn => {
            p.cursor.advance();
            let action = parse_wrapped_action(p);
            let mut expected = Vec::new();
            while p.cursor.check(&TokenKind::ParenOpen) {
                expected.push(parse_const_expectation(p));
            }
            if !p.expect_rparen() {
                p.recover_to_matching_rparen();
            }
            Some(Command::AssertReturn { action, expected })
        }
        TokenKind::AssertReturnCanonicalNan => {
            p.cursor.advance();
            let action = parse_wrapped_action(p);
            if !p.expect_rparen() {
                p.recover_to_matching_rparen();
            }
            Some(Command::AssertReturn { action, expected: vec![ConstExpectation::CanonicalNan] })
        }
        TokenKind::AssertReturnArithmeticNan => {
            p.cursor.advance();
            let action = parse_wrapped_action(p);
            if !p.expect_rparen() {
                p.recover_to_matching_rparen();
            }
            Some(Command::AssertReturn { action, expected: vec![ConstExpectation::ArithmeticNan] })
        }
        TokenKind::AssertTrap => {
            p.cursor.advance();
            let action = parse_wrapped_action(p);
            let message = parse_quoted_field(p);
            if !p.expect_rparen() {
                p.recover_to_matching_rparen();
            }
            Some(Command::AssertTrap { action, message })
        }
        TokenKind::AssertExhaustion => {
            p.cursor.advance();
            let action = parse_wrapped_action(p);
            let message = parse_quoted_field(p);
            if !p.expect_rparen() {
                p.recover_to_matching_rparen();
            }
            Some(Command::AssertExhaustion { action, message })
        }
        TokenKind::AssertMalformed => {
            p.cursor.advance();
            let module = parse_wrapped_raw_module(p);
            let message = parse_quoted_field(p);
            if !p.expect_rparen() {
                p.recover_to_matching_rparen();
            }
            Some(Command::AssertMalformed { module, message })
        }
        TokenKind::AssertInvalid => {
            p.cursor.advance();
            let module = parse_wrapped_raw_module(p);
            let message = parse_quoted_field(p);
            if !p.expect_rparen() {
                p.recover_to_matching_rparen();
            }
            Some(Command::AssertInvalid { module, message })
        }
        TokenKind::AssertUnlinkable => {
            p.cursor.advance();
            let module = parse_wrapped_raw_module(p);
            let message = parse_quoted_field(p);
            if !p.expect_rparen() {
                p.recover_to_matching_rparen();
            }
            Some(Command::AssertUnlinkable { module, message })
        }
        TokenKind::AssertUninstantiable => {
            p.cursor.advance();
            let module = parse_wrapped_raw_module(p);
            let message = parse_quoted_field(p);
            if !p.expect_rparen() {
                p.recover_to_matching_rparen();
            }
            Some(Command::AssertUninstantiable { module, message })
        }
        _ => {
            p.report_unexpected(&[
                "`module`", "`register`", "`invoke`", "`get`", "`assert_return`", "`assert_trap`",
            ]);
            p.recover_to_matching_rparen();
            None
        }
    }
}

/// Parse a whole script: a sequence of top-level commands, each its own
/// parenthesized form, until end of input (spec §3 "Script").
pub fn parse_commands<R: Reporter>(p: &mut Parser<'_, R>) -> Script {
    let mut script = Script::new();
    while !p.cursor.is_at_end() {
        let Some(_lparen) = p.cursor.eat_lparen() else {
            p.report_unexpected(&["`(`"]);
            p.cursor.advance();
            continue;
        };
        if let Some(command) = parse_command(p) {
            script.commands.push(command);
        }
    }
    script
}
