//! Concrete Token Source Adapter for WebAssembly text-format source,
//! grounded on `ori_lexer`'s `logos`-based `RawToken` → `TokenKind`
//! pipeline.
//!
//! Tokenizes the whole source eagerly into a `Vec<Token>` (mirroring
//! `ori_lexer::lex`'s `TokenList` batch style) and exposes it through
//! `wat_lexer_core::TokenSource`'s pull interface.

mod line_index;
mod raw_token;

use line_index::LineIndex;
use logos::Logos;
use raw_token::RawToken;
use wat_ir::{
    BinaryOp, CompareOp, ConvertOp, LoadOp, Position, Span, StoreOp, UnaryOp, ValType,
};
use wat_lexer_core::{Token, TokenKind, TokenSource};

/// Tokenize `source` into a flat token list, mirroring `ori_lexer::lex`.
pub fn lex(source: &str) -> Vec<Token> {
    let line_index = LineIndex::new(source);
    let mut tokens = Vec::new();
    let mut logos = RawToken::lexer(source);

    while let Some(result) = logos.next() {
        let range = logos.span();
        let span = Span::new(line_index.position(range.start), line_index.position(range.end));
        let slice = logos.slice();
        match result {
            Ok(raw) => {
                if let Some(kind) = convert(raw) {
                    tokens.push(Token::new(kind, slice, span));
                }
            }
            Err(()) => tokens.push(Token::new(TokenKind::Error, slice, span)),
        }
    }

    let eof_pos = line_index.position(source.len());
    tokens.push(Token::new(TokenKind::Eof, "", Span::point(eof_pos)));
    tokens
}

/// Convert a raw `logos` token to its `TokenKind`. Returns `None` for
/// trivia (comments), which are dropped rather than forwarded to the
/// Grammar Engine.
fn convert(raw: RawToken) -> Option<TokenKind> {
    use RawToken as R;
    Some(match raw {
        R::LineComment | R::BlockComment => return None,

        R::LParen => TokenKind::ParenOpen,
        R::RParen => TokenKind::ParenClose,

        R::Nat => TokenKind::Nat,
        R::Int => TokenKind::Int,
        R::Float => TokenKind::Float,
        R::Text => TokenKind::Text,
        R::Var => TokenKind::Var,

        R::I32 => TokenKind::ValueType(ValType::I32),
        R::I64 => TokenKind::ValueType(ValType::I64),
        R::F32 => TokenKind::ValueType(ValType::F32),
        R::F64 => TokenKind::ValueType(ValType::F64),
        R::AnyFunc => TokenKind::AnyFunc,
        R::Mut => TokenKind::Mut,

        R::Module => TokenKind::Module,
        R::Func => TokenKind::Func,
        R::Param => TokenKind::Param,
        R::Result => TokenKind::Result,
        R::Local => TokenKind::Local,
        R::TypeKw => TokenKind::TypeKw,
        R::Import => TokenKind::Import,
        R::Export => TokenKind::Export,
        R::Table => TokenKind::Table,
        R::Memory => TokenKind::Memory,
        R::Global => TokenKind::Global,
        R::Elem => TokenKind::Elem,
        R::Data => TokenKind::Data,
        R::Start => TokenKind::Start,
        R::Offset => TokenKind::Offset,
        R::MemArgOffset => TokenKind::MemArgOffset,
        R::MemArgAlign => TokenKind::MemArgAlign,
        R::Block => TokenKind::Block,
        R::Loop => TokenKind::Loop,
        R::If => TokenKind::If,
        R::Then => TokenKind::Then,
        R::Else => TokenKind::Else,
        R::End => TokenKind::End,

        R::Invoke => TokenKind::Invoke,
        R::Get => TokenKind::Get,
        R::Register => TokenKind::Register,
        R::AssertReturn => TokenKind::AssertReturn,
        R::AssertReturnCanonicalNan => TokenKind::AssertReturnCanonicalNan,
        R::AssertReturnArithmeticNan => TokenKind::AssertReturnArithmeticNan,
        R::AssertTrap => TokenKind::AssertTrap,
        R::AssertExhaustion => TokenKind::AssertExhaustion,
        R::AssertMalformed => TokenKind::AssertMalformed,
        R::AssertInvalid => TokenKind::AssertInvalid,
        R::AssertUnlinkable => TokenKind::AssertUnlinkable,
        R::AssertUninstantiable => TokenKind::AssertUninstantiable,
        R::Quote => TokenKind::Quote,
        R::BinaryKw => TokenKind::BinaryKw,

        R::Unreachable => TokenKind::Unreachable,
        R::NopKw => TokenKind::NopKw,
        R::DropKw => TokenKind::DropKw,
        R::SelectKw => TokenKind::SelectKw,
        R::Br => TokenKind::Br,
        R::BrIf => TokenKind::BrIf,
        R::BrTable => TokenKind::BrTable,
        R::ReturnKw => TokenKind::ReturnKw,
        R::Call => TokenKind::Call,
        R::CallIndirect => TokenKind::CallIndirect,
        R::GetLocal => TokenKind::GetLocal,
        R::SetLocal => TokenKind::SetLocal,
        R::TeeLocal => TokenKind::TeeLocal,
        R::GetGlobal => TokenKind::GetGlobal,
        R::SetGlobal => TokenKind::SetGlobal,
        R::CurrentMemory => TokenKind::CurrentMemory,
        R::GrowMemory => TokenKind::GrowMemory,

        R::Try => TokenKind::Try,
        R::Catch => TokenKind::Catch,
        R::CatchAll => TokenKind::CatchAll,
        R::Throw => TokenKind::Throw,
        R::Rethrow => TokenKind::Rethrow,

        R::I32Load => TokenKind::Load(LoadOp::I32Load),
        R::I64Load => TokenKind::Load(LoadOp::I64Load),
        R::F32Load => TokenKind::Load(LoadOp::F32Load),
        R::F64Load => TokenKind::Load(LoadOp::F64Load),
        R::I32Load8S => TokenKind::Load(LoadOp::I32Load8S),
        R::I32Load8U => TokenKind::Load(LoadOp::I32Load8U),
        R::I32Load16S => TokenKind::Load(LoadOp::I32Load16S),
        R::I32Load16U => TokenKind::Load(LoadOp::I32Load16U),
        R::I64Load8S => TokenKind::Load(LoadOp::I64Load8S),
        R::I64Load8U => TokenKind::Load(LoadOp::I64Load8U),
        R::I64Load16S => TokenKind::Load(LoadOp::I64Load16S),
        R::I64Load16U => TokenKind::Load(LoadOp::I64Load16U),
        R::I64Load32S => TokenKind::Load(LoadOp::I64Load32S),
        R::I64Load32U => TokenKind::Load(LoadOp::I64Load32U),

        R::I32Store => TokenKind::Store(StoreOp::I32Store),
        R::I64Store => TokenKind::Store(StoreOp::I64Store),
        R::F32Store => TokenKind::Store(StoreOp::F32Store),
        R::F64Store => TokenKind::Store(StoreOp::F64Store),
        R::I32Store8 => TokenKind::Store(StoreOp::I32Store8),
        R::I32Store16 => TokenKind::Store(StoreOp::I32Store16),
        R::I64Store8 => TokenKind::Store(StoreOp::I64Store8),
        R::I64Store16 => TokenKind::Store(StoreOp::I64Store16),
        R::I64Store32 => TokenKind::Store(StoreOp::I64Store32),

        R::I32Const => TokenKind::ConstOp(ValType::I32),
        R::I64Const => TokenKind::ConstOp(ValType::I64),
        R::F32Const => TokenKind::ConstOp(ValType::F32),
        R::F64Const => TokenKind::ConstOp(ValType::F64),

        R::I32Clz => TokenKind::UnaryOp(UnaryOp::I32Clz),
        R::I32Ctz => TokenKind::UnaryOp(UnaryOp::I32Ctz),
        R::I32Popcnt => TokenKind::UnaryOp(UnaryOp::I32Popcnt),
        R::I64Clz => TokenKind::UnaryOp(UnaryOp::I64Clz),
        R::I64Ctz => TokenKind::UnaryOp(UnaryOp::I64Ctz),
        R::I64Popcnt => TokenKind::UnaryOp(UnaryOp::I64Popcnt),
        R::F32Abs => TokenKind::UnaryOp(UnaryOp::F32Abs),
        R::F32Neg => TokenKind::UnaryOp(UnaryOp::F32Neg),
        R::F32Ceil => TokenKind::UnaryOp(UnaryOp::F32Ceil),
        R::F32Floor => TokenKind::UnaryOp(UnaryOp::F32Floor),
        R::F32Trunc => TokenKind::UnaryOp(UnaryOp::F32Trunc),
        R::F32Nearest => TokenKind::UnaryOp(UnaryOp::F32Nearest),
        R::F32Sqrt => TokenKind::UnaryOp(UnaryOp::F32Sqrt),
        R::F64Abs => TokenKind::UnaryOp(UnaryOp::F64Abs),
        R::F64Neg => TokenKind::UnaryOp(UnaryOp::F64Neg),
        R::F64Ceil => TokenKind::UnaryOp(UnaryOp::F64Ceil),
        R::F64Floor => TokenKind::UnaryOp(UnaryOp::F64Floor),
        R::F64Trunc => TokenKind::UnaryOp(UnaryOp::F64Trunc),
        R::F64Nearest => TokenKind::UnaryOp(UnaryOp::F64Nearest),
        R::F64Sqrt => TokenKind::UnaryOp(UnaryOp::F64Sqrt),

        R::I32Add => TokenKind::BinaryOp(BinaryOp::I32Add),
        R::I32Sub => TokenKind::BinaryOp(BinaryOp::I32Sub),
        R::I32Mul => TokenKind::BinaryOp(BinaryOp::I32Mul),
        R::I32DivS => TokenKind::BinaryOp(BinaryOp::I32DivS),
        R::I32DivU => TokenKind::BinaryOp(BinaryOp::I32DivU),
        R::I32RemS => TokenKind::BinaryOp(BinaryOp::I32RemS),
        R::I32RemU => TokenKind::BinaryOp(BinaryOp::I32RemU),
        R::I32And => TokenKind::BinaryOp(BinaryOp::I32And),
        R::I32Or => TokenKind::BinaryOp(BinaryOp::I32Or),
        R::I32Xor => TokenKind::BinaryOp(BinaryOp::I32Xor),
        R::I32Shl => TokenKind::BinaryOp(BinaryOp::I32Shl),
        R::I32ShrS => TokenKind::BinaryOp(BinaryOp::I32ShrS),
        R::I32ShrU => TokenKind::BinaryOp(BinaryOp::I32ShrU),
        R::I32Rotl => TokenKind::BinaryOp(BinaryOp::I32Rotl),
        R::I32Rotr => TokenKind::BinaryOp(BinaryOp::I32Rotr),
        R::I64Add => TokenKind::BinaryOp(BinaryOp::I64Add),
        R::I64Sub => TokenKind::BinaryOp(BinaryOp::I64Sub),
        R::I64Mul => TokenKind::BinaryOp(BinaryOp::I64Mul),
        R::I64DivS => TokenKind::BinaryOp(BinaryOp::I64DivS),
        R::I64DivU => TokenKind::BinaryOp(BinaryOp::I64DivU),
        R::I64RemS => TokenKind::BinaryOp(BinaryOp::I64RemS),
        R::I64RemU => TokenKind::BinaryOp(BinaryOp::I64RemU),
        R::I64And => TokenKind::BinaryOp(BinaryOp::I64And),
        R::I64Or => TokenKind::BinaryOp(BinaryOp::I64Or),
        R::I64Xor => TokenKind::BinaryOp(BinaryOp::I64Xor),
        R::I64Shl => TokenKind::BinaryOp(BinaryOp::I64Shl),
        R::I64ShrS => TokenKind::BinaryOp(BinaryOp::I64ShrS),
        R::I64ShrU => TokenKind::BinaryOp(BinaryOp::I64ShrU),
        R::I64Rotl => TokenKind::BinaryOp(BinaryOp::I64Rotl),
        R::I64Rotr => TokenKind::BinaryOp(BinaryOp::I64Rotr),
        R::F32Add => TokenKind::BinaryOp(BinaryOp::F32Add),
        R::F32Sub => TokenKind::BinaryOp(BinaryOp::F32Sub),
        R::F32Mul => TokenKind::BinaryOp(BinaryOp::F32Mul),
        R::F32Div => TokenKind::BinaryOp(BinaryOp::F32Div),
        R::F32Min => TokenKind::BinaryOp(BinaryOp::F32Min),
        R::F32Max => TokenKind::BinaryOp(BinaryOp::F32Max),
        R::F32Copysign => TokenKind::BinaryOp(BinaryOp::F32Copysign),
        R::F64Add => TokenKind::BinaryOp(BinaryOp::F64Add),
        R::F64Sub => TokenKind::BinaryOp(BinaryOp::F64Sub),
        R::F64Mul => TokenKind::BinaryOp(BinaryOp::F64Mul),
        R::F64Div => TokenKind::BinaryOp(BinaryOp::F64Div),
        R::F64Min => TokenKind::BinaryOp(BinaryOp::F64Min),
        R::F64Max => TokenKind::BinaryOp(BinaryOp::F64Max),
        R::F64Copysign => TokenKind::BinaryOp(BinaryOp::F64Copysign),

        R::I32Eqz => TokenKind::CompareOp(CompareOp::I32Eqz),
        R::I32Eq => TokenKind::CompareOp(CompareOp::I32Eq),
        R::I32Ne => TokenKind::CompareOp(CompareOp::I32Ne),
        R::I32LtS => TokenKind::CompareOp(CompareOp::I32LtS),
        R::I32LtU => TokenKind::CompareOp(CompareOp::I32LtU),
        R::I32GtS => TokenKind::CompareOp(CompareOp::I32GtS),
        R::I32GtU => TokenKind::CompareOp(CompareOp::I32GtU),
        R::I32LeS => TokenKind::CompareOp(CompareOp::I32LeS),
        R::I32LeU => TokenKind::CompareOp(CompareOp::I32LeU),
        R::I32GeS => TokenKind::CompareOp(CompareOp::I32GeS),
        R::I32GeU => TokenKind::CompareOp(CompareOp::I32GeU),
        R::I64Eqz => TokenKind::CompareOp(CompareOp::I64Eqz),
        R::I64Eq => TokenKind::CompareOp(CompareOp::I64Eq),
        R::I64Ne => TokenKind::CompareOp(CompareOp::I64Ne),
        R::I64LtS => TokenKind::CompareOp(CompareOp::I64LtS),
        R::I64LtU => TokenKind::CompareOp(CompareOp::I64LtU),
        R::I64GtS => TokenKind::CompareOp(CompareOp::I64GtS),
        R::I64GtU => TokenKind::CompareOp(CompareOp::I64GtU),
        R::I64LeS => TokenKind::CompareOp(CompareOp::I64LeS),
        R::I64LeU => TokenKind::CompareOp(CompareOp::I64LeU),
        R::I64GeS => TokenKind::CompareOp(CompareOp::I64GeS),
        R::I64GeU => TokenKind::CompareOp(CompareOp::I64GeU),
        R::F32Eq => TokenKind::CompareOp(CompareOp::F32Eq),
        R::F32Ne => TokenKind::CompareOp(CompareOp::F32Ne),
        R::F32Lt => TokenKind::CompareOp(CompareOp::F32Lt),
        R::F32Gt => TokenKind::CompareOp(CompareOp::F32Gt),
        R::F32Le => TokenKind::CompareOp(CompareOp::F32Le),
        R::F32Ge => TokenKind::CompareOp(CompareOp::F32Ge),
        R::F64Eq => TokenKind::CompareOp(CompareOp::F64Eq),
        R::F64Ne => TokenKind::CompareOp(CompareOp::F64Ne),
        R::F64Lt => TokenKind::CompareOp(CompareOp::F64Lt),
        R::F64Gt => TokenKind::CompareOp(CompareOp::F64Gt),
        R::F64Le => TokenKind::CompareOp(CompareOp::F64Le),
        R::F64Ge => TokenKind::CompareOp(CompareOp::F64Ge),

        R::I32WrapI64 => TokenKind::ConvertOp(ConvertOp::I32WrapI64),
        R::I32TruncF32S => TokenKind::ConvertOp(ConvertOp::I32TruncF32S),
        R::I32TruncF32U => TokenKind::ConvertOp(ConvertOp::I32TruncF32U),
        R::I32TruncF64S => TokenKind::ConvertOp(ConvertOp::I32TruncF64S),
        R::I32TruncF64U => TokenKind::ConvertOp(ConvertOp::I32TruncF64U),
        R::I64ExtendI32S => TokenKind::ConvertOp(ConvertOp::I64ExtendI32S),
        R::I64ExtendI32U => TokenKind::ConvertOp(ConvertOp::I64ExtendI32U),
        R::I64TruncF32S => TokenKind::ConvertOp(ConvertOp::I64TruncF32S),
        R::I64TruncF32U => TokenKind::ConvertOp(ConvertOp::I64TruncF32U),
        R::I64TruncF64S => TokenKind::ConvertOp(ConvertOp::I64TruncF64S),
        R::I64TruncF64U => TokenKind::ConvertOp(ConvertOp::I64TruncF64U),
        R::F32ConvertI32S => TokenKind::ConvertOp(ConvertOp::F32ConvertI32S),
        R::F32ConvertI32U => TokenKind::ConvertOp(ConvertOp::F32ConvertI32U),
        R::F32ConvertI64S => TokenKind::ConvertOp(ConvertOp::F32ConvertI64S),
        R::F32ConvertI64U => TokenKind::ConvertOp(ConvertOp::F32ConvertI64U),
        R::F32DemoteF64 => TokenKind::ConvertOp(ConvertOp::F32DemoteF64),
        R::F64ConvertI32S => TokenKind::ConvertOp(ConvertOp::F64ConvertI32S),
        R::F64ConvertI32U => TokenKind::ConvertOp(ConvertOp::F64ConvertI32U),
        R::F64ConvertI64S => TokenKind::ConvertOp(ConvertOp::F64ConvertI64S),
        R::F64ConvertI64U => TokenKind::ConvertOp(ConvertOp::F64ConvertI64U),
        R::F64PromoteF32 => TokenKind::ConvertOp(ConvertOp::F64PromoteF32),
        R::I32ReinterpretF32 => TokenKind::ConvertOp(ConvertOp::I32ReinterpretF32),
        R::I64ReinterpretF64 => TokenKind::ConvertOp(ConvertOp::I64ReinterpretF64),
        R::F32ReinterpretI32 => TokenKind::ConvertOp(ConvertOp::F32ReinterpretI32),
        R::F64ReinterpretI64 => TokenKind::ConvertOp(ConvertOp::F64ReinterpretI64),
    })
}

/// `TokenSource` over an eagerly-tokenized buffer, the adapter `watc` and
/// `wat_parse`'s integration tests drive the Grammar Engine with.
pub struct Lexer {
    tokens: std::vec::IntoIter<Token>,
    eof: Token,
    reported: Vec<(Span, String)>,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        let tokens = lex(source);
        let eof = tokens
            .last()
            .cloned()
            .unwrap_or_else(|| Token::eof(Span::point(Position::START)));
        Lexer {
            tokens: tokens.into_iter(),
            eof,
            reported: Vec::new(),
        }
    }

    pub fn reported(&self) -> &[(Span, String)] {
        &self.reported
    }
}

impl TokenSource for Lexer {
    fn next_token(&mut self) -> Token {
        self.tokens.next().unwrap_or_else(|| self.eof.clone())
    }

    fn report(&mut self, span: Span, message: String) {
        self.reported.push((span, message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_minimal_module() {
        let tokens = lex("(module)");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::ParenOpen,
                TokenKind::Module,
                TokenKind::ParenClose,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn skips_line_and_block_comments() {
        let tokens = lex("(module ;; comment\n (; nested (; deep ;) still ;) (func))");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::ParenOpen,
                TokenKind::Module,
                TokenKind::ParenOpen,
                TokenKind::Func,
                TokenKind::ParenClose,
                TokenKind::ParenClose,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn classifies_literal_forms() {
        let tokens = lex("42 -7 +3.14 0x1A $foo \"bar\"");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Nat,
                TokenKind::Int,
                TokenKind::Float,
                TokenKind::Nat,
                TokenKind::Var,
                TokenKind::Text,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn classifies_load_store_const_families() {
        let tokens = lex("i32.load i64.store8 f64.const");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Load(LoadOp::I32Load),
                TokenKind::Store(StoreOp::I64Store8),
                TokenKind::ConstOp(ValType::F64),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn spans_track_line_and_column() {
        let tokens = lex("(module\n  (func))");
        let func_tok = tokens
            .iter()
            .find(|t| t.kind == TokenKind::Func)
            .expect("func token");
        assert_eq!(func_tok.span.start, Position::new(2, 4));
    }

    #[test]
    fn lexer_adapter_reports_eof_after_exhaustion() {
        let mut lexer = Lexer::new("(module)");
        for _ in 0..3 {
            lexer.next_token();
        }
        assert!(lexer.next_token().kind.is_eof());
        assert!(lexer.next_token().kind.is_eof());
    }

    #[test]
    fn classifies_memarg_clauses() {
        let tokens = lex("i32.load offset=4 align=2");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Load(LoadOp::I32Load),
                TokenKind::MemArgOffset,
                TokenKind::MemArgAlign,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unterminated_string_yields_error_token() {
        let tokens = lex("\"unterminated");
        assert_eq!(tokens[0].kind, TokenKind::Error);
    }
}
