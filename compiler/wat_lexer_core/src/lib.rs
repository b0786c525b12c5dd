//! `wat_lexer_core` — the Token Source Adapter interface the Grammar
//! Engine (`wat_parse`) is written against (spec §6 "Token Source").
//!
//! This crate defines the trait boundary only; `wat_lexer` provides the
//! concrete `logos`-based implementation. Keeping the interface in its
//! own crate lets `wat_parse` depend on a narrow contract rather than a
//! specific tokenizer, mirroring `ori_lexer_core`'s split from `ori_lexer`.

mod token;

pub use token::{Token, TokenKind};

use wat_ir::Span;

/// Pull-based token source. Spec §6: "a pull interface yielding (kind,
/// lexeme, location); returns an EOF sentinel once exhausted" plus a
/// `report` method "forwarded from the grammar engine" for lexical
/// errors raised while scanning ahead (e.g. an unterminated string).
pub trait TokenSource {
    /// Produce the next token, or an `Eof`-kind token forever once the
    /// underlying source is exhausted.
    fn next_token(&mut self) -> Token;

    /// Forward a diagnostic discovered by the token source itself
    /// (spec §7 "Lexical" errors: unterminated string, invalid escape,
    /// unrecognized character) to whatever is collecting diagnostics for
    /// this parse.
    fn report(&mut self, span: Span, message: String);
}

/// An in-memory `TokenSource` over a pre-built token list: the Token
/// Source Adapter pattern applied to tokens that already exist, useful
/// for feeding `wat_parse` a fixture without invoking `wat_lexer`.
pub struct VecTokenSource {
    tokens: std::vec::IntoIter<Token>,
    eof_span: Span,
    errors: Vec<(Span, String)>,
}

impl VecTokenSource {
    pub fn new(tokens: Vec<Token>, eof_span: Span) -> Self {
        VecTokenSource {
            tokens: tokens.into_iter(),
            eof_span,
            errors: Vec::new(),
        }
    }

    /// Diagnostics collected via `report` while this source was driven.
    pub fn reported(&self) -> &[(Span, String)] {
        &self.errors
    }
}

impl TokenSource for VecTokenSource {
    fn next_token(&mut self) -> Token {
        self.tokens
            .next()
            .unwrap_or_else(|| Token::eof(self.eof_span))
    }

    fn report(&mut self, span: Span, message: String) {
        self.errors.push((span, message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wat_ir::Span;

    #[test]
    fn exhausted_source_yields_eof_forever() {
        let mut source = VecTokenSource::new(Vec::new(), Span::DUMMY);
        assert!(source.next_token().kind.is_eof());
        assert!(source.next_token().kind.is_eof());
    }

    #[test]
    fn yields_tokens_in_order_then_eof() {
        let tokens = vec![
            Token::new(TokenKind::ParenOpen, "(", Span::DUMMY),
            Token::new(TokenKind::Module, "module", Span::DUMMY),
            Token::new(TokenKind::ParenClose, ")", Span::DUMMY),
        ];
        let mut source = VecTokenSource::new(tokens, Span::DUMMY);
        assert_eq!(source.next_token().kind, TokenKind::ParenOpen);
        assert_eq!(source.next_token().kind, TokenKind::Module);
        assert_eq!(source.next_token().kind, TokenKind::ParenClose);
        assert!(source.next_token().kind.is_eof());
    }

    #[test]
    fn report_is_collected() {
        let mut source = VecTokenSource::new(Vec::new(), Span::DUMMY);
        source.report(Span::DUMMY, "bad escape".to_string());
        assert_eq!(source.reported().len(), 1);
    }
}
