//! Token cursor: the Grammar Engine's only way to look at the token
//! stream, grounded on `ori_parse::Cursor` pared down to what a
//! single-pass recursive-descent reader over `wat_lexer_core::Token`
//! needs (no token-flags bitset, no incremental token capture).

use wat_ir::Span;
use wat_lexer_core::{Token, TokenKind};

pub struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        debug_assert!(
            tokens.last().is_some_and(|t| t.kind.is_eof()),
            "token stream must end with an Eof token"
        );
        Cursor { tokens, pos: 0 }
    }

    #[inline]
    pub fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    #[inline]
    pub fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.current_kind().is_eof()
    }

    #[inline]
    pub fn peek_kind_at(&self, n: usize) -> &TokenKind {
        self.tokens
            .get(self.pos + n)
            .map_or(&TokenKind::Eof, |t| &t.kind)
    }

    #[inline]
    pub fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Advance past the current token and return it.
    #[inline]
    pub fn advance(&mut self) -> &Token {
        let at = self.pos.min(self.tokens.len() - 1);
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        &self.tokens[at]
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn set_position(&mut self, pos: usize) {
        debug_assert!(pos <= self.tokens.len());
        self.pos = pos;
    }

    /// Consume `(`, returning its span, or `None` without consuming.
    pub fn eat_lparen(&mut self) -> Option<Span> {
        if self.check(&TokenKind::ParenOpen) {
            Some(self.advance().span)
        } else {
            None
        }
    }

    pub fn eat_rparen(&mut self) -> Option<Span> {
        if self.check(&TokenKind::ParenClose) {
            Some(self.advance().span)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wat_ir::Position;

    fn tokens(kinds: &[TokenKind]) -> Vec<Token> {
        let mut tokens: Vec<Token> = kinds
            .iter()
            .cloned()
            .map(|k| Token::new(k, "", Span::point(Position::START)))
            .collect();
        tokens.push(Token::eof(Span::point(Position::START)));
        tokens
    }

    #[test]
    fn advances_through_stream_and_stops_at_eof() {
        let toks = tokens(&[TokenKind::ParenOpen, TokenKind::Module, TokenKind::ParenClose]);
        let mut cursor = Cursor::new(&toks);
        assert!(cursor.check(&TokenKind::ParenOpen));
        cursor.advance();
        assert!(cursor.check(&TokenKind::Module));
        cursor.advance();
        assert!(cursor.check(&TokenKind::ParenClose));
        cursor.advance();
        assert!(cursor.is_at_end());
        cursor.advance();
        assert!(cursor.is_at_end());
    }

    #[test]
    fn snapshot_restore_roundtrips_position() {
        let toks = tokens(&[TokenKind::ParenOpen, TokenKind::Module]);
        let mut cursor = Cursor::new(&toks);
        cursor.advance();
        let saved = cursor.position();
        cursor.advance();
        cursor.set_position(saved);
        assert!(cursor.check(&TokenKind::Module));
    }

    #[test]
    fn peek_past_end_is_eof() {
        let toks = tokens(&[TokenKind::ParenOpen]);
        let cursor = Cursor::new(&toks);
        assert!(cursor.peek_kind_at(10).is_eof());
    }
}
