//! Token cursor: lookahead and consumption over a [`TokenList`].

use patty_ir::Span;

use crate::token::{TemplateParts, Token, TokenKind, TokenList};

/// Position in a token stream. The last token is always `Eof`, and the
/// cursor never moves past it.
pub struct Cursor {
    tokens: TokenList,
    pos: usize,
}

impl Cursor {
    pub fn new(tokens: TokenList) -> Self {
        Cursor { tokens, pos: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn current(&self) -> Token {
        self.token_at(self.pos)
    }

    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    pub fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.token_at(self.pos - 1).span
        } else {
            Span::DUMMY
        }
    }

    /// Token at an absolute position, clamped to `Eof`.
    pub fn token_at(&self, pos: usize) -> Token {
        self.tokens
            .tokens
            .get(pos)
            .or_else(|| self.tokens.tokens.last())
            .copied()
            .unwrap_or(Token {
                kind: TokenKind::Eof,
                span: Span::DUMMY,
                newline_before: false,
            })
    }

    /// Kind of the token `n` ahead of the current one.
    #[inline]
    pub fn peek_kind(&self, n: usize) -> TokenKind {
        self.token_at(self.pos + n).kind
    }

    #[inline]
    pub fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    #[inline]
    pub fn at_eof(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    pub fn advance(&mut self) -> Token {
        let token = self.current();
        if !matches!(token.kind, TokenKind::Eof) {
            self.pos += 1;
        }
        token
    }

    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn template(&self, index: u32) -> Option<&TemplateParts> {
        self.tokens.templates.get(index as usize)
    }

    /// Starting at an opening `(`, `[` or `{` at `pos`, the position of its
    /// matching closer.
    pub fn matching_close(&self, pos: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut i = pos;
        loop {
            match self.token_at(i).kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                TokenKind::Eof => return None,
                _ => {}
            }
            i += 1;
        }
    }
}
