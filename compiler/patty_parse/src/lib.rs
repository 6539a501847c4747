//! Parser for the ECMAScript subset the pattycake pass reads.
//!
//! Produces a [`Program`] in an [`ExprArena`]. Only what real match sites
//! need is accepted: declarations with destructuring, functions and
//! arrows, control flow used by handler bodies, template literals,
//! optional chaining, and named imports. Anything else is a
//! [`ParseError`] with a span.
//!
//! # Design
//!
//! Hand-written recursive descent over a logos token stream, with
//! precedence climbing for binary operators. Arrow functions are detected
//! by scanning to the matching `)` and checking for `=>`, so parameters
//! are parsed directly as binding patterns instead of being reinterpreted
//! from expressions.
//!
//! Semicolons are optional at statement end when the next token is on a
//! new line, a `}`, or end of file.

mod cursor;
mod error;
mod grammar;
mod lexer;
mod token;

pub use cursor::Cursor;
pub use error::{LexError, ParseError};
pub use lexer::{lex, lex_at};
pub use token::{TemplateParts, Token, TokenKind, TokenList};

use patty_diagnostic::ErrorCode;
use patty_ir::{ExprArena, ExprId, Name, Program, Span, StringInterner};

/// A parsed file: its top-level statement list and the arena owning it.
#[derive(Debug)]
pub struct ParseOutput {
    pub program: Program,
    pub arena: ExprArena,
}

/// Parse a whole source file.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse(source: &str, interner: &StringInterner) -> Result<ParseOutput, ParseError> {
    let mut arena = ExprArena::new();
    let program = parse_into(source, &mut arena, interner)?;
    Ok(ParseOutput { program, arena })
}

/// Parse a source file into an existing arena.
pub fn parse_into(
    source: &str,
    arena: &mut ExprArena,
    interner: &StringInterner,
) -> Result<Program, ParseError> {
    let tokens = lex(source, interner)?;
    let mut parser = Parser::new(tokens, source, interner, arena);
    parser.parse_program()
}

/// Parse a single expression; the whole input must be consumed.
pub fn parse_expression(
    source: &str,
    arena: &mut ExprArena,
    interner: &StringInterner,
) -> Result<ExprId, ParseError> {
    let tokens = lex(source, interner)?;
    let mut parser = Parser::new(tokens, source, interner, arena);
    let expr = parser.parse_expr()?;
    parser.expect(TokenKind::Eof)?;
    Ok(expr)
}

/// Recursive-descent parser state.
pub struct Parser<'a> {
    cursor: Cursor,
    source: &'a str,
    interner: &'a StringInterner,
    arena: &'a mut ExprArena,
}

impl<'a> Parser<'a> {
    pub fn new(
        tokens: TokenList,
        source: &'a str,
        interner: &'a StringInterner,
        arena: &'a mut ExprArena,
    ) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            source,
            interner,
            arena,
        }
    }

    // ── Token helpers ───────────────────────────────────────────────

    #[inline]
    fn kind(&self) -> TokenKind {
        self.cursor.current_kind()
    }

    #[inline]
    fn span(&self) -> Span {
        self.cursor.current_span()
    }

    /// Span from `start` to the end of the last consumed token.
    #[inline]
    fn span_from(&self, start: Span) -> Span {
        start.to(self.cursor.previous_span())
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Span, ParseError> {
        if self.cursor.check(kind) {
            Ok(self.cursor.advance().span)
        } else {
            Err(ParseError::expected(
                &format!("`{}`", kind.display_name()),
                &self.kind(),
                self.span(),
            ))
        }
    }

    fn expect_ident(&mut self) -> Result<(Name, Span), ParseError> {
        match self.kind() {
            TokenKind::Ident(name) => Ok((name, self.cursor.advance().span)),
            found => Err(ParseError::new(
                ErrorCode::E1004,
                format!("expected identifier, found `{}`", found.display_name()),
                self.span(),
            )),
        }
    }

    /// Identifier or keyword, as accepted after `.` and in object keys.
    fn property_name(&mut self) -> Result<(Name, Span), ParseError> {
        if let Some(keyword) = self.kind().keyword_str() {
            let span = self.cursor.advance().span;
            return Ok((self.interner.intern(keyword), span));
        }
        self.expect_ident()
    }

    /// The current token is the contextual keyword `word` (`async`, `from`, `as`).
    fn at_contextual(&self, word: &str) -> bool {
        matches!(self.kind(), TokenKind::Ident(name) if self.interner.lookup(name) == word)
    }

    fn end_statement(&mut self) -> Result<(), ParseError> {
        if self.cursor.eat(TokenKind::Semicolon) {
            return Ok(());
        }
        let token = self.cursor.current();
        match token.kind {
            TokenKind::RBrace | TokenKind::Eof => Ok(()),
            _ if token.newline_before => Ok(()),
            found => Err(ParseError::expected("`;`", &found, token.span)),
        }
    }

    #[cold]
    fn unsupported(&self, what: &str, span: Span) -> ParseError {
        ParseError::new(ErrorCode::E1007, format!("unsupported syntax: {what}"), span)
    }
}
