//! Lexer and parser errors.

use patty_diagnostic::{Diagnostic, ErrorCode};
use patty_ir::Span;

use crate::token::TokenKind;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("unterminated string literal")]
    UnterminatedString { span: Span },
    #[error("unterminated template literal")]
    UnterminatedTemplate { span: Span },
    #[error("unterminated block comment")]
    UnterminatedComment { span: Span },
    #[error("invalid escape sequence")]
    InvalidEscape { span: Span },
    #[error("invalid number literal `{text}`")]
    InvalidNumber { span: Span, text: String },
    #[error("unexpected character `{ch}`")]
    UnexpectedChar { span: Span, ch: char },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnterminatedString { span }
            | LexError::UnterminatedTemplate { span }
            | LexError::UnterminatedComment { span }
            | LexError::InvalidEscape { span }
            | LexError::InvalidNumber { span, .. }
            | LexError::UnexpectedChar { span, .. } => *span,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            LexError::UnterminatedString { .. } => ErrorCode::E0001,
            LexError::UnexpectedChar { .. } => ErrorCode::E0002,
            LexError::InvalidNumber { .. } => ErrorCode::E0003,
            LexError::UnterminatedTemplate { .. } => ErrorCode::E0004,
            LexError::InvalidEscape { .. } => ErrorCode::E0005,
            LexError::UnterminatedComment { .. } => ErrorCode::E0006,
        }
    }
}

/// A syntax error with its location.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
    pub help: Vec<String>,
}

impl ParseError {
    #[cold]
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        ParseError {
            code,
            message: message.into(),
            span,
            help: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }

    /// "expected X, found Y".
    #[cold]
    pub fn expected(what: &str, found: &TokenKind, span: Span) -> Self {
        let code = if matches!(found, TokenKind::Eof) {
            ErrorCode::E1003
        } else {
            ErrorCode::E1001
        };
        ParseError::new(
            code,
            format!("expected {what}, found `{}`", found.display_name()),
            span,
        )
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.code)
            .with_message(self.message.clone())
            .with_label(self.span, self.code.description());
        for help in &self.help {
            diag = diag.with_suggestion(help.clone());
        }
        diag
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError::new(err.code(), err.to_string(), err.span())
    }
}
