//! Lowering failures.
//!
//! Each one is fatal to a single match expression only: the driver reports
//! it and leaves the original chain in place.

use patty_diagnostic::{Diagnostic, ErrorCode};
use patty_ir::Span;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LowerError {
    #[error("unrecognized chain operation `.{name}()`")]
    UnrecognizedOperation { name: String, span: Span },

    #[error("malformed clause arguments: {reason}")]
    MalformedClause { reason: String, span: Span },

    #[error("unsupported pattern expression: {kind}")]
    UnsupportedExpr { kind: String, span: Span },

    #[error("unsupported pattern kind `{kind}`")]
    UnsupportedKind { kind: String, span: Span },

    #[error("invalid captures: {reason}")]
    Capture { reason: String, span: Span },

    #[error("match subject is not a value-producing expression: {reason}")]
    SubjectNotValue { reason: String, span: Span },

    #[error("spread arguments are not supported in a match chain")]
    Spread { span: Span },
}

impl LowerError {
    pub fn span(&self) -> Span {
        match self {
            LowerError::UnrecognizedOperation { span, .. }
            | LowerError::MalformedClause { span, .. }
            | LowerError::UnsupportedExpr { span, .. }
            | LowerError::UnsupportedKind { span, .. }
            | LowerError::Capture { span, .. }
            | LowerError::SubjectNotValue { span, .. }
            | LowerError::Spread { span } => *span,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            LowerError::UnrecognizedOperation { .. } => ErrorCode::E2001,
            LowerError::MalformedClause { .. } => ErrorCode::E2002,
            LowerError::UnsupportedExpr { .. } => ErrorCode::E2003,
            LowerError::UnsupportedKind { .. } => ErrorCode::E2004,
            LowerError::Capture { .. } => ErrorCode::E2005,
            LowerError::SubjectNotValue { .. } => ErrorCode::E2006,
            LowerError::Spread { .. } => ErrorCode::E2007,
        }
    }

    /// Report as a warning: the expression is left uncompiled, the file
    /// still builds.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::warning(self.code())
            .with_message(self.to_string())
            .with_label(self.span(), self.code().description())
            .with_note("this match expression was left unchanged")
    }

    #[cold]
    pub(crate) fn malformed(reason: impl Into<String>, span: Span) -> Self {
        LowerError::MalformedClause {
            reason: reason.into(),
            span,
        }
    }

    #[cold]
    pub(crate) fn capture(reason: impl Into<String>, span: Span) -> Self {
        LowerError::Capture {
            reason: reason.into(),
            span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_variants() {
        let err = LowerError::UnsupportedKind {
            kind: "not".into(),
            span: Span::new(4, 9),
        };
        assert_eq!(err.code(), ErrorCode::E2004);
        assert_eq!(err.to_string(), "unsupported pattern kind `not`");
        let diag = err.to_diagnostic();
        assert!(diag.is_warning());
        assert_eq!(diag.primary_span(), Some(Span::new(4, 9)));
    }
}
