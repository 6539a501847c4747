//! Code generation failures.

use patty_diagnostic::{Diagnostic, ErrorCode};
use patty_ir::Span;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CodegenError {
    /// The chosen output context cannot hold the generated code, e.g. an
    /// `await` that would land inside the synthesized arrow function.
    #[error("generated code cannot be placed here: {reason}")]
    UnhostableContext { reason: String, span: Span },

    /// A handler that is neither inlinable nor callable.
    #[error("{kind} cannot be used as a handler")]
    InvalidHandler { kind: &'static str, span: Span },

    /// A pattern kind lowering should already have rejected.
    #[error("internal error: `{kind}` pattern reached code generation")]
    UnsupportedPattern { kind: &'static str, span: Span },
}

impl CodegenError {
    pub fn span(&self) -> Span {
        match self {
            CodegenError::UnhostableContext { span, .. }
            | CodegenError::InvalidHandler { span, .. }
            | CodegenError::UnsupportedPattern { span, .. } => *span,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            CodegenError::UnhostableContext { .. } => ErrorCode::E3001,
            CodegenError::InvalidHandler { .. } => ErrorCode::E3002,
            CodegenError::UnsupportedPattern { .. } => ErrorCode::E9001,
        }
    }

    /// Same severity as lowering failures: the expression stays as written.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::warning(self.code())
            .with_message(self.to_string())
            .with_label(self.span(), self.code().description())
            .with_note("this match expression was left unchanged")
    }

    #[cold]
    pub(crate) fn unhostable(reason: impl Into<String>, span: Span) -> Self {
        CodegenError::UnhostableContext {
            reason: reason.into(),
            span,
        }
    }
}
