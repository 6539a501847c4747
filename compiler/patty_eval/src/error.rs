//! Evaluation failures.
//!
//! Everything except [`EvalError::Unsupported`] is an exception the
//! evaluated program can observe: `try`/`catch` turns it back into a value
//! with [`EvalError::into_thrown`].

use patty_diagnostic::{Diagnostic, ErrorCode};
use patty_ir::Span;

use crate::value::Value;

pub type EvalResult<T = Value> = Result<T, EvalError>;

#[derive(Clone, Debug, thiserror::Error)]
pub enum EvalError {
    #[error("uncaught exception: {value}")]
    Thrown { value: Value, span: Span },

    #[error("TypeError: {message}")]
    Type { message: String, span: Span },

    #[error("ReferenceError: {name} is not defined")]
    Reference { name: String, span: Span },

    #[error("RangeError: maximum call depth of {limit} exceeded")]
    CallDepth { limit: usize, span: Span },

    #[error("cannot evaluate {what}")]
    Unsupported { what: String, span: Span },
}

impl EvalError {
    pub fn span(&self) -> Span {
        match self {
            EvalError::Thrown { span, .. }
            | EvalError::Type { span, .. }
            | EvalError::Reference { span, .. }
            | EvalError::CallDepth { span, .. }
            | EvalError::Unsupported { span, .. } => *span,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            EvalError::Thrown { .. } => ErrorCode::E4001,
            EvalError::Type { .. } => ErrorCode::E4002,
            EvalError::Reference { .. } => ErrorCode::E4003,
            EvalError::Unsupported { .. } => ErrorCode::E4004,
            EvalError::CallDepth { .. } => ErrorCode::E4005,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code())
            .with_message(self.to_string())
            .with_label(self.span(), self.code().description())
    }

    /// Whether `catch` can intercept this failure.
    pub fn is_catchable(&self) -> bool {
        !matches!(self, EvalError::Unsupported { .. })
    }

    /// The value a `catch` clause binds.
    pub fn into_thrown(self) -> Value {
        match self {
            EvalError::Thrown { value, .. } => value,
            EvalError::Type { message, .. } => Value::error("TypeError", &message),
            EvalError::Reference { name, .. } => {
                Value::error("ReferenceError", &format!("{name} is not defined"))
            }
            EvalError::CallDepth { .. } => {
                Value::error("RangeError", "Maximum call stack size exceeded")
            }
            EvalError::Unsupported { what, .. } => Value::error("Error", &what),
        }
    }

    /// The `message` of a thrown error object, if this is one.
    pub fn thrown_message(&self) -> Option<String> {
        match self {
            EvalError::Thrown { value, .. } => value.get("message").map(|m| m.to_string()),
            EvalError::Type { message, .. } => Some(message.clone()),
            _ => None,
        }
    }
}

#[cold]
pub(crate) fn type_error(message: impl Into<String>, span: Span) -> EvalError {
    EvalError::Type {
        message: message.into(),
        span,
    }
}

#[cold]
pub(crate) fn unsupported(what: impl Into<String>, span: Span) -> EvalError {
    EvalError::Unsupported {
        what: what.into(),
        span,
    }
}
