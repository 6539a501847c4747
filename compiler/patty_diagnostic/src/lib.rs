//! Diagnostic system for the pattycake compiler.
//!
//! Every phase reports problems as a [`Diagnostic`]: a stable
//! [`ErrorCode`], a message, a primary span, and optional notes. Phases
//! return typed errors; the driver converts them and collects them in a
//! [`DiagnosticQueue`].
//!
//! # Error Guarantees
//!
//! [`ErrorGuaranteed`] can only be obtained from the queue after an error
//! was recorded, so a function returning `Result<_, ErrorGuaranteed>` has
//! proof that it did not fail silently.

mod diagnostic;
pub mod emitter;
mod error_code;
mod guarantee;
pub mod queue;
pub mod span_utils;

pub use diagnostic::{internal_error, Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
pub use queue::{DiagnosticConfig, DiagnosticQueue};
