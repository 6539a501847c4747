//! Tree-walking evaluator for the pattycake host-language subset.
//!
//! Exists to check generated code by running it: tests parse a program,
//! compile its match expressions, print and re-parse the output, then run
//! it here and inspect the resulting bindings.
//!
//! ```text
//! let mut interp = Interpreter::new(&arena, &interner);
//! interp.run(program)?;
//! interp.global("result")
//! ```
//!
//! # Design
//!
//! - Values follow the host language's dynamic semantics closely enough
//!   for pattern tests: `typeof`, strict and loose equality, optional
//!   chaining, truthiness, string conversion.
//! - Scopes are shared cells ([`environment::LocalScope`]), so closures see
//!   later assignments to the variables they captured.
//! - Exceptions are `Err(EvalError)`; `try`/`catch` intercepts every
//!   variant except [`EvalError::Unsupported`].
//! - `JSON.stringify` renders through `serde_json` with key order kept.
//!
//! # Prior Art
//!
//! - Boa: `JsValue` and the abstract operations it implements
//! - engine262: statement completions as an explicit signal value

pub mod environment;
mod error;
mod interpreter;
mod json;
mod operators;
mod value;

pub use environment::{AssignError, Environment, Mutability};
pub use error::{EvalError, EvalResult};
pub use interpreter::{Interpreter, MAX_CALL_DEPTH};
pub use json::stringify;
pub use value::{number_to_string, Callable, Closure, Heap, Native, Object, Value};
