//! Code generation for lowered match expressions.
//!
//! Turns a [`MatchIr`](patty_ir::matching::MatchIr) into plain conditional
//! code in one of four output contexts:
//!
//! ```text
//! let r = match(x).with('a', () => 1).otherwise(() => 2);
//!
//! let r;
//! __patty_0_0: {
//!   if (x === 'a') {
//!     r = 1;
//!     break __patty_0_0;
//!   }
//!   {
//!     r = 2;
//!     break __patty_0_0;
//!   }
//! }
//! ```
//!
//! # Design
//!
//! - Branches become `if` statements in declaration order; each one exits
//!   through the [`OutputContext`]'s sink, so nothing falls through.
//! - The subject is read through a fresh `const` unless the [`CostModel`]
//!   says repeating it is harmless.
//! - Function-literal handlers are inlined when that cannot change their
//!   meaning, and called in place otherwise.
//! - Generation only allocates. Existing nodes are reused as children but
//!   never modified, which keeps a failed expression's source intact.
//!
//! # Prior Art
//!
//! - ts-pattern: the runtime builder API whose calls this compiles away
//! - rustc `rustc_mir_build::build::matches`: decision chains with
//!   first-match-wins ordering

mod build;
mod context;
mod cost;
mod error;
mod generate;
mod inline;
mod pattern;

pub use build::is_identifier_name;
pub use context::OutputContext;
pub use cost::{CostModel, IdentOnly, TrustFieldAccess};
pub use error::CodegenError;
pub use generate::{Codegen, Generated};

/// Generation options.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CodegenOptions {
    /// Use `?.` for every generated field and index access, so patterns can
    /// be tested against values of unrelated shape without throwing.
    pub null_safe: bool,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        CodegenOptions { null_safe: true }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
