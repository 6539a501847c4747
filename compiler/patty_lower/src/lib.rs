//! Recognition and lowering of match-builder chains.
//!
//! ```text
//! call expression → flatten_chain → [root, clause.., terminal] → lower_chain → MatchIr
//! ```
//!
//! Recognition ([`LowerContext::recognize`]) is silent: a call that is not
//! a complete chain yields `None` and costs a short walk. Lowering is
//! fallible per expression; a [`LowerError`] leaves that expression
//! untouched and never affects the rest of the file.
//!
//! # Pattern arguments
//!
//! Object and array literals lower structurally; string, number, boolean,
//! bigint and `null` literals (plus `undefined`, `NaN` and negated numbers)
//! lower to literal patterns; `P.<tag>` members lower to type tags or the
//! wildcard; `P.select(..)` records a capture. `P.not`, `P.when`, `P.set`
//! and `P.map` are recognized but rejected, as is any other `P` member.

mod error;
mod flatten;
mod lower;
mod patterns;

pub use error::LowerError;
pub use flatten::{flatten_chain, operation_name, MAX_CHAIN_DEPTH};
pub use lower::{ChainNames, LowerContext, Terminal};

use patty_ir::matching::MatchIr;
use patty_ir::ExprId;

/// Recognize and lower in one step. `Ok(None)` when `call` is not a
/// complete match expression.
pub fn lower_match(cx: &LowerContext<'_>, call: ExprId) -> Result<Option<MatchIr>, LowerError> {
    match cx.recognize(call) {
        Some(calls) => cx.lower_chain(&calls).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
