//! Chain flattening.
//!
//! A builder chain parses inside-out: `match(x).with(a, f).otherwise(g)` is
//! a call whose callee is a member access on a call whose callee is a
//! member access on `match(x)`. Flattening recovers the calls root-first.

use patty_ir::{ExprArena, ExprId, ExprKind, Name};

/// Chains deeper than this are not considered. Keeps the recursive walk
/// bounded on adversarial input.
pub const MAX_CHAIN_DEPTH: usize = 4096;

/// Flatten the chain ending at `call` into `[root, clause₁, …, terminal]`.
///
/// `None` when `call` is not a call, the walk meets any shape other than
/// `<call>.<member>(..)`, or the innermost callee is not the identifier
/// `matcher`. Never allocates on the failure path.
pub fn flatten_chain(arena: &ExprArena, call: ExprId, matcher: Name) -> Option<Vec<ExprId>> {
    let calls = walk(arena, call, matcher, 0)?;
    tracing::trace!(depth = calls.len(), "flattened match chain");
    Some(calls)
}

fn walk(arena: &ExprArena, call: ExprId, matcher: Name, depth: usize) -> Option<Vec<ExprId>> {
    if depth >= MAX_CHAIN_DEPTH {
        return None;
    }
    let ExprKind::Call {
        callee,
        optional: false,
        ..
    } = arena.expr_kind(call)
    else {
        return None;
    };
    match arena.expr_kind(callee) {
        ExprKind::Ident(name) if name == matcher => {
            // Root reached: the chain is exactly `depth + 1` calls long.
            let mut calls = Vec::with_capacity(depth + 1);
            calls.push(call);
            Some(calls)
        }
        ExprKind::Member {
            object,
            optional: false,
            ..
        } => {
            let mut calls = walk(arena, object, matcher, depth + 1)?;
            calls.push(call);
            Some(calls)
        }
        _ => None,
    }
}

/// Member name of a non-root chain call (`with` in `x.with(..)`).
pub fn operation_name(arena: &ExprArena, call: ExprId) -> Option<Name> {
    let ExprKind::Call { callee, .. } = arena.expr_kind(call) else {
        return None;
    };
    match arena.expr_kind(callee) {
        ExprKind::Member { property, .. } => Some(property),
        _ => None,
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
