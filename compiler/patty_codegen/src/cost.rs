//! Subject cost classification.
//!
//! Generated tests mention the subject once per field access, so anything
//! that might be expensive (or observable) to evaluate is first bound to a
//! fresh variable. The classifier decides what counts as cheap enough to
//! repeat.

use patty_ir::{ExprArena, ExprId, ExprKind};

/// Decides whether an expression may be evaluated repeatedly in place of a
/// cached binding.
pub trait CostModel {
    fn is_inexpensive(&self, arena: &ExprArena, expr: ExprId) -> bool;
}

/// Only bare identifiers are repeated. Member and index accesses may run
/// getters or proxies, so they are cached.
#[derive(Copy, Clone, Debug, Default)]
pub struct IdentOnly;

impl CostModel for IdentOnly {
    fn is_inexpensive(&self, arena: &ExprArena, expr: ExprId) -> bool {
        matches!(arena.expr_kind(expr), ExprKind::Ident(_))
    }
}

/// Also repeats a single plain field access on an identifier (`a.b`),
/// trusting that the field is a data property.
#[derive(Copy, Clone, Debug, Default)]
pub struct TrustFieldAccess;

impl CostModel for TrustFieldAccess {
    fn is_inexpensive(&self, arena: &ExprArena, expr: ExprId) -> bool {
        match arena.expr_kind(expr) {
            ExprKind::Ident(_) => true,
            ExprKind::Member {
                object,
                optional: false,
                ..
            } => matches!(arena.expr_kind(object), ExprKind::Ident(_)),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patty_ir::{Span, StringInterner};

    #[test]
    fn classifiers_disagree_on_field_access() {
        let interner = StringInterner::new();
        let mut arena = ExprArena::new();
        let a = arena.alloc(ExprKind::Ident(interner.intern("a")), Span::DUMMY);
        let field = arena.alloc(
            ExprKind::Member {
                object: a,
                property: interner.intern("b"),
                optional: false,
            },
            Span::DUMMY,
        );
        let deeper = arena.alloc(
            ExprKind::Member {
                object: field,
                property: interner.intern("c"),
                optional: false,
            },
            Span::DUMMY,
        );

        assert!(IdentOnly.is_inexpensive(&arena, a));
        assert!(!IdentOnly.is_inexpensive(&arena, field));
        assert!(TrustFieldAccess.is_inexpensive(&arena, field));
        assert!(!TrustFieldAccess.is_inexpensive(&arena, deeper));
    }
}
