//! Parenthesization rules.
//!
//! The tree has no parenthesis nodes, so the printer re-derives them:
//! a child is wrapped when its precedence is below what its position
//! requires, and in a few positions where the grammar would otherwise
//! read the text differently (statement start, arrow body, IIFE callee).

use patty_ir::{BinaryOp, ExprArena, ExprId, ExprKind, FunctionKind};

/// Assignment, arrow functions and spread.
pub const PREC_ASSIGN: u8 = 1;
pub const PREC_CONDITIONAL: u8 = 2;
/// Binary operators occupy 3..=14, see [`BinaryOp::precedence`].
pub const PREC_UNARY: u8 = 15;
/// Member access, index, call and `new`.
pub const PREC_POSTFIX: u8 = 16;
pub const PREC_PRIMARY: u8 = 17;

/// Precedence of the expression at `id`.
pub fn expr_prec(arena: &ExprArena, id: ExprId) -> u8 {
    match arena.expr_kind(id) {
        ExprKind::Assign { .. } | ExprKind::Spread(_) => PREC_ASSIGN,
        ExprKind::Function(function) => match arena.get_function(function).kind {
            FunctionKind::Arrow => PREC_ASSIGN,
            FunctionKind::Expression | FunctionKind::Declaration => PREC_PRIMARY,
        },
        ExprKind::Conditional { .. } => PREC_CONDITIONAL,
        ExprKind::Binary { op, .. } => op.precedence(),
        ExprKind::Unary { .. } => PREC_UNARY,
        ExprKind::Num(bits) if f64::from_bits(bits).is_sign_negative() => PREC_UNARY,
        ExprKind::Member { .. }
        | ExprKind::Index { .. }
        | ExprKind::Call { .. }
        | ExprKind::New { .. } => PREC_POSTFIX,
        ExprKind::Ident(_)
        | ExprKind::Str(_)
        | ExprKind::Num(_)
        | ExprKind::BigInt(_)
        | ExprKind::Bool(_)
        | ExprKind::Null
        | ExprKind::This
        | ExprKind::Template { .. }
        | ExprKind::Array(_)
        | ExprKind::Object(_) => PREC_PRIMARY,
    }
}

/// `??` cannot be mixed with `&&`/`||` without parentheses.
pub fn mixes_nullish(parent: BinaryOp, arena: &ExprArena, child: ExprId) -> bool {
    let ExprKind::Binary { op: child, .. } = arena.expr_kind(child) else {
        return false;
    };
    match parent {
        BinaryOp::Nullish => matches!(child, BinaryOp::And | BinaryOp::Or),
        BinaryOp::And | BinaryOp::Or => child == BinaryOp::Nullish,
        _ => false,
    }
}

/// The left operand of `**` cannot be a bare unary expression.
pub fn unary_base_of_exp(parent: BinaryOp, arena: &ExprArena, left: ExprId) -> bool {
    parent == BinaryOp::Exp && expr_prec(arena, left) == PREC_UNARY
}

/// Whether the printed text of `id` would begin with `{` or `function`.
///
/// Such text is misread at statement start (as a block or declaration)
/// and in an arrow body (as a block), so callers wrap it in parentheses.
/// May over-report when an inner operand gets parenthesized anyway.
pub fn starts_ambiguous(arena: &ExprArena, mut id: ExprId) -> bool {
    loop {
        id = match arena.expr_kind(id) {
            ExprKind::Object(_) => return true,
            ExprKind::Function(function) => {
                return arena.get_function(function).kind != FunctionKind::Arrow;
            }
            ExprKind::Binary { left, .. } => left,
            ExprKind::Conditional { cond, .. } => cond,
            ExprKind::Assign { target, .. } => target,
            ExprKind::Member { object, .. } | ExprKind::Index { object, .. } => object,
            ExprKind::Call { callee, .. } => {
                if matches!(arena.expr_kind(callee), ExprKind::Function(_)) {
                    return false;
                }
                callee
            }
            _ => return false,
        };
    }
}

/// Whether a `new` callee contains a call in its member chain, which
/// would otherwise be read as the `new` arguments.
pub fn callee_has_call(arena: &ExprArena, mut id: ExprId) -> bool {
    loop {
        id = match arena.expr_kind(id) {
            ExprKind::Call { .. } => return true,
            ExprKind::Member { object, .. } | ExprKind::Index { object, .. } => object,
            _ => return false,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patty_ir::{ExprRange, Span, StringInterner};

    #[test]
    fn object_at_statement_start() {
        let interner = StringInterner::new();
        let mut arena = ExprArena::new();
        let object = arena.alloc(ExprKind::Object(patty_ir::PropRange::EMPTY), Span::DUMMY);
        let member = arena.alloc(
            ExprKind::Member {
                object,
                property: interner.intern("a"),
                optional: false,
            },
            Span::DUMMY,
        );
        assert!(starts_ambiguous(&arena, member));

        let ident = arena.alloc(ExprKind::Ident(interner.intern("f")), Span::DUMMY);
        let call = arena.alloc(
            ExprKind::Call {
                callee: ident,
                args: ExprRange::EMPTY,
                optional: false,
            },
            Span::DUMMY,
        );
        assert!(!starts_ambiguous(&arena, call));
        assert!(callee_has_call(&arena, call));
    }

    #[test]
    fn negative_number_is_unary() {
        let mut arena = ExprArena::new();
        let neg = arena.alloc(ExprKind::num(-1.0), Span::DUMMY);
        assert_eq!(expr_prec(&arena, neg), PREC_UNARY);
    }
}
