//! Expression printing.

use patty_ir::{ExprId, ExprKind, ExprRange, PropKey, PropKind, PropRange, UnaryOp};

use super::Printer;
use crate::emitter::Emitter;
use crate::literals::{escape_template, format_number, quote_str};
use crate::parens::{
    callee_has_call, expr_prec, mixes_nullish, unary_base_of_exp, PREC_ASSIGN, PREC_CONDITIONAL,
    PREC_POSTFIX, PREC_UNARY,
};

impl<E: Emitter> Printer<'_, E> {
    /// Print `id`, parenthesized if its precedence is below `min_prec`.
    pub fn print_expr(&mut self, id: ExprId, min_prec: u8) {
        self.print_expr_wrapped(id, expr_prec(self.arena, id) < min_prec);
    }

    fn print_expr_wrapped(&mut self, id: ExprId, wrap: bool) {
        if wrap {
            self.emit("(");
            self.print_inner(id);
            self.emit(")");
        } else {
            self.print_inner(id);
        }
    }

    fn print_inner(&mut self, id: ExprId) {
        match self.arena.expr_kind(id) {
            ExprKind::Ident(name) => self.emit(self.name(name)),
            ExprKind::Str(name) => self.emit(&quote_str(self.name(name))),
            ExprKind::Num(bits) => self.emit(&format_number(f64::from_bits(bits))),
            ExprKind::BigInt(digits) => {
                self.emit(self.name(digits));
                self.emit("n");
            }
            ExprKind::Bool(value) => self.emit(if value { "true" } else { "false" }),
            ExprKind::Null => self.emit("null"),
            ExprKind::This => self.emit("this"),
            ExprKind::Template { quasis, exprs } => {
                self.emit("`");
                let quasis = self.arena.list(quasis);
                let exprs = self.arena.list(exprs);
                for (i, &quasi) in quasis.iter().enumerate() {
                    if let ExprKind::Str(text) = self.arena.expr_kind(quasi) {
                        self.emit(&escape_template(self.name(text)));
                    }
                    if let Some(&expr) = exprs.get(i) {
                        self.emit("${");
                        self.print_expr(expr, 0);
                        self.emit("}");
                    }
                }
                self.emit("`");
            }
            ExprKind::Array(items) => {
                self.emit("[");
                self.print_list(items);
                self.emit("]");
            }
            ExprKind::Object(props) => self.print_object(props),
            ExprKind::Function(function) => self.print_function(function),
            ExprKind::Unary { op, operand } => {
                self.emit(op.as_str());
                if op.is_keyword() || self.sign_collides(op, operand) {
                    self.emit(" ");
                }
                self.print_expr(operand, PREC_UNARY);
            }
            ExprKind::Binary { op, left, right } => {
                let prec = op.precedence();
                let (left_min, right_min) = if op.is_right_assoc() {
                    (prec + 1, prec)
                } else {
                    (prec, prec + 1)
                };
                let wrap_left = expr_prec(self.arena, left) < left_min
                    || mixes_nullish(op, self.arena, left)
                    || unary_base_of_exp(op, self.arena, left);
                self.print_expr_wrapped(left, wrap_left);
                self.emit(" ");
                self.emit(op.as_str());
                self.emit(" ");
                let wrap_right = expr_prec(self.arena, right) < right_min
                    || mixes_nullish(op, self.arena, right);
                self.print_expr_wrapped(right, wrap_right);
            }
            ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                self.print_expr(cond, PREC_CONDITIONAL + 1);
                self.emit(" ? ");
                self.print_expr(then_expr, PREC_ASSIGN);
                self.emit(" : ");
                self.print_expr(else_expr, PREC_ASSIGN);
            }
            ExprKind::Assign { op, target, value } => {
                self.print_expr(target, PREC_POSTFIX);
                self.emit(" ");
                self.emit(op.as_str());
                self.emit(" ");
                self.print_expr(value, PREC_ASSIGN);
            }
            ExprKind::Member {
                object,
                property,
                optional,
            } => {
                self.print_object_operand(object);
                self.emit(if optional { "?." } else { "." });
                self.emit(self.name(property));
            }
            ExprKind::Index {
                object,
                index,
                optional,
            } => {
                self.print_object_operand(object);
                self.emit(if optional { "?.[" } else { "[" });
                self.print_expr(index, 0);
                self.emit("]");
            }
            ExprKind::Call {
                callee,
                args,
                optional,
            } => {
                let iife = matches!(self.arena.expr_kind(callee), ExprKind::Function(_));
                self.print_expr_wrapped(
                    callee,
                    iife || expr_prec(self.arena, callee) < PREC_POSTFIX,
                );
                self.emit(if optional { "?.(" } else { "(" });
                self.print_list(args);
                self.emit(")");
            }
            ExprKind::New { callee, args } => {
                self.emit("new ");
                let wrap = expr_prec(self.arena, callee) < PREC_POSTFIX
                    || callee_has_call(self.arena, callee);
                self.print_expr_wrapped(callee, wrap);
                self.emit("(");
                self.print_list(args);
                self.emit(")");
            }
            ExprKind::Spread(operand) => {
                self.emit("...");
                self.print_expr(operand, PREC_ASSIGN);
            }
        }
    }

    /// Object of a member or index access. Number literals are wrapped so
    /// the `.` is not read as a decimal point.
    fn print_object_operand(&mut self, object: ExprId) {
        let wrap = expr_prec(self.arena, object) < PREC_POSTFIX
            || matches!(self.arena.expr_kind(object), ExprKind::Num(_));
        self.print_expr_wrapped(object, wrap);
    }

    /// `- -x` and `+ +x` need a space so they do not print as `--x`/`++x`.
    fn sign_collides(&self, op: UnaryOp, operand: ExprId) -> bool {
        let inner = match self.arena.expr_kind(operand) {
            ExprKind::Unary { op, .. } => op,
            ExprKind::Num(bits) if f64::from_bits(bits).is_sign_negative() => UnaryOp::Neg,
            _ => return false,
        };
        matches!(
            (op, inner),
            (UnaryOp::Neg, UnaryOp::Neg) | (UnaryOp::Plus, UnaryOp::Plus)
        )
    }

    fn print_list(&mut self, items: ExprRange) {
        for (i, &item) in self.arena.list(items).iter().enumerate() {
            if i > 0 {
                self.emit(", ");
            }
            self.print_expr(item, PREC_ASSIGN);
        }
    }

    fn print_object(&mut self, props: PropRange) {
        let props = self.arena.list(props);
        if props.is_empty() {
            self.emit("{}");
            return;
        }
        self.emit("{ ");
        for (i, prop) in props.iter().enumerate() {
            if i > 0 {
                self.emit(", ");
            }
            match prop.kind {
                PropKind::Spread(value) => {
                    self.emit("...");
                    self.print_expr(value, PREC_ASSIGN);
                }
                PropKind::Init {
                    key,
                    value,
                    shorthand,
                } => {
                    let shorthand = shorthand
                        && matches!(
                            (key, self.arena.expr_kind(value)),
                            (PropKey::Ident(key), ExprKind::Ident(value)) if key == value
                        );
                    if shorthand {
                        self.print_expr(value, PREC_ASSIGN);
                    } else {
                        self.print_prop_key(key);
                        self.emit(": ");
                        self.print_expr(value, PREC_ASSIGN);
                    }
                }
            }
        }
        self.emit(" }");
    }
}
