//! Unary and binary operators over evaluated operands.
//!
//! The short-circuiting operators (`&&`, `||`, `??`) never reach this
//! module; the interpreter decides whether to evaluate their right side.

use std::cmp::Ordering;

use patty_ir::{BinaryOp, Span, UnaryOp};

use crate::error::{type_error, unsupported, EvalResult};
use crate::value::Value;

/// Apply a non-short-circuiting binary operator.
pub fn binary(op: BinaryOp, left: &Value, right: &Value, span: Span) -> EvalResult {
    let value = match op {
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub => Value::Number(left.to_number() - right.to_number()),
        BinaryOp::Mul => Value::Number(left.to_number() * right.to_number()),
        BinaryOp::Div => Value::Number(left.to_number() / right.to_number()),
        BinaryOp::Mod => Value::Number(left.to_number() % right.to_number()),
        BinaryOp::Exp => Value::Number(left.to_number().powf(right.to_number())),
        BinaryOp::StrictEq => Value::Bool(left.strict_eq(right)),
        BinaryOp::StrictNotEq => Value::Bool(!left.strict_eq(right)),
        BinaryOp::LooseEq => Value::Bool(left.loose_eq(right)),
        BinaryOp::LooseNotEq => Value::Bool(!left.loose_eq(right)),
        BinaryOp::Lt => Value::Bool(compare(left, right) == Some(Ordering::Less)),
        BinaryOp::Gt => Value::Bool(compare(left, right) == Some(Ordering::Greater)),
        BinaryOp::LtEq => Value::Bool(matches!(
            compare(left, right),
            Some(Ordering::Less | Ordering::Equal)
        )),
        BinaryOp::GtEq => Value::Bool(matches!(
            compare(left, right),
            Some(Ordering::Greater | Ordering::Equal)
        )),
        BinaryOp::BitAnd => Value::Number(f64::from(to_int32(left) & to_int32(right))),
        BinaryOp::BitOr => Value::Number(f64::from(to_int32(left) | to_int32(right))),
        BinaryOp::BitXor => Value::Number(f64::from(to_int32(left) ^ to_int32(right))),
        BinaryOp::Shl => Value::Number(f64::from(to_int32(left).wrapping_shl(shift(right)))),
        BinaryOp::Shr => Value::Number(f64::from(to_int32(left).wrapping_shr(shift(right)))),
        BinaryOp::UShr => Value::Number(f64::from(to_uint32(left).wrapping_shr(shift(right)))),
        BinaryOp::In => match right {
            Value::Object(object) => Value::Bool(object.borrow().contains(&left.to_property_key())),
            Value::Array(items) => {
                let key = left.to_property_key();
                let len = items.borrow().len();
                Value::Bool(&*key == "length" || key.parse::<usize>().is_ok_and(|i| i < len))
            }
            other => {
                return Err(type_error(
                    format!("Cannot use 'in' operator to search for '{left}' in {other}"),
                    span,
                ))
            }
        },
        BinaryOp::InstanceOf => return Err(unsupported("`instanceof`", span)),
        BinaryOp::And | BinaryOp::Or | BinaryOp::Nullish => {
            return Err(unsupported(
                format!("`{}` without short-circuiting", op.as_str()),
                span,
            ))
        }
    };
    Ok(value)
}

/// Apply a unary operator. `typeof` on unbound names and `await` are
/// handled by the interpreter.
pub fn unary(op: UnaryOp, operand: &Value, span: Span) -> EvalResult {
    let value = match op {
        UnaryOp::Not => Value::Bool(!operand.is_truthy()),
        UnaryOp::Neg => match operand {
            Value::BigInt(digits) => match digits.strip_prefix('-') {
                Some(positive) => Value::BigInt(positive.into()),
                None if &**digits == "0" => operand.clone(),
                None => Value::BigInt(format!("-{digits}").into()),
            },
            _ => Value::Number(-operand.to_number()),
        },
        UnaryOp::Plus => Value::Number(operand.to_number()),
        UnaryOp::BitNot => Value::Number(f64::from(!to_int32(operand))),
        UnaryOp::TypeOf => Value::string(operand.type_of()),
        UnaryOp::Void => Value::Undefined,
        UnaryOp::Delete | UnaryOp::Await => {
            return Err(unsupported(format!("`{}`", op.as_str()), span))
        }
    };
    Ok(value)
}

fn add(left: &Value, right: &Value) -> Value {
    let is_text = |v: &Value| matches!(v, Value::Str(_) | Value::Array(_) | Value::Object(_));
    if is_text(left) || is_text(right) {
        Value::string(format!("{left}{right}"))
    } else {
        Value::Number(left.to_number() + right.to_number())
    }
}

/// Relational comparison: strings compare by code unit, everything else
/// numerically. `None` when either side is NaN.
fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => Some(a.encode_utf16().cmp(b.encode_utf16())),
        _ => left.to_number().partial_cmp(&right.to_number()),
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "ToInt32 is a modular truncation"
)]
fn to_int32(value: &Value) -> i32 {
    to_uint32(value) as i32
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "ToUint32 is a modular truncation"
)]
fn to_uint32(value: &Value) -> u32 {
    let n = value.to_number();
    if !n.is_finite() {
        return 0;
    }
    n.trunc().rem_euclid(4_294_967_296.0) as u32
}

fn shift(value: &Value) -> u32 {
    to_uint32(value) & 31
}
