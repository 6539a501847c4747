//! Host globals and methods.
//!
//! Only what generated match code and typical handler bodies reach for:
//! `Array.isArray`, `Number.isNaN`, `JSON.stringify`, `Error`, `String`,
//! `console.log`, and a few array and string methods.

use patty_ir::Span;

use super::{count, Interpreter};
use crate::error::{type_error, EvalError, EvalResult};
use crate::json;
use crate::value::{Native, Object, Value};

pub(super) fn install(interp: &mut Interpreter<'_>) {
    let namespace = |entries: &[(&str, Native)]| {
        let mut object = Object::new();
        for &(key, native) in entries {
            object.set(key, Value::native(native));
        }
        Value::object(object)
    };
    let globals = [
        ("undefined", Value::Undefined),
        ("NaN", Value::Number(f64::NAN)),
        ("Infinity", Value::Number(f64::INFINITY)),
        ("Array", namespace(&[("isArray", Native::ArrayIsArray)])),
        ("Number", namespace(&[("isNaN", Native::NumberIsNaN)])),
        ("JSON", namespace(&[("stringify", Native::JsonStringify)])),
        ("console", namespace(&[("log", Native::ConsoleLog)])),
        ("Error", Value::native(Native::Error)),
        ("String", Value::native(Native::String)),
    ];
    for (name, value) in globals {
        let name = interp.interner.intern(name);
        interp.env.define_global(name, value);
    }
}

/// Method of an array value, or `undefined`.
pub(super) fn array_method(key: &str, receiver: &Value) -> Value {
    let native = match key {
        "push" => Native::ArrayPush,
        "join" => Native::ArrayJoin,
        "includes" => Native::ArrayIncludes,
        _ => return Value::Undefined,
    };
    Value::method(native, receiver.clone())
}

/// Method of a string value, or `undefined`.
pub(super) fn string_method(key: &str, receiver: &Value) -> Value {
    let native = match key {
        "includes" => Native::StringIncludes,
        "toUpperCase" => Native::StringToUpperCase,
        "toLowerCase" => Native::StringToLowerCase,
        _ => return Value::Undefined,
    };
    Value::method(native, receiver.clone())
}

pub(super) fn call_native(
    interp: &mut Interpreter<'_>,
    native: Native,
    receiver: &Value,
    args: &[Value],
    span: Span,
) -> EvalResult {
    let arg = |i: usize| args.get(i).cloned().unwrap_or(Value::Undefined);
    let value = match native {
        Native::ArrayIsArray => Value::Bool(matches!(arg(0), Value::Array(_))),
        Native::NumberIsNaN => Value::Bool(arg(0).as_number().is_some_and(f64::is_nan)),
        Native::JsonStringify => match json::stringify(&arg(0)) {
            Ok(Some(text)) => Value::string(text),
            Ok(None) => Value::Undefined,
            Err(message) => return Err(type_error(message, span)),
        },
        Native::Error => {
            let message = match arg(0) {
                Value::Undefined => String::new(),
                other => other.to_string(),
            };
            Value::error("Error", &message)
        }
        Native::String => Value::string(arg(0).to_string()),
        Native::ConsoleLog => {
            let line = args
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            tracing::trace!(%line, "console.log");
            interp.output.push(line);
            Value::Undefined
        }
        Native::ArrayPush => {
            let Value::Array(items) = receiver else {
                return Err(not_a(receiver, "an array", native, span));
            };
            let mut items = items.borrow_mut();
            items.extend(args.iter().cloned());
            Value::Number(count(items.len()))
        }
        Native::ArrayJoin => {
            let Value::Array(items) = receiver else {
                return Err(not_a(receiver, "an array", native, span));
            };
            let separator = match arg(0) {
                Value::Undefined => ",".to_owned(),
                other => other.to_string(),
            };
            let parts: Vec<String> = items
                .borrow()
                .iter()
                .map(|item| {
                    if item.is_nullish() {
                        String::new()
                    } else {
                        item.to_string()
                    }
                })
                .collect();
            Value::string(parts.join(&separator))
        }
        Native::ArrayIncludes => {
            let Value::Array(items) = receiver else {
                return Err(not_a(receiver, "an array", native, span));
            };
            let needle = arg(0);
            let found = items.borrow().iter().any(|item| item.same_value_zero(&needle));
            Value::Bool(found)
        }
        Native::StringIncludes | Native::StringToUpperCase | Native::StringToLowerCase => {
            let Some(text) = receiver.as_str() else {
                return Err(not_a(receiver, "a string", native, span));
            };
            match native {
                Native::StringIncludes => Value::Bool(text.contains(&*arg(0).to_string())),
                Native::StringToUpperCase => Value::string(text.to_uppercase()),
                _ => Value::string(text.to_lowercase()),
            }
        }
    };
    Ok(value)
}

#[cold]
fn not_a(receiver: &Value, expected: &str, native: Native, span: Span) -> EvalError {
    type_error(
        format!(
            "{} called on {}, expected {expected}",
            native.name(),
            receiver.type_of()
        ),
        span,
    )
}
