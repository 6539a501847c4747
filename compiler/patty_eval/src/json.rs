//! `JSON.stringify` over runtime values, rendered by `serde_json`.

use serde_json::{Map, Number};

use crate::value::Value;

/// Maximum integer magnitude printed without a fraction.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// `Ok(None)` where `JSON.stringify` returns `undefined`. `Err` carries the
/// message of the `TypeError` it throws.
pub fn stringify(value: &Value) -> Result<Option<String>, String> {
    let mut stack = Vec::new();
    match to_json(value, &mut stack)? {
        Some(json) => serde_json::to_string(&json)
            .map(Some)
            .map_err(|e| e.to_string()),
        None => Ok(None),
    }
}

/// Convert one value. `stack` holds the heap cells being serialized, for
/// cycle detection.
fn to_json(value: &Value, stack: &mut Vec<*const ()>) -> Result<Option<serde_json::Value>, String> {
    let json = match value {
        Value::Undefined | Value::Function(_) => return Ok(None),
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => number(*n),
        Value::BigInt(_) => return Err("Do not know how to serialize a BigInt".to_owned()),
        Value::Str(s) => serde_json::Value::String(s.to_string()),
        Value::Array(items) => {
            enter(items.addr(), stack)?;
            let items = items.borrow();
            let mut out = Vec::with_capacity(items.len());
            for item in items.iter() {
                out.push(to_json(item, stack)?.unwrap_or(serde_json::Value::Null));
            }
            stack.pop();
            serde_json::Value::Array(out)
        }
        Value::Object(object) => {
            enter(object.addr(), stack)?;
            let object = object.borrow();
            let mut out = Map::new();
            for (key, item) in object.iter() {
                if let Some(json) = to_json(item, stack)? {
                    out.insert(key.to_owned(), json);
                }
            }
            stack.pop();
            serde_json::Value::Object(out)
        }
    };
    Ok(Some(json))
}

fn enter(addr: *const (), stack: &mut Vec<*const ()>) -> Result<(), String> {
    if stack.contains(&addr) {
        return Err("Converting circular structure to JSON".to_owned());
    }
    stack.push(addr);
    Ok(())
}

/// Integral values print without a fraction; non-finite ones become `null`.
#[expect(
    clippy::cast_possible_truncation,
    reason = "only integral values within the safe range are cast"
)]
fn number(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return serde_json::Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
