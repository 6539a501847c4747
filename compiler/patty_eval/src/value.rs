//! Runtime values.
//!
//! Primitives are stored inline. Arrays and objects live behind
//! [`Heap<T>`], a shared mutable cell: copying a `Value` copies the
//! reference, so mutation through one copy is visible through all of them
//! and `===` compares identity.
//!
//! Heap cells are only created through the factory methods on [`Value`].

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use patty_ir::FunctionId;

use crate::environment::{LocalScope, Scope};

/// Shared, interior-mutable heap cell with reference identity.
#[repr(transparent)]
pub struct Heap<T>(Rc<RefCell<T>>);

impl<T> Heap<T> {
    fn new(value: T) -> Self {
        Heap(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    #[inline]
    pub(crate) fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Identity of the cell, for cycle detection.
    pub(crate) fn addr(&self) -> *const () {
        Rc::as_ptr(&self.0).cast()
    }
}

impl<T> Clone for Heap<T> {
    #[inline]
    fn clone(&self) -> Self {
        Heap(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(inner) => inner.fmt(f),
            Err(_) => f.write_str("<borrowed>"),
        }
    }
}

/// Object properties, kept in insertion order.
#[derive(Clone, Debug, Default)]
pub struct Object {
    props: Vec<(Rc<str>, Value)>,
}

impl Object {
    pub fn new() -> Self {
        Object::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.props
            .iter()
            .find(|(k, _)| &**k == key)
            .map(|(_, v)| v)
    }

    /// Overwrite in place, or append a new key at the end.
    pub fn set(&mut self, key: impl Into<Rc<str>>, value: Value) {
        let key = key.into();
        match self.props.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.props.push((key, value)),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.props.iter().map(|(k, v)| (&**k, v))
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }
}

/// Host functions the evaluator provides.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Native {
    ArrayIsArray,
    NumberIsNaN,
    JsonStringify,
    /// `Error(message)`, with or without `new`.
    Error,
    String,
    ConsoleLog,
    ArrayPush,
    ArrayJoin,
    ArrayIncludes,
    StringIncludes,
    StringToUpperCase,
    StringToLowerCase,
}

impl Native {
    pub fn name(self) -> &'static str {
        match self {
            Native::ArrayIsArray => "isArray",
            Native::NumberIsNaN => "isNaN",
            Native::JsonStringify => "stringify",
            Native::Error => "Error",
            Native::String => "String",
            Native::ConsoleLog => "log",
            Native::ArrayPush => "push",
            Native::ArrayJoin => "join",
            Native::ArrayIncludes | Native::StringIncludes => "includes",
            Native::StringToUpperCase => "toUpperCase",
            Native::StringToLowerCase => "toLowerCase",
        }
    }
}

/// A user function together with the scope it closes over.
pub struct Closure {
    pub function: FunctionId,
    pub(crate) scope: LocalScope<Scope>,
    /// Arrow functions keep the `this` of their definition site.
    pub(crate) this: Option<Value>,
}

pub enum Callable {
    Closure(Closure),
    /// A host function; `receiver` is the value a method was read from.
    Native { native: Native, receiver: Value },
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Closures reach their scope, which may reach the closure again.
        match self {
            Callable::Closure(closure) => write!(f, "Closure({:?})", closure.function),
            Callable::Native { native, .. } => write!(f, "Native({})", native.name()),
        }
    }
}

/// Runtime value of the host language.
#[derive(Clone, Debug)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    /// `BigInt` digits; compared by value, not computed with.
    BigInt(Rc<str>),
    Str(Rc<str>),
    Array(Heap<Vec<Value>>),
    Object(Heap<Object>),
    Function(Rc<Callable>),
}

impl Value {
    // ── Factories ───────────────────────────────────────────────────

    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Value::Str(s.into())
    }

    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Heap::new(items))
    }

    pub fn object(object: Object) -> Self {
        Value::Object(Heap::new(object))
    }

    pub fn native(native: Native) -> Self {
        Value::method(native, Value::Undefined)
    }

    pub fn method(native: Native, receiver: Value) -> Self {
        Value::Function(Rc::new(Callable::Native { native, receiver }))
    }

    pub(crate) fn closure(closure: Closure) -> Self {
        Value::Function(Rc::new(Callable::Closure(closure)))
    }

    /// An error object as `new Error(message)` builds it.
    pub fn error(name: &str, message: &str) -> Self {
        let mut object = Object::new();
        object.set("name", Value::string(name));
        object.set("message", Value::string(message));
        Value::object(object)
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// The `typeof` result.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null | Value::Array(_) | Value::Object(_) => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::Str(_) => "string",
            Value::Function(_) => "function",
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => !(n.is_nan() || *n == 0.0),
            Value::BigInt(digits) => &**digits != "0",
            Value::Str(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Function(_) => true,
        }
    }

    /// Read a property of an object value; `None` for anything else.
    pub fn get(&self, key: &str) -> Option<Value> {
        match self {
            Value::Object(object) => object.borrow().get(key).cloned(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    // ── Conversions ─────────────────────────────────────────────────

    /// Numeric conversion used by arithmetic and relational operators.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::Str(s) => string_to_number(s),
            Value::Array(items) => {
                let items = items.borrow();
                match items.as_slice() {
                    [] => 0.0,
                    [only] => string_to_number(&only.to_string()),
                    _ => f64::NAN,
                }
            }
            Value::Undefined | Value::BigInt(_) | Value::Object(_) | Value::Function(_) => f64::NAN,
        }
    }

    /// Property key conversion used by computed access.
    pub fn to_property_key(&self) -> Rc<str> {
        match self {
            Value::Str(s) => Rc::clone(s),
            other => other.to_string().into(),
        }
    }

    // ── Equality ────────────────────────────────────────────────────

    /// `===`
    #[expect(clippy::float_cmp, reason = "strict equality is IEEE equality")]
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) | (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// `==`
    #[expect(clippy::float_cmp, reason = "loose equality compares numerically")]
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (a, b) if a.is_nullish() || b.is_nullish() => a.is_nullish() && b.is_nullish(),
            (Value::Number(_), Value::Str(_) | Value::Bool(_))
            | (Value::Str(_) | Value::Bool(_), Value::Number(_))
            | (Value::Bool(_), Value::Str(_))
            | (Value::Str(_), Value::Bool(_)) => self.to_number() == other.to_number(),
            (Value::Array(_) | Value::Object(_), Value::Str(_) | Value::Number(_)) => {
                Value::string(self.to_string()).loose_eq(other)
            }
            (Value::Str(_) | Value::Number(_), Value::Array(_) | Value::Object(_)) => {
                other.loose_eq(self)
            }
            _ => self.strict_eq(other),
        }
    }

    /// `SameValueZero`, used by `includes`: like `===` but NaN equals NaN.
    pub fn same_value_zero(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) if a.is_nan() && b.is_nan() => true,
            _ => self.strict_eq(other),
        }
    }
}

impl fmt::Display for Value {
    /// String conversion, as template literals and `+` perform it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&number_to_string(*n)),
            Value::BigInt(digits) => f.write_str(digits),
            Value::Str(s) => f.write_str(s),
            Value::Array(items) => {
                let Ok(items) = items.0.try_borrow() else {
                    return Ok(());
                };
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    if !item.is_nullish() {
                        write!(f, "{item}")?;
                    }
                }
                Ok(())
            }
            Value::Object(object) => {
                let object = object.borrow();
                match (object.get("name"), object.get("message")) {
                    (Some(name), Some(message)) => write!(f, "{name}: {message}"),
                    _ => f.write_str("[object Object]"),
                }
            }
            Value::Function(callable) => match &**callable {
                Callable::Native { native, .. } => {
                    write!(f, "function {}() {{ [native code] }}", native.name())
                }
                Callable::Closure(_) => f.write_str("function () { ... }"),
            },
        }
    }
}

/// Number-to-string conversion.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_owned();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    if n == 0.0 {
        return "0".to_owned();
    }
    let magnitude = n.abs();
    if !(1e-7..1e21).contains(&magnitude) {
        let text = format!("{n:e}");
        return match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => text,
        };
    }
    format!("{n}")
}

fn string_to_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    match s {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        // `f64::from_str` accepts spellings the host language does not.
        _ if s.chars().any(char::is_alphabetic) && !s.contains(['e', 'E']) => f64::NAN,
        _ => s.parse().unwrap_or(f64::NAN),
    }
}

#[cfg(test)]
mod tests;
