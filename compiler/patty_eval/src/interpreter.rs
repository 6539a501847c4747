//! Tree-walking interpreter.
//!
//! Evaluates a parsed program directly over the [`ExprArena`]. Statements
//! produce a [`Flow`](stmt::Flow) signal; exceptions travel as
//! `Err(EvalError)` and are intercepted by `try`.

mod builtins;
mod expr;
mod stmt;

use std::mem;

use patty_ir::{
    BindingId, BindingKind, ExprArena, ExprId, FunctionBody, FunctionId, FunctionKind, Name,
    Program, PropKey, Span, StringInterner,
};

use crate::environment::{Environment, Mutability};
use crate::error::{type_error, unsupported, EvalError, EvalResult};
use crate::value::{number_to_string, Callable, Closure, Object, Value};

/// Nesting limit for user function calls.
pub const MAX_CALL_DEPTH: usize = 128;

/// Interpreter state for one program run.
pub struct Interpreter<'a> {
    arena: &'a ExprArena,
    interner: &'a StringInterner,
    env: Environment,
    /// `this` of the running function.
    this: Value,
    depth: usize,
    /// Lines written by `console.log`.
    output: Vec<String>,
}

impl<'a> Interpreter<'a> {
    pub fn new(arena: &'a ExprArena, interner: &'a StringInterner) -> Self {
        let mut interp = Interpreter {
            arena,
            interner,
            env: Environment::new(),
            this: Value::Undefined,
            depth: 0,
            output: Vec::new(),
        };
        builtins::install(&mut interp);
        interp
    }

    /// Run a program's top-level statements.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(&mut self, program: Program) -> Result<(), EvalError> {
        let result = self.exec_stmts(program.body);
        if let Err(err) = &result {
            tracing::debug!(code = %err.code(), "uncaught: {err}");
        }
        result.map(drop)
    }

    /// Evaluate one expression in the current (global) scope.
    pub fn eval(&mut self, expr: ExprId) -> EvalResult {
        self.eval_expr(expr)
    }

    /// Look up a binding visible at top level.
    pub fn global(&self, name: &str) -> Option<Value> {
        self.env.lookup(self.interner.intern(name))
    }

    /// Lines written by `console.log`, in order.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    fn name(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    // ── Functions ───────────────────────────────────────────────────

    fn make_closure(&self, function: FunctionId) -> Value {
        let this = match self.arena.get_function(function).kind {
            FunctionKind::Arrow => Some(self.this.clone()),
            FunctionKind::Expression | FunctionKind::Declaration => None,
        };
        Value::closure(Closure {
            function,
            scope: self.env.current_scope(),
            this,
        })
    }

    /// Call any callable value.
    pub(crate) fn call(
        &mut self,
        callee: &Value,
        this: Value,
        args: Vec<Value>,
        span: Span,
    ) -> EvalResult {
        let Value::Function(callable) = callee else {
            return Err(type_error(format!("{callee} is not a function"), span));
        };
        match &**callable {
            Callable::Native { native, receiver } => {
                builtins::call_native(self, *native, receiver, &args, span)
            }
            Callable::Closure(closure) => self.call_closure(closure, this, args, span),
        }
    }

    fn call_closure(
        &mut self,
        closure: &Closure,
        this: Value,
        args: Vec<Value>,
        span: Span,
    ) -> EvalResult {
        if self.depth >= MAX_CALL_DEPTH {
            return Err(EvalError::CallDepth {
                limit: MAX_CALL_DEPTH,
                span,
            });
        }
        let function = *self.arena.get_function(closure.function);
        if function.is_async || function.is_generator {
            return Err(unsupported("async and generator functions", function.span));
        }

        let env = self.env.enclosed(closure.scope.clone());
        let saved_env = mem::replace(&mut self.env, env);
        let this = closure.this.clone().unwrap_or(this);
        let saved_this = mem::replace(&mut self.this, this);
        self.depth += 1;

        let result = self.run_body(closure.function, args);

        self.depth -= 1;
        self.this = saved_this;
        self.env = saved_env;
        result
    }

    fn run_body(&mut self, function: FunctionId, args: Vec<Value>) -> EvalResult {
        let arena = self.arena;
        let function = arena.get_function(function);
        let mut args = args.into_iter();
        for param in arena.list(function.params) {
            let value = if param.rest {
                Value::array(args.by_ref().collect())
            } else {
                args.next().unwrap_or(Value::Undefined)
            };
            let value = self.apply_default(value, param.default)?;
            self.bind(param.target, value, Mutability::Mutable)?;
        }
        match function.body {
            FunctionBody::Expr(body) => self.eval_expr(body),
            FunctionBody::Block(body) => match self.exec_stmts(body)? {
                stmt::Flow::Return(value) => Ok(value),
                _ => Ok(Value::Undefined),
            },
        }
    }

    // ── Bindings ────────────────────────────────────────────────────

    fn apply_default(&mut self, value: Value, default: Option<ExprId>) -> EvalResult {
        match (value, default) {
            (Value::Undefined, Some(default)) => self.eval_expr(default),
            (value, _) => Ok(value),
        }
    }

    /// Bind a declaration, parameter or catch target, destructuring as
    /// needed.
    pub(crate) fn bind(
        &mut self,
        target: BindingId,
        value: Value,
        mutability: Mutability,
    ) -> Result<(), EvalError> {
        let arena = self.arena;
        let binding = arena.get_binding(target);
        match binding.kind {
            BindingKind::Ident(name) => {
                self.env.define(name, value, mutability);
                Ok(())
            }
            BindingKind::Array(elems) => {
                let items = self.iterate(&value, binding.span)?;
                let mut items = items.into_iter();
                for elem in arena.list(elems) {
                    let item = if elem.rest {
                        Value::array(items.by_ref().collect())
                    } else {
                        items.next().unwrap_or(Value::Undefined)
                    };
                    let Some(target) = elem.target else {
                        continue;
                    };
                    let item = self.apply_default(item, elem.default)?;
                    self.bind(target, item, mutability)?;
                }
                Ok(())
            }
            BindingKind::Object(props) => {
                if value.is_nullish() {
                    return Err(type_error(
                        format!("Cannot destructure '{value}' as it is {value}."),
                        binding.span,
                    ));
                }
                let mut taken = Vec::new();
                for prop in arena.list(props) {
                    if prop.rest {
                        let rest = self.rest_of(&value, &taken);
                        self.bind(prop.value, rest, mutability)?;
                        continue;
                    }
                    let key = self.prop_key(prop.key)?;
                    let item = self.get_property(&value, &key, binding.span)?;
                    taken.push(key);
                    let item = self.apply_default(item, prop.default)?;
                    self.bind(prop.value, item, mutability)?;
                }
                Ok(())
            }
        }
    }

    /// The own properties of `value` not listed in `taken`, as a new object.
    fn rest_of(&self, value: &Value, taken: &[String]) -> Value {
        let mut rest = Object::new();
        if let Value::Object(object) = value {
            for (key, item) in object.borrow().iter() {
                if !taken.iter().any(|t| t == key) {
                    rest.set(key, item.clone());
                }
            }
        }
        Value::object(rest)
    }

    fn prop_key(&mut self, key: PropKey) -> EvalResult<String> {
        Ok(match key {
            PropKey::Ident(name) | PropKey::Str(name) => self.name(name).to_owned(),
            PropKey::Num(bits) => number_to_string(f64::from_bits(bits)),
            PropKey::Computed(expr) => self.eval_expr(expr)?.to_property_key().to_string(),
        })
    }

    /// Elements of an iterable value: arrays and strings.
    fn iterate(&self, value: &Value, span: Span) -> EvalResult<Vec<Value>> {
        match value {
            Value::Array(items) => Ok(items.borrow().clone()),
            Value::Str(s) => Ok(s.chars().map(|c| Value::string(c.to_string())).collect()),
            other => Err(type_error(
                format!("{} is not iterable", other.type_of()),
                span,
            )),
        }
    }

    // ── Properties ──────────────────────────────────────────────────

    pub(crate) fn get_property(&self, target: &Value, key: &str, span: Span) -> EvalResult {
        let value = match target {
            Value::Undefined | Value::Null => {
                return Err(type_error(
                    format!("Cannot read properties of {target} (reading '{key}')"),
                    span,
                ))
            }
            Value::Array(items) => match key {
                "length" => Value::Number(count(items.borrow().len())),
                _ => match key.parse::<usize>() {
                    Ok(index) => items.borrow().get(index).cloned().unwrap_or(Value::Undefined),
                    Err(_) => builtins::array_method(key, target),
                },
            },
            Value::Str(s) => match key {
                "length" => Value::Number(count(s.encode_utf16().count())),
                _ => match key.parse::<usize>() {
                    Ok(index) => s
                        .chars()
                        .nth(index)
                        .map_or(Value::Undefined, |c| Value::string(c.to_string())),
                    Err(_) => builtins::string_method(key, target),
                },
            },
            Value::Object(object) => object.borrow().get(key).cloned().unwrap_or(Value::Undefined),
            Value::Bool(_) | Value::Number(_) | Value::BigInt(_) | Value::Function(_) => {
                Value::Undefined
            }
        };
        Ok(value)
    }

    pub(crate) fn set_property(
        &self,
        target: &Value,
        key: &str,
        value: Value,
        span: Span,
    ) -> Result<(), EvalError> {
        match target {
            Value::Undefined | Value::Null => Err(type_error(
                format!("Cannot set properties of {target} (setting '{key}')"),
                span,
            )),
            Value::Object(object) => {
                object.borrow_mut().set(key, value);
                Ok(())
            }
            Value::Array(items) => {
                let index = match key {
                    "length" => {
                        let len = value.to_number();
                        if len < 0.0 || len.fract() != 0.0 {
                            return Err(type_error("Invalid array length", span));
                        }
                        items.borrow_mut().resize(to_index(len), Value::Undefined);
                        return Ok(());
                    }
                    _ => key.parse::<usize>(),
                };
                if let Ok(index) = index {
                    let mut items = items.borrow_mut();
                    if index >= items.len() {
                        items.resize(index + 1, Value::Undefined);
                    }
                    items[index] = value;
                }
                Ok(())
            }
            // Primitive wrappers drop property writes.
            Value::Bool(_)
            | Value::Number(_)
            | Value::BigInt(_)
            | Value::Str(_)
            | Value::Function(_) => Ok(()),
        }
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "lengths stay far below 2^52"
)]
fn count(len: usize) -> f64 {
    len as f64
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "callers pass non-negative integral values"
)]
fn to_index(n: f64) -> usize {
    n as usize
}
