//! Expression evaluation.
//!
//! Member, index and call nodes form optional chains: a `?.` link whose
//! object is nullish short-circuits the rest of the chain to `undefined`.
//! [`Interpreter::eval_link`] returns `None` for that case and the chain's
//! outermost node turns it into a value.

use patty_ir::{
    AssignOp, BinaryOp, ExprId, ExprKind, ExprRange, Name, PropKind, PropRange, Span, UnaryOp,
};

use super::{builtins, Interpreter};
use crate::environment::AssignError;
use crate::error::{type_error, unsupported, EvalError, EvalResult};
use crate::operators;
use crate::value::{Callable, Native, Object, Value};

/// Where an assignment writes.
enum Place {
    Var(Name),
    Property { target: Value, key: String },
}

impl Interpreter<'_> {
    pub(crate) fn eval_expr(&mut self, id: ExprId) -> EvalResult {
        let expr = *self.arena.get_expr(id);
        self.eval_kind(expr.kind, expr.span)
    }

    /// One link of a possibly optional chain.
    fn eval_link(&mut self, id: ExprId) -> EvalResult<Option<Value>> {
        let expr = *self.arena.get_expr(id);
        match expr.kind {
            ExprKind::Member { .. } | ExprKind::Index { .. } | ExprKind::Call { .. } => {
                self.eval_chain(expr.kind, expr.span)
            }
            kind => self.eval_kind(kind, expr.span).map(Some),
        }
    }

    fn eval_chain(&mut self, kind: ExprKind, span: Span) -> EvalResult<Option<Value>> {
        match kind {
            ExprKind::Member {
                object,
                property,
                optional,
            } => {
                let Some(target) = self.eval_link(object)? else {
                    return Ok(None);
                };
                if optional && target.is_nullish() {
                    return Ok(None);
                }
                self.get_property(&target, self.name(property), span).map(Some)
            }
            ExprKind::Index {
                object,
                index,
                optional,
            } => {
                let Some(target) = self.eval_link(object)? else {
                    return Ok(None);
                };
                if optional && target.is_nullish() {
                    return Ok(None);
                }
                let key = self.eval_expr(index)?.to_property_key();
                self.get_property(&target, &key, span).map(Some)
            }
            ExprKind::Call {
                callee,
                args,
                optional,
            } => {
                let Some((function, this)) = self.eval_callee(callee)? else {
                    return Ok(None);
                };
                if optional && function.is_nullish() {
                    return Ok(None);
                }
                let args = self.eval_args(args)?;
                self.call(&function, this, args, span).map(Some)
            }
            kind => self.eval_kind(kind, span).map(Some),
        }
    }

    /// The function a call invokes, with the receiver it was read from.
    fn eval_callee(&mut self, callee: ExprId) -> EvalResult<Option<(Value, Value)>> {
        let expr = *self.arena.get_expr(callee);
        let (object, optional) = match expr.kind {
            ExprKind::Member {
                object, optional, ..
            }
            | ExprKind::Index {
                object, optional, ..
            } => (object, optional),
            _ => return Ok(self.eval_link(callee)?.map(|f| (f, Value::Undefined))),
        };
        let Some(receiver) = self.eval_link(object)? else {
            return Ok(None);
        };
        if optional && receiver.is_nullish() {
            return Ok(None);
        }
        let key = match expr.kind {
            ExprKind::Index { index, .. } => self.eval_expr(index)?.to_property_key().to_string(),
            ExprKind::Member { property, .. } => self.name(property).to_owned(),
            _ => String::new(),
        };
        let function = self.get_property(&receiver, &key, expr.span)?;
        Ok(Some((function, receiver)))
    }

    fn eval_args(&mut self, args: ExprRange) -> EvalResult<Vec<Value>> {
        let arena = self.arena;
        let mut values = Vec::with_capacity(args.len());
        for &arg in arena.list(args) {
            match arena.expr_kind(arg) {
                ExprKind::Spread(inner) => {
                    let spread = self.eval_expr(inner)?;
                    values.extend(self.iterate(&spread, arena.expr_span(arg))?);
                }
                _ => values.push(self.eval_expr(arg)?),
            }
        }
        Ok(values)
    }

    fn eval_kind(&mut self, kind: ExprKind, span: Span) -> EvalResult {
        match kind {
            ExprKind::Ident(name) => self.env.lookup(name).ok_or_else(|| EvalError::Reference {
                name: self.name(name).to_owned(),
                span,
            }),
            ExprKind::Str(text) => Ok(Value::string(self.name(text))),
            ExprKind::Num(bits) => Ok(Value::Number(f64::from_bits(bits))),
            ExprKind::BigInt(digits) => Ok(Value::BigInt(self.name(digits).into())),
            ExprKind::Bool(b) => Ok(Value::Bool(b)),
            ExprKind::Null => Ok(Value::Null),
            ExprKind::This => Ok(self.this.clone()),
            ExprKind::Template { quasis, exprs } => self.eval_template(quasis, exprs),
            ExprKind::Array(items) => Ok(Value::array(self.eval_args(items)?)),
            ExprKind::Object(props) => self.eval_object(props),
            ExprKind::Function(function) => Ok(self.make_closure(function)),
            ExprKind::Unary { op, operand } => self.eval_unary(op, operand, span),
            ExprKind::Binary { op, left, right } => self.eval_binary(op, left, right, span),
            ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                if self.eval_expr(cond)?.is_truthy() {
                    self.eval_expr(then_expr)
                } else {
                    self.eval_expr(else_expr)
                }
            }
            ExprKind::Assign { op, target, value } => self.eval_assign(op, target, value, span),
            ExprKind::Member { .. } | ExprKind::Index { .. } | ExprKind::Call { .. } => {
                Ok(self.eval_chain(kind, span)?.unwrap_or(Value::Undefined))
            }
            ExprKind::New { callee, args } => self.eval_new(callee, args, span),
            ExprKind::Spread(_) => Err(unsupported("a spread element here", span)),
        }
    }

    fn eval_template(&mut self, quasis: ExprRange, exprs: ExprRange) -> EvalResult {
        let arena = self.arena;
        let mut text = String::new();
        let exprs = arena.list(exprs);
        for (i, &quasi) in arena.list(quasis).iter().enumerate() {
            if let ExprKind::Str(part) = arena.expr_kind(quasi) {
                text.push_str(self.name(part));
            }
            if let Some(&expr) = exprs.get(i) {
                let value = self.eval_expr(expr)?;
                text.push_str(&value.to_string());
            }
        }
        Ok(Value::string(text))
    }

    fn eval_object(&mut self, props: PropRange) -> EvalResult {
        let arena = self.arena;
        let mut object = Object::new();
        for prop in arena.list(props) {
            match prop.kind {
                PropKind::Init { key, value, .. } => {
                    let key = self.prop_key(key)?;
                    let value = self.eval_expr(value)?;
                    object.set(key, value);
                }
                PropKind::Spread(source) => match self.eval_expr(source)? {
                    Value::Object(source) => {
                        for (key, value) in source.borrow().iter() {
                            object.set(key, value.clone());
                        }
                    }
                    Value::Array(items) => {
                        for (i, value) in items.borrow().iter().enumerate() {
                            object.set(i.to_string(), value.clone());
                        }
                    }
                    _ => {}
                },
            }
        }
        Ok(Value::object(object))
    }

    fn eval_unary(&mut self, op: UnaryOp, operand: ExprId, span: Span) -> EvalResult {
        // `typeof` of an unbound name is "undefined", not a ReferenceError.
        if op == UnaryOp::TypeOf {
            if let ExprKind::Ident(name) = self.arena.expr_kind(operand) {
                let value = self.env.lookup(name).unwrap_or(Value::Undefined);
                return Ok(Value::string(value.type_of()));
            }
        }
        let value = self.eval_expr(operand)?;
        operators::unary(op, &value, span)
    }

    fn eval_binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId, span: Span) -> EvalResult {
        let left = self.eval_expr(left)?;
        match op {
            BinaryOp::And if !left.is_truthy() => Ok(left),
            BinaryOp::Or if left.is_truthy() => Ok(left),
            BinaryOp::Nullish if !left.is_nullish() => Ok(left),
            BinaryOp::And | BinaryOp::Or | BinaryOp::Nullish => self.eval_expr(right),
            _ => {
                let right = self.eval_expr(right)?;
                operators::binary(op, &left, &right, span)
            }
        }
    }

    fn place(&mut self, target: ExprId) -> EvalResult<Place> {
        let expr = *self.arena.get_expr(target);
        match expr.kind {
            ExprKind::Ident(name) => Ok(Place::Var(name)),
            ExprKind::Member {
                object, property, ..
            } => Ok(Place::Property {
                target: self.eval_expr(object)?,
                key: self.name(property).to_owned(),
            }),
            ExprKind::Index { object, index, .. } => {
                let target = self.eval_expr(object)?;
                let key = self.eval_expr(index)?.to_property_key().to_string();
                Ok(Place::Property { target, key })
            }
            other => Err(unsupported(
                format!("assignment to a {}", other.describe()),
                expr.span,
            )),
        }
    }

    fn read_place(&self, place: &Place, span: Span) -> EvalResult {
        match place {
            Place::Var(name) => self.env.lookup(*name).ok_or_else(|| EvalError::Reference {
                name: self.name(*name).to_owned(),
                span,
            }),
            Place::Property { target, key } => self.get_property(target, key, span),
        }
    }

    fn write_place(&mut self, place: &Place, value: Value, span: Span) -> Result<(), EvalError> {
        match place {
            Place::Var(name) => match self.env.assign(*name, value) {
                Ok(()) => Ok(()),
                Err(AssignError::Immutable) => {
                    Err(type_error("Assignment to constant variable.", span))
                }
                Err(AssignError::Undefined) => Err(EvalError::Reference {
                    name: self.name(*name).to_owned(),
                    span,
                }),
            },
            Place::Property { target, key } => self.set_property(target, key, value, span),
        }
    }

    fn eval_assign(
        &mut self,
        op: AssignOp,
        target: ExprId,
        value: ExprId,
        span: Span,
    ) -> EvalResult {
        let place = self.place(target)?;
        let value = match op {
            AssignOp::Assign => self.eval_expr(value)?,
            AssignOp::And | AssignOp::Or | AssignOp::Nullish => {
                let current = self.read_place(&place, span)?;
                let keep = match op {
                    AssignOp::And => !current.is_truthy(),
                    AssignOp::Or => current.is_truthy(),
                    _ => !current.is_nullish(),
                };
                if keep {
                    return Ok(current);
                }
                self.eval_expr(value)?
            }
            _ => {
                let current = self.read_place(&place, span)?;
                let rhs = self.eval_expr(value)?;
                match op.binary() {
                    Some(binary) => operators::binary(binary, &current, &rhs, span)?,
                    None => rhs,
                }
            }
        };
        self.write_place(&place, value.clone(), span)?;
        Ok(value)
    }

    fn eval_new(&mut self, callee: ExprId, args: ExprRange, span: Span) -> EvalResult {
        let constructor = self.eval_expr(callee)?;
        let args = self.eval_args(args)?;
        let Value::Function(callable) = &constructor else {
            return Err(type_error(format!("{constructor} is not a constructor"), span));
        };
        match &**callable {
            Callable::Native {
                native: Native::Error,
                ..
            } => builtins::call_native(self, Native::Error, &Value::Undefined, &args, span),
            Callable::Native { native, .. } => Err(type_error(
                format!("{} is not a constructor", native.name()),
                span,
            )),
            Callable::Closure(_) => {
                let instance = Value::object(Object::new());
                let result = self.call(&constructor, instance.clone(), args, span)?;
                Ok(match result {
                    Value::Object(_) | Value::Array(_) | Value::Function(_) => result,
                    _ => instance,
                })
            }
        }
    }
}
