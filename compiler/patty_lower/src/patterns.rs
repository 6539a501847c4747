//! Pattern construction: pattern-argument expression to [`Pattern`].

use patty_ir::matching::{LiteralPattern, ObjectField, Pattern, Select, SelectBinding, TypeTag};
use patty_ir::{ExprId, ExprKind, ExprRange, Name, PropKey, PropKind, PropRange, Span, UnaryOp};

use crate::{LowerContext, LowerError};

/// `P.<name>` members that build patterns this compiler does not support.
/// Named separately from unknown members only for the diagnostic.
const KNOWN_UNSUPPORTED: &[&str] = &[
    "union",
    "intersection",
    "array",
    "optional",
    "instanceOf",
    "unknown",
    "infer",
    "not",
    "when",
    "set",
    "map",
    "select",
];

impl LowerContext<'_> {
    /// Classify a pattern argument.
    pub fn lower_pattern(&self, expr: ExprId) -> Result<Pattern, LowerError> {
        let span = self.arena.expr_span(expr);
        match self.arena.expr_kind(expr) {
            ExprKind::Str(text) => Ok(Pattern::Literal(LiteralPattern::Str(text))),
            ExprKind::Num(bits) => Ok(Pattern::Literal(LiteralPattern::Num(bits))),
            ExprKind::Bool(value) => Ok(Pattern::Literal(LiteralPattern::Bool(value))),
            ExprKind::BigInt(digits) => Ok(Pattern::Literal(LiteralPattern::BigInt(digits))),
            ExprKind::Null => Ok(Pattern::Literal(LiteralPattern::Null)),
            ExprKind::Ident(name) => match self.interner.lookup(name) {
                "undefined" => Ok(Pattern::Literal(LiteralPattern::Undefined)),
                "NaN" => Ok(Pattern::Literal(LiteralPattern::NaN)),
                other => Err(unsupported_expr(format!("identifier `{other}`"), span)),
            },
            ExprKind::Unary {
                op: UnaryOp::Neg,
                operand,
            } => match self.arena.expr_kind(operand).as_num() {
                Some(value) => Ok(Pattern::Literal(LiteralPattern::Num((-value).to_bits()))),
                None => Err(unsupported_expr("unary expression", span)),
            },
            ExprKind::Template { quasis, exprs } if exprs.is_empty() => {
                match self.arena.list(quasis).first().map(|&q| self.arena.expr_kind(q)) {
                    Some(ExprKind::Str(text)) => Ok(Pattern::Literal(LiteralPattern::Str(text))),
                    _ => Err(unsupported_expr("template literal", span)),
                }
            }
            ExprKind::Object(props) => self.lower_object(props),
            ExprKind::Array(items) => {
                let mut elements = Vec::with_capacity(items.len());
                for &item in self.arena.list(items) {
                    if let ExprKind::Spread(_) = self.arena.expr_kind(item) {
                        return Err(unsupported_expr("spread element in array pattern", span));
                    }
                    elements.push(self.lower_pattern(item)?);
                }
                Ok(Pattern::Array(elements))
            }
            ExprKind::Member {
                object,
                property,
                optional: false,
            } if self.is_namespace(object) => self.lower_namespace_member(property, span),
            ExprKind::Call {
                callee,
                args,
                optional: false,
            } => match self.namespace_call(callee) {
                Some(name) => self.lower_namespace_call(name, args, span),
                None => Err(unsupported_expr("call expression", span)),
            },
            other => Err(unsupported_expr(other.describe(), span)),
        }
    }

    fn lower_object(&self, props: PropRange) -> Result<Pattern, LowerError> {
        let mut fields = Vec::with_capacity(props.len());
        for prop in self.arena.list(props) {
            let PropKind::Init { key, value, .. } = prop.kind else {
                return Err(unsupported_expr("spread in object pattern", prop.span));
            };
            let name = match key {
                PropKey::Ident(name) | PropKey::Str(name) => name,
                PropKey::Num(bits) => self.interner.intern(&f64::from_bits(bits).to_string()),
                PropKey::Computed(_) => {
                    return Err(unsupported_expr("computed key in object pattern", prop.span));
                }
            };
            fields.push(ObjectField {
                name,
                pattern: self.lower_pattern(value)?,
            });
        }
        Ok(Pattern::Object(fields))
    }

    /// `expr` is the configured pattern namespace identifier.
    fn is_namespace(&self, expr: ExprId) -> bool {
        matches!(
            (self.patterns, self.arena.expr_kind(expr)),
            (Some(ns), ExprKind::Ident(name)) if name == ns
        )
    }

    /// The member name when `callee` is `P.<name>`.
    fn namespace_call(&self, callee: ExprId) -> Option<Name> {
        match self.arena.expr_kind(callee) {
            ExprKind::Member {
                object,
                property,
                optional: false,
            } if self.is_namespace(object) => Some(property),
            _ => None,
        }
    }

    fn lower_namespace_member(&self, property: Name, span: Span) -> Result<Pattern, LowerError> {
        let name = self.interner.lookup(property);
        if matches!(name, "_" | "any") {
            return Ok(Pattern::Wildcard);
        }
        TypeTag::from_member(name)
            .map(Pattern::TypeTag)
            .ok_or_else(|| unsupported_kind(name, span))
    }

    fn lower_namespace_call(
        &self,
        property: Name,
        args: ExprRange,
        span: Span,
    ) -> Result<Pattern, LowerError> {
        let name = self.interner.lookup(property);
        let args = self.arena.list(args);
        if let Some(&spread) = args
            .iter()
            .find(|&&arg| matches!(self.arena.expr_kind(arg), ExprKind::Spread(_)))
        {
            return Err(LowerError::Spread {
                span: self.arena.expr_span(spread),
            });
        }

        match (name, args) {
            ("select", _) => self.lower_select(args, span),
            ("not", &[inner]) => Ok(Pattern::Not(Box::new(self.lower_pattern(inner)?))),
            ("when", &[predicate]) => Ok(Pattern::When(predicate)),
            ("set", &[inner]) => Ok(Pattern::Set(Box::new(self.lower_pattern(inner)?))),
            ("map", &[key, value]) => Ok(Pattern::Map {
                key: Box::new(self.lower_pattern(key)?),
                value: Box::new(self.lower_pattern(value)?),
            }),
            ("not" | "when" | "set" | "map", _) => Err(LowerError::malformed(
                format!("wrong number of arguments to `{name}`"),
                span,
            )),
            _ => Err(unsupported_kind(name, span)),
        }
    }

    /// `P.select()` arities: none is anonymous; one string literal is named;
    /// one other argument is anonymous with a subpattern; two is named with
    /// a subpattern.
    fn lower_select(&self, args: &[ExprId], span: Span) -> Result<Pattern, LowerError> {
        let (binding, subpattern) = match *args {
            [] => (SelectBinding::Anonymous, None),
            [only] => match self.arena.expr_kind(only) {
                ExprKind::Str(name) => (SelectBinding::Named(name), None),
                _ => (SelectBinding::Anonymous, Some(only)),
            },
            [label, sub] => match self.arena.expr_kind(label) {
                ExprKind::Str(name) => (SelectBinding::Named(name), Some(sub)),
                _ => {
                    return Err(LowerError::malformed(
                        "the selection name must be a string literal",
                        self.arena.expr_span(label),
                    ));
                }
            },
            _ => {
                return Err(LowerError::malformed(
                    "`select` takes at most two arguments",
                    span,
                ));
            }
        };
        let subpattern = match subpattern {
            Some(sub) => Some(Box::new(self.lower_pattern(sub)?)),
            None => None,
        };
        Ok(Pattern::Select(Select {
            binding,
            subpattern,
            span,
        }))
    }
}

#[cold]
fn unsupported_expr(kind: impl Into<String>, span: Span) -> LowerError {
    LowerError::UnsupportedExpr {
        kind: kind.into(),
        span,
    }
}

#[cold]
fn unsupported_kind(name: &str, span: Span) -> LowerError {
    let kind = if KNOWN_UNSUPPORTED.contains(&name) {
        format!("P.{name}")
    } else {
        format!("P.{name} (unknown)")
    };
    LowerError::UnsupportedKind { kind, span }
}
