//! Match IR: one recognized match expression after lowering.
//!
//! A [`MatchIr`] is built fresh for each `match(subject).with(..)...`
//! chain, read once by code generation, then dropped. Nothing in here is
//! mutated after lowering.
//!
//! Expressions inside the IR (subject, guards, handlers, literal-free
//! pattern payloads) are `ExprId`s into the same arena as the host program,
//! so codegen can reuse the original nodes instead of cloning them.

use smallvec::SmallVec;

use crate::{ExprId, FunctionId, Name, Span};

/// One match expression.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchIr {
    /// Evaluated at most once by generated code.
    pub subject: ExprId,
    /// First matching branch wins.
    pub branches: Vec<Branch>,
    pub fallback: Option<Handler>,
    /// The chain ended in `.exhaustive()`.
    pub exhaustive: bool,
    /// Span of the whole chain.
    pub span: Span,
}

/// One `.with(..)` clause.
#[derive(Clone, Debug, PartialEq)]
pub struct Branch {
    /// Alternatives, OR-ed in order. Never empty.
    pub patterns: SmallVec<[Pattern; 1]>,
    /// Called with the subject after the structural tests pass.
    pub guard: Option<ExprId>,
    pub handler: Handler,
    pub span: Span,
}

impl Branch {
    /// Capture requests across all alternatives, in first-encountered order.
    pub fn selections(&self) -> Vec<&Select> {
        let mut out = Vec::new();
        for pattern in &self.patterns {
            pattern.for_each_select(&mut |select| out.push(select));
        }
        out
    }
}

/// What runs when a branch matches.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Handler {
    /// A function literal written in place: a candidate for inlining.
    Inline(FunctionId),
    /// Any other callable expression; always called.
    Callable(ExprId),
}

/// Pattern tree. Code generation matches on this exhaustively.
#[derive(Clone, Debug, PartialEq)]
pub enum Pattern {
    Literal(LiteralPattern),
    TypeTag(TypeTag),
    Wildcard,
    /// Prefix match: the subject needs at least this many elements.
    Array(Vec<Pattern>),
    Object(Vec<ObjectField>),
    Select(Select),
    /// `P.not(..)`: recognized, not compiled.
    Not(Box<Pattern>),
    /// `P.when(predicate)`: recognized, not compiled.
    When(ExprId),
    /// `P.set(..)`: recognized, not compiled.
    Set(Box<Pattern>),
    /// `P.map(key, value)`: recognized, not compiled.
    Map { key: Box<Pattern>, value: Box<Pattern> },
}

impl Pattern {
    /// Diagnostic name of the pattern kind.
    pub fn describe(&self) -> &'static str {
        match self {
            Pattern::Literal(_) => "literal",
            Pattern::TypeTag(_) => "type tag",
            Pattern::Wildcard => "wildcard",
            Pattern::Array(_) => "array",
            Pattern::Object(_) => "object",
            Pattern::Select(_) => "select",
            Pattern::Not(_) => "not",
            Pattern::When(_) => "when",
            Pattern::Set(_) => "set",
            Pattern::Map { .. } => "map",
        }
    }

    /// Visit every `select` in pre-order (a select before its subpattern,
    /// object fields and array elements left to right).
    pub fn for_each_select<'a>(&'a self, f: &mut impl FnMut(&'a Select)) {
        match self {
            Pattern::Literal(_) | Pattern::TypeTag(_) | Pattern::Wildcard | Pattern::When(_) => {}
            Pattern::Array(elements) => {
                for element in elements {
                    element.for_each_select(f);
                }
            }
            Pattern::Object(fields) => {
                for field in fields {
                    field.pattern.for_each_select(f);
                }
            }
            Pattern::Select(select) => {
                f(select);
                if let Some(sub) = &select.subpattern {
                    sub.for_each_select(f);
                }
            }
            Pattern::Not(inner) | Pattern::Set(inner) => inner.for_each_select(f),
            Pattern::Map { key, value } => {
                key.for_each_select(f);
                value.for_each_select(f);
            }
        }
    }

    /// First pattern kind that code generation does not support, searching
    /// the whole tree.
    pub fn find_unsupported(&self) -> Option<&Pattern> {
        match self {
            Pattern::Literal(_) | Pattern::TypeTag(_) | Pattern::Wildcard => None,
            Pattern::Array(elements) => elements.iter().find_map(Pattern::find_unsupported),
            Pattern::Object(fields) => fields.iter().find_map(|f| f.pattern.find_unsupported()),
            Pattern::Select(select) => select
                .subpattern
                .as_deref()
                .and_then(Pattern::find_unsupported),
            Pattern::Not(_) | Pattern::When(_) | Pattern::Set(_) | Pattern::Map { .. } => {
                Some(self)
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjectField {
    pub name: Name,
    pub pattern: Pattern,
}

/// Literal values a pattern can compare against.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LiteralPattern {
    Str(Name),
    /// `f64` bits; negative literals are folded in during lowering.
    Num(u64),
    Bool(bool),
    BigInt(Name),
    Null,
    Undefined,
    NaN,
}

/// `P.string`, `P.number`, ...
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeTag {
    String,
    Number,
    Boolean,
    BigInt,
    Symbol,
    /// `null` or `undefined`.
    Nullish,
}

impl TypeTag {
    /// The `typeof` result this tag tests for. `None` for `Nullish`, which
    /// has no single `typeof` answer.
    pub fn typeof_name(self) -> Option<&'static str> {
        match self {
            TypeTag::String => Some("string"),
            TypeTag::Number => Some("number"),
            TypeTag::Boolean => Some("boolean"),
            TypeTag::BigInt => Some("bigint"),
            TypeTag::Symbol => Some("symbol"),
            TypeTag::Nullish => None,
        }
    }

    /// Parse the `P.<tag>` member name.
    pub fn from_member(name: &str) -> Option<TypeTag> {
        match name {
            "string" => Some(TypeTag::String),
            "number" => Some(TypeTag::Number),
            "boolean" => Some(TypeTag::Boolean),
            "bigint" => Some(TypeTag::BigInt),
            "symbol" => Some(TypeTag::Symbol),
            "nullish" => Some(TypeTag::Nullish),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Select {
    pub binding: SelectBinding,
    /// Gates the match when present.
    pub subpattern: Option<Box<Pattern>>,
    pub span: Span,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SelectBinding {
    Anonymous,
    Named(Name),
}
