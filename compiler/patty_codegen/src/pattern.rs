//! Pattern tests: pattern tree to boolean conjuncts.
//!
//! Each pattern contributes zero or more conjuncts that all have to hold.
//! Trivially-true patterns (wildcards, bare selections) contribute none, so
//! they vanish from the emitted `&&` chain instead of showing up as `true`.

use patty_ir::matching::{LiteralPattern, Pattern, SelectBinding, TypeTag};
use patty_ir::{BinaryOp, ExprId, ExprKind, Name, UnaryOp};
use smallvec::SmallVec;

use crate::build::Builder;
use crate::generate::MatchGen;
use crate::CodegenError;

/// Capture positions recorded while building one branch's test, in
/// first-encountered order.
#[derive(Debug, Default)]
pub(crate) struct Captures {
    entries: SmallVec<[(SelectBinding, ExprId); 2]>,
}

impl Captures {
    pub fn push(&mut self, binding: SelectBinding, value: ExprId) {
        self.entries.push((binding, value));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// What the handler receives: the bare value for an anonymous capture,
    /// a `{ name: value, .. }` record for named ones, nothing without
    /// captures.
    pub fn value(&self, b: &mut Builder<'_>) -> Option<ExprId> {
        match self.entries.as_slice() {
            [] => None,
            [(SelectBinding::Anonymous, value)] => Some(*value),
            entries => {
                let named: Vec<(Name, ExprId)> = entries
                    .iter()
                    .filter_map(|&(binding, value)| match binding {
                        SelectBinding::Named(name) => Some((name, value)),
                        SelectBinding::Anonymous => None,
                    })
                    .collect();
                Some(b.object(&named))
            }
        }
    }
}

impl MatchGen<'_> {
    /// Push the conjuncts that test `target` against `pattern`.
    pub(crate) fn conjuncts(
        &mut self,
        target: ExprId,
        pattern: &Pattern,
        out: &mut Vec<ExprId>,
        captures: &mut Captures,
    ) -> Result<(), CodegenError> {
        match pattern {
            Pattern::Wildcard => {}
            Pattern::Literal(literal) => out.push(self.literal_test(target, *literal)),
            Pattern::TypeTag(tag) => out.push(self.type_test(target, *tag)),
            Pattern::Array(elements) => {
                let is_array = self.b.global_member("Array", "isArray");
                out.push(self.b.call(is_array, &[target]));
                if !elements.is_empty() {
                    let length = self.b.member(target, "length", self.null_safe);
                    let count = self.b.literal(ExprKind::num(count_f64(elements.len())));
                    out.push(self.b.binary(BinaryOp::GtEq, length, count));
                }
                for (position, element) in elements.iter().enumerate() {
                    let item = self.b.element(target, position, self.null_safe);
                    self.conjuncts(item, element, out, captures)?;
                }
            }
            Pattern::Object(fields) => {
                for field in fields {
                    let value = self.b.field(target, field.name, self.null_safe);
                    self.conjuncts(value, &field.pattern, out, captures)?;
                }
            }
            Pattern::Select(select) => {
                captures.push(select.binding, target);
                if let Some(sub) = &select.subpattern {
                    self.conjuncts(target, sub, out, captures)?;
                }
            }
            Pattern::Not(_) | Pattern::When(_) | Pattern::Set(_) | Pattern::Map { .. } => {
                return Err(CodegenError::UnsupportedPattern {
                    kind: pattern.describe(),
                    span: self.b.span,
                });
            }
        }
        Ok(())
    }

    fn literal_test(&mut self, target: ExprId, literal: LiteralPattern) -> ExprId {
        let expected = match literal {
            LiteralPattern::Str(text) => self.b.literal(ExprKind::Str(text)),
            LiteralPattern::Num(bits) => self.b.literal(ExprKind::Num(bits)),
            LiteralPattern::Bool(value) => self.b.literal(ExprKind::Bool(value)),
            LiteralPattern::BigInt(digits) => self.b.literal(ExprKind::BigInt(digits)),
            LiteralPattern::Null => self.b.literal(ExprKind::Null),
            LiteralPattern::Undefined => self.b.global("undefined"),
            // NaN is the one value `===` cannot find.
            LiteralPattern::NaN => {
                let is_nan = self.b.global_member("Number", "isNaN");
                return self.b.call(is_nan, &[target]);
            }
        };
        self.b.binary(BinaryOp::StrictEq, target, expected)
    }

    fn type_test(&mut self, target: ExprId, tag: TypeTag) -> ExprId {
        match tag.typeof_name() {
            Some(name) => {
                let type_of = self.b.unary(UnaryOp::TypeOf, target);
                let name = self.b.str_lit(name);
                self.b.binary(BinaryOp::StrictEq, type_of, name)
            }
            // `== null` holds for exactly null and undefined.
            None => {
                let null = self.b.literal(ExprKind::Null);
                self.b.binary(BinaryOp::LooseEq, target, null)
            }
        }
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "array pattern lengths are far below 2^53"
)]
fn count_f64(count: usize) -> f64 {
    count as f64
}
