//! Output contexts and the sinks they imply.
//!
//! ```text
//! Iife            (() => { ...; return v; })()
//! VarDecl         let x; L: { ...; x = v; break L; }
//! PatternVarDecl  let t; L: { ...; t = v; break L; } const [a, b] = t;
//! Assignment      L: { ...; target = v; break L; }
//! ```
//!
//! The context is chosen once per match expression from its syntactic
//! parent. Every branch exit, and every `return` inside an inlined handler,
//! goes through the resulting [`Sink`].

use patty_ir::visitor::{walk_expr, Visitor};
use patty_ir::{BindingId, ExprArena, ExprId, ExprKind, Name, StmtId, StringInterner, VarKind};
use smallvec::{smallvec, SmallVec};

use crate::build::Builder;

/// Syntactic position of the match expression being replaced.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OutputContext {
    /// Anywhere a value is needed.
    Iife,
    /// `kind name = <match>;`
    VarDecl { kind: VarKind, name: Name },
    /// `kind <destructuring> = <match>;`
    PatternVarDecl { kind: VarKind, target: BindingId },
    /// `target = <match>;` as a statement.
    Assignment { target: ExprId },
}

impl OutputContext {
    pub fn describe(&self) -> &'static str {
        match self {
            OutputContext::Iife => "iife",
            OutputContext::VarDecl { .. } => "block(var-decl)",
            OutputContext::PatternVarDecl { .. } => "block(pattern-var-decl)",
            OutputContext::Assignment { .. } => "block(assignment)",
        }
    }

    /// Statement contexts replace the enclosing statement.
    pub fn is_statement(&self) -> bool {
        !matches!(self, OutputContext::Iife)
    }
}

/// Mints `__patty_<ordinal>_<n>`. One per match expression.
#[derive(Debug)]
pub(crate) struct FreshNames {
    ordinal: u32,
    next: u32,
}

impl FreshNames {
    pub fn new(ordinal: u32) -> Self {
        FreshNames { ordinal, next: 0 }
    }

    pub fn next(&mut self, interner: &StringInterner) -> Name {
        let name = interner.intern(&format!("__patty_{}_{}", self.ordinal, self.next));
        self.next += 1;
        name
    }
}

/// What an assigning sink writes to.
#[derive(Copy, Clone, Debug)]
pub(crate) enum SinkTarget {
    Name(Name),
    Expr(ExprId),
}

/// How a branch delivers its value and leaves.
#[derive(Copy, Clone, Debug)]
pub(crate) enum Sink {
    /// `return v;` from the wrapping arrow.
    Return,
    /// `target = v; break label;`
    Assign { target: SinkTarget, label: Name },
}

impl Sink {
    /// Statements that deliver `value` (or `undefined`) and exit.
    pub fn exit(&self, b: &mut Builder<'_>, value: Option<ExprId>) -> SmallVec<[StmtId; 2]> {
        match *self {
            Sink::Return => smallvec![b.return_stmt(value)],
            Sink::Assign { target, label } => {
                let target = match target {
                    SinkTarget::Name(name) => b.ident(name),
                    SinkTarget::Expr(expr) => expr,
                };
                let value = value.unwrap_or_else(|| b.global("undefined"));
                let assign = b.assign(target, value);
                smallvec![b.expr_stmt(assign), b.break_to(label)]
            }
        }
    }

    /// Every identifier the sink's target mentions, index and computed
    /// parts included. An inlined handler that declares one of them would
    /// capture the write.
    pub fn target_names(&self, arena: &ExprArena) -> SmallVec<[Name; 2]> {
        match *self {
            Sink::Return => SmallVec::new(),
            Sink::Assign {
                target: SinkTarget::Name(name),
                ..
            } => smallvec![name],
            Sink::Assign {
                target: SinkTarget::Expr(expr),
                ..
            } => {
                let mut idents = Idents(SmallVec::new());
                idents.visit_expr(expr, arena);
                idents.0
            }
        }
    }
}

/// Identifier references, nested functions included: their free names
/// resolve in the same scope as the target itself.
struct Idents(SmallVec<[Name; 2]>);

impl Visitor for Idents {
    fn visit_expr(&mut self, id: ExprId, arena: &ExprArena) {
        if let ExprKind::Ident(name) = arena.expr_kind(id) {
            if !self.0.contains(&name) {
                self.0.push(name);
            }
        }
        walk_expr(self, id, arena);
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;

    #[test]
    fn fresh_names_are_scoped_by_ordinal() {
        let interner = StringInterner::new();
        let mut outer = FreshNames::new(0);
        let mut inner = FreshNames::new(1);
        let a = outer.next(&interner);
        let b = outer.next(&interner);
        let c = inner.next(&interner);
        assert_eq!(interner.lookup(a), "__patty_0_0");
        assert_eq!(interner.lookup(b), "__patty_0_1");
        assert_eq!(interner.lookup(c), "__patty_1_0");
    }

    #[test]
    fn target_names_cover_index_and_computed_parts() {
        let interner = StringInterner::new();
        let mut arena = ExprArena::new();
        let target =
            patty_parse::parse_expression("a[i].b[j + k.l]", &mut arena, &interner).unwrap();
        let sink = Sink::Assign {
            target: SinkTarget::Expr(target),
            label: interner.intern("L"),
        };
        let names: Vec<&str> = sink
            .target_names(&arena)
            .iter()
            .map(|&name| interner.lookup(name))
            .collect();
        assert_eq!(names, ["a", "i", "j", "k"]);
        assert!(Sink::Return.target_names(&arena).is_empty());
    }

    #[test]
    fn context_names() {
        assert_eq!(OutputContext::Iife.describe(), "iife");
        assert!(!OutputContext::Iife.is_statement());
        let assignment = OutputContext::Assignment {
            target: ExprId::new(0),
        };
        assert!(assignment.is_statement());
    }
}
