//! Node construction for generated code.
//!
//! Every synthesized node carries the span of the match expression it
//! replaces, so diagnostics raised later (e.g. by a nested match) still
//! point somewhere sensible.

use patty_ir::{
    AssignOp, BinaryOp, BindingId, Declarator, ExprArena, ExprId, ExprKind, Function,
    FunctionBody, FunctionKind, Name, Param, Prop, PropKey, PropKind, Span, Stmt, StmtId,
    StmtKind, StringInterner, UnaryOp, VarKind,
};

/// `true` when `name` can follow a `.` in a member access.
pub fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

pub(crate) struct Builder<'a> {
    pub arena: &'a mut ExprArena,
    pub interner: &'a StringInterner,
    pub span: Span,
}

impl Builder<'_> {
    // ── Expressions ─────────────────────────────────────────────────

    fn expr(&mut self, kind: ExprKind) -> ExprId {
        self.arena.alloc(kind, self.span)
    }

    pub fn ident(&mut self, name: Name) -> ExprId {
        self.expr(ExprKind::Ident(name))
    }

    /// Identifier for a well-known global (`undefined`, `Array`, ...).
    pub fn global(&mut self, name: &str) -> ExprId {
        let name = self.interner.intern(name);
        self.ident(name)
    }

    pub fn str_lit(&mut self, text: &str) -> ExprId {
        let text = self.interner.intern(text);
        self.expr(ExprKind::Str(text))
    }

    pub fn literal(&mut self, kind: ExprKind) -> ExprId {
        self.expr(kind)
    }

    /// `object.property`, or `object?.property` when `optional`.
    pub fn member(&mut self, object: ExprId, property: &str, optional: bool) -> ExprId {
        let property = self.interner.intern(property);
        self.expr(ExprKind::Member {
            object,
            property,
            optional,
        })
    }

    /// Field access by name, falling back to `object['key']` for keys that
    /// are not identifier names.
    pub fn field(&mut self, object: ExprId, key: Name, optional: bool) -> ExprId {
        if is_identifier_name(self.interner.lookup(key)) {
            self.expr(ExprKind::Member {
                object,
                property: key,
                optional,
            })
        } else {
            let index = self.expr(ExprKind::Str(key));
            self.expr(ExprKind::Index {
                object,
                index,
                optional,
            })
        }
    }

    /// `global.property`, e.g. `Array.isArray`.
    pub fn global_member(&mut self, global: &str, property: &str) -> ExprId {
        let object = self.global(global);
        self.member(object, property, false)
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "array pattern positions are far below 2^53"
    )]
    pub fn element(&mut self, object: ExprId, position: usize, optional: bool) -> ExprId {
        let index = self.expr(ExprKind::num(position as f64));
        self.expr(ExprKind::Index {
            object,
            index,
            optional,
        })
    }

    pub fn call(&mut self, callee: ExprId, args: &[ExprId]) -> ExprId {
        let args = self.arena.alloc_list(args.iter().copied());
        self.expr(ExprKind::Call {
            callee,
            args,
            optional: false,
        })
    }

    pub fn new_expr(&mut self, callee: ExprId, args: &[ExprId]) -> ExprId {
        let args = self.arena.alloc_list(args.iter().copied());
        self.expr(ExprKind::New { callee, args })
    }

    pub fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        self.expr(ExprKind::Binary { op, left, right })
    }

    pub fn unary(&mut self, op: UnaryOp, operand: ExprId) -> ExprId {
        self.expr(ExprKind::Unary { op, operand })
    }

    pub fn assign(&mut self, target: ExprId, value: ExprId) -> ExprId {
        self.expr(ExprKind::Assign {
            op: AssignOp::Assign,
            target,
            value,
        })
    }

    /// Left-nested `a op b op c`. `None` for an empty list.
    pub fn chain(&mut self, op: BinaryOp, operands: &[ExprId]) -> Option<ExprId> {
        let (&first, rest) = operands.split_first()?;
        Some(
            rest.iter()
                .fold(first, |acc, &next| self.binary(op, acc, next)),
        )
    }

    /// `{ k1: v1, k2: v2 }`, keys in the given order.
    pub fn object(&mut self, entries: &[(Name, ExprId)]) -> ExprId {
        let props: Vec<Prop> = entries
            .iter()
            .map(|&(key, value)| {
                let key = if is_identifier_name(self.interner.lookup(key)) {
                    PropKey::Ident(key)
                } else {
                    PropKey::Str(key)
                };
                Prop {
                    kind: PropKind::Init {
                        key,
                        value,
                        shorthand: false,
                    },
                    span: self.span,
                }
            })
            .collect();
        let props = self.arena.alloc_list(props);
        self.expr(ExprKind::Object(props))
    }

    /// Template literal with one interpolation per gap between `quasis`.
    pub fn template(&mut self, quasis: &[&str], exprs: &[ExprId]) -> ExprId {
        let quasis: Vec<ExprId> = quasis.iter().map(|text| self.str_lit(text)).collect();
        let quasis = self.arena.alloc_list(quasis);
        let exprs = self.arena.alloc_list(exprs.iter().copied());
        self.expr(ExprKind::Template { quasis, exprs })
    }

    /// `(params) => { body }`
    pub fn arrow(&mut self, params: &[Name], body: Vec<StmtId>) -> ExprId {
        let params: Vec<Param> = params
            .iter()
            .map(|&name| Param {
                target: self.arena.alloc_binding_ident(name, self.span),
                default: None,
                rest: false,
                span: self.span,
            })
            .collect();
        let params = self.arena.alloc_list(params);
        let body = self.arena.alloc_list(body);
        let function = self.arena.alloc_function(Function {
            kind: FunctionKind::Arrow,
            name: None,
            params,
            body: FunctionBody::Block(body),
            is_async: false,
            is_generator: false,
            span: self.span,
        });
        self.expr(ExprKind::Function(function))
    }

    // ── Statements ──────────────────────────────────────────────────

    fn stmt(&mut self, kind: StmtKind) -> StmtId {
        self.arena.alloc_stmt(Stmt::new(kind, self.span))
    }

    pub fn expr_stmt(&mut self, expr: ExprId) -> StmtId {
        self.stmt(StmtKind::Expr(expr))
    }

    pub fn binding(&mut self, name: Name) -> BindingId {
        self.arena.alloc_binding_ident(name, self.span)
    }

    /// `kind target = init;` with a single declarator.
    pub fn declare(&mut self, kind: VarKind, target: BindingId, init: Option<ExprId>) -> StmtId {
        let declarators = self.arena.alloc_list([Declarator {
            target,
            init,
            span: self.span,
        }]);
        self.stmt(StmtKind::VarDecl { kind, declarators })
    }

    /// `let name = init;` (or `let name;`)
    pub fn let_name(&mut self, name: Name, init: Option<ExprId>) -> StmtId {
        let target = self.binding(name);
        self.declare(VarKind::Let, target, init)
    }

    pub fn block(&mut self, stmts: Vec<StmtId>) -> StmtId {
        let stmts = self.arena.alloc_list(stmts);
        self.stmt(StmtKind::Block(stmts))
    }

    pub fn if_stmt(&mut self, cond: ExprId, then_branch: StmtId) -> StmtId {
        self.stmt(StmtKind::If {
            cond,
            then_branch,
            else_branch: None,
        })
    }

    pub fn labeled(&mut self, label: Name, body: StmtId) -> StmtId {
        self.stmt(StmtKind::Labeled { label, body })
    }

    pub fn break_to(&mut self, label: Name) -> StmtId {
        self.stmt(StmtKind::Break(Some(label)))
    }

    pub fn return_stmt(&mut self, value: Option<ExprId>) -> StmtId {
        self.stmt(StmtKind::Return(value))
    }

    pub fn throw(&mut self, value: ExprId) -> StmtId {
        self.stmt(StmtKind::Throw(value))
    }

    /// `try { block } catch (param) { handler }`
    pub fn try_catch(&mut self, block: Vec<StmtId>, param: Name, handler: Vec<StmtId>) -> StmtId {
        let block = self.arena.alloc_list(block);
        let param = self.binding(param);
        let handler = self.arena.alloc_list(handler);
        self.stmt(StmtKind::Try {
            block,
            param: Some(param),
            handler: Some(handler),
            finalizer: None,
        })
    }
}
