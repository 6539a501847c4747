//! The file pass: finds match expressions and splices in generated code.
//!
//! Traversal is pre-order over statements in source order. A statement
//! whose shape fixes a block context (single declarator, plain assignment)
//! is offered to the compiler first; every other call expression gets the
//! IIFE context. Replacements are walked again, so matches nested in
//! handler bodies are compiled inside the generated code.
//!
//! Expression replacements overwrite the call node in place. Statement
//! replacements rebuild the enclosing statement list, and only the lists
//! that actually changed.

use patty_codegen::{Codegen, Generated, OutputContext};
use patty_diagnostic::DiagnosticQueue;
use patty_ir::{
    AssignOp, BindingId, BindingKind, Expr, ExprArena, ExprId, ExprKind, ExprRange, Function,
    FunctionBody, FunctionId, PropKey, PropKind, Stmt, StmtId, StmtKind, StmtRange,
    StringInterner,
};
use patty_lower::LowerContext;
use rustc_hash::FxHashSet;

use crate::imports::ResolvedNames;
use crate::PassConfig;

pub(crate) struct Pass<'a> {
    arena: &'a mut ExprArena,
    interner: &'a StringInterner,
    config: &'a PassConfig,
    queue: &'a mut DiagnosticQueue,
    names: ResolvedNames,
    /// Calls already offered to the compiler, including the inner calls of
    /// every recognized chain.
    visited: FxHashSet<ExprId>,
    next_ordinal: u32,
    pub rewritten: usize,
}

impl<'a> Pass<'a> {
    pub fn new(
        arena: &'a mut ExprArena,
        interner: &'a StringInterner,
        config: &'a PassConfig,
        queue: &'a mut DiagnosticQueue,
        names: ResolvedNames,
    ) -> Self {
        Pass {
            arena,
            interner,
            config,
            queue,
            names,
            visited: FxHashSet::default(),
            next_ordinal: 0,
            rewritten: 0,
        }
    }

    /// Rewrite a statement list, returning the (possibly new) list.
    pub fn stmt_list(&mut self, range: StmtRange) -> StmtRange {
        let stmts = self.arena.list(range).to_vec();
        let mut out = Vec::with_capacity(stmts.len());
        let mut changed = false;
        for stmt in stmts {
            match self.stmt(stmt) {
                Some(replacement) => {
                    changed = true;
                    out.extend(replacement);
                }
                None => out.push(stmt),
            }
        }
        if changed {
            self.arena.alloc_list(out)
        } else {
            range
        }
    }

    /// `Some` when the statement itself is replaced.
    fn stmt(&mut self, id: StmtId) -> Option<Vec<StmtId>> {
        if let Some((call, context)) = self.statement_site(id) {
            if self.visited.insert(call) {
                match self.compile(call, context) {
                    Some(Generated::Stmts(stmts)) => {
                        let mut out = Vec::with_capacity(stmts.len());
                        for stmt in stmts {
                            match self.stmt(stmt) {
                                Some(replacement) => out.extend(replacement),
                                None => out.push(stmt),
                            }
                        }
                        return Some(out);
                    }
                    Some(Generated::Expr(expr)) => self.splice(call, expr),
                    None => {}
                }
            }
        }
        self.walk_stmt(id);
        None
    }

    /// The match candidate and block context a statement's shape selects.
    fn statement_site(&self, id: StmtId) -> Option<(ExprId, OutputContext)> {
        match self.arena.stmt_kind(id) {
            StmtKind::VarDecl { kind, declarators } => {
                let &[decl] = self.arena.list(declarators) else {
                    return None;
                };
                let init = decl.init.filter(|&init| self.is_call(init))?;
                let context = match self.arena.get_binding(decl.target).kind {
                    BindingKind::Ident(name) => OutputContext::VarDecl { kind, name },
                    BindingKind::Array(_) | BindingKind::Object(_) => {
                        OutputContext::PatternVarDecl {
                            kind,
                            target: decl.target,
                        }
                    }
                };
                Some((init, context))
            }
            StmtKind::Expr(expr) => match self.arena.expr_kind(expr) {
                ExprKind::Assign {
                    op: AssignOp::Assign,
                    target,
                    value,
                } if self.is_call(value) => Some((value, OutputContext::Assignment { target })),
                _ => None,
            },
            _ => None,
        }
    }

    fn is_call(&self, id: ExprId) -> bool {
        matches!(self.arena.expr_kind(id), ExprKind::Call { .. })
    }

    fn walk_stmt(&mut self, id: StmtId) {
        let stmt = *self.arena.get_stmt(id);
        let kind = match stmt.kind {
            StmtKind::Expr(expr) | StmtKind::Throw(expr) | StmtKind::Return(Some(expr)) => {
                self.expr(expr);
                return;
            }
            StmtKind::VarDecl { declarators, .. } => {
                for i in 0..declarators.len() {
                    let decl = self.arena.list(declarators)[i];
                    self.binding(decl.target);
                    if let Some(init) = decl.init {
                        self.expr(init);
                    }
                }
                return;
            }
            StmtKind::FunctionDecl(function) => {
                self.function(function);
                return;
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.expr(cond);
                StmtKind::If {
                    cond,
                    then_branch: self.single(then_branch),
                    else_branch: else_branch.map(|stmt| self.single(stmt)),
                }
            }
            StmtKind::Block(stmts) => StmtKind::Block(self.stmt_list(stmts)),
            StmtKind::Labeled { label, body } => StmtKind::Labeled {
                label,
                body: self.single(body),
            },
            StmtKind::Try {
                block,
                param,
                handler,
                finalizer,
            } => {
                let block = self.stmt_list(block);
                if let Some(param) = param {
                    self.binding(param);
                }
                StmtKind::Try {
                    block,
                    param,
                    handler: handler.map(|stmts| self.stmt_list(stmts)),
                    finalizer: finalizer.map(|stmts| self.stmt_list(stmts)),
                }
            }
            StmtKind::While { cond, body } => {
                self.expr(cond);
                StmtKind::While {
                    cond,
                    body: self.single(body),
                }
            }
            StmtKind::Return(None)
            | StmtKind::Break(_)
            | StmtKind::Continue(_)
            | StmtKind::Import { .. }
            | StmtKind::Empty => return,
        };
        if kind != stmt.kind {
            self.arena.set_stmt(id, Stmt::new(kind, stmt.span));
        }
    }

    /// A statement in single-statement position; several replacement
    /// statements are wrapped in a block.
    fn single(&mut self, id: StmtId) -> StmtId {
        match self.stmt(id) {
            None => id,
            Some(stmts) => {
                let span = self.arena.get_stmt(id).span;
                let list = self.arena.alloc_list(stmts);
                self.arena.alloc_stmt_kind(StmtKind::Block(list), span)
            }
        }
    }

    fn function(&mut self, id: FunctionId) {
        let function = *self.arena.get_function(id);
        for i in 0..function.params.len() {
            let param = self.arena.list(function.params)[i];
            self.binding(param.target);
            if let Some(default) = param.default {
                self.expr(default);
            }
        }
        match function.body {
            FunctionBody::Expr(body) => self.expr(body),
            FunctionBody::Block(stmts) => {
                let body = self.stmt_list(stmts);
                if body != stmts {
                    self.arena.set_function(
                        id,
                        Function {
                            body: FunctionBody::Block(body),
                            ..function
                        },
                    );
                }
            }
        }
    }

    /// Defaults and computed keys can hold match expressions too.
    fn binding(&mut self, id: BindingId) {
        match self.arena.get_binding(id).kind {
            BindingKind::Ident(_) => {}
            BindingKind::Array(elems) => {
                for i in 0..elems.len() {
                    let elem = self.arena.list(elems)[i];
                    if let Some(target) = elem.target {
                        self.binding(target);
                    }
                    if let Some(default) = elem.default {
                        self.expr(default);
                    }
                }
            }
            BindingKind::Object(props) => {
                for i in 0..props.len() {
                    let prop = self.arena.list(props)[i];
                    if let PropKey::Computed(key) = prop.key {
                        self.expr(key);
                    }
                    self.binding(prop.value);
                    if let Some(default) = prop.default {
                        self.expr(default);
                    }
                }
            }
        }
    }

    fn expr(&mut self, id: ExprId) {
        if self.is_call(id) && self.visited.insert(id) {
            if let Some(Generated::Expr(expr)) = self.compile(id, OutputContext::Iife) {
                self.splice(id, expr);
            }
        }
        self.walk_expr(id);
    }

    fn exprs(&mut self, range: ExprRange) {
        for i in 0..range.len() {
            let expr = self.arena.list(range)[i];
            self.expr(expr);
        }
    }

    fn walk_expr(&mut self, id: ExprId) {
        match self.arena.expr_kind(id) {
            ExprKind::Ident(_)
            | ExprKind::Str(_)
            | ExprKind::Num(_)
            | ExprKind::BigInt(_)
            | ExprKind::Bool(_)
            | ExprKind::Null
            | ExprKind::This => {}
            ExprKind::Template { exprs, .. } | ExprKind::Array(exprs) => self.exprs(exprs),
            ExprKind::Object(props) => {
                for i in 0..props.len() {
                    match self.arena.list(props)[i].kind {
                        PropKind::Init { key, value, .. } => {
                            if let PropKey::Computed(key) = key {
                                self.expr(key);
                            }
                            self.expr(value);
                        }
                        PropKind::Spread(value) => self.expr(value),
                    }
                }
            }
            ExprKind::Function(function) => self.function(function),
            ExprKind::Unary { operand, .. } | ExprKind::Spread(operand) => self.expr(operand),
            ExprKind::Binary { left, right, .. } => {
                self.expr(left);
                self.expr(right);
            }
            ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                self.expr(cond);
                self.expr(then_expr);
                self.expr(else_expr);
            }
            ExprKind::Assign { target, value, .. } => {
                self.expr(target);
                self.expr(value);
            }
            ExprKind::Member { object, .. } => self.expr(object),
            ExprKind::Index { object, index, .. } => {
                self.expr(object);
                self.expr(index);
            }
            ExprKind::Call { callee, args, .. } | ExprKind::New { callee, args } => {
                self.expr(callee);
                self.exprs(args);
            }
        }
    }

    /// Make `call` become `replacement`. Every parent pointing at `call`
    /// sees the new node.
    fn splice(&mut self, call: ExprId, replacement: ExprId) {
        let span = self.arena.expr_span(call);
        let kind = self.arena.expr_kind(replacement);
        self.arena.set_expr(call, Expr::new(kind, span));
    }

    /// Recognize, lower and generate one candidate. `None` leaves the
    /// source untouched: either it is not a match expression, or a
    /// diagnostic was queued.
    fn compile(&mut self, call: ExprId, context: OutputContext) -> Option<Generated> {
        let lowered = {
            let cx = LowerContext::new(
                self.arena,
                self.interner,
                self.names.matcher,
                self.names.patterns,
                &self.config.chain,
            );
            let calls = cx.recognize(call)?;
            self.visited.extend(calls.iter().copied());
            cx.lower_chain(&calls)
        };
        let ir = match lowered {
            Ok(ir) => ir,
            Err(err) => {
                tracing::debug!(code = %err.code(), %err, "match expression left in place");
                self.queue.push(err.to_diagnostic());
                return None;
            }
        };

        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;
        let generated = Codegen::new(self.arena, self.interner, self.config.codegen)
            .generate(&ir, context, ordinal);
        match generated {
            Ok(generated) => {
                tracing::debug!(ordinal, context = context.describe(), "match expression compiled");
                self.rewritten += 1;
                Some(generated)
            }
            Err(err) => {
                tracing::debug!(ordinal, code = %err.code(), %err, "match expression left in place");
                self.queue.push(err.to_diagnostic());
                None
            }
        }
    }
}
