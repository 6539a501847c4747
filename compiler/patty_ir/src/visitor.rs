//! Read-only syntax tree traversal.
//!
//! # Design
//!
//! Default `visit_*` methods call the matching `walk_*` function, which
//! visits children in source order. Override a `visit_*` method to observe
//! a node; call `walk_*` from the override to keep descending, or skip it
//! to prune the subtree (e.g. to stop at nested function boundaries).

use crate::ast::{BindingKind, ExprKind, FunctionBody, PropKey, PropKind, StmtKind};
use crate::ids::{BindingId, ExprId, FunctionId, StmtId, StmtRange};
use crate::ExprArena;

pub trait Visitor: Sized {
    fn visit_expr(&mut self, id: ExprId, arena: &ExprArena) {
        walk_expr(self, id, arena);
    }

    fn visit_stmt(&mut self, id: StmtId, arena: &ExprArena) {
        walk_stmt(self, id, arena);
    }

    fn visit_function(&mut self, id: FunctionId, arena: &ExprArena) {
        walk_function(self, id, arena);
    }

    fn visit_binding(&mut self, id: BindingId, arena: &ExprArena) {
        walk_binding(self, id, arena);
    }
}

pub fn walk_stmts<V: Visitor>(visitor: &mut V, stmts: StmtRange, arena: &ExprArena) {
    for &stmt in arena.list(stmts) {
        visitor.visit_stmt(stmt, arena);
    }
}

fn walk_exprs<V: Visitor>(visitor: &mut V, exprs: crate::ExprRange, arena: &ExprArena) {
    for &expr in arena.list(exprs) {
        visitor.visit_expr(expr, arena);
    }
}

pub fn walk_expr<V: Visitor>(visitor: &mut V, id: ExprId, arena: &ExprArena) {
    match arena.expr_kind(id) {
        ExprKind::Ident(_)
        | ExprKind::Str(_)
        | ExprKind::Num(_)
        | ExprKind::BigInt(_)
        | ExprKind::Bool(_)
        | ExprKind::Null
        | ExprKind::This => {}
        ExprKind::Template { exprs, .. } | ExprKind::Array(exprs) => {
            walk_exprs(visitor, exprs, arena);
        }
        ExprKind::Object(props) => {
            for prop in arena.list(props) {
                match prop.kind {
                    PropKind::Init { key, value, .. } => {
                        if let PropKey::Computed(key) = key {
                            visitor.visit_expr(key, arena);
                        }
                        visitor.visit_expr(value, arena);
                    }
                    PropKind::Spread(value) => visitor.visit_expr(value, arena),
                }
            }
        }
        ExprKind::Function(function) => visitor.visit_function(function, arena),
        ExprKind::Unary { operand, .. } | ExprKind::Spread(operand) => {
            visitor.visit_expr(operand, arena);
        }
        ExprKind::Binary { left, right, .. } => {
            visitor.visit_expr(left, arena);
            visitor.visit_expr(right, arena);
        }
        ExprKind::Conditional {
            cond,
            then_expr,
            else_expr,
        } => {
            visitor.visit_expr(cond, arena);
            visitor.visit_expr(then_expr, arena);
            visitor.visit_expr(else_expr, arena);
        }
        ExprKind::Assign { target, value, .. } => {
            visitor.visit_expr(target, arena);
            visitor.visit_expr(value, arena);
        }
        ExprKind::Member { object, .. } => visitor.visit_expr(object, arena),
        ExprKind::Index { object, index, .. } => {
            visitor.visit_expr(object, arena);
            visitor.visit_expr(index, arena);
        }
        ExprKind::Call { callee, args, .. } | ExprKind::New { callee, args } => {
            visitor.visit_expr(callee, arena);
            walk_exprs(visitor, args, arena);
        }
    }
}

pub fn walk_stmt<V: Visitor>(visitor: &mut V, id: StmtId, arena: &ExprArena) {
    match arena.stmt_kind(id) {
        StmtKind::Expr(expr) | StmtKind::Throw(expr) | StmtKind::Return(Some(expr)) => {
            visitor.visit_expr(expr, arena);
        }
        StmtKind::VarDecl { declarators, .. } => {
            for decl in arena.list(declarators) {
                visitor.visit_binding(decl.target, arena);
                if let Some(init) = decl.init {
                    visitor.visit_expr(init, arena);
                }
            }
        }
        StmtKind::FunctionDecl(function) => visitor.visit_function(function, arena),
        StmtKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            visitor.visit_expr(cond, arena);
            visitor.visit_stmt(then_branch, arena);
            if let Some(else_branch) = else_branch {
                visitor.visit_stmt(else_branch, arena);
            }
        }
        StmtKind::Block(stmts) => walk_stmts(visitor, stmts, arena),
        StmtKind::Labeled { body, .. } => visitor.visit_stmt(body, arena),
        StmtKind::Try {
            block,
            param,
            handler,
            finalizer,
        } => {
            walk_stmts(visitor, block, arena);
            if let Some(param) = param {
                visitor.visit_binding(param, arena);
            }
            if let Some(handler) = handler {
                walk_stmts(visitor, handler, arena);
            }
            if let Some(finalizer) = finalizer {
                walk_stmts(visitor, finalizer, arena);
            }
        }
        StmtKind::While { cond, body } => {
            visitor.visit_expr(cond, arena);
            visitor.visit_stmt(body, arena);
        }
        StmtKind::Return(None)
        | StmtKind::Break(_)
        | StmtKind::Continue(_)
        | StmtKind::Import { .. }
        | StmtKind::Empty => {}
    }
}

pub fn walk_function<V: Visitor>(visitor: &mut V, id: FunctionId, arena: &ExprArena) {
    let function = *arena.get_function(id);
    for param in arena.list(function.params) {
        visitor.visit_binding(param.target, arena);
        if let Some(default) = param.default {
            visitor.visit_expr(default, arena);
        }
    }
    match function.body {
        FunctionBody::Expr(body) => visitor.visit_expr(body, arena),
        FunctionBody::Block(body) => walk_stmts(visitor, body, arena),
    }
}

pub fn walk_binding<V: Visitor>(visitor: &mut V, id: BindingId, arena: &ExprArena) {
    match arena.get_binding(id).kind {
        BindingKind::Ident(_) => {}
        BindingKind::Array(elems) => {
            for elem in arena.list(elems) {
                if let Some(target) = elem.target {
                    visitor.visit_binding(target, arena);
                }
                if let Some(default) = elem.default {
                    visitor.visit_expr(default, arena);
                }
            }
        }
        BindingKind::Object(props) => {
            for prop in arena.list(props) {
                if let PropKey::Computed(key) = prop.key {
                    visitor.visit_expr(key, arena);
                }
                visitor.visit_binding(prop.value, arena);
                if let Some(default) = prop.default {
                    visitor.visit_expr(default, arena);
                }
            }
        }
    }
}

/// Collect every name a binding pattern introduces, in source order.
pub fn binding_names(id: BindingId, arena: &ExprArena, out: &mut Vec<crate::Name>) {
    struct Names<'a>(&'a mut Vec<crate::Name>);

    impl Visitor for Names<'_> {
        fn visit_binding(&mut self, id: BindingId, arena: &ExprArena) {
            if let BindingKind::Ident(name) = arena.get_binding(id).kind {
                self.0.push(name);
            }
            walk_binding(self, id, arena);
        }

        // Defaults are expressions; nothing inside them is bound here.
        fn visit_expr(&mut self, _id: ExprId, _arena: &ExprArena) {}
    }

    Names(out).visit_binding(id, arena);
}
