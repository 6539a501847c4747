//! Statement execution.

use patty_ir::{BindingId, ExprId, Name, StmtId, StmtKind, StmtRange, VarKind};

use super::Interpreter;
use crate::environment::Mutability;
use crate::error::{EvalError, EvalResult};
use crate::value::Value;

/// How a statement finished.
#[derive(Debug)]
pub(crate) enum Flow {
    Normal,
    Return(Value),
    Break(Option<Name>),
    Continue(Option<Name>),
}

impl Interpreter<'_> {
    /// Run a statement list in the current scope. Function declarations are
    /// bound before the first statement runs.
    pub(crate) fn exec_stmts(&mut self, stmts: StmtRange) -> EvalResult<Flow> {
        let arena = self.arena;
        let stmts = arena.list(stmts);
        for &stmt in stmts {
            if let StmtKind::FunctionDecl(function) = arena.stmt_kind(stmt) {
                if let Some(name) = arena.get_function(function).name {
                    let closure = self.make_closure(function);
                    self.env.define(name, closure, Mutability::Mutable);
                }
            }
        }
        for &stmt in stmts {
            match self.exec_stmt(stmt)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_block(&mut self, stmts: StmtRange) -> EvalResult<Flow> {
        self.env.push_scope();
        let flow = self.exec_stmts(stmts);
        self.env.pop_scope();
        flow
    }

    fn exec_stmt(&mut self, id: StmtId) -> EvalResult<Flow> {
        let stmt = *self.arena.get_stmt(id);
        match stmt.kind {
            StmtKind::Expr(expr) => {
                self.eval_expr(expr)?;
                Ok(Flow::Normal)
            }
            StmtKind::VarDecl { kind, declarators } => {
                let mutability = match kind {
                    VarKind::Const => Mutability::Immutable,
                    VarKind::Let | VarKind::Var => Mutability::Mutable,
                };
                let arena = self.arena;
                for decl in arena.list(declarators) {
                    let value = match decl.init {
                        Some(init) => self.eval_expr(init)?,
                        None => Value::Undefined,
                    };
                    self.bind(decl.target, value, mutability)?;
                }
                Ok(Flow::Normal)
            }
            StmtKind::FunctionDecl(_) | StmtKind::Import { .. } | StmtKind::Empty => {
                Ok(Flow::Normal)
            }
            StmtKind::Return(value) => {
                let value = match value {
                    Some(value) => self.eval_expr(value)?,
                    None => Value::Undefined,
                };
                Ok(Flow::Return(value))
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.eval_expr(cond)?.is_truthy() {
                    self.exec_stmt(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.exec_stmt(else_branch)
                } else {
                    Ok(Flow::Normal)
                }
            }
            StmtKind::Block(stmts) => self.exec_block(stmts),
            StmtKind::Labeled { label, body } => {
                if let StmtKind::While { cond, body } = self.arena.stmt_kind(body) {
                    return self.exec_while(cond, body, Some(label));
                }
                match self.exec_stmt(body)? {
                    Flow::Break(Some(target)) if target == label => Ok(Flow::Normal),
                    flow => Ok(flow),
                }
            }
            StmtKind::Break(label) => Ok(Flow::Break(label)),
            StmtKind::Continue(label) => Ok(Flow::Continue(label)),
            StmtKind::Throw(value) => {
                let value = self.eval_expr(value)?;
                Err(EvalError::Thrown {
                    value,
                    span: stmt.span,
                })
            }
            StmtKind::Try {
                block,
                param,
                handler,
                finalizer,
            } => self.exec_try(block, param, handler, finalizer),
            StmtKind::While { cond, body } => self.exec_while(cond, body, None),
        }
    }

    fn exec_while(&mut self, cond: ExprId, body: StmtId, label: Option<Name>) -> EvalResult<Flow> {
        while self.eval_expr(cond)?.is_truthy() {
            match self.exec_stmt(body)? {
                Flow::Normal | Flow::Continue(None) => {}
                Flow::Break(None) => break,
                Flow::Continue(Some(target)) if Some(target) == label => {}
                Flow::Break(Some(target)) if Some(target) == label => break,
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_try(
        &mut self,
        block: StmtRange,
        param: Option<BindingId>,
        handler: Option<StmtRange>,
        finalizer: Option<StmtRange>,
    ) -> EvalResult<Flow> {
        let result = match (self.exec_block(block), handler) {
            (Err(err), Some(handler)) if err.is_catchable() => {
                self.exec_catch(param, err.into_thrown(), handler)
            }
            (result, _) => result,
        };
        if let Some(finalizer) = finalizer {
            match self.exec_block(finalizer)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }
        result
    }

    fn exec_catch(
        &mut self,
        param: Option<BindingId>,
        thrown: Value,
        handler: StmtRange,
    ) -> EvalResult<Flow> {
        self.env.push_scope();
        let result = match param {
            Some(param) => self.bind(param, thrown, Mutability::Mutable),
            None => Ok(()),
        }
        .and_then(|()| self.exec_stmts(handler));
        self.env.pop_scope();
        result
    }
}
