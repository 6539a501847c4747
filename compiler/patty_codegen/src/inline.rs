//! Handler inlining: when it is safe, and the body rewrite that goes with it.
//!
//! An inlined handler's parameters become `let` bindings in the branch
//! block and its exits go through the active [`Sink`]. Anything that would
//! change meaning under that transformation (its own `this`, `var`
//! hoisting, default or rest parameters, `await`) keeps the handler as a
//! real call instead.

use patty_ir::visitor::{binding_names, walk_expr, walk_function, walk_stmt, Visitor};
use patty_ir::{
    ExprArena, ExprId, ExprKind, Function, FunctionBody, FunctionId, FunctionKind, Name, Stmt,
    StmtId, StmtKind, StmtRange, StringInterner, UnaryOp, VarKind,
};
use rustc_hash::FxHashSet;
use smallvec::{smallvec, SmallVec};

use crate::build::Builder;
use crate::context::Sink;

// ── Analysis ────────────────────────────────────────────────────────

/// Binding facts about one inline handler.
#[derive(Debug, Default)]
pub(crate) struct HandlerScan {
    /// Names visible at the top of the inlined block: parameters and
    /// top-level lexical declarations.
    pub top_level: FxHashSet<Name>,
    /// Every name bound anywhere in the handler outside nested functions.
    pub declared: FxHashSet<Name>,
    pub declares_var: bool,
    pub uses_this: bool,
    pub uses_arguments: bool,
}

impl HandlerScan {
    pub fn new(arena: &ExprArena, interner: &StringInterner, function: &Function) -> Self {
        let mut scan = BodyScan {
            facts: HandlerScan::default(),
            arguments: interner.intern("arguments"),
            in_nested_arrow: false,
        };

        let mut names = Vec::new();
        for param in arena.list(function.params) {
            binding_names(param.target, arena, &mut names);
        }
        if let FunctionBody::Block(body) = function.body {
            for &stmt in arena.list(body) {
                top_level_names(arena, stmt, &mut names);
            }
        }
        scan.facts.top_level.extend(names.iter().copied());
        scan.facts.declared.extend(names);

        walk_function_body(&mut scan, function, arena);
        scan.facts
    }

    /// Why `function` must be called rather than inlined, if it must.
    pub fn refusal(
        &self,
        arena: &ExprArena,
        function: &Function,
        sink_names: &[Name],
    ) -> Option<&'static str> {
        if function.is_async {
            return Some("async handler");
        }
        if function.is_generator {
            return Some("generator handler");
        }
        if arena
            .list(function.params)
            .iter()
            .any(|param| param.rest || param.default.is_some())
        {
            return Some("rest or default parameter");
        }
        if function.kind != FunctionKind::Arrow && (self.uses_this || self.uses_arguments) {
            return Some("uses its own `this` or `arguments`");
        }
        if self.declares_var {
            return Some("declares `var` bindings");
        }
        if sink_names.iter().any(|name| self.declared.contains(name)) {
            return Some("shadows a name in the output target");
        }
        None
    }
}

fn top_level_names(arena: &ExprArena, stmt: StmtId, out: &mut Vec<Name>) {
    match arena.stmt_kind(stmt) {
        StmtKind::VarDecl { kind, declarators } if kind != VarKind::Var => {
            for decl in arena.list(declarators) {
                binding_names(decl.target, arena, out);
            }
        }
        StmtKind::FunctionDecl(function) => out.extend(arena.get_function(function).name),
        _ => {}
    }
}

fn walk_function_body(scan: &mut BodyScan, function: &Function, arena: &ExprArena) {
    match function.body {
        FunctionBody::Expr(body) => scan.visit_expr(body, arena),
        FunctionBody::Block(body) => {
            for &stmt in arena.list(body) {
                scan.visit_stmt(stmt, arena);
            }
        }
    }
    for param in arena.list(function.params) {
        if let Some(default) = param.default {
            scan.visit_expr(default, arena);
        }
    }
}

struct BodyScan {
    facts: HandlerScan,
    arguments: Name,
    /// Inside an arrow nested in the handler: `this` still refers to the
    /// handler's, but bindings belong to the arrow.
    in_nested_arrow: bool,
}

impl Visitor for BodyScan {
    fn visit_expr(&mut self, id: ExprId, arena: &ExprArena) {
        match arena.expr_kind(id) {
            ExprKind::This => self.facts.uses_this = true,
            ExprKind::Ident(name) if name == self.arguments => self.facts.uses_arguments = true,
            _ => {}
        }
        walk_expr(self, id, arena);
    }

    fn visit_stmt(&mut self, id: StmtId, arena: &ExprArena) {
        if !self.in_nested_arrow {
            let mut names = Vec::new();
            match arena.stmt_kind(id) {
                StmtKind::VarDecl { kind, declarators } => {
                    self.facts.declares_var |= kind == VarKind::Var;
                    for decl in arena.list(declarators) {
                        binding_names(decl.target, arena, &mut names);
                    }
                }
                StmtKind::FunctionDecl(function) => {
                    names.extend(arena.get_function(function).name);
                }
                StmtKind::Try {
                    param: Some(param), ..
                } => binding_names(param, arena, &mut names),
                _ => {}
            }
            self.facts.declared.extend(names);
        }
        walk_stmt(self, id, arena);
    }

    fn visit_function(&mut self, id: FunctionId, arena: &ExprArena) {
        // A non-arrow function rebinds `this` and `arguments` and hoists
        // its own `var`s: nothing inside it matters here.
        if arena.get_function(id).kind == FunctionKind::Arrow {
            let outer = std::mem::replace(&mut self.in_nested_arrow, true);
            walk_function(self, id, arena);
            self.in_nested_arrow = outer;
        }
    }
}

/// `await` reachable without crossing a function boundary.
pub(crate) fn contains_await(arena: &ExprArena, expr: ExprId) -> bool {
    struct Await(bool);

    impl Visitor for Await {
        fn visit_expr(&mut self, id: ExprId, arena: &ExprArena) {
            if let ExprKind::Unary {
                op: UnaryOp::Await,
                ..
            } = arena.expr_kind(id)
            {
                self.0 = true;
            }
            walk_expr(self, id, arena);
        }

        fn visit_function(&mut self, _id: FunctionId, _arena: &ExprArena) {}
    }

    let mut scan = Await(false);
    scan.visit_expr(expr, arena);
    scan.0
}

/// Whether control can fall off the end of `stmts`. Conservative: `true`
/// unless the last statement certainly returns or throws.
pub(crate) fn can_complete(arena: &ExprArena, stmts: &[StmtId]) -> bool {
    stmts
        .last()
        .is_none_or(|&last| stmt_can_complete(arena, last))
}

fn stmt_can_complete(arena: &ExprArena, stmt: StmtId) -> bool {
    match arena.stmt_kind(stmt) {
        StmtKind::Return(_) | StmtKind::Throw(_) => false,
        StmtKind::Block(stmts) => can_complete(arena, arena.list(stmts)),
        StmtKind::If {
            then_branch,
            else_branch: Some(else_branch),
            ..
        } => stmt_can_complete(arena, then_branch) || stmt_can_complete(arena, else_branch),
        StmtKind::Try {
            block,
            handler,
            finalizer,
            ..
        } => {
            if finalizer.is_some_and(|f| !can_complete(arena, arena.list(f))) {
                return false;
            }
            can_complete(arena, arena.list(block))
                || handler.is_some_and(|h| can_complete(arena, arena.list(h)))
        }
        _ => true,
    }
}

// ── Return rewriting ────────────────────────────────────────────────

/// Rewrites `return` statements of an inlined body into sink exits.
///
/// Copy-on-write: unchanged statements are shared with the original
/// handler, changed ones are freshly allocated, so the original tree stays
/// intact if the expression is later abandoned. Nested functions are never
/// entered, since their returns are their own.
pub(crate) struct ReturnRewriter<'b, 'a> {
    pub b: &'b mut Builder<'a>,
    pub sink: Sink,
}

impl ReturnRewriter<'_, '_> {
    /// The rewritten list, or `None` when nothing changed.
    pub fn rewrite_list(&mut self, stmts: StmtRange) -> Option<Vec<StmtId>> {
        let original = self.b.arena.list(stmts).to_vec();
        let mut out: Option<Vec<StmtId>> = None;
        for (i, &stmt) in original.iter().enumerate() {
            match self.rewrite_stmt(stmt) {
                Some(replacement) => out
                    .get_or_insert_with(|| original[..i].to_vec())
                    .extend(replacement),
                None => {
                    if let Some(out) = &mut out {
                        out.push(stmt);
                    }
                }
            }
        }
        out
    }

    /// Rewrite a statement in single-statement position.
    fn rewrite_single(&mut self, stmt: StmtId) -> Option<StmtId> {
        let replacement = self.rewrite_stmt(stmt)?;
        Some(if let [only] = replacement[..] {
            only
        } else {
            self.b.block(replacement.into_vec())
        })
    }

    fn rewrite_stmt(&mut self, stmt: StmtId) -> Option<SmallVec<[StmtId; 2]>> {
        let span = self.b.arena.get_stmt(stmt).span;
        let kind = match self.b.arena.stmt_kind(stmt) {
            StmtKind::Return(value) => return Some(self.sink.exit(self.b, value)),
            StmtKind::Block(stmts) => {
                let stmts = self.rewrite_list(stmts)?;
                StmtKind::Block(self.b.arena.alloc_list(stmts))
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let new_then = self.rewrite_single(then_branch);
                let new_else = else_branch.and_then(|e| self.rewrite_single(e));
                if new_then.is_none() && new_else.is_none() {
                    return None;
                }
                StmtKind::If {
                    cond,
                    then_branch: new_then.unwrap_or(then_branch),
                    else_branch: new_else.or(else_branch),
                }
            }
            StmtKind::Labeled { label, body } => StmtKind::Labeled {
                label,
                body: self.rewrite_single(body)?,
            },
            StmtKind::While { cond, body } => StmtKind::While {
                cond,
                body: self.rewrite_single(body)?,
            },
            StmtKind::Try {
                block,
                param,
                handler,
                finalizer,
            } => {
                let new_block = self.rewrite_list(block);
                let new_handler = handler.and_then(|h| self.rewrite_list(h));
                let new_finalizer = finalizer.and_then(|f| self.rewrite_list(f));
                if new_block.is_none() && new_handler.is_none() && new_finalizer.is_none() {
                    return None;
                }
                StmtKind::Try {
                    block: new_block.map_or(block, |b| self.b.arena.alloc_list(b)),
                    param,
                    handler: new_handler.map(|h| self.b.arena.alloc_list(h)).or(handler),
                    finalizer: new_finalizer
                        .map(|f| self.b.arena.alloc_list(f))
                        .or(finalizer),
                }
            }
            StmtKind::Expr(_)
            | StmtKind::VarDecl { .. }
            | StmtKind::FunctionDecl(_)
            | StmtKind::Break(_)
            | StmtKind::Continue(_)
            | StmtKind::Throw(_)
            | StmtKind::Import { .. }
            | StmtKind::Empty => return None,
        };
        let stmt = self.b.arena.alloc_stmt(Stmt::new(kind, span));
        Some(smallvec![stmt])
    }
}
