//! Match IR to replacement code.

use patty_ir::matching::{Branch, Handler, MatchIr};
use patty_ir::{
    BinaryOp, ExprArena, ExprId, ExprKind, FunctionBody, FunctionId, Name, StmtId,
    StringInterner, VarKind,
};
use smallvec::SmallVec;

use crate::build::Builder;
use crate::context::{FreshNames, OutputContext, Sink, SinkTarget};
use crate::cost::{CostModel, IdentOnly};
use crate::inline::{can_complete, contains_await, HandlerScan, ReturnRewriter};
use crate::pattern::Captures;
use crate::{CodegenError, CodegenOptions};

/// Replacement for a match expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Generated {
    /// Takes the place of the call expression.
    Expr(ExprId),
    /// Takes the place of the enclosing statement.
    Stmts(Vec<StmtId>),
}

/// Code generator over one program's arena.
pub struct Codegen<'a> {
    arena: &'a mut ExprArena,
    interner: &'a StringInterner,
    options: CodegenOptions,
    cost: &'a dyn CostModel,
}

impl<'a> Codegen<'a> {
    pub fn new(
        arena: &'a mut ExprArena,
        interner: &'a StringInterner,
        options: CodegenOptions,
    ) -> Self {
        Codegen {
            arena,
            interner,
            options,
            cost: &IdentOnly,
        }
    }

    #[must_use]
    pub fn with_cost_model(mut self, cost: &'a dyn CostModel) -> Self {
        self.cost = cost;
        self
    }

    pub fn arena(&self) -> &ExprArena {
        self.arena
    }

    /// Generate the replacement for `ir` in `context`.
    ///
    /// `ordinal` scopes the fresh names (`__patty_<ordinal>_<n>`); give
    /// every match expression in a file a distinct one. Existing nodes are
    /// never modified, so on `Err` the program is unchanged apart from
    /// unreachable arena garbage.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(ordinal, context = context.describe(), branches = ir.branches.len())
    )]
    pub fn generate(
        &mut self,
        ir: &MatchIr,
        context: OutputContext,
        ordinal: u32,
    ) -> Result<Generated, CodegenError> {
        self.check_handlers(ir)?;
        if context == OutputContext::Iife {
            self.check_await(ir)?;
        }

        let mut names = FreshNames::new(ordinal);
        let (target, temp) = match context {
            OutputContext::Iife => (None, None),
            OutputContext::VarDecl {
                kind: VarKind::Const,
                ..
            }
            | OutputContext::PatternVarDecl { .. } => {
                let temp = names.next(self.interner);
                (Some(SinkTarget::Name(temp)), Some(temp))
            }
            OutputContext::VarDecl { name, .. } => (Some(SinkTarget::Name(name)), None),
            OutputContext::Assignment { target } => (Some(SinkTarget::Expr(target)), None),
        };
        let sink = match target {
            None => Sink::Return,
            Some(target) => Sink::Assign {
                target,
                label: names.next(self.interner),
            },
        };

        // Handler plans first: a parameter shadowing the subject forces
        // the subject into a fresh binding.
        let sink_names = sink.target_names(self.arena);
        let mut shadowed = Vec::new();
        let plans: Vec<Invoke> = ir
            .branches
            .iter()
            .map(|branch| self.plan(branch.handler, &sink_names, &mut shadowed))
            .collect();
        let fallback = ir
            .fallback
            .map(|handler| self.plan(handler, &sink_names, &mut shadowed));

        let subject_name = self.arena.ident_name(ir.subject);
        let cached = !self.cost.is_inexpensive(self.arena, ir.subject)
            || subject_name.is_some_and(|name| shadowed.contains(&name));
        let cache = cached.then(|| names.next(self.interner));
        tracing::debug!(cached, sink = ?sink, "subject");

        let mut emit = MatchGen {
            b: Builder {
                arena: &mut *self.arena,
                interner: self.interner,
                span: ir.span,
            },
            null_safe: self.options.null_safe,
            sink,
            subject: ir.subject,
        };
        if let Some(cache) = cache {
            emit.subject = emit.b.ident(cache);
        }

        let mut body = Vec::with_capacity(ir.branches.len() + 3);
        if let Some(cache) = cache.filter(|_| context.is_statement()) {
            let target = emit.b.binding(cache);
            body.push(emit.b.declare(VarKind::Const, target, Some(ir.subject)));
        }

        let mut unconditional = false;
        for (branch, plan) in ir.branches.iter().zip(&plans) {
            let (test, block) = emit.branch(branch, *plan)?;
            match test {
                Some(test) => body.push(emit.b.if_stmt(test, block)),
                None => {
                    // Later branches and the no-match path are unreachable.
                    body.push(block);
                    unconditional = true;
                    break;
                }
            }
        }

        if !unconditional {
            match fallback {
                Some(plan) => body.push(emit.invoke(plan, None)),
                None if ir.exhaustive => {}
                None => emit.no_match(&mut names, &mut body),
            }
        }

        Ok(emit.wrap(context, body, cache.map(|c| (c, ir.subject)), temp))
    }

    /// Reject handlers that cannot possibly be called.
    fn check_handlers(&self, ir: &MatchIr) -> Result<(), CodegenError> {
        let handlers = ir.branches.iter().map(|b| b.handler).chain(ir.fallback);
        for handler in handlers {
            let Handler::Callable(expr) = handler else {
                continue;
            };
            let kind = self.arena.expr_kind(expr);
            if matches!(
                kind,
                ExprKind::Str(_)
                    | ExprKind::Num(_)
                    | ExprKind::BigInt(_)
                    | ExprKind::Bool(_)
                    | ExprKind::Null
                    | ExprKind::Template { .. }
                    | ExprKind::Array(_)
                    | ExprKind::Object(_)
            ) {
                return Err(CodegenError::InvalidHandler {
                    kind: kind.describe(),
                    span: self.arena.expr_span(expr),
                });
            }
        }
        Ok(())
    }

    /// The arrow wrapper is not `async`; an `await` moved into it would
    /// not parse.
    fn check_await(&self, ir: &MatchIr) -> Result<(), CodegenError> {
        let exprs = ir.branches.iter().flat_map(|branch| {
            let handler = match branch.handler {
                Handler::Callable(expr) => Some(expr),
                Handler::Inline(_) => None,
            };
            branch.guard.into_iter().chain(handler)
        });
        let fallback = match ir.fallback {
            Some(Handler::Callable(expr)) => Some(expr),
            _ => None,
        };
        for expr in exprs.chain(fallback) {
            if contains_await(self.arena, expr) {
                return Err(CodegenError::unhostable(
                    "`await` inside a match used as a value",
                    self.arena.expr_span(expr),
                ));
            }
        }
        Ok(())
    }

    /// Decide between inlining and calling, and note which names an
    /// inlined handler binds at its top level.
    fn plan(&self, handler: Handler, sink_names: &[Name], shadowed: &mut Vec<Name>) -> Invoke {
        match handler {
            Handler::Callable(expr) => Invoke::Call(expr),
            Handler::Inline(id) => {
                let function = self.arena.get_function(id);
                let scan = HandlerScan::new(self.arena, self.interner, function);
                match scan.refusal(self.arena, function, sink_names) {
                    Some(reason) => {
                        tracing::debug!(reason, "handler called, not inlined");
                        Invoke::CallFunction(id)
                    }
                    None => {
                        shadowed.extend(scan.top_level);
                        Invoke::Inline(id)
                    }
                }
            }
        }
    }
}

/// How a branch runs its handler.
#[derive(Copy, Clone, Debug)]
pub(crate) enum Invoke {
    Inline(FunctionId),
    /// A function literal that cannot be inlined, called in place.
    CallFunction(FunctionId),
    Call(ExprId),
}

/// Per-expression generation state.
pub(crate) struct MatchGen<'g> {
    pub b: Builder<'g>,
    pub null_safe: bool,
    sink: Sink,
    /// What the tests read: the subject itself or its cached binding.
    subject: ExprId,
}

impl MatchGen<'_> {
    /// The branch test (`None` when it always holds) and the block to run.
    fn branch(
        &mut self,
        branch: &Branch,
        plan: Invoke,
    ) -> Result<(Option<ExprId>, StmtId), CodegenError> {
        let mut captures = Captures::default();
        let mut alternatives: SmallVec<[ExprId; 1]> = SmallVec::new();
        let mut always = false;
        for pattern in &branch.patterns {
            let mut conjuncts = Vec::new();
            self.conjuncts(self.subject, pattern, &mut conjuncts, &mut captures)?;
            match self.b.chain(BinaryOp::And, &conjuncts) {
                Some(test) => alternatives.push(test),
                None => always = true,
            }
        }
        let mut test = if always {
            None
        } else {
            self.b.chain(BinaryOp::Or, &alternatives)
        };
        if let Some(guard) = branch.guard {
            let check = self.b.call(guard, &[self.subject]);
            test = Some(match test {
                Some(test) => self.b.binary(BinaryOp::And, test, check),
                None => check,
            });
        }
        tracing::trace!(captures = captures.len(), guarded = branch.guard.is_some(), "branch");

        let selection = captures.value(&mut self.b);
        Ok((test, self.invoke(plan, selection)))
    }

    /// Block that runs the handler and exits through the sink.
    fn invoke(&mut self, plan: Invoke, selection: Option<ExprId>) -> StmtId {
        let callee = match plan {
            Invoke::Inline(id) => return self.inline(id, selection),
            Invoke::CallFunction(id) => self.b.literal(ExprKind::Function(id)),
            Invoke::Call(callee) => callee,
        };
        let value = match selection {
            Some(selection) => self.b.call(callee, &[selection, self.subject]),
            None => self.b.call(callee, &[self.subject]),
        };
        let exit = self.sink.exit(&mut self.b, Some(value));
        self.b.block(exit.into_vec())
    }

    /// Parameters become `let` bindings, the body follows, and every exit
    /// goes through the sink.
    fn inline(&mut self, id: FunctionId, selection: Option<ExprId>) -> StmtId {
        let function = *self.b.arena.get_function(id);
        let params = self.b.arena.list(function.params).to_vec();
        let mut stmts = Vec::with_capacity(params.len() + 2);

        for (position, param) in params.iter().enumerate() {
            let value = match (position, selection) {
                (0, Some(selection)) => Some(selection),
                (0 | 1, _) => Some(self.subject),
                _ => None,
            };
            let is_ident = matches!(
                self.b.arena.get_binding(param.target).kind,
                patty_ir::BindingKind::Ident(_)
            );
            // Destructuring needs an initializer; a missing argument is
            // `undefined`.
            let value = match value {
                None if !is_ident => Some(self.b.global("undefined")),
                value => value,
            };
            stmts.push(self.b.declare(VarKind::Let, param.target, value));
        }

        match function.body {
            FunctionBody::Expr(value) => stmts.extend(self.sink.exit(&mut self.b, Some(value))),
            FunctionBody::Block(body) => {
                // Judged on the handler as written: a rewritten `return`
                // ends in `break`, which reads as completing.
                let completes = can_complete(self.b.arena, self.b.arena.list(body));
                let rewritten = match self.sink {
                    Sink::Return => None,
                    Sink::Assign { .. } => ReturnRewriter {
                        b: &mut self.b,
                        sink: self.sink,
                    }
                    .rewrite_list(body),
                };
                let body = rewritten.unwrap_or_else(|| self.b.arena.list(body).to_vec());
                stmts.extend(body);
                if completes {
                    stmts.extend(self.sink.exit(&mut self.b, None));
                }
            }
        }
        tracing::trace!(params = params.len(), "handler inlined");
        self.b.block(stmts)
    }

    /// ```text
    /// let d;
    /// try { d = JSON.stringify(s); } catch (e) { d = s; }
    /// throw new Error(`Pattern matching error: no pattern matches value ${d}`);
    /// ```
    fn no_match(&mut self, names: &mut FreshNames, body: &mut Vec<StmtId>) {
        let shown = names.next(self.b.interner);
        let error = names.next(self.b.interner);

        body.push(self.b.let_name(shown, None));

        let stringify = self.b.global_member("JSON", "stringify");
        let json = self.b.call(stringify, &[self.subject]);
        let target = self.b.ident(shown);
        let assign = self.b.assign(target, json);
        let attempt = vec![self.b.expr_stmt(assign)];
        let target = self.b.ident(shown);
        let assign = self.b.assign(target, self.subject);
        let recover = vec![self.b.expr_stmt(assign)];
        body.push(self.b.try_catch(attempt, error, recover));

        let shown = self.b.ident(shown);
        let message = self.b.template(
            &["Pattern matching error: no pattern matches value ", ""],
            &[shown],
        );
        let error_ctor = self.b.global("Error");
        let error = self.b.new_expr(error_ctor, &[message]);
        body.push(self.b.throw(error));
    }

    /// Put the generated body in its context.
    fn wrap(
        mut self,
        context: OutputContext,
        body: Vec<StmtId>,
        cache: Option<(Name, ExprId)>,
        temp: Option<Name>,
    ) -> Generated {
        let label = match self.sink {
            Sink::Assign { label, .. } => label,
            Sink::Return => {
                let (params, args) = match cache {
                    Some((name, subject)) => (vec![name], vec![subject]),
                    None => (Vec::new(), Vec::new()),
                };
                let arrow = self.b.arrow(&params, body);
                return Generated::Expr(self.b.call(arrow, &args));
            }
        };

        let block = self.b.block(body);
        let labeled = self.b.labeled(label, block);
        let stmts = match (context, temp) {
            (OutputContext::VarDecl { kind, name }, None) => {
                let target = self.b.binding(name);
                vec![self.b.declare(kind, target, None), labeled]
            }
            (OutputContext::VarDecl { kind, name }, Some(temp)) => {
                let target = self.b.binding(name);
                self.rebind(temp, labeled, kind, target)
            }
            (OutputContext::PatternVarDecl { kind, target }, Some(temp)) => {
                self.rebind(temp, labeled, kind, target)
            }
            _ => vec![labeled],
        };
        Generated::Stmts(stmts)
    }

    /// `let temp; <labeled> kind target = temp;`
    fn rebind(
        &mut self,
        temp: Name,
        labeled: StmtId,
        kind: VarKind,
        target: patty_ir::BindingId,
    ) -> Vec<StmtId> {
        let declare_temp = self.b.let_name(temp, None);
        let value = self.b.ident(temp);
        let rebind = self.b.declare(kind, target, Some(value));
        vec![declare_temp, labeled, rebind]
    }
}
