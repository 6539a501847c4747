//! Lowering Engine: flattened call list to [`MatchIr`].

use patty_ir::matching::{Branch, Handler, MatchIr, SelectBinding};
use patty_ir::{ExprArena, ExprId, ExprKind, Name, Span, StringInterner};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::flatten::{flatten_chain, operation_name};
use crate::LowerError;

/// Member names of the chain operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainNames {
    /// Registers a branch: `.with(pattern.., handler)`.
    pub clause: String,
    /// Terminal with a fallback handler: `.otherwise(handler)`.
    pub fallback: String,
    /// Terminal asserting some branch always matches.
    pub exhaustive: String,
    /// Terminal with neither: the no-match failure is kept.
    pub run: String,
}

impl Default for ChainNames {
    fn default() -> Self {
        ChainNames {
            clause: "with".to_owned(),
            fallback: "otherwise".to_owned(),
            exhaustive: "exhaustive".to_owned(),
            run: "run".to_owned(),
        }
    }
}

/// How a chain ends.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Terminal {
    Otherwise,
    Exhaustive,
    Run,
}

enum Operation {
    Clause,
    Terminal(Terminal),
    Unknown,
}

/// Names and tree a lowering reads. Built once per file.
pub struct LowerContext<'a> {
    pub arena: &'a ExprArena,
    pub interner: &'a StringInterner,
    /// Local name of the match-builder root function.
    pub matcher: Name,
    /// Local name of the pattern namespace, if imported.
    pub patterns: Option<Name>,
    pub chain: &'a ChainNames,
}

impl<'a> LowerContext<'a> {
    pub fn new(
        arena: &'a ExprArena,
        interner: &'a StringInterner,
        matcher: Name,
        patterns: Option<Name>,
        chain: &'a ChainNames,
    ) -> Self {
        LowerContext {
            arena,
            interner,
            matcher,
            patterns,
            chain,
        }
    }

    fn operation(&self, name: Name) -> Operation {
        let name = self.interner.lookup(name);
        if name == self.chain.clause {
            Operation::Clause
        } else if name == self.chain.fallback {
            Operation::Terminal(Terminal::Otherwise)
        } else if name == self.chain.exhaustive {
            Operation::Terminal(Terminal::Exhaustive)
        } else if name == self.chain.run {
            Operation::Terminal(Terminal::Run)
        } else {
            Operation::Unknown
        }
    }

    /// The flattened chain if `call` is a complete match expression: rooted
    /// at the matcher and ended by a terminal operation. Cheap and
    /// side-effect free on every other call.
    pub fn recognize(&self, call: ExprId) -> Option<Vec<ExprId>> {
        let calls = flatten_chain(self.arena, call, self.matcher)?;
        let last = *calls.get(1..)?.last()?;
        match self.operation(operation_name(self.arena, last)?) {
            Operation::Terminal(_) => Some(calls),
            Operation::Clause | Operation::Unknown => None,
        }
    }

    /// Lower a flattened chain (as returned by [`Self::recognize`]).
    #[tracing::instrument(level = "debug", skip_all, fields(calls = calls.len()))]
    pub fn lower_chain(&self, calls: &[ExprId]) -> Result<MatchIr, LowerError> {
        let (&root, rest) = calls
            .split_first()
            .ok_or_else(|| LowerError::malformed("empty chain", Span::DUMMY))?;
        let subject = self.lower_subject(root)?;

        let mut branches = Vec::with_capacity(rest.len().saturating_sub(1));
        let mut fallback = None;
        let mut exhaustive = false;

        for (i, &call) in rest.iter().enumerate() {
            let is_last = i + 1 == rest.len();
            let span = self.arena.expr_span(call);
            let name = operation_name(self.arena, call)
                .ok_or_else(|| LowerError::malformed("expected a method call", span))?;
            let args = self.call_args(call)?;

            match self.operation(name) {
                Operation::Clause => branches.push(self.lower_clause(&args, span)?),
                Operation::Terminal(terminal) => {
                    if !is_last {
                        return Err(LowerError::malformed(
                            format!("`.{}()` must end the chain", self.interner.lookup(name)),
                            span,
                        ));
                    }
                    match terminal {
                        Terminal::Otherwise => {
                            let [handler] = args[..] else {
                                return Err(LowerError::malformed(
                                    "the fallback takes exactly one handler",
                                    span,
                                ));
                            };
                            fallback = Some(self.handler(handler));
                        }
                        Terminal::Exhaustive | Terminal::Run => {
                            if !args.is_empty() {
                                return Err(LowerError::malformed(
                                    format!(
                                        "`.{}()` takes no arguments",
                                        self.interner.lookup(name)
                                    ),
                                    span,
                                ));
                            }
                            exhaustive = terminal == Terminal::Exhaustive;
                        }
                    }
                }
                Operation::Unknown => {
                    return Err(LowerError::UnrecognizedOperation {
                        name: self.interner.lookup(name).to_owned(),
                        span,
                    });
                }
            }
        }

        tracing::debug!(
            branches = branches.len(),
            has_fallback = fallback.is_some(),
            exhaustive,
            "lowered match expression"
        );
        Ok(MatchIr {
            subject,
            branches,
            fallback,
            exhaustive,
            span: calls
                .last()
                .map_or(Span::DUMMY, |&last| self.arena.expr_span(last)),
        })
    }

    fn lower_subject(&self, root: ExprId) -> Result<ExprId, LowerError> {
        let span = self.arena.expr_span(root);
        match self.call_args(root)?[..] {
            [subject] => Ok(subject),
            [] => Err(LowerError::SubjectNotValue {
                reason: "no subject given".to_owned(),
                span,
            }),
            _ => Err(LowerError::SubjectNotValue {
                reason: "expected exactly one subject".to_owned(),
                span,
            }),
        }
    }

    /// Arguments of a chain call. Spread arguments hide the argument shape,
    /// so they fail the whole expression.
    fn call_args(&self, call: ExprId) -> Result<SmallVec<[ExprId; 4]>, LowerError> {
        let ExprKind::Call { args, .. } = self.arena.expr_kind(call) else {
            return Err(LowerError::malformed(
                "expected a call",
                self.arena.expr_span(call),
            ));
        };
        let args = self.arena.list(args);
        for &arg in args {
            if let ExprKind::Spread(_) = self.arena.expr_kind(arg) {
                return Err(LowerError::Spread {
                    span: self.arena.expr_span(arg),
                });
            }
        }
        Ok(args.iter().copied().collect())
    }

    fn handler(&self, expr: ExprId) -> Handler {
        match self.arena.expr_kind(expr) {
            ExprKind::Function(function) => Handler::Inline(function),
            _ => Handler::Callable(expr),
        }
    }

    /// `(pattern, guard, handler)` when there are three arguments and the
    /// middle one is a function; otherwise every argument but the last is
    /// an alternative pattern.
    fn lower_clause(&self, args: &[ExprId], span: Span) -> Result<Branch, LowerError> {
        let Some((&handler, leading)) = args.split_last() else {
            return Err(LowerError::malformed(
                "a clause needs a pattern and a handler",
                span,
            ));
        };
        if leading.is_empty() {
            return Err(LowerError::malformed(
                "a clause needs a pattern and a handler",
                span,
            ));
        }

        let (pattern_args, guard) = match *leading {
            [_, guard]
                if matches!(self.arena.expr_kind(guard), ExprKind::Function(_)) =>
            {
                (&leading[..1], Some(guard))
            }
            _ => (leading, None),
        };

        let mut patterns = SmallVec::with_capacity(pattern_args.len());
        for &arg in pattern_args {
            patterns.push(self.lower_pattern(arg)?);
        }

        let branch = Branch {
            patterns,
            guard,
            handler: self.handler(handler),
            span,
        };
        check_supported(&branch)?;
        check_captures(&branch, self.interner)?;
        Ok(branch)
    }
}

/// Reject declared-but-uncompiled pattern kinds anywhere in the branch.
fn check_supported(branch: &Branch) -> Result<(), LowerError> {
    for pattern in &branch.patterns {
        if let Some(unsupported) = pattern.find_unsupported() {
            return Err(LowerError::UnsupportedKind {
                kind: format!("P.{}", unsupported.describe()),
                span: branch.span,
            });
        }
    }
    Ok(())
}

/// A branch's captures must be all anonymous (at most one) or all named
/// with distinct names, and only a single-pattern branch may capture.
fn check_captures(branch: &Branch, interner: &StringInterner) -> Result<(), LowerError> {
    let selections = branch.selections();
    let Some(first) = selections.first() else {
        return Ok(());
    };
    if branch.patterns.len() > 1 {
        return Err(LowerError::capture(
            "selections are not allowed in a clause with several alternative patterns",
            first.span,
        ));
    }

    let mut anonymous = 0usize;
    let mut names = FxHashSet::default();
    for select in &selections {
        match select.binding {
            SelectBinding::Anonymous => {
                anonymous += 1;
                if anonymous > 1 {
                    return Err(LowerError::capture(
                        "only one anonymous `select()` is allowed per clause",
                        select.span,
                    ));
                }
            }
            SelectBinding::Named(name) => {
                if !names.insert(name) {
                    return Err(LowerError::capture(
                        format!("selection `{}` appears twice", interner.lookup(name)),
                        select.span,
                    ));
                }
            }
        }
        if anonymous > 0 && !names.is_empty() {
            return Err(LowerError::capture(
                "anonymous and named selections cannot be mixed in one clause",
                select.span,
            ));
        }
    }
    Ok(())
}
