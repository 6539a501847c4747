//! Import discovery and cleanup for the pattern module.
//!
//! ```text
//! import { match as m, P } from 'ts-pattern';   →  matcher `m`, patterns `P`
//! ```
//!
//! Only top-level named imports are considered. Default and namespace
//! imports (`import * as tsp`) do not bind a bare matcher name.

use patty_ir::visitor::{walk_expr, walk_stmts, Visitor};
use patty_ir::{
    ExprArena, ExprId, ImportKind, ImportSpecifier, Name, Program, Stmt, StmtId, StmtKind,
    StringInterner,
};

use crate::config::{PassConfig, PATTERN_MODULE};

/// Local names the pass compiles against.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ResolvedNames {
    pub matcher: Name,
    pub patterns: Option<Name>,
}

/// Names imported from the pattern module, if any.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Discovered {
    pub matcher: Option<Name>,
    pub patterns: Option<Name>,
}

pub fn discover(program: Program, arena: &ExprArena, interner: &StringInterner) -> Discovered {
    let mut found = Discovered::default();
    for spec in pattern_imports(program, arena, interner).flat_map(|(_, specs)| specs) {
        if spec.kind != ImportKind::Named {
            continue;
        }
        match interner.lookup(spec.imported) {
            "match" => {
                found.matcher.get_or_insert(spec.local);
            }
            "P" | "Pattern" => {
                found.patterns.get_or_insert(spec.local);
            }
            _ => {}
        }
    }
    found
}

/// Names for this file, or `None` when discovery is on and the file never
/// imports the matcher.
pub fn resolve(
    program: Program,
    arena: &ExprArena,
    interner: &StringInterner,
    config: &PassConfig,
) -> Option<ResolvedNames> {
    if !config.discover_imports {
        return Some(ResolvedNames {
            matcher: interner.intern(&config.bindings.matcher),
            patterns: config.bindings.patterns.as_deref().map(|p| interner.intern(p)),
        });
    }
    let found = discover(program, arena, interner);
    tracing::debug!(?found, "import discovery");
    Some(ResolvedNames {
        matcher: found.matcher?,
        patterns: found.patterns,
    })
}

/// Remove the matcher's import specifier if no expression still refers to
/// it. An import left without specifiers is removed too. Returns whether
/// anything was removed.
pub fn strip_matcher_import(
    program: &mut Program,
    arena: &mut ExprArena,
    interner: &StringInterner,
    matcher: Name,
) -> bool {
    let mut uses = NameUse {
        name: matcher,
        found: false,
    };
    walk_stmts(&mut uses, program.body, arena);
    if uses.found {
        tracing::debug!("matcher still referenced; import kept");
        return false;
    }

    let imports: Vec<(StmtId, Vec<ImportSpecifier>)> = pattern_imports(*program, arena, interner)
        .map(|(stmt, specs)| (stmt, specs.to_vec()))
        .collect();
    let mut changed = false;
    let mut removed = Vec::new();
    for (stmt, specs) in imports {
        let kept: Vec<ImportSpecifier> = specs
            .iter()
            .copied()
            .filter(|spec| !(spec.kind == ImportKind::Named && spec.local == matcher))
            .collect();
        if kept.len() == specs.len() {
            continue;
        }
        changed = true;
        if kept.is_empty() {
            removed.push(stmt);
            continue;
        }
        let old = *arena.get_stmt(stmt);
        if let StmtKind::Import { source, .. } = old.kind {
            let specifiers = arena.alloc_list(kept);
            arena.set_stmt(
                stmt,
                Stmt::new(StmtKind::Import { specifiers, source }, old.span),
            );
        }
    }

    if !removed.is_empty() {
        let body: Vec<StmtId> = arena
            .list(program.body)
            .iter()
            .copied()
            .filter(|stmt| !removed.contains(stmt))
            .collect();
        program.body = arena.alloc_list(body);
    }
    changed
}

/// Top-level imports from the pattern module with their specifiers.
fn pattern_imports<'a>(
    program: Program,
    arena: &'a ExprArena,
    interner: &'a StringInterner,
) -> impl Iterator<Item = (StmtId, &'a [ImportSpecifier])> + 'a {
    arena
        .list(program.body)
        .iter()
        .filter_map(move |&stmt| match arena.stmt_kind(stmt) {
            StmtKind::Import { specifiers, source }
                if interner.lookup(source) == PATTERN_MODULE =>
            {
                Some((stmt, arena.list(specifiers)))
            }
            _ => None,
        })
}

/// Finds any identifier expression with the given name.
struct NameUse {
    name: Name,
    found: bool,
}

impl Visitor for NameUse {
    fn visit_expr(&mut self, id: ExprId, arena: &ExprArena) {
        if self.found {
            return;
        }
        if arena.ident_name(id) == Some(self.name) {
            self.found = true;
            return;
        }
        walk_expr(self, id, arena);
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
