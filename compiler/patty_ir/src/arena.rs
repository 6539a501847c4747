//! Arena storage for the syntax tree.

use crate::ast::{
    BindingElem, BindingKind, BindingPattern, BindingProp, Declarator, Expr, ExprKind, Function,
    ImportSpecifier, Param, Prop, Stmt, StmtKind,
};
use crate::ids::{BindingId, ExprId, FunctionId, ListRange, StmtId};
use crate::{Name, Span};

#[inline]
fn to_u32(n: usize, table: &str) -> u32 {
    u32::try_from(n).unwrap_or_else(|_| panic!("{table} table exceeded u32::MAX entries"))
}

/// Element types that have a list table in [`ExprArena`].
pub trait ListItem: Copy + Sized {
    #[doc(hidden)]
    fn table(arena: &ExprArena) -> &[Self];
    #[doc(hidden)]
    fn table_mut(arena: &mut ExprArena) -> &mut Vec<Self>;
}

macro_rules! list_table {
    ($ty:ty, $field:ident) => {
        impl ListItem for $ty {
            #[inline]
            fn table(arena: &ExprArena) -> &[Self] {
                &arena.$field
            }
            #[inline]
            fn table_mut(arena: &mut ExprArena) -> &mut Vec<Self> {
                &mut arena.$field
            }
        }
    };
}

list_table!(ExprId, expr_lists);
list_table!(StmtId, stmt_lists);
list_table!(Prop, props);
list_table!(Param, params);
list_table!(Declarator, declarators);
list_table!(ImportSpecifier, specifiers);
list_table!(BindingElem, binding_elems);
list_table!(BindingProp, binding_props);

/// Owns every node of one program, plus nodes synthesized by later passes.
///
/// Nodes are never freed. Rewrites either overwrite a node in place or
/// allocate a replacement list and point the parent at it.
#[derive(Clone, Debug, Default)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
    functions: Vec<Function>,
    bindings: Vec<BindingPattern>,
    expr_lists: Vec<ExprId>,
    stmt_lists: Vec<StmtId>,
    props: Vec<Prop>,
    params: Vec<Param>,
    declarators: Vec<Declarator>,
    specifiers: Vec<ImportSpecifier>,
    binding_elems: Vec<BindingElem>,
    binding_props: Vec<BindingProp>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Expressions ─────────────────────────────────────────────────

    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(to_u32(self.exprs.len(), "expression"));
        self.exprs.push(expr);
        id
    }

    #[inline]
    pub fn alloc(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.alloc_expr(Expr::new(kind, span))
    }

    #[inline]
    pub fn get_expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn expr_kind(&self, id: ExprId) -> ExprKind {
        self.exprs[id.index()].kind
    }

    #[inline]
    pub fn expr_span(&self, id: ExprId) -> Span {
        self.exprs[id.index()].span
    }

    /// Replace an expression in place. Every parent pointing at `id` sees
    /// the new node.
    pub fn set_expr(&mut self, id: ExprId, expr: Expr) {
        self.exprs[id.index()] = expr;
    }

    /// The identifier name, if `id` is a bare identifier.
    pub fn ident_name(&self, id: ExprId) -> Option<Name> {
        match self.expr_kind(id) {
            ExprKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    // ── Statements ──────────────────────────────────────────────────

    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId::new(to_u32(self.stmts.len(), "statement"));
        self.stmts.push(stmt);
        id
    }

    #[inline]
    pub fn alloc_stmt_kind(&mut self, kind: StmtKind, span: Span) -> StmtId {
        self.alloc_stmt(Stmt::new(kind, span))
    }

    #[inline]
    pub fn get_stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    #[inline]
    pub fn stmt_kind(&self, id: StmtId) -> StmtKind {
        self.stmts[id.index()].kind
    }

    pub fn set_stmt(&mut self, id: StmtId, stmt: Stmt) {
        self.stmts[id.index()] = stmt;
    }

    // ── Functions and bindings ──────────────────────────────────────

    pub fn alloc_function(&mut self, function: Function) -> FunctionId {
        let id = FunctionId::new(to_u32(self.functions.len(), "function"));
        self.functions.push(function);
        id
    }

    #[inline]
    pub fn get_function(&self, id: FunctionId) -> &Function {
        &self.functions[id.index()]
    }

    pub fn set_function(&mut self, id: FunctionId, function: Function) {
        self.functions[id.index()] = function;
    }

    pub fn alloc_binding(&mut self, binding: BindingPattern) -> BindingId {
        let id = BindingId::new(to_u32(self.bindings.len(), "binding"));
        self.bindings.push(binding);
        id
    }

    #[inline]
    pub fn alloc_binding_ident(&mut self, name: Name, span: Span) -> BindingId {
        self.alloc_binding(BindingPattern {
            kind: BindingKind::Ident(name),
            span,
        })
    }

    #[inline]
    pub fn get_binding(&self, id: BindingId) -> &BindingPattern {
        &self.bindings[id.index()]
    }

    // ── Lists ───────────────────────────────────────────────────────

    /// Allocate a list, returning its range.
    ///
    /// Items are appended contiguously, so the iterator must not itself
    /// allocate into the same table. Collect first when building lists
    /// recursively.
    pub fn alloc_list<T: ListItem>(&mut self, items: impl IntoIterator<Item = T>) -> ListRange<T> {
        let table = T::table_mut(self);
        let start = table.len();
        table.extend(items);
        let len = table.len() - start;
        ListRange::new(to_u32(start, "list"), to_u32(len, "list"))
    }

    #[inline]
    pub fn list<T: ListItem>(&self, range: ListRange<T>) -> &[T] {
        &T::table(self)[range.as_range()]
    }

    /// Overwrite one element of an allocated list.
    pub fn set_list_item<T: ListItem>(&mut self, range: ListRange<T>, index: usize, item: T) {
        let start = range.start as usize;
        if index < range.len() {
            T::table_mut(self)[start + index] = item;
        }
    }
}
