//! Intermediate representation for the pattycake compiler.
//!
//! Two layers live here:
//!
//! - The host-program syntax tree: arena-allocated expressions and
//!   statements addressed by [`ExprId`]/[`StmtId`], with list children stored
//!   as [`ListRange`] slices into flat side tables.
//! - The match IR ([`matching`]): what one recognized `match(..).with(..)`
//!   chain lowers to before code generation.
//!
//! # Design
//!
//! Nodes are `Copy` and small. Children are indices, never boxes, so a
//! rewrite pass can replace a node in place (`ExprArena::set_expr`) or
//! allocate a fresh list without touching the rest of the tree.
//!
//! # Prior Art
//!
//! - rustc `rustc_ast` / `la_arena`: index-based arenas
//! - oxc / swc: flat ECMAScript syntax trees with spans on every node

mod arena;
mod ast;
mod ids;
mod interner;
pub mod matching;
mod name;
mod span;
pub mod visitor;

pub use arena::{ExprArena, ListItem};
pub use ast::{
    AssignOp, BinaryOp, BindingElem, BindingKind, BindingPattern, BindingProp, Declarator, Expr,
    ExprKind, Function, FunctionBody, FunctionKind, ImportKind, ImportSpecifier, Param, Program,
    Prop, PropKey, PropKind, Stmt, StmtKind, UnaryOp, VarKind,
};
pub use ids::{
    BindingElemRange, BindingId, BindingPropRange, DeclRange, ExprId, ExprRange, FunctionId,
    ListRange, ParamRange, PropRange, SpecifierRange, StmtId, StmtRange,
};
pub use interner::{InternError, StringInterner};
pub use name::Name;
pub use span::{Span, SpanError};
