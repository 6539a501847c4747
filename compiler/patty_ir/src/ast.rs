//! Host-program syntax tree.
//!
//! Covers the ECMAScript subset the pass reads and writes. All node kinds
//! are `Copy`; children are arena indices (see [`crate::ExprArena`]).

use crate::ids::{
    BindingElemRange, BindingId, BindingPropRange, DeclRange, ExprId, ExprRange, FunctionId,
    ParamRange, PropRange, SpecifierRange, StmtId, StmtRange,
};
use crate::{Name, Span};

// ── Operators ───────────────────────────────────────────────────────

/// Binary and logical operators.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
    LooseEq,
    LooseNotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    UShr,
    In,
    InstanceOf,
    And,
    Or,
    Nullish,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Exp => "**",
            BinaryOp::LooseEq => "==",
            BinaryOp::LooseNotEq => "!=",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNotEq => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::UShr => ">>>",
            BinaryOp::In => "in",
            BinaryOp::InstanceOf => "instanceof",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Nullish => "??",
        }
    }

    /// Binding power, higher binds tighter. Matches ECMAScript precedence.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Nullish => 3,
            BinaryOp::Or => 4,
            BinaryOp::And => 5,
            BinaryOp::BitOr => 6,
            BinaryOp::BitXor => 7,
            BinaryOp::BitAnd => 8,
            BinaryOp::LooseEq
            | BinaryOp::LooseNotEq
            | BinaryOp::StrictEq
            | BinaryOp::StrictNotEq => 9,
            BinaryOp::Lt
            | BinaryOp::LtEq
            | BinaryOp::Gt
            | BinaryOp::GtEq
            | BinaryOp::In
            | BinaryOp::InstanceOf => 10,
            BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr => 11,
            BinaryOp::Add | BinaryOp::Sub => 12,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 13,
            BinaryOp::Exp => 14,
        }
    }

    /// `**` is the only right-associative binary operator.
    pub fn is_right_assoc(self) -> bool {
        matches!(self, BinaryOp::Exp)
    }

    /// Short-circuiting operators.
    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or | BinaryOp::Nullish)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    Neg,
    Plus,
    BitNot,
    TypeOf,
    Void,
    Delete,
    Await,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::BitNot => "~",
            UnaryOp::TypeOf => "typeof",
            UnaryOp::Void => "void",
            UnaryOp::Delete => "delete",
            UnaryOp::Await => "await",
        }
    }

    /// Keyword operators need a space before their operand.
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            UnaryOp::TypeOf | UnaryOp::Void | UnaryOp::Delete | UnaryOp::Await
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    Nullish,
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Mod => "%=",
            AssignOp::And => "&&=",
            AssignOp::Or => "||=",
            AssignOp::Nullish => "??=",
        }
    }

    /// The binary operator a compound assignment applies, if any.
    pub fn binary(self) -> Option<BinaryOp> {
        match self {
            AssignOp::Assign => None,
            AssignOp::Add => Some(BinaryOp::Add),
            AssignOp::Sub => Some(BinaryOp::Sub),
            AssignOp::Mul => Some(BinaryOp::Mul),
            AssignOp::Div => Some(BinaryOp::Div),
            AssignOp::Mod => Some(BinaryOp::Mod),
            AssignOp::And => Some(BinaryOp::And),
            AssignOp::Or => Some(BinaryOp::Or),
            AssignOp::Nullish => Some(BinaryOp::Nullish),
        }
    }
}

// ── Expressions ─────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    #[inline]
    pub const fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ExprKind {
    Ident(Name),
    /// String literal, cooked contents.
    Str(Name),
    /// Number literal stored as `f64` bits so the kind stays `Eq`-friendly.
    Num(u64),
    /// `BigInt` literal digits without the `n` suffix.
    BigInt(Name),
    Bool(bool),
    Null,
    This,
    /// Template literal. `quasis` are `Str` nodes, one more than `exprs`.
    Template {
        quasis: ExprRange,
        exprs: ExprRange,
    },
    Array(ExprRange),
    Object(PropRange),
    Function(FunctionId),
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    Conditional {
        cond: ExprId,
        then_expr: ExprId,
        else_expr: ExprId,
    },
    Assign {
        op: AssignOp,
        target: ExprId,
        value: ExprId,
    },
    Member {
        object: ExprId,
        property: Name,
        optional: bool,
    },
    Index {
        object: ExprId,
        index: ExprId,
        optional: bool,
    },
    Call {
        callee: ExprId,
        args: ExprRange,
        optional: bool,
    },
    New {
        callee: ExprId,
        args: ExprRange,
    },
    Spread(ExprId),
}

impl ExprKind {
    #[inline]
    pub fn num(value: f64) -> Self {
        ExprKind::Num(value.to_bits())
    }

    /// The number literal's value, for `Num` nodes.
    pub fn as_num(&self) -> Option<f64> {
        match self {
            ExprKind::Num(bits) => Some(f64::from_bits(*bits)),
            _ => None,
        }
    }

    /// Human-readable kind name, used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            ExprKind::Ident(_) => "identifier",
            ExprKind::Str(_) => "string literal",
            ExprKind::Num(_) => "number literal",
            ExprKind::BigInt(_) => "bigint literal",
            ExprKind::Bool(_) => "boolean literal",
            ExprKind::Null => "null",
            ExprKind::This => "this",
            ExprKind::Template { .. } => "template literal",
            ExprKind::Array(_) => "array literal",
            ExprKind::Object(_) => "object literal",
            ExprKind::Function(_) => "function",
            ExprKind::Unary { .. } => "unary expression",
            ExprKind::Binary { .. } => "binary expression",
            ExprKind::Conditional { .. } => "conditional expression",
            ExprKind::Assign { .. } => "assignment",
            ExprKind::Member { .. } => "member access",
            ExprKind::Index { .. } => "index access",
            ExprKind::Call { .. } => "call expression",
            ExprKind::New { .. } => "new expression",
            ExprKind::Spread(_) => "spread element",
        }
    }
}

/// Object literal property.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Prop {
    pub kind: PropKind,
    pub span: Span,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PropKind {
    /// `key: value`, or `key` alone when `shorthand`.
    Init {
        key: PropKey,
        value: ExprId,
        shorthand: bool,
    },
    Spread(ExprId),
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PropKey {
    Ident(Name),
    Str(Name),
    Num(u64),
    Computed(ExprId),
}

// ── Functions and bindings ──────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    Arrow,
    Expression,
    Declaration,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FunctionBody {
    /// Arrow function concise body.
    Expr(ExprId),
    Block(StmtRange),
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Function {
    pub kind: FunctionKind,
    pub name: Option<Name>,
    pub params: ParamRange,
    pub body: FunctionBody,
    pub is_async: bool,
    pub is_generator: bool,
    pub span: Span,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Param {
    pub target: BindingId,
    pub default: Option<ExprId>,
    pub rest: bool,
    pub span: Span,
}

/// Binding target of a declaration, parameter or catch clause.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BindingPattern {
    pub kind: BindingKind,
    pub span: Span,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum BindingKind {
    Ident(Name),
    Array(BindingElemRange),
    Object(BindingPropRange),
}

/// Array destructuring element. `target: None` is a hole.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BindingElem {
    pub target: Option<BindingId>,
    pub default: Option<ExprId>,
    pub rest: bool,
}

/// Object destructuring property. For `...rest` the key is ignored.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BindingProp {
    pub key: PropKey,
    pub value: BindingId,
    pub default: Option<ExprId>,
    pub shorthand: bool,
    pub rest: bool,
}

// ── Statements ──────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    #[inline]
    pub const fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

impl VarKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VarKind::Var => "var",
            VarKind::Let => "let",
            VarKind::Const => "const",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Declarator {
    pub target: BindingId,
    pub init: Option<ExprId>,
    pub span: Span,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ImportKind {
    /// `{ imported as local }`
    Named,
    /// `local` (default export)
    Default,
    /// `* as local`
    Namespace,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ImportSpecifier {
    pub kind: ImportKind,
    pub imported: Name,
    pub local: Name,
    pub span: Span,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum StmtKind {
    Expr(ExprId),
    VarDecl {
        kind: VarKind,
        declarators: DeclRange,
    },
    FunctionDecl(FunctionId),
    Return(Option<ExprId>),
    If {
        cond: ExprId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
    },
    Block(StmtRange),
    Labeled {
        label: Name,
        body: StmtId,
    },
    Break(Option<Name>),
    Continue(Option<Name>),
    Throw(ExprId),
    Try {
        block: StmtRange,
        param: Option<BindingId>,
        handler: Option<StmtRange>,
        finalizer: Option<StmtRange>,
    },
    While {
        cond: ExprId,
        body: StmtId,
    },
    Import {
        specifiers: SpecifierRange,
        source: Name,
    },
    Empty,
}

/// A parsed source file.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Program {
    pub body: StmtRange,
}
