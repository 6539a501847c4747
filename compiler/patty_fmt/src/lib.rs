//! Source printer for the pattycake syntax tree.
//!
//! Renders a [`Program`] (or a single expression) back to ECMAScript text.
//! Output is deterministic: the same tree always prints the same text, and
//! printing the re-parsed output yields that text again.
//!
//! # Layout
//!
//! - Two-space indentation, one statement per line.
//! - Single-quoted strings.
//! - Object and array literals print on one line.
//! - Parentheses are derived from precedence ([`parens`]), plus the
//!   positions where the grammar needs them regardless: immediately
//!   invoked function callees, and expressions beginning with `{` or
//!   `function` at statement start or in an arrow body.

pub mod emitter;
mod literals;
pub mod parens;
mod printer;

pub use emitter::{Emitter, StringEmitter, INDENT_WIDTH};
pub use literals::{format_number, quote_str};
pub use printer::Printer;

use patty_ir::{ExprArena, ExprId, Program, StmtRange, StringInterner};

/// Print a whole program.
pub fn print_program(program: Program, arena: &ExprArena, interner: &StringInterner) -> String {
    let mut printer = Printer::new(arena, interner);
    printer.print_program(program);
    printer.into_emitter().output()
}

/// Print a statement list at indent level zero.
pub fn print_stmts(stmts: StmtRange, arena: &ExprArena, interner: &StringInterner) -> String {
    let mut printer = Printer::new(arena, interner);
    printer.print_stmt_list(stmts);
    printer.into_emitter().output()
}

/// Print one expression.
pub fn print_expr(expr: ExprId, arena: &ExprArena, interner: &StringInterner) -> String {
    let mut printer = Printer::new(arena, interner);
    printer.print_expr(expr, 0);
    printer.into_emitter().output()
}
