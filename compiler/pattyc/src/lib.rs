//! The pattycake compiler driver.
//!
//! Runs the match-expression pass over whole files:
//!
//! ```text
//! source ─► patty_parse ─► Program ─► transform_program ─► patty_fmt ─► code
//!                                        │
//!                     per call: recognize → lower → generate → splice
//! ```
//!
//! # Fail-soft
//!
//! Every candidate expression is compiled independently. A lowering or
//! codegen failure queues a warning and leaves that expression as written,
//! so a file with one unsupported pattern still compiles everything else.
//! Only a parse failure (or I/O) fails the file.

pub mod cli;
mod config;
mod error;
pub mod imports;
mod pass;
pub mod tracing_setup;

use std::path::Path;

pub use config::{MatcherBindings, PassConfig, PATTERN_MODULE};
pub use error::DriverError;

use patty_diagnostic::{Diagnostic, DiagnosticQueue};
use patty_ir::{ExprArena, Program, StringInterner};
use patty_parse::ParseOutput;

use crate::pass::Pass;

/// Result of compiling one source file.
#[derive(Clone, Debug)]
pub struct CompileOutput {
    pub code: String,
    /// Warnings for expressions that were left uncompiled, in source order.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of match expressions replaced.
    pub rewritten: usize,
}

/// Parse, transform and print one file.
pub fn compile_source(source: &str, config: &PassConfig) -> Result<CompileOutput, DriverError> {
    let interner = StringInterner::new();
    let ParseOutput {
        mut program,
        mut arena,
    } = patty_parse::parse(source, &interner)?;
    let mut queue = DiagnosticQueue::new().with_source(source);
    let rewritten = transform_program(&mut program, &mut arena, &interner, config, &mut queue);
    Ok(CompileOutput {
        code: patty_fmt::print_program(program, &arena, &interner),
        diagnostics: queue.flush(),
        rewritten,
    })
}

/// Read a source file for [`compile_source`]. `-` reads standard input.
pub fn read_source(path: &Path) -> Result<String, DriverError> {
    if path == Path::new("-") {
        return std::io::read_to_string(std::io::stdin())
            .map_err(|err| DriverError::read(path, err));
    }
    std::fs::read_to_string(path).map_err(|err| DriverError::read(path, err))
}

/// Run the pass over a parsed program and return how many match
/// expressions were replaced.
///
/// With import discovery on, a program that never imports the matcher is
/// returned unchanged and nothing is reported.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(statements = program.body.len(), rewritten = tracing::field::Empty)
)]
pub fn transform_program(
    program: &mut Program,
    arena: &mut ExprArena,
    interner: &StringInterner,
    config: &PassConfig,
    queue: &mut DiagnosticQueue,
) -> usize {
    let Some(names) = imports::resolve(*program, arena, interner, config) else {
        tracing::debug!("no matcher import; file left untouched");
        return 0;
    };

    let rewritten = {
        let mut pass = Pass::new(arena, interner, config, queue, names);
        program.body = pass.stmt_list(program.body);
        pass.rewritten
    };
    tracing::Span::current().record("rewritten", rewritten);

    if config.strip_import && rewritten > 0 {
        let stripped = imports::strip_matcher_import(program, arena, interner, names.matcher);
        tracing::debug!(stripped, "matcher import");
    }
    rewritten
}
