//! Diagnostic queue: collects, deduplicates and sorts diagnostics.
//!
//! - Error limit to keep output readable
//! - Same-line dedup for parser errors
//! - `ErrorGuaranteed` proof that errors were emitted

use patty_ir::Span;

use crate::span_utils::LineOffsetTable;
use crate::{Diagnostic, ErrorCode, ErrorGuaranteed};

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors kept (0 = unlimited).
    pub error_limit: usize,
    /// Drop a parser error on the same line as the previous one.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 50,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// No limits; used by tests.
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
struct QueuedDiagnostic {
    diagnostic: Diagnostic,
    line: u32,
    column: u32,
}

/// Collected diagnostics for one file.
///
/// ```text
/// let mut queue = DiagnosticQueue::new();
/// queue.add(diagnostic, line, column);
/// let sorted = queue.flush();
/// ```
#[derive(Clone, Debug, Default)]
pub struct DiagnosticQueue {
    diagnostics: Vec<QueuedDiagnostic>,
    error_count: usize,
    warning_count: usize,
    last_syntax_line: Option<u32>,
    lines: Option<LineOffsetTable>,
    source: Option<String>,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            config,
            ..Self::default()
        }
    }

    /// Attach the source text so positions can be computed from spans.
    #[must_use]
    pub fn with_source(mut self, source: &str) -> Self {
        self.lines = Some(LineOffsetTable::build(source));
        self.source = Some(source.to_owned());
        self
    }

    /// Add a diagnostic at an explicit position.
    ///
    /// Returns `false` if it was filtered out.
    pub fn add(&mut self, diag: Diagnostic, line: u32, column: u32) -> bool {
        if diag.is_error() && self.limit_reached() {
            return false;
        }

        let syntax = diag.code.is_parser_error();
        if self.config.deduplicate && diag.is_error() && syntax {
            if self.last_syntax_line == Some(line) {
                return false;
            }
            self.last_syntax_line = Some(line);
        }

        if diag.is_error() {
            self.error_count += 1;
        } else if diag.is_warning() {
            self.warning_count += 1;
        }

        self.diagnostics.push(QueuedDiagnostic {
            diagnostic: diag,
            line,
            column,
        });
        true
    }

    /// Add a diagnostic, positioning it by its primary span.
    pub fn push(&mut self, diag: Diagnostic) -> bool {
        let (line, column) = self.position(&diag);
        self.add(diag, line, column)
    }

    /// Record an error and get proof it was recorded.
    pub fn emit_error(&mut self, diag: Diagnostic) -> ErrorGuaranteed {
        let diag = if diag.is_error() {
            diag
        } else {
            Diagnostic {
                severity: crate::Severity::Error,
                ..diag
            }
        };
        self.push(diag);
        ErrorGuaranteed::new()
    }

    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.error_count)
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Sorted by position; empties the queue.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.sort_by_key(|d| (d.line, d.column));
        let result = self.diagnostics.drain(..).map(|d| d.diagnostic).collect();
        self.error_count = 0;
        self.warning_count = 0;
        self.last_syntax_line = None;
        result
    }

    /// Diagnostics in insertion order, without clearing.
    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().map(|d| &d.diagnostic)
    }

    fn position(&self, diag: &Diagnostic) -> (u32, u32) {
        match (diag.primary_span(), &self.lines, &self.source) {
            (Some(span), Some(lines), Some(source)) => {
                lines.offset_to_line_col(source, span.start)
            }
            _ => (1, 1),
        }
    }
}

/// "Too many errors" diagnostic.
#[cold]
pub fn too_many_errors(limit: usize, span: Span) -> Diagnostic {
    Diagnostic::error(ErrorCode::E9002)
        .with_message(format!("aborting after {limit} errors"))
        .with_label(span, "error limit reached here")
}

#[cfg(test)]
mod tests;
