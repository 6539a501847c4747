//! Error codes for all compiler diagnostics.
//!
//! The first digit names the phase that raised it.

use std::fmt;

/// Error codes, `E####`:
/// - E0xxx: lexer
/// - E1xxx: parser
/// - E2xxx: match lowering
/// - E3xxx: match code generation
/// - E4xxx: evaluation
/// - E9xxx: internal
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lexer Errors (E0xxx)
    /// Unterminated string literal
    E0001,
    /// Unexpected character
    E0002,
    /// Invalid number literal
    E0003,
    /// Unterminated template literal
    E0004,
    /// Invalid escape sequence
    E0005,
    /// Unterminated block comment
    E0006,

    // Parser Errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected expression
    E1002,
    /// Unclosed delimiter
    E1003,
    /// Expected identifier
    E1004,
    /// Invalid assignment target
    E1005,
    /// Invalid binding pattern
    E1006,
    /// Unsupported syntax
    E1007,

    // Lowering Errors (E2xxx)
    /// Unrecognized chain operation
    E2001,
    /// Malformed clause arguments
    E2002,
    /// Unsupported pattern expression
    E2003,
    /// Unsupported pattern kind
    E2004,
    /// Invalid capture set
    E2005,
    /// Subject is not a value
    E2006,
    /// Spread argument in a match chain
    E2007,

    // Codegen Errors (E3xxx)
    /// Output context cannot host the generated code
    E3001,
    /// Handler can be neither inlined nor called
    E3002,

    // Evaluation Errors (E4xxx)
    /// Uncaught exception
    E4001,
    /// Type error at run time
    E4002,
    /// Reference to an unbound name
    E4003,
    /// Construct the evaluator does not support
    E4004,
    /// Call depth limit exceeded
    E4005,

    // Internal Errors (E9xxx)
    /// Internal compiler error
    E9001,
    /// Too many errors
    E9002,
    /// Source or output file could not be read or written
    E9003,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E0005 => "E0005",
            ErrorCode::E0006 => "E0006",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E4001 => "E4001",
            ErrorCode::E4002 => "E4002",
            ErrorCode::E4003 => "E4003",
            ErrorCode::E4004 => "E4004",
            ErrorCode::E4005 => "E4005",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
            ErrorCode::E9003 => "E9003",
        }
    }

    /// One-line description, used by `--explain`-style listings.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "unterminated string literal",
            ErrorCode::E0002 => "unexpected character",
            ErrorCode::E0003 => "invalid number literal",
            ErrorCode::E0004 => "unterminated template literal",
            ErrorCode::E0005 => "invalid escape sequence",
            ErrorCode::E0006 => "unterminated block comment",
            ErrorCode::E1001 => "unexpected token",
            ErrorCode::E1002 => "expected expression",
            ErrorCode::E1003 => "unclosed delimiter",
            ErrorCode::E1004 => "expected identifier",
            ErrorCode::E1005 => "invalid assignment target",
            ErrorCode::E1006 => "invalid binding pattern",
            ErrorCode::E1007 => "unsupported syntax",
            ErrorCode::E2001 => "unrecognized chain operation",
            ErrorCode::E2002 => "malformed clause arguments",
            ErrorCode::E2003 => "unsupported pattern expression",
            ErrorCode::E2004 => "unsupported pattern kind",
            ErrorCode::E2005 => "invalid capture set",
            ErrorCode::E2006 => "match subject is not a value",
            ErrorCode::E2007 => "spread argument in match chain",
            ErrorCode::E3001 => "output context cannot host generated code",
            ErrorCode::E3002 => "handler cannot be compiled",
            ErrorCode::E4001 => "uncaught exception",
            ErrorCode::E4002 => "type error",
            ErrorCode::E4003 => "unbound name",
            ErrorCode::E4004 => "unsupported in evaluation",
            ErrorCode::E4005 => "call depth exceeded",
            ErrorCode::E9001 => "internal compiler error",
            ErrorCode::E9002 => "too many errors",
            ErrorCode::E9003 => "file I/O failure",
        }
    }

    pub fn is_lexer_error(&self) -> bool {
        self.as_str().starts_with("E0")
    }

    /// Lexer and parser errors: the file could not be read as a program.
    pub fn is_parser_error(&self) -> bool {
        self.as_str().starts_with("E1") || self.is_lexer_error()
    }

    /// Errors raised while compiling one match expression.
    pub fn is_match_error(&self) -> bool {
        let code = self.as_str();
        code.starts_with("E2") || code.starts_with("E3")
    }

    /// Errors raised while running a program in the evaluator.
    pub fn is_runtime_error(&self) -> bool {
        self.as_str().starts_with("E4")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_classification() {
        assert!(ErrorCode::E0003.is_lexer_error());
        assert!(ErrorCode::E0003.is_parser_error());
        assert!(ErrorCode::E1002.is_parser_error());
        assert!(!ErrorCode::E2001.is_parser_error());
        assert!(ErrorCode::E2001.is_match_error());
        assert!(ErrorCode::E3002.is_match_error());
        assert!(!ErrorCode::E9001.is_match_error());
        assert!(ErrorCode::E4001.is_runtime_error());
        assert!(!ErrorCode::E4001.is_match_error());
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(ErrorCode::E2004.to_string(), "E2004");
        assert_eq!(ErrorCode::E2004.description(), "unsupported pattern kind");
    }
}
