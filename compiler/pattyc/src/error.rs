//! Driver failures. Both are fatal to the file being compiled.

use std::io;
use std::path::PathBuf;

use patty_diagnostic::{Diagnostic, ErrorCode};
use patty_parse::ParseError;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("cannot {action} `{}`: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DriverError {
    #[cold]
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        DriverError::Io {
            action: "read",
            path: path.into(),
            source,
        }
    }

    #[cold]
    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        DriverError::Io {
            action: "write",
            path: path.into(),
            source,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            DriverError::Parse(err) => err.code,
            DriverError::Io { .. } => ErrorCode::E9003,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            DriverError::Parse(err) => err.to_diagnostic(),
            // No span: the failure is about the file, not a position in it.
            DriverError::Io { .. } => {
                Diagnostic::error(ErrorCode::E9003).with_message(self.to_string())
            }
        }
    }
}
