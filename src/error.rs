// Unified error type for microc

use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::SourceLocation;
use crate::parser::lexer::LexError;
use crate::parser::parse::ParseError;
use crate::semantic::{NameError, TypeError};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Name(#[from] NameError),

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which stage produced an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Lex,
    Parse,
    Name,
    Type,
    Runtime,
    Io,
}

impl ErrorKind {
    /// Process exit status for this kind of failure
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::Lex | ErrorKind::Parse | ErrorKind::Name | ErrorKind::Type => 1,
            ErrorKind::Runtime => 2,
            ErrorKind::Io => 3,
        }
    }

    pub fn is_compile_time(self) -> bool {
        self.exit_code() == 1
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Lex => "lex error",
            ErrorKind::Parse => "parse error",
            ErrorKind::Name => "name error",
            ErrorKind::Type => "type error",
            ErrorKind::Runtime => "runtime error",
            ErrorKind::Io => "io error",
        };
        f.write_str(name)
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Lex(_) => ErrorKind::Lex,
            Error::Parse(_) => ErrorKind::Parse,
            Error::Name(_) => ErrorKind::Name,
            Error::Type(_) => ErrorKind::Type,
            Error::Runtime(e) if e.is_io() => ErrorKind::Io,
            Error::Runtime(_) => ErrorKind::Runtime,
            Error::Io(_) => ErrorKind::Io,
        }
    }

    /// Where the error was detected; I/O errors have no source location
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            Error::Lex(e) => Some(e.location),
            Error::Parse(e) => Some(e.location),
            Error::Name(e) => Some(e.location),
            Error::Type(e) => Some(e.location),
            Error::Runtime(e) => Some(e.location()),
            Error::Io(_) => None,
        }
    }

    /// The message without the kind or location prefix
    pub fn message(&self) -> String {
        match self {
            Error::Lex(e) => e.message.clone(),
            Error::Parse(e) => e.message.clone(),
            Error::Name(e) => e.kind.to_string(),
            Error::Type(e) => e.kind.to_string(),
            Error::Runtime(e) => e.message(),
            Error::Io(e) => e.to_string(),
        }
    }

    /// Render as `<file>:<line>:<column>: <kind>: <message>`
    pub fn diagnostic(&self, file: &str) -> String {
        match self.location() {
            Some(loc) => format!(
                "{}:{}:{}: {}: {}",
                file,
                loc.line,
                loc.column,
                self.kind(),
                self.message()
            ),
            None => format!("{}: {}: {}", file, self.kind(), self.message()),
        }
    }
}
