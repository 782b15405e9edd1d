//! Compile-time error types for name resolution and type checking

use crate::parser::ast::{SourceLocation, Type};
use thiserror::Error;

/// A name resolution failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "name error at line {}, column {}: {kind}",
    .location.line,
    .location.column
)]
pub struct NameError {
    pub kind: NameErrorKind,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameErrorKind {
    #[error("undeclared variable '{0}'")]
    UndeclaredVariable(String),

    #[error("call to undeclared function '{0}'")]
    UndeclaredFunction(String),

    #[error("'{name}' is already declared in this scope (first declared at line {}, column {})", .previous.line, .previous.column)]
    Redeclared {
        name: String,
        previous: SourceLocation,
    },

    #[error("function '{function}' takes {expected} argument(s) but {found} were supplied")]
    ArityMismatch {
        function: String,
        expected: usize,
        found: usize,
    },

    #[error("program has no 'main' function")]
    MissingMain,

    #[error("'main' must not take parameters")]
    MainHasParameters,
}

/// A type checking failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "type error at line {}, column {}: {kind}",
    .location.line,
    .location.column
)]
pub struct TypeError {
    pub kind: TypeErrorKind,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeErrorKind {
    #[error("{context}: expected {expected}, found {found}")]
    Mismatch {
        context: String,
        expected: Type,
        found: Type,
    },

    #[error("operands of '{op}' have incompatible types {left} and {right}")]
    IncompatibleOperands {
        op: &'static str,
        left: Type,
        right: Type,
    },

    #[error("'{0}' has no binding; resolve the program before checking it")]
    Unresolved(String),

    #[error("cannot take the address of a value that is not stored in a variable")]
    NotAddressable,

    #[error("cannot assign to this expression")]
    NotAssignable,

    #[error("cannot assign to array of type {0}")]
    ArrayAssignment(Type),

    #[error("cannot dereference a value of type {0}")]
    NotPointer(Type),

    #[error("cannot index a value of type {0}")]
    NotIndexable(Type),

    #[error("a call to '{0}' produces no value")]
    VoidValue(String),

    #[error("argument {index} of '{function}': expected {expected}, found {found}")]
    ArgumentMismatch {
        function: String,
        index: usize,
        expected: Type,
        found: Type,
    },

    #[error("array '{0}' needs a positive size")]
    UnsizedArray(String),

    #[error("array '{name}' needs more than {limit} cells")]
    ArrayTooLarge { name: String, limit: usize },

    #[error("'read' needs an int or bool variable, found {0}")]
    InvalidReadTarget(Type),

    #[error("'write' cannot print a value of type {0}")]
    InvalidWrite(Type),
}
