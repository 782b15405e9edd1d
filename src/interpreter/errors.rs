//! Runtime error types for the Micro-C interpreter
//!
//! This module defines [`RuntimeError`], which represents all errors that can occur
//! during program execution (as opposed to compile-time errors).
//!
//! All runtime errors are fatal: they halt execution. Output written before
//! the fault is kept.

use crate::memory::store::BoundsReason;
use crate::parser::ast::SourceLocation;
use thiserror::Error;

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Load or store through a null, dangling or out-of-range pointer
    #[error("bounds fault at line {}, column {}: {reason}", .location.line, .location.column)]
    BoundsFault {
        reason: BoundsReason,
        location: SourceLocation,
    },

    /// `read` found no more input
    #[error("input exhausted at line {}, column {}", .location.line, .location.column)]
    InputExhausted { location: SourceLocation },

    /// `read` found a token that is not a value of the target's type
    #[error(
        "input mismatch at line {}, column {}: expected {expected}, found '{found}'",
        .location.line,
        .location.column
    )]
    InputMismatch {
        expected: &'static str,
        found: String,
        location: SourceLocation,
    },

    /// The input source failed while `read` was waiting for a token
    #[error("input error at line {}, column {}: {message}", .location.line, .location.column)]
    InputFailed {
        message: String,
        location: SourceLocation,
    },

    /// Written output could not be delivered to the echo sink
    #[error("output error at line {}, column {}: {message}", .location.line, .location.column)]
    OutputFailed {
        message: String,
        location: SourceLocation,
    },

    /// Integer division by zero
    #[error("division by zero at line {}, column {}", .location.line, .location.column)]
    DivisionByZero { location: SourceLocation },

    /// Recursion went deeper than the configured limit
    #[error(
        "call depth limit of {limit} exceeded at line {}, column {}",
        .location.line,
        .location.column
    )]
    CallDepthExceeded {
        limit: usize,
        location: SourceLocation,
    },
}

impl RuntimeError {
    /// Whether the fault came from the environment rather than the program
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            RuntimeError::InputFailed { .. } | RuntimeError::OutputFailed { .. }
        )
    }

    /// Get the source location where the error occurred
    pub fn location(&self) -> SourceLocation {
        match self {
            RuntimeError::BoundsFault { location, .. }
            | RuntimeError::InputExhausted { location }
            | RuntimeError::InputMismatch { location, .. }
            | RuntimeError::InputFailed { location, .. }
            | RuntimeError::OutputFailed { location, .. }
            | RuntimeError::DivisionByZero { location }
            | RuntimeError::CallDepthExceeded { location, .. } => *location,
        }
    }

    /// The message without the location prefix
    pub fn message(&self) -> String {
        match self {
            RuntimeError::BoundsFault { reason, .. } => reason.to_string(),
            RuntimeError::InputExhausted { .. } => "no input left for 'read'".to_string(),
            RuntimeError::InputMismatch {
                expected, found, ..
            } => format!("expected {}, found '{}'", expected, found),
            RuntimeError::InputFailed { message, .. } => format!("reading input: {}", message),
            RuntimeError::OutputFailed { message, .. } => format!("writing output: {}", message),
            RuntimeError::DivisionByZero { .. } => "division by zero".to_string(),
            RuntimeError::CallDepthExceeded { limit, .. } => {
                format!("call depth limit of {} exceeded", limit)
            }
        }
    }
}
