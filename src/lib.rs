//! # Introduction
//!
//! microc compiles and runs Micro-C, a small imperative language with `int`
//! and `bool` values, pointers, fixed-size arrays and `void` functions. A
//! run can capture a snapshot of the interpreter state before each
//! statement; the snapshot history is then navigated forward and backward
//! through a terminal UI built with [ratatui](https://docs.rs/ratatui).
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST → Resolver → Checker → Interpreter → Snapshots → TUI
//! ```
//!
//! 1. [`parser`] tokenises the source and builds an AST; it also
//!    pretty-prints an AST back to canonical source.
//! 2. [`semantic`] binds every name to a declaration and assigns every
//!    expression a type. Both results are side tables keyed by node id.
//! 3. [`interpreter`] walks the checked AST with strict left-to-right
//!    evaluation and checked memory accesses.
//! 4. [`memory`] holds storage objects, pointers and the call stack.
//! 5. [`snapshot`] records output and per-statement snapshots.
//! 6. [`ui`] is the ratatui trace viewer; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! use microc::interpreter::{Interpreter, QueueInput, RunConfig};
//! use std::sync::Arc;
//!
//! let compiled = microc::compile("void main() { int x; read x; write x * 2; }").unwrap();
//! let mut interpreter = Interpreter::new(
//!     Arc::new(compiled),
//!     Box::new(QueueInput::from_text("21")),
//!     RunConfig::default(),
//! );
//! interpreter.run().unwrap();
//! assert_eq!(interpreter.output(), &[microc::memory::value::Value::Int(42)]);
//! ```

pub mod error;
pub mod interpreter;
pub mod memory;
pub mod parser;
pub mod semantic;
pub mod snapshot;
pub mod ui;

pub use error::{Error, ErrorKind};

use parser::ast::Program;
use parser::lexer::Lexer;
use parser::Parser;
use semantic::{ExprTypes, Resolution};

/// A program that passed every compile-time stage
#[derive(Debug, Clone)]
pub struct Compiled {
    pub source: String,
    pub program: Program,
    pub resolution: Resolution,
    pub types: ExprTypes,
}

/// Parse a program without resolving or checking it
pub fn parse(source: &str) -> Result<Program, Error> {
    let tokens = Lexer::new(source).tokenize()?;
    Ok(Parser::new(tokens).parse_program()?)
}

/// Run lexing, parsing, name resolution and type checking
pub fn compile(source: &str) -> Result<Compiled, Error> {
    let program = parse(source)?;
    let resolution = semantic::resolve(&program)?;
    let types = semantic::check(&program, &resolution)?;
    Ok(Compiled {
        source: source.to_string(),
        program,
        resolution,
        types,
    })
}
