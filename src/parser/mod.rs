//! Micro-C source code parser
//!
//! This module transforms Micro-C source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parsing (tokens → AST), split across `declarations`,
//!   `statements` and `expressions`
//! - [`ast`]: AST node definitions
//! - [`printer`]: AST → canonical source text
//!
//! # Language
//!
//! - Types: `int`, `bool`, pointers and fixed-size arrays, nested freely
//! - Functions: `void` only, results leave through pointer parameters
//! - Statements: blocks, `if`/`else`, `while`, `read`, `write`, expressions
//! - Expressions: arithmetic, comparison, short-circuit logic, `&`, `*`,
//!   indexing, assignment, calls
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser, one method per precedence level.
//! No external parser generator dependencies.

pub mod ast;
mod declarations;
mod expressions;
pub mod lexer;
pub mod parse;
pub mod printer;
mod statements;

pub use parse::{ParseError, Parser};
