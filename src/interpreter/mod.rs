//! Micro-C execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: Main interpreter with call handling and snapshots
//! - [`errors`]: Runtime error types
//! - [`io`]: Token sources for `read`
//!
//! # Execution Model
//!
//! The interpreter walks the checked AST, allocating every global before
//! calling `main`. Each variable is a storage object in the
//! [`Store`](crate::memory::store::Store); every load and store is checked
//! for null, dangling and out-of-range pointers.
//!
//! When snapshots are enabled, one is taken before each statement to enable
//! stepping through the run in the viewer.

pub mod constants;
pub mod engine;
pub mod errors;
mod expressions;
pub mod io;
mod statements;

pub use engine::{Interpreter, RunConfig};
pub use errors::RuntimeError;
pub use io::{InputSource, QueueInput, ReaderInput};
