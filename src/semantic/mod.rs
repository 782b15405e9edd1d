//! Static analysis between parsing and execution
//!
//! - [`resolver`]: binds every name to a [`symbols::Symbol`]
//! - [`checker`]: assigns a type to every expression
//! - [`errors`]: [`NameError`] and [`TypeError`]
//!
//! Both passes leave the AST untouched and report through side tables keyed
//! by node id.

pub mod checker;
pub mod errors;
pub mod resolver;
pub mod scope;
pub mod symbols;

pub use checker::{check, ExprTypes};
pub use errors::{NameError, NameErrorKind, TypeError, TypeErrorKind};
pub use resolver::resolve;
pub use symbols::{FunctionInfo, Resolution, Storage, Symbol, SymbolId};
