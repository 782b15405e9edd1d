//! Memory model for the Micro-C interpreter
//!
//! This module provides the core memory abstractions:
//! - [`value`]: Runtime value representation (Int, Bool, Pointer, Null)
//! - [`store`]: Storage objects with liveness and bounds checks
//! - [`stack`]: Call stack with frames that own their objects
//!
//! # Cells
//!
//! Memory is counted in cells, not bytes. `int`, `bool` and every pointer
//! occupy one cell; an array of `n` elements occupies `n` times its
//! element's cells. Pointer arithmetic is scaled accordingly:
//! ```text
//! ptr + n  →  ptr + (n * cell_count(*ptr))
//! ```

pub mod stack;
pub mod store;
pub mod value;

use crate::parser::ast::Type;
use value::Value;

/// Offset `pointer` by `n` elements of `pointee`. Null stays null.
pub fn pointer_add(pointer: Value, n: i32, pointee: &Type) -> Value {
    match pointer {
        Value::Pointer(addr) => {
            let cells = i64::from(n).wrapping_mul(pointee.cell_count() as i64);
            Value::Pointer(addr.offset_by(cells))
        }
        other => other,
    }
}
