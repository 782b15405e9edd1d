//! Runtime value representation
//!
//! This module defines the [`Value`] enum, which represents all possible runtime values
//! in the Micro-C interpreter. Values are tagged; a pointer names the object it
//! designates rather than a raw address.
//!
//! # Value Types
//!
//! - [`Value::Int`]: 32-bit signed integer
//! - [`Value::Bool`]: boolean
//! - [`Value::Pointer`]: object plus cell offset
//! - [`Value::Null`]: pointer that designates nothing

use std::fmt;

/// Identifier of a storage object.
///
/// The serial is never reused within one run. `name` indexes the store's
/// table of variable names, so an object can be named after its release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId {
    pub serial: usize,
    pub name: u32,
}

/// A cell address: the object and a cell offset into it.
///
/// The offset is signed so that pointer arithmetic may step outside the
/// object; only dereferencing such an address is a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    pub object: ObjectId,
    pub offset: i64,
}

impl Address {
    pub fn new(object: ObjectId, offset: i64) -> Self {
        Self { object, offset }
    }

    pub fn offset_by(self, cells: i64) -> Self {
        Self {
            object: self.object,
            offset: self.offset.wrapping_add(cells),
        }
    }
}

/// Runtime values in the interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Int(i32),
    Bool(bool),
    Pointer(Address),
    Null,
}

impl Value {
    /// Get the integer value, returns None if not an Int
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the boolean value, returns None if not a Bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the address, returns None for Null and non-pointers
    pub fn as_address(&self) -> Option<Address> {
        match self {
            Value::Pointer(addr) => Some(*addr),
            _ => None,
        }
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this value is a pointer (including null)
    pub fn is_pointer(&self) -> bool {
        matches!(self, Value::Pointer(_) | Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Pointer(addr) => write!(f, "@{}+{}", addr.object.serial, addr.offset),
            Value::Null => write!(f, "null"),
        }
    }
}
