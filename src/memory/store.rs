//! Object store
//!
//! Every declared variable is one object of `cell_count(type)` cells, held
//! here under a fresh [`ObjectId`]. Releasing an object drops it; since ids
//! are never reused, an access through a stale pointer is still reported as
//! dangling, and the interned name in the id keeps it printable.
//!
//! Each load and store checks, at access time:
//! - the pointer is not null
//! - the object is still live
//! - `0 <= offset < len`

use super::value::{Address, ObjectId, Value};
use crate::parser::ast::Type;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Why a memory access was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoundsReason {
    #[error("dereference of a null pointer")]
    Null,

    #[error("access to '{name}' after its lifetime ended")]
    Dangling { name: String },

    #[error("offset {offset} is outside '{name}' ({extent} cell(s))")]
    OutOfRange {
        name: String,
        offset: i64,
        extent: usize,
    },
}

/// A live storage object
#[derive(Debug, Clone)]
pub struct Object {
    pub cells: Vec<Value>,
}

/// The initial contents of a fresh object of type `ty`: every int cell 0,
/// every bool cell false, every pointer cell null.
pub fn initial_cells(ty: &Type) -> Vec<Value> {
    fn fill(ty: &Type, cells: &mut Vec<Value>) {
        match ty {
            Type::Int => cells.push(Value::Int(0)),
            Type::Bool => cells.push(Value::Bool(false)),
            Type::Pointer(_) => cells.push(Value::Null),
            Type::Void => {}
            Type::Array(element, size) => {
                for _ in 0..size.unwrap_or(0) {
                    fill(element, cells);
                }
            }
        }
    }

    let mut cells = Vec::with_capacity(ty.cell_count());
    fill(ty, &mut cells);
    cells
}

#[derive(Debug, Clone, Default)]
pub struct Store {
    objects: FxHashMap<ObjectId, Object>,
    /// Interned variable names, indexed by `ObjectId::name`
    names: Vec<String>,
    name_index: FxHashMap<String, u32>,
    next_serial: usize,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    fn intern(&mut self, name: &str) -> u32 {
        if let Some(&index) = self.name_index.get(name) {
            return index;
        }
        let index = self.names.len() as u32;
        self.names.push(name.to_string());
        self.name_index.insert(name.to_string(), index);
        index
    }

    /// Allocate a fresh, zero-initialized object for a variable of type `ty`.
    pub fn allocate(&mut self, name: &str, ty: &Type) -> ObjectId {
        let id = ObjectId {
            serial: self.next_serial,
            name: self.intern(name),
        };
        self.next_serial += 1;
        self.objects.insert(
            id,
            Object {
                cells: initial_cells(ty),
            },
        );
        id
    }

    /// End an object's lifetime. Releasing twice is a no-op.
    pub fn release(&mut self, id: ObjectId) {
        self.objects.remove(&id);
    }

    /// The live object `id`, if it has not been released.
    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(&id)
    }

    /// The variable name an object was allocated for.
    pub fn name(&self, id: ObjectId) -> &str {
        self.names
            .get(id.name as usize)
            .map(String::as_str)
            .unwrap_or("?")
    }

    /// Number of live objects.
    pub fn live_count(&self) -> usize {
        self.objects.len()
    }

    /// Validate `pointer` for a one-cell access and return its cell index.
    pub fn check(&self, pointer: Value) -> Result<(ObjectId, usize), BoundsReason> {
        let addr = match pointer {
            Value::Pointer(addr) => addr,
            _ => return Err(BoundsReason::Null),
        };
        let object = self
            .objects
            .get(&addr.object)
            .ok_or_else(|| BoundsReason::Dangling {
                name: self.name(addr.object).to_string(),
            })?;
        let extent = object.cells.len();
        if addr.offset < 0 || addr.offset as u64 >= extent as u64 {
            return Err(BoundsReason::OutOfRange {
                name: self.name(addr.object).to_string(),
                offset: addr.offset,
                extent,
            });
        }
        Ok((addr.object, addr.offset as usize))
    }

    /// Checked load of one cell.
    pub fn load(&self, pointer: Value) -> Result<Value, BoundsReason> {
        let (id, index) = self.check(pointer)?;
        Ok(self.objects[&id].cells[index])
    }

    /// Checked store of one cell.
    pub fn store(&mut self, pointer: Value, value: Value) -> Result<(), BoundsReason> {
        let (id, index) = self.check(pointer)?;
        if let Some(object) = self.objects.get_mut(&id) {
            object.cells[index] = value;
        }
        Ok(())
    }

    /// Render a value for display: pointers show the object they designate,
    /// e.g. `&ia[2]` or `&n`.
    pub fn describe(&self, value: Value) -> String {
        match value {
            Value::Pointer(Address { object, offset }) => {
                let name = self.name(object);
                if offset == 0 {
                    format!("&{}", name)
                } else {
                    format!("&{}[{}]", name, offset)
                }
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ptr(object: ObjectId, offset: i64) -> Value {
        Value::Pointer(Address::new(object, offset))
    }

    #[test]
    fn test_initial_cells_follow_the_type() {
        let ty = Type::Int.pointer_to().array_of(Some(2));
        assert_eq!(initial_cells(&ty), vec![Value::Null, Value::Null]);

        let grid = Type::Bool.array_of(Some(2)).array_of(Some(2));
        assert_eq!(initial_cells(&grid), vec![Value::Bool(false); 4]);
    }

    #[test]
    fn test_load_and_store() {
        let mut store = Store::new();
        let a = store.allocate("a", &Type::Int.array_of(Some(3)));

        store.store(ptr(a, 2), Value::Int(42)).unwrap();
        assert_eq!(store.load(ptr(a, 2)), Ok(Value::Int(42)));
        assert_eq!(store.load(ptr(a, 0)), Ok(Value::Int(0)));
    }

    #[test]
    fn test_out_of_range() {
        let mut store = Store::new();
        let a = store.allocate("a", &Type::Int.array_of(Some(3)));

        assert_eq!(
            store.load(ptr(a, 3)),
            Err(BoundsReason::OutOfRange {
                name: "a".to_string(),
                offset: 3,
                extent: 3,
            })
        );
        assert!(matches!(
            store.store(ptr(a, -1), Value::Int(1)),
            Err(BoundsReason::OutOfRange { offset: -1, .. })
        ));
    }

    #[test]
    fn test_null_and_dangling() {
        let mut store = Store::new();
        let x = store.allocate("x", &Type::Int);
        assert_eq!(store.live_count(), 1);

        store.release(x);
        store.release(x);
        assert_eq!(store.live_count(), 0);

        assert_eq!(store.load(Value::Null), Err(BoundsReason::Null));
        assert_eq!(
            store.load(ptr(x, 0)),
            Err(BoundsReason::Dangling {
                name: "x".to_string()
            })
        );
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut store = Store::new();
        let a = store.allocate("a", &Type::Int);
        store.release(a);
        let b = store.allocate("b", &Type::Int);
        assert_ne!(a, b);
        assert!(store.load(ptr(a, 0)).is_err());
    }

    #[test]
    fn test_released_objects_are_dropped() {
        let mut store = Store::new();
        let g = store.allocate("g", &Type::Int);
        let mut last = g;
        for _ in 0..1000 {
            last = store.allocate("t", &Type::Int.array_of(Some(4)));
            store.release(last);
        }
        assert_eq!(store.live_count(), 1);
        assert!(store.object(last).is_none());
        assert!(store.object(g).is_some());
        // The name survives the release
        assert_eq!(store.describe(ptr(last, 1)), "&t[1]");
        assert_eq!(
            store.load(ptr(last, 0)),
            Err(BoundsReason::Dangling {
                name: "t".to_string()
            })
        );
    }

    #[test]
    fn test_describe() {
        let mut store = Store::new();
        let ia = store.allocate("ia", &Type::Int.array_of(Some(3)));
        assert_eq!(store.describe(ptr(ia, 0)), "&ia");
        assert_eq!(store.describe(ptr(ia, 2)), "&ia[2]");
        assert_eq!(store.describe(Value::Int(-7)), "-7");
        assert_eq!(store.describe(Value::Null), "null");
    }
}
