//! Symbol table produced by the resolver
//!
//! The AST is never mutated; every binding lives in a side table keyed by
//! the [`NodeId`] of the expression or declaration it belongs to.

use crate::parser::ast::{NodeId, SourceLocation, Type};
use rustc_hash::FxHashMap;

pub type SymbolId = usize;

/// Where a variable lives at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Storage {
    /// Index into the global store
    Global(usize),
    /// Slot in the activation record of the enclosing function
    Local(usize),
    /// Parameter slot; parameters occupy the first slots of a frame
    Parameter(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub ty: Type,
    pub storage: Storage,
    pub location: SourceLocation,
}

/// Registered signature and frame layout of a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionInfo {
    /// Position in `Program::functions`
    pub index: usize,
    pub params: Vec<SymbolId>,
    /// Number of slots (parameters plus every local) a frame needs
    pub slot_count: usize,
    pub location: SourceLocation,
}

/// Output of name resolution.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub symbols: Vec<Symbol>,
    /// Variable reference expression → symbol
    pub uses: FxHashMap<NodeId, SymbolId>,
    /// Declaration (global, local, or parameter) → symbol
    pub decls: FxHashMap<NodeId, SymbolId>,
    pub functions: FxHashMap<String, FunctionInfo>,
    /// Global symbols in declaration order
    pub globals: Vec<SymbolId>,
}

impl Resolution {
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id]
    }

    /// The symbol a variable reference resolved to.
    pub fn use_of(&self, node: NodeId) -> Option<&Symbol> {
        self.uses.get(&node).map(|&id| &self.symbols[id])
    }

    /// The symbol a declaration introduced.
    pub fn decl_of(&self, node: NodeId) -> Option<&Symbol> {
        self.decls.get(&node).map(|&id| &self.symbols[id])
    }

    pub fn function(&self, name: &str) -> Option<&FunctionInfo> {
        self.functions.get(name)
    }

    /// Parameter types of `name`, after array parameters are adjusted.
    pub fn param_types(&self, name: &str) -> Vec<Type> {
        self.function(name)
            .map(|f| f.params.iter().map(|&p| self.symbols[p].ty.clone()).collect())
            .unwrap_or_default()
    }
}
