//! Lexical scope chain used during name resolution

use super::symbols::SymbolId;
use rustc_hash::FxHashMap;

/// A stack of name tables. The bottom table holds the globals; every
/// parameter list and block pushes another.
#[derive(Debug)]
pub struct ScopeChain {
    scopes: Vec<FxHashMap<String, SymbolId>>,
}

impl Default for ScopeChain {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeChain {
    pub fn new() -> Self {
        Self {
            scopes: vec![FxHashMap::default()],
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    pub fn pop_scope(&mut self) {
        // The global scope is never popped
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Bind `name` in the innermost scope. Returns the existing binding if
    /// the name is already declared there.
    pub fn declare(&mut self, name: &str, symbol: SymbolId) -> Result<(), SymbolId> {
        let Some(scope) = self.scopes.last_mut() else {
            return Ok(());
        };
        if let Some(&existing) = scope.get(name) {
            return Err(existing);
        }
        scope.insert(name.to_string(), symbol);
        Ok(())
    }

    /// Find the innermost binding of `name`.
    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shadowing_and_pop() {
        let mut chain = ScopeChain::new();
        chain.declare("x", 0).unwrap();
        chain.push_scope();
        chain.declare("x", 1).unwrap();
        assert_eq!(chain.lookup("x"), Some(1));
        chain.pop_scope();
        assert_eq!(chain.lookup("x"), Some(0));
    }

    #[test]
    fn test_redeclaration_in_same_scope() {
        let mut chain = ScopeChain::new();
        chain.declare("x", 0).unwrap();
        assert_eq!(chain.declare("x", 1), Err(0));
    }

    #[test]
    fn test_global_scope_survives_pop() {
        let mut chain = ScopeChain::new();
        chain.declare("g", 3).unwrap();
        chain.pop_scope();
        assert_eq!(chain.depth(), 1);
        assert_eq!(chain.lookup("g"), Some(3));
    }
}
