//! Lexically scoped variable storage.
//!
//! A stack of [`VarScope`]s. Index 0 is the global scope, which lives as long
//! as the store. A scope may mark names `nonlocal` (resolve in the enclosing
//! scope) or `global` (resolve in scope 0).

use rustc_hash::{FxHashMap, FxHashSet};

/// One level of the variable stack.
#[derive(Clone, Debug, Default)]
pub struct VarScope {
    vars: FxHashMap<String, String>,
    nonlocals: FxHashSet<String>,
    globals: FxHashSet<String>,
}

impl VarScope {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn is_nonlocal(&self, name: &str) -> bool {
        self.nonlocals.contains(name)
    }

    pub fn is_global(&self, name: &str) -> bool {
        self.globals.contains(name)
    }

    /// Local bindings, in no particular order.
    pub fn vars(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Stack of variable scopes with `nonlocal`/`global` escapes.
#[derive(Clone, Debug)]
pub struct ScopedVarStore {
    scopes: Vec<VarScope>,
}

impl ScopedVarStore {
    /// Create a store holding only the global scope.
    pub fn new() -> Self {
        ScopedVarStore {
            scopes: vec![VarScope::new()],
        }
    }

    /// Number of scopes, including the global one.
    #[inline]
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn new_scope(&mut self) {
        self.scopes.push(VarScope::new());
    }

    /// Drop the innermost scope and every variable defined in it.
    ///
    /// # Panics
    ///
    /// Panics if only the global scope is left.
    pub fn destroy_scope(&mut self) {
        assert!(
            self.scopes.len() > 1,
            "ScopedVarStore::destroy_scope called with only the global scope left"
        );
        self.scopes.pop();
    }

    pub fn current_scope(&self) -> &VarScope {
        &self.scopes[self.scopes.len() - 1]
    }

    fn current_scope_mut(&mut self) -> &mut VarScope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    pub fn global_scope(&self) -> &VarScope {
        &self.scopes[0]
    }

    pub fn scope(&self, index: usize) -> Option<&VarScope> {
        self.scopes.get(index)
    }

    /// Route reads and writes of `name` in the current scope to the enclosing scope.
    pub fn declare_nonlocal(&mut self, name: impl Into<String>) {
        self.current_scope_mut().nonlocals.insert(name.into());
    }

    /// Route reads and writes of `name` in the current scope to the global scope.
    pub fn declare_global(&mut self, name: impl Into<String>) {
        self.current_scope_mut().globals.insert(name.into());
    }

    /// Index of the scope that reads and writes of `name` are directed to.
    ///
    /// Walks outward from the innermost scope: a `global` declaration jumps to
    /// scope 0, a `nonlocal` declaration moves one scope out, anything else
    /// stops the walk.
    pub fn resolve_scope(&self, name: &str) -> usize {
        let mut index = self.scopes.len() - 1;
        loop {
            let scope = &self.scopes[index];
            if scope.is_global(name) {
                return 0;
            }
            if scope.is_nonlocal(name) && index > 0 {
                index -= 1;
                continue;
            }
            return index;
        }
    }

    /// Scope holding the value a read of `name` sees, falling back to the
    /// global scope when the resolved scope lacks it.
    pub fn scope_for_read(&self, name: &str) -> Option<usize> {
        let index = self.resolve_scope(name);
        if self.scopes[index].contains(name) {
            Some(index)
        } else if self.scopes[0].contains(name) {
            Some(0)
        } else {
            None
        }
    }

    pub fn get_var(&self, name: &str) -> Option<&str> {
        let index = self.scope_for_read(name)?;
        self.scopes[index].get(name)
    }

    pub fn set_var(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let index = self.resolve_scope(&name);
        self.scopes[index].vars.insert(name, value.into());
    }

    /// Remove `name` from the scope a write would target, or failing that from
    /// the current scope. Returns the removed value.
    pub fn del_var(&mut self, name: &str) -> Option<String> {
        let index = self.resolve_scope(name);
        self.scopes[index]
            .vars
            .remove(name)
            .or_else(|| self.current_scope_mut().vars.remove(name))
    }
}

impl Default for ScopedVarStore {
    fn default() -> Self {
        Self::new()
    }
}
