//! Scope stack for variable storage
//!
//! Each scope is an insertion-ordered list of owned slots. Popping a scope
//! drops its slots immediately. Index 0 is the global scope and is never
//! popped, so a lookup always has at least one scope to search.

use super::Value;

type Scope = Vec<(String, Value)>;

#[derive(Debug)]
pub struct ScopeStack {
    /// Stack of scopes, index 0 is global
    scopes: Vec<Scope>,
}

impl ScopeStack {
    /// Create a new scope stack with a global scope
    pub fn new() -> Self {
        ScopeStack {
            scopes: vec![Scope::new()],
        }
    }

    /// Push a new scope and return the new depth
    pub fn push_scope(&mut self) -> usize {
        self.scopes.push(Scope::new());
        self.scopes.len()
    }

    /// Pop the innermost scope. The global scope stays; returns false if
    /// only the global scope was left.
    pub fn pop_scope(&mut self) -> bool {
        if self.scopes.len() <= 1 {
            return false;
        }
        self.scopes.pop();
        true
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Bind a new slot in the innermost scope. Returns false, leaving the
    /// scope untouched, if the name is already bound in that scope.
    pub fn declare(&mut self, name: &str, value: Value) -> bool {
        let Some(scope) = self.scopes.last_mut() else {
            return false;
        };
        if scope.iter().any(|(bound, _)| bound == name) {
            return false;
        }
        scope.push((name.to_string(), value));
        true
    }

    /// Look up a variable, innermost scope first
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.iter().find(|(bound, _)| bound == name))
            .map(|(_, value)| value)
    }

    /// Overwrite the nearest binding of `name`.
    /// Returns false if no scope binds it.
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        let slot = self
            .scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.iter_mut().find(|(bound, _)| bound == name));
        match slot {
            Some((_, current)) => {
                *current = value;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Bindings of the innermost scope, in declaration order
    pub fn current_bindings(&self) -> &[(String, Value)] {
        self.scopes.last().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Drop every scope and every global binding
    pub fn reset(&mut self) {
        self.scopes.truncate(1);
        self.scopes[0].clear();
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}
