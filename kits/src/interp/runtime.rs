//! Runtime state: variables, subroutines and types
//!
//! One [`Runtime`] owns every table an evaluation touches. Independent
//! runtimes share nothing.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use super::error::{InterpResult, RuntimeError};
use super::scope::ScopeStack;
use super::value::{Value, ValueType};
use crate::ast::{Block, Param, SubrDecl};

/// A registered subroutine
#[derive(Debug)]
pub struct Subroutine {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: String,
    pub body: Block,
}

impl From<&SubrDecl> for Subroutine {
    fn from(decl: &SubrDecl) -> Self {
        Subroutine {
            name: decl.name.clone(),
            params: decl.params.clone(),
            return_type: decl.ret_ty.clone(),
            body: decl.body.clone(),
        }
    }
}

#[derive(Debug)]
pub struct Runtime {
    scopes: ScopeStack,
    subroutines: HashMap<String, Rc<Subroutine>>,
    /// Built-in type names
    types: HashMap<&'static str, ValueType>,
    user_types: HashSet<String>,
}

impl Runtime {
    pub fn new() -> Self {
        Runtime {
            scopes: ScopeStack::new(),
            subroutines: HashMap::new(),
            types: ValueType::BASIC.iter().map(|ty| (ty.name(), *ty)).collect(),
            user_types: HashSet::new(),
        }
    }

    // ---- variables ----

    pub fn push_scope(&mut self) -> usize {
        self.scopes.push_scope()
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop_scope();
    }

    pub fn depth(&self) -> usize {
        self.scopes.depth()
    }

    /// Bind a new variable in the innermost scope
    pub fn declare(&mut self, name: &str, value: Value) -> InterpResult<()> {
        if self.scopes.declare(name, value) {
            Ok(())
        } else {
            Err(RuntimeError::redeclaration(name))
        }
    }

    pub fn get(&self, name: &str) -> InterpResult<Value> {
        self.scopes
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::undefined_variable(name))
    }

    /// Assign to an already declared variable
    pub fn set(&mut self, name: &str, value: Value) -> InterpResult<()> {
        if self.scopes.set(name, value) {
            Ok(())
        } else {
            Err(RuntimeError::undefined_variable(name))
        }
    }

    pub fn is_variable(&self, name: &str) -> bool {
        self.scopes.contains(name)
    }

    // ---- subroutines ----

    /// Register a subroutine; an existing one with the same name is replaced
    pub fn define_subroutine(&mut self, subroutine: Subroutine) {
        tracing::debug!(
            name = %subroutine.name,
            params = subroutine.params.len(),
            "registered subroutine"
        );
        self.subroutines
            .insert(subroutine.name.clone(), Rc::new(subroutine));
    }

    pub fn subroutine(&self, name: &str) -> InterpResult<Rc<Subroutine>> {
        self.subroutines
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::undefined_subroutine(name))
    }

    pub fn has_subroutine(&self, name: &str) -> bool {
        self.subroutines.contains_key(name)
    }

    // ---- types ----

    /// Record the name of a user-declared aggregate type
    pub fn register_user_type(&mut self, name: &str) -> bool {
        self.user_types.insert(name.to_string())
    }

    pub fn is_user_type(&self, name: &str) -> bool {
        self.user_types.contains(name)
    }

    /// Map a type name to its tag: a built-in type, or `UserDefined` for a
    /// registered user type. Unknown names are a `NameError`.
    pub fn resolve_type(&self, name: &str) -> InterpResult<ValueType> {
        if let Some(ty) = self.types.get(name) {
            return Ok(*ty);
        }
        if self.is_user_type(name) {
            return Ok(ValueType::UserDefined);
        }
        Err(RuntimeError::unknown_type(name))
    }

    /// Tear down every variable, subroutine and user type
    pub fn reset(&mut self) {
        self.scopes.reset();
        self.subroutines.clear();
        self.user_types.clear();
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}
