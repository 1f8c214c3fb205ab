//! Lexical scope chain used while binding

use crate::symbols::{FunctionRef, FunctionSymbol, VariableRef};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared reference to a scope
pub type ScopeRef = Rc<RefCell<BoundScope>>;

/// Variables and function overloads declared in one block
#[derive(Debug, Default)]
pub struct BoundScope {
    /// Declaration order
    variables: Vec<VariableRef>,
    variable_index: HashMap<String, usize>,
    /// Overload sets by name
    functions: HashMap<String, Vec<FunctionRef>>,
    parent: Option<ScopeRef>,
}

impl BoundScope {
    /// Create a root scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scope nested in `parent`
    pub fn with_parent(parent: ScopeRef) -> Self {
        BoundScope {
            parent: Some(parent),
            ..Self::default()
        }
    }

    pub fn into_ref(self) -> ScopeRef {
        Rc::new(RefCell::new(self))
    }

    pub fn parent(&self) -> Option<ScopeRef> {
        self.parent.clone()
    }

    /// Declare in this scope. Fails only when this scope already holds the
    /// name; outer declarations are shadowed.
    pub fn declare_variable(&mut self, variable: VariableRef) -> bool {
        if self.variable_index.contains_key(&variable.name) {
            return false;
        }
        self.variable_index
            .insert(variable.name.clone(), self.variables.len());
        self.variables.push(variable);
        true
    }

    /// Look up a variable in the scope chain
    pub fn lookup_variable(&self, name: &str) -> Option<VariableRef> {
        if let Some(&index) = self.variable_index.get(name) {
            Some(Rc::clone(&self.variables[index]))
        } else if let Some(parent) = &self.parent {
            parent.borrow().lookup_variable(name)
        } else {
            None
        }
    }

    /// Add an overload. Fails when this scope already has one with the same signature.
    pub fn declare_function(&mut self, function: FunctionSymbol) -> bool {
        let overloads = self.functions.entry(function.name.clone()).or_default();
        if overloads.iter().any(|f| f.same_signature(&function)) {
            return false;
        }
        overloads.push(Rc::new(function));
        true
    }

    /// Overload set from the nearest scope that declares `name`
    pub fn lookup_overloads(&self, name: &str) -> Vec<FunctionRef> {
        match self.functions.get(name) {
            Some(overloads) if !overloads.is_empty() => overloads.clone(),
            _ => match &self.parent {
                Some(parent) => parent.borrow().lookup_overloads(name),
                None => Vec::new(),
            },
        }
    }

    /// First overload of `name`, if any
    pub fn lookup_function(&self, name: &str) -> Option<FunctionRef> {
        self.lookup_overloads(name).into_iter().next()
    }

    /// Variables declared directly in this scope, in declaration order
    pub fn declared_variables(&self) -> &[VariableRef] {
        &self.variables
    }

    /// Every variable and function name reachable from here, for suggestions
    pub fn visible_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.variables.iter().map(|v| v.name.clone()).collect();
        let mut functions: Vec<&String> = self.functions.keys().collect();
        functions.sort();
        names.extend(functions.into_iter().cloned());
        if let Some(parent) = &self.parent {
            for name in parent.borrow().visible_names() {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }
}

/// Create a child scope from a parent reference
pub fn child_scope(parent: &ScopeRef) -> ScopeRef {
    BoundScope::with_parent(Rc::clone(parent)).into_ref()
}
