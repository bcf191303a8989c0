use std::collections::HashMap;

use super::{type_check::TypecheckError, types::Type};
use crate::token::SourceContext;

/// How a name came to be bound, which decides what a later `let` or assignment may do with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Parameter,
    Let,
    Assigned,
    Function,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Binding {
    r#type: Type,
    kind: BindingKind,
}

/// Flat name to type mapping for one compilation unit.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: HashMap<String, Binding>,
    return_type: Option<Type>,
}

impl Environment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` as if it had been assigned to.
    pub fn add_variable(&mut self, name: impl Into<String>, r#type: Type) {
        self.bind(name, r#type, BindingKind::Assigned);
    }

    pub fn bind(&mut self, name: impl Into<String>, r#type: Type, kind: BindingKind) {
        self.bindings.insert(name.into(), Binding { r#type, kind });
    }

    /// # Errors
    /// Returns `UndefinedVariable` at `context` if `name` is not bound
    pub fn get_variable_type(
        &self,
        name: &str,
        context: SourceContext,
    ) -> Result<Type, TypecheckError> {
        self.lookup(name)
            .map(|(r#type, _)| r#type.clone())
            .ok_or_else(|| TypecheckError::UndefinedVariable {
                name: name.to_string(),
                context,
            })
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<(&Type, BindingKind)> {
        self.bindings
            .get(name)
            .map(|binding| (&binding.r#type, binding.kind))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// A scope for a function body: keeps the declared functions, drops everything else, and
    /// records the type `return` statements must produce.
    #[must_use]
    pub fn function_scope(&self, return_type: Option<Type>) -> Self {
        Self {
            bindings: self
                .bindings
                .iter()
                .filter(|(_, binding)| binding.kind == BindingKind::Function)
                .map(|(name, binding)| (name.clone(), binding.clone()))
                .collect(),
            return_type,
        }
    }

    /// A scope for an `if` body. Names first bound inside it are gone once it is dropped, and
    /// names from the enclosing scope keep their type while it is open.
    #[must_use]
    pub fn block_scope(&self) -> Self {
        let mut scope = self.clone();
        for binding in scope.bindings.values_mut() {
            if binding.kind == BindingKind::Assigned {
                binding.kind = BindingKind::Let;
            }
        }

        scope
    }

    #[must_use]
    pub const fn return_type(&self) -> Option<&Type> {
        self.return_type.as_ref()
    }
}
