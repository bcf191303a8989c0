use std::fmt::Display;

use crate::parser::ast::TypeName;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Void,
    U8,
    Bool,
    Function(FunctionSignature),
}

impl Type {
    /// Resolves a type written in the source, `None` if no such type exists.
    #[must_use]
    pub fn from_name(name: &TypeName) -> Option<Self> {
        match name.0.as_str() {
            "void" => Some(Self::Void),
            "u8" => Some(Self::U8),
            "bool" => Some(Self::Bool),
            _ => None,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Void => write!(f, "void"),
            Self::U8 => write!(f, "u8"),
            Self::Bool => write!(f, "bool"),
            Self::Function(signature) => write!(f, "{signature}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    pub parameter_types: Vec<Type>,
    pub return_type: Box<Type>,
}

impl FunctionSignature {
    #[must_use]
    pub fn new(parameter_types: Vec<Type>, return_type: Type) -> Self {
        Self {
            parameter_types,
            return_type: Box::new(return_type),
        }
    }
}

impl Display for FunctionSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parameters: Vec<_> = self
            .parameter_types
            .iter()
            .map(ToString::to_string)
            .collect();

        write!(f, "({}) -> {}", parameters.join(", "), self.return_type)
    }
}
