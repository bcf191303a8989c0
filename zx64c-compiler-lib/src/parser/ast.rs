use std::fmt::Display;

use crate::token::SourceContext;

/// A type as written in the source. Resolution happens during analysis.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct TypeName(pub String);

impl Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TypeName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpressionKind {
    Equal(Box<Expression>, Box<Expression>),
    NotEqual(Box<Expression>, Box<Expression>),
    Addition(Box<Expression>, Box<Expression>),
    Subtraction(Box<Expression>, Box<Expression>),
    Negation(Box<Expression>),
    FunctionCall {
        name: String,
        arguments: Vec<Expression>,
    },
    Unsignedint(u8),
    Identifier(String),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub context: SourceContext,
}

impl Expression {
    #[must_use]
    pub const fn new(kind: ExpressionKind, context: SourceContext) -> Self {
        Self { kind, context }
    }

    #[must_use]
    pub fn binary(
        make: fn(Box<Self>, Box<Self>) -> ExpressionKind,
        lhs: Self,
        rhs: Self,
    ) -> Self {
        let context = lhs.context;

        Self::new(make(Box::new(lhs), Box::new(rhs)), context)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementKind {
    If {
        condition: Expression,
        body: Block,
    },
    Let {
        name: String,
        declared_type: TypeName,
        value: Expression,
    },
    Return(Expression),
    Print(Expression),
    Assignment {
        name: String,
        rhs: Expression,
    },
    Expression(Expression),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub kind: StatementKind,
    pub context: SourceContext,
}

impl Statement {
    #[must_use]
    pub const fn new(kind: StatementKind, context: SourceContext) -> Self {
        Self { kind, context }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub context: SourceContext,
}

impl Block {
    /// Whether a `return` appears anywhere in this block, nested blocks included.
    #[must_use]
    pub fn contains_return(&self) -> bool {
        self.statements.iter().any(|statement| match &statement.kind {
            StatementKind::Return(_) => true,
            StatementKind::If { body, .. } => body.contains_return(),
            _ => false,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub r#type: TypeName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: TypeName,
    pub body: Block,
    pub context: SourceContext,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Program {
    pub functions: Vec<Function>,
    pub context: SourceContext,
}
