use std::collections::HashSet;

use thiserror::Error;
use tracing::trace;

use super::{
    environment::{BindingKind, Environment},
    types::{FunctionSignature, Type},
};
use crate::{
    ENTRY_POINT,
    parser::ast::{
        Block, Expression, ExpressionKind, Function, Program, Statement, StatementKind, TypeName,
    },
    token::SourceContext,
};

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum TypecheckError {
    #[error("{}", render_combined(.0))]
    Combined(Vec<TypecheckError>),
    #[error("At {context}: Expected type {expected}. Received type {received}.")]
    TypeMismatch {
        expected: Type,
        received: Type,
        context: SourceContext,
    },
    #[error("At {context}: Expected numerical type. Received type {received}.")]
    ExpectedNumericalType {
        received: Type,
        context: SourceContext,
    },
    #[error("At {context}: Undefined variable {name}.")]
    UndefinedVariable {
        name: String,
        context: SourceContext,
    },
    #[error("At {context}: Undefined type {name}.")]
    UndefinedType {
        name: TypeName,
        context: SourceContext,
    },
    #[error("At {context}: Variable `{name}` is already defined.")]
    AlreadyDefinedVariable {
        name: String,
        context: SourceContext,
    },
    #[error(
        "At {context}: Function `{function_name}` return type is {expected}, but there is no return statement inside it."
    )]
    NoReturn {
        expected: Type,
        function_name: String,
        context: SourceContext,
    },
    #[error("At {context}: {name} is not a function.")]
    NotFunctionCall {
        name: String,
        context: SourceContext,
    },
    #[error(
        "At {context}: Not enough arguments passed to the {function_name}. Required {parameters}, provided {arguments}."
    )]
    NotEnoughArguments {
        function_name: String,
        arguments: usize,
        parameters: usize,
        context: SourceContext,
    },
    #[error(
        "At {context}: Too many arguments passed to the {function_name}. Required {parameters}, provided {arguments}."
    )]
    TooManyArguments {
        function_name: String,
        arguments: usize,
        parameters: usize,
        context: SourceContext,
    },
    #[error("At {context}: Program has no `{name}` function to start from.")]
    MissingEntryPoint {
        name: String,
        context: SourceContext,
    },
}

fn render_combined(errors: &[TypecheckError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl TypecheckError {
    /// Aggregates independent errors. Nested aggregates are flattened, so the result lists every
    /// individual error once, in order.
    #[must_use]
    pub fn combine(errors: Vec<Self>) -> Self {
        let mut flattened = Vec::with_capacity(errors.len());

        for error in errors {
            match error {
                Self::Combined(inner) => flattened.extend(inner),
                other => flattened.push(other),
            }
        }

        Self::Combined(flattened)
    }

    /// The individual errors carried by this one.
    pub fn leaves(&self) -> std::slice::Iter<'_, Self> {
        match self {
            Self::Combined(errors) => errors.iter(),
            other => std::slice::from_ref(other).iter(),
        }
    }
}

pub type TypecheckResult = Result<Type, TypecheckError>;

/// A node that can be checked against an environment, which it may extend.
pub trait Typecheck {
    /// # Errors
    /// Returns the error found in this node, or every independent error for statement sequences
    fn typecheck(&self, environment: &mut Environment) -> TypecheckResult;
}

/// Checks a whole program in a fresh environment.
///
/// # Errors
/// Returns a `Combined` error holding every error found
pub fn type_check(program: &Program) -> TypecheckResult {
    program.typecheck(&mut Environment::new())
}

fn resolve_type(name: &TypeName, context: SourceContext) -> Result<Type, TypecheckError> {
    Type::from_name(name).ok_or_else(|| TypecheckError::UndefinedType {
        name: name.clone(),
        context,
    })
}

fn require_u8(r#type: Type, context: SourceContext) -> Result<(), TypecheckError> {
    require_type(&Type::U8, r#type, context)
}

fn require_type(
    expected: &Type,
    received: Type,
    context: SourceContext,
) -> Result<(), TypecheckError> {
    if *expected == received {
        Ok(())
    } else {
        Err(TypecheckError::TypeMismatch {
            expected: expected.clone(),
            received,
            context,
        })
    }
}

fn collect_errors(results: impl IntoIterator<Item = TypecheckResult>) -> TypecheckResult {
    let errors: Vec<_> = results.into_iter().filter_map(Result::err).collect();

    if errors.is_empty() {
        Ok(Type::Void)
    } else {
        Err(TypecheckError::combine(errors))
    }
}

impl Typecheck for Expression {
    fn typecheck(&self, environment: &mut Environment) -> TypecheckResult {
        match &self.kind {
            ExpressionKind::Unsignedint(_) => Ok(Type::U8),
            ExpressionKind::Bool(_) => Ok(Type::Bool),
            ExpressionKind::Identifier(name) => match environment.lookup(name) {
                // functions have no slot to read a value from
                Some((r#type, BindingKind::Function)) => {
                    Err(TypecheckError::ExpectedNumericalType {
                        received: r#type.clone(),
                        context: self.context,
                    })
                }
                _ => environment.get_variable_type(name, self.context),
            },
            ExpressionKind::Negation(operand) => {
                require_u8(operand.typecheck(environment)?, self.context)?;

                Ok(Type::U8)
            }
            ExpressionKind::Addition(lhs, rhs) | ExpressionKind::Subtraction(lhs, rhs) => {
                let lhs_type = lhs.typecheck(environment)?;
                let rhs_type = rhs.typecheck(environment)?;

                require_u8(lhs_type, lhs.context)?;
                require_u8(rhs_type, rhs.context)?;

                Ok(Type::U8)
            }
            ExpressionKind::Equal(lhs, rhs) | ExpressionKind::NotEqual(lhs, rhs) => {
                let lhs_type = lhs.typecheck(environment)?;
                let rhs_type = rhs.typecheck(environment)?;

                require_type(&lhs_type, rhs_type, rhs.context)?;

                Ok(Type::Bool)
            }
            ExpressionKind::FunctionCall { name, arguments } => {
                check_call(name, arguments, self.context, environment)
            }
        }
    }
}

fn check_call(
    name: &str,
    arguments: &[Expression],
    context: SourceContext,
    environment: &mut Environment,
) -> TypecheckResult {
    let signature = match environment.lookup(name) {
        Some((Type::Function(signature), BindingKind::Function)) => signature.clone(),
        _ => {
            return Err(TypecheckError::NotFunctionCall {
                name: name.to_string(),
                context,
            });
        }
    };

    let parameters = signature.parameter_types.len();
    if arguments.len() < parameters {
        return Err(TypecheckError::NotEnoughArguments {
            function_name: name.to_string(),
            arguments: arguments.len(),
            parameters,
            context,
        });
    }
    if arguments.len() > parameters {
        return Err(TypecheckError::TooManyArguments {
            function_name: name.to_string(),
            arguments: arguments.len(),
            parameters,
            context,
        });
    }

    for (argument, parameter_type) in arguments.iter().zip(&signature.parameter_types) {
        let argument_type = argument.typecheck(environment)?;
        require_type(parameter_type, argument_type, argument.context)?;
    }

    Ok(*signature.return_type)
}

impl Typecheck for Statement {
    fn typecheck(&self, environment: &mut Environment) -> TypecheckResult {
        match &self.kind {
            StatementKind::Expression(expression) => expression.typecheck(environment),
            StatementKind::Print(value) => {
                value.typecheck(environment)?;

                Ok(Type::Void)
            }
            StatementKind::Return(value) => {
                let value_type = value.typecheck(environment)?;

                if let Some(return_type) = environment.return_type() {
                    require_type(return_type, value_type, value.context)?;
                }

                Ok(Type::Void)
            }
            StatementKind::Assignment { name, rhs } => {
                let rhs_type = rhs.typecheck(environment)?;

                match environment.lookup(name) {
                    Some((_, BindingKind::Function)) => {
                        return Err(TypecheckError::AlreadyDefinedVariable {
                            name: name.clone(),
                            context: self.context,
                        });
                    }
                    Some((declared, BindingKind::Let | BindingKind::Parameter)) => {
                        require_type(declared, rhs_type, rhs.context)?;
                    }
                    Some((_, BindingKind::Assigned)) | None => {
                        environment.bind(name.clone(), rhs_type, BindingKind::Assigned);
                    }
                }

                Ok(Type::Void)
            }
            StatementKind::Let {
                name,
                declared_type,
                value,
            } => {
                let value_type = value.typecheck(environment)?;

                if environment.contains(name) {
                    return Err(TypecheckError::AlreadyDefinedVariable {
                        name: name.clone(),
                        context: self.context,
                    });
                }

                let declared = resolve_type(declared_type, self.context)?;
                require_type(&declared, value_type, value.context)?;
                environment.bind(name.clone(), declared, BindingKind::Let);

                Ok(Type::Void)
            }
            StatementKind::If { condition, body } => {
                let condition_result = condition
                    .typecheck(environment)
                    .and_then(|r#type| require_type(&Type::Bool, r#type, condition.context))
                    .map(|()| Type::Void);
                let body_result = body.typecheck(&mut environment.block_scope());

                collect_errors([condition_result, body_result])
            }
        }
    }
}

impl Typecheck for Block {
    fn typecheck(&self, environment: &mut Environment) -> TypecheckResult {
        let results: Vec<_> = self
            .statements
            .iter()
            .map(|statement| statement.typecheck(environment))
            .collect();

        collect_errors(results)
    }
}

fn signature_of(function: &Function) -> Result<FunctionSignature, TypecheckError> {
    let parameter_types = function
        .parameters
        .iter()
        .map(|parameter| resolve_type(&parameter.r#type, function.context))
        .collect::<Result<_, _>>()?;

    Ok(FunctionSignature::new(
        parameter_types,
        resolve_type(&function.return_type, function.context)?,
    ))
}

impl Typecheck for Function {
    fn typecheck(&self, environment: &mut Environment) -> TypecheckResult {
        trace!(name = %self.name, "type checking function");

        let mut errors = vec![];

        let return_type = match resolve_type(&self.return_type, self.context) {
            Ok(r#type) => Some(r#type),
            Err(error) => {
                errors.push(error);
                None
            }
        };
        let mut scope = environment.function_scope(return_type.clone());

        let mut seen = HashSet::new();
        for parameter in &self.parameters {
            if !seen.insert(parameter.name.as_str()) {
                errors.push(TypecheckError::AlreadyDefinedVariable {
                    name: parameter.name.clone(),
                    context: self.context,
                });
                continue;
            }

            match resolve_type(&parameter.r#type, self.context) {
                Ok(r#type) => scope.bind(parameter.name.clone(), r#type, BindingKind::Parameter),
                Err(error) => errors.push(error),
            }
        }

        if let Err(error) = self.body.typecheck(&mut scope) {
            errors.push(error);
        }

        match return_type {
            Some(Type::Void) | None => {}
            Some(expected) => {
                if !self.body.contains_return() {
                    errors.push(TypecheckError::NoReturn {
                        expected,
                        function_name: self.name.clone(),
                        context: self.context,
                    });
                }
            }
        }

        collect_errors(errors.into_iter().map(Err))
    }
}

impl Typecheck for Program {
    fn typecheck(&self, environment: &mut Environment) -> TypecheckResult {
        let mut errors = vec![];

        for function in &self.functions {
            if environment.contains(&function.name) {
                errors.push(TypecheckError::AlreadyDefinedVariable {
                    name: function.name.clone(),
                    context: function.context,
                });
                continue;
            }

            // An unresolvable signature is reported when the function itself is checked.
            if let Ok(signature) = signature_of(function) {
                environment.bind(
                    function.name.clone(),
                    Type::Function(signature),
                    BindingKind::Function,
                );
            }
        }

        for function in &self.functions {
            if let Err(error) = function.typecheck(environment) {
                errors.push(error);
            }
        }

        if !self.functions.iter().any(|function| function.name == ENTRY_POINT) {
            errors.push(TypecheckError::MissingEntryPoint {
                name: ENTRY_POINT.to_string(),
                context: self.context,
            });
        }

        collect_errors(errors.into_iter().map(Err))
    }
}
