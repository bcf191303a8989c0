//! Builders for tokens and nodes that do not care about their position. Every token and node gets
//! `TEST_CONTEXT`, so parsed trees compare equal to hand-built ones.
#![allow(dead_code)]

use zx64c_compiler_lib::{
    parser::ast::{
        Block, Expression, ExpressionKind, Function, Parameter, Program, Statement, StatementKind,
        TypeName,
    },
    token::{SourceContext, Token, TokenCategory},
};

pub const TEST_CONTEXT: SourceContext = SourceContext::new(0, 0);

pub fn token(category: TokenCategory) -> Token {
    Token::new(0, 0, category, "")
}

pub fn token_with_lexeme(category: TokenCategory, lexeme: &str) -> Token {
    Token::new(0, 0, category, lexeme)
}

pub fn tokens_inside_main(body: impl IntoIterator<Item = Token>) -> Vec<Token> {
    let mut tokens = vec![
        token(TokenCategory::Def),
        token_with_lexeme(TokenCategory::Identifier, "main"),
        token(TokenCategory::LeftParen),
        token(TokenCategory::RightParen),
        token(TokenCategory::Arrow),
        token_with_lexeme(TokenCategory::Identifier, "void"),
        token(TokenCategory::Colon),
        token(TokenCategory::Newline),
        token(TokenCategory::Indent),
    ];
    tokens.extend(body);
    tokens.push(token(TokenCategory::Dedent));
    tokens.push(token(TokenCategory::Eof));

    tokens
}

pub fn program_inside_main(statements: Vec<Statement>) -> Program {
    program(vec![function("main", vec![], "void", statements)])
}

pub fn program(functions: Vec<Function>) -> Program {
    Program {
        functions,
        context: TEST_CONTEXT,
    }
}

pub fn function(
    name: &str,
    parameters: Vec<(&str, &str)>,
    return_type: &str,
    statements: Vec<Statement>,
) -> Function {
    Function {
        name: name.to_string(),
        parameters: parameters
            .into_iter()
            .map(|(name, r#type)| Parameter {
                name: name.to_string(),
                r#type: TypeName::from(r#type),
            })
            .collect(),
        return_type: TypeName::from(return_type),
        body: block(statements),
        context: TEST_CONTEXT,
    }
}

pub fn block(statements: Vec<Statement>) -> Block {
    Block {
        statements,
        context: TEST_CONTEXT,
    }
}

fn statement(kind: StatementKind) -> Statement {
    Statement::new(kind, TEST_CONTEXT)
}

pub fn print(value: Expression) -> Statement {
    statement(StatementKind::Print(value))
}

pub fn ret(value: Expression) -> Statement {
    statement(StatementKind::Return(value))
}

pub fn assignment(name: &str, rhs: Expression) -> Statement {
    statement(StatementKind::Assignment {
        name: name.to_string(),
        rhs,
    })
}

pub fn let_(name: &str, declared_type: &str, value: Expression) -> Statement {
    statement(StatementKind::Let {
        name: name.to_string(),
        declared_type: TypeName::from(declared_type),
        value,
    })
}

pub fn if_(condition: Expression, statements: Vec<Statement>) -> Statement {
    statement(StatementKind::If {
        condition,
        body: block(statements),
    })
}

pub fn expression_statement(expression: Expression) -> Statement {
    statement(StatementKind::Expression(expression))
}

fn expression(kind: ExpressionKind) -> Expression {
    Expression::new(kind, TEST_CONTEXT)
}

pub fn unsignedint(value: u8) -> Expression {
    expression(ExpressionKind::Unsignedint(value))
}

pub fn boolean(value: bool) -> Expression {
    expression(ExpressionKind::Bool(value))
}

pub fn identifier(name: &str) -> Expression {
    expression(ExpressionKind::Identifier(name.to_string()))
}

pub fn identifier_at(name: &str, context: SourceContext) -> Expression {
    Expression::new(ExpressionKind::Identifier(name.to_string()), context)
}

pub fn negation(operand: Expression) -> Expression {
    expression(ExpressionKind::Negation(Box::new(operand)))
}

pub fn addition(lhs: Expression, rhs: Expression) -> Expression {
    expression(ExpressionKind::Addition(Box::new(lhs), Box::new(rhs)))
}

pub fn subtraction(lhs: Expression, rhs: Expression) -> Expression {
    expression(ExpressionKind::Subtraction(Box::new(lhs), Box::new(rhs)))
}

pub fn equal(lhs: Expression, rhs: Expression) -> Expression {
    expression(ExpressionKind::Equal(Box::new(lhs), Box::new(rhs)))
}

pub fn not_equal(lhs: Expression, rhs: Expression) -> Expression {
    expression(ExpressionKind::NotEqual(Box::new(lhs), Box::new(rhs)))
}

pub fn call(name: &str, arguments: Vec<Expression>) -> Expression {
    expression(ExpressionKind::FunctionCall {
        name: name.to_string(),
        arguments,
    })
}
