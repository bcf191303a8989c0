pub mod ast;

use thiserror::Error;
use tracing::{debug, trace};

use crate::token::{SourceContext, Token, TokenCategory};
use ast::{
    Block, Expression, ExpressionKind, Function, Parameter, Program, Statement, StatementKind,
    TypeName,
};

const EXPRESSION_START: [TokenCategory; 6] = [
    TokenCategory::Minus,
    TokenCategory::UnsignedInt,
    TokenCategory::True,
    TokenCategory::False,
    TokenCategory::Identifier,
    TokenCategory::LeftParen,
];

const STATEMENT_START: [TokenCategory; 10] = [
    TokenCategory::Let,
    TokenCategory::If,
    TokenCategory::Return,
    TokenCategory::Print,
    TokenCategory::Identifier,
    TokenCategory::Minus,
    TokenCategory::UnsignedInt,
    TokenCategory::True,
    TokenCategory::False,
    TokenCategory::LeftParen,
];

#[derive(Debug, Error, PartialEq, Eq)]
#[error("At {context}: Expected {}. Received {got}.", describe_expected(.expected))]
pub struct UnexpectedTokenError {
    pub expected: Vec<TokenCategory>,
    pub got: TokenCategory,
    pub context: SourceContext,
}

impl UnexpectedTokenError {
    #[must_use]
    pub fn new(expected: &[TokenCategory], got: TokenCategory, context: SourceContext) -> Self {
        Self {
            expected: expected.to_vec(),
            got,
            context,
        }
    }
}

fn describe_expected(expected: &[TokenCategory]) -> String {
    let names: Vec<_> = expected.iter().map(ToString::to_string).collect();

    match names.as_slice() {
        [single] => single.clone(),
        _ => format!("one of {}", names.join(", ")),
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error(transparent)]
    UnexpectedToken(#[from] UnexpectedTokenError),
    #[error("At {context}: Integer literal {lexeme} does not fit in u8.")]
    IntegerOutOfRange {
        lexeme: String,
        context: SourceContext,
    },
}

/// # Errors
/// Returns an error on the first token the grammar does not allow at its position
pub fn parse(tokens: &[Token]) -> Result<Program, ParseError> {
    let program = Parser::new(tokens).parse_program()?;

    debug!(functions = program.functions.len(), "parsed program");

    Ok(program)
}

struct Parser<'tokens> {
    tokens: &'tokens [Token],
    position: usize,
}

impl<'tokens> Parser<'tokens> {
    const fn new(tokens: &'tokens [Token]) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    fn current(&self) -> Option<&'tokens Token> {
        self.tokens.get(self.position)
    }

    fn current_category(&self) -> TokenCategory {
        self.current()
            .map_or(TokenCategory::Eof, |token| token.category)
    }

    fn next_category(&self) -> TokenCategory {
        self.tokens
            .get(self.position + 1)
            .map_or(TokenCategory::Eof, |token| token.category)
    }

    fn current_context(&self) -> SourceContext {
        self.current()
            .or_else(|| self.tokens.last())
            .map(Token::context)
            .unwrap_or_default()
    }

    fn is_at(&self, category: TokenCategory) -> bool {
        self.current_category() == category
    }

    fn unexpected(&self, expected: &[TokenCategory]) -> ParseError {
        UnexpectedTokenError::new(expected, self.current_category(), self.current_context()).into()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn expect(&mut self, category: TokenCategory) -> Result<&'tokens Token, ParseError> {
        match self.current() {
            Some(token) if token.category == category => {
                self.position += 1;
                Ok(token)
            }
            _ => Err(self.unexpected(&[category])),
        }
    }

    fn parse_program(&mut self) -> Result<Program, ParseError> {
        let context = self.current_context();
        let mut functions = vec![];

        while self.is_at(TokenCategory::Def) {
            functions.push(self.parse_function()?);
        }

        if !self.is_at(TokenCategory::Eof) {
            return Err(self.unexpected(&[TokenCategory::Def, TokenCategory::Eof]));
        }

        Ok(Program { functions, context })
    }

    fn parse_function(&mut self) -> Result<Function, ParseError> {
        let context = self.expect(TokenCategory::Def)?.context();
        let name = self.expect(TokenCategory::Identifier)?.lexeme.clone();

        trace!(%name, "parsing function");

        self.expect(TokenCategory::LeftParen)?;
        let parameters = match self.current_category() {
            TokenCategory::Identifier => self.parse_parameters()?,
            TokenCategory::RightParen => vec![],
            _ => {
                return Err(
                    self.unexpected(&[TokenCategory::Identifier, TokenCategory::RightParen])
                );
            }
        };
        self.expect(TokenCategory::RightParen)?;

        self.expect(TokenCategory::Arrow)?;
        let return_type = self.parse_type_name()?;
        self.expect(TokenCategory::Colon)?;
        self.expect(TokenCategory::Newline)?;
        let body = self.parse_block()?;

        Ok(Function {
            name,
            parameters,
            return_type,
            body,
            context,
        })
    }

    fn parse_parameters(&mut self) -> Result<Vec<Parameter>, ParseError> {
        let mut parameters = vec![self.parse_parameter()?];

        loop {
            match self.current_category() {
                TokenCategory::Comma => {
                    self.advance();
                    parameters.push(self.parse_parameter()?);
                }
                TokenCategory::RightParen => return Ok(parameters),
                _ => {
                    return Err(self.unexpected(&[TokenCategory::Comma, TokenCategory::RightParen]));
                }
            }
        }
    }

    fn parse_parameter(&mut self) -> Result<Parameter, ParseError> {
        let name = self.expect(TokenCategory::Identifier)?.lexeme.clone();
        self.expect(TokenCategory::Colon)?;
        let r#type = self.parse_type_name()?;

        Ok(Parameter { name, r#type })
    }

    fn parse_type_name(&mut self) -> Result<TypeName, ParseError> {
        Ok(TypeName(
            self.expect(TokenCategory::Identifier)?.lexeme.clone(),
        ))
    }

    fn parse_block(&mut self) -> Result<Block, ParseError> {
        let context = self.expect(TokenCategory::Indent)?.context();
        let mut statements = vec![self.parse_statement()?];

        while !self.is_at(TokenCategory::Dedent) {
            statements.push(self.parse_statement()?);
        }
        self.expect(TokenCategory::Dedent)?;

        Ok(Block {
            statements,
            context,
        })
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let context = self.current_context();

        let kind = match self.current_category() {
            TokenCategory::If => return self.parse_if(),
            TokenCategory::Let => self.parse_let()?,
            TokenCategory::Return => {
                self.advance();
                StatementKind::Return(self.parse_expression()?)
            }
            TokenCategory::Print => {
                self.advance();
                self.expect(TokenCategory::LeftParen)?;
                let value = self.parse_expression()?;
                self.expect(TokenCategory::RightParen)?;

                StatementKind::Print(value)
            }
            TokenCategory::Identifier if self.next_category() == TokenCategory::Assign => {
                let name = self.expect(TokenCategory::Identifier)?.lexeme.clone();
                self.expect(TokenCategory::Assign)?;

                StatementKind::Assignment {
                    name,
                    rhs: self.parse_expression()?,
                }
            }
            category if EXPRESSION_START.contains(&category) => {
                StatementKind::Expression(self.parse_expression()?)
            }
            _ => return Err(self.unexpected(&STATEMENT_START)),
        };
        self.expect(TokenCategory::Newline)?;

        Ok(Statement::new(kind, context))
    }

    fn parse_if(&mut self) -> Result<Statement, ParseError> {
        let context = self.expect(TokenCategory::If)?.context();
        let condition = self.parse_expression()?;
        self.expect(TokenCategory::Colon)?;
        self.expect(TokenCategory::Newline)?;
        let body = self.parse_block()?;

        Ok(Statement::new(StatementKind::If { condition, body }, context))
    }

    fn parse_let(&mut self) -> Result<StatementKind, ParseError> {
        self.expect(TokenCategory::Let)?;
        let name = self.expect(TokenCategory::Identifier)?.lexeme.clone();
        self.expect(TokenCategory::Colon)?;
        let declared_type = self.parse_type_name()?;
        self.expect(TokenCategory::Assign)?;
        let value = self.parse_expression()?;

        Ok(StatementKind::Let {
            name,
            declared_type,
            value,
        })
    }

    // Operator chains fold to the right: `a == b != c` is `Equal(a, NotEqual(b, c))`.
    fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        let lhs = self.parse_additive()?;

        let make = match self.current_category() {
            TokenCategory::Equal => ExpressionKind::Equal,
            TokenCategory::NotEqual => ExpressionKind::NotEqual,
            _ => return Ok(lhs),
        };
        self.advance();
        let rhs = self.parse_expression()?;

        Ok(Expression::binary(make, lhs, rhs))
    }

    fn parse_additive(&mut self) -> Result<Expression, ParseError> {
        let lhs = self.parse_unary()?;

        let make = match self.current_category() {
            TokenCategory::Plus => ExpressionKind::Addition,
            TokenCategory::Minus => ExpressionKind::Subtraction,
            _ => return Ok(lhs),
        };
        self.advance();
        let rhs = self.parse_additive()?;

        Ok(Expression::binary(make, lhs, rhs))
    }

    fn parse_unary(&mut self) -> Result<Expression, ParseError> {
        if self.is_at(TokenCategory::Minus) {
            let context = self.current_context();
            self.advance();
            let operand = self.parse_unary()?;

            return Ok(Expression::new(
                ExpressionKind::Negation(Box::new(operand)),
                context,
            ));
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        let Some(token) = self.current() else {
            return Err(self.unexpected(&EXPRESSION_START));
        };
        let context = token.context();

        let kind = match token.category {
            TokenCategory::UnsignedInt => {
                let value = token
                    .lexeme
                    .parse()
                    .map_err(|_| ParseError::IntegerOutOfRange {
                        lexeme: token.lexeme.clone(),
                        context,
                    })?;
                self.advance();

                ExpressionKind::Unsignedint(value)
            }
            TokenCategory::True | TokenCategory::False => {
                self.advance();

                ExpressionKind::Bool(token.category == TokenCategory::True)
            }
            TokenCategory::Identifier => {
                self.advance();

                if self.is_at(TokenCategory::LeftParen) {
                    self.advance();

                    ExpressionKind::FunctionCall {
                        name: token.lexeme.clone(),
                        arguments: self.parse_arguments()?,
                    }
                } else {
                    ExpressionKind::Identifier(token.lexeme.clone())
                }
            }
            TokenCategory::LeftParen => {
                self.advance();
                let mut inner = self.parse_expression()?;
                self.expect(TokenCategory::RightParen)?;
                inner.context = context;

                return Ok(inner);
            }
            _ => return Err(self.unexpected(&EXPRESSION_START)),
        };

        Ok(Expression::new(kind, context))
    }

    /// Parses call arguments up to and including the closing parenthesis.
    fn parse_arguments(&mut self) -> Result<Vec<Expression>, ParseError> {
        let mut arguments = vec![];

        if self.is_at(TokenCategory::RightParen) {
            self.advance();
            return Ok(arguments);
        }

        loop {
            arguments.push(self.parse_expression()?);

            match self.current_category() {
                TokenCategory::Comma => {
                    self.advance();
                }
                TokenCategory::RightParen => {
                    self.advance();
                    return Ok(arguments);
                }
                _ => {
                    return Err(self.unexpected(&[TokenCategory::Comma, TokenCategory::RightParen]));
                }
            }
        }
    }
}
