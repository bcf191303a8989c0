mod common;

use common::{
    TEST_CONTEXT, addition, assignment, boolean, call, equal, expression_statement, function,
    identifier, if_, let_, negation, not_equal, print, program, program_inside_main, ret,
    subtraction, token, token_with_lexeme, tokens_inside_main, unsignedint,
};
use zx64c_compiler_lib::{
    parser::{
        self, ParseError, UnexpectedTokenError,
        ast::{ExpressionKind, StatementKind},
    },
    token::{SourceContext, Token, TokenCategory},
};

fn main_header(parameters: Vec<Token>, return_type: &str) -> Vec<Token> {
    let mut tokens = vec![
        token(TokenCategory::Def),
        token_with_lexeme(TokenCategory::Identifier, "main"),
        token(TokenCategory::LeftParen),
    ];
    tokens.extend(parameters);
    tokens.extend([
        token(TokenCategory::RightParen),
        token(TokenCategory::Arrow),
        token_with_lexeme(TokenCategory::Identifier, return_type),
        token(TokenCategory::Colon),
        token(TokenCategory::Newline),
    ]);

    tokens
}

fn body_with_single_literal() -> Vec<Token> {
    vec![
        token(TokenCategory::Indent),
        token_with_lexeme(TokenCategory::UnsignedInt, "1"),
        token(TokenCategory::Newline),
        token(TokenCategory::Dedent),
        token(TokenCategory::Eof),
    ]
}

fn assignment_of(rhs: Vec<Token>) -> Vec<Token> {
    let mut body = vec![
        token_with_lexeme(TokenCategory::Identifier, "x"),
        token(TokenCategory::Assign),
    ];
    body.extend(rhs);
    body.push(token(TokenCategory::Newline));

    tokens_inside_main(body)
}

#[test]
fn parsing_print_unsignedint() {
    let tokens = tokens_inside_main([
        token(TokenCategory::Print),
        token(TokenCategory::LeftParen),
        token_with_lexeme(TokenCategory::UnsignedInt, "10"),
        token(TokenCategory::RightParen),
        token(TokenCategory::Newline),
    ]);

    let ast = parser::parse(&tokens).unwrap();

    assert_eq!(program_inside_main(vec![print(unsignedint(10))]), ast);
}

#[test]
fn parsing_function_without_parameters() {
    let mut tokens = main_header(vec![], "void");
    tokens.extend(body_with_single_literal());

    let ast = parser::parse(&tokens).unwrap();

    assert_eq!(
        program(vec![function(
            "main",
            vec![],
            "void",
            vec![expression_statement(unsignedint(1))]
        )]),
        ast
    );
}

#[test]
fn parsing_function_with_one_parameter() {
    let mut tokens = main_header(
        vec![
            token_with_lexeme(TokenCategory::Identifier, "x"),
            token(TokenCategory::Colon),
            token_with_lexeme(TokenCategory::Identifier, "u8"),
        ],
        "void",
    );
    tokens.extend(body_with_single_literal());

    let ast = parser::parse(&tokens).unwrap();

    assert_eq!(
        program(vec![function(
            "main",
            vec![("x", "u8")],
            "void",
            vec![expression_statement(unsignedint(1))]
        )]),
        ast
    );
}

#[test]
fn parsing_function_with_two_parameters() {
    let mut tokens = main_header(
        vec![
            token_with_lexeme(TokenCategory::Identifier, "x"),
            token(TokenCategory::Colon),
            token_with_lexeme(TokenCategory::Identifier, "u8"),
            token(TokenCategory::Comma),
            token_with_lexeme(TokenCategory::Identifier, "y"),
            token(TokenCategory::Colon),
            token_with_lexeme(TokenCategory::Identifier, "bool"),
        ],
        "u8",
    );
    tokens.extend(body_with_single_literal());

    let ast = parser::parse(&tokens).unwrap();

    assert_eq!(
        program(vec![function(
            "main",
            vec![("x", "u8"), ("y", "bool")],
            "u8",
            vec![expression_statement(unsignedint(1))]
        )]),
        ast
    );
}

#[test]
fn parsing_let_unsignedint() {
    let tokens = tokens_inside_main([
        token(TokenCategory::Let),
        token_with_lexeme(TokenCategory::Identifier, "x"),
        token(TokenCategory::Colon),
        token_with_lexeme(TokenCategory::Identifier, "u8"),
        token(TokenCategory::Assign),
        token_with_lexeme(TokenCategory::UnsignedInt, "10"),
        token(TokenCategory::Newline),
    ]);

    let ast = parser::parse(&tokens).unwrap();

    assert_eq!(
        program_inside_main(vec![let_("x", "u8", unsignedint(10))]),
        ast
    );
}

#[test]
fn parsing_assignment_of_literals() {
    let cases = [
        (
            token_with_lexeme(TokenCategory::UnsignedInt, "10"),
            unsignedint(10),
        ),
        (token(TokenCategory::True), boolean(true)),
        (token(TokenCategory::False), boolean(false)),
        (
            token_with_lexeme(TokenCategory::Identifier, "y"),
            identifier("y"),
        ),
    ];

    for (rhs, expected) in cases {
        let ast = parser::parse(&assignment_of(vec![rhs])).unwrap();

        assert_eq!(program_inside_main(vec![assignment("x", expected)]), ast);
    }
}

#[test]
fn parsing_assignment_negated_unsignedint() {
    let tokens = assignment_of(vec![
        token(TokenCategory::Minus),
        token_with_lexeme(TokenCategory::UnsignedInt, "10"),
    ]);

    let ast = parser::parse(&tokens).unwrap();

    assert_eq!(
        program_inside_main(vec![assignment("x", negation(unsignedint(10)))]),
        ast
    );
}

#[test]
fn parsing_assignment_arithmetic_expression() {
    let tokens = assignment_of(vec![
        token_with_lexeme(TokenCategory::UnsignedInt, "10"),
        token(TokenCategory::Plus),
        token_with_lexeme(TokenCategory::Identifier, "y"),
    ]);

    let ast = parser::parse(&tokens).unwrap();

    assert_eq!(
        program_inside_main(vec![assignment(
            "x",
            addition(unsignedint(10), identifier("y"))
        )]),
        ast
    );
}

#[test]
fn parsing_assignment_parenthesized_arithmetic_expression() {
    let tokens = assignment_of(vec![
        token_with_lexeme(TokenCategory::UnsignedInt, "10"),
        token(TokenCategory::Plus),
        token(TokenCategory::LeftParen),
        token_with_lexeme(TokenCategory::Identifier, "y"),
        token(TokenCategory::Plus),
        token_with_lexeme(TokenCategory::UnsignedInt, "20"),
        token(TokenCategory::RightParen),
    ]);

    let ast = parser::parse(&tokens).unwrap();

    assert_eq!(
        program_inside_main(vec![assignment(
            "x",
            addition(unsignedint(10), addition(identifier("y"), unsignedint(20)))
        )]),
        ast
    );
}

#[test]
fn operator_chains_nest_to_the_right() {
    let tokens = assignment_of(vec![
        token_with_lexeme(TokenCategory::UnsignedInt, "1"),
        token(TokenCategory::Minus),
        token_with_lexeme(TokenCategory::UnsignedInt, "2"),
        token(TokenCategory::Plus),
        token_with_lexeme(TokenCategory::UnsignedInt, "3"),
        token(TokenCategory::Equal),
        token_with_lexeme(TokenCategory::Identifier, "a"),
        token(TokenCategory::NotEqual),
        token(TokenCategory::True),
    ]);

    let ast = parser::parse(&tokens).unwrap();

    assert_eq!(
        program_inside_main(vec![assignment(
            "x",
            equal(
                subtraction(unsignedint(1), addition(unsignedint(2), unsignedint(3))),
                not_equal(identifier("a"), boolean(true))
            )
        )]),
        ast
    );
}

#[test]
fn parsing_function_call() {
    let tokens = assignment_of(vec![
        token_with_lexeme(TokenCategory::Identifier, "f"),
        token(TokenCategory::LeftParen),
        token_with_lexeme(TokenCategory::UnsignedInt, "1"),
        token(TokenCategory::Comma),
        token_with_lexeme(TokenCategory::Identifier, "y"),
        token(TokenCategory::RightParen),
    ]);

    let ast = parser::parse(&tokens).unwrap();

    assert_eq!(
        program_inside_main(vec![assignment(
            "x",
            call("f", vec![unsignedint(1), identifier("y")])
        )]),
        ast
    );
}

#[test]
fn parsing_call_without_arguments_as_statement() {
    let tokens = tokens_inside_main([
        token_with_lexeme(TokenCategory::Identifier, "f"),
        token(TokenCategory::LeftParen),
        token(TokenCategory::RightParen),
        token(TokenCategory::Newline),
    ]);

    let ast = parser::parse(&tokens).unwrap();

    assert_eq!(
        program_inside_main(vec![expression_statement(call("f", vec![]))]),
        ast
    );
}

#[test]
fn parsing_return_statement() {
    let tokens = tokens_inside_main([
        token(TokenCategory::Return),
        token_with_lexeme(TokenCategory::Identifier, "x"),
        token(TokenCategory::Newline),
    ]);

    let ast = parser::parse(&tokens).unwrap();

    assert_eq!(program_inside_main(vec![ret(identifier("x"))]), ast);
}

#[test]
fn parsing_if_statement() {
    let tokens = tokens_inside_main([
        token(TokenCategory::If),
        token(TokenCategory::True),
        token(TokenCategory::Colon),
        token(TokenCategory::Newline),
        token(TokenCategory::Indent),
        token_with_lexeme(TokenCategory::Identifier, "y"),
        token(TokenCategory::Newline),
        token(TokenCategory::Dedent),
    ]);

    let ast = parser::parse(&tokens).unwrap();

    assert_eq!(
        program_inside_main(vec![if_(
            boolean(true),
            vec![expression_statement(identifier("y"))]
        )]),
        ast
    );
}

#[test]
fn parsing_is_deterministic() {
    let tokens = assignment_of(vec![
        token_with_lexeme(TokenCategory::UnsignedInt, "1"),
        token(TokenCategory::Plus),
        token_with_lexeme(TokenCategory::UnsignedInt, "2"),
    ]);

    assert_eq!(
        parser::parse(&tokens).unwrap(),
        parser::parse(&tokens).unwrap()
    );
}

#[test]
fn parser_fails_on_missing_indent() {
    let mut tokens = tokens_inside_main([
        token(TokenCategory::If),
        token(TokenCategory::True),
        token(TokenCategory::Colon),
        token(TokenCategory::Newline),
        token(TokenCategory::Identifier),
    ]);
    tokens.truncate(tokens.len() - 2);

    let error = parser::parse(&tokens).unwrap_err();

    assert_eq!(
        ParseError::UnexpectedToken(UnexpectedTokenError::new(
            &[TokenCategory::Indent],
            TokenCategory::Identifier,
            TEST_CONTEXT
        )),
        error
    );
    assert_eq!(
        "At line 0, column 0: Expected INDENT. Received IDENTIFIER.",
        error.to_string()
    );
}

#[test]
fn parser_reports_position_of_offending_token() {
    let tokens = vec![Token::new(3, 7, TokenCategory::Let, "let")];

    let error = parser::parse(&tokens).unwrap_err();

    assert_eq!(
        ParseError::UnexpectedToken(UnexpectedTokenError::new(
            &[TokenCategory::Def, TokenCategory::Eof],
            TokenCategory::Let,
            SourceContext::new(3, 7)
        )),
        error
    );
    assert_eq!(
        "At line 3, column 7: Expected one of DEF, EOF. Received LET.",
        error.to_string()
    );
}

#[test]
fn block_requires_a_statement() {
    let tokens = tokens_inside_main([]);

    let error = parser::parse(&tokens).unwrap_err();

    assert_eq!(
        ParseError::UnexpectedToken(UnexpectedTokenError::new(
            &[
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
            ],
            TokenCategory::Dedent,
            TEST_CONTEXT
        )),
        error
    );
}

#[test]
fn unclosed_parameter_list_lists_both_continuations() {
    let tokens = vec![
        token(TokenCategory::Def),
        token_with_lexeme(TokenCategory::Identifier, "main"),
        token(TokenCategory::LeftParen),
        token_with_lexeme(TokenCategory::Identifier, "x"),
        token(TokenCategory::Colon),
        token_with_lexeme(TokenCategory::Identifier, "u8"),
        token(TokenCategory::Arrow),
    ];

    let error = parser::parse(&tokens).unwrap_err();

    assert_eq!(
        ParseError::UnexpectedToken(UnexpectedTokenError::new(
            &[TokenCategory::Comma, TokenCategory::RightParen],
            TokenCategory::Arrow,
            TEST_CONTEXT
        )),
        error
    );
}

#[test]
fn literal_above_u8_is_rejected() {
    let tokens = assignment_of(vec![token_with_lexeme(TokenCategory::UnsignedInt, "256")]);

    assert_eq!(
        ParseError::IntegerOutOfRange {
            lexeme: "256".to_string(),
            context: TEST_CONTEXT,
        },
        parser::parse(&tokens).unwrap_err()
    );
}

#[test]
fn empty_program_parses() {
    let ast = parser::parse(&[token(TokenCategory::Eof)]).unwrap();

    assert_eq!(program(vec![]), ast);
}

#[test]
fn parenthesized_expression_starts_at_its_parenthesis() {
    let tokens = tokens_inside_main([
        Token::new(2, 5, TokenCategory::LeftParen, "("),
        Token::new(2, 6, TokenCategory::UnsignedInt, "1"),
        Token::new(2, 7, TokenCategory::RightParen, ")"),
        Token::new(2, 9, TokenCategory::Plus, "+"),
        Token::new(2, 11, TokenCategory::UnsignedInt, "2"),
        Token::new(2, 12, TokenCategory::Newline, ""),
    ]);

    let program = parser::parse(&tokens).unwrap();

    let statement = &program.functions[0].body.statements[0];
    let StatementKind::Expression(sum) = &statement.kind else {
        panic!("expected an expression statement, got {statement:?}");
    };
    let ExpressionKind::Addition(lhs, rhs) = &sum.kind else {
        panic!("expected an addition, got {sum:?}");
    };
    assert_eq!(SourceContext::new(2, 5), sum.context);
    assert_eq!(SourceContext::new(2, 5), lhs.context);
    assert_eq!(SourceContext::new(2, 11), rhs.context);
}
