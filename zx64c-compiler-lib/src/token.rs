use std::fmt::Display;

/// Position of the first character of a token, or of the first token of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceContext {
    pub line: u32,
    pub column: u32,
}

impl SourceContext {
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl Display for SourceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenCategory {
    Def,
    Let,
    If,
    Print,
    Return,
    True,
    False,

    LeftParen,
    RightParen,
    Colon,
    Comma,
    Arrow,
    Assign,
    Plus,
    Minus,
    Equal,
    NotEqual,

    Identifier,
    UnsignedInt,

    Newline,
    Indent,
    Dedent,
    Eof,
}

impl TokenCategory {
    #[must_use]
    pub fn keyword(word: &str) -> Option<Self> {
        match word {
            "def" => Some(Self::Def),
            "let" => Some(Self::Let),
            "if" => Some(Self::If),
            "print" => Some(Self::Print),
            "return" => Some(Self::Return),
            "true" => Some(Self::True),
            "false" => Some(Self::False),
            _ => None,
        }
    }
}

impl Display for TokenCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Def => "DEF",
            Self::Let => "LET",
            Self::If => "IF",
            Self::Print => "PRINT",
            Self::Return => "RETURN",
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::LeftParen => "LEFT_PAREN",
            Self::RightParen => "RIGHT_PAREN",
            Self::Colon => "COLON",
            Self::Comma => "COMMA",
            Self::Arrow => "ARROW",
            Self::Assign => "ASSIGN",
            Self::Plus => "PLUS",
            Self::Minus => "MINUS",
            Self::Equal => "EQUAL",
            Self::NotEqual => "NOT_EQUAL",
            Self::Identifier => "IDENTIFIER",
            Self::UnsignedInt => "UNSIGNEDINT",
            Self::Newline => "NEWLINE",
            Self::Indent => "INDENT",
            Self::Dedent => "DEDENT",
            Self::Eof => "EOF",
        };

        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub line: u32,
    pub column: u32,
    pub category: TokenCategory,
    pub lexeme: String,
}

impl Token {
    #[must_use]
    pub fn new(line: u32, column: u32, category: TokenCategory, lexeme: impl Into<String>) -> Self {
        Self {
            line,
            column,
            category,
            lexeme: lexeme.into(),
        }
    }

    #[must_use]
    pub const fn context(&self) -> SourceContext {
        SourceContext::new(self.line, self.column)
    }
}
