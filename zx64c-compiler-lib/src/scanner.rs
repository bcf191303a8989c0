//! Turns source text into the token stream the parser consumes.
//!
//! Indentation is resolved here: a deeper line opens a block with one `INDENT`, a shallower one
//! closes every block it leaves with a `DEDENT`. Blank and comment-only lines produce no tokens.

use std::iter::Peekable;

use thiserror::Error;
use tracing::debug;

use crate::token::{SourceContext, Token, TokenCategory};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScanError {
    #[error("At {0}: Unexpected character `{1}`.")]
    UnexpectedCharacter(SourceContext, char),
    #[error("At {0}: Tabs are not allowed in indentation.")]
    TabIndentation(SourceContext),
    #[error("At {0}: Unindent does not match any outer indentation level.")]
    InconsistentDedent(SourceContext),
}

/// # Errors
/// Returns an error on characters outside the language and on malformed indentation
pub fn scan(source: &str) -> Result<Vec<Token>, ScanError> {
    let mut tokens = Vec::new();
    let mut indentation_levels = vec![0usize];
    let mut last_line = 0;

    for (index, raw_line) in source.lines().enumerate() {
        let line_number = u32::try_from(index + 1).unwrap_or(u32::MAX);
        last_line = line_number;

        let code = raw_line.split('#').next().unwrap_or_default();
        if code.trim().is_empty() {
            continue;
        }

        let width = indentation_width(code, line_number)?;
        resolve_indentation(&mut tokens, &mut indentation_levels, width, line_number)?;
        scan_line(&mut tokens, code, width, line_number)?;
        tokens.push(Token::new(
            line_number,
            column_of(code.trim_end().len()),
            TokenCategory::Newline,
            "",
        ));
    }

    let end_line = last_line.saturating_add(1);
    while indentation_levels.len() > 1 {
        indentation_levels.pop();
        tokens.push(Token::new(end_line, 1, TokenCategory::Dedent, ""));
    }
    tokens.push(Token::new(end_line, 1, TokenCategory::Eof, ""));

    debug!(count = tokens.len(), "scanned tokens");

    Ok(tokens)
}

fn column_of(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

fn indentation_width(code: &str, line: u32) -> Result<usize, ScanError> {
    let mut width = 0;

    for character in code.chars() {
        match character {
            ' ' => width += 1,
            '\t' => {
                return Err(ScanError::TabIndentation(SourceContext::new(
                    line,
                    column_of(width),
                )));
            }
            _ => break,
        }
    }

    Ok(width)
}

fn resolve_indentation(
    tokens: &mut Vec<Token>,
    levels: &mut Vec<usize>,
    width: usize,
    line: u32,
) -> Result<(), ScanError> {
    let current = levels.last().copied().unwrap_or_default();

    if width > current {
        levels.push(width);
        tokens.push(Token::new(line, 1, TokenCategory::Indent, ""));
        return Ok(());
    }

    while levels.last().is_some_and(|&level| level > width) {
        levels.pop();
        tokens.push(Token::new(line, 1, TokenCategory::Dedent, ""));
    }

    if levels.last().copied() == Some(width) {
        Ok(())
    } else {
        Err(ScanError::InconsistentDedent(SourceContext::new(
            line,
            column_of(width),
        )))
    }
}

fn scan_line(
    tokens: &mut Vec<Token>,
    code: &str,
    start: usize,
    line: u32,
) -> Result<(), ScanError> {
    let mut characters = code.char_indices().skip(start).peekable();

    while let Some((index, character)) = characters.next() {
        let column = column_of(index);

        let (category, lexeme) = match character {
            ' ' => continue,
            '(' => (TokenCategory::LeftParen, character.to_string()),
            ')' => (TokenCategory::RightParen, character.to_string()),
            ':' => (TokenCategory::Colon, character.to_string()),
            ',' => (TokenCategory::Comma, character.to_string()),
            '+' => (TokenCategory::Plus, character.to_string()),
            '-' if next_is(&mut characters, '>') => (TokenCategory::Arrow, "->".to_string()),
            '-' => (TokenCategory::Minus, character.to_string()),
            '=' if next_is(&mut characters, '=') => (TokenCategory::Equal, "==".to_string()),
            '=' => (TokenCategory::Assign, character.to_string()),
            '!' if next_is(&mut characters, '=') => (TokenCategory::NotEqual, "!=".to_string()),
            c if c.is_ascii_digit() => (
                TokenCategory::UnsignedInt,
                take_while(&mut characters, c, |c| c.is_ascii_digit()),
            ),
            c if c.is_ascii_alphabetic() || c == '_' => {
                let word = take_while(&mut characters, c, |c| {
                    c.is_ascii_alphanumeric() || c == '_'
                });
                let category = TokenCategory::keyword(&word).unwrap_or(TokenCategory::Identifier);

                (category, word)
            }
            c => {
                return Err(ScanError::UnexpectedCharacter(
                    SourceContext::new(line, column),
                    c,
                ));
            }
        };

        tokens.push(Token::new(line, column, category, lexeme));
    }

    Ok(())
}

fn next_is(characters: &mut Peekable<impl Iterator<Item = (usize, char)>>, expected: char) -> bool {
    characters.next_if(|&(_, c)| c == expected).is_some()
}

fn take_while(
    characters: &mut Peekable<impl Iterator<Item = (usize, char)>>,
    first: char,
    predicate: impl Fn(char) -> bool,
) -> String {
    let mut word = String::from(first);

    while let Some((_, c)) = characters.next_if(|&(_, c)| predicate(c)) {
        word.push(c);
    }

    word
}
