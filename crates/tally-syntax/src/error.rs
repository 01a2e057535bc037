use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

use crate::{node::SyntaxKind, token::TokenKind};

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum LexicalError {
    #[error("unexpected character {ch:?} at line {line}, column {column}")]
    #[diagnostic(
        code(tally::lex::unexpected_character),
        help("only digits, `.`, whitespace and `+ - * / ^ ( )` are allowed")
    )]
    UnexpectedCharacter { ch: char, line: u32, column: u32 },

    #[error("attempt to read past end of program")]
    #[diagnostic(code(tally::lex::read_past_end))]
    ReadPastEnd,

    #[error("invalid token position (line {line}, column {column}); positions start at 1")]
    #[diagnostic(code(tally::lex::invalid_position))]
    InvalidPosition { line: u32, column: u32 },
}

/// What the parser was looking for when it gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Token(TokenKind),
    /// Start of a `Power`: a number, `(` or `-`.
    Operand,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Token(kind) => fmt::Display::fmt(kind, f),
            Expected::Operand => f.write_str("a number, `(` or `-`"),
        }
    }
}

impl From<TokenKind> for Expected {
    fn from(kind: TokenKind) -> Self {
        Expected::Token(kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("expected {expected} at line {line}, column {column}, found {found}")]
#[diagnostic(code(tally::parse::unexpected_token))]
pub struct ParseError {
    pub expected: Expected,
    pub found: TokenKind,
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum SyntaxError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lexical(#[from] LexicalError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error("expression nested deeper than {limit} levels at line {line}, column {column}")]
    #[diagnostic(
        code(tally::parse::too_deep),
        help("flatten the expression or break it into smaller statements")
    )]
    TooDeep { limit: u32, line: u32, column: u32 },
}

/// A node whose children do not match any production of its kind.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("malformed {kind} node: {reason}")]
#[diagnostic(code(tally::tree::malformed))]
pub struct InvalidTree {
    pub kind: SyntaxKind,
    pub reason: String,
}
