use std::fmt;

use crate::error::LexicalError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Plus,
    Minus,
    Times,
    Divide,
    LParen,
    RParen,
    Caret,
    IntLiteral,
    FloatLiteral,
    EndOfLine,
    EndOfStream,
}

impl TokenKind {
    /// Maps a single-character operator or delimiter to its kind.
    pub fn from_punct(ch: char) -> Option<Self> {
        let kind = match ch {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Times,
            '/' => TokenKind::Divide,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '^' => TokenKind::Caret,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_literal(self) -> bool {
        matches!(self, TokenKind::IntLiteral | TokenKind::FloatLiteral)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Times => "`*`",
            TokenKind::Divide => "`/`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::Caret => "`^`",
            TokenKind::IntLiteral => "integer literal",
            TokenKind::FloatLiteral => "float literal",
            TokenKind::EndOfLine => "end of line",
            TokenKind::EndOfStream => "end of program",
        };
        f.write_str(name)
    }
}

/// A lexeme together with its category and 1-based source position.
///
/// Tokens are immutable once built; [`Token::new`] rejects positions below 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    text: String,
    line: u32,
    column: u32,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        text: impl Into<String>,
        line: u32,
        column: u32,
    ) -> Result<Self, LexicalError> {
        if line < 1 || column < 1 {
            return Err(LexicalError::InvalidPosition { line, column });
        }
        Ok(Token {
            kind,
            text: text.into(),
            line,
            column,
        })
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} {:?}", self.line, self.column, self.kind)?;
        if !self.text.is_empty() {
            write!(f, " {:?}", self.text)?;
        }
        Ok(())
    }
}
