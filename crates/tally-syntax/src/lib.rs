//! Lexer, syntax tree and parser for tally's line-oriented arithmetic
//! statements.
//!
//! Each source line holds one expression. [`parse`] turns a whole program
//! into a [`SyntaxNode`] rooted at [`SyntaxKind::Program`], or fails on the
//! first lexical or grammatical defect.

pub mod error;
pub mod lexer;
pub mod node;
pub mod parser;
pub mod token;

pub use error::{Expected, InvalidTree, LexicalError, ParseError, SyntaxError};
pub use lexer::Lexer;
pub use node::{SyntaxElement, SyntaxKind, SyntaxNode};
pub use parser::{MAX_HEIGHT, MAX_NESTING, Parser};
pub use token::{Token, TokenKind};

/// Tokenizes a whole program, end-of-stream marker included.
pub fn lex(source: &str) -> Result<Vec<Token>, LexicalError> {
    tokenize(source.lines())
}

pub fn tokenize<I, S>(lines: I) -> Result<Vec<Token>, LexicalError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Lexer::new(lines).collect()
}

pub fn parse(source: &str) -> Result<SyntaxNode, SyntaxError> {
    parse_lines(source.lines())
}

pub fn parse_lines<I, S>(lines: I) -> Result<SyntaxNode, SyntaxError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Parser::new(Lexer::new(lines))?.parse()
}
