//! Recursive-descent parser.
//!
//! ```text
//! Program    := Statement* EndOfStream
//! Statement  := Expression EndOfLine
//! Expression := Term ( (PLUS|MINUS) Term )*
//! Term       := Factor ( (TIMES|DIVIDE) Factor )*
//! Factor     := Power ( CARET Factor )?
//! Power      := '(' Expression ')' | '-' Expression | Number
//! Number     := IntLiteral | FloatLiteral
//! ```
//!
//! A rule that matched only its first operand returns that operand unchanged,
//! so `Expression`, `Term` and `Factor` nodes always have three children.
//!
//! Both the parser and every walk over its output recurse, so a statement may
//! open at most [`MAX_NESTING`] levels of `(`, unary `-` and `^` exponents, and
//! no tree it builds may grow taller than [`MAX_HEIGHT`] nodes. Past either
//! bound parsing fails with [`SyntaxError::TooDeep`].

use std::mem;

use crate::{
    error::{Expected, ParseError, SyntaxError},
    lexer::Lexer,
    node::{SyntaxElement, SyntaxKind, SyntaxNode},
    token::{Token, TokenKind},
};

/// Deepest run of `(`, unary `-` and `^` exponents a statement may open.
pub const MAX_NESTING: u32 = 256;

/// Tallest subtree a statement may build, long `+ - * /` chains included.
pub const MAX_HEIGHT: u32 = 512;

pub struct Parser {
    lexer: Lexer,
    current: Token,
    depth: u32,
}

impl Parser {
    /// Primes the lookahead with the lexer's first token.
    pub fn new(mut lexer: Lexer) -> Result<Self, SyntaxError> {
        let current = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current,
            depth: 0,
        })
    }

    /// Parses the whole program. Nothing is returned unless every line parses.
    pub fn parse(mut self) -> Result<SyntaxNode, SyntaxError> {
        let mut statements = Vec::new();
        while self.current.kind() != TokenKind::EndOfStream {
            let stmt = self.statement()?;
            tracing::trace!(line = stmt.line(), "parsed statement");
            statements.push(stmt.into());
        }
        tracing::debug!(statements = statements.len(), "parsed program");
        Ok(SyntaxNode::new(SyntaxKind::Program, statements))
    }

    fn statement(&mut self) -> Result<SyntaxNode, SyntaxError> {
        let expr = self.expression()?;
        let eol = self.expect(TokenKind::EndOfLine)?;
        Ok(SyntaxNode::new(SyntaxKind::Statement, vec![expr, eol.into()]))
    }

    fn expression(&mut self) -> Result<SyntaxElement, SyntaxError> {
        let mut lhs = self.term()?;
        while matches!(self.current.kind(), TokenKind::Plus | TokenKind::Minus) {
            let op = self.advance()?;
            let rhs = self.term()?;
            lhs = binary(SyntaxKind::Expression, lhs, op, rhs)?;
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<SyntaxElement, SyntaxError> {
        let mut lhs = self.factor()?;
        while matches!(self.current.kind(), TokenKind::Times | TokenKind::Divide) {
            let op = self.advance()?;
            let rhs = self.factor()?;
            lhs = binary(SyntaxKind::Term, lhs, op, rhs)?;
        }
        Ok(lhs)
    }

    // `^` is right-associative: the exponent is itself a Factor.
    fn factor(&mut self) -> Result<SyntaxElement, SyntaxError> {
        let base = self.power()?;
        if self.current.kind() != TokenKind::Caret {
            return Ok(base);
        }
        self.nested(|parser| {
            let op = parser.advance()?;
            let exponent = parser.factor()?;
            binary(SyntaxKind::Factor, base, op, exponent)
        })
    }

    fn power(&mut self) -> Result<SyntaxElement, SyntaxError> {
        let node = match self.current.kind() {
            TokenKind::LParen => self.nested(|parser| {
                let open = parser.advance()?;
                let inner = parser.expression()?;
                let close = parser.expect(TokenKind::RParen)?;
                Ok(SyntaxNode::new(
                    SyntaxKind::Power,
                    vec![open.into(), inner, close.into()],
                ))
            })?,
            // Unary minus negates a whole Expression, so `-2 ^ 2` is `-(2 ^ 2)`
            // and `-2 + 3` is `-(2 + 3)`.
            TokenKind::Minus => self.nested(|parser| {
                parser.advance()?;
                let operand = parser.expression()?;
                Ok(SyntaxNode::new(SyntaxKind::Negation, vec![operand]))
            })?,
            TokenKind::IntLiteral | TokenKind::FloatLiteral => {
                let literal = self.advance()?;
                SyntaxNode::new(SyntaxKind::Number, vec![literal.into()])
            }
            _ => return Err(self.unexpected(Expected::Operand)),
        };
        Ok(node.into())
    }

    /// Runs `rule` one nesting level down, failing at the current token once
    /// [`MAX_NESTING`] levels are open.
    fn nested<T>(
        &mut self,
        rule: impl FnOnce(&mut Self) -> Result<T, SyntaxError>,
    ) -> Result<T, SyntaxError> {
        if self.depth >= MAX_NESTING {
            return Err(SyntaxError::TooDeep {
                limit: MAX_NESTING,
                line: self.current.line(),
                column: self.current.column(),
            });
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, SyntaxError> {
        if self.current.kind() != kind {
            return Err(self.unexpected(kind.into()));
        }
        self.advance()
    }

    /// Returns the current token and pulls the next one into its place.
    fn advance(&mut self) -> Result<Token, SyntaxError> {
        let next = self.lexer.next_token()?;
        Ok(mem::replace(&mut self.current, next))
    }

    fn unexpected(&self, expected: Expected) -> SyntaxError {
        ParseError {
            expected,
            found: self.current.kind(),
            line: self.current.line(),
            column: self.current.column(),
        }
        .into()
    }
}

fn binary(
    kind: SyntaxKind,
    lhs: SyntaxElement,
    op: Token,
    rhs: SyntaxElement,
) -> Result<SyntaxElement, SyntaxError> {
    let (line, column) = (op.line(), op.column());
    let node = SyntaxNode::new(kind, vec![lhs, op.into(), rhs]);
    if node.height() > MAX_HEIGHT {
        return Err(SyntaxError::TooDeep {
            limit: MAX_HEIGHT,
            line,
            column,
        });
    }
    Ok(node.into())
}
