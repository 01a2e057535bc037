//! Tree-walking evaluation.
//!
//! Evaluation is a pure function of the tree: operands are evaluated left
//! then right, and the first error stops the walk.

use std::slice;

use tally_syntax::{SyntaxElement, SyntaxKind, SyntaxNode, Token, TokenKind};

use crate::{
    error::EvaluationError,
    value::{NumericValue, Operator},
};

/// Evaluates any node.
///
/// Handing it a whole program is a convenience for callers that want a single
/// value: every statement is evaluated in order and the last value is
/// returned, or [`EvaluationError::EmptyProgram`] when there is none. The
/// pipeline itself never does this; [`run`](crate::run) walks programs with
/// [`statements`] so it gets one value per line.
pub fn evaluate(node: &SyntaxNode) -> Result<NumericValue, EvaluationError> {
    use SyntaxElement::Token as Leaf;
    use SyntaxKind::*;

    match (node.kind(), node.children()) {
        (Program, _) => {
            let mut last = None;
            for value in statements(node)? {
                last = Some(value?);
            }
            last.ok_or(EvaluationError::EmptyProgram)
        }
        (Statement, [expr, Leaf(_)]) => evaluate_element(expr),
        (Expression | Term | Factor, [lhs, Leaf(op), rhs]) => binary(lhs, op, rhs),
        (Power, [Leaf(_), inner, Leaf(_)]) => evaluate_element(inner),
        (Expression | Term | Factor | Power, [operand]) => evaluate_element(operand),
        (Negation, [operand]) => {
            let line = node.line().unwrap_or_default();
            evaluate_element(operand)?
                .negate()
                .map_err(|err| EvaluationError::arithmetic(err, line))
        }
        (Number, [Leaf(literal)]) => number(literal),
        (kind, children) => Err(EvaluationError::MalformedTree {
            detail: format!("{kind} node with {} children", children.len()),
        }),
    }
}

pub fn evaluate_element(element: &SyntaxElement) -> Result<NumericValue, EvaluationError> {
    match element {
        SyntaxElement::Node(node) => evaluate(node),
        SyntaxElement::Token(tok) if tok.kind().is_literal() => number(tok),
        SyntaxElement::Token(tok) => Err(EvaluationError::MalformedTree {
            detail: format!("{:?} token where an operand was expected", tok.kind()),
        }),
    }
}

/// Lazily evaluates the statements of `program`, one value per line.
pub fn statements(program: &SyntaxNode) -> Result<Statements<'_>, EvaluationError> {
    if program.kind() != SyntaxKind::Program {
        return Err(EvaluationError::MalformedTree {
            detail: format!("expected a Program node, found {}", program.kind()),
        });
    }
    Ok(Statements {
        children: program.children().iter(),
    })
}

/// Iterator over statement results, in source order. Once consumed it cannot
/// be restarted; call [`statements`] again for a fresh pass.
#[derive(Debug)]
pub struct Statements<'a> {
    children: slice::Iter<'a, SyntaxElement>,
}

impl Iterator for Statements<'_> {
    type Item = Result<NumericValue, EvaluationError>;

    fn next(&mut self) -> Option<Self::Item> {
        let child = self.children.next()?;
        let result = match child {
            SyntaxElement::Node(stmt) if stmt.kind() == SyntaxKind::Statement => evaluate(stmt),
            other => Err(EvaluationError::MalformedTree {
                detail: format!("Program child is not a Statement (line {:?})", other.line()),
            }),
        };
        if let Ok(value) = &result {
            tracing::trace!(%value, "evaluated statement");
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.children.size_hint()
    }
}

fn binary(
    lhs: &SyntaxElement,
    op: &Token,
    rhs: &SyntaxElement,
) -> Result<NumericValue, EvaluationError> {
    let operator = Operator::from_token(op.kind()).ok_or_else(|| EvaluationError::MalformedTree {
        detail: format!("{:?} is not a binary operator", op.kind()),
    })?;
    let lhs = evaluate_element(lhs)?;
    let rhs = evaluate_element(rhs)?;
    lhs.apply(operator, rhs)
        .map_err(|err| EvaluationError::arithmetic(err, op.line()))
}

fn number(literal: &Token) -> Result<NumericValue, EvaluationError> {
    let text = literal.text();
    let parsed = match literal.kind() {
        TokenKind::IntLiteral => text.parse().ok().map(NumericValue::Integer),
        TokenKind::FloatLiteral => text.parse().ok().map(NumericValue::Float),
        _ => None,
    };
    parsed.ok_or_else(|| EvaluationError::MalformedNumber {
        text: text.to_string(),
        line: literal.line(),
    })
}
