use miette::Diagnostic;
use tally_syntax::SyntaxError;
use thiserror::Error;

use crate::value::ArithmeticError;

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum EvaluationError {
    #[error("division by zero on line {line}")]
    #[diagnostic(
        code(tally::eval::division_by_zero),
        help("integer division and integer `0 ^ n` with negative `n` need a non-zero divisor; use a float operand for IEEE results")
    )]
    DivisionByZero { line: u32 },

    #[error("malformed number {text:?} on line {line}")]
    #[diagnostic(code(tally::eval::malformed_number))]
    MalformedNumber { text: String, line: u32 },

    #[error("integer overflow on line {line}")]
    #[diagnostic(
        code(tally::eval::overflow),
        help("integers are 64-bit; write one operand as a float to avoid overflow")
    )]
    Overflow { line: u32 },

    #[error("malformed syntax tree: {detail}")]
    #[diagnostic(code(tally::eval::malformed_tree))]
    MalformedTree { detail: String },

    #[error("program has no statements")]
    #[diagnostic(code(tally::eval::empty_program))]
    EmptyProgram,
}

impl EvaluationError {
    pub(crate) fn arithmetic(err: ArithmeticError, line: u32) -> Self {
        match err {
            ArithmeticError::DivisionByZero => EvaluationError::DivisionByZero { line },
            ArithmeticError::Overflow => EvaluationError::Overflow { line },
        }
    }
}

/// Anything that can stop a program from producing output.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Evaluation(#[from] EvaluationError),
}
