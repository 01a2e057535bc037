//! Evaluation of tally programs.
//!
//! [`run`] drives the whole pipeline: the program is parsed completely, then
//! every statement is evaluated in order. Either phase failing means no
//! values come back at all.

use std::io::{self, BufRead};

pub mod error;
pub mod eval;
pub mod value;

pub use error::{Error, EvaluationError};
pub use eval::{Statements, evaluate, evaluate_element, statements};
pub use value::{ArithmeticError, NumericValue, Operator};

/// Parses and evaluates `lines`, returning one value per statement.
pub fn run<I, S>(lines: I) -> Result<Vec<NumericValue>, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let program = tally_syntax::parse_lines(lines)?;
    let values = statements(&program)?.collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(statements = values.len(), "evaluated program");
    Ok(values)
}

pub fn run_source(source: &str) -> Result<Vec<NumericValue>, Error> {
    run(source.lines())
}

/// Reads program lines, dropping `\n` / `\r\n` terminators.
pub fn load_lines<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    reader.lines().collect()
}
