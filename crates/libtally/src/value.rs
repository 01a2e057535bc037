use std::fmt;

use tally_syntax::TokenKind;
use thiserror::Error;

/// Result of evaluating a number or an arithmetic operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericValue {
    Integer(i64),
    Float(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl Operator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        let op = match kind {
            TokenKind::Plus => Operator::Add,
            TokenKind::Minus => Operator::Subtract,
            TokenKind::Times => Operator::Multiply,
            TokenKind::Divide => Operator::Divide,
            TokenKind::Caret => Operator::Power,
            _ => return None,
        };
        Some(op)
    }
}

/// Integer arithmetic that has no `i64` answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow")]
    Overflow,
}

impl NumericValue {
    pub fn as_f64(self) -> f64 {
        match self {
            NumericValue::Integer(n) => n as f64,
            NumericValue::Float(x) => x,
        }
    }

    /// Flips the sign and keeps the tag.
    pub fn negate(self) -> Result<Self, ArithmeticError> {
        match self {
            NumericValue::Integer(n) => n
                .checked_neg()
                .map(NumericValue::Integer)
                .ok_or(ArithmeticError::Overflow),
            NumericValue::Float(x) => Ok(NumericValue::Float(-x)),
        }
    }

    /// Integer with integer stays integer; anything involving a float is
    /// computed in `f64`.
    pub fn apply(self, op: Operator, rhs: Self) -> Result<Self, ArithmeticError> {
        match (self, rhs) {
            (NumericValue::Integer(a), NumericValue::Integer(b)) => {
                integer_op(a, op, b).map(NumericValue::Integer)
            }
            (lhs, rhs) => Ok(NumericValue::Float(float_op(lhs.as_f64(), op, rhs.as_f64()))),
        }
    }
}

fn integer_op(a: i64, op: Operator, b: i64) -> Result<i64, ArithmeticError> {
    match op {
        Operator::Add => a.checked_add(b).ok_or(ArithmeticError::Overflow),
        Operator::Subtract => a.checked_sub(b).ok_or(ArithmeticError::Overflow),
        Operator::Multiply => a.checked_mul(b).ok_or(ArithmeticError::Overflow),
        Operator::Divide if b == 0 => Err(ArithmeticError::DivisionByZero),
        // Truncates toward zero; only i64::MIN / -1 overflows.
        Operator::Divide => a.checked_div(b).ok_or(ArithmeticError::Overflow),
        Operator::Power => integer_pow(a, b),
    }
}

/// `a ^ b` truncated toward zero, computed without going through `f64`.
fn integer_pow(base: i64, exp: i64) -> Result<i64, ArithmeticError> {
    let odd = exp % 2 != 0;
    if exp < 0 {
        return match base {
            0 => Err(ArithmeticError::DivisionByZero),
            1 => Ok(1),
            -1 => Ok(if odd { -1 } else { 1 }),
            _ => Ok(0),
        };
    }
    match u32::try_from(exp) {
        Ok(exp) => base.checked_pow(exp).ok_or(ArithmeticError::Overflow),
        Err(_) => match base {
            0 | 1 => Ok(base),
            -1 => Ok(if odd { -1 } else { 1 }),
            _ => Err(ArithmeticError::Overflow),
        },
    }
}

fn float_op(a: f64, op: Operator, b: f64) -> f64 {
    match op {
        Operator::Add => a + b,
        Operator::Subtract => a - b,
        Operator::Multiply => a * b,
        Operator::Divide => a / b,
        Operator::Power => a.powf(b),
    }
}

/// Integers print as decimal. Floats use `f64`'s `Debug` form rather than its
/// `Display` form, so they always keep a fractional part or exponent (`5.0`
/// and not `5`) and a float result never reads as an integer. Non-finite
/// values print as `inf`, `-inf` and `NaN`.
impl fmt::Display for NumericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericValue::Integer(n) => write!(f, "{n}"),
            NumericValue::Float(x) => write!(f, "{x:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::NumericValue::{Float, Integer};

    fn apply(lhs: NumericValue, op: Operator, rhs: NumericValue) -> NumericValue {
        lhs.apply(op, rhs).unwrap()
    }

    #[test]
    fn negate_keeps_the_tag() {
        assert_eq!(Integer(7).negate(), Ok(Integer(-7)));
        assert_eq!(Integer(-7).negate(), Ok(Integer(7)));
        assert_eq!(Float(2.5).negate(), Ok(Float(-2.5)));
        assert_eq!(Float(-0.5).negate(), Ok(Float(0.5)));
        assert_eq!(Integer(0).negate(), Ok(Integer(0)));
    }

    #[test]
    fn negate_float_zero_flips_sign_bit() {
        let Ok(Float(x)) = Float(0.0).negate() else {
            panic!("negation changed the tag");
        };
        assert!(x.is_sign_negative());
    }

    #[test]
    fn negate_min_overflows() {
        assert_eq!(Integer(i64::MIN).negate(), Err(ArithmeticError::Overflow));
    }

    #[test]
    fn integer_division_truncates_toward_zero() {
        assert_eq!(apply(Integer(10), Operator::Divide, Integer(3)), Integer(3));
        assert_eq!(apply(Integer(-7), Operator::Divide, Integer(2)), Integer(-3));
        assert_eq!(apply(Integer(7), Operator::Divide, Integer(-2)), Integer(-3));
    }

    #[test]
    fn integer_division_by_zero() {
        assert_eq!(
            Integer(5).apply(Operator::Divide, Integer(0)),
            Err(ArithmeticError::DivisionByZero)
        );
        assert_eq!(
            Integer(i64::MIN).apply(Operator::Divide, Integer(-1)),
            Err(ArithmeticError::Overflow)
        );
    }

    #[test]
    fn float_division_by_zero_is_ieee() {
        assert_eq!(
            apply(Float(1.0), Operator::Divide, Integer(0)),
            Float(f64::INFINITY)
        );
        assert_eq!(
            apply(Integer(-1), Operator::Divide, Float(0.0)),
            Float(f64::NEG_INFINITY)
        );
        let Float(nan) = apply(Float(0.0), Operator::Divide, Float(0.0)) else {
            panic!("expected a float");
        };
        assert!(nan.is_nan());
    }

    #[test]
    fn mixed_operands_promote_to_float() {
        assert_eq!(apply(Integer(1), Operator::Add, Float(0.5)), Float(1.5));
        assert_eq!(apply(Float(0.5), Operator::Multiply, Integer(4)), Float(2.0));
        assert_eq!(apply(Integer(2), Operator::Power, Float(3.0)), Float(8.0));
        assert_eq!(apply(Float(1.5), Operator::Subtract, Float(0.5)), Float(1.0));
    }

    #[test]
    fn integer_power() {
        assert_eq!(apply(Integer(2), Operator::Power, Integer(10)), Integer(1024));
        assert_eq!(apply(Integer(-3), Operator::Power, Integer(3)), Integer(-27));
        assert_eq!(apply(Integer(0), Operator::Power, Integer(0)), Integer(1));
        assert_eq!(
            Integer(10).apply(Operator::Power, Integer(19)),
            Err(ArithmeticError::Overflow)
        );
    }

    #[test]
    fn negative_integer_exponent_truncates() {
        assert_eq!(apply(Integer(2), Operator::Power, Integer(-1)), Integer(0));
        assert_eq!(apply(Integer(1), Operator::Power, Integer(-5)), Integer(1));
        assert_eq!(apply(Integer(-1), Operator::Power, Integer(-3)), Integer(-1));
        assert_eq!(apply(Integer(-1), Operator::Power, Integer(-4)), Integer(1));
        assert_eq!(
            Integer(0).apply(Operator::Power, Integer(-2)),
            Err(ArithmeticError::DivisionByZero)
        );
    }

    #[test]
    fn huge_exponents_for_trivial_bases() {
        let huge = i64::from(u32::MAX) + 1;
        assert_eq!(apply(Integer(1), Operator::Power, Integer(huge)), Integer(1));
        assert_eq!(apply(Integer(0), Operator::Power, Integer(huge)), Integer(0));
        assert_eq!(apply(Integer(-1), Operator::Power, Integer(huge + 1)), Integer(-1));
        assert_eq!(
            Integer(2).apply(Operator::Power, Integer(huge)),
            Err(ArithmeticError::Overflow)
        );
    }

    #[test]
    fn checked_integer_overflow() {
        assert_eq!(
            Integer(i64::MAX).apply(Operator::Add, Integer(1)),
            Err(ArithmeticError::Overflow)
        );
        assert_eq!(
            Integer(i64::MIN).apply(Operator::Subtract, Integer(1)),
            Err(ArithmeticError::Overflow)
        );
        assert_eq!(
            Integer(i64::MAX).apply(Operator::Multiply, Integer(2)),
            Err(ArithmeticError::Overflow)
        );
    }

    #[test]
    fn display() {
        assert_eq!(Integer(-42).to_string(), "-42");
        assert_eq!(Float(5.0).to_string(), "5.0");
        assert_eq!(Float(10.0 / 3.0).to_string(), "3.3333333333333335");
        assert_eq!(Float(f64::INFINITY).to_string(), "inf");
        assert_eq!(Float(f64::NAN).to_string(), "NaN");
    }

    #[test]
    fn operator_tokens() {
        assert_eq!(Operator::from_token(TokenKind::Caret), Some(Operator::Power));
        assert_eq!(Operator::from_token(TokenKind::Minus), Some(Operator::Subtract));
        assert_eq!(Operator::from_token(TokenKind::LParen), None);
    }
}
