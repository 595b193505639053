//! Runtime values for the interpreter
//!
//! Every value is in one of two representations: a checked 64-bit integer
//! (`Fast`) or an arbitrary-precision decimal (`Precise`). Widening from the
//! first to the second is always lossless; there is no narrowing.

use super::error::{InterpResult, RuntimeError};
use crate::ast::BinOp;
use bigdecimal::num_bigint::{BigInt, Sign};
use bigdecimal::{BigDecimal, RoundingMode, Zero};
use std::fmt;
use std::num::NonZeroU64;

/// Runtime value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Fixed-width integer, only ever produced by overflow-checked arithmetic
    Fast(i64),
    /// Arbitrary-precision decimal
    Precise(BigDecimal),
}

/// Why a fast-path computation could not produce an exact `i64`.
///
/// Only the adaptive binary node looks at this; it turns any failure into a
/// retry on the precise path, so it never reaches a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArithmeticFailure {
    Overflow,
    DivideByZero,
    /// Division with a non-zero remainder
    InexactQuotient,
}

impl fmt::Display for ArithmeticFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArithmeticFailure::Overflow => write!(f, "overflow"),
            ArithmeticFailure::DivideByZero => write!(f, "divide by zero"),
            ArithmeticFailure::InexactQuotient => write!(f, "inexact quotient"),
        }
    }
}

impl Value {
    /// Get representation name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Fast(_) => "fast",
            Value::Precise(_) => "precise",
        }
    }

    pub fn is_fast(&self) -> bool {
        matches!(self, Value::Fast(_))
    }

    /// The fast representation, if this value is in it. Precise values are
    /// never narrowed, even when they hold an integer.
    pub fn to_fast(&self) -> Option<i64> {
        match self {
            Value::Fast(n) => Some(*n),
            Value::Precise(_) => None,
        }
    }

    /// Widen to the precise representation. Total.
    pub fn to_precise(&self) -> BigDecimal {
        match self {
            Value::Fast(n) => BigDecimal::from(*n),
            Value::Precise(d) => d.clone(),
        }
    }

    /// Apply `op` without any per-site memory: the fast path is tried when
    /// both operands are fast and the precise path is used otherwise.
    pub fn binary(&self, op: BinOp, rhs: &Value, precision: NonZeroU64) -> InterpResult<Value> {
        if let (Value::Fast(a), Value::Fast(b)) = (self, rhs) {
            if let Ok(n) = fast_binary(op, *a, *b) {
                return Ok(Value::Fast(n));
            }
        }
        precise_binary(op, &self.to_precise(), &rhs.to_precise(), precision).map(Value::Precise)
    }

    pub fn add(&self, rhs: &Value) -> Value {
        self.widening(rhs, i64::checked_add, |a, b| a + b)
    }

    pub fn sub(&self, rhs: &Value) -> Value {
        self.widening(rhs, i64::checked_sub, |a, b| a - b)
    }

    pub fn mul(&self, rhs: &Value) -> Value {
        self.widening(rhs, i64::checked_mul, |a, b| a * b)
    }

    /// Division rounds to `precision` significant digits on the precise path.
    pub fn div(&self, rhs: &Value, precision: NonZeroU64) -> InterpResult<Value> {
        self.binary(BinOp::Div, rhs, precision)
    }

    pub fn negate(&self) -> Value {
        match self {
            Value::Fast(n) => match n.checked_neg() {
                Some(m) => Value::Fast(m),
                None => Value::Precise(-BigDecimal::from(*n)),
            },
            Value::Precise(d) => Value::Precise(-d.clone()),
        }
    }

    // Only for operations that cannot fail once widened
    fn widening(
        &self,
        rhs: &Value,
        fast: fn(i64, i64) -> Option<i64>,
        precise: fn(BigDecimal, BigDecimal) -> BigDecimal,
    ) -> Value {
        if let (Value::Fast(a), Value::Fast(b)) = (self, rhs) {
            if let Some(n) = fast(*a, *b) {
                return Value::Fast(n);
            }
        }
        Value::Precise(precise(self.to_precise(), rhs.to_precise()))
    }
}

/// Overflow-checked integer arithmetic. Division only succeeds when the
/// quotient is a whole number.
pub(crate) fn fast_binary(op: BinOp, a: i64, b: i64) -> Result<i64, ArithmeticFailure> {
    match op {
        BinOp::Add => a.checked_add(b).ok_or(ArithmeticFailure::Overflow),
        BinOp::Sub => a.checked_sub(b).ok_or(ArithmeticFailure::Overflow),
        BinOp::Mul => a.checked_mul(b).ok_or(ArithmeticFailure::Overflow),
        BinOp::Div => {
            if b == 0 {
                return Err(ArithmeticFailure::DivideByZero);
            }
            // i64::MIN % -1 and i64::MIN / -1 both overflow
            match a.checked_rem(b) {
                None => Err(ArithmeticFailure::Overflow),
                Some(0) => a.checked_div(b).ok_or(ArithmeticFailure::Overflow),
                Some(_) => Err(ArithmeticFailure::InexactQuotient),
            }
        }
    }
}

/// Decimal arithmetic. `+ - *` are exact; `/` rounds half-even to
/// `precision` significant digits.
pub(crate) fn precise_binary(
    op: BinOp,
    a: &BigDecimal,
    b: &BigDecimal,
    precision: NonZeroU64,
) -> InterpResult<BigDecimal> {
    Ok(match op {
        BinOp::Add => a + b,
        BinOp::Sub => a - b,
        BinOp::Mul => a * b,
        BinOp::Div => {
            if b.is_zero() {
                return Err(RuntimeError::division_by_zero());
            }
            divide_rounded(a, b, precision)
        }
    })
}

/// `a / b` rounded half-even to `precision` significant digits, with a
/// single rounding step. `b` must be non-zero.
///
/// The truncated quotient is computed exactly with at least one digit past
/// the budget, and a non-zero remainder is kept as one extra sticky digit so
/// the final rounding can tell "exactly half" from "just above half".
fn divide_rounded(a: &BigDecimal, b: &BigDecimal, precision: NonZeroU64) -> BigDecimal {
    let negative = (a.sign() == Sign::Minus) != (b.sign() == Sign::Minus);
    let (a, b) = (a.abs(), b.abs());
    let (a_int, a_scale) = a.as_bigint_and_exponent();
    let (b_int, b_scale) = b.as_bigint_and_exponent();

    // a_int * 10^shift / b_int has at least precision + 1 digits
    let shift = (precision.get() + 1 + b.digits()).saturating_sub(a.digits());
    let numerator = a_int * BigInt::from(10u8).pow(shift as u32);
    let quotient = &numerator / &b_int;
    let remainder = &numerator % &b_int;

    let mut scale = a_scale - b_scale + shift as i64;
    let mut digits = quotient;
    if !remainder.is_zero() {
        digits = digits * 10u8 + 1u8;
        scale += 1;
    }
    if negative {
        digits = -digits;
    }
    BigDecimal::new(digits, scale).with_precision_round(precision, RoundingMode::HalfEven)
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Fast(n)
    }
}

impl From<BigDecimal> for Value {
    fn from(d: BigDecimal) -> Self {
        Value::Precise(d)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Fast(n) => write!(f, "{n}"),
            // Shortest exact form: no trailing fractional zeros, never an exponent
            Value::Precise(d) => write!(f, "{}", d.normalized().to_plain_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn prec() -> NonZeroU64 {
        NonZeroU64::new(34).unwrap()
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Fast(42).to_string(), "42");
        assert_eq!(Value::Fast(-7).to_string(), "-7");
        assert_eq!(Value::Precise(dec("3.14")).to_string(), "3.14");
        assert_eq!(Value::Precise(dec("5.000")).to_string(), "5");
        assert_eq!(Value::Precise(dec("0.0")).to_string(), "0");
    }

    #[test]
    fn test_display_never_uses_exponent() {
        assert_eq!(Value::Precise(dec("1E+12")).to_string(), "1000000000000");
        assert_eq!(Value::Precise(dec("1E-9")).to_string(), "0.000000001");
    }

    #[test]
    fn test_to_fast_never_narrows() {
        assert_eq!(Value::Fast(3).to_fast(), Some(3));
        assert_eq!(Value::Precise(dec("3")).to_fast(), None);
    }

    #[test]
    fn test_to_precise_is_lossless() {
        assert_eq!(Value::Fast(i64::MIN).to_precise(), dec("-9223372036854775808"));
        assert_eq!(Value::Precise(dec("1.25")).to_precise(), dec("1.25"));
    }

    #[test]
    fn test_fast_binary_in_range() {
        assert_eq!(fast_binary(BinOp::Add, 2, 3), Ok(5));
        assert_eq!(fast_binary(BinOp::Sub, 3, 10), Ok(-7));
        assert_eq!(fast_binary(BinOp::Mul, -2, 5), Ok(-10));
        assert_eq!(fast_binary(BinOp::Div, 10, 2), Ok(5));
        assert_eq!(fast_binary(BinOp::Div, -9, 3), Ok(-3));
    }

    #[test]
    fn test_fast_binary_failures() {
        assert_eq!(fast_binary(BinOp::Add, i64::MAX, 1), Err(ArithmeticFailure::Overflow));
        assert_eq!(fast_binary(BinOp::Sub, i64::MIN, 1), Err(ArithmeticFailure::Overflow));
        assert_eq!(fast_binary(BinOp::Mul, i64::MAX, 2), Err(ArithmeticFailure::Overflow));
        assert_eq!(fast_binary(BinOp::Div, 1, 0), Err(ArithmeticFailure::DivideByZero));
        assert_eq!(fast_binary(BinOp::Div, 7, 2), Err(ArithmeticFailure::InexactQuotient));
        assert_eq!(fast_binary(BinOp::Div, i64::MIN, -1), Err(ArithmeticFailure::Overflow));
    }

    #[test]
    fn test_precise_division_rounds_to_budget() {
        let q = precise_binary(BinOp::Div, &dec("1"), &dec("3"), prec()).unwrap();
        assert_eq!(Value::Precise(q).to_string(), "0.3333333333333333333333333333333333");

        let q = precise_binary(BinOp::Div, &dec("2"), &dec("3"), prec()).unwrap();
        assert_eq!(Value::Precise(q).to_string(), "0.6666666666666666666666666666666667");
    }

    #[test]
    fn test_precise_division_rounds_once() {
        // the 35th quotient digit is a 4 followed by a long run of 9s
        let dividend = format!("3.{}44{}", "0".repeat(32), "9".repeat(65));
        let q = precise_binary(BinOp::Div, &dec(&dividend), &dec("3"), prec()).unwrap();
        assert_eq!(Value::Precise(q).to_string(), "1.000000000000000000000000000000001");
    }

    #[test]
    fn test_precise_division_half_even() {
        let two = NonZeroU64::new(2).unwrap();
        let q = |a: &str, b: &str| {
            Value::Precise(precise_binary(BinOp::Div, &dec(a), &dec(b), two).unwrap()).to_string()
        };
        assert_eq!(q("1", "8"), "0.12");
        assert_eq!(q("3", "8"), "0.38");
        // just above the tie: the remainder decides
        assert_eq!(q("1.0000001", "8"), "0.13");
        assert_eq!(q("-1", "8"), "-0.12");
        assert_eq!(q("-2", "3"), "-0.67");
        assert_eq!(q("0", "7"), "0");
    }

    #[test]
    fn test_precise_division_long_terminating_quotient_is_rounded() {
        let q = precise_binary(
            BinOp::Div,
            &dec("12345678901234567890123456789012345678"),
            &dec("2"),
            prec(),
        )
        .unwrap();
        assert_eq!(Value::Precise(q).to_string(), "6172839450617283945061728394506173000");
    }

    #[test]
    fn test_precise_division_terminating_is_exact() {
        let q = precise_binary(BinOp::Div, &dec("3.0"), &dec("2"), prec()).unwrap();
        assert_eq!(Value::Precise(q).to_string(), "1.5");
    }

    #[test]
    fn test_precise_division_by_zero() {
        let err = precise_binary(BinOp::Div, &dec("1.5"), &dec("0.00"), prec()).unwrap_err();
        assert_eq!(err, RuntimeError::division_by_zero());
    }

    #[test]
    fn test_binary_promotes_without_memory() {
        let v = Value::Fast(i64::MAX).binary(BinOp::Add, &Value::Fast(1), prec()).unwrap();
        assert_eq!(v.to_string(), "9223372036854775808");
        assert!(!v.is_fast());

        let v = Value::Fast(6).binary(BinOp::Div, &Value::Fast(3), prec()).unwrap();
        assert_eq!(v, Value::Fast(2));
    }

    #[test]
    fn test_mixed_operands_go_precise() {
        let v = Value::Fast(2).add(&Value::Precise(dec("3.0")));
        assert_eq!(v.type_name(), "precise");
        assert_eq!(v.to_string(), "5");
    }

    #[test]
    fn test_sub_mul_div_helpers() {
        assert_eq!(Value::Fast(1).sub(&Value::Fast(-1)), Value::Fast(2));
        assert_eq!(Value::Precise(dec("3.14")).mul(&Value::Fast(2)).to_string(), "6.28");
        assert_eq!(Value::Fast(i64::MAX).mul(&Value::Fast(2)).to_string(), "18446744073709551614");
        assert_eq!(Value::Fast(i64::MIN).sub(&Value::Fast(1)).to_string(), "-9223372036854775809");
        assert_eq!(Value::Fast(5).div(&Value::Fast(4), prec()).unwrap().to_string(), "1.25");
        assert!(Value::Fast(5).div(&Value::Fast(0), prec()).is_err());
    }

    #[test]
    fn test_negate() {
        assert_eq!(Value::Fast(1).negate(), Value::Fast(-1));
        assert_eq!(Value::Fast(i64::MIN).negate().to_string(), "9223372036854775808");
        assert_eq!(Value::Precise(dec("1.5")).negate().to_string(), "-1.5");
    }

    #[test]
    fn test_failure_display() {
        assert_eq!(ArithmeticFailure::Overflow.to_string(), "overflow");
        assert_eq!(ArithmeticFailure::InexactQuotient.to_string(), "inexact quotient");
    }
}
