//! Exact division to fixed-precision decimal strings.

use crate::error::MathError;
use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Fractional digits rendered by default.
pub const DEFAULT_PRECISION: usize = 20;

/// Render `a / b` with at most `precision` fractional digits.
///
/// Long division on the remainder: each step multiplies the remainder by ten
/// and emits one digit. Stops early once the remainder is zero, so exact
/// quotients carry no trailing zeros (`4/4 -> "1"`, `1/4 -> "0.25"`).
/// Digits past `precision` are truncated, never rounded.
pub fn long_division(a: &BigUint, b: &BigUint, precision: usize) -> Result<String, MathError> {
    if b.is_zero() {
        return Err(MathError::DivisionByZero);
    }

    let quotient = a / b;
    let mut remainder = a % b;

    let mut out = quotient.to_string();
    if remainder.is_zero() || precision == 0 {
        return Ok(out);
    }

    out.push('.');
    let ten = BigUint::from(10u32);
    for _ in 0..precision {
        if remainder.is_zero() {
            break;
        }
        remainder *= &ten;
        let digit = &remainder / b;
        // digit < 10 because remainder < 10 * b
        out.push_str(&digit.to_string());
        remainder %= b;
    }

    Ok(out)
}

/// `ceil(a / b)` in exact integer arithmetic.
pub fn ceil_div(a: &BigUint, b: &BigUint) -> Result<BigUint, MathError> {
    if b.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let q = a / b;
    if (a % b).is_zero() {
        Ok(q)
    } else {
        Ok(q + BigUint::one())
    }
}
