//! Quorum percentages as exact rationals.

use crate::error::TypesError;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use std::fmt;
use std::str::FromStr;

/// Fraction of the total weight (in percent) a coalition needs to pass.
///
/// Stored as `numer / denom` percent, `0 <= numer / denom <= 100`, `denom > 0`.
/// `"66.5"` is kept as `665 / 10`, never as a float.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quorum {
    numer: BigUint,
    denom: BigUint,
}

impl Quorum {
    /// Integer percentage, e.g. `Quorum::percent(51)`.
    pub fn percent(p: u32) -> Result<Self, TypesError> {
        Self::ratio(BigUint::from(p), BigUint::one())
    }

    /// Percentage given as `numer / denom`.
    pub fn ratio(numer: BigUint, denom: BigUint) -> Result<Self, TypesError> {
        if denom.is_zero() {
            return Err(TypesError::MalformedThreshold(
                "quorum denominator is zero".to_string(),
            ));
        }
        if numer > &denom * BigUint::from(100u32) {
            return Err(TypesError::MalformedThreshold(format!(
                "quorum {}/{} exceeds 100%",
                numer, denom
            )));
        }
        Ok(Self { numer, denom })
    }

    pub fn numer(&self) -> &BigUint {
        &self.numer
    }

    pub fn denom(&self) -> &BigUint {
        &self.denom
    }

    /// True when the percentage is a whole number.
    pub fn is_integer(&self) -> bool {
        (&self.numer % &self.denom).is_zero()
    }
}

impl fmt::Display for Quorum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denom.is_one() {
            write!(f, "{}%", self.numer)
        } else {
            write!(f, "{}/{}%", self.numer, self.denom)
        }
    }
}

fn parse_unsigned(s: &str, input: &str) -> Result<BigUint, TypesError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TypesError::MalformedThreshold(format!(
            "invalid quorum '{}'",
            input
        )));
    }
    BigUint::parse_bytes(s.as_bytes(), 10)
        .ok_or_else(|| TypesError::MalformedThreshold(format!("invalid quorum '{}'", input)))
}

impl FromStr for Quorum {
    type Err = TypesError;

    /// Parses `"51"`, `"51%"`, `"66.5"` or `"200/3"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let body = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();

        if let Some((n, d)) = body.split_once('/') {
            let numer = parse_unsigned(n.trim(), s)?;
            let denom = parse_unsigned(d.trim(), s)?;
            return Self::ratio(numer, denom);
        }

        if let Some((int_part, frac_part)) = body.split_once('.') {
            let int_part = if int_part.is_empty() { "0" } else { int_part };
            let mut digits = String::with_capacity(int_part.len() + frac_part.len());
            digits.push_str(int_part);
            digits.push_str(frac_part);
            let numer = parse_unsigned(&digits, s)?;
            let denom = BigUint::from(10u32).pow(frac_part.len() as u32);
            return Self::ratio(numer, denom);
        }

        Self::ratio(parse_unsigned(body, s)?, BigUint::one())
    }
}
