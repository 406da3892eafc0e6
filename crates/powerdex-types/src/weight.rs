use crate::error::TypesError;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{ToPrimitive, Zero};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// Largest decimal exponent accepted when parsing scientific notation.
/// Keeps "1e999999999" from allocating a billion-digit integer.
pub const MAX_EXPONENT: i64 = 4_096;

/// Non-negative voting weight of unbounded magnitude.
///
/// Governance token balances routinely exceed `u64` (18-decimal tokens with
/// billions of supply), so weights are arbitrary-precision integers.
/// Negativity is unrepresentable: signed inputs go through `TryFrom<BigInt>`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Weight(BigUint);

impl Weight {
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    pub fn into_biguint(self) -> BigUint {
        self.0
    }

    /// Value as `u128` if it fits.
    pub fn to_u128(&self) -> Option<u128> {
        self.0.to_u128()
    }

    /// Parse a decimal or scientific-notation string.
    ///
    /// Accepts `"1000"`, `"1e+21"`, `"1.5E3"`, `"2.75"`. Whatever fractional
    /// part remains after applying the exponent is truncated toward zero.
    pub fn parse_decimal(s: &str) -> Result<Self, TypesError> {
        let trimmed = s.trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let (mantissa, exponent) = match body.find(&['e', 'E'][..]) {
            Some(pos) => {
                let exp_str = &body[pos + 1..];
                let exp: i64 = exp_str
                    .parse()
                    .map_err(|_| TypesError::InvalidWeight(format!("bad exponent in '{}'", s)))?;
                (&body[..pos], exp)
            }
            None => (body, 0),
        };

        if exponent.abs() > MAX_EXPONENT {
            return Err(TypesError::InvalidWeight(format!(
                "exponent {} out of range in '{}'",
                exponent, s
            )));
        }

        let (int_part, frac_part) = match mantissa.split_once('.') {
            Some((i, f)) => (i, f),
            None => (mantissa, ""),
        };

        let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
        if (int_part.is_empty() && frac_part.is_empty())
            || !all_digits(int_part)
            || !all_digits(frac_part)
        {
            return Err(TypesError::InvalidWeight(s.to_string()));
        }

        let mut digits = String::with_capacity(int_part.len() + frac_part.len());
        digits.push_str(int_part);
        digits.push_str(frac_part);

        // Position of the decimal point relative to the end of `digits`.
        let shift = exponent - frac_part.len() as i64;
        let value = if shift >= 0 {
            let base = parse_digits(&digits);
            base * BigUint::from(10u32).pow(shift as u32)
        } else {
            let keep = digits.len() as i64 + shift;
            if keep <= 0 {
                BigUint::zero()
            } else {
                parse_digits(&digits[..keep as usize])
            }
        };

        if negative && !value.is_zero() {
            return Err(TypesError::NegativeWeight(s.trim().to_string()));
        }

        Ok(Self(value))
    }
}

fn parse_digits(digits: &str) -> BigUint {
    if digits.is_empty() {
        return BigUint::zero();
    }
    // Caller guarantees ASCII digits only.
    BigUint::parse_bytes(digits.as_bytes(), 10).unwrap_or_default()
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Weight({})", self.0)
    }
}

impl FromStr for Weight {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_decimal(s)
    }
}

impl From<BigUint> for Weight {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl From<u32> for Weight {
    fn from(value: u32) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<u64> for Weight {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<u128> for Weight {
    fn from(value: u128) -> Self {
        Self(BigUint::from(value))
    }
}

impl TryFrom<BigInt> for Weight {
    type Error = TypesError;

    fn try_from(value: BigInt) -> Result<Self, Self::Error> {
        match value.sign() {
            Sign::Minus => Err(TypesError::NegativeWeight(value.to_string())),
            _ => Ok(Self(value.magnitude().clone())),
        }
    }
}

impl TryFrom<i64> for Weight {
    type Error = TypesError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u64::try_from(value)
            .map(Self::from)
            .map_err(|_| TypesError::NegativeWeight(value.to_string()))
    }
}

impl Add<&Weight> for &Weight {
    type Output = Weight;

    fn add(self, rhs: &Weight) -> Weight {
        Weight(&self.0 + &rhs.0)
    }
}

impl Add for Weight {
    type Output = Weight;

    fn add(self, rhs: Weight) -> Weight {
        Weight(self.0 + rhs.0)
    }
}

impl AddAssign<&Weight> for Weight {
    fn add_assign(&mut self, rhs: &Weight) {
        self.0 += &rhs.0;
    }
}

impl<'a> Sum<&'a Weight> for Weight {
    fn sum<I: Iterator<Item = &'a Weight>>(iter: I) -> Self {
        iter.fold(Weight::zero(), |mut acc, w| {
            acc += w;
            acc
        })
    }
}
