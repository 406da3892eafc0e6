//! Factorials and binomial coefficients.

use crate::error::MathError;
use num_bigint::BigUint;
use num_traits::One;

/// Precomputed `0!..=n!`, built with `n` sequential multiplications.
#[derive(Debug, Clone)]
pub struct FactorialTable {
    values: Vec<BigUint>,
}

impl FactorialTable {
    /// Build the table up to and including `n!`.
    pub fn new(n: usize) -> Self {
        let mut values = Vec::with_capacity(n + 1);
        values.push(BigUint::one());
        for i in 1..=n {
            let next = &values[i - 1] * BigUint::from(i);
            values.push(next);
        }
        Self { values }
    }

    /// Largest `k` for which `k!` is stored.
    pub fn max(&self) -> usize {
        self.values.len() - 1
    }

    /// `k!`
    pub fn get(&self, k: usize) -> Result<&BigUint, MathError> {
        self.values.get(k).ok_or(MathError::FactorialOutOfRange {
            requested: k,
            max: self.max(),
        })
    }

    /// Number of orderings in which a fixed set of `s` members precedes a
    /// given member and the other `rest` members follow it: `s! * rest!`.
    pub fn arrangements(&self, s: usize, rest: usize) -> Result<BigUint, MathError> {
        Ok(self.get(s)? * self.get(rest)?)
    }
}

/// Row `k` of Pascal's triangle: `C(k, 0), C(k, 1), ..., C(k, k)`.
pub fn binomial_row(k: usize) -> Vec<BigUint> {
    let mut row = Vec::with_capacity(k + 1);
    row.push(BigUint::one());
    for j in 1..=k {
        // C(k, j) = C(k, j-1) * (k - j + 1) / j, exact at every step.
        let next = &row[j - 1] * BigUint::from(k - j + 1) / BigUint::from(j);
        row.push(next);
    }
    row
}
