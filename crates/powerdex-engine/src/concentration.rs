//! Concentration of voting weight.
//!
//! Share metrics (Nakamoto, top share, HHI, Simpson, entropy) divide by the
//! weight basis: the declared total, or the member sum when that is larger.
//! Inequality metrics (Gini, Theil) compare members with one another and use
//! the member sum.
//!
//! Everything that is a ratio of integers is computed exactly and rendered by
//! long division. Entropy and Theil involve logarithms and are `f64`.

use crate::error::EngineError;
use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};
use powerdex_math::long_division;
use powerdex_types::{Weight, WeightedVotingGame};
use serde::Serialize;

/// Concentration metrics for one set of weights.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConcentrationMetrics {
    pub members: usize,
    /// Fewest members whose combined weight exceeds half the basis
    pub nakamoto: usize,
    /// Nakamoto interpolated inside the member that crosses half the basis
    pub fractional_nakamoto: String,
    pub top_share: String,
    /// Herfindahl-Hirschman index on the 0 to 10000 scale
    pub hhi: String,
    pub simpson: String,
    pub gini: String,
    pub theil: f64,
    pub entropy_bits: f64,
}

impl ConcentrationMetrics {
    fn zero(members: usize) -> Self {
        Self {
            members,
            nakamoto: 0,
            fractional_nakamoto: "0".to_string(),
            top_share: "0".to_string(),
            hhi: "0".to_string(),
            simpson: "0".to_string(),
            gini: "0".to_string(),
            theil: 0.0,
            entropy_bits: 0.0,
        }
    }

    /// Metrics over a game's member weights and declared total.
    pub fn of_game(game: &WeightedVotingGame, precision: usize) -> Result<Self, EngineError> {
        let weights: Vec<Weight> = game.members.iter().map(|m| m.weight.clone()).collect();
        concentration(&weights, &game.total_weight, precision)
    }
}

/// Compute concentration metrics for `weights` against `total_weight`.
pub fn concentration(
    weights: &[Weight],
    total_weight: &BigUint,
    precision: usize,
) -> Result<ConcentrationMetrics, EngineError> {
    let n = weights.len();
    let mut sorted: Vec<&BigUint> = weights.iter().map(Weight::as_biguint).collect();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    let sum: BigUint = sorted.iter().copied().sum();
    let basis = if &sum > total_weight { sum.clone() } else { total_weight.clone() };
    if n == 0 || basis.is_zero() {
        return Ok(ConcentrationMetrics::zero(n));
    }

    let (nakamoto, fractional) = nakamoto(&sorted, &basis);
    let (frac_num, frac_den) = fractional;

    let top = sorted.first().map(|w| (*w).clone()).unwrap_or_default();
    let squares: BigUint = sorted.iter().map(|w| *w * *w).sum();
    let basis_sq = &basis * &basis;

    let entropy_bits = -sorted
        .iter()
        .filter(|w| !w.is_zero())
        .map(|w| {
            let s = ratio(w, &basis);
            s * s.log2()
        })
        .sum::<f64>();

    Ok(ConcentrationMetrics {
        members: n,
        nakamoto,
        fractional_nakamoto: long_division(&frac_num, &frac_den, precision)?,
        top_share: long_division(&top, &basis, precision)?,
        hhi: long_division(&(&squares * 10_000u32), &basis_sq, precision)?,
        simpson: long_division(&(&basis_sq - &squares), &basis_sq, precision)?,
        gini: gini(&sorted, &sum, precision)?,
        theil: theil(&sorted, &sum),
        entropy_bits,
    })
}

/// Nakamoto coefficient and its fractional form as `(numer, denom)`.
///
/// `sorted` is descending. If half the basis is never exceeded both are `n`.
fn nakamoto(sorted: &[&BigUint], basis: &BigUint) -> (usize, (BigUint, BigUint)) {
    let mut acc = BigUint::zero();
    for (i, &w) in sorted.iter().enumerate() {
        let before = acc.clone();
        acc += w;
        if &acc * 2u32 > *basis {
            // i + (B/2 - before) / w
            let two_w = w * 2u32;
            let numer = &two_w * BigUint::from(i) + basis - before * 2u32;
            return (i + 1, (numer, two_w));
        }
    }
    (sorted.len(), (BigUint::from(sorted.len()), BigUint::one()))
}

/// Gini over ascending weights: `(2 * sum((i+1) * x_i) - (n+1) * S) / (n * S)`.
fn gini(sorted: &[&BigUint], sum: &BigUint, precision: usize) -> Result<String, EngineError> {
    if sum.is_zero() {
        return Ok("0".to_string());
    }
    let n = sorted.len();
    let ranked: BigUint = sorted
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &w)| w * BigUint::from(i + 1))
        .sum();
    let numer = ranked * 2u32 - sum * BigUint::from(n + 1);
    Ok(long_division(&numer, &(sum * BigUint::from(n)), precision)?)
}

/// Theil T index: `ln n + sum(s_i * ln s_i)` with shares of the member sum.
fn theil(sorted: &[&BigUint], sum: &BigUint) -> f64 {
    if sum.is_zero() {
        return 0.0;
    }
    let weighted: f64 = sorted
        .iter()
        .filter(|w| !w.is_zero())
        .map(|w| {
            let s = ratio(w, sum);
            s * s.ln()
        })
        .sum();
    (sorted.len() as f64).ln() + weighted
}

/// `a / b` as `f64` for `a <= b`, without overflowing on huge weights.
fn ratio(a: &BigUint, b: &BigUint) -> f64 {
    let shift = b.bits().saturating_sub(64);
    let a = (a >> shift).to_f64().unwrap_or(0.0);
    let b = (b >> shift).to_f64().unwrap_or(1.0);
    a / b
}
