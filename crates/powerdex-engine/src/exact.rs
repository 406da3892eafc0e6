//! Exact Shapley-Shubik indices by subset enumeration.
//!
//! Member `i` is pivotal in an ordering when the members before it (the set
//! `S`) have not reached the threshold `T` and adding `w_i` reaches it. A
//! marking set of size `s` accounts for `s! * (n-1-s)!` orderings, so
//!
//! ```text
//! index_i = sum over marking S of |S|! * (n-1-|S|)!  /  n!
//! ```
//!
//! For each candidate we enumerate the `2^(n-1)` subsets of the other members
//! and count marking subsets by size (the swing counts `M[s]`). Total work is
//! `O(n * 2^n)`, which is why the dispatcher only sends small games here.

use crate::cancel::CancelToken;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::lane::{LaneWeight, WeightLane};
use num_bigint::BigUint;
use num_traits::Zero;
use powerdex_math::{binomial_row, long_division, FactorialTable, DEFAULT_PRECISION};
use powerdex_types::{
    Advisory, ComputeStatus, IndexValue, PowerIndexResult, WeightedVotingGame,
};
use rayon::prelude::*;
use tracing::{debug, warn};

/// Subsets of the other members are indexed by a `u64` mask, so a candidate
/// can have at most 63 peers.
pub const EXACT_MEMBER_LIMIT: usize = 64;

/// Masks visited between cancellation checks.
const CANCEL_CHECK_INTERVAL: u64 = 1 << 16;

/// Result of an exact run.
#[derive(Debug, Clone)]
pub struct ExactOutcome {
    /// One entry per finished member, in input order.
    pub results: Vec<PowerIndexResult>,
    pub status: ComputeStatus,
    pub advisories: Vec<Advisory>,
}

/// Exact power-index calculator.
#[derive(Debug, Clone)]
pub struct ExactCalculator {
    precision: usize,
    safe_bound: usize,
    hard_cap: Option<usize>,
    parallel: bool,
}

impl Default for ExactCalculator {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            safe_bound: 25,
            hard_cap: None,
            parallel: true,
        }
    }
}

impl ExactCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            precision: config.precision,
            safe_bound: config.exact_safe_bound,
            hard_cap: config.hard_cap,
            parallel: config.parallel,
        }
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_safe_bound(mut self, safe_bound: usize) -> Self {
        self.safe_bound = safe_bound;
        self
    }

    pub fn with_hard_cap(mut self, hard_cap: usize) -> Self {
        self.hard_cap = Some(hard_cap);
        self
    }

    /// Refuse sizes past the hard limits, flag sizes past the safe bound.
    pub fn check_size(&self, members: usize) -> Result<Vec<Advisory>, EngineError> {
        if members > EXACT_MEMBER_LIMIT {
            return Err(EngineError::CombinatorialLimit {
                members,
                limit: EXACT_MEMBER_LIMIT,
            });
        }
        if let Some(cap) = self.hard_cap {
            if members > cap {
                return Err(EngineError::CombinatorialLimit { members, limit: cap });
            }
        }
        if members > self.safe_bound {
            warn!(
                "Exact enumeration over {} members exceeds safe bound {}; expect roughly {} subset visits",
                members,
                self.safe_bound,
                (members as u128) << (members - 1)
            );
            return Ok(vec![Advisory::CombinatorialSize {
                members,
                safe_bound: self.safe_bound,
            }]);
        }
        Ok(Vec::new())
    }

    /// Compute every member's exact index.
    ///
    /// Does not apply the dispatcher's short-circuit rules; any game is
    /// answered correctly, including unreachable ones (all zeros).
    pub fn compute(
        &self,
        game: &WeightedVotingGame,
        cancel: &CancelToken,
    ) -> Result<ExactOutcome, EngineError> {
        let n = game.len();
        let advisories = self.check_size(n)?;
        if n == 0 {
            return Ok(ExactOutcome {
                results: Vec::new(),
                status: ComputeStatus::Complete,
                advisories,
            });
        }

        let factorials = FactorialTable::new(n);
        let denominator = factorials.get(n)?.clone();
        debug!("Exact enumeration: {} members, {} orderings", n, denominator);

        let per_member = |i: usize| -> Option<Result<BigUint, EngineError>> {
            if cancel.is_cancelled() {
                return None;
            }
            let counts = self.swing_counts_with_cancel(game, i, cancel)?;
            Some(numerator_from_counts(&counts, &factorials))
        };

        let numerators: Vec<Option<Result<BigUint, EngineError>>> = if self.parallel {
            (0..n).into_par_iter().map(per_member).collect()
        } else {
            (0..n).map(per_member).collect()
        };

        let mut results = Vec::with_capacity(n);
        for (member, numerator) in game.members.iter().zip(numerators) {
            let Some(numerator) = numerator else { continue };
            let numerator = numerator?;
            let decimal = long_division(&numerator, &denominator, self.precision)?;
            results.push(PowerIndexResult::new(
                member.id.clone(),
                IndexValue::Exact {
                    numerator,
                    denominator: denominator.clone(),
                    decimal,
                },
            ));
        }

        let status = if results.len() == n {
            ComputeStatus::Complete
        } else {
            warn!("Exact computation aborted after {} of {} members", results.len(), n);
            ComputeStatus::Aborted {
                completed: results.len() as u64,
                planned: n as u64,
            }
        };

        Ok(ExactOutcome {
            results,
            status,
            advisories,
        })
    }

    /// Swing counts for member `index`: entry `s` is the number of size-`s`
    /// subsets of the other members for which `index` is pivotal.
    pub fn swing_counts(
        &self,
        game: &WeightedVotingGame,
        index: usize,
    ) -> Result<Vec<BigUint>, EngineError> {
        self.check_size(game.len())?;
        if index >= game.len() {
            return Err(EngineError::InvalidMember(format!(
                "member index {} out of range for {} members",
                index,
                game.len()
            )));
        }
        // A fresh token never fires.
        Ok(self
            .swing_counts_with_cancel(game, index, &CancelToken::new())
            .unwrap_or_default())
    }

    fn swing_counts_with_cancel(
        &self,
        game: &WeightedVotingGame,
        index: usize,
        cancel: &CancelToken,
    ) -> Option<Vec<BigUint>> {
        let n = game.len();
        let pivot = game.members[index].weight.as_biguint();
        let threshold = &game.threshold;

        let mut counts = vec![BigUint::zero(); n];

        // With T = 0 the empty prefix is the only one that has not already
        // reached the threshold, so every member is pivotal exactly when first.
        if threshold.is_zero() {
            counts[0] = BigUint::from(1u32);
            return Some(counts);
        }

        // Zero-weight peers never change a subset's weight. Enumerate the
        // weighted peers only and spread each count over the ways of adding
        // zero-weight peers: C(z, k) subsets of size s + k per subset of size s.
        let mut lane_input: Vec<&BigUint> = game
            .members
            .iter()
            .enumerate()
            .filter(|(j, m)| *j != index && !m.weight.is_zero())
            .map(|(_, m)| m.weight.as_biguint())
            .collect();
        let zero_peers = n - 1 - lane_input.len();
        // The pivot rides along as the last entry so the lane also fits it.
        lane_input.push(pivot);

        let weighted_counts = match WeightLane::select(&lane_input, threshold) {
            WeightLane::Native { mut weights, threshold } => {
                let pivot = weights.pop().unwrap_or_default();
                enumerate_subsets(&weights, pivot, &threshold, cancel)?
            }
            WeightLane::Big { mut weights, threshold } => {
                let pivot = weights.pop().unwrap_or_default();
                enumerate_subsets(&weights, pivot, &threshold, cancel)?
            }
        };

        let spread = binomial_row(zero_peers);
        for (s, count) in weighted_counts.iter().enumerate() {
            if *count == 0 {
                continue;
            }
            let count = BigUint::from(*count);
            for (k, ways) in spread.iter().enumerate() {
                counts[s + k] += &count * ways;
            }
        }
        Some(counts)
    }
}

/// `sum_s counts[s] * s! * (n-1-s)!`
fn numerator_from_counts(
    counts: &[BigUint],
    factorials: &FactorialTable,
) -> Result<BigUint, EngineError> {
    let peers = counts.len().saturating_sub(1);
    let mut numerator = BigUint::zero();
    for (s, count) in counts.iter().enumerate() {
        if count.is_zero() {
            continue;
        }
        numerator += count * factorials.arrangements(s, peers - s)?;
    }
    Ok(numerator)
}

/// Count marking subsets of `weights` by size, for a pivot of weight `pivot`
/// and a positive threshold.
///
/// Subsets are visited in Gray-code order so each step adds or removes one
/// weight. Returns `None` if cancelled.
fn enumerate_subsets<W: LaneWeight>(
    weights: &[W],
    pivot: W,
    threshold: &W,
    cancel: &CancelToken,
) -> Option<Vec<u64>> {
    let m = weights.len();
    let mut counts = vec![0u64; m + 1];

    let mut sum = W::lane_zero();
    let mut size = 0usize;
    let mut reach = pivot.clone();

    // Empty subset.
    if &sum < threshold && &reach >= threshold {
        counts[0] += 1;
    }

    let total: u64 = 1u64 << m;
    for step in 1..total {
        if step % CANCEL_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
            return None;
        }
        let bit = step.trailing_zeros() as usize;
        let gray = step ^ (step >> 1);
        if gray & (1u64 << bit) != 0 {
            sum += &weights[bit];
            reach += &weights[bit];
            size += 1;
        } else {
            sum -= &weights[bit];
            reach -= &weights[bit];
            size -= 1;
        }
        if &sum < threshold && &reach >= threshold {
            counts[size] += 1;
        }
    }

    Some(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use powerdex_types::Member;

    fn game(weights: &[u64], threshold: u64) -> WeightedVotingGame {
        let total: u64 = weights.iter().sum();
        let members = weights
            .iter()
            .enumerate()
            .map(|(i, w)| Member::new(format!("m{}", i), *w))
            .collect();
        WeightedVotingGame::new(members, BigUint::from(threshold), BigUint::from(total))
    }

    fn decimals(outcome: &ExactOutcome) -> Vec<String> {
        outcome
            .results
            .iter()
            .map(|r| r.index.decimal().to_string())
            .collect()
    }

    fn numerators(outcome: &ExactOutcome) -> Vec<BigUint> {
        outcome
            .results
            .iter()
            .map(|r| match &r.index {
                IndexValue::Exact { numerator, .. } => numerator.clone(),
                other => panic!("expected exact index, got {:?}", other),
            })
            .collect()
    }

    /// Reference: walk all n! orderings.
    fn brute_force(weights: &[u64], threshold: u64) -> Vec<u64> {
        fn permute(rest: &mut Vec<usize>, prefix: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
            if rest.is_empty() {
                out.push(prefix.clone());
                return;
            }
            for i in 0..rest.len() {
                let x = rest.remove(i);
                prefix.push(x);
                permute(rest, prefix, out);
                prefix.pop();
                rest.insert(i, x);
            }
        }
        let mut orders = Vec::new();
        permute(&mut (0..weights.len()).collect(), &mut Vec::new(), &mut orders);
        let mut pivots = vec![0u64; weights.len()];
        for order in orders {
            let mut acc = 0u64;
            for &i in &order {
                acc += weights[i];
                if acc >= threshold {
                    pivots[i] += 1;
                    break;
                }
            }
        }
        pivots
    }

    #[test]
    fn test_sixty_thirty_ten_simple_majority() {
        // 60 >= 51 on its own: the first member is a dictator.
        let outcome = ExactCalculator::new()
            .compute(&game(&[60, 30, 10], 51), &CancelToken::new())
            .unwrap();
        assert_eq!(outcome.status, ComputeStatus::Complete);
        assert_eq!(
            numerators(&outcome),
            vec![BigUint::from(6u32), BigUint::zero(), BigUint::zero()]
        );
        assert_eq!(decimals(&outcome), vec!["1", "0", "0"]);
    }

    #[test]
    fn test_sixty_thirty_ten_supermajority() {
        // With T = 61 the first member needs a partner: pivotal in 4 of 6 orderings.
        let outcome = ExactCalculator::new()
            .compute(&game(&[60, 30, 10], 61), &CancelToken::new())
            .unwrap();
        assert_eq!(
            numerators(&outcome),
            vec![BigUint::from(4u32), BigUint::from(1u32), BigUint::from(1u32)]
        );
        assert_eq!(
            decimals(&outcome),
            vec!["0.66666666666666666666", "0.16666666666666666666", "0.16666666666666666666"]
        );
    }

    #[test]
    fn test_equal_weights() {
        let outcome = ExactCalculator::new()
            .compute(&game(&[1, 1, 1, 1], 3), &CancelToken::new())
            .unwrap();
        assert_eq!(decimals(&outcome), vec!["0.25"; 4]);
    }

    #[test]
    fn test_matches_brute_force() {
        let cases: &[(&[u64], u64)] = &[
            (&[4, 3, 2, 1], 6),
            (&[10, 0, 5, 0, 5], 11),
            (&[7, 7, 3, 2, 1, 1], 11),
            (&[1, 2, 3, 4, 5, 6], 15),
            (&[0, 0, 9], 5),
            (&[50, 49, 1], 51),
        ];
        for (weights, threshold) in cases {
            let outcome = ExactCalculator::new()
                .compute(&game(weights, *threshold), &CancelToken::new())
                .unwrap();
            let expected: Vec<BigUint> = brute_force(weights, *threshold)
                .into_iter()
                .map(BigUint::from)
                .collect();
            assert_eq!(numerators(&outcome), expected, "weights {:?}", weights);
        }
    }

    #[test]
    fn test_numerators_sum_to_n_factorial() {
        let outcome = ExactCalculator::new()
            .compute(&game(&[13, 8, 8, 5, 3, 2, 1, 1], 21), &CancelToken::new())
            .unwrap();
        let sum: BigUint = numerators(&outcome).iter().sum();
        assert_eq!(sum, BigUint::from(40_320u32));
    }

    #[test]
    fn test_zero_threshold_first_member_pivotal() {
        let outcome = ExactCalculator::new()
            .compute(&game(&[5, 0, 2, 0], 0), &CancelToken::new())
            .unwrap();
        assert_eq!(decimals(&outcome), vec!["0.25"; 4]);
    }

    #[test]
    fn test_zero_weight_member_never_pivotal() {
        let outcome = ExactCalculator::new()
            .compute(&game(&[6, 0, 4], 5), &CancelToken::new())
            .unwrap();
        assert_eq!(decimals(&outcome)[1], "0");
    }

    #[test]
    fn test_unreachable_yields_zeros() {
        let outcome = ExactCalculator::new()
            .compute(&game(&[1, 2], 10), &CancelToken::new())
            .unwrap();
        assert_eq!(decimals(&outcome), vec!["0", "0"]);
    }

    #[test]
    fn test_empty_and_single() {
        let calc = ExactCalculator::new();
        let outcome = calc.compute(&game(&[], 1), &CancelToken::new()).unwrap();
        assert!(outcome.results.is_empty());

        let outcome = calc.compute(&game(&[5], 5), &CancelToken::new()).unwrap();
        assert_eq!(decimals(&outcome), vec!["1"]);
        let outcome = calc.compute(&game(&[4], 5), &CancelToken::new()).unwrap();
        assert_eq!(decimals(&outcome), vec!["0"]);
    }

    #[test]
    fn test_swing_counts_by_size() {
        // T = 61: member 0 (60) swings after {30} and {10} (size 1) and after
        // {30, 10} (size 2), never as the first mover.
        let counts = ExactCalculator::new()
            .swing_counts(&game(&[60, 30, 10], 61), 0)
            .unwrap();
        assert_eq!(
            counts,
            vec![BigUint::zero(), BigUint::from(2u32), BigUint::from(1u32)]
        );
    }

    #[test]
    fn test_swing_counts_out_of_range() {
        let calc = ExactCalculator::new();
        assert!(matches!(
            calc.swing_counts(&game(&[1, 2], 2), 5),
            Err(EngineError::InvalidMember(_))
        ));
    }

    #[test]
    fn test_big_lane_agrees_with_native_lane() {
        let scale: BigUint = BigUint::from(10u32).pow(40);
        let weights = [4u64, 3, 2, 1];
        let members = weights
            .iter()
            .enumerate()
            .map(|(i, w)| Member::new(format!("m{}", i), BigUint::from(*w) * &scale))
            .collect();
        let big_game = WeightedVotingGame::new(
            members,
            BigUint::from(6u32) * &scale,
            BigUint::from(10u32) * &scale,
        );
        let big = ExactCalculator::new()
            .compute(&big_game, &CancelToken::new())
            .unwrap();
        let small = ExactCalculator::new()
            .compute(&game(&weights, 6), &CancelToken::new())
            .unwrap();
        assert_eq!(decimals(&big), decimals(&small));
    }

    #[test]
    fn test_sequential_and_parallel_agree() {
        let g = game(&[9, 8, 7, 6, 5, 4, 3, 2, 1], 23);
        let seq = ExactCalculator::new()
            .with_parallel(false)
            .compute(&g, &CancelToken::new())
            .unwrap();
        let par = ExactCalculator::new()
            .with_parallel(true)
            .compute(&g, &CancelToken::new())
            .unwrap();
        assert_eq!(decimals(&seq), decimals(&par));
    }

    #[test]
    fn test_size_checks() {
        let calc = ExactCalculator::new().with_safe_bound(3);
        assert!(calc.check_size(3).unwrap().is_empty());
        assert_eq!(
            calc.check_size(4).unwrap(),
            vec![Advisory::CombinatorialSize { members: 4, safe_bound: 3 }]
        );

        let capped = calc.with_hard_cap(4);
        assert!(capped.check_size(4).is_ok());
        assert_eq!(
            capped.check_size(5),
            Err(EngineError::CombinatorialLimit { members: 5, limit: 4 })
        );

        assert!(matches!(
            ExactCalculator::new().check_size(65),
            Err(EngineError::CombinatorialLimit { limit: 64, .. })
        ));
    }

    #[test]
    fn test_advisory_attached_past_safe_bound() {
        let outcome = ExactCalculator::new()
            .with_safe_bound(2)
            .compute(&game(&[1, 1, 1], 2), &CancelToken::new())
            .unwrap();
        assert_eq!(outcome.advisories.len(), 1);
        assert_eq!(outcome.status, ComputeStatus::Complete);
    }

    #[test]
    fn test_cancelled_before_start() {
        let token = CancelToken::new();
        token.cancel();
        let outcome = ExactCalculator::new()
            .compute(&game(&[3, 2, 1], 4), &token)
            .unwrap();
        assert!(outcome.results.is_empty());
        assert_eq!(
            outcome.status,
            ComputeStatus::Aborted { completed: 0, planned: 3 }
        );
    }

    #[test]
    fn test_precision_controls_digits() {
        let outcome = ExactCalculator::new()
            .with_precision(4)
            .compute(&game(&[60, 30, 10], 61), &CancelToken::new())
            .unwrap();
        assert_eq!(decimals(&outcome), vec!["0.6666", "0.1666", "0.1666"]);
    }
}
