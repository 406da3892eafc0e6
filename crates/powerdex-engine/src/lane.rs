//! Weight representation used inside the hot loops.
//!
//! When every partial sum fits in `u128` the loops run on native integers;
//! otherwise they fall back to `BigUint`. Both lanes give identical answers.

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use std::ops::{AddAssign, SubAssign};

/// Integer type the enumeration and sampling loops are generic over.
pub(crate) trait LaneWeight:
    Clone + Ord + Send + Sync + for<'a> AddAssign<&'a Self> + for<'a> SubAssign<&'a Self>
{
    fn lane_zero() -> Self;
}

impl LaneWeight for u128 {
    fn lane_zero() -> Self {
        0
    }
}

impl LaneWeight for BigUint {
    fn lane_zero() -> Self {
        BigUint::zero()
    }
}

pub(crate) enum WeightLane {
    Native { weights: Vec<u128>, threshold: u128 },
    Big { weights: Vec<BigUint>, threshold: BigUint },
}

impl WeightLane {
    /// Pick the narrowest lane that holds the full weight sum and the threshold.
    pub(crate) fn select(weights: &[&BigUint], threshold: &BigUint) -> Self {
        let total: BigUint = weights.iter().copied().sum();
        match (total.to_u128(), threshold.to_u128()) {
            (Some(_), Some(t)) => WeightLane::Native {
                // Each weight is at most the total, so it fits too.
                weights: weights.iter().map(|w| w.to_u128().unwrap_or(u128::MAX)).collect(),
                threshold: t,
            },
            _ => WeightLane::Big {
                weights: weights.iter().map(|w| (*w).clone()).collect(),
                threshold: threshold.clone(),
            },
        }
    }

    #[cfg(test)]
    pub(crate) fn is_native(&self) -> bool {
        matches!(self, WeightLane::Native { .. })
    }
}
