use crate::member::Member;
use crate::weight::Weight;
use num_bigint::BigUint;

/// A weighted voting game: members, the absolute pass threshold and the
/// total weight the threshold was derived from.
///
/// Built once per computation request and consumed by one algorithm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedVotingGame {
    /// Members in input order. Results are reported in the same order.
    pub members: Vec<Member>,
    /// Minimum aggregate weight a coalition needs.
    pub threshold: BigUint,
    /// Weight basis the threshold was computed from.
    pub total_weight: BigUint,
}

impl WeightedVotingGame {
    pub fn new(members: Vec<Member>, threshold: BigUint, total_weight: BigUint) -> Self {
        Self {
            members,
            threshold,
            total_weight,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Sum of the members' weights.
    pub fn member_weight_sum(&self) -> Weight {
        self.members.iter().map(|m| &m.weight).sum()
    }

    /// No ordering can ever reach the threshold.
    ///
    /// True when the threshold exceeds either the declared total weight or
    /// the weight actually held by the members.
    pub fn is_unreachable(&self) -> bool {
        self.threshold > self.total_weight
            || &self.threshold > self.member_weight_sum().as_biguint()
    }
}
