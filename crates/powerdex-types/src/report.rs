//! Power index results and computation reports.

use crate::member::MemberId;
use num_bigint::BigUint;
use std::fmt;

/// A member's power index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexValue {
    /// Exact rational `numerator / denominator` (denominator is `n!`).
    Exact {
        numerator: BigUint,
        denominator: BigUint,
        decimal: String,
    },
    /// Share of sampled orderings in which the member was pivotal.
    Sampled {
        hits: u64,
        samples: u64,
        decimal: String,
    },
}

impl IndexValue {
    /// Fixed-precision decimal rendering.
    pub fn decimal(&self) -> &str {
        match self {
            IndexValue::Exact { decimal, .. } | IndexValue::Sampled { decimal, .. } => decimal,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, IndexValue::Exact { .. })
    }
}

impl fmt::Display for IndexValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.decimal())
    }
}

/// Index of one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerIndexResult {
    pub member_id: MemberId,
    pub index: IndexValue,
}

impl PowerIndexResult {
    pub fn new(member_id: MemberId, index: IndexValue) -> Self {
        Self { member_id, index }
    }
}

/// Why a game was answered without running either algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrivialReason {
    EmptyGame,
    Unreachable,
    SingleMember,
}

impl fmt::Display for TrivialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrivialReason::EmptyGame => "empty game",
            TrivialReason::Unreachable => "threshold unreachable",
            TrivialReason::SingleMember => "single member",
        };
        f.write_str(s)
    }
}

/// Which path produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Exact,
    MonteCarlo { samples: u64, seed: u64 },
    Trivial(TrivialReason),
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Exact => f.write_str("exact"),
            Method::MonteCarlo { samples, seed } => {
                write!(f, "monte-carlo ({} samples, seed {})", samples, seed)
            }
            Method::Trivial(reason) => write!(f, "trivial ({})", reason),
        }
    }
}

/// Whether a computation ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeStatus {
    Complete,
    /// Cancelled or timed out. `completed` and `planned` count members on the
    /// exact path and samples on the randomized path.
    Aborted { completed: u64, planned: u64 },
}

impl ComputeStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, ComputeStatus::Complete)
    }
}

/// Non-fatal findings attached to a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// The exact path ran beyond the configured safe member count.
    CombinatorialSize { members: usize, safe_bound: usize },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::CombinatorialSize { members, safe_bound } => write!(
                f,
                "exact computation over {} members exceeds safe bound {}",
                members, safe_bound
            ),
        }
    }
}

/// Output of one game computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerIndexReport {
    pub method: Method,
    pub threshold: BigUint,
    pub status: ComputeStatus,
    /// One entry per member, in input order, when complete.
    pub results: Vec<PowerIndexResult>,
    pub advisories: Vec<Advisory>,
}

impl PowerIndexReport {
    /// Index of a given member, if present.
    pub fn index_of(&self, id: &MemberId) -> Option<&IndexValue> {
        self.results
            .iter()
            .find(|r| &r.member_id == id)
            .map(|r| &r.index)
    }

    /// Decimal strings in result order.
    pub fn decimals(&self) -> Vec<&str> {
        self.results.iter().map(|r| r.index.decimal()).collect()
    }
}
