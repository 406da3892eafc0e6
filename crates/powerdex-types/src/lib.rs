//! Powerdex Types - Core type definitions for voting power computations.
//!
//! This crate provides the data model shared by every Powerdex crate:
//! - Member identifiers and unbounded, non-negative voting weights
//! - Quorum percentages as exact rationals
//! - Weighted voting games
//! - Power index results and computation reports

pub mod member;
pub mod weight;
pub mod quorum;
pub mod game;
pub mod report;
pub mod error;

#[cfg(feature = "serde")]
mod serialization;

pub use member::{Member, MemberId};
pub use weight::Weight;
pub use quorum::Quorum;
pub use game::WeightedVotingGame;
pub use report::{
    Advisory, ComputeStatus, IndexValue, Method, PowerIndexReport, PowerIndexResult,
    TrivialReason,
};
pub use error::TypesError;

/// Re-exported so downstream crates agree on one big integer type.
pub use num_bigint::{BigInt, BigUint};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Advisory, BigUint, ComputeStatus, IndexValue, Member, MemberId, Method, PowerIndexReport,
        PowerIndexResult, Quorum, TrivialReason, TypesError, Weight, WeightedVotingGame,
    };
}
