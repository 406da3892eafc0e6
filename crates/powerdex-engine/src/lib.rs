//! Powerdex Engine - Shapley-Shubik power indices for weighted voting games.
//!
//! This crate provides:
//! - Quorum threshold resolution in exact integer arithmetic
//! - Exact power indices by subset enumeration (small games)
//! - Monte Carlo estimation over random orderings (large games)
//! - Validation, short-circuit rules and path selection
//! - Cancellation and batch execution across independent games
//! - Concentration metrics (Nakamoto, Gini, HHI and friends) over the same weights

pub mod config;
pub mod cancel;
pub mod threshold;
pub mod validate;
pub mod exact;
pub mod monte_carlo;
pub mod engine;
pub mod concentration;
pub mod error;
mod lane;

pub use config::{EngineConfig, Strategy};
pub use cancel::CancelToken;
pub use threshold::{game_from_quorum, game_from_signed, resolve_percent, resolve_threshold};
pub use validate::{position_index, validate_game, validate_members, RawMember};
pub use exact::{ExactCalculator, ExactOutcome, EXACT_MEMBER_LIMIT};
pub use monte_carlo::{MonteCarloEstimator, MonteCarloOutcome, SampleCounts};
pub use engine::PowerIndexEngine;
pub use concentration::{concentration, ConcentrationMetrics};
pub use error::EngineError;
