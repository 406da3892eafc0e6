//! Engine configuration.
//!
//! Every field has a default so partial TOML/JSON documents load cleanly.

use crate::error::EngineError;
use crate::exact::EXACT_MEMBER_LIMIT;
use powerdex_math::DEFAULT_PRECISION;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which algorithm to run once the short-circuit rules have passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Exact up to `exact_max_members`, Monte Carlo above.
    #[default]
    Auto,
    Exact,
    MonteCarlo,
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Largest electorate computed exactly under `Strategy::Auto`.
    /// Exact work grows as `n * 2^n`; this is where it stops being practical.
    pub exact_max_members: usize,
    /// Exact runs above this size succeed but carry a size advisory.
    pub exact_safe_bound: usize,
    /// Exact runs above this size are refused.
    pub hard_cap: Option<usize>,
    /// Fractional digits in rendered indices.
    pub precision: usize,
    /// Monte Carlo trials.
    pub samples: u64,
    /// Trials per Monte Carlo batch (the unit of parallelism and cancellation).
    pub batch_size: u64,
    /// Fixed RNG seed for reproducible estimates.
    pub seed: Option<u64>,
    /// Run member/batch work on the rayon pool.
    pub parallel: bool,
    /// Abort a game after this many milliseconds.
    pub timeout_ms: Option<u64>,
    pub strategy: Strategy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            exact_max_members: 20,
            exact_safe_bound: 25,
            hard_cap: None,
            precision: DEFAULT_PRECISION,
            samples: 1_000_000,
            batch_size: 10_000,
            seed: None,
            parallel: true,
            timeout_ms: None,
            strategy: Strategy::Auto,
        }
    }
}

impl EngineConfig {
    /// Validate configuration.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.precision == 0 {
            return Err(EngineError::InvalidConfig("precision cannot be 0".to_string()));
        }
        if self.samples == 0 {
            return Err(EngineError::InvalidConfig("samples cannot be 0".to_string()));
        }
        if self.batch_size == 0 {
            return Err(EngineError::InvalidConfig("batch_size cannot be 0".to_string()));
        }
        if self.exact_max_members > EXACT_MEMBER_LIMIT {
            return Err(EngineError::InvalidConfig(format!(
                "exact_max_members {} exceeds the enumeration limit {}",
                self.exact_max_members, EXACT_MEMBER_LIMIT
            )));
        }
        Ok(())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_samples(mut self, samples: u64) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}
