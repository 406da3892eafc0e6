//! Monte Carlo estimation of Shapley-Shubik indices.
//!
//! Each trial draws a uniformly random ordering (Fisher-Yates shuffle), walks
//! it accumulating weight and credits the member at which the running total
//! first reaches the threshold. `index_i ~= hits_i / samples`, with error
//! shrinking as `1 / sqrt(samples)`.
//!
//! Trials run in fixed-size batches. Batch `b` draws from a ChaCha8 stream
//! keyed by `(seed, b)` and keeps its own counters; batches are combined in a
//! single reduction. A seeded run is therefore identical whether the batches
//! run in parallel or one after another.

use crate::cancel::CancelToken;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::lane::{LaneWeight, WeightLane};
use num_bigint::BigUint;
use powerdex_math::{long_division, DEFAULT_PRECISION};
use powerdex_types::{ComputeStatus, IndexValue, PowerIndexResult, WeightedVotingGame};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, warn};

/// Per-member pivot counts over some number of trials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleCounts {
    pub hits: Vec<u64>,
    pub samples: u64,
}

impl SampleCounts {
    pub fn new(members: usize) -> Self {
        Self {
            hits: vec![0; members],
            samples: 0,
        }
    }

    /// Combine two partial tallies.
    pub fn merge(mut self, other: SampleCounts) -> SampleCounts {
        for (a, b) in self.hits.iter_mut().zip(other.hits) {
            *a += b;
        }
        self.samples += other.samples;
        self
    }
}

/// Result of a Monte Carlo run.
#[derive(Debug, Clone)]
pub struct MonteCarloOutcome {
    pub results: Vec<PowerIndexResult>,
    pub status: ComputeStatus,
    /// Seed actually used; rerun with it to reproduce the estimate.
    pub seed: u64,
    pub samples: u64,
}

/// Randomized power-index estimator.
#[derive(Debug, Clone)]
pub struct MonteCarloEstimator {
    samples: u64,
    batch_size: u64,
    seed: Option<u64>,
    precision: usize,
    parallel: bool,
}

impl Default for MonteCarloEstimator {
    fn default() -> Self {
        Self {
            samples: 1_000_000,
            batch_size: 10_000,
            seed: None,
            precision: DEFAULT_PRECISION,
            parallel: true,
        }
    }
}

impl MonteCarloEstimator {
    pub fn new(samples: u64) -> Self {
        Self {
            samples,
            ..Self::default()
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            samples: config.samples,
            batch_size: config.batch_size,
            seed: config.seed,
            precision: config.precision,
            parallel: config.parallel,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_batch_size(mut self, batch_size: u64) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Estimate every member's index.
    pub fn estimate(
        &self,
        game: &WeightedVotingGame,
        cancel: &CancelToken,
    ) -> Result<MonteCarloOutcome, EngineError> {
        if self.samples == 0 || self.batch_size == 0 {
            return Err(EngineError::InvalidConfig(
                "samples and batch_size must be positive".to_string(),
            ));
        }

        let seed = self.seed.unwrap_or_else(rand::random);
        let counts = self.sample_counts(game, seed, cancel);

        let mut results = Vec::with_capacity(game.len());
        for (member, hits) in game.members.iter().zip(&counts.hits) {
            let decimal = if counts.samples == 0 {
                "0".to_string()
            } else {
                long_division(
                    &BigUint::from(*hits),
                    &BigUint::from(counts.samples),
                    self.precision,
                )?
            };
            results.push(PowerIndexResult::new(
                member.id.clone(),
                IndexValue::Sampled {
                    hits: *hits,
                    samples: counts.samples,
                    decimal,
                },
            ));
        }

        let status = if counts.samples == self.samples {
            ComputeStatus::Complete
        } else {
            warn!(
                "Monte Carlo aborted after {} of {} samples (seed {})",
                counts.samples, self.samples, seed
            );
            ComputeStatus::Aborted {
                completed: counts.samples,
                planned: self.samples,
            }
        };

        Ok(MonteCarloOutcome {
            results,
            status,
            seed,
            samples: self.samples,
        })
    }

    /// Raw pivot tallies for a given seed.
    ///
    /// Orderings are drawn over member positions, so the pivotal position is
    /// directly the counter slot: no identifier lookup inside the loop.
    pub fn sample_counts(
        &self,
        game: &WeightedVotingGame,
        seed: u64,
        cancel: &CancelToken,
    ) -> SampleCounts {
        let n = game.len();
        let weights: Vec<&BigUint> = game.members.iter().map(|m| m.weight.as_biguint()).collect();
        let lane = WeightLane::select(&weights, &game.threshold);

        let batches = self.samples.div_ceil(self.batch_size);
        debug!(
            "Monte Carlo: {} members, {} samples in {} batches, seed {}",
            n, self.samples, batches, seed
        );

        let run = |batch: u64| -> Option<SampleCounts> {
            if cancel.is_cancelled() {
                return None;
            }
            let start = batch * self.batch_size;
            let trials = self.batch_size.min(self.samples - start);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            rng.set_stream(batch);
            let mut counts = SampleCounts::new(n);
            match &lane {
                WeightLane::Native { weights, threshold } => {
                    run_trials(weights, threshold, trials, &mut rng, &mut counts.hits)
                }
                WeightLane::Big { weights, threshold } => {
                    run_trials(weights, threshold, trials, &mut rng, &mut counts.hits)
                }
            }
            counts.samples = trials;
            Some(counts)
        };

        if self.parallel {
            (0..batches)
                .into_par_iter()
                .filter_map(run)
                .reduce(|| SampleCounts::new(n), SampleCounts::merge)
        } else {
            (0..batches)
                .filter_map(run)
                .fold(SampleCounts::new(n), SampleCounts::merge)
        }
    }
}

/// Run `trials` random orderings, crediting pivots into `hits`.
fn run_trials<W: LaneWeight>(
    weights: &[W],
    threshold: &W,
    trials: u64,
    rng: &mut ChaCha8Rng,
    hits: &mut [u64],
) {
    let mut order: Vec<usize> = (0..weights.len()).collect();
    for _ in 0..trials {
        order.shuffle(rng);
        let mut acc = W::lane_zero();
        for &position in &order {
            acc += &weights[position];
            if &acc >= threshold {
                hits[position] += 1;
                break;
            }
        }
    }
}
