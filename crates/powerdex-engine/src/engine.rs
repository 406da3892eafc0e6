//! Dispatcher: validation, short-circuit rules and path selection.

use crate::cancel::CancelToken;
use crate::concentration::ConcentrationMetrics;
use crate::config::{EngineConfig, Strategy};
use crate::error::EngineError;
use crate::exact::ExactCalculator;
use crate::monte_carlo::MonteCarloEstimator;
use crate::threshold::game_from_quorum;
use crate::validate::validate_game;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use powerdex_types::{
    ComputeStatus, IndexValue, Member, Method, PowerIndexReport, PowerIndexResult, Quorum,
    TrivialReason, Weight, WeightedVotingGame,
};
use rayon::prelude::*;
use tracing::{debug, info};

/// Power-index engine.
///
/// Every game goes through the same sequence: validation, the short-circuit
/// rules (empty, unreachable, single member), then the exact calculator or
/// the Monte Carlo estimator. Trivial games get identical answers whichever
/// path would otherwise have been picked.
#[derive(Debug, Clone, Default)]
pub struct PowerIndexEngine {
    config: EngineConfig,
}

impl PowerIndexEngine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute indices for one game.
    pub fn compute(&self, game: &WeightedVotingGame) -> Result<PowerIndexReport, EngineError> {
        self.compute_with_cancel(game, &CancelToken::new())
    }

    /// Compute indices, stopping early if `cancel` fires or the configured
    /// timeout elapses.
    pub fn compute_with_cancel(
        &self,
        game: &WeightedVotingGame,
        cancel: &CancelToken,
    ) -> Result<PowerIndexReport, EngineError> {
        validate_game(game)?;

        if let Some(report) = short_circuit(game) {
            debug!("Trivial game: {}", report.method);
            return Ok(report);
        }

        let cancel = match self.config.timeout() {
            Some(timeout) => cancel.child_with_timeout(timeout),
            None => cancel.clone(),
        };

        let n = game.len();
        let report = if self.use_exact(n) {
            debug!("Exact path selected for {} members", n);
            let outcome = ExactCalculator::from_config(&self.config).compute(game, &cancel)?;
            PowerIndexReport {
                method: Method::Exact,
                threshold: game.threshold.clone(),
                status: outcome.status,
                results: outcome.results,
                advisories: outcome.advisories,
            }
        } else {
            debug!(
                "Monte Carlo path selected for {} members ({} samples)",
                n, self.config.samples
            );
            let outcome = MonteCarloEstimator::from_config(&self.config).estimate(game, &cancel)?;
            PowerIndexReport {
                method: Method::MonteCarlo {
                    samples: outcome.samples,
                    seed: outcome.seed,
                },
                threshold: game.threshold.clone(),
                status: outcome.status,
                results: outcome.results,
                advisories: Vec::new(),
            }
        };

        info!(
            "Computed {} member indices via {} (threshold {})",
            report.results.len(),
            report.method,
            report.threshold
        );
        Ok(report)
    }

    /// Resolve the threshold from a quorum, then compute.
    pub fn compute_from_quorum(
        &self,
        members: Vec<Member>,
        quorum: &Quorum,
        total_weight: &Weight,
    ) -> Result<PowerIndexReport, EngineError> {
        let game = game_from_quorum(members, quorum, total_weight)?;
        self.compute(&game)
    }

    /// Compute many independent games concurrently.
    ///
    /// Results come back in input order, each keyed as given. A failing game
    /// yields its own `Err` and leaves the others untouched.
    pub fn compute_batch<K>(
        &self,
        games: &[(K, WeightedVotingGame)],
    ) -> Vec<(K, Result<PowerIndexReport, EngineError>)>
    where
        K: Clone + Send + Sync,
    {
        self.compute_batch_with_cancel(games, &CancelToken::new())
    }

    pub fn compute_batch_with_cancel<K>(
        &self,
        games: &[(K, WeightedVotingGame)],
        cancel: &CancelToken,
    ) -> Vec<(K, Result<PowerIndexReport, EngineError>)>
    where
        K: Clone + Send + Sync,
    {
        debug!("Computing batch of {} games", games.len());
        let run = |(key, game): &(K, WeightedVotingGame)| {
            (key.clone(), self.compute_with_cancel(game, cancel))
        };
        if self.config.parallel {
            games.par_iter().map(run).collect()
        } else {
            games.iter().map(run).collect()
        }
    }

    /// Concentration metrics for a validated game, rendered at the configured precision.
    pub fn concentration(
        &self,
        game: &WeightedVotingGame,
    ) -> Result<ConcentrationMetrics, EngineError> {
        validate_game(game)?;
        ConcentrationMetrics::of_game(game, self.config.precision)
    }

    fn use_exact(&self, members: usize) -> bool {
        match self.config.strategy {
            Strategy::Exact => true,
            Strategy::MonteCarlo => false,
            Strategy::Auto => members <= self.config.exact_max_members,
        }
    }
}

/// Answer games whose result does not depend on enumeration or sampling.
fn short_circuit(game: &WeightedVotingGame) -> Option<PowerIndexReport> {
    let trivial = |reason: TrivialReason, results: Vec<PowerIndexResult>| PowerIndexReport {
        method: Method::Trivial(reason),
        threshold: game.threshold.clone(),
        status: ComputeStatus::Complete,
        results,
        advisories: Vec::new(),
    };

    if game.is_empty() {
        return Some(trivial(TrivialReason::EmptyGame, Vec::new()));
    }

    if game.is_unreachable() {
        let results = game
            .members
            .iter()
            .map(|m| PowerIndexResult::new(m.id.clone(), whole(false)))
            .collect();
        return Some(trivial(TrivialReason::Unreachable, results));
    }

    if let [only] = game.members.as_slice() {
        let pivotal = only.weight.as_biguint() >= &game.threshold;
        let results = vec![PowerIndexResult::new(only.id.clone(), whole(pivotal))];
        return Some(trivial(TrivialReason::SingleMember, results));
    }

    None
}

/// Exact index of exactly 1 or 0.
fn whole(pivotal: bool) -> IndexValue {
    let (numerator, decimal) = if pivotal {
        (BigUint::one(), "1")
    } else {
        (BigUint::zero(), "0")
    };
    IndexValue::Exact {
        numerator,
        denominator: BigUint::one(),
        decimal: decimal.to_string(),
    }
}
