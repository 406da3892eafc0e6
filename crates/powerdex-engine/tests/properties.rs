//! Property tests over randomly generated voting games.

use num_bigint::BigUint;
use num_traits::Zero;
use powerdex_engine::{EngineConfig, PowerIndexEngine, Strategy as Path};
use powerdex_types::{IndexValue, Member, PowerIndexReport, WeightedVotingGame};
use proptest::prelude::*;

fn build(weights: &[u32], threshold: u64) -> WeightedVotingGame {
    let total: u64 = weights.iter().map(|w| *w as u64).sum();
    let members = weights
        .iter()
        .enumerate()
        .map(|(i, w)| Member::new(format!("p{}", i), *w))
        .collect();
    WeightedVotingGame::new(members, BigUint::from(threshold), BigUint::from(total))
}

fn engine(path: Path) -> PowerIndexEngine {
    let config = EngineConfig::default()
        .with_strategy(path)
        .with_samples(2_000)
        .with_seed(11);
    PowerIndexEngine::new(config).unwrap()
}

fn numerators(report: &PowerIndexReport) -> Vec<BigUint> {
    report
        .results
        .iter()
        .map(|r| match &r.index {
            IndexValue::Exact { numerator, .. } => numerator.clone(),
            IndexValue::Sampled { .. } => panic!("expected exact index"),
        })
        .collect()
}

/// Weights plus a threshold anywhere from 0 to a bit past the total.
fn game_strategy() -> impl Strategy<Value = (Vec<u32>, u64)> {
    prop::collection::vec(0u32..50, 2..9).prop_flat_map(|weights| {
        let total: u64 = weights.iter().map(|w| *w as u64).sum();
        (Just(weights), 0..=total + 2)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn exact_indices_sum_to_one_when_reachable((weights, threshold) in game_strategy()) {
        let game = build(&weights, threshold);
        let report = engine(Path::Exact).compute(&game).unwrap();
        let sum: BigUint = numerators(&report).iter().sum();
        if game.is_unreachable() {
            prop_assert!(sum.is_zero());
        } else {
            let IndexValue::Exact { denominator, .. } = &report.results[0].index else {
                unreachable!()
            };
            prop_assert_eq!(&sum, denominator);
        }
    }

    #[test]
    fn equal_weights_are_symmetric(n in 2usize..9, w in 1u32..20, q in 0u64..200) {
        let weights = vec![w; n];
        let threshold = q.min(w as u64 * n as u64);
        let report = engine(Path::Exact).compute(&build(&weights, threshold)).unwrap();
        let first = report.results[0].index.decimal().to_string();
        prop_assert!(report.results.iter().all(|r| r.index.decimal() == first));
    }

    #[test]
    fn reordering_members_permutes_indices((weights, threshold) in game_strategy()) {
        let forward = build(&weights, threshold);
        let mut reversed = forward.clone();
        reversed.members.reverse();

        let a = engine(Path::Exact).compute(&forward).unwrap();
        let b = engine(Path::Exact).compute(&reversed).unwrap();
        for r in &a.results {
            prop_assert_eq!(Some(&r.index), b.index_of(&r.member_id));
        }
    }

    #[test]
    fn heavier_member_never_has_less_power((weights, threshold) in game_strategy()) {
        let report = engine(Path::Exact).compute(&build(&weights, threshold)).unwrap();
        let nums = numerators(&report);
        for i in 0..weights.len() {
            for j in 0..weights.len() {
                if weights[i] >= weights[j] {
                    prop_assert!(nums[i] >= nums[j]);
                }
            }
        }
    }

    #[test]
    fn trivial_games_agree_across_paths(weight in 0u32..100, threshold in 0u64..120, extra in 1u64..50) {
        let single = build(&[weight], threshold);
        let unreachable = WeightedVotingGame::new(
            vec![Member::new("a", weight), Member::new("b", weight)],
            BigUint::from(2 * weight as u64 + extra),
            BigUint::from(2 * weight as u64),
        );
        for game in [single, unreachable] {
            let exact = engine(Path::Exact).compute(&game).unwrap();
            let sampled = engine(Path::MonteCarlo).compute(&game).unwrap();
            prop_assert_eq!(exact, sampled);
        }
    }
}
