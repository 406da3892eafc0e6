use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use num_bigint::BigUint;
use powerdex_engine::{CancelToken, MonteCarloEstimator};
use powerdex_types::{Member, WeightedVotingGame};

fn game(n: usize) -> WeightedVotingGame {
    let members: Vec<Member> = (0..n)
        .map(|i| Member::new(format!("m{}", i), (i as u64 * 31 % 97) + 1))
        .collect();
    let total: u64 = (0..n as u64).map(|i| (i * 31 % 97) + 1).sum();
    WeightedVotingGame::new(members, BigUint::from(total * 51 / 100 + 1), BigUint::from(total))
}

fn bench_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("monte_carlo");
    group.sample_size(10);
    let samples = 100_000u64;
    group.throughput(Throughput::Elements(samples));
    for n in [32usize, 128, 512] {
        let g = game(n);
        group.bench_with_input(BenchmarkId::new("members", n), &g, |b, g| {
            let est = MonteCarloEstimator::new(samples).with_seed(1);
            b.iter(|| black_box(est.sample_counts(g, 1, &CancelToken::new())))
        });
    }
    group.finish();
}

fn bench_big_weights(c: &mut Criterion) {
    let mut group = c.benchmark_group("monte_carlo_big");
    group.sample_size(10);
    let scale: BigUint = "1000000000000000000000000000000000000000000".parse().unwrap();
    let mut g = game(64);
    for m in &mut g.members {
        m.weight = (m.weight.as_biguint() * &scale).into();
    }
    g.threshold *= &scale;
    g.total_weight *= &scale;
    group.bench_function("members_64", |b| {
        let est = MonteCarloEstimator::new(20_000).with_seed(1);
        b.iter(|| black_box(est.sample_counts(&g, 1, &CancelToken::new())))
    });
    group.finish();
}

criterion_group!(benches, bench_sampling, bench_big_weights);
criterion_main!(benches);
