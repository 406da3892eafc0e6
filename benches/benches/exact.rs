use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use num_bigint::BigUint;
use powerdex_engine::{CancelToken, ExactCalculator};
use powerdex_math::{long_division, FactorialTable};
use powerdex_types::{Member, WeightedVotingGame};

fn game(n: usize) -> WeightedVotingGame {
    let members: Vec<Member> = (0..n)
        .map(|i| Member::new(format!("m{}", i), (i as u64 % 7) + 1))
        .collect();
    let total: u64 = (0..n as u64).map(|i| (i % 7) + 1).sum();
    WeightedVotingGame::new(members, BigUint::from(total / 2 + 1), BigUint::from(total))
}

fn bench_exact_by_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("exact");
    group.sample_size(10);
    for n in [8usize, 12, 16] {
        let g = game(n);
        group.throughput(Throughput::Elements((n as u64) << (n - 1)));
        group.bench_with_input(BenchmarkId::new("parallel", n), &g, |b, g| {
            let calc = ExactCalculator::new();
            b.iter(|| black_box(calc.compute(g, &CancelToken::new()).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("sequential", n), &g, |b, g| {
            let calc = ExactCalculator::new().with_parallel(false);
            b.iter(|| black_box(calc.compute(g, &CancelToken::new()).unwrap()))
        });
    }
    group.finish();
}

fn bench_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("arithmetic");
    group.bench_function("factorials_64", |b| b.iter(|| black_box(FactorialTable::new(64))));

    let table = FactorialTable::new(25);
    let denominator = table.get(25).unwrap().clone();
    let numerator = &denominator / BigUint::from(3u32);
    group.bench_function("long_division_20", |b| {
        b.iter(|| black_box(long_division(&numerator, &denominator, 20).unwrap()))
    });
    group.finish();
}

criterion_group!(benches, bench_exact_by_size, bench_arithmetic);
criterion_main!(benches);
