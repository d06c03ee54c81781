use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mm7::simulation::random_market::{generate_random_market, MarketConfig};

fn bench_market(c: &mut Criterion, name: &str, currencies: usize, strategies: usize) {
    let scenario = generate_random_market(&MarketConfig {
        currencies,
        strategies,
        seed: Some(2024),
        ..Default::default()
    });
    let exchange = scenario.build().unwrap();

    c.bench_function(name, |b| {
        b.iter_batched(
            || exchange.clone(),
            |mut exchange| black_box(exchange.run_turn().unwrap()),
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_turn_5_currencies(c: &mut Criterion) {
    bench_market(c, "turn_5_currencies_20_strategies", 5, 20);
}

fn bench_turn_50_currencies(c: &mut Criterion) {
    bench_market(c, "turn_50_currencies_500_strategies", 50, 500);
}

fn bench_turn_200_currencies(c: &mut Criterion) {
    bench_market(c, "turn_200_currencies_5000_strategies", 200, 5_000);
}

criterion_group!(
    benches,
    bench_turn_5_currencies,
    bench_turn_50_currencies,
    bench_turn_200_currencies
);
criterion_main!(benches);
