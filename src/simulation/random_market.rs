//! Random market generation for benchmarks and stress runs.

use crate::core::currency::CurrencyId;
use crate::simulation::scenario::{RateInput, Scenario, StrategyInput};
use crate::strategy::registry::DEFAULT_CAPACITY;
use crate::strategy::rule::Comparator;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Configuration for generating a random market.
#[derive(Debug, Clone)]
pub struct MarketConfig {
    /// Number of currencies.
    pub currencies: usize,
    /// Number of strategies to register.
    pub strategies: usize,
    /// Range of quoted rates.
    pub min_rate: f64,
    pub max_rate: f64,
    /// Opening balance range per currency.
    pub min_balance: f64,
    pub max_balance: f64,
    /// Upper bound on each strategy leg's volume.
    pub max_volume: f64,
    pub turns: usize,
    /// Fixed seed for reproducible markets; `None` draws one at random.
    pub seed: Option<u64>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            currencies: 5,
            strategies: 20,
            min_rate: 0.5,
            max_rate: 2.0,
            min_balance: 1_000.0,
            max_balance: 100_000.0,
            max_volume: 500.0,
            turns: 10,
            seed: None,
        }
    }
}

fn random_pair(rng: &mut StdRng, currencies: usize) -> (CurrencyId, CurrencyId) {
    let sell = rng.gen_range(0..currencies);
    let mut buy = rng.gen_range(0..currencies);
    while buy == sell {
        buy = rng.gen_range(0..currencies);
    }
    (CurrencyId::new(sell), CurrencyId::new(buy))
}

/// Generate a scenario with every off-diagonal rate quoted, random balances
/// and random strategies.
///
/// Markets with fewer than two currencies have no pairs, so no rates or
/// strategies are generated for them.
pub fn generate_random_market(config: &MarketConfig) -> Scenario {
    let seed = config.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    let n = config.currencies;

    let balances = (0..n)
        .map(|_| rng.gen_range(config.min_balance..=config.max_balance).round())
        .collect();

    let mut rates = Vec::new();
    let mut strategies = Vec::new();
    if n >= 2 {
        for sell in 0..n {
            for buy in (0..n).filter(|&b| b != sell) {
                rates.push(RateInput {
                    sell: CurrencyId::new(sell),
                    buy: CurrencyId::new(buy),
                    rate: rng.gen_range(config.min_rate..=config.max_rate),
                });
            }
        }

        for _ in 0..config.strategies {
            let (sell, buy) = random_pair(&mut rng, n);
            let cmp = if rng.gen_bool(0.5) {
                Comparator::Le
            } else {
                Comparator::Ge
            };
            strategies.push(StrategyInput {
                sell,
                buy,
                cmp,
                target: rng.gen_range(config.min_rate..=config.max_rate),
                sell_volume: rng.gen_range(0.0..=config.max_volume).round(),
                buy_volume: rng.gen_range(0.0..=config.max_volume).round(),
            });
        }
    }

    Scenario {
        currencies: n,
        strategy_capacity: DEFAULT_CAPACITY,
        balances,
        rates,
        strategies,
        orders: Vec::new(),
        turns: config.turns,
    }
}
