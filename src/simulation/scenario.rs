//! Replayable exchange scenarios described in JSON.
//!
//! ```json
//! {
//!   "currencies": 2,
//!   "balances": [100.0, 100.0],
//!   "rates": [{ "sell": 1, "buy": 0, "rate": 0.9 }],
//!   "strategies": [
//!     { "sell": 1, "buy": 0, "cmp": "le", "target": 1.0, "sell_volume": 10.0, "buy_volume": 9.0 }
//!   ],
//!   "orders": [],
//!   "turns": 1
//! }
//! ```

use crate::core::currency::{Amount, CurrencyId};
use crate::core::error::ExchangeError;
use crate::core::order::Order;
use crate::exchange::engine::{Exchange, ExchangeConfig};
use crate::exchange::report::TurnReport;
use crate::strategy::registry::DEFAULT_CAPACITY;
use crate::strategy::rule::Comparator;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("unable to read scenario: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed scenario: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Exchange(#[from] ExchangeError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateInput {
    pub sell: CurrencyId,
    pub buy: CurrencyId,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyInput {
    pub sell: CurrencyId,
    pub buy: CurrencyId,
    pub cmp: Comparator,
    pub target: f64,
    pub sell_volume: Amount,
    pub buy_volume: Amount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderInput {
    pub sell: CurrencyId,
    pub sell_amount: Amount,
    pub buy: CurrencyId,
    pub buy_amount: Amount,
}

/// Starting state of an exchange plus the number of turns to run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub currencies: usize,
    #[serde(default = "default_strategy_capacity")]
    pub strategy_capacity: usize,
    /// Opening balances by currency id; missing trailing entries are zero.
    #[serde(default)]
    pub balances: Vec<Amount>,
    #[serde(default)]
    pub rates: Vec<RateInput>,
    #[serde(default)]
    pub strategies: Vec<StrategyInput>,
    /// Orders staged before the first turn.
    #[serde(default)]
    pub orders: Vec<OrderInput>,
    #[serde(default = "default_turns")]
    pub turns: usize,
}

fn default_strategy_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_turns() -> usize {
    1
}

/// Final state after replaying a scenario.
#[derive(Debug)]
pub struct ScenarioOutcome {
    pub reports: Vec<TurnReport>,
    pub exchange: Exchange,
}

impl ScenarioOutcome {
    pub fn balances(&self) -> &[Amount] {
        self.exchange.ledger().balances()
    }
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String, ScenarioError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn config(&self) -> ExchangeConfig {
        ExchangeConfig {
            currencies: self.currencies,
            strategy_capacity: self.strategy_capacity,
        }
    }

    /// Build the seeded exchange without running any turns.
    pub fn build(&self) -> Result<Exchange, ExchangeError> {
        let mut exchange = Exchange::with_config(&self.config())?;
        for (id, amount) in self.balances.iter().enumerate() {
            exchange.set_balance(CurrencyId::new(id), *amount)?;
        }
        for rate in &self.rates {
            exchange.set_rate(rate.sell, rate.buy, rate.rate)?;
        }
        for s in &self.strategies {
            exchange.add_strategy(s.sell, s.buy, s.cmp, s.target, s.sell_volume, s.buy_volume)?;
        }
        for o in &self.orders {
            let order = Order::new(o.sell, o.sell_amount, o.buy, o.buy_amount)?;
            exchange.apply_order(&order)?;
        }
        Ok(exchange)
    }

    /// Build the exchange and run the configured number of turns.
    pub fn run(&self) -> Result<ScenarioOutcome, ExchangeError> {
        let mut exchange = self.build()?;
        let reports = exchange.run_turns(self.turns)?;
        Ok(ScenarioOutcome { reports, exchange })
    }
}
