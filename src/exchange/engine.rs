use crate::core::currency::{Amount, CurrencyId};
use crate::core::error::{ExchangeError, Result};
use crate::core::ledger::BalanceLedger;
use crate::core::order::Order;
use crate::exchange::report::{StrategyMatch, TurnReport};
use crate::exchange::settlement::settle;
use crate::market::rate_matrix::{RateMatrix, StagedVolume};
use crate::strategy::evaluation::evaluate;
use crate::strategy::registry::{StrategyRegistry, DEFAULT_CAPACITY};
use crate::strategy::rule::{Comparator, Strategy};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Sizing for a new [`Exchange`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// Number of currencies; ids run `0..currencies`.
    pub currencies: usize,
    /// Initial strategy registry capacity.
    #[serde(default = "default_strategy_capacity")]
    pub strategy_capacity: usize,
}

fn default_strategy_capacity() -> usize {
    DEFAULT_CAPACITY
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            currencies: 2,
            strategy_capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Where the exchange is within a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    Idle,
    Evaluating,
    Settling,
}

/// The aggregate root: balances, rates, strategies and the turn counter.
///
/// A turn evaluates every registered strategy in insertion order against
/// the live rates, staging volume on the pairs that match, then settles all
/// staged volume (including manually applied orders) into the ledger.
///
/// The exchange is single-writer; wrap it in a lock spanning a whole turn
/// if it must be shared between threads.
///
/// # Examples
///
/// ```
/// use mm7::prelude::*;
///
/// let (usd, eur) = (CurrencyId::new(0), CurrencyId::new(1));
/// let mut exchange = Exchange::new(2).unwrap();
/// exchange.set_balance(usd, 100.0).unwrap();
/// exchange.set_balance(eur, 100.0).unwrap();
/// exchange.set_rate(eur, usd, 0.9).unwrap();
/// exchange
///     .add_strategy(eur, usd, Comparator::Le, 1.0, 10.0, 9.0)
///     .unwrap();
///
/// let report = exchange.run_turn().unwrap();
/// assert_eq!(report.matched_count(), 1);
/// assert_eq!(exchange.balance(eur).unwrap(), 90.0);
/// assert_eq!(exchange.balance(usd).unwrap(), 109.0);
/// assert_eq!(exchange.turns(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Exchange {
    ledger: BalanceLedger,
    matrix: RateMatrix,
    strategies: StrategyRegistry,
    turns: usize,
    phase: TurnPhase,
}

impl Exchange {
    /// Exchange over `currencies` currencies with the default registry capacity.
    pub fn new(currencies: usize) -> Result<Self> {
        Self::with_config(&ExchangeConfig {
            currencies,
            ..Default::default()
        })
    }

    pub fn with_config(config: &ExchangeConfig) -> Result<Self> {
        if config.currencies == 0 {
            return Err(ExchangeError::invariant(
                "an exchange needs at least one currency",
            ));
        }
        let exchange = Self {
            ledger: BalanceLedger::new(config.currencies)?,
            matrix: RateMatrix::new(config.currencies)?,
            strategies: StrategyRegistry::with_capacity(config.strategy_capacity)?,
            turns: 0,
            phase: TurnPhase::Idle,
        };
        log::debug!(
            "exchange created: {} currencies, strategy capacity {}",
            config.currencies,
            config.strategy_capacity
        );
        Ok(exchange)
    }

    // --- Accessors ---

    pub fn currencies(&self) -> usize {
        self.ledger.len()
    }

    pub fn turns(&self) -> usize {
        self.turns
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn ledger(&self) -> &BalanceLedger {
        &self.ledger
    }

    pub fn matrix(&self) -> &RateMatrix {
        &self.matrix
    }

    pub fn strategies(&self) -> &StrategyRegistry {
        &self.strategies
    }

    // --- Balances ---

    pub fn balance(&self, id: CurrencyId) -> Result<Amount> {
        self.ledger.balance(id)
    }

    pub fn set_balance(&mut self, id: CurrencyId, amount: Amount) -> Result<()> {
        self.ledger.set_balance(id, amount)
    }

    pub fn deposit(&mut self, id: CurrencyId, amount: Amount) -> Result<()> {
        self.ledger.deposit(id, amount)
    }

    pub fn withdraw(&mut self, id: CurrencyId, amount: Amount) -> Result<Amount> {
        self.ledger.withdraw(id, amount)
    }

    pub fn covers(&self, id: CurrencyId, amount: Amount) -> Result<bool> {
        self.ledger.covers(id, amount)
    }

    // --- Rates and staging ---

    pub fn rate(&self, sell: CurrencyId, buy: CurrencyId) -> Result<f64> {
        self.matrix.current_rate(sell, buy)
    }

    pub fn set_rate(&mut self, sell: CurrencyId, buy: CurrencyId, rate: f64) -> Result<()> {
        self.matrix.set_rate(sell, buy, rate)
    }

    pub fn staged(&self, sell: CurrencyId, buy: CurrencyId) -> Result<StagedVolume> {
        self.matrix.staged(sell, buy)
    }

    /// Stage an order's legs for settlement at the end of the next turn.
    pub fn apply_order(&mut self, order: &Order) -> Result<()> {
        self.matrix.apply_order(order)
    }

    /// Withdraw previously staged volume from a pair, clamped at zero.
    pub fn unstage(
        &mut self,
        sell: CurrencyId,
        buy: CurrencyId,
        sell_amount: Amount,
        buy_amount: Amount,
    ) -> Result<StagedVolume> {
        self.matrix.unstage(sell, buy, sell_amount, buy_amount)
    }

    // --- Strategies ---

    /// Register a strategy, returning its position in evaluation order.
    pub fn add_strategy(
        &mut self,
        sell: CurrencyId,
        buy: CurrencyId,
        comparator: Comparator,
        target_rate: f64,
        sell_volume: Amount,
        buy_volume: Amount,
    ) -> Result<usize> {
        sell.check(self.currencies())?;
        buy.check(self.currencies())?;
        let strategy = Strategy::new(sell, buy, comparator, target_rate, sell_volume, buy_volume)?;
        self.add_strategy_rule(strategy)
    }

    pub fn add_strategy_rule(&mut self, strategy: Strategy) -> Result<usize> {
        strategy.sell_id().check(self.currencies())?;
        strategy.buy_id().check(self.currencies())?;
        self.strategies.push_strategy(strategy)
    }

    // --- Turns ---

    fn transition(&mut self, next: TurnPhase) {
        log::trace!("turn {}: {:?} -> {:?}", self.turns + 1, self.phase, next);
        self.phase = next;
    }

    /// Run one full evaluate-then-settle cycle.
    ///
    /// The turn works on copies of the matrix and ledger and commits them
    /// only once settlement succeeds. On error the exchange is left exactly
    /// as it was, back in [`TurnPhase::Idle`].
    pub fn run_turn(&mut self) -> Result<TurnReport> {
        match self.try_turn() {
            Ok(report) => {
                log::info!(
                    "turn {} complete: {}/{} strategies matched, {} pairs settled",
                    report.turn,
                    report.matched_count(),
                    report.matches.len(),
                    report.settlements.len()
                );
                Ok(report)
            }
            Err(err) => {
                log::warn!("turn {} aborted: {}", self.turns + 1, err);
                self.transition(TurnPhase::Idle);
                Err(err)
            }
        }
    }

    fn try_turn(&mut self) -> Result<TurnReport> {
        let bound = self.currencies();
        for strategy in &self.strategies {
            strategy.sell_id().check(bound)?;
            strategy.buy_id().check(bound)?;
        }

        let mut matrix = self.matrix.clone();
        let mut ledger = self.ledger.clone();

        self.transition(TurnPhase::Evaluating);
        let mut matches = Vec::with_capacity(self.strategies.len());
        for (index, strategy) in self.strategies.iter().enumerate() {
            let rate = matrix.current_rate(strategy.sell_id(), strategy.buy_id())?;
            let matched = evaluate(&mut matrix, strategy)?;
            matches.push(StrategyMatch {
                index,
                sell: strategy.sell_id(),
                buy: strategy.buy_id(),
                rate,
                matched,
            });
        }

        self.transition(TurnPhase::Settling);
        let settlements = settle(&mut matrix, &mut ledger)?;

        self.matrix = matrix;
        self.ledger = ledger;
        self.transition(TurnPhase::Idle);
        self.turns += 1;

        Ok(TurnReport {
            turn: self.turns,
            matches,
            settlements,
            completed_at: Utc::now(),
        })
    }

    /// Run `count` turns back to back.
    pub fn run_turns(&mut self, count: usize) -> Result<Vec<TurnReport>> {
        (0..count).map(|_| self.run_turn()).collect()
    }

    /// Release the exchange and everything it owns.
    ///
    /// Consumes `self`, so an exchange cannot be released twice.
    pub fn teardown(self) {
        log::debug!(
            "exchange released after {} turns ({} strategies)",
            self.turns,
            self.strategies.len()
        );
    }
}
