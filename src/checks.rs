//! Named self-checks for the command-line driver.
//!
//! The driver looks a check up by name, runs it with no arguments and gets
//! back pass or fail. Each check builds its own state, so they can run in
//! any order.

use crate::core::currency::CurrencyId;
use crate::core::error::{ExchangeError, Result};
use crate::core::ledger::BalanceLedger;
use crate::core::order::Order;
use crate::exchange::engine::Exchange;
use crate::market::rate_matrix::{RateMatrix, StagedVolume};
use crate::strategy::evaluation::evaluate;
use crate::strategy::registry::StrategyRegistry;
use crate::strategy::rule::{Comparator, Strategy};

/// A self-check the driver can run by name.
#[derive(Debug, Clone, Copy)]
pub struct NamedCheck {
    pub name: &'static str,
    pub run: fn() -> bool,
}

pub static CHECKS: &[NamedCheck] = &[
    NamedCheck {
        name: "order_init",
        run: order_init,
    },
    NamedCheck {
        name: "ledger_withdraw_clamp",
        run: ledger_withdraw_clamp,
    },
    NamedCheck {
        name: "matrix_unstage_clamp",
        run: matrix_unstage_clamp,
    },
    NamedCheck {
        name: "strategy_match_le",
        run: strategy_match_le,
    },
    NamedCheck {
        name: "strategy_match_ge",
        run: strategy_match_ge,
    },
    NamedCheck {
        name: "accumulation_order_independent",
        run: accumulation_order_independent,
    },
    NamedCheck {
        name: "registry_growth",
        run: registry_growth,
    },
    NamedCheck {
        name: "bounds_enforcement",
        run: bounds_enforcement,
    },
    NamedCheck {
        name: "end_to_end_turn",
        run: end_to_end_turn,
    },
];

pub fn find_check(name: &str) -> Option<&'static NamedCheck> {
    CHECKS.iter().find(|check| check.name == name)
}

/// Run the named check; `None` if no check has that name.
pub fn run_check(name: &str) -> Option<bool> {
    find_check(name).map(|check| (check.run)())
}

fn id(n: usize) -> CurrencyId {
    CurrencyId::new(n)
}

/// Turns a fallible body into a pass/fail result.
fn passes(body: impl FnOnce() -> Result<bool>) -> bool {
    match body() {
        Ok(passed) => passed,
        Err(err) => {
            log::error!("check aborted: {}", err);
            false
        }
    }
}

fn order_init() -> bool {
    passes(|| {
        let order = Order::new(id(3), 10.0, id(2), 20.0)?;
        Ok(order.sell_id() == id(3)
            && order.buy_id() == id(2)
            && order.rate() == 0.5
            && order.inverse_rate() == 2.0)
    })
}

fn ledger_withdraw_clamp() -> bool {
    passes(|| {
        let mut ledger = BalanceLedger::new(1)?;
        ledger.set_balance(id(0), 25.0)?;
        let partial = ledger.withdraw(id(0), 10.0)?;
        let clamped = ledger.withdraw(id(0), 40.0)?;
        Ok(partial == 10.0 && clamped == 15.0 && ledger.balance(id(0))? == 0.0)
    })
}

fn matrix_unstage_clamp() -> bool {
    passes(|| {
        let mut matrix = RateMatrix::new(2)?;
        matrix.stage(id(0), id(1), 6.0, 2.0)?;
        let removed = matrix.unstage(id(0), id(1), 4.0, 5.0)?;
        Ok(removed == StagedVolume::new(4.0, 2.0)
            && matrix.staged(id(0), id(1))? == StagedVolume::new(2.0, 0.0))
    })
}

fn strategy_match(cmp: Comparator, hit: f64, miss: f64) -> bool {
    passes(|| {
        let rule = Strategy::new(id(1), id(0), cmp, 1.0, 5.0, 5.0)?;

        let mut matrix = RateMatrix::new(2)?;
        matrix.set_rate(id(1), id(0), hit)?;
        let matched = evaluate(&mut matrix, &rule)?;
        let staged_on_hit = matrix.staged(id(1), id(0))? == StagedVolume::new(5.0, 5.0);

        let mut matrix = RateMatrix::new(2)?;
        matrix.set_rate(id(1), id(0), miss)?;
        let missed = !evaluate(&mut matrix, &rule)?;
        let untouched = matrix.staged(id(1), id(0))?.is_zero();

        Ok(matched && staged_on_hit && missed && untouched)
    })
}

fn strategy_match_le() -> bool {
    strategy_match(Comparator::Le, 0.9, 1.1)
}

fn strategy_match_ge() -> bool {
    strategy_match(Comparator::Ge, 1.1, 0.9)
}

fn accumulation_order_independent() -> bool {
    passes(|| {
        let first = Strategy::new(id(1), id(0), Comparator::Le, 1.0, 5.0, 4.0)?;
        let second = Strategy::new(id(1), id(0), Comparator::Ge, 0.5, 3.0, 2.0)?;

        let mut totals = Vec::new();
        for order in [[first, second], [second, first]] {
            let mut matrix = RateMatrix::new(2)?;
            matrix.set_rate(id(1), id(0), 0.9)?;
            for rule in &order {
                evaluate(&mut matrix, rule)?;
            }
            totals.push(matrix.staged(id(1), id(0))?);
        }
        Ok(totals[0] == totals[1] && totals[0] == StagedVolume::new(8.0, 6.0))
    })
}

fn registry_growth() -> bool {
    passes(|| {
        let mut registry = StrategyRegistry::with_capacity(2)?;
        for i in 0..9 {
            registry.push(id(0), id(1), Comparator::Le, i as f64, 1.0, 1.0)?;
        }
        let in_order = registry
            .iter()
            .enumerate()
            .all(|(i, s)| s.target_rate() == i as f64);
        Ok(registry.len() == 9 && registry.capacity() == 16 && in_order)
    })
}

fn bounds_enforcement() -> bool {
    passes(|| {
        let mut exchange = Exchange::new(2)?;
        exchange.set_balance(id(0), 10.0)?;
        let ledger_before = exchange.ledger().clone();
        let matrix_before = exchange.matrix().clone();

        let out_of_range = ExchangeError::Index { id: 2, bound: 2 };
        let all_rejected = exchange.deposit(id(2), 1.0) == Err(out_of_range.clone())
            && exchange.set_rate(id(0), id(2), 1.0) == Err(out_of_range.clone())
            && exchange
                .add_strategy(id(2), id(0), Comparator::Le, 1.0, 1.0, 1.0)
                .is_err()
            && exchange.apply_order(&Order::new(id(0), 1.0, id(2), 2.0)?) == Err(out_of_range);

        Ok(all_rejected
            && exchange.ledger() == &ledger_before
            && exchange.matrix() == &matrix_before
            && exchange.strategies().is_empty())
    })
}

fn end_to_end_turn() -> bool {
    passes(|| {
        let mut exchange = Exchange::new(2)?;
        exchange.set_balance(id(0), 100.0)?;
        exchange.set_balance(id(1), 100.0)?;
        exchange.set_rate(id(1), id(0), 0.9)?;
        exchange.add_strategy(id(1), id(0), Comparator::Le, 1.0, 10.0, 9.0)?;
        exchange.run_turn()?;
        Ok(exchange.balance(id(1))? == 90.0
            && exchange.balance(id(0))? == 109.0
            && exchange.staged(id(1), id(0))?.is_zero()
            && exchange.turns() == 1)
    })
}
