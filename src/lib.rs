//! # mm7
//!
//! Multi-currency exchange model.
//!
//! An [`Exchange`](exchange::engine::Exchange) holds one balance per
//! currency, a matrix of live pairwise rates, and a list of standing
//! strategies. Each turn every strategy is checked against the live rate
//! of its pair; matches stage volume on that pair, and settlement then
//! moves all staged volume into the balances.
//!
//! ## Architecture
//!
//! - **core** — Currency ids, amounts, errors, the balance ledger and orders
//! - **market** — The rate/staging matrix
//! - **strategy** — Strategy rules, the registry and evaluation
//! - **exchange** — Turn orchestration, settlement and turn reports
//! - **simulation** — JSON scenarios and random market generation
//! - **checks** — Named self-checks for the CLI driver

pub mod checks;
pub mod core;
pub mod exchange;
pub mod market;
pub mod simulation;
pub mod strategy;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::currency::{Amount, CurrencyId};
    pub use crate::core::error::{ExchangeError, Result};
    pub use crate::core::ledger::BalanceLedger;
    pub use crate::core::order::Order;
    pub use crate::exchange::engine::{Exchange, ExchangeConfig, TurnPhase};
    pub use crate::exchange::report::{StrategyMatch, TurnReport};
    pub use crate::market::rate_matrix::{RateMatrix, StagedVolume};
    pub use crate::strategy::registry::StrategyRegistry;
    pub use crate::strategy::rule::{Comparator, Strategy};
}
